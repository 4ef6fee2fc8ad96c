//! PostgREST client for the MATRI record store
//!
//! This crate covers the slice of the PostgREST API the health record store
//! talks to: row selection with equality filters and ordering, and single-table
//! `insert`, `update` and `delete` calls that ask for the affected rows back
//! (`Prefer: return=representation`).
//!
//! # Features
//!
//! - Query API (`select`, `insert`, `update`, `delete`)
//! - Equality filters (`eq`)
//! - Ordering
//! - Structured API error details

use log::debug;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use url::Url;

/// Error details returned by PostgREST in the response body
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PostgrestApiErrorDetails {
    pub code: Option<String>,
    pub message: Option<String>,
    pub details: Option<String>,
    pub hint: Option<String>,
}

impl fmt::Display for PostgrestApiErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(code) = &self.code {
            parts.push(format!("Code: {}", code));
        }
        if let Some(message) = &self.message {
            parts.push(format!("Message: {}", message));
        }
        if let Some(details) = &self.details {
            parts.push(format!("Details: {}", details));
        }
        if let Some(hint) = &self.hint {
            parts.push(format!("Hint: {}", hint));
        }
        write!(f, "{}", parts.join(", "))
    }
}

#[derive(Error, Debug)]
pub enum PostgrestError {
    #[error("API error: {details} (Status: {status})")]
    ApiError {
        details: PostgrestApiErrorDetails,
        status: StatusCode,
    },

    #[error("API error (unparsed): {message} (Status: {status})")]
    UnparsedApiError { message: String, status: StatusCode },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}

impl PostgrestError {
    /// HTTP status of the failed call, when the server answered at all
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            PostgrestError::ApiError { status, .. }
            | PostgrestError::UnparsedApiError { status, .. } => Some(*status),
            PostgrestError::NetworkError(e) => e.status(),
            _ => None,
        }
    }

    /// Whether the request gave up waiting for the server
    pub fn is_timeout(&self) -> bool {
        matches!(self, PostgrestError::NetworkError(e) if e.is_timeout())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

/// Client bound to one table of the REST API
#[derive(Debug, Clone)]
pub struct PostgrestClient {
    base_url: String,
    table: String,
    http_client: Client,
    headers: HeaderMap,
    query_params: HashMap<String, String>,
}

impl PostgrestClient {
    pub fn new(base_url: &str, api_key: &str, table: &str, http_client: Client) -> Self {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(api_key) {
            headers.insert("apikey", value);
        }
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            table: table.to_string(),
            http_client,
            headers,
            query_params: HashMap::new(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Result<Self, PostgrestError> {
        let header_value = HeaderValue::from_str(value).map_err(|_| {
            PostgrestError::InvalidParameters(format!("Invalid header value: {}", value))
        })?;
        let header_name = HeaderName::from_bytes(key.as_bytes()).map_err(|_| {
            PostgrestError::InvalidParameters(format!("Invalid header name: {}", key))
        })?;

        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    /// Attach the signed-in user's access token so row level security applies
    pub fn with_auth(self, token: &str) -> Result<Self, PostgrestError> {
        self.with_header("Authorization", &format!("Bearer {}", token))
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.query_params
            .insert("select".to_string(), columns.to_string());
        self
    }

    pub fn eq(self, column: &str, value: &str) -> Self {
        self.filter(column, "eq", value)
    }

    fn filter(mut self, column: &str, operator: &str, value: &str) -> Self {
        self.query_params
            .insert(column.to_string(), format!("{}.{}", operator, value));
        self
    }

    pub fn order(mut self, column: &str, order: SortOrder) -> Self {
        self.query_params.insert(
            "order".to_string(),
            format!("{}.{}", column, order.as_str()),
        );
        self
    }

    fn build_url(&self) -> Result<String, PostgrestError> {
        let mut url = Url::parse(&format!("{}/rest/v1/{}", self.base_url, self.table))?;

        for (key, value) in &self.query_params {
            url.query_pairs_mut().append_pair(key, value);
        }

        Ok(url.to_string())
    }

    fn representation_headers(&self) -> HeaderMap {
        let mut headers = self.headers.clone();
        headers.insert(
            HeaderName::from_static("prefer"),
            HeaderValue::from_static("return=representation"),
        );
        headers
    }

    /// Fetch every matching row
    pub async fn execute<T: for<'de> Deserialize<'de>>(&self) -> Result<Vec<T>, PostgrestError> {
        let url = self.build_url()?;
        debug!("GET {}", url);

        let response = self
            .http_client
            .get(&url)
            .headers(self.headers.clone())
            .send()
            .await
            .map_err(PostgrestError::NetworkError)?;

        let status = response.status();
        if !status.is_success() {
            return Err(api_error(response).await);
        }

        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| PostgrestError::DeserializationError(e.to_string()))
    }

    /// Fetch zero or one row; more than one match is an error
    pub async fn maybe_single<T: for<'de> Deserialize<'de>>(
        &self,
    ) -> Result<Option<T>, PostgrestError> {
        let mut rows = self.execute::<T>().await?;
        if rows.len() > 1 {
            return Err(PostgrestError::DeserializationError(format!(
                "Expected at most one row from {}, got {}",
                self.table,
                rows.len()
            )));
        }
        Ok(rows.pop())
    }

    pub async fn insert<T: Serialize>(&self, values: T) -> Result<Value, PostgrestError> {
        let url = self.build_url()?;
        debug!("POST {}", url);

        let response = self
            .http_client
            .post(&url)
            .headers(self.representation_headers())
            .json(&values)
            .send()
            .await
            .map_err(PostgrestError::NetworkError)?;

        read_representation(response).await
    }

    pub async fn update<T: Serialize>(&self, values: T) -> Result<Value, PostgrestError> {
        let url = self.build_url()?;
        debug!("PATCH {}", url);

        let response = self
            .http_client
            .patch(&url)
            .headers(self.representation_headers())
            .json(&values)
            .send()
            .await
            .map_err(PostgrestError::NetworkError)?;

        read_representation(response).await
    }

    pub async fn delete(&self) -> Result<Value, PostgrestError> {
        let url = self.build_url()?;
        debug!("DELETE {}", url);

        let response = self
            .http_client
            .delete(&url)
            .headers(self.representation_headers())
            .send()
            .await
            .map_err(PostgrestError::NetworkError)?;

        read_representation(response).await
    }
}

/// Reads a write response; an empty body (204 No Content) becomes `Value::Null`
async fn read_representation(response: Response) -> Result<Value, PostgrestError> {
    let status = response.status();
    if !status.is_success() {
        return Err(api_error(response).await);
    }

    let body_text = response.text().await.map_err(|e| {
        PostgrestError::DeserializationError(format!("Failed to read response body: {}", e))
    })?;

    if body_text.trim().is_empty() {
        Ok(Value::Null)
    } else {
        serde_json::from_str::<Value>(&body_text)
            .map_err(|e| PostgrestError::DeserializationError(e.to_string()))
    }
}

async fn api_error(response: Response) -> PostgrestError {
    let status = response.status();
    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to read error response".to_string());

    match serde_json::from_str::<PostgrestApiErrorDetails>(&error_text) {
        Ok(details) => PostgrestError::ApiError { details, status },
        Err(_) => PostgrestError::UnparsedApiError {
            message: error_text,
            status,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Deserialize, Debug, PartialEq)]
    struct Contact {
        id: String,
        contact_name: String,
    }

    #[tokio::test]
    async fn test_select_with_filters_and_order() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/emergency_contacts"))
            .and(query_param("select", "*"))
            .and(query_param("user_id", "eq.user-1"))
            .and(query_param("order", "contact_name.asc"))
            .and(header("apikey", "fake-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": "c1", "contact_name": "Ada" },
                { "id": "c2", "contact_name": "Grace" }
            ])))
            .mount(&mock_server)
            .await;

        let client = PostgrestClient::new(
            &mock_server.uri(),
            "fake-key",
            "emergency_contacts",
            reqwest::Client::new(),
        );

        let rows = client
            .select("*")
            .eq("user_id", "user-1")
            .order("contact_name", SortOrder::Ascending)
            .execute::<Contact>()
            .await
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].contact_name, "Ada");
    }

    #[tokio::test]
    async fn test_trailing_slash_in_base_url() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/items"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&mock_server)
            .await;

        let base = format!("{}/", mock_server.uri());
        let client = PostgrestClient::new(&base, "fake-key", "items", reqwest::Client::new());
        let rows = client.select("*").execute::<Value>().await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_maybe_single() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/users_profile"))
            .and(query_param("id", "eq.missing"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/users_profile"))
            .and(query_param("id", "eq.twice"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": "twice", "contact_name": "a" },
                { "id": "twice", "contact_name": "b" }
            ])))
            .mount(&mock_server)
            .await;

        let client = PostgrestClient::new(
            &mock_server.uri(),
            "fake-key",
            "users_profile",
            reqwest::Client::new(),
        );

        let missing = client
            .clone()
            .eq("id", "missing")
            .maybe_single::<Contact>()
            .await
            .unwrap();
        assert!(missing.is_none());

        let twice = client.eq("id", "twice").maybe_single::<Contact>().await;
        assert!(matches!(
            twice,
            Err(PostgrestError::DeserializationError(_))
        ));
    }

    #[tokio::test]
    async fn test_insert_returns_representation() {
        let mock_server = MockServer::start().await;
        let new_row = json!({ "user_id": "user-1", "contact_name": "Ada" });

        Mock::given(method("POST"))
            .and(path("/rest/v1/emergency_contacts"))
            .and(header("prefer", "return=representation"))
            .and(header("Authorization", "Bearer token-1"))
            .and(body_json(&new_row))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(json!([{ "id": "c9", "contact_name": "Ada" }])),
            )
            .mount(&mock_server)
            .await;

        let client = PostgrestClient::new(
            &mock_server.uri(),
            "fake-key",
            "emergency_contacts",
            reqwest::Client::new(),
        )
        .with_auth("token-1")
        .unwrap();

        let value = client.insert(&new_row).await.unwrap();
        assert_eq!(value[0]["id"], "c9");
    }

    #[tokio::test]
    async fn test_delete_with_empty_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/rest/v1/appointments"))
            .and(query_param("id", "eq.a1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&mock_server)
            .await;

        let client = PostgrestClient::new(
            &mock_server.uri(),
            "fake-key",
            "appointments",
            reqwest::Client::new(),
        );

        let value = client.eq("id", "a1").delete().await.unwrap();
        assert_eq!(value, Value::Null);
    }

    #[tokio::test]
    async fn test_update_error_details() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/rest/v1/appointments"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "code": "22P02",
                "message": "invalid input syntax for type uuid",
                "details": null,
                "hint": null
            })))
            .mount(&mock_server)
            .await;

        let client = PostgrestClient::new(
            &mock_server.uri(),
            "fake-key",
            "appointments",
            reqwest::Client::new(),
        );

        let err = client
            .eq("id", "not-a-uuid")
            .update(json!({ "status": "completed" }))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
        match err {
            PostgrestError::ApiError { details, .. } => {
                assert_eq!(details.code.as_deref(), Some("22P02"));
            }
            other => panic!("Expected ApiError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unparsed_error_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/symptoms_log"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad gateway"))
            .mount(&mock_server)
            .await;

        let client = PostgrestClient::new(
            &mock_server.uri(),
            "fake-key",
            "symptoms_log",
            reqwest::Client::new(),
        );

        let err = client.select("*").execute::<Value>().await.unwrap_err();
        match err {
            PostgrestError::UnparsedApiError { message, status } => {
                assert_eq!(message, "Bad gateway");
                assert_eq!(status, StatusCode::BAD_GATEWAY);
            }
            other => panic!("Expected UnparsedApiError, got {:?}", other),
        }
    }
}
