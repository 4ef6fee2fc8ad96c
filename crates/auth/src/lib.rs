//! GoTrue auth client for MATRI
//!
//! Covers email/password sign up and sign in, sign out, token refresh and
//! current-user lookup. The current session is held in a `tokio::sync::watch`
//! channel so callers can observe sign-in and sign-out as they happen.

use chrono::Utc;
use log::{debug, warn};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Missing session")]
    MissingSession,
}

impl AuthError {
    /// Message reported by the auth server, if this is an API rejection
    pub fn api_message(&self) -> Option<&str> {
        match self {
            AuthError::ApiError(message) => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub app_metadata: serde_json::Value,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl User {
    /// Display name stored in `user_metadata.name` at sign-up
    pub fn display_name(&self) -> Option<&str> {
        self.user_metadata.get("name").and_then(|v| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    /// Unix timestamp; filled in from `expires_in` when the server omits it
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub token_type: String,
    pub user: User,
}

impl Session {
    fn stamp_expiry(mut self) -> Self {
        if self.expires_at.is_none() {
            self.expires_at = Some(Utc::now().timestamp() + self.expires_in);
        }
        self
    }

    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now().timestamp() >= expires_at,
            None => false,
        }
    }
}

/// Sign-up either returns a live session or, when email confirmation is
/// enabled on the project, only the unconfirmed user.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SignUpResponse {
    Session(Session),
    ConfirmationRequired(User),
}

impl SignUpResponse {
    pub fn user(&self) -> &User {
        match self {
            SignUpResponse::Session(session) => &session.user,
            SignUpResponse::ConfirmationRequired(user) => user,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthOptions {
    pub auto_refresh_token: bool,
    pub persist_session: bool,
}

impl Default for AuthOptions {
    fn default() -> Self {
        Self {
            auto_refresh_token: true,
            persist_session: true,
        }
    }
}

/// Error body shapes used by GoTrue across versions
#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    msg: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

impl ApiErrorBody {
    fn into_message(self) -> Option<String> {
        self.msg
            .or(self.message)
            .or(self.error_description)
            .or(self.error)
    }
}

pub struct Auth {
    url: String,
    key: String,
    http_client: Client,
    options: AuthOptions,
    current_session: watch::Sender<Option<Session>>,
}

impl Auth {
    pub fn new(url: &str, key: &str, http_client: Client, options: AuthOptions) -> Self {
        let (current_session, _) = watch::channel(None);
        Self {
            url: url.trim_end_matches('/').to_string(),
            key: key.to_string(),
            http_client,
            options,
            current_session,
        }
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1{}", self.url, path)
    }

    /// Register a new user. `data` is stored as the user's metadata.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        data: Option<serde_json::Value>,
    ) -> Result<SignUpResponse, AuthError> {
        let mut payload = serde_json::json!({
            "email": email,
            "password": password,
        });
        if let Some(data) = data {
            payload["data"] = data;
        }

        let response = self
            .http_client
            .post(self.auth_url("/signup"))
            .header("apikey", &self.key)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        let response = check_status(response).await?;
        let result = match response.json::<SignUpResponse>().await? {
            SignUpResponse::Session(session) => {
                let session = session.stamp_expiry();
                self.store_session(Some(session.clone()));
                SignUpResponse::Session(session)
            }
            unconfirmed => unconfirmed,
        };

        Ok(result)
    }

    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let payload = serde_json::json!({
            "email": email,
            "password": password,
        });

        let response = self
            .http_client
            .post(self.auth_url("/token?grant_type=password"))
            .header("apikey", &self.key)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        let response = check_status(response).await?;
        let session = response.json::<Session>().await?.stamp_expiry();
        self.store_session(Some(session.clone()));

        Ok(session)
    }

    pub async fn refresh_session(&self) -> Result<Session, AuthError> {
        let session = self.get_session().ok_or(AuthError::MissingSession)?;

        let payload = serde_json::json!({
            "refresh_token": session.refresh_token,
        });

        let response = self
            .http_client
            .post(self.auth_url("/token?grant_type=refresh_token"))
            .header("apikey", &self.key)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        let response = check_status(response).await?;
        let new_session = response.json::<Session>().await?.stamp_expiry();
        self.store_session(Some(new_session.clone()));

        Ok(new_session)
    }

    /// Current session, refreshed first if it has expired and auto refresh is on
    pub async fn valid_session(&self) -> Result<Session, AuthError> {
        let session = self.get_session().ok_or(AuthError::MissingSession)?;
        if session.is_expired() && self.options.auto_refresh_token {
            debug!("access token expired, refreshing");
            return self.refresh_session().await;
        }
        Ok(session)
    }

    /// Sign out. The local session is dropped even when the server call
    /// fails, since the token may already be revoked.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let session = self.get_session().ok_or(AuthError::MissingSession)?;

        let result = self
            .http_client
            .post(self.auth_url("/logout"))
            .header("apikey", &self.key)
            .header("Authorization", format!("Bearer {}", session.access_token))
            .send()
            .await;

        self.current_session.send_replace(None);

        let response = result?;
        if let Err(e) = check_status(response).await {
            warn!("logout rejected by server: {}", e);
            return Err(e);
        }
        Ok(())
    }

    pub fn get_session(&self) -> Option<Session> {
        self.current_session.borrow().clone()
    }

    /// Replace the session, e.g. one restored from disk
    pub fn set_session(&self, session: Option<Session>) {
        self.current_session.send_replace(session);
    }

    /// Observe session changes. The receiver sees the current value first.
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.current_session.subscribe()
    }

    fn store_session(&self, session: Option<Session>) {
        if self.options.persist_session {
            self.current_session.send_replace(session);
        }
    }
}

async fn check_status(response: Response) -> Result<Response, AuthError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let error_text = response.text().await?;
    let message = serde_json::from_str::<ApiErrorBody>(&error_text)
        .ok()
        .and_then(ApiErrorBody::into_message)
        .unwrap_or_else(|| {
            if error_text.is_empty() {
                status.to_string()
            } else {
                error_text
            }
        });

    Err(AuthError::ApiError(message))
}
