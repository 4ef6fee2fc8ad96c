//! Error handling for the MATRI core
//!
//! The rule engine never fails. Everything that can fail sits at the edges:
//! form validation, the auth collaborator, and reads and writes against the
//! remote store.

use std::fmt;
use thiserror::Error;

use matri_auth::AuthError;
use matri_postgrest::PostgrestError;

/// Message shown in place of the server's own text for duplicate sign-ups
pub const DUPLICATE_EMAIL_MESSAGE: &str = "An account with this email already exists";

/// A form was submitted without what it needs. Carries the title and
/// description shown to the user; no store call has been attempted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{title}: {description}")]
pub struct ValidationError {
    pub title: String,
    pub description: String,
}

impl ValidationError {
    pub fn new<T: fmt::Display, D: fmt::Display>(title: T, description: D) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
        }
    }
}

/// Which remote collection an error concerns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Symptoms,
    Appointments,
    EmergencyContacts,
    Profiles,
}

impl Collection {
    pub fn table(&self) -> &'static str {
        match self {
            Collection::Symptoms => "symptoms_log",
            Collection::Appointments => "appointments",
            Collection::EmergencyContacts => "emergency_contacts",
            Collection::Profiles => "users_profile",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The backing store rejected or failed a write; local state is unchanged
    #[error("Could not save to {collection}: {source}")]
    RemoteWrite {
        collection: Collection,
        #[source]
        source: PostgrestError,
    },

    /// The initial fetch of a collection failed
    #[error("Could not load {collection}: {source}")]
    RemoteRead {
        collection: Collection,
        #[source]
        source: PostgrestError,
    },

    /// Sign-in or sign-up was rejected; the message is safe to show
    #[error("Authentication error: {message}")]
    Auth {
        message: String,
        #[source]
        source: Option<AuthError>,
    },

    #[error("Not signed in")]
    NotSignedIn,

    #[error("{collection} has no record {id}")]
    NotFound { collection: Collection, id: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    pub fn remote_write(collection: Collection, source: PostgrestError) -> Self {
        Error::RemoteWrite { collection, source }
    }

    pub fn remote_read(collection: Collection, source: PostgrestError) -> Self {
        Error::RemoteRead { collection, source }
    }

    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    /// Whether a remote call timed out rather than being rejected
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::RemoteWrite { source, .. } | Error::RemoteRead { source, .. } => {
                source.is_timeout()
            }
            _ => false,
        }
    }
}

impl From<AuthError> for Error {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingSession => Error::NotSignedIn,
            other => Error::Auth {
                message: friendly_auth_message(&other),
                source: Some(other),
            },
        }
    }
}

/// Server messages are passed through, except the ones with a known
/// friendlier wording. Transport failures get a generic message.
fn friendly_auth_message(err: &AuthError) -> String {
    match err.api_message() {
        Some(message) if message.contains("already registered") => {
            DUPLICATE_EMAIL_MESSAGE.to_string()
        }
        Some(message) => message.to_string(),
        None => "Something went wrong. Please try again later.".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_email_is_translated() {
        let err: Error = AuthError::ApiError("User already registered".to_string()).into();
        match err {
            Error::Auth { message, .. } => assert_eq!(message, DUPLICATE_EMAIL_MESSAGE),
            other => panic!("Expected Auth error, got {:?}", other),
        }
    }

    #[test]
    fn other_auth_messages_pass_through() {
        let err: Error = AuthError::ApiError("Invalid login credentials".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Authentication error: Invalid login credentials"
        );
    }

    #[test]
    fn missing_session_means_not_signed_in() {
        let err: Error = AuthError::MissingSession.into();
        assert!(matches!(err, Error::NotSignedIn));
    }

    #[test]
    fn validation_error_display() {
        let err = ValidationError::new("Please fill in all fields", "We need the details");
        assert_eq!(err.to_string(), "Please fill in all fields: We need the details");
    }
}
