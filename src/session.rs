//! Signed-in state: the per-call session context and the account service
//! that owns sign-up, sign-in, sign-out and the profile.

use std::sync::Arc;

use matri_auth::{Auth, Session, SignUpResponse};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::backend::HealthBackend;
use crate::error::{Collection, Error, Result, ValidationError};
use crate::model::{Profile, ProfilePatch};

/// Who is calling, passed explicitly into every store and profile call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub user_id: String,
    pub access_token: String,
    pub email: Option<String>,
}

impl SessionContext {
    pub fn new<U: Into<String>, T: Into<String>>(user_id: U, access_token: T) -> Self {
        Self {
            user_id: user_id.into(),
            access_token: access_token.into(),
            email: None,
        }
    }

    pub fn with_email<E: Into<String>>(mut self, email: E) -> Self {
        self.email = Some(email.into());
        self
    }
}

impl From<&Session> for SessionContext {
    fn from(session: &Session) -> Self {
        Self {
            user_id: session.user.id.clone(),
            access_token: session.access_token.clone(),
            email: session.user.email.clone(),
        }
    }
}

/// Outcome of a sign-up
#[derive(Debug, Clone)]
pub enum SignUpOutcome {
    /// The project signs new users straight in
    SignedIn(SessionContext),
    /// A confirmation email was sent; no session yet
    ConfirmationRequired { user_id: String },
}

/// Account operations and the signed-in user's profile
pub struct Account {
    auth: Arc<Auth>,
    backend: Arc<dyn HealthBackend>,
    profile: Option<Profile>,
}

impl Account {
    pub fn new(auth: Arc<Auth>, backend: Arc<dyn HealthBackend>) -> Self {
        Self {
            auth,
            backend,
            profile: None,
        }
    }

    /// Register with a display name stored as user metadata
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<SignUpOutcome> {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(ValidationError::new(
                "Please enter your name",
                "We'd love to know what to call you",
            )
            .into());
        }
        require_credentials(email, password)?;

        let data = serde_json::json!({ "name": display_name });
        let response = self.auth.sign_up(email.trim(), password, Some(data)).await?;
        info!(user_id = %response.user().id, "signed up");

        Ok(match response {
            SignUpResponse::Session(session) => SignUpOutcome::SignedIn((&session).into()),
            SignUpResponse::ConfirmationRequired(user) => {
                SignUpOutcome::ConfirmationRequired { user_id: user.id }
            }
        })
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SessionContext> {
        require_credentials(email, password)?;
        let session = self.auth.sign_in_with_password(email.trim(), password).await?;
        info!(user_id = %session.user.id, "signed in");
        Ok((&session).into())
    }

    /// Sign out and forget the profile. Signing out without a session is a
    /// no-op; a server-side failure is logged and the local state still goes.
    pub async fn sign_out(&mut self) -> Result<()> {
        self.profile = None;
        if self.auth.get_session().is_none() {
            debug!("sign out without a session");
            return Ok(());
        }
        if let Err(e) = self.auth.sign_out().await {
            warn!(error = %e, "server rejected sign out, local session cleared");
        }
        info!("signed out");
        Ok(())
    }

    /// Context for the current session, refreshing an expired token
    pub async fn context(&self) -> Result<SessionContext> {
        let session = self.auth.valid_session().await?;
        Ok((&session).into())
    }

    /// Context for the current session as is, without network access
    pub fn current(&self) -> Option<SessionContext> {
        self.auth.get_session().as_ref().map(SessionContext::from)
    }

    /// Observe sign-in and sign-out
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.auth.subscribe()
    }

    /// `None` while signed out or before [`Account::load_profile`]
    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    /// Fetch the profile row of the signed-in user. A missing row leaves the
    /// profile empty and is not an error.
    pub async fn load_profile(&mut self, ctx: &SessionContext) -> Result<Option<&Profile>> {
        let profile = self
            .backend
            .fetch_profile(ctx)
            .await
            .map_err(|e| Error::remote_read(Collection::Profiles, e))?;
        if profile.is_none() {
            debug!(user_id = %ctx.user_id, "no profile row yet");
        }
        self.profile = profile;
        Ok(self.profile.as_ref())
    }

    /// Validate and write a partial profile update
    pub async fn update_profile(&mut self, ctx: &SessionContext, patch: &ProfilePatch) -> Result<&Profile> {
        let current = match &self.profile {
            Some(profile) if profile.id == ctx.user_id => profile.clone(),
            Some(_) | None => {
                return Err(Error::NotFound {
                    collection: Collection::Profiles,
                    id: ctx.user_id.clone(),
                })
            }
        };

        let next = patch.apply_to(&current)?;
        if next == current {
            return Ok(self.profile.insert(current));
        }

        let stored = self
            .backend
            .update_profile(ctx, &current, &next)
            .await
            .map_err(|e| Error::remote_write(Collection::Profiles, e))?
            .ok_or_else(|| Error::NotFound {
                collection: Collection::Profiles,
                id: ctx.user_id.clone(),
            })?;

        info!(user_id = %ctx.user_id, "profile updated");
        Ok(self.profile.insert(stored))
    }
}

fn require_credentials(email: &str, password: &str) -> std::result::Result<(), ValidationError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(ValidationError::new(
            "Please fill in all fields",
            "Email and password are required",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use matri_auth::User;

    #[test]
    fn context_from_session() {
        let session = Session {
            access_token: "token".to_string(),
            refresh_token: "refresh".to_string(),
            expires_in: 3600,
            expires_at: None,
            token_type: "bearer".to_string(),
            user: User {
                id: "u1".to_string(),
                email: Some("ama@example.com".to_string()),
                phone: None,
                app_metadata: serde_json::Value::Null,
                user_metadata: serde_json::Value::Null,
                created_at: None,
                updated_at: None,
            },
        };
        let ctx = SessionContext::from(&session);
        assert_eq!(
            ctx,
            SessionContext::new("u1", "token").with_email("ama@example.com")
        );
    }

    #[test]
    fn credentials_are_required() {
        assert!(require_credentials(" ", "secret").is_err());
        assert!(require_credentials("ama@example.com", "").is_err());
        assert!(require_credentials("ama@example.com", "secret").is_ok());
    }
}
