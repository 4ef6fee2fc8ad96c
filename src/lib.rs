//! MATRI maternal-health companion core
//!
//! Safety alerts from symptom check-ins, stage-aware educational content,
//! and a write-through record store backed by a Supabase project.

pub mod backend;
pub mod catalog;
pub mod config;
pub mod error;
pub mod mapping;
pub mod model;
pub mod resources;
pub mod rules;
pub mod session;
pub mod store;
pub mod taxonomy;

use std::sync::Arc;

use matri_auth::{Auth, AuthOptions};
use reqwest::Client;

use crate::backend::{HealthBackend, SupabaseBackend};
pub use crate::config::MatriConfig;
pub use crate::error::{Error, Result};
use crate::session::Account;
use crate::store::HealthRecordStore;

/// Entry point wiring the auth client and the record backend to one project
pub struct Matri {
    config: MatriConfig,
    http_client: Client,
    auth: Arc<Auth>,
    backend: Arc<dyn HealthBackend>,
}

impl Matri {
    /// Create a client for the project in `config`
    ///
    /// # Example
    ///
    /// ```
    /// use matri::{Matri, MatriConfig};
    ///
    /// let config = MatriConfig::new("https://your-project-url.supabase.co", "your-anon-key").unwrap();
    /// let matri = Matri::new(config).unwrap();
    /// let store = matri.record_store();
    /// assert!(store.owner().is_none());
    /// ```
    pub fn new(config: MatriConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        let auth = Auth::new(
            config.base_url(),
            &config.anon_key,
            http_client.clone(),
            AuthOptions {
                auto_refresh_token: config.auto_refresh_token,
                persist_session: true,
            },
        );
        let backend = SupabaseBackend::new(&config, http_client.clone());

        Ok(Self {
            config,
            http_client,
            auth: Arc::new(auth),
            backend: Arc::new(backend),
        })
    }

    /// Configuration from `SUPABASE_URL` and `SUPABASE_ANON_KEY`
    pub fn from_env() -> Result<Self> {
        Self::new(MatriConfig::from_env()?)
    }

    /// Swap the record backend, keeping auth as is
    pub fn with_backend(mut self, backend: Arc<dyn HealthBackend>) -> Self {
        self.backend = backend;
        self
    }

    pub fn config(&self) -> &MatriConfig {
        &self.config
    }

    pub fn http_client(&self) -> &Client {
        &self.http_client
    }

    pub fn auth(&self) -> &Arc<Auth> {
        &self.auth
    }

    pub fn account(&self) -> Account {
        Account::new(self.auth.clone(), self.backend.clone())
    }

    /// An empty store; call [`HealthRecordStore::load`] once signed in
    pub fn record_store(&self) -> HealthRecordStore {
        HealthRecordStore::new(self.backend.clone()).with_config(&self.config)
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result, ValidationError};
    pub use crate::model::{
        AlertSeverity, Appointment, AppointmentCategory, AppointmentForm, AppointmentPatch,
        CheckInForm, ContactForm, EducationalItem, EmergencyContact, MaternalStage, Mood, Profile,
        ProfilePatch, RiskLevel, SafetyAlert, SymptomEntry,
    };
    pub use crate::session::{Account, SessionContext, SignUpOutcome};
    pub use crate::store::{HealthRecordStore, LoadReport};
    pub use crate::taxonomy::SymptomTag;
    pub use crate::{Matri, MatriConfig};
}
