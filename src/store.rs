//! Write-through store of the signed-in user's health records.
//!
//! Every mutation writes to the backend first and only touches the snapshot
//! once the backend has confirmed. A failed write leaves the snapshot exactly
//! as it was. Mutations borrow the store mutably, so queries always see a
//! settled snapshot.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::{debug, error, info, warn};

use crate::backend::HealthBackend;
use crate::catalog::CATALOG;
use crate::config::MatriConfig;
use crate::error::{Collection, Error, Result};
use crate::model::{
    Appointment, AppointmentForm, AppointmentPatch, CheckInForm, ContactForm, EducationalItem,
    EmergencyContact, Profile, SafetyAlert, SymptomEntry,
};
use crate::rules;
use crate::session::SessionContext;

/// Collections that failed to load. Each failed collection is left empty.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub failures: Vec<Error>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct HealthRecordStore {
    backend: Arc<dyn HealthBackend>,
    owner: Option<String>,
    /// Newest first
    symptoms: Vec<SymptomEntry>,
    /// Earliest first
    appointments: Vec<Appointment>,
    contacts: Vec<EmergencyContact>,
    recent_symptom_days: i64,
    alert_lookback: Duration,
}

impl HealthRecordStore {
    pub fn new(backend: Arc<dyn HealthBackend>) -> Self {
        Self {
            backend,
            owner: None,
            symptoms: Vec::new(),
            appointments: Vec::new(),
            contacts: Vec::new(),
            recent_symptom_days: 7,
            alert_lookback: Duration::days(1),
        }
    }

    /// Take the recent-symptom and alert windows from `config`
    pub fn with_config(mut self, config: &MatriConfig) -> Self {
        self.recent_symptom_days = config.recent_symptom_days;
        self.alert_lookback = rules::days_window(config.alert_lookback_days);
        self
    }

    /// Replace the snapshot with the owner's records. Collections that fail
    /// to load are logged, left empty and reported; nothing is retried.
    pub async fn load(&mut self, ctx: &SessionContext) -> LoadReport {
        self.clear();
        self.owner = Some(ctx.user_id.clone());
        let mut report = LoadReport::default();

        match self.backend.list_symptoms(ctx).await {
            Ok(symptoms) => self.symptoms = symptoms,
            Err(e) => report.failures.push(read_failure(Collection::Symptoms, e)),
        }
        match self.backend.list_appointments(ctx).await {
            Ok(mut appointments) => {
                sort_appointments(&mut appointments);
                self.appointments = appointments;
            }
            Err(e) => report.failures.push(read_failure(Collection::Appointments, e)),
        }
        match self.backend.list_contacts(ctx).await {
            Ok(contacts) => self.contacts = contacts,
            Err(e) => report
                .failures
                .push(read_failure(Collection::EmergencyContacts, e)),
        }

        info!(
            user_id = %ctx.user_id,
            symptoms = self.symptoms.len(),
            appointments = self.appointments.len(),
            contacts = self.contacts.len(),
            failed = report.failures.len(),
            "records loaded"
        );
        report
    }

    /// Forget the owner and every record
    pub fn clear(&mut self) {
        self.owner = None;
        self.symptoms.clear();
        self.appointments.clear();
        self.contacts.clear();
    }

    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    pub fn symptoms(&self) -> &[SymptomEntry] {
        &self.symptoms
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn emergency_contacts(&self) -> &[EmergencyContact] {
        &self.contacts
    }

    fn require_owner(&self, ctx: &SessionContext) -> Result<()> {
        match self.owner.as_deref() {
            Some(owner) if owner == ctx.user_id => Ok(()),
            Some(owner) => {
                warn!(loaded = %owner, caller = %ctx.user_id, "store loaded for another user");
                Err(Error::NotSignedIn)
            }
            None => Err(Error::NotSignedIn),
        }
    }

    /// Record a check-in logged at `now`
    pub async fn add_symptom_entry(
        &mut self,
        ctx: &SessionContext,
        form: &CheckInForm,
        now: DateTime<Utc>,
    ) -> Result<&SymptomEntry> {
        let check_in = form.validate(now)?;
        self.require_owner(ctx)?;

        let entry = self
            .backend
            .insert_check_in(ctx, &check_in)
            .await
            .map_err(|e| write_failure(Collection::Symptoms, e))?;

        debug!(id = %entry.id, tags = entry.tags.len(), "check-in saved");
        self.symptoms.insert(0, entry);
        Ok(&self.symptoms[0])
    }

    pub async fn add_appointment(
        &mut self,
        ctx: &SessionContext,
        form: &AppointmentForm,
    ) -> Result<&Appointment> {
        let appointment = form.validate()?;
        self.require_owner(ctx)?;

        let stored = self
            .backend
            .insert_appointment(ctx, &appointment)
            .await
            .map_err(|e| write_failure(Collection::Appointments, e))?;

        debug!(id = %stored.id, "appointment saved");
        let id = stored.id.clone();
        self.appointments.push(stored);
        sort_appointments(&mut self.appointments);
        self.find_appointment(&id)
    }

    /// Apply a partial update. The id must be in the snapshot; unknown ids
    /// fail before anything is sent.
    pub async fn update_appointment(
        &mut self,
        ctx: &SessionContext,
        id: &str,
        patch: &AppointmentPatch,
    ) -> Result<&Appointment> {
        patch.validate()?;
        self.require_owner(ctx)?;

        let index = self.appointment_index(id)?;
        if patch.is_empty() {
            return Ok(&self.appointments[index]);
        }

        let stored = self
            .backend
            .update_appointment(ctx, &self.appointments[index], patch)
            .await
            .map_err(|e| write_failure(Collection::Appointments, e))?
            .ok_or_else(|| not_found(Collection::Appointments, id))?;

        debug!(id = %id, "appointment updated");
        self.appointments[index] = stored;
        sort_appointments(&mut self.appointments);
        self.find_appointment(id)
    }

    pub async fn delete_appointment(&mut self, ctx: &SessionContext, id: &str) -> Result<()> {
        self.require_owner(ctx)?;
        self.appointment_index(id)?;

        self.backend
            .delete_appointment(ctx, id)
            .await
            .map_err(|e| write_failure(Collection::Appointments, e))?;

        debug!(id = %id, "appointment deleted");
        self.appointments.retain(|appointment| appointment.id != id);
        Ok(())
    }

    pub async fn add_emergency_contact(
        &mut self,
        ctx: &SessionContext,
        form: &ContactForm,
    ) -> Result<&EmergencyContact> {
        let contact = form.validate()?;
        self.require_owner(ctx)?;

        let stored = self
            .backend
            .insert_contact(ctx, &contact)
            .await
            .map_err(|e| write_failure(Collection::EmergencyContacts, e))?;

        debug!(id = %stored.id, "emergency contact saved");
        self.contacts.push(stored);
        let last = self.contacts.len() - 1;
        Ok(&self.contacts[last])
    }

    pub async fn delete_emergency_contact(&mut self, ctx: &SessionContext, id: &str) -> Result<()> {
        self.require_owner(ctx)?;
        if !self.contacts.iter().any(|contact| contact.id == id) {
            return Err(not_found(Collection::EmergencyContacts, id));
        }

        self.backend
            .delete_contact(ctx, id)
            .await
            .map_err(|e| write_failure(Collection::EmergencyContacts, e))?;

        debug!(id = %id, "emergency contact deleted");
        self.contacts.retain(|contact| contact.id != id);
        Ok(())
    }

    /// Check-ins within the configured window, newest first
    pub fn recent_symptoms(&self, now: DateTime<Utc>) -> Vec<&SymptomEntry> {
        rules::recent_symptoms(&self.symptoms, now, self.recent_symptom_days)
    }

    pub fn recent_symptoms_within(&self, now: DateTime<Utc>, days: i64) -> Vec<&SymptomEntry> {
        rules::recent_symptoms(&self.symptoms, now, days)
    }

    pub fn upcoming_appointments(&self, today: NaiveDate) -> Vec<&Appointment> {
        rules::upcoming_appointments(&self.appointments, today)
    }

    pub fn past_appointments(&self, today: NaiveDate) -> Vec<&Appointment> {
        rules::past_appointments(&self.appointments, today)
    }

    pub fn safety_alert(&self, now: DateTime<Utc>) -> SafetyAlert {
        rules::classify(&self.symptoms, now, self.alert_lookback)
    }

    /// Bundled catalog items for `profile`
    pub fn educational_content(&self, profile: Option<&Profile>) -> Vec<&'static EducationalItem> {
        rules::select_content(profile, &CATALOG)
    }

    fn appointment_index(&self, id: &str) -> Result<usize> {
        self.appointments
            .iter()
            .position(|appointment| appointment.id == id)
            .ok_or_else(|| not_found(Collection::Appointments, id))
    }

    fn find_appointment(&self, id: &str) -> Result<&Appointment> {
        let index = self.appointment_index(id)?;
        Ok(&self.appointments[index])
    }
}

fn sort_appointments(appointments: &mut [Appointment]) {
    appointments.sort_by(|a, b| {
        a.scheduled_at()
            .cmp(&b.scheduled_at())
            .then_with(|| a.id.cmp(&b.id))
    });
}

fn read_failure(collection: Collection, source: matri_postgrest::PostgrestError) -> Error {
    error!(%collection, error = %source, "failed to load records");
    Error::remote_read(collection, source)
}

fn write_failure(collection: Collection, source: matri_postgrest::PostgrestError) -> Error {
    warn!(%collection, error = %source, "write rejected, snapshot unchanged");
    Error::remote_write(collection, source)
}

fn not_found(collection: Collection, id: &str) -> Error {
    Error::NotFound {
        collection,
        id: id.to_string(),
    }
}
