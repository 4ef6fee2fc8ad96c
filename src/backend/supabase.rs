use async_trait::async_trait;
use matri_postgrest::{PostgrestClient, PostgrestError, SortOrder};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::HealthBackend;
use crate::config::MatriConfig;
use crate::error::Collection;
use crate::mapping::appointments::{self, AppointmentRow};
use crate::mapping::contacts::{self, ContactRow};
use crate::mapping::profiles::{profile_from_row, ProfileChanges, ProfileRow};
use crate::mapping::symptoms::{self, SymptomRow};
use crate::model::{
    Appointment, AppointmentPatch, CheckIn, EmergencyContact, NewAppointment,
    NewEmergencyContact, Profile, SymptomEntry,
};
use crate::session::SessionContext;

/// PostgREST tables of a Supabase project
#[derive(Debug, Clone)]
pub struct SupabaseBackend {
    base_url: String,
    anon_key: String,
    http_client: Client,
}

impl SupabaseBackend {
    pub fn new(config: &MatriConfig, http_client: Client) -> Self {
        Self {
            base_url: config.base_url().to_string(),
            anon_key: config.anon_key.clone(),
            http_client,
        }
    }

    /// Client for `collection`, authorised as the session owner
    fn from(&self, collection: Collection, ctx: &SessionContext) -> Result<PostgrestClient, PostgrestError> {
        PostgrestClient::new(
            &self.base_url,
            &self.anon_key,
            collection.table(),
            self.http_client.clone(),
        )
        .with_auth(&ctx.access_token)
    }
}

/// Rows from a `return=representation` body; an empty body means no rows
fn rows<T: DeserializeOwned>(value: Value) -> Result<Vec<T>, PostgrestError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(_) => serde_json::from_value(value).map_err(PostgrestError::SerializationError),
        single => serde_json::from_value::<T>(single)
            .map(|row| vec![row])
            .map_err(PostgrestError::SerializationError),
    }
}

fn first_row<T: DeserializeOwned>(value: Value, table: &str) -> Result<T, PostgrestError> {
    rows::<T>(value)?.into_iter().next().ok_or_else(|| {
        PostgrestError::DeserializationError(format!("No row returned after insert into {}", table))
    })
}

#[async_trait]
impl HealthBackend for SupabaseBackend {
    async fn list_symptoms(&self, ctx: &SessionContext) -> Result<Vec<SymptomEntry>, PostgrestError> {
        let rows = self
            .from(Collection::Symptoms, ctx)?
            .select("*")
            .eq("user_id", &ctx.user_id)
            .order("created_at", SortOrder::Descending)
            .execute::<SymptomRow>()
            .await?;
        debug!(rows = rows.len(), "fetched symptom rows");
        Ok(symptoms::entries_from_rows(rows))
    }

    async fn insert_check_in(
        &self,
        ctx: &SessionContext,
        check_in: &CheckIn,
    ) -> Result<SymptomEntry, PostgrestError> {
        let new_rows = symptoms::check_in_rows(&ctx.user_id, check_in);
        let inserted = self
            .from(Collection::Symptoms, ctx)?
            .insert(&new_rows)
            .await?;
        let stored: Vec<SymptomRow> = rows(inserted)?;

        symptoms::entries_from_rows(stored)
            .into_iter()
            .next()
            .ok_or_else(|| {
                PostgrestError::DeserializationError(
                    "No row returned after insert into symptoms_log".to_string(),
                )
            })
    }

    async fn list_appointments(&self, ctx: &SessionContext) -> Result<Vec<Appointment>, PostgrestError> {
        let rows = self
            .from(Collection::Appointments, ctx)?
            .select("*")
            .eq("user_id", &ctx.user_id)
            .order("appointment_date", SortOrder::Ascending)
            .execute::<AppointmentRow>()
            .await?;
        rows.into_iter()
            .map(|row| Appointment::try_from(row).map_err(PostgrestError::from))
            .collect()
    }

    async fn insert_appointment(
        &self,
        ctx: &SessionContext,
        appointment: &NewAppointment,
    ) -> Result<Appointment, PostgrestError> {
        let inserted = self
            .from(Collection::Appointments, ctx)?
            .insert(appointments::new_row(&ctx.user_id, appointment))
            .await?;
        let row: AppointmentRow = first_row(inserted, Collection::Appointments.table())?;
        Ok(Appointment::try_from(row)?)
    }

    async fn update_appointment(
        &self,
        ctx: &SessionContext,
        current: &Appointment,
        patch: &AppointmentPatch,
    ) -> Result<Option<Appointment>, PostgrestError> {
        let changes = appointments::changes(current, patch);
        let updated = self
            .from(Collection::Appointments, ctx)?
            .eq("id", &current.id)
            .eq("user_id", &ctx.user_id)
            .update(changes)
            .await?;
        match rows::<AppointmentRow>(updated)?.into_iter().next() {
            Some(row) => Ok(Some(Appointment::try_from(row)?)),
            None => Ok(None),
        }
    }

    async fn delete_appointment(&self, ctx: &SessionContext, id: &str) -> Result<(), PostgrestError> {
        self.from(Collection::Appointments, ctx)?
            .eq("id", id)
            .eq("user_id", &ctx.user_id)
            .delete()
            .await?;
        Ok(())
    }

    async fn list_contacts(&self, ctx: &SessionContext) -> Result<Vec<EmergencyContact>, PostgrestError> {
        let rows = self
            .from(Collection::EmergencyContacts, ctx)?
            .select("*")
            .eq("user_id", &ctx.user_id)
            .execute::<ContactRow>()
            .await?;
        Ok(rows.into_iter().map(EmergencyContact::from).collect())
    }

    async fn insert_contact(
        &self,
        ctx: &SessionContext,
        contact: &NewEmergencyContact,
    ) -> Result<EmergencyContact, PostgrestError> {
        let inserted = self
            .from(Collection::EmergencyContacts, ctx)?
            .insert(contacts::new_row(&ctx.user_id, contact))
            .await?;
        let row: ContactRow = first_row(inserted, Collection::EmergencyContacts.table())?;
        Ok(row.into())
    }

    async fn delete_contact(&self, ctx: &SessionContext, id: &str) -> Result<(), PostgrestError> {
        self.from(Collection::EmergencyContacts, ctx)?
            .eq("id", id)
            .eq("user_id", &ctx.user_id)
            .delete()
            .await?;
        Ok(())
    }

    async fn fetch_profile(&self, ctx: &SessionContext) -> Result<Option<Profile>, PostgrestError> {
        let row = self
            .from(Collection::Profiles, ctx)?
            .select("*")
            .eq("id", &ctx.user_id)
            .maybe_single::<ProfileRow>()
            .await?;
        Ok(row.map(|row| profile_from_row(row, ctx.email.clone())))
    }

    async fn update_profile(
        &self,
        ctx: &SessionContext,
        before: &Profile,
        after: &Profile,
    ) -> Result<Option<Profile>, PostgrestError> {
        let changes = ProfileChanges::between(before, after);
        let updated = self
            .from(Collection::Profiles, ctx)?
            .eq("id", &ctx.user_id)
            .update(changes)
            .await?;
        Ok(rows::<ProfileRow>(updated)?
            .into_iter()
            .next()
            .map(|row| profile_from_row(row, ctx.email.clone())))
    }
}
