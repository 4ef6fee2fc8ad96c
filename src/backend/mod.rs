//! Remote persistence behind the record store.
//!
//! Every method is scoped to the owner in the [`SessionContext`] and returns
//! model values; row translation happens inside the implementation.

mod supabase;

pub use supabase::SupabaseBackend;

use async_trait::async_trait;
use matri_postgrest::PostgrestError;

use crate::model::{
    Appointment, AppointmentPatch, CheckIn, EmergencyContact, NewAppointment,
    NewEmergencyContact, Profile, SymptomEntry,
};
use crate::session::SessionContext;

#[async_trait]
pub trait HealthBackend: Send + Sync {
    /// Check-ins, newest first
    async fn list_symptoms(&self, ctx: &SessionContext) -> Result<Vec<SymptomEntry>, PostgrestError>;

    /// Persist a check-in and return it as stored
    async fn insert_check_in(
        &self,
        ctx: &SessionContext,
        check_in: &CheckIn,
    ) -> Result<SymptomEntry, PostgrestError>;

    /// Appointments, earliest first
    async fn list_appointments(&self, ctx: &SessionContext) -> Result<Vec<Appointment>, PostgrestError>;

    async fn insert_appointment(
        &self,
        ctx: &SessionContext,
        appointment: &NewAppointment,
    ) -> Result<Appointment, PostgrestError>;

    /// `None` when no row with that id is visible to the owner
    async fn update_appointment(
        &self,
        ctx: &SessionContext,
        current: &Appointment,
        patch: &AppointmentPatch,
    ) -> Result<Option<Appointment>, PostgrestError>;

    async fn delete_appointment(&self, ctx: &SessionContext, id: &str) -> Result<(), PostgrestError>;

    async fn list_contacts(&self, ctx: &SessionContext) -> Result<Vec<EmergencyContact>, PostgrestError>;

    async fn insert_contact(
        &self,
        ctx: &SessionContext,
        contact: &NewEmergencyContact,
    ) -> Result<EmergencyContact, PostgrestError>;

    async fn delete_contact(&self, ctx: &SessionContext, id: &str) -> Result<(), PostgrestError>;

    /// The owner's profile row, if one exists yet
    async fn fetch_profile(&self, ctx: &SessionContext) -> Result<Option<Profile>, PostgrestError>;

    /// Write the columns that differ between `before` and `after`
    async fn update_profile(
        &self,
        ctx: &SessionContext,
        before: &Profile,
        after: &Profile,
    ) -> Result<Option<Profile>, PostgrestError>;
}
