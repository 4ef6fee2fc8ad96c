//! In-memory domain model

mod alert;
mod appointment;
mod contact;
mod content;
mod profile;
mod symptom;

pub use alert::{AlertSeverity, SafetyAlert, MODERATE_ALERT_MESSAGE, SEVERE_ALERT_MESSAGE};
pub use appointment::{
    parse_date, parse_time, Appointment, AppointmentCategory, AppointmentForm, AppointmentPatch,
    NewAppointment,
};
pub use contact::{ContactForm, EmergencyContact, NewEmergencyContact};
pub use content::{ContentCategory, ContentStage, EducationalItem, WeekRange};
pub use profile::{
    MaternalStage, Profile, ProfilePatch, RiskLevel, MAX_GESTATIONAL_WEEK, MIN_GESTATIONAL_WEEK,
};
pub use symptom::{CheckIn, CheckInForm, Mood, SymptomEntry};

pub(crate) use symptom::non_empty;
