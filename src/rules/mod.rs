//! Pure rules over the profile and the record snapshot.
//!
//! Nothing in here performs I/O, mutates its input, or returns an error.

pub mod alerts;
pub mod content;
pub mod recency;

pub use alerts::{classify, classify_tags, MODERATE_THRESHOLD};
pub use content::select_content;
pub use recency::{past_appointments, recent_symptoms, upcoming_appointments};

use chrono::{DateTime, Duration, Utc};

/// A window of `days` whole days. Negative counts are empty and counts too
/// large for `Duration` saturate.
pub fn days_window(days: i64) -> Duration {
    Duration::try_days(days.max(0)).unwrap_or(Duration::MAX)
}

/// Earliest instant inside a window of `lookback` ending at `now`. A window
/// reaching past the representable range is unbounded.
pub(crate) fn window_start(now: DateTime<Utc>, lookback: Duration) -> DateTime<Utc> {
    now.checked_sub_signed(lookback)
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
