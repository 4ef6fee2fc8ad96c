//! Safety-alert classification of the latest check-in

use chrono::{DateTime, Duration, Utc};

use crate::model::{SafetyAlert, SymptomEntry};
use crate::taxonomy::SymptomTag;

/// Moderate tags needed before a moderate alert is raised
pub const MODERATE_THRESHOLD: usize = 2;

/// Classify the most recent entry logged within `lookback` of `now`.
///
/// Only that one entry is considered; older check-ins in the window do not
/// contribute tags. Any severe tag wins over moderate ones. Tags outside the
/// taxonomy never match.
pub fn classify(entries: &[SymptomEntry], now: DateTime<Utc>, lookback: Duration) -> SafetyAlert {
    let since = super::window_start(now, lookback);

    let latest = entries
        .iter()
        .filter(|entry| entry.logged_at >= since && entry.logged_at <= now)
        .max_by(|a, b| {
            a.logged_at
                .cmp(&b.logged_at)
                .then_with(|| a.id.cmp(&b.id))
        });

    match latest {
        Some(entry) => classify_tags(&entry.tags),
        None => SafetyAlert::none(),
    }
}

/// Classify a single candidate tag set
pub fn classify_tags(tags: &[SymptomTag]) -> SafetyAlert {
    let severe = matching(tags, SymptomTag::is_severe);
    if !severe.is_empty() {
        return SafetyAlert::severe(severe);
    }

    let moderate = matching(tags, SymptomTag::is_moderate);
    if moderate.len() >= MODERATE_THRESHOLD {
        return SafetyAlert::moderate(moderate);
    }

    SafetyAlert::none()
}

fn matching(tags: &[SymptomTag], predicate: fn(&SymptomTag) -> bool) -> Vec<SymptomTag> {
    let mut matched: Vec<SymptomTag> = Vec::new();
    for tag in tags.iter().filter(|tag| predicate(*tag)) {
        if !matched.contains(tag) {
            matched.push(tag.clone());
        }
    }
    matched
}
