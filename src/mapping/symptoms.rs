//! `symptoms_log` rows
//!
//! A check-in is stored as one row per tag, all sharing mood, logged date and
//! timestamp; only the first row carries the notes. A check-in without tags
//! is stored as a single marker row. Reading groups rows by logged date.

use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{format_day, format_timestamp, parse_day, parse_timestamp, RowError};
use crate::model::{non_empty, CheckIn, Mood, SymptomEntry};
use crate::taxonomy::SymptomTag;

/// `symptom_type` of a row that records mood only
pub const CHECK_IN_MARKER: &str = "check_in";

const TABLE: &str = "symptoms_log";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomRow {
    pub id: String,
    pub user_id: String,
    pub symptom_type: String,
    #[serde(default)]
    pub severity: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
    pub logged_date: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSymptomRow {
    pub user_id: String,
    pub symptom_type: String,
    pub severity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub logged_date: String,
    pub created_at: String,
}

pub fn mood_to_severity(mood: Mood) -> i64 {
    match mood {
        Mood::Great => 5,
        Mood::Good => 4,
        Mood::Okay => 3,
        Mood::Low => 2,
        Mood::Difficult => 1,
    }
}

/// Missing or out-of-range severities read as okay
pub fn severity_to_mood(severity: Option<i64>) -> Mood {
    match severity {
        Some(5) => Mood::Great,
        Some(4) => Mood::Good,
        Some(2) => Mood::Low,
        Some(1) => Mood::Difficult,
        _ => Mood::Okay,
    }
}

/// Rows to insert for a check-in, in tag order
pub fn check_in_rows(owner_id: &str, check_in: &CheckIn) -> Vec<NewSymptomRow> {
    let severity = mood_to_severity(check_in.mood);
    let logged_date = format_day(check_in.logged_at.date_naive());
    let created_at = format_timestamp(check_in.logged_at);

    let symptom_types: Vec<String> = if check_in.tags.is_empty() {
        vec![CHECK_IN_MARKER.to_string()]
    } else {
        check_in.tags.iter().map(|tag| tag.as_str().to_string()).collect()
    };

    symptom_types
        .into_iter()
        .enumerate()
        .map(|(index, symptom_type)| NewSymptomRow {
            user_id: owner_id.to_string(),
            symptom_type,
            severity,
            notes: if index == 0 { check_in.notes.clone() } else { None },
            logged_date: logged_date.clone(),
            created_at: created_at.clone(),
        })
        .collect()
}

/// Collapse rows into entries, one per logged date.
///
/// Entries come out in the order their first row appears. The first row of
/// a date supplies id, mood and timestamp; tags are unioned and the first
/// non-empty note is kept. A row whose date cannot be read is skipped with a
/// warning so the rest of the history still loads.
pub fn entries_from_rows(rows: Vec<SymptomRow>) -> Vec<SymptomEntry> {
    let mut entries: Vec<SymptomEntry> = Vec::new();
    let mut by_date: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let tag = if row.symptom_type == CHECK_IN_MARKER {
            None
        } else {
            Some(SymptomTag::parse(&row.symptom_type))
        };

        if let Some(&index) = by_date.get(&row.logged_date) {
            let entry = &mut entries[index];
            if let Some(tag) = tag {
                entry.push_tag(tag);
            }
            if entry.notes.is_none() {
                entry.notes = row.notes.as_deref().and_then(non_empty);
            }
            continue;
        }

        let logged_at = match logged_at(&row) {
            Ok(logged_at) => logged_at,
            Err(e) => {
                warn!(error = %e, "skipping symptom row");
                continue;
            }
        };
        by_date.insert(row.logged_date.clone(), entries.len());
        entries.push(SymptomEntry {
            id: row.id,
            owner_id: row.user_id,
            logged_at,
            tags: tag.into_iter().collect(),
            notes: row.notes.as_deref().and_then(non_empty),
            mood: severity_to_mood(row.severity),
        });
    }

    entries
}

/// The row's timestamp, or midnight UTC of its logged date
fn logged_at(row: &SymptomRow) -> Result<DateTime<Utc>, RowError> {
    if let Some(created_at) = row.created_at.as_deref().and_then(parse_timestamp) {
        return Ok(created_at);
    }
    parse_day(&row.logged_date)
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| {
            RowError::new(
                TABLE,
                &row.id,
                format!("unreadable logged_date {:?}", row.logged_date),
            )
        })
}
