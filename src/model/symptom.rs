//! Symptom check-ins and mood

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::taxonomy::SymptomTag;

/// Self-reported wellbeing, ordered from lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Difficult,
    Low,
    Okay,
    Good,
    Great,
}

impl Mood {
    pub const ALL: [Mood; 5] = [Mood::Great, Mood::Good, Mood::Okay, Mood::Low, Mood::Difficult];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Difficult => "difficult",
            Mood::Low => "low",
            Mood::Okay => "okay",
            Mood::Good => "good",
            Mood::Great => "great",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "difficult" => Some(Mood::Difficult),
            "low" => Some(Mood::Low),
            "okay" => Some(Mood::Okay),
            "good" => Some(Mood::Good),
            "great" => Some(Mood::Great),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mood::Difficult => "Difficult",
            Mood::Low => "Low",
            Mood::Okay => "Okay",
            Mood::Good => "Good",
            Mood::Great => "Great",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomEntry {
    pub id: String,
    pub owner_id: String,
    pub logged_at: DateTime<Utc>,
    /// In the order the user picked them, without duplicates
    pub tags: Vec<SymptomTag>,
    pub notes: Option<String>,
    pub mood: Mood,
}

impl SymptomEntry {
    pub fn has_tag(&self, tag: &SymptomTag) -> bool {
        self.tags.contains(tag)
    }

    /// Adds `tag` unless already present
    pub(crate) fn push_tag(&mut self, tag: SymptomTag) {
        if !self.has_tag(&tag) {
            self.tags.push(tag);
        }
    }
}

/// Raw check-in form input
#[derive(Debug, Clone, Default)]
pub struct CheckInForm {
    pub mood: Option<Mood>,
    pub tags: Vec<String>,
    pub notes: String,
}

/// A validated check-in, ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct CheckIn {
    pub logged_at: DateTime<Utc>,
    pub mood: Mood,
    pub tags: Vec<SymptomTag>,
    pub notes: Option<String>,
}

impl CheckInForm {
    pub fn validate(&self, logged_at: DateTime<Utc>) -> Result<CheckIn, ValidationError> {
        let mood = self.mood.ok_or_else(|| {
            ValidationError::new("How are you feeling?", "Please select your mood first")
        })?;

        let mut tags: Vec<SymptomTag> = Vec::with_capacity(self.tags.len());
        for raw in &self.tags {
            let tag = SymptomTag::parse(raw);
            if !tag.is_known() {
                return Err(ValidationError::new(
                    "Unrecognised symptom",
                    format!("\"{}\" is not a symptom we can track", raw.trim()),
                ));
            }
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }

        Ok(CheckIn {
            logged_at,
            mood,
            tags,
            notes: non_empty(&self.notes),
        })
    }
}

pub(crate) fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 30, 0).unwrap()
    }

    #[test]
    fn mood_order_is_low_to_high() {
        assert!(Mood::Difficult < Mood::Low);
        assert!(Mood::Low < Mood::Okay);
        assert!(Mood::Okay < Mood::Good);
        assert!(Mood::Good < Mood::Great);
    }

    #[test]
    fn mood_parse_is_lenient_about_case() {
        assert_eq!(Mood::parse("Great"), Some(Mood::Great));
        assert_eq!(Mood::parse(" low "), Some(Mood::Low));
        assert_eq!(Mood::parse("ecstatic"), None);
    }

    #[test]
    fn check_in_requires_mood() {
        let form = CheckInForm {
            mood: None,
            tags: vec!["nausea".to_string()],
            notes: String::new(),
        };
        let err = form.validate(now()).unwrap_err();
        assert_eq!(err.title, "How are you feeling?");
    }

    #[test]
    fn check_in_without_tags_is_valid() {
        let form = CheckInForm {
            mood: Some(Mood::Good),
            ..Default::default()
        };
        let check_in = form.validate(now()).unwrap();
        assert!(check_in.tags.is_empty());
        assert_eq!(check_in.notes, None);
        assert_eq!(check_in.logged_at, now());
    }

    #[test]
    fn check_in_dedupes_tags_and_trims_notes() {
        let form = CheckInForm {
            mood: Some(Mood::Low),
            tags: vec![
                "nausea".to_string(),
                "fatigue".to_string(),
                "nausea".to_string(),
            ],
            notes: "  slept badly ".to_string(),
        };
        let check_in = form.validate(now()).unwrap();
        assert_eq!(check_in.tags, vec![SymptomTag::Nausea, SymptomTag::Fatigue]);
        assert_eq!(check_in.notes.as_deref(), Some("slept badly"));
    }

    #[test]
    fn check_in_rejects_unknown_tags() {
        let form = CheckInForm {
            mood: Some(Mood::Okay),
            tags: vec!["hiccups".to_string()],
            notes: String::new(),
        };
        assert!(form.validate(now()).is_err());
    }
}
