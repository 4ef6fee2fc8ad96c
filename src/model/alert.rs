use serde::Serialize;

use crate::taxonomy::SymptomTag;

pub const SEVERE_ALERT_MESSAGE: &str = "Please seek medical attention promptly. Some of your symptoms may need immediate evaluation.";
pub const MODERATE_ALERT_MESSAGE: &str =
    "Consider reaching out to your healthcare provider to discuss your symptoms.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    None,
    Moderate,
    Severe,
}

/// Outcome of classifying the latest check-in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SafetyAlert {
    pub triggered: bool,
    pub severity: AlertSeverity,
    pub message: String,
    pub matched_tags: Vec<SymptomTag>,
}

impl SafetyAlert {
    pub fn none() -> Self {
        Self {
            triggered: false,
            severity: AlertSeverity::None,
            message: String::new(),
            matched_tags: Vec::new(),
        }
    }

    pub fn severe(matched_tags: Vec<SymptomTag>) -> Self {
        Self {
            triggered: true,
            severity: AlertSeverity::Severe,
            message: SEVERE_ALERT_MESSAGE.to_string(),
            matched_tags,
        }
    }

    pub fn moderate(matched_tags: Vec<SymptomTag>) -> Self {
        Self {
            triggered: true,
            severity: AlertSeverity::Moderate,
            message: MODERATE_ALERT_MESSAGE.to_string(),
            matched_tags,
        }
    }
}

impl Default for SafetyAlert {
    fn default() -> Self {
        Self::none()
    }
}
