//! The signed-in user's profile

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::symptom::non_empty;
use crate::error::ValidationError;

pub const MIN_GESTATIONAL_WEEK: u8 = 1;
pub const MAX_GESTATIONAL_WEEK: u8 = 42;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaternalStage {
    PrePregnancy,
    Pregnancy,
    Postpartum,
}

impl MaternalStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaternalStage::PrePregnancy => "pre-pregnancy",
            MaternalStage::Pregnancy => "pregnancy",
            MaternalStage::Postpartum => "postpartum",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "pre-pregnancy" | "pre_pregnancy" => Some(MaternalStage::PrePregnancy),
            "pregnancy" => Some(MaternalStage::Pregnancy),
            "postpartum" => Some(MaternalStage::Postpartum),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "low" => Some(RiskLevel::Low),
            "medium" => Some(RiskLevel::Medium),
            "high" => Some(RiskLevel::High),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub email: Option<String>,
    pub display_name: String,
    /// `None` while the user has not picked a stage
    pub stage: Option<MaternalStage>,
    /// Only ever set while `stage` is pregnancy
    pub gestational_week: Option<u8>,
    pub risk_level: RiskLevel,
    pub age: Option<u32>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Profile {
    pub fn new<I: Into<String>, N: Into<String>>(id: I, display_name: N) -> Self {
        Self {
            id: id.into(),
            email: None,
            display_name: display_name.into(),
            stage: None,
            gestational_week: None,
            risk_level: RiskLevel::Low,
            age: None,
            created_at: None,
        }
    }

    pub fn in_pregnancy(mut self, week: Option<u8>) -> Self {
        self.stage = Some(MaternalStage::Pregnancy);
        self.gestational_week = week;
        self
    }

    pub fn in_stage(mut self, stage: MaternalStage) -> Self {
        self.stage = Some(stage);
        if stage != MaternalStage::Pregnancy {
            self.gestational_week = None;
        }
        self
    }

    pub fn stage_label(&self) -> String {
        match (self.stage, self.gestational_week) {
            (Some(MaternalStage::Pregnancy), Some(week)) => format!("Week {} of pregnancy", week),
            (Some(MaternalStage::PrePregnancy), _) => "Preparing for pregnancy".to_string(),
            (Some(MaternalStage::Postpartum), _) => "Postpartum journey".to_string(),
            _ => "Your journey".to_string(),
        }
    }
}

/// Partial profile update; `None` leaves a field alone
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfilePatch {
    pub display_name: Option<String>,
    pub age: Option<u32>,
    pub stage: Option<MaternalStage>,
    pub gestational_week: Option<u8>,
    pub risk_level: Option<RiskLevel>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        *self == ProfilePatch::default()
    }

    /// The profile as it would look after this patch, or why the patch is
    /// not acceptable. Moving out of pregnancy drops the gestational week.
    pub fn apply_to(&self, profile: &Profile) -> Result<Profile, ValidationError> {
        let mut next = profile.clone();

        if let Some(name) = &self.display_name {
            next.display_name = non_empty(name).ok_or_else(|| {
                ValidationError::new("Please enter your name", "We'd love to know what to call you")
            })?;
        }
        if let Some(age) = self.age {
            next.age = Some(age);
        }
        if let Some(risk) = self.risk_level {
            next.risk_level = risk;
        }
        if let Some(stage) = self.stage {
            next = next.in_stage(stage);
        }

        if let Some(week) = self.gestational_week {
            if !(MIN_GESTATIONAL_WEEK..=MAX_GESTATIONAL_WEEK).contains(&week) {
                return Err(ValidationError::new(
                    "Please check the week",
                    format!(
                        "Pregnancy week must be between {} and {}",
                        MIN_GESTATIONAL_WEEK, MAX_GESTATIONAL_WEEK
                    ),
                ));
            }
            if next.stage != Some(MaternalStage::Pregnancy) {
                return Err(ValidationError::new(
                    "Please check the week",
                    "A pregnancy week can only be set during pregnancy",
                ));
            }
            next.gestational_week = Some(week);
        }

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_labels() {
        let base = Profile::new("u1", "Ama");
        assert_eq!(base.stage_label(), "Your journey");
        assert_eq!(
            base.clone().in_pregnancy(Some(20)).stage_label(),
            "Week 20 of pregnancy"
        );
        assert_eq!(base.clone().in_pregnancy(None).stage_label(), "Your journey");
        assert_eq!(
            base.clone().in_stage(MaternalStage::PrePregnancy).stage_label(),
            "Preparing for pregnancy"
        );
        assert_eq!(
            base.in_stage(MaternalStage::Postpartum).stage_label(),
            "Postpartum journey"
        );
    }

    #[test]
    fn patch_sets_week_during_pregnancy() {
        let profile = Profile::new("u1", "Ama").in_pregnancy(Some(10));
        let patch = ProfilePatch {
            gestational_week: Some(11),
            ..Default::default()
        };
        let next = patch.apply_to(&profile).unwrap();
        assert_eq!(next.gestational_week, Some(11));
        assert_eq!(profile.gestational_week, Some(10));
    }

    #[test]
    fn patch_rejects_week_out_of_range() {
        let profile = Profile::new("u1", "Ama").in_pregnancy(None);
        for week in [0, 43] {
            let patch = ProfilePatch {
                gestational_week: Some(week),
                ..Default::default()
            };
            assert!(patch.apply_to(&profile).is_err(), "week {}", week);
        }
    }

    #[test]
    fn patch_rejects_week_outside_pregnancy() {
        let profile = Profile::new("u1", "Ama").in_stage(MaternalStage::Postpartum);
        let patch = ProfilePatch {
            gestational_week: Some(12),
            ..Default::default()
        };
        assert!(patch.apply_to(&profile).is_err());

        let patch = ProfilePatch {
            stage: Some(MaternalStage::Pregnancy),
            gestational_week: Some(12),
            ..Default::default()
        };
        let next = patch.apply_to(&profile).unwrap();
        assert_eq!(next.stage, Some(MaternalStage::Pregnancy));
        assert_eq!(next.gestational_week, Some(12));
    }

    #[test]
    fn leaving_pregnancy_clears_week() {
        let profile = Profile::new("u1", "Ama").in_pregnancy(Some(39));
        let patch = ProfilePatch {
            stage: Some(MaternalStage::Postpartum),
            ..Default::default()
        };
        let next = patch.apply_to(&profile).unwrap();
        assert_eq!(next.gestational_week, None);
    }

    #[test]
    fn blank_name_is_rejected() {
        let profile = Profile::new("u1", "Ama");
        let patch = ProfilePatch {
            display_name: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            patch.apply_to(&profile).unwrap_err().title,
            "Please enter your name"
        );
    }

    #[test]
    fn stage_wire_names() {
        assert_eq!(
            MaternalStage::parse("pre-pregnancy"),
            Some(MaternalStage::PrePregnancy)
        );
        assert_eq!(MaternalStage::Postpartum.as_str(), "postpartum");
        assert_eq!(RiskLevel::parse("high"), Some(RiskLevel::High));
        assert_eq!(RiskLevel::parse("extreme"), None);
    }
}
