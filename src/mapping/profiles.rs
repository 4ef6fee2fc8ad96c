//! `users_profile` rows
//!
//! Rows written before `maternal_stage` existed have no stage; any positive
//! `pregnancy_week` then means pregnancy.

use serde::{Deserialize, Serialize};

use super::parse_timestamp;
use crate::model::{
    MaternalStage, Profile, RiskLevel, MAX_GESTATIONAL_WEEK, MIN_GESTATIONAL_WEEK,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRow {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<i64>,
    #[serde(default)]
    pub pregnancy_week: Option<i64>,
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(default)]
    pub maternal_stage: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Columns touched by a profile update
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pregnancy_week: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maternal_stage: Option<Option<&'static str>>,
}

impl ProfileChanges {
    /// Columns that differ between `before` and `after`
    pub fn between(before: &Profile, after: &Profile) -> Self {
        let mut changes = ProfileChanges::default();
        if before.display_name != after.display_name {
            changes.name = Some(after.display_name.clone());
        }
        if before.age != after.age {
            changes.age = after.age.map(i64::from);
        }
        if before.gestational_week != after.gestational_week {
            changes.pregnancy_week = Some(after.gestational_week.map(i64::from));
        }
        if before.risk_level != after.risk_level {
            changes.risk_level = Some(after.risk_level.as_str());
        }
        if before.stage != after.stage {
            changes.maternal_stage = Some(after.stage.map(|stage| stage.as_str()));
        }
        changes
    }

    pub fn is_empty(&self) -> bool {
        *self == ProfileChanges::default()
    }
}

pub fn profile_from_row(row: ProfileRow, email: Option<String>) -> Profile {
    let stage = match row.maternal_stage.as_deref() {
        Some(raw) => MaternalStage::parse(raw),
        None => match row.pregnancy_week {
            Some(week) if week > 0 => Some(MaternalStage::Pregnancy),
            _ => None,
        },
    };

    let gestational_week = match stage {
        Some(MaternalStage::Pregnancy) => row
            .pregnancy_week
            .and_then(|week| u8::try_from(week).ok())
            .filter(|week| (MIN_GESTATIONAL_WEEK..=MAX_GESTATIONAL_WEEK).contains(week)),
        _ => None,
    };

    Profile {
        id: row.id,
        email,
        display_name: row.name.unwrap_or_default(),
        stage,
        gestational_week,
        risk_level: row
            .risk_level
            .as_deref()
            .and_then(RiskLevel::parse)
            .unwrap_or_default(),
        age: row.age.and_then(|age| u32::try_from(age).ok()),
        created_at: row.created_at.as_deref().and_then(parse_timestamp),
    }
}
