//! Educational catalog items

use serde::Serialize;

use super::profile::MaternalStage;

/// Which users an item is written for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentStage {
    PrePregnancy,
    Pregnancy,
    Postpartum,
    All,
}

impl ContentStage {
    pub fn matches(&self, stage: MaternalStage) -> bool {
        matches!(
            (self, stage),
            (ContentStage::All, _)
                | (ContentStage::PrePregnancy, MaternalStage::PrePregnancy)
                | (ContentStage::Pregnancy, MaternalStage::Pregnancy)
                | (ContentStage::Postpartum, MaternalStage::Postpartum)
        )
    }
}

impl From<MaternalStage> for ContentStage {
    fn from(stage: MaternalStage) -> Self {
        match stage {
            MaternalStage::PrePregnancy => ContentStage::PrePregnancy,
            MaternalStage::Pregnancy => ContentStage::Pregnancy,
            MaternalStage::Postpartum => ContentStage::Postpartum,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentCategory {
    Nutrition,
    Exercise,
    MentalHealth,
    BabyDevelopment,
    SelfCare,
}

impl ContentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentCategory::Nutrition => "nutrition",
            ContentCategory::Exercise => "exercise",
            ContentCategory::MentalHealth => "mental-health",
            ContentCategory::BabyDevelopment => "baby-development",
            ContentCategory::SelfCare => "self-care",
        }
    }
}

/// Inclusive range of gestational weeks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekRange {
    pub low: u8,
    pub high: u8,
}

impl WeekRange {
    pub const fn new(low: u8, high: u8) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, week: u8) -> bool {
        self.low <= week && week <= self.high
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EducationalItem {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub stage: ContentStage,
    /// Only meaningful for pregnancy items
    pub weeks: Option<WeekRange>,
    pub category: ContentCategory,
    pub icon: &'static str,
}
