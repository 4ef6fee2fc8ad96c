//! Symptom tags, their display groups, and the alert tag lists.
//!
//! Tags arrive as strings from check-in forms and from the remote store.
//! They are parsed once at that boundary into [`SymptomTag`]; anything not in
//! the taxonomy becomes [`SymptomTag::Unknown`] so downstream code can ignore
//! it explicitly.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ids of tags where any single match raises a severe alert
pub const SEVERE_TAGS: [&str; 5] = [
    "severe_headache",
    "vision_changes",
    "severe_abdominal_pain",
    "heavy_bleeding",
    "no_fetal_movement",
];

/// Ids of tags where two or more matches raise a moderate alert
pub const MODERATE_TAGS: [&str; 4] = ["persistent_vomiting", "high_fever", "swelling", "chest_pain"];

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SymptomTag {
    Fatigue,
    Nausea,
    Headache,
    BackPain,
    Cramping,
    Swelling,
    BreastTenderness,
    FoodCravings,
    FoodAversion,
    Heartburn,
    Constipation,
    Bloating,
    MoodSwings,
    Anxiety,
    Irritability,
    CryingSpells,
    Insomnia,
    VividDreams,
    FrequentUrination,
    SevereHeadache,
    VisionChanges,
    SevereAbdominalPain,
    HeavyBleeding,
    NoFetalMovement,
    PersistentVomiting,
    HighFever,
    ChestPain,
    /// A tag outside the taxonomy, kept verbatim
    Unknown(String),
}

impl SymptomTag {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "fatigue" => SymptomTag::Fatigue,
            "nausea" => SymptomTag::Nausea,
            "headache" => SymptomTag::Headache,
            "back_pain" => SymptomTag::BackPain,
            "cramping" => SymptomTag::Cramping,
            "swelling" => SymptomTag::Swelling,
            "breast_tenderness" => SymptomTag::BreastTenderness,
            "food_cravings" => SymptomTag::FoodCravings,
            "food_aversion" => SymptomTag::FoodAversion,
            "heartburn" => SymptomTag::Heartburn,
            "constipation" => SymptomTag::Constipation,
            "bloating" => SymptomTag::Bloating,
            "mood_swings" => SymptomTag::MoodSwings,
            "anxiety" => SymptomTag::Anxiety,
            "irritability" => SymptomTag::Irritability,
            "crying_spells" => SymptomTag::CryingSpells,
            "insomnia" => SymptomTag::Insomnia,
            "vivid_dreams" => SymptomTag::VividDreams,
            "frequent_urination" => SymptomTag::FrequentUrination,
            "severe_headache" => SymptomTag::SevereHeadache,
            "vision_changes" => SymptomTag::VisionChanges,
            "severe_abdominal_pain" => SymptomTag::SevereAbdominalPain,
            "heavy_bleeding" => SymptomTag::HeavyBleeding,
            "no_fetal_movement" => SymptomTag::NoFetalMovement,
            "persistent_vomiting" => SymptomTag::PersistentVomiting,
            "high_fever" => SymptomTag::HighFever,
            "chest_pain" => SymptomTag::ChestPain,
            other => SymptomTag::Unknown(other.to_string()),
        }
    }

    /// The wire id, e.g. `back_pain`
    pub fn as_str(&self) -> &str {
        match self {
            SymptomTag::Fatigue => "fatigue",
            SymptomTag::Nausea => "nausea",
            SymptomTag::Headache => "headache",
            SymptomTag::BackPain => "back_pain",
            SymptomTag::Cramping => "cramping",
            SymptomTag::Swelling => "swelling",
            SymptomTag::BreastTenderness => "breast_tenderness",
            SymptomTag::FoodCravings => "food_cravings",
            SymptomTag::FoodAversion => "food_aversion",
            SymptomTag::Heartburn => "heartburn",
            SymptomTag::Constipation => "constipation",
            SymptomTag::Bloating => "bloating",
            SymptomTag::MoodSwings => "mood_swings",
            SymptomTag::Anxiety => "anxiety",
            SymptomTag::Irritability => "irritability",
            SymptomTag::CryingSpells => "crying_spells",
            SymptomTag::Insomnia => "insomnia",
            SymptomTag::VividDreams => "vivid_dreams",
            SymptomTag::FrequentUrination => "frequent_urination",
            SymptomTag::SevereHeadache => "severe_headache",
            SymptomTag::VisionChanges => "vision_changes",
            SymptomTag::SevereAbdominalPain => "severe_abdominal_pain",
            SymptomTag::HeavyBleeding => "heavy_bleeding",
            SymptomTag::NoFetalMovement => "no_fetal_movement",
            SymptomTag::PersistentVomiting => "persistent_vomiting",
            SymptomTag::HighFever => "high_fever",
            SymptomTag::ChestPain => "chest_pain",
            SymptomTag::Unknown(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            SymptomTag::Fatigue => "Fatigue",
            SymptomTag::Nausea => "Nausea",
            SymptomTag::Headache => "Headache",
            SymptomTag::BackPain => "Back pain",
            SymptomTag::Cramping => "Cramping",
            SymptomTag::Swelling => "Swelling",
            SymptomTag::BreastTenderness => "Breast tenderness",
            SymptomTag::FoodCravings => "Food cravings",
            SymptomTag::FoodAversion => "Food aversion",
            SymptomTag::Heartburn => "Heartburn",
            SymptomTag::Constipation => "Constipation",
            SymptomTag::Bloating => "Bloating",
            SymptomTag::MoodSwings => "Mood swings",
            SymptomTag::Anxiety => "Anxiety",
            SymptomTag::Irritability => "Irritability",
            SymptomTag::CryingSpells => "Crying spells",
            SymptomTag::Insomnia => "Insomnia",
            SymptomTag::VividDreams => "Vivid dreams",
            SymptomTag::FrequentUrination => "Frequent urination",
            SymptomTag::SevereHeadache => "Severe headache",
            SymptomTag::VisionChanges => "Vision changes",
            SymptomTag::SevereAbdominalPain => "Severe abdominal pain",
            SymptomTag::HeavyBleeding => "Heavy bleeding",
            SymptomTag::NoFetalMovement => "No fetal movement",
            SymptomTag::PersistentVomiting => "Persistent vomiting",
            SymptomTag::HighFever => "High fever",
            SymptomTag::ChestPain => "Chest pain",
            SymptomTag::Unknown(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, SymptomTag::Unknown(_))
    }

    pub fn is_severe(&self) -> bool {
        matches!(
            self,
            SymptomTag::SevereHeadache
                | SymptomTag::VisionChanges
                | SymptomTag::SevereAbdominalPain
                | SymptomTag::HeavyBleeding
                | SymptomTag::NoFetalMovement
        )
    }

    pub fn is_moderate(&self) -> bool {
        matches!(
            self,
            SymptomTag::PersistentVomiting
                | SymptomTag::HighFever
                | SymptomTag::Swelling
                | SymptomTag::ChestPain
        )
    }

    /// Display group on the check-in form. Alert-only tags have none.
    pub fn group(&self) -> Option<SymptomGroup> {
        SymptomGroup::ALL
            .into_iter()
            .find(|group| group.tags().contains(self))
    }
}

impl From<String> for SymptomTag {
    fn from(raw: String) -> Self {
        SymptomTag::parse(&raw)
    }
}

impl From<SymptomTag> for String {
    fn from(tag: SymptomTag) -> Self {
        match tag {
            SymptomTag::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for SymptomTag {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(SymptomTag::parse(s))
    }
}

impl fmt::Display for SymptomTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sections of the check-in form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymptomGroup {
    Physical,
    Digestive,
    Emotional,
    Sleep,
    Concerning,
}

impl SymptomGroup {
    pub const ALL: [SymptomGroup; 5] = [
        SymptomGroup::Physical,
        SymptomGroup::Digestive,
        SymptomGroup::Emotional,
        SymptomGroup::Sleep,
        SymptomGroup::Concerning,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            SymptomGroup::Physical => "Physical",
            SymptomGroup::Digestive => "Digestive",
            SymptomGroup::Emotional => "Emotional",
            SymptomGroup::Sleep => "Sleep",
            SymptomGroup::Concerning => "Concerning (Please note)",
        }
    }

    pub fn tags(&self) -> Vec<SymptomTag> {
        match self {
            SymptomGroup::Physical => vec![
                SymptomTag::Fatigue,
                SymptomTag::Nausea,
                SymptomTag::Headache,
                SymptomTag::BackPain,
                SymptomTag::Cramping,
                SymptomTag::Swelling,
                SymptomTag::BreastTenderness,
            ],
            SymptomGroup::Digestive => vec![
                SymptomTag::FoodCravings,
                SymptomTag::FoodAversion,
                SymptomTag::Heartburn,
                SymptomTag::Constipation,
                SymptomTag::Bloating,
            ],
            SymptomGroup::Emotional => vec![
                SymptomTag::MoodSwings,
                SymptomTag::Anxiety,
                SymptomTag::Irritability,
                SymptomTag::CryingSpells,
            ],
            SymptomGroup::Sleep => vec![
                SymptomTag::Insomnia,
                SymptomTag::VividDreams,
                SymptomTag::FrequentUrination,
            ],
            SymptomGroup::Concerning => vec![
                SymptomTag::SevereHeadache,
                SymptomTag::VisionChanges,
                SymptomTag::SevereAbdominalPain,
                SymptomTag::HeavyBleeding,
                SymptomTag::NoFetalMovement,
            ],
        }
    }
}
