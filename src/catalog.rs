//! Educational content bundled with the library

use crate::model::{ContentCategory, ContentStage, EducationalItem, WeekRange};

/// Bumped whenever items are added, removed, or reordered
pub const CATALOG_VERSION: u32 = 1;

pub static CATALOG: [EducationalItem; 8] = [
    EducationalItem {
        id: "1",
        title: "Preparing Your Body",
        description: "Essential vitamins and nutrients for conception",
        stage: ContentStage::PrePregnancy,
        weeks: None,
        category: ContentCategory::Nutrition,
        icon: "🥗",
    },
    EducationalItem {
        id: "2",
        title: "Gentle Movement",
        description: "Safe exercises to boost fertility and wellbeing",
        stage: ContentStage::PrePregnancy,
        weeks: None,
        category: ContentCategory::Exercise,
        icon: "🧘‍♀️",
    },
    EducationalItem {
        id: "3",
        title: "First Trimester Tips",
        description: "What to expect in weeks 1-12",
        stage: ContentStage::Pregnancy,
        weeks: Some(WeekRange::new(1, 12)),
        category: ContentCategory::BabyDevelopment,
        icon: "🌱",
    },
    EducationalItem {
        id: "4",
        title: "Growing Together",
        description: "Your baby's development in weeks 13-26",
        stage: ContentStage::Pregnancy,
        weeks: Some(WeekRange::new(13, 26)),
        category: ContentCategory::BabyDevelopment,
        icon: "🦋",
    },
    EducationalItem {
        id: "5",
        title: "Preparing for Birth",
        description: "Getting ready for the big day",
        stage: ContentStage::Pregnancy,
        weeks: Some(WeekRange::new(27, 42)),
        category: ContentCategory::SelfCare,
        icon: "🌸",
    },
    EducationalItem {
        id: "6",
        title: "Postpartum Recovery",
        description: "Caring for yourself after birth",
        stage: ContentStage::Postpartum,
        weeks: None,
        category: ContentCategory::SelfCare,
        icon: "💖",
    },
    EducationalItem {
        id: "7",
        title: "Mental Wellness",
        description: "Nurturing your emotional health",
        stage: ContentStage::All,
        weeks: None,
        category: ContentCategory::MentalHealth,
        icon: "🧠",
    },
    EducationalItem {
        id: "8",
        title: "Nutrition Guide",
        description: "Eating well for you and baby",
        stage: ContentStage::Pregnancy,
        weeks: None,
        category: ContentCategory::Nutrition,
        icon: "🍎",
    },
];

pub fn find(id: &str) -> Option<&'static EducationalItem> {
    CATALOG.iter().find(|item| item.id == id)
}
