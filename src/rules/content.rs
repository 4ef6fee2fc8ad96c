//! Stage and week aware selection of educational content

use crate::model::{ContentStage, EducationalItem, Profile};

/// Items relevant to `profile`, in catalog order.
///
/// Without a profile, or with no stage picked, only items for every stage
/// are returned.
pub fn select_content<'a>(
    profile: Option<&Profile>,
    catalog: &'a [EducationalItem],
) -> Vec<&'a EducationalItem> {
    catalog
        .iter()
        .filter(|item| is_relevant(item, profile))
        .collect()
}

pub fn is_relevant(item: &EducationalItem, profile: Option<&Profile>) -> bool {
    if item.stage == ContentStage::All {
        return true;
    }
    let profile = match profile {
        Some(profile) => profile,
        None => return false,
    };
    let stage = match profile.stage {
        Some(stage) => stage,
        None => return false,
    };
    if !item.stage.matches(stage) {
        return false;
    }
    match item.weeks {
        Some(range) => profile
            .gestational_week
            .map(|week| range.contains(week))
            .unwrap_or(false),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CATALOG;
    use crate::model::{ContentCategory, MaternalStage, WeekRange};

    fn item(id: &'static str, stage: ContentStage, weeks: Option<WeekRange>) -> EducationalItem {
        EducationalItem {
            id,
            title: id,
            description: "",
            stage,
            weeks,
            category: ContentCategory::SelfCare,
            icon: "",
        }
    }

    fn ids(items: Vec<&EducationalItem>) -> Vec<&'static str> {
        items.into_iter().map(|item| item.id).collect()
    }

    fn profile(stage: Option<MaternalStage>, week: Option<u8>) -> Profile {
        let mut profile = Profile::new("u1", "Ama");
        profile.stage = stage;
        profile.gestational_week = week;
        profile
    }

    #[test]
    fn stage_filter() {
        let catalog = [
            item("postpartum", ContentStage::Postpartum, None),
            item("all", ContentStage::All, None),
        ];

        let pregnant = profile(Some(MaternalStage::Pregnancy), Some(20));
        assert_eq!(ids(select_content(Some(&pregnant), &catalog)), vec!["all"]);

        let postpartum = profile(Some(MaternalStage::Postpartum), None);
        assert_eq!(
            ids(select_content(Some(&postpartum), &catalog)),
            vec!["postpartum", "all"]
        );
    }

    #[test]
    fn week_range_boundaries() {
        let catalog = [item(
            "mid",
            ContentStage::Pregnancy,
            Some(WeekRange::new(13, 26)),
        )];
        let selected = |week: Option<u8>| {
            let p = profile(Some(MaternalStage::Pregnancy), week);
            !select_content(Some(&p), &catalog).is_empty()
        };

        assert!(!selected(Some(12)));
        assert!(selected(Some(13)));
        assert!(selected(Some(26)));
        assert!(!selected(Some(27)));
        assert!(!selected(None));
    }

    #[test]
    fn no_stage_means_only_universal_items() {
        let unset = profile(None, None);
        assert_eq!(ids(select_content(Some(&unset), &CATALOG)), vec!["7"]);
        assert_eq!(ids(select_content(None, &CATALOG)), vec!["7"]);
    }

    #[test]
    fn bundled_catalog_for_second_trimester() {
        let p = profile(Some(MaternalStage::Pregnancy), Some(20));
        assert_eq!(ids(select_content(Some(&p), &CATALOG)), vec!["4", "7", "8"]);
    }

    #[test]
    fn bundled_catalog_before_pregnancy() {
        let p = profile(Some(MaternalStage::PrePregnancy), None);
        assert_eq!(ids(select_content(Some(&p), &CATALOG)), vec!["1", "2", "7"]);
    }
}
