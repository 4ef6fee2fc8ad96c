//! Public emergency hotlines and warning signs

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmergencyResource {
    pub title: &'static str,
    pub number: &'static str,
    pub description: &'static str,
    pub urgent: bool,
}

/// How a resource is reached from a phone
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "target", rename_all = "lowercase")]
pub enum ContactAction {
    /// Dial string without separators
    Call(String),
    /// Free-text instruction such as "Text HOME to 741741"
    Text(String),
}

impl EmergencyResource {
    pub fn action(&self) -> ContactAction {
        if self.number.starts_with("Text") {
            ContactAction::Text(self.number.to_string())
        } else {
            ContactAction::Call(self.number.replace('-', ""))
        }
    }
}

pub static EMERGENCY_RESOURCES: [EmergencyResource; 4] = [
    EmergencyResource {
        title: "Emergency Services",
        number: "911",
        description: "For life-threatening emergencies",
        urgent: true,
    },
    EmergencyResource {
        title: "Poison Control",
        number: "1-800-222-1222",
        description: "24/7 poison emergency helpline",
        urgent: false,
    },
    EmergencyResource {
        title: "Postpartum Support",
        number: "1-800-944-4773",
        description: "Postpartum Support International",
        urgent: false,
    },
    EmergencyResource {
        title: "Crisis Text Line",
        number: "Text HOME to 741741",
        description: "Free 24/7 mental health support",
        urgent: false,
    },
];

/// Signs that warrant contacting a provider immediately
pub static WARNING_SIGNS: [&str; 10] = [
    "Severe headache that doesn't go away",
    "Changes in vision (blurry, spots, flashing)",
    "Severe abdominal pain",
    "Heavy vaginal bleeding",
    "No fetal movement for extended periods",
    "Sudden swelling of face, hands, or feet",
    "High fever (above 101°F / 38.3°C)",
    "Difficulty breathing",
    "Chest pain",
    "Thoughts of harming yourself or baby",
];
