//! Personal emergency contacts

use serde::{Deserialize, Serialize};

use super::symptom::non_empty;
use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub number: String,
    pub relation: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    pub name: String,
    pub number: String,
    pub relation: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewEmergencyContact {
    pub name: String,
    pub number: String,
    pub relation: Option<String>,
}

impl ContactForm {
    pub fn validate(&self) -> Result<NewEmergencyContact, ValidationError> {
        let name = self.name.trim();
        let number = self.number.trim();
        if name.is_empty() || number.is_empty() {
            return Err(ValidationError::new(
                "Please fill in all fields",
                "A contact needs a name and a number",
            ));
        }
        Ok(NewEmergencyContact {
            name: name.to_string(),
            number: number.to_string(),
            relation: non_empty(&self.relation),
        })
    }
}
