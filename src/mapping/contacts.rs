//! `emergency_contacts` rows

use serde::{Deserialize, Serialize};

use crate::model::{non_empty, EmergencyContact, NewEmergencyContact};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactRow {
    pub id: String,
    pub user_id: String,
    pub contact_name: String,
    pub contact_number: String,
    #[serde(default)]
    pub relation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewContactRow {
    pub user_id: String,
    pub contact_name: String,
    pub contact_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
}

pub fn new_row(owner_id: &str, contact: &NewEmergencyContact) -> NewContactRow {
    NewContactRow {
        user_id: owner_id.to_string(),
        contact_name: contact.name.clone(),
        contact_number: contact.number.clone(),
        relation: contact.relation.clone(),
    }
}

impl From<ContactRow> for EmergencyContact {
    fn from(row: ContactRow) -> Self {
        Self {
            id: row.id,
            owner_id: row.user_id,
            name: row.contact_name,
            number: row.contact_number,
            relation: row.relation.as_deref().and_then(non_empty),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_survives_a_round_trip() {
        let new = NewEmergencyContact {
            name: "Esi".to_string(),
            number: "555-0100".to_string(),
            relation: Some("Sister".to_string()),
        };
        let row = new_row("u1", &new);
        let contact = EmergencyContact::from(ContactRow {
            id: "c1".to_string(),
            user_id: row.user_id,
            contact_name: row.contact_name,
            contact_number: row.contact_number,
            relation: row.relation,
        });
        assert_eq!(contact.owner_id, "u1");
        assert_eq!(contact.name, new.name);
        assert_eq!(contact.number, new.number);
        assert_eq!(contact.relation, new.relation);
    }

    #[test]
    fn missing_relation_is_omitted() {
        let row = new_row(
            "u1",
            &NewEmergencyContact {
                name: "Esi".to_string(),
                number: "555-0100".to_string(),
                relation: None,
            },
        );
        let value = serde_json::to_value(&row).unwrap();
        assert!(value.get("relation").is_none());
    }
}
