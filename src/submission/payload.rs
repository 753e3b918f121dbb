use serde::{Deserialize, Serialize};

use super::ContactForm;
use crate::quote::{SelectionState, SummaryFields};

/// JSON body posted to the forms endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadPayload {
    pub access_key: String,
    pub name: String,
    pub contact: String,
    pub note: String,
    #[serde(rename = "type")]
    pub enclosure: String,
    pub size: String,
    pub walls: String,
    pub floor: String,
    pub ceiling: String,
    pub extras: String,
    pub total: i64,
}

impl LeadPayload {
    /// Snapshot the contact fields and the current selections. The total is
    /// priced from `state` rather than trusted from the stored field.
    pub fn build(access_key: &str, form: &ContactForm, state: &SelectionState) -> Self {
        let summary = SummaryFields::from_state(state);
        Self {
            access_key: access_key.to_string(),
            name: form.name.trim().to_string(),
            contact: form.contact.trim().to_string(),
            note: form.note.trim().to_string(),
            enclosure: summary.enclosure,
            size: summary.size,
            walls: summary.walls,
            floor: summary.floor,
            ceiling: summary.ceiling,
            extras: summary.extras,
            total: summary.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::Surface;

    #[test]
    fn test_payload_keys() {
        let mut state = SelectionState::default();
        state.select_enclosure("French glazing", 5600.0, true);
        state.set_dimensions(3.0, 1.0, 2.5);
        state.select_finish(Surface::Floor, "Laminate", 1000.0);
        let form = ContactForm {
            name: " Ann ".to_string(),
            contact: "+7 900 000-00-00".to_string(),
            note: String::new(),
        };

        let payload = LeadPayload::build("key-1", &form, &state);
        let json = serde_json::to_value(&payload).unwrap();
        let mut keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(
            keys,
            [
                "access_key", "ceiling", "contact", "extras", "floor", "name", "note", "size",
                "total", "type", "walls"
            ]
        );
        assert_eq!(json["type"], "French glazing");
        assert_eq!(json["name"], "Ann");
        assert_eq!(json["size"], "3 x 1 x 2.5");
        assert_eq!(json["walls"], "not selected");
        assert_eq!(json["extras"], "none");
        // (5600 + 1000) * 2 * (3 + 7.5 + 2.5)
        assert_eq!(json["total"], 171_600);
    }
}
