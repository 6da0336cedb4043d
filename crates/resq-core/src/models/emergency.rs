use serde::{Deserialize, Serialize};

use super::Record;

/// A helpline or emergency service reachable by phone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyNumber {
    pub id: String,
    pub name: String,
    /// Dial string as printed, e.g. "100" or "1800-180-1571".
    pub number: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EmergencyNumber {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        number: impl Into<String>,
        category: impl Into<String>,
        description: Option<&str>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            number: number.into(),
            category: category.into(),
            description: description.map(str::to_string),
        }
    }

    /// Digits only, suitable for a `tel:` link.
    pub fn dial_digits(&self) -> String {
        self.number.chars().filter(|c| c.is_ascii_digit()).collect()
    }
}

impl Record for EmergencyNumber {
    const STORE: &'static str = "emergencyNumbers";

    fn id(&self) -> &str {
        &self.id
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.number.as_str()];
        if let Some(ref description) = self.description {
            fields.push(description);
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn police() -> EmergencyNumber {
        EmergencyNumber::new(
            "1",
            "Police Control Room",
            "100",
            "police",
            Some("For immediate police assistance and emergencies"),
        )
    }

    #[test]
    fn test_matches_name_number_description() {
        let n = police();
        assert!(n.matches("control"));
        assert!(n.matches("100"));
        assert!(n.matches("immediate"));
    }

    #[test]
    fn test_category_is_not_searchable() {
        let n = EmergencyNumber::new("9", "Child Line", "1098", "children", None);
        assert!(!n.matches("children"));
    }

    #[test]
    fn test_dial_digits() {
        let n = EmergencyNumber::new("13", "NHRC", "1800-180-1571", "rights", None);
        assert_eq!(n.dial_digits(), "18001801571");
    }

    #[test]
    fn test_serde_shape() {
        let n = EmergencyNumber::new("3", "Ambulance", "102", "medical", None);
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["id"], "3");
        assert!(json.get("description").is_none());

        let parsed: EmergencyNumber = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, n);
    }
}
