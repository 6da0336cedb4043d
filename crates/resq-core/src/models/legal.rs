use serde::{Deserialize, Serialize};

use super::Record;

/// A legal right or protection, with long-form explanation and citation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalInfo {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub details: String,
    /// Statute or guideline the entry is drawn from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Record for LegalInfo {
    const STORE: &'static str = "legalInfo";

    fn id(&self) -> &str {
        &self.id
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.title.as_str(),
            self.description.as_str(),
            self.details.as_str(),
            self.category.as_str(),
        ]
    }
}
