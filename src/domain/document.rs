use serde::{Deserialize, Serialize};

/// A sourcing request reduced to plain English text.
///
/// Serialized field names match the extracted-documents CSV.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "source_document")]
    pub identifier: String,
    #[serde(rename = "translated_text")]
    pub normalized_text: String,
}

impl Document {
    pub fn new(identifier: impl Into<String>, normalized_text: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            normalized_text: normalized_text.into(),
        }
    }
}
