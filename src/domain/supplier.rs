use std::fmt;

use serde::{Deserialize, Serialize};

/// Supplier identifier as it appears in the supplier dataset.
///
/// Numeric identifiers stay numeric in the serialized ranking so existing
/// consumers keep receiving `"Supplier Id": 42` rather than `"42"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SupplierId {
    Number(i64),
    Text(String),
}

impl SupplierId {
    /// Parses a raw dataset cell, preferring the numeric form.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.parse::<i64>() {
            Ok(value) => Self::Number(value),
            Err(_) => Self::Text(raw.to_string()),
        }
    }
}

impl fmt::Display for SupplierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for SupplierId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for SupplierId {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

/// One row of the supplier dataset, before enrichment.
///
/// Column names follow the spreadsheet the dataset is exported from.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct SupplierRow {
    #[serde(rename = "Supplier Id")]
    pub supplier_id: String,
    #[serde(rename = "Supplier Name", default)]
    pub supplier_name: String,
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
    #[serde(rename = "Category", default)]
    pub category: Option<String>,
    #[serde(rename = "Capability", default)]
    pub capability: Option<String>,
    #[serde(rename = "linkedIn", default)]
    pub profile_url: Option<String>,
}

/// Supplier ready for scoring.
///
/// `enriched_text` and `embedding` are derived; the identity fields are
/// never touched after construction.
#[derive(Clone, Debug, PartialEq)]
pub struct SupplierRecord {
    pub supplier_id: SupplierId,
    pub supplier_name: String,
    pub enriched_text: String,
    pub embedding: Option<Vec<f32>>,
}

impl SupplierRecord {
    pub fn new(
        supplier_id: impl Into<SupplierId>,
        supplier_name: impl Into<String>,
        enriched_text: impl Into<String>,
    ) -> Self {
        Self {
            supplier_id: supplier_id.into(),
            supplier_name: supplier_name.into(),
            enriched_text: enriched_text.into(),
            embedding: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SupplierId;

    #[test]
    fn numeric_ids_serialize_as_numbers() {
        let id = SupplierId::parse(" 42 ");

        assert_eq!(id, SupplierId::Number(42));
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
    }

    #[test]
    fn non_numeric_ids_serialize_as_strings() {
        let id = SupplierId::parse("SUP-7");

        assert_eq!(id, SupplierId::Text("SUP-7".to_string()));
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"SUP-7\"");
        assert_eq!(id.to_string(), "SUP-7");
    }
}
