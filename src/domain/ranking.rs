use serde::{Deserialize, Serialize};

use crate::domain::supplier::SupplierId;

/// A supplier's position in one document's ranking.
///
/// Field order and names are the persisted output format.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub rank: usize,
    pub score: f64,
    #[serde(rename = "Supplier Name")]
    pub supplier_name: String,
    #[serde(rename = "Supplier Id")]
    pub supplier_id: SupplierId,
}

/// Top suppliers for a single source document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DocumentRanking {
    pub source_document: String,
    pub top_suppliers: Vec<RankingEntry>,
}
