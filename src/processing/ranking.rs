use crate::domain::ranking::RankingEntry;
use crate::domain::supplier::SupplierRecord;
use crate::errors::{PipelineError, PipelineResult};
use crate::processing::embedding::is_finite_vector;

/// Cosine similarity of two equally long vectors.
///
/// Defined as `0.0` when either vector has zero magnitude. Accumulates in
/// `f64` and clamps the result to `[-1, 1]`.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let (mut dot, mut norm_a, mut norm_b) = (0.0_f64, 0.0_f64, 0.0_f64);
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0)
}

/// Ranks `suppliers` against one document vector.
///
/// Every supplier must already carry a finite embedding of the document
/// vector's length. Suppliers are ordered by descending similarity; equal scores keep
/// their input order. Returns at most `top_k` entries with ranks from 1.
pub fn rank_suppliers(
    document_vector: &[f32],
    suppliers: &[SupplierRecord],
    top_k: usize,
) -> PipelineResult<Vec<RankingEntry>> {
    if top_k == 0 {
        return Err(PipelineError::InvalidTopK);
    }
    if !is_finite_vector(document_vector) {
        return Err(PipelineError::NonFiniteEmbedding);
    }

    let mut scored = Vec::with_capacity(suppliers.len());
    for supplier in suppliers {
        let embedding = supplier
            .embedding
            .as_deref()
            .ok_or_else(|| PipelineError::MissingEmbedding(supplier.supplier_id.clone()))?;
        if embedding.len() != document_vector.len() {
            return Err(PipelineError::DimensionMismatch {
                expected: document_vector.len(),
                actual: embedding.len(),
            });
        }
        if !is_finite_vector(embedding) {
            return Err(PipelineError::NonFiniteEmbedding);
        }
        scored.push((supplier, cosine_similarity(document_vector, embedding)));
    }

    // `sort_by` is stable, which keeps ties in supplier order.
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    Ok(scored
        .into_iter()
        .take(top_k)
        .enumerate()
        .map(|(position, (supplier, score))| RankingEntry {
            rank: position + 1,
            score,
            supplier_name: supplier.supplier_name.clone(),
            supplier_id: supplier.supplier_id.clone(),
        })
        .collect())
}
