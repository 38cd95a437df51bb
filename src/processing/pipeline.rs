use std::collections::HashSet;

use crate::domain::document::Document;
use crate::domain::ranking::DocumentRanking;
use crate::domain::supplier::SupplierRecord;
use crate::errors::{PipelineError, PipelineResult};
use crate::processing::embedding::{
    TextEmbedder, load_or_generate_embeddings, validate_embeddings,
};
use crate::processing::ranking::rank_suppliers;
use crate::repository::{EmbeddingReader, EmbeddingWriter};

#[derive(Debug, Default, PartialEq)]
pub struct RunStats {
    pub documents: usize,
    pub suppliers: usize,
    pub supplier_embeddings_generated: usize,
    pub supplier_embeddings_reused: usize,
}

/// Rejects supplier sets that repeat an id.
pub fn validate_unique_suppliers(suppliers: &[SupplierRecord]) -> PipelineResult<()> {
    let mut seen = HashSet::with_capacity(suppliers.len());
    for supplier in suppliers {
        if !seen.insert(&supplier.supplier_id) {
            return Err(PipelineError::DuplicateSupplierId(
                supplier.supplier_id.clone(),
            ));
        }
    }
    Ok(())
}

fn validate_unique_documents(documents: &[Document]) -> PipelineResult<()> {
    let mut seen = HashSet::with_capacity(documents.len());
    for document in documents {
        if !seen.insert(document.identifier.as_str()) {
            return Err(PipelineError::DuplicateDocumentId(
                document.identifier.clone(),
            ));
        }
    }
    Ok(())
}

/// Scores every supplier against every document.
///
/// Owns the embedding model and the supplier embedding cache for its
/// lifetime; both are read-only while a batch is ranked.
pub struct SupplierMatcher<E, R> {
    embedder: E,
    cache: R,
}

impl<E, R> SupplierMatcher<E, R>
where
    E: TextEmbedder,
    R: EmbeddingReader + EmbeddingWriter,
{
    pub fn new(embedder: E, cache: R) -> Self {
        Self { embedder, cache }
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    /// Fills in the embedding of every supplier that lacks one.
    ///
    /// Suppliers that already carry a vector of the model's dimension are
    /// left untouched, so a prepared set can be reused across batches.
    pub fn prepare_suppliers(
        &mut self,
        suppliers: &mut [SupplierRecord],
    ) -> PipelineResult<usize> {
        validate_unique_suppliers(suppliers)?;

        let dimension = self.embedder.dimension();
        let pending: Vec<usize> = suppliers
            .iter()
            .enumerate()
            .filter(|(_, supplier)| {
                supplier
                    .embedding
                    .as_ref()
                    .is_none_or(|vector| vector.len() != dimension)
            })
            .map(|(index, _)| index)
            .collect();

        let texts: Vec<&str> = pending
            .iter()
            .map(|&index| suppliers[index].enriched_text.as_str())
            .collect();
        let (embeddings, generated) =
            load_or_generate_embeddings(&texts, &mut self.embedder, &self.cache)?;

        for (&index, embedding) in pending.iter().zip(embeddings) {
            suppliers[index].embedding = Some(embedding);
        }

        Ok(generated)
    }

    /// Ranks `suppliers` for each document, in document order.
    ///
    /// Supplier embeddings are resolved once before the first document is
    /// scored. Any failure aborts the whole batch.
    pub fn run(
        &mut self,
        documents: &[Document],
        suppliers: &mut [SupplierRecord],
        top_k: usize,
    ) -> PipelineResult<Vec<DocumentRanking>> {
        if top_k == 0 {
            return Err(PipelineError::InvalidTopK);
        }
        validate_unique_documents(documents)?;

        let mut stats = RunStats {
            documents: documents.len(),
            suppliers: suppliers.len(),
            ..RunStats::default()
        };

        stats.supplier_embeddings_generated = self.prepare_suppliers(suppliers)?;
        stats.supplier_embeddings_reused = stats.suppliers - stats.supplier_embeddings_generated;

        let dimension = self.embedder.dimension();
        let mut rankings = Vec::with_capacity(documents.len());
        for document in documents {
            let vector = self.embedder.embed(&document.normalized_text)?;
            validate_embeddings(std::slice::from_ref(&vector), 1, dimension)?;

            rankings.push(DocumentRanking {
                source_document: document.identifier.clone(),
                top_suppliers: rank_suppliers(&vector, suppliers, top_k)?,
            });
        }

        log::info!(
            "Ranked suppliers: documents={}, suppliers={}, supplier_embeddings_generated={}, supplier_embeddings_reused={}",
            stats.documents,
            stats.suppliers,
            stats.supplier_embeddings_generated,
            stats.supplier_embeddings_reused
        );

        Ok(rankings)
    }
}
