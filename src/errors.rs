use thiserror::Error;

use crate::domain::supplier::SupplierId;
use crate::repository::RepositoryError;
use crate::sources::SourceError;

/// Failures that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("duplicate supplier id '{0}' in supplier dataset")]
    DuplicateSupplierId(SupplierId),
    #[error("duplicate source document '{0}'")]
    DuplicateDocumentId(String),
    #[error("top_k must be a positive integer")]
    InvalidTopK,
    #[error("supplier '{0}' has no embedding")]
    MissingEmbedding(SupplierId),
    #[error("embedding has {actual} dimensions, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("embedding contains NaN or infinite values")]
    NonFiniteEmbedding,
    #[error("embedding model returned {actual} vectors for {expected} texts")]
    EmbeddingCount { expected: usize, actual: usize },
    #[error("embedding model failure: {0}")]
    Embedding(String),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;

impl PipelineError {
    /// Status reported at the service boundary: client fault when the
    /// document source is absent, server fault for everything else.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Source(SourceError::MissingDocuments(_)) => 400,
            _ => 500,
        }
    }
}
