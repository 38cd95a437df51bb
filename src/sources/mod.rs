use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::document::Document;

pub mod linkedin;
pub mod pdf;
pub mod suppliers;
pub mod translator;

/// Browser-like user agent sent with every outgoing request.
pub(crate) const USER_AGENT: &str = "Mozilla/5.0";

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("document folder '{}' does not exist or holds no PDF files", .0.display())]
    MissingDocuments(PathBuf),
    #[error("expected pre-translated supplier file '{}' not found", .0.display())]
    MissingSupplierDataset(PathBuf),
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to extract text from '{}': {reason}", path.display())]
    Pdf { path: PathBuf, reason: String },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("failed to build HTTP client: {0}")]
    Build(String),
}

pub type SourceResult<T> = Result<T, SourceError>;

/// Supplies the batch of sourcing documents for one run.
pub trait DocumentSource: Send + Sync {
    /// Loads every available document, already reduced to plain text.
    fn load_documents(&self) -> SourceResult<Vec<Document>>;
}

/// Turns arbitrary-language text into English.
///
/// Implementations own their retry and timeout policy and never fail: when
/// translation is impossible the input comes back unchanged.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str) -> String;
}

/// Fetches the public profile text behind a supplier's profile URL.
///
/// An unreachable or unparsable profile yields an empty string.
#[async_trait]
pub trait ProfileFetcher: Send + Sync {
    async fn fetch_profile_text(&self, url: &str) -> String;
}

/// Builds the HTTP client shared by the network collaborators.
pub fn build_reqwest_client(timeout_secs: u64) -> SourceResult<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| SourceError::Build(e.to_string()))
}
