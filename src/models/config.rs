//! Configuration model loaded from external sources.

use std::env;
use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::DEFAULT_TOP_K;

#[derive(Clone, Debug, Deserialize)]
/// Settings for one matcher process, resolved once at start-up and passed
/// explicitly to every component that needs them.
pub struct MatcherConfig {
    #[serde(default = "default_zmq_address")]
    pub zmq_address: String,
    #[serde(default = "default_pdf_folder")]
    pub pdf_folder: String,
    #[serde(default = "default_supplier_source_path")]
    pub supplier_source_path: String,
    #[serde(default = "default_translated_suppliers_path")]
    pub translated_suppliers_path: String,
    #[serde(default = "default_results_path")]
    pub results_path: String,
    #[serde(default = "default_documents_csv_path")]
    pub documents_csv_path: String,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    /// Token limit applied by the embedding model; longer inputs are truncated.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
    #[serde(default)]
    pub model_cache_dir: Option<String>,
    /// SQLite file reused across runs for supplier embeddings.
    #[serde(default)]
    pub embedding_cache_path: Option<String>,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,
    #[serde(default = "default_translation_max_chars")]
    pub translation_max_chars: usize,
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
    #[serde(default = "default_fetch_concurrency")]
    pub fetch_concurrency: usize,
}

fn default_zmq_address() -> String {
    "tcp://127.0.0.1:5555".to_string()
}

fn default_pdf_folder() -> String {
    "uploaded_pdfs".to_string()
}

fn default_supplier_source_path() -> String {
    "SupplierList.csv".to_string()
}

fn default_translated_suppliers_path() -> String {
    "translated_suppliers.csv".to_string()
}

fn default_results_path() -> String {
    "top_suppliers_by_doc.json".to_string()
}

fn default_documents_csv_path() -> String {
    "pdf_translate.csv".to_string()
}

fn default_embedding_model() -> String {
    "all-MiniLM-L6-v2".to_string()
}

fn default_max_tokens() -> usize {
    256
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_translation_max_chars() -> usize {
    4000
}

fn default_http_timeout_secs() -> u64 {
    10
}

fn default_fetch_concurrency() -> usize {
    5
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            zmq_address: default_zmq_address(),
            pdf_folder: default_pdf_folder(),
            supplier_source_path: default_supplier_source_path(),
            translated_suppliers_path: default_translated_suppliers_path(),
            results_path: default_results_path(),
            documents_csv_path: default_documents_csv_path(),
            embedding_model: default_embedding_model(),
            max_tokens: default_max_tokens(),
            model_cache_dir: None,
            embedding_cache_path: None,
            top_k: default_top_k(),
            openai_api_key: None,
            openai_model: default_openai_model(),
            openai_base_url: default_openai_base_url(),
            translation_max_chars: default_translation_max_chars(),
            http_timeout_secs: default_http_timeout_secs(),
            fetch_concurrency: default_fetch_concurrency(),
        }
    }
}

impl MatcherConfig {
    /// Loads settings from an optional YAML file overlaid with `MATCHER_*`
    /// environment variables. `OPENAI_API_KEY` fills the API key when the
    /// other sources leave it unset.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }

        let mut settings: MatcherConfig = builder
            .add_source(Environment::with_prefix("MATCHER").try_parsing(true))
            .build()?
            .try_deserialize()?;

        if settings.openai_api_key.is_none() {
            settings.openai_api_key = env::var("OPENAI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty());
        }

        Ok(settings)
    }
}
