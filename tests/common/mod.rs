//! Helpers for integration tests.
#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use supplier_matcher::domain::document::Document;
use supplier_matcher::errors::PipelineResult;
use supplier_matcher::processing::embedding::TextEmbedder;
use supplier_matcher::repository::{DbPool, establish_connection_pool};
use supplier_matcher::sources::{DocumentSource, ProfileFetcher, SourceResult, Translator};
use tempfile::TempDir;

/// Temporary SQLite embedding cache used in integration tests.
pub struct TestDb {
    _dir: TempDir,
    pool: DbPool,
}

impl TestDb {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir.");
        let path = dir.path().join("embeddings.db");
        let pool = establish_connection_pool(&path.display().to_string())
            .expect("Failed to establish SQLite connection.");
        TestDb { _dir: dir, pool }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}

/// Counts occurrences of a fixed vocabulary; unknown words are ignored.
pub struct VocabularyEmbedder {
    vocabulary: Vec<&'static str>,
    pub batches: usize,
    pub texts_embedded: usize,
}

impl VocabularyEmbedder {
    pub fn new(vocabulary: Vec<&'static str>) -> Self {
        Self {
            vocabulary,
            batches: 0,
            texts_embedded: 0,
        }
    }
}

impl TextEmbedder for VocabularyEmbedder {
    fn model_name(&self) -> &str {
        "vocabulary"
    }

    fn dimension(&self) -> usize {
        self.vocabulary.len()
    }

    fn embed_many(&mut self, texts: &[String]) -> PipelineResult<Vec<Vec<f32>>> {
        self.batches += 1;
        self.texts_embedded += texts.len();
        Ok(texts
            .iter()
            .map(|text| {
                let lowered = text.to_lowercase();
                self.vocabulary
                    .iter()
                    .map(|word| {
                        lowered
                            .split(|c: char| !c.is_alphanumeric())
                            .filter(|w| w == word)
                            .count() as f32
                    })
                    .collect()
            })
            .collect())
    }
}

/// Serves a fixed document batch.
pub struct StaticDocuments(pub Vec<Document>);

impl DocumentSource for StaticDocuments {
    fn load_documents(&self) -> SourceResult<Vec<Document>> {
        Ok(self.0.clone())
    }
}

pub struct IdentityTranslator;

#[async_trait]
impl Translator for IdentityTranslator {
    async fn translate(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Returns canned profile text and records every requested URL.
#[derive(Default)]
pub struct CannedProfiles {
    pub requested: Mutex<Vec<String>>,
}

#[async_trait]
impl ProfileFetcher for CannedProfiles {
    async fn fetch_profile_text(&self, url: &str) -> String {
        self.requested
            .lock()
            .expect("mutex poisoned")
            .push(url.to_string());
        if url.contains("steel") {
            "About steel fabrication and welding".to_string()
        } else {
            String::new()
        }
    }
}
