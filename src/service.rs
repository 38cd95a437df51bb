//! Request handling for the matcher socket.

use std::path::Path;

use futures::future;
use serde::{Deserialize, Serialize};

use crate::domain::document::Document;
use crate::domain::ranking::DocumentRanking;
use crate::errors::PipelineResult;
use crate::models::config::MatcherConfig;
use crate::output::{write_documents_csv, write_rankings_json};
use crate::processing::embedding::TextEmbedder;
use crate::processing::enrichment::enrich_suppliers;
use crate::processing::pipeline::SupplierMatcher;
use crate::processing::{PipelineOptions, ZMQMessage};
use crate::repository::EmbeddingCache;
use crate::sources::suppliers::load_suppliers;
use crate::sources::{DocumentSource, ProfileFetcher, Translator};

const WELCOME: &str = "Welcome to the Supplier Matching service. Send RunPipeline to execute.";

/// Reply sent for every request.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServiceReply {
    Success {
        status: u16,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        results: Option<Vec<DocumentRanking>>,
    },
    Failure {
        status: u16,
        error: String,
    },
}

impl ServiceReply {
    pub fn status(&self) -> u16 {
        match self {
            Self::Success { status, .. } | Self::Failure { status, .. } => *status,
        }
    }

    /// JSON payload written to the socket.
    pub fn to_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(self).unwrap_or_else(|e| {
            log::error!("Failed to serialize reply: {e}");
            let fallback = ServiceReply::Failure {
                status: 500,
                error: "failed to serialize reply".to_string(),
            };
            serde_json::to_vec(&fallback).unwrap_or_default()
        })
    }
}

/// Request/reply transport the service answers on.
pub trait ReplySocket {
    fn recv_request(&mut self) -> Result<Vec<u8>, zmq::Error>;

    fn send_reply(&mut self, payload: Vec<u8>) -> Result<(), zmq::Error>;
}

impl ReplySocket for zmq::Socket {
    fn recv_request(&mut self) -> Result<Vec<u8>, zmq::Error> {
        self.recv_bytes(0)
    }

    fn send_reply(&mut self, payload: Vec<u8>) -> Result<(), zmq::Error> {
        self.send(payload, 0)
    }
}

/// Runs one full pipeline per request over the configured document source.
pub struct MatcherService<E> {
    config: MatcherConfig,
    matcher: SupplierMatcher<E, EmbeddingCache>,
    documents: Box<dyn DocumentSource>,
    translator: Box<dyn Translator>,
    profiles: Box<dyn ProfileFetcher>,
}

impl<E: TextEmbedder> MatcherService<E> {
    pub fn new(
        config: MatcherConfig,
        matcher: SupplierMatcher<E, EmbeddingCache>,
        documents: Box<dyn DocumentSource>,
        translator: Box<dyn Translator>,
        profiles: Box<dyn ProfileFetcher>,
    ) -> Self {
        Self {
            config,
            matcher,
            documents,
            translator,
            profiles,
        }
    }

    /// Decodes a raw request and produces its reply.
    pub async fn handle_message(&mut self, raw: &[u8]) -> ServiceReply {
        match serde_json::from_slice::<ZMQMessage>(raw) {
            Ok(ZMQMessage::Hello) => ServiceReply::Success {
                status: 200,
                message: WELCOME.to_string(),
                results: None,
            },
            Ok(ZMQMessage::RunPipeline(options)) => {
                log::info!("Received RunPipeline: {options:?}");
                match self.run_pipeline(options).await {
                    Ok(results) => ServiceReply::Success {
                        status: 200,
                        message: "Success".to_string(),
                        results: Some(results),
                    },
                    Err(error) => {
                        log::error!("Pipeline failed: {error}");
                        ServiceReply::Failure {
                            status: error.status_code(),
                            error: error.to_string(),
                        }
                    }
                }
            }
            Err(e) => {
                log::error!("Failed to parse JSON: {e}");
                ServiceReply::Failure {
                    status: 400,
                    error: format!("invalid request: {e}"),
                }
            }
        }
    }

    /// Answers requests on `socket` until a reply cannot be sent.
    ///
    /// A REP socket that failed to send stays in its sending state and
    /// rejects every later receive, so a send error ends the loop.
    pub async fn serve<S: ReplySocket>(&mut self, socket: &mut S) -> Result<(), zmq::Error> {
        loop {
            let msg = match socket.recv_request() {
                Ok(msg) => msg,
                Err(e) => {
                    log::error!("Failed to receive message: {e}");
                    continue;
                }
            };

            let reply = self.handle_message(&msg).await;
            socket.send_reply(reply.to_bytes())?;
        }
    }

    /// Extracts documents, loads and enriches suppliers, ranks, and writes
    /// the output files. Nothing is written unless every step succeeds.
    pub async fn run_pipeline(
        &mut self,
        options: PipelineOptions,
    ) -> PipelineResult<Vec<DocumentRanking>> {
        let top_k = options.top_k.unwrap_or(self.config.top_k);

        log::info!("Extracting sourcing documents");
        let documents = self.documents.load_documents()?;

        log::info!("Loading supplier data");
        let rows = load_suppliers(
            &self.config,
            options.translate_suppliers,
            self.translator.as_ref(),
        )
        .await?;

        log::info!("Translating {} documents", documents.len());
        let documents = translate_documents(documents, self.translator.as_ref()).await;

        let mut suppliers = enrich_suppliers(&rows, self.profiles.as_ref()).await;

        log::info!("Ranking suppliers per document");
        let rankings = self.matcher.run(&documents, &mut suppliers, top_k)?;

        write_rankings_json(Path::new(&self.config.results_path), &rankings)?;
        write_documents_csv(Path::new(&self.config.documents_csv_path), &documents)?;
        log::info!(
            "Top suppliers per document saved to: {}",
            self.config.results_path
        );

        Ok(rankings)
    }
}

async fn translate_documents(
    documents: Vec<Document>,
    translator: &dyn Translator,
) -> Vec<Document> {
    let tasks = documents.into_iter().map(|document| async move {
        let translated = translator.translate(&document.normalized_text).await;
        Document::new(document.identifier, translated)
    });
    future::join_all(tasks).await
}
