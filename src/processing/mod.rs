use serde::Deserialize;

pub mod embedding;
pub mod enrichment;
pub mod pipeline;
pub mod ranking;

/// Requests accepted on the service socket.
#[derive(Deserialize, Debug, PartialEq)]
pub enum ZMQMessage {
    Hello,
    RunPipeline(PipelineOptions),
}

#[derive(Deserialize, Debug, Default, PartialEq)]
pub struct PipelineOptions {
    /// Re-translate the supplier source dataset instead of reading the
    /// pre-translated one.
    #[serde(default)]
    pub translate_suppliers: bool,
    /// Overrides the configured number of suppliers per document.
    #[serde(default)]
    pub top_k: Option<usize>,
}
