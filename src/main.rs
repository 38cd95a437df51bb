use std::env;
use std::path::PathBuf;

use supplier_matcher::models::config::MatcherConfig;
use supplier_matcher::processing::embedding::FastTextEmbedder;
use supplier_matcher::processing::pipeline::SupplierMatcher;
use supplier_matcher::repository::{DieselRepository, EmbeddingCache, establish_connection_pool};
use supplier_matcher::service::MatcherService;
use supplier_matcher::sources::build_reqwest_client;
use supplier_matcher::sources::linkedin::LinkedInProfileFetcher;
use supplier_matcher::sources::pdf::PdfFolderSource;
use supplier_matcher::sources::translator::OpenAiTranslator;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config_path =
        PathBuf::from(env::var("MATCHER_CONFIG").unwrap_or_else(|_| "matcher.yaml".to_string()));
    let config = match MatcherConfig::load(Some(&config_path)) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let cache = match config.embedding_cache_path.as_deref() {
        Some(path) => match establish_connection_pool(path) {
            Ok(pool) => EmbeddingCache::Sqlite(DieselRepository::new(pool)),
            Err(e) => {
                log::error!("Failed to open embedding cache {path}: {e}");
                std::process::exit(1);
            }
        },
        None => EmbeddingCache::Disabled,
    };

    let embedder = match FastTextEmbedder::try_new(&config) {
        Ok(embedder) => embedder,
        Err(e) => {
            log::error!("Failed to load embedding model: {e}");
            std::process::exit(1);
        }
    };

    let client = match build_reqwest_client(config.http_timeout_secs) {
        Ok(client) => client,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    if config.openai_api_key.is_none() {
        log::warn!("No OpenAI API key configured; documents and suppliers will not be translated");
    }

    let zmq_address = config.zmq_address.clone();
    let mut service = MatcherService::new(
        config.clone(),
        SupplierMatcher::new(embedder, cache),
        Box::new(PdfFolderSource::new(&config.pdf_folder)),
        Box::new(OpenAiTranslator::new(client.clone(), &config)),
        Box::new(LinkedInProfileFetcher::new(client, config.fetch_concurrency)),
    );

    let context = zmq::Context::new();
    let mut responder = match context.socket(zmq::REP) {
        Ok(socket) => socket,
        Err(e) => {
            log::error!("Cannot create zmq socket: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = responder.bind(&zmq_address) {
        log::error!("Cannot bind to {zmq_address}: {e}");
        std::process::exit(1);
    }
    log::info!("Supplier matcher listening on {zmq_address}");

    if let Err(e) = service.serve(&mut responder).await {
        log::error!("Failed to send reply: {e}");
        std::process::exit(1);
    }
}
