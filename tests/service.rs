mod common;

use std::path::Path;

use supplier_matcher::domain::document::Document;
use supplier_matcher::domain::ranking::DocumentRanking;
use supplier_matcher::domain::supplier::SupplierId;
use supplier_matcher::models::config::MatcherConfig;
use supplier_matcher::processing::pipeline::SupplierMatcher;
use supplier_matcher::repository::EmbeddingCache;
use supplier_matcher::service::{MatcherService, ReplySocket, ServiceReply};
use supplier_matcher::sources::pdf::PdfFolderSource;
use supplier_matcher::sources::DocumentSource;

use common::{CannedProfiles, IdentityTranslator, StaticDocuments, VocabularyEmbedder};

const SUPPLIERS_CSV: &str = "Supplier Id,Supplier Name,Description,Category,Capability,linkedIn\n\
1,Steelworks,Beams,Steel,Fabrication,https://profiles.example.com/steel\n\
2,Softco,Apps,Software,Consulting,\n\
3,Formers,Parts,Metal,Forming,https://profiles.example.com/formers\n";

/// Delivers queued requests and fails every send.
struct BrokenReplySocket {
    requests: Vec<Vec<u8>>,
    sent: usize,
}

impl ReplySocket for BrokenReplySocket {
    fn recv_request(&mut self) -> Result<Vec<u8>, zmq::Error> {
        assert_eq!(self.sent, 0, "received again after a failed send");
        self.requests.pop().ok_or(zmq::Error::ETERM)
    }

    fn send_reply(&mut self, _payload: Vec<u8>) -> Result<(), zmq::Error> {
        self.sent += 1;
        Err(zmq::Error::EFSM)
    }
}

fn config_in(dir: &Path) -> MatcherConfig {
    MatcherConfig {
        pdf_folder: dir.join("uploaded_pdfs").display().to_string(),
        supplier_source_path: dir.join("SupplierList.csv").display().to_string(),
        translated_suppliers_path: dir.join("translated_suppliers.csv").display().to_string(),
        results_path: dir.join("top_suppliers_by_doc.json").display().to_string(),
        documents_csv_path: dir.join("pdf_translate.csv").display().to_string(),
        top_k: 2,
        ..MatcherConfig::default()
    }
}

fn service(
    config: MatcherConfig,
    documents: Box<dyn DocumentSource>,
) -> MatcherService<VocabularyEmbedder> {
    MatcherService::new(
        config,
        SupplierMatcher::new(
            VocabularyEmbedder::new(vec![
                "steel",
                "fabrication",
                "welding",
                "software",
                "consulting",
                "metal",
                "forming",
            ]),
            EmbeddingCache::Disabled,
        ),
        documents,
        Box::new(IdentityTranslator),
        Box::new(CannedProfiles::default()),
    )
}

#[tokio::test]
async fn hello_returns_welcome_message() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_in(dir.path());
    let mut service = service(config, Box::new(StaticDocuments(vec![])));

    let reply = service.handle_message(br#""Hello""#).await;

    assert_eq!(reply.status(), 200);
    assert!(matches!(reply, ServiceReply::Success { results: None, .. }));
}

#[tokio::test]
async fn malformed_request_is_a_client_fault() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut service = service(config_in(dir.path()), Box::new(StaticDocuments(vec![])));

    let reply = service.handle_message(b"{not json").await;

    assert_eq!(reply.status(), 400);
}

#[tokio::test]
async fn missing_document_folder_is_a_client_fault() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_in(dir.path());
    let source = PdfFolderSource::new(&config.pdf_folder);
    std::fs::write(&config.translated_suppliers_path, SUPPLIERS_CSV).expect("write suppliers");
    let mut service = service(config.clone(), Box::new(source));

    let reply = service.handle_message(br#"{"RunPipeline":{}}"#).await;

    match reply {
        ServiceReply::Failure { status, error } => {
            assert_eq!(status, 400);
            assert!(error.contains("uploaded_pdfs"));
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(!Path::new(&config.results_path).exists());
}

#[tokio::test]
async fn missing_supplier_dataset_is_a_server_fault() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_in(dir.path());
    let documents = StaticDocuments(vec![Document::new("rfq.pdf", "steel fabrication")]);
    let mut service = service(config.clone(), Box::new(documents));

    let reply = service.handle_message(br#"{"RunPipeline":{"translate_suppliers":false}}"#).await;

    assert_eq!(reply.status(), 500);
    assert!(!Path::new(&config.results_path).exists());
}

#[tokio::test]
async fn duplicate_supplier_ids_fail_the_whole_run() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_in(dir.path());
    std::fs::write(
        &config.translated_suppliers_path,
        "Supplier Id,Supplier Name,Category\n1,Steelworks,Steel\n1,Copycat,Metal\n",
    )
    .expect("write suppliers");
    let documents = StaticDocuments(vec![Document::new("rfq.pdf", "steel")]);
    let mut service = service(config.clone(), Box::new(documents));

    let reply = service.handle_message(br#"{"RunPipeline":{}}"#).await;

    match reply {
        ServiceReply::Failure { status, error } => {
            assert_eq!(status, 500);
            assert!(error.contains("duplicate supplier id '1'"));
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(!Path::new(&config.results_path).exists());
}

#[tokio::test]
async fn run_ranks_documents_and_writes_outputs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_in(dir.path());
    std::fs::write(&config.translated_suppliers_path, SUPPLIERS_CSV).expect("write suppliers");
    let documents = StaticDocuments(vec![
        Document::new("steel.pdf", "Steel fabrication and welding"),
        Document::new("apps.pdf", "Software consulting"),
    ]);
    let mut service = service(config.clone(), Box::new(documents));

    let reply = service.handle_message(br#"{"RunPipeline":{}}"#).await;

    let results = match reply {
        ServiceReply::Success {
            status,
            message,
            results: Some(results),
        } => {
            assert_eq!(status, 200);
            assert_eq!(message, "Success");
            results
        }
        other => panic!("expected success, got {other:?}"),
    };

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].source_document, "steel.pdf");
    assert_eq!(results[0].top_suppliers.len(), 2);
    assert_eq!(results[0].top_suppliers[0].supplier_id, SupplierId::Number(1));
    assert_eq!(results[0].top_suppliers[0].supplier_name, "Steelworks");
    assert_eq!(results[1].source_document, "apps.pdf");
    assert_eq!(results[1].top_suppliers[0].supplier_id, SupplierId::Number(2));

    let written = std::fs::read_to_string(&config.results_path).expect("results file");
    let persisted: Vec<DocumentRanking> = serde_json::from_str(&written).expect("valid json");
    assert_eq!(persisted, results);

    let documents_csv = std::fs::read_to_string(&config.documents_csv_path).expect("csv file");
    assert!(documents_csv.starts_with("source_document,translated_text\n"));
}

#[tokio::test]
async fn top_k_override_limits_each_ranking() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_in(dir.path());
    std::fs::write(&config.translated_suppliers_path, SUPPLIERS_CSV).expect("write suppliers");
    let documents = StaticDocuments(vec![Document::new("steel.pdf", "metal forming")]);
    let mut service = service(config, Box::new(documents));

    let reply = service.handle_message(br#"{"RunPipeline":{"top_k":1}}"#).await;

    match reply {
        ServiceReply::Success {
            results: Some(results),
            ..
        } => {
            assert_eq!(results[0].top_suppliers.len(), 1);
            assert_eq!(results[0].top_suppliers[0].supplier_id, SupplierId::Number(3));
        }
        other => panic!("expected success, got {other:?}"),
    }
}

#[tokio::test]
async fn zero_top_k_is_a_server_fault() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_in(dir.path());
    std::fs::write(&config.translated_suppliers_path, SUPPLIERS_CSV).expect("write suppliers");
    let documents = StaticDocuments(vec![Document::new("steel.pdf", "steel")]);
    let mut service = service(config, Box::new(documents));

    let reply = service.handle_message(br#"{"RunPipeline":{"top_k":0}}"#).await;

    assert_eq!(reply.status(), 500);
}

#[tokio::test]
async fn failed_send_stops_serving() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut service = service(config_in(dir.path()), Box::new(StaticDocuments(vec![])));
    let mut socket = BrokenReplySocket {
        requests: vec![br#""Hello""#.to_vec(), br#""Hello""#.to_vec()],
        sent: 0,
    };

    let result = service.serve(&mut socket).await;

    assert!(matches!(result, Err(zmq::Error::EFSM)));
    assert_eq!(socket.sent, 1);
    assert_eq!(socket.requests.len(), 1);
}

#[test]
fn hello_reply_encodes_status_and_message() {
    let reply = ServiceReply::Success {
        status: 200,
        message: "Welcome".to_string(),
        results: None,
    };

    let encoded: serde_json::Value = serde_json::from_slice(&reply.to_bytes()).expect("json");

    assert_eq!(encoded, serde_json::json!({"status": 200, "message": "Welcome"}));
}
