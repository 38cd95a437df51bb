pub mod domain;
pub mod errors;
pub mod models;
pub mod output;
pub mod processing;
pub mod repository;
pub mod service;
pub mod sources;

/// Number of suppliers reported per document when a request does not say.
pub const DEFAULT_TOP_K: usize = 5;
