use diesel::RunQueryDsl;
use diesel::r2d2::{ConnectionManager, Pool, PoolError, PooledConnection};
use diesel::sqlite::SqliteConnection;
use thiserror::Error;

pub mod embedding;
pub mod schema;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error: {0}")]
    Connection(#[from] PoolError),
    #[error("database query error: {0}")]
    Query(#[from] diesel::result::Error),
    #[error("corrupt embedding blob: {0}")]
    Corrupt(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

const CREATE_SUPPLIER_EMBEDDINGS: &str = "CREATE TABLE IF NOT EXISTS supplier_embeddings (
    model TEXT NOT NULL,
    input_text TEXT NOT NULL,
    embedding BLOB NOT NULL,
    created_at TIMESTAMP NOT NULL,
    PRIMARY KEY (model, input_text)
)";

/// Opens (creating when needed) the SQLite embedding cache.
pub fn establish_connection_pool(database_url: &str) -> RepositoryResult<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = Pool::builder().build(manager)?;

    let mut conn = pool.get()?;
    diesel::sql_query(CREATE_SUPPLIER_EMBEDDINGS).execute(&mut conn)?;

    Ok(pool)
}

pub trait EmbeddingReader {
    /// Looks up the embedding stored for `text` under `model`.
    fn get_embedding(&self, model: &str, text: &str) -> RepositoryResult<Option<Vec<f32>>>;
}

pub trait EmbeddingWriter {
    fn set_embedding(
        &self,
        model: &str,
        text: &str,
        embedding: &[f32],
    ) -> RepositoryResult<usize>;
}

/// SQLite-backed repository.
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Supplier embedding cache selected at start-up.
///
/// Entries are keyed by model name and enriched text, so a changed supplier
/// profile or a different model never hits a stale vector.
pub enum EmbeddingCache {
    Disabled,
    Sqlite(DieselRepository),
}

impl EmbeddingReader for EmbeddingCache {
    fn get_embedding(&self, model: &str, text: &str) -> RepositoryResult<Option<Vec<f32>>> {
        match self {
            Self::Disabled => Ok(None),
            Self::Sqlite(repo) => repo.get_embedding(model, text),
        }
    }
}

impl EmbeddingWriter for EmbeddingCache {
    fn set_embedding(
        &self,
        model: &str,
        text: &str,
        embedding: &[f32],
    ) -> RepositoryResult<usize> {
        match self {
            Self::Disabled => Ok(0),
            Self::Sqlite(repo) => repo.set_embedding(model, text, embedding),
        }
    }
}
