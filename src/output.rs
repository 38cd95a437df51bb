//! Files written after a successful run.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::document::Document;
use crate::domain::ranking::DocumentRanking;
use crate::sources::{SourceError, SourceResult};

fn create(path: &Path) -> SourceResult<File> {
    File::create(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes the rankings as indented JSON.
pub fn write_rankings_json(path: &Path, rankings: &[DocumentRanking]) -> SourceResult<()> {
    let mut writer = BufWriter::new(create(path)?);
    serde_json::to_writer_pretty(&mut writer, rankings)?;
    writer.flush().map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes the processed documents as `source_document,translated_text` CSV.
pub fn write_documents_csv(path: &Path, documents: &[Document]) -> SourceResult<()> {
    let mut writer = csv::Writer::from_writer(create(path)?);
    for document in documents {
        writer.serialize(document)?;
    }
    writer.flush().map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}
