use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::document::Document;
use crate::sources::{DocumentSource, SourceError, SourceResult};

/// Reads every `*.pdf` file from a local folder.
///
/// Documents are returned sorted by file name; the file name is the
/// document identifier.
pub struct PdfFolderSource {
    folder: PathBuf,
}

impl PdfFolderSource {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
        }
    }

    fn pdf_files(&self) -> SourceResult<Vec<PathBuf>> {
        if !self.folder.is_dir() {
            return Err(SourceError::MissingDocuments(self.folder.clone()));
        }

        let entries = fs::read_dir(&self.folder).map_err(|source| SourceError::Io {
            path: self.folder.clone(),
            source,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|source| SourceError::Io {
                    path: self.folder.clone(),
                    source,
                })?
                .path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "pdf") {
                files.push(path);
            }
        }
        files.sort();

        if files.is_empty() {
            return Err(SourceError::MissingDocuments(self.folder.clone()));
        }
        Ok(files)
    }
}

impl DocumentSource for PdfFolderSource {
    fn load_documents(&self) -> SourceResult<Vec<Document>> {
        let files = self.pdf_files()?;
        log::info!(
            "Extracting {} PDF files from {}",
            files.len(),
            self.folder.display()
        );

        files
            .iter()
            .map(|path| {
                let identifier = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let text = extract_pdf_text(path)?;
                Ok(Document::new(identifier, normalize_text(&text)))
            })
            .collect()
    }
}

fn extract_pdf_text(path: &Path) -> SourceResult<String> {
    let bytes = fs::read(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    pdf_extract::extract_text_from_mem(&bytes).map_err(|e| SourceError::Pdf {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Collapses runs of horizontal whitespace, drops blank lines and trims.
pub fn normalize_text(raw: &str) -> String {
    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
