use std::path::Path;

use futures::future;

use crate::domain::supplier::SupplierRow;
use crate::models::config::MatcherConfig;
use crate::sources::{SourceError, SourceResult, Translator};

/// Reads supplier rows from a CSV file with a header line.
pub fn read_supplier_rows(path: &Path) -> SourceResult<Vec<SupplierRow>> {
    let mut reader = csv::Reader::from_path(path)?;
    let rows = reader
        .deserialize::<SupplierRow>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Writes supplier rows as CSV, replacing any existing file.
pub fn write_supplier_rows(path: &Path, rows: &[SupplierRow]) -> SourceResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads the supplier dataset for one run.
///
/// Without translation the pre-translated dataset must already exist. With
/// translation the source dataset is translated column by column and the
/// result is written back as the pre-translated dataset for later runs.
pub async fn load_suppliers(
    config: &MatcherConfig,
    translate: bool,
    translator: &dyn Translator,
) -> SourceResult<Vec<SupplierRow>> {
    let translated_path = Path::new(&config.translated_suppliers_path);

    if !translate {
        if !translated_path.is_file() {
            return Err(SourceError::MissingSupplierDataset(
                translated_path.to_path_buf(),
            ));
        }
        let rows = read_supplier_rows(translated_path)?;
        log::info!(
            "Loaded {} pre-translated suppliers from {}",
            rows.len(),
            translated_path.display()
        );
        return Ok(rows);
    }

    let source_path = Path::new(&config.supplier_source_path);
    if !source_path.is_file() {
        return Err(SourceError::MissingSupplierDataset(
            source_path.to_path_buf(),
        ));
    }

    let rows = read_supplier_rows(source_path)?;
    log::info!("Translating {} suppliers", rows.len());
    let rows = translate_supplier_rows(rows, translator).await;
    write_supplier_rows(translated_path, &rows)?;

    Ok(rows)
}

async fn translate_supplier_rows(
    rows: Vec<SupplierRow>,
    translator: &dyn Translator,
) -> Vec<SupplierRow> {
    let tasks = rows.into_iter().map(|mut row| async move {
        row.description = translate_field(row.description, translator).await;
        row.category = translate_field(row.category, translator).await;
        row.capability = translate_field(row.capability, translator).await;
        row
    });
    future::join_all(tasks).await
}

async fn translate_field(value: Option<String>, translator: &dyn Translator) -> Option<String> {
    match value {
        Some(text) if !text.trim().is_empty() => Some(translator.translate(&text).await),
        other => other,
    }
}
