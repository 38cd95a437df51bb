use futures::future;

use crate::domain::supplier::{SupplierId, SupplierRecord, SupplierRow};
use crate::sources::ProfileFetcher;

/// Builds the composite text a supplier is embedded from.
///
/// Present fields are joined one per line in the order category,
/// capability, profile text. Empty fields add no line.
pub fn enrich_text(
    category: Option<&str>,
    capability: Option<&str>,
    profile_text: Option<&str>,
) -> String {
    [category, capability, profile_text]
        .into_iter()
        .flatten()
        .filter(|field| !field.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Turns dataset rows into supplier records, scraping each supplier's
/// profile through `fetcher`.
///
/// Profiles are fetched concurrently; an unobtainable profile contributes an
/// empty string and never fails the batch.
pub async fn enrich_suppliers(
    rows: &[SupplierRow],
    fetcher: &dyn ProfileFetcher,
) -> Vec<SupplierRecord> {
    log::info!("Enriching {} supplier profiles", rows.len());

    let tasks = rows.iter().map(|row| async move {
        let profile_text = match row.profile_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => fetcher.fetch_profile_text(url).await,
            _ => String::new(),
        };

        SupplierRecord::new(
            SupplierId::parse(&row.supplier_id),
            row.supplier_name.clone(),
            enrich_text(
                row.category.as_deref(),
                row.capability.as_deref(),
                Some(profile_text.as_str()),
            ),
        )
    });

    future::join_all(tasks).await
}
