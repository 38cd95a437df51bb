use std::sync::Arc;

use async_trait::async_trait;
use scraper::{Html, Selector};
use tokio::sync::Semaphore;
use url::Url;

use crate::sources::ProfileFetcher;

/// Scrapes the "About" text from supplier profile pages, limiting
/// concurrent HTTP requests with a [`Semaphore`].
pub struct LinkedInProfileFetcher {
    client: reqwest::Client,
    semaphore: Arc<Semaphore>,
}

impl LinkedInProfileFetcher {
    /// Creates a fetcher that keeps at most `concurrency` requests in flight.
    pub fn new(client: reqwest::Client, concurrency: usize) -> Self {
        Self {
            client,
            semaphore: Arc::new(Semaphore::new(concurrency.max(1))),
        }
    }

    /// Fetches a URL and parses it into [`Html`].
    ///
    /// A permit from the internal [`Semaphore`] is acquired before issuing
    /// the request.
    async fn fetch_html(&self, url: &str) -> Option<Html> {
        let _permit = self.semaphore.acquire().await.ok()?;
        let res = match self.client.get(url).send().await {
            Ok(res) => res,
            Err(e) => {
                log::warn!("Failed to get profile {url}: {e}");
                return None;
            }
        };
        if !res.status().is_success() {
            log::warn!("Failed to get profile {}: {}", url, res.status());
            return None;
        }
        let text = res.text().await.ok()?;
        Some(Html::parse_document(&text))
    }
}

#[async_trait]
impl ProfileFetcher for LinkedInProfileFetcher {
    async fn fetch_profile_text(&self, url: &str) -> String {
        match Url::parse(url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            _ => {
                log::warn!("Skipping profile with unsupported URL {url:?}");
                return String::new();
            }
        }

        match self.fetch_html(url).await {
            Some(document) => extract_about_text(&document),
            None => String::new(),
        }
    }
}

/// Collects the text of every `<section>` that mentions "About".
///
/// Whitespace inside each section is collapsed and sections are joined with
/// a single space.
pub fn extract_about_text(document: &Html) -> String {
    let Ok(selector) = Selector::parse("section") else {
        return String::new();
    };

    document
        .select(&selector)
        .map(|section| {
            section
                .text()
                .flat_map(str::split_whitespace)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|text| text.contains("About"))
        .collect::<Vec<_>>()
        .join(" ")
}
