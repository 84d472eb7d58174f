/*!
 * Content ingestion queue.
 *
 * Each novel has a FIFO of chapter URLs still to fetch (`links:<id>`) and
 * an append-only log of fetched chapter texts (`contents:<id>`). The log
 * feeds context search during review. The queue is seeded once, from the
 * novel's catalog, and drained one URL at a time with a pause in between.
 */

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;
use scraper::{Html, Selector};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::providers::Sleeper;
use crate::storage::{self, keys, KeyValueStore};

/// Source of chapter texts
#[async_trait]
pub trait ChapterFetcher: Send + Sync {
    /// Fetch the chapter text behind `url`
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Fetcher downloading pages over HTTP and keeping only the chapter region
pub struct HttpChapterFetcher {
    client: Client,
    charset: String,
    region: Selector,
}

impl HttpChapterFetcher {
    /// Create a fetcher decoding bodies with `charset` unless the response
    /// names its own, and keeping the text of the first element matching
    /// the CSS `selector`
    pub fn new(charset: impl Into<String>, selector: &str) -> Result<Self> {
        let region = Selector::parse(selector)
            .map_err(|e| anyhow!("Invalid chapter selector '{}': {}", selector, e))?;

        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            charset: charset.into(),
            region,
        })
    }

    /// Visible text of the chapter region, one non-empty line per row.
    ///
    /// `<br>` breaks lines; script and style contents are skipped.
    fn extract_region(&self, url: &str, page: &str) -> Result<String> {
        let doc = Html::parse_document(page);
        let region = doc
            .select(&self.region)
            .next()
            .ok_or_else(|| anyhow!("No chapter region in page {}", url))?;

        let mut raw = String::new();
        for node in region.descendants() {
            if let Some(text) = node.value().as_text() {
                let hidden = node.ancestors().any(|a| {
                    a.value()
                        .as_element()
                        .is_some_and(|e| matches!(e.name(), "script" | "style"))
                });
                if !hidden {
                    raw.push_str(text);
                }
            } else if let Some(element) = node.value().as_element() {
                if matches!(element.name(), "br" | "p" | "div") {
                    raw.push('\n');
                }
            }
        }

        let lines: Vec<&str> = raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        Ok(lines.join("\n"))
    }
}

#[async_trait]
impl ChapterFetcher for HttpChapterFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch chapter page: {}", url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("Chapter page {} answered with status {}", url, status));
        }

        let page = response
            .text_with_charset(&self.charset)
            .await
            .with_context(|| format!("Failed to decode chapter page: {}", url))?;

        self.extract_region(url, &page)
    }
}

/// Pending links and fetched contents of one novel
pub struct IngestionQueue {
    store: Arc<dyn KeyValueStore>,
    novel_id: String,
}

impl IngestionQueue {
    /// Queue for `novel_id`
    pub fn new(store: Arc<dyn KeyValueStore>, novel_id: impl Into<String>) -> Self {
        Self {
            store,
            novel_id: novel_id.into(),
        }
    }

    /// Persist the links to fetch, in fetch order.
    ///
    /// Only a novel without a persisted queue is seeded, so a partly drained
    /// queue is never restarted. Links that are not absolute URLs are
    /// skipped. Returns the number of links queued.
    pub async fn seed_links(&self, urls: &[String]) -> Result<usize> {
        let key = keys::links(&self.novel_id);

        if self.store.get(&key).await?.is_some() {
            debug!("Link queue for novel {} already exists", self.novel_id);
            return Ok(0);
        }

        let links: Vec<String> = urls
            .iter()
            .filter(|url| match Url::parse(url) {
                Ok(_) => true,
                Err(e) => {
                    warn!("Skipping invalid chapter link '{}': {}", url, e);
                    false
                }
            })
            .cloned()
            .collect();

        storage::save(self.store.as_ref(), &key, &links).await?;
        info!("Queued {} chapter links for novel {}", links.len(), self.novel_id);

        Ok(links.len())
    }

    /// Links still to fetch, head first
    pub async fn pending_links(&self) -> Result<Vec<String>> {
        storage::load_or_default(self.store.as_ref(), &keys::links(&self.novel_id)).await
    }

    /// Fetched chapter texts, oldest first
    pub async fn contents(&self) -> Result<Vec<String>> {
        storage::load_or_default(self.store.as_ref(), &keys::contents(&self.novel_id)).await
    }

    /// Append one chapter text to the content log
    pub async fn append_content(&self, text: &str) -> Result<()> {
        let mut contents = self.contents().await?;
        contents.push(text.to_string());
        storage::save(self.store.as_ref(), &keys::contents(&self.novel_id), &contents).await
    }

    /// Delete the content log and the link queue
    pub async fn clear(&self) -> Result<()> {
        self.store.delete(&keys::contents(&self.novel_id)).await?;
        self.store.delete(&keys::links(&self.novel_id)).await?;
        info!("Cleared ingested content for novel {}", self.novel_id);
        Ok(())
    }

    /// Fetch the head link, drop it from the queue and log its text.
    ///
    /// Returns the fetched link, or `None` when the queue is empty. A failed
    /// fetch leaves the queue untouched.
    pub async fn pump_one(&self, fetcher: &dyn ChapterFetcher) -> Result<Option<String>> {
        let mut links = self.pending_links().await?;
        if links.is_empty() {
            return Ok(None);
        }

        let link = links.remove(0);
        let text = fetcher.fetch(&link).await?;

        storage::save(self.store.as_ref(), &keys::links(&self.novel_id), &links).await?;
        self.append_content(&text).await?;

        debug!("Ingested {} ({} left)", link, links.len());
        Ok(Some(link))
    }

    /// Pump until the queue is empty, pausing `interval` between fetches.
    ///
    /// Returns the number of chapters fetched.
    pub async fn drain(
        &self,
        fetcher: &dyn ChapterFetcher,
        sleeper: &dyn Sleeper,
        interval: Duration,
    ) -> Result<usize> {
        let mut fetched = 0;

        while self.pump_one(fetcher).await?.is_some() {
            fetched += 1;

            if self.pending_links().await?.is_empty() {
                break;
            }
            sleeper.sleep(interval).await;
        }

        info!("Fetched {} chapters for novel {}", fetched, self.novel_id);
        Ok(fetched)
    }
}
