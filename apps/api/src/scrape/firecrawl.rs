//! Firecrawl client, the production `ContentExtractor`.
//!
//! Single-page mode calls `/v1/scrape`. Multi-page mode starts a `/v1/crawl` job
//! bounded by the configured page limit and polls it until completion, then joins
//! the pages' markdown with a horizontal-rule separator.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use super::{classify_failure, ContentExtractor, ExtractMode, SourceError};

pub const DEFAULT_FIRECRAWL_URL: &str = "https://api.firecrawl.dev";
const PAGE_SEPARATOR: &str = "\n\n---\n\n";
const POLL_INTERVAL: Duration = Duration::from_secs(2);
const MAX_POLLS: u32 = 60;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScrapeRequest<'a> {
    url: &'a str,
    formats: [&'static str; 1],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CrawlRequest<'a> {
    url: &'a str,
    limit: u32,
    scrape_options: ScrapeOptions,
}

#[derive(Debug, Serialize)]
struct ScrapeOptions {
    formats: [&'static str; 1],
}

#[derive(Debug, Deserialize)]
struct ScrapeResponse {
    #[serde(default)]
    data: Option<PageData>,
}

#[derive(Debug, Default, Deserialize)]
struct PageData {
    #[serde(default)]
    markdown: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CrawlStarted {
    id: String,
}

#[derive(Debug, Deserialize)]
struct CrawlStatus {
    status: String,
    #[serde(default)]
    data: Vec<PageData>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FirecrawlError {
    error: String,
}

#[derive(Clone)]
pub struct FirecrawlClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    page_limit: u32,
}

impl FirecrawlClient {
    pub fn new(client: Client, base_url: &str, api_key: Option<String>, page_limit: u32) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            page_limit: page_limit.max(1),
        }
    }

    fn api_key(&self) -> Result<&str, SourceError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| SourceError::Inaccessible("FIRECRAWL_API_KEY is not configured".into()))
    }

    async fn scrape(&self, url: &Url) -> Result<String, SourceError> {
        let response = self
            .client
            .post(format!("{}/v1/scrape", self.base_url))
            .bearer_auth(self.api_key()?)
            .json(&ScrapeRequest {
                url: url.as_str(),
                formats: ["markdown"],
            })
            .send()
            .await
            .map_err(transport_error)?;

        let body: ScrapeResponse = checked(response).await?;
        Ok(body.data.and_then(|d| d.markdown).unwrap_or_default())
    }

    async fn crawl(&self, url: &Url) -> Result<String, SourceError> {
        let api_key = self.api_key()?;
        let response = self
            .client
            .post(format!("{}/v1/crawl", self.base_url))
            .bearer_auth(api_key)
            .json(&CrawlRequest {
                url: url.as_str(),
                limit: self.page_limit,
                scrape_options: ScrapeOptions {
                    formats: ["markdown"],
                },
            })
            .send()
            .await
            .map_err(transport_error)?;

        let started: CrawlStarted = checked(response).await?;
        info!("Crawl job {} started for {} (limit {})", started.id, url, self.page_limit);

        for poll in 0..MAX_POLLS {
            tokio::time::sleep(POLL_INTERVAL).await;

            let response = self
                .client
                .get(format!("{}/v1/crawl/{}", self.base_url, started.id))
                .bearer_auth(api_key)
                .send()
                .await
                .map_err(transport_error)?;

            let status: CrawlStatus = checked(response).await?;
            debug!("Crawl job {} poll {}: {}", started.id, poll + 1, status.status);

            match status.status.as_str() {
                "completed" => return Ok(join_pages(status.data)),
                "failed" | "cancelled" => {
                    let message = status
                        .error
                        .unwrap_or_else(|| format!("crawl job {}", status.status));
                    return Err(classify_failure(None, &message));
                }
                _ => continue,
            }
        }

        Err(SourceError::Inaccessible(format!(
            "crawl job {} did not complete after {} polls",
            started.id, MAX_POLLS
        )))
    }
}

#[async_trait]
impl ContentExtractor for FirecrawlClient {
    async fn extract_content(&self, url: &Url, mode: ExtractMode) -> Result<String, SourceError> {
        let content = match mode {
            ExtractMode::SinglePage => self.scrape(url).await?,
            ExtractMode::MultiPage => self.crawl(url).await?,
        };
        if content.trim().is_empty() {
            return Err(SourceError::Empty);
        }
        Ok(content)
    }
}

/// Joins crawled pages, skipping the ones that produced no markdown.
fn join_pages(pages: Vec<PageData>) -> String {
    pages
        .into_iter()
        .filter_map(|p| p.markdown)
        .filter(|md| !md.is_empty())
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR)
}

fn transport_error(e: reqwest::Error) -> SourceError {
    SourceError::Inaccessible(e.to_string())
}

/// Deserializes a successful response, or classifies the failure.
async fn checked<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, SourceError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<FirecrawlError>(&body)
            .map(|e| e.error)
            .unwrap_or(body);
        return Err(classify_failure(Some(status.as_u16()), &message));
    }
    response
        .json()
        .await
        .map_err(|e| SourceError::Inaccessible(format!("unexpected response: {e}")))
}
