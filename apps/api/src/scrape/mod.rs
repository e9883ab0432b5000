//! Content extraction: turns a portfolio URL into raw markdown/text.
//!
//! The scraping itself is delegated to an external service; this module owns the
//! seam (`ContentExtractor`), the extraction modes, and the failure taxonomy that
//! the pipeline maps onto caller-facing errors.

use std::str::FromStr;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

pub mod firecrawl;

pub use firecrawl::FirecrawlClient;

/// How much of the site to read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExtractMode {
    /// Only the given page.
    #[default]
    SinglePage,
    /// A bounded crawl starting at the given page.
    MultiPage,
}

impl FromStr for ExtractMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scrape" | "single-page" | "single_page" => Ok(ExtractMode::SinglePage),
            "crawl" | "multi-page" | "multi_page" | "multi-page-limited" => {
                Ok(ExtractMode::MultiPage)
            }
            other => Err(format!(
                "Invalid mode '{other}': expected 'scrape' or 'crawl'"
            )),
        }
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    /// The site (or the scraping service's policy) refuses access.
    #[error("access blocked: {0}")]
    Blocked(String),

    #[error("source inaccessible: {0}")]
    Inaccessible(String),

    #[error("no content returned")]
    Empty,
}

/// Seam between the pipeline and the scraping service.
/// Carried in `AppState` as `Arc<dyn ContentExtractor>`.
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    async fn extract_content(&self, url: &Url, mode: ExtractMode) -> Result<String, SourceError>;
}

/// Parses and checks a caller-supplied URL. Only absolute http(s) URLs are accepted.
pub fn parse_portfolio_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw.trim()).map_err(|_| "Invalid URL format".to_string())?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        _ => Err("Invalid URL format: only http and https URLs are supported".to_string()),
    }
}

/// Classifies a scraping-service failure: HTTP 403 or any mention of a blocklist
/// means the site refuses access, everything else is a generic failure.
pub fn classify_failure(status: Option<u16>, message: &str) -> SourceError {
    if status == Some(403) || message.to_ascii_lowercase().contains("blocklist") {
        SourceError::Blocked(message.to_string())
    } else {
        SourceError::Inaccessible(message.to_string())
    }
}
