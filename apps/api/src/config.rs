use anyhow::{Context, Result};

use crate::llm_client::DEFAULT_GROQ_API_URL;
use crate::scrape::firecrawl::DEFAULT_FIRECRAWL_URL;

/// Application configuration loaded from environment variables.
///
/// Service credentials are optional at startup: a missing key is reported per request
/// as a configuration error, before any collaborator is contacted.
#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: Option<String>,
    /// Chat completions endpoint; any OpenAI-compatible server works.
    pub groq_api_url: String,
    pub firecrawl_api_key: Option<String>,
    pub firecrawl_api_url: String,
    /// Page budget for multi-page crawls.
    pub crawl_page_limit: u32,
    pub http_timeout_secs: u64,
    /// Attempts per LLM call; only 429 and 5xx responses are retried, transport
    /// failures are not.
    pub llm_max_attempts: u32,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            groq_api_key: optional_env("GROQ_API_KEY"),
            groq_api_url: optional_env("GROQ_API_URL")
                .unwrap_or_else(|| DEFAULT_GROQ_API_URL.to_string()),
            firecrawl_api_key: optional_env("FIRECRAWL_API_KEY"),
            firecrawl_api_url: optional_env("FIRECRAWL_API_URL")
                .unwrap_or_else(|| DEFAULT_FIRECRAWL_URL.to_string()),
            crawl_page_limit: parsed_env("CRAWL_PAGE_LIMIT", 3)?,
            http_timeout_secs: parsed_env("HTTP_TIMEOUT_SECS", 120)?,
            llm_max_attempts: parsed_env("LLM_MAX_ATTEMPTS", 3)?,
            port: parsed_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Unset and blank variables are both treated as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parsed_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_env_falls_back_to_default() {
        let value: u32 = parsed_env("FOLIO_TEST_UNSET_VARIABLE", 3).unwrap();
        assert_eq!(value, 3);
    }

    #[test]
    fn test_parsed_env_rejects_garbage() {
        std::env::set_var("FOLIO_TEST_BAD_PORT", "eighty");
        let result: Result<u16> = parsed_env("FOLIO_TEST_BAD_PORT", 8080);
        assert!(result.is_err());
        std::env::remove_var("FOLIO_TEST_BAD_PORT");
    }

    #[test]
    fn test_blank_variable_is_absent() {
        std::env::set_var("FOLIO_TEST_BLANK_KEY", "  ");
        assert!(optional_env("FOLIO_TEST_BLANK_KEY").is_none());
        std::env::remove_var("FOLIO_TEST_BLANK_KEY");
    }
}
