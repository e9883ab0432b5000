mod config;
mod errors;
mod llm_client;
mod models;
mod render;
mod resume;
mod routes;
mod scrape;
mod state;
#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::render::PdfRenderer;
use crate::routes::build_router;
use crate::scrape::FirecrawlClient;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed numeric env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Folio API v{}", env!("CARGO_PKG_VERSION"));

    if config.groq_api_key.is_none() {
        warn!("GROQ_API_KEY is not set; resume requests will fail with a configuration error");
    }
    if config.firecrawl_api_key.is_none() {
        warn!("FIRECRAWL_API_KEY is not set; generate requests will fail with a configuration error");
    }

    // One HTTP client shared by every outbound collaborator
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()
        .context("Failed to build HTTP client")?;

    let llm = LlmClient::new(
        http.clone(),
        &config.groq_api_url,
        config.groq_api_key.clone(),
        config.llm_max_attempts,
    );
    info!(
        "LLM client initialized (models: {}, {})",
        llm_client::GENERATION_MODEL,
        llm_client::CLASSIFIER_MODEL
    );

    let extractor = FirecrawlClient::new(
        http,
        &config.firecrawl_api_url,
        config.firecrawl_api_key.clone(),
        config.crawl_page_limit,
    );
    info!(
        "Content extractor initialized ({}, crawl limit {} pages)",
        config.firecrawl_api_url, config.crawl_page_limit
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        llm: Arc::new(llm),
        extractor: Arc::new(extractor),
        renderer: Arc::new(PdfRenderer),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
