use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::StructuredGenerator;
use crate::render::DocumentRenderer;
use crate::scrape::ContentExtractor;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Holds only read-only collaborators; resumes are never stored server-side.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub llm: Arc<dyn StructuredGenerator>,
    pub extractor: Arc<dyn ContentExtractor>,
    pub renderer: Arc<dyn DocumentRenderer>,
}
