//! Hand-rolled collaborator doubles shared by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use url::Url;

use crate::config::Config;
use crate::llm_client::{GenerationRequest, LlmError, StructuredGenerator};
use crate::models::resume::Resume;
use crate::render::{DocumentRenderer, PdfRenderer, RenderError};
use crate::scrape::{ContentExtractor, ExtractMode, SourceError};
use crate::state::AppState;

#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    /// The provider answered with no content.
    Empty,
    /// The provider failed with a 500.
    Fail(String),
}

impl MockReply {
    pub fn text(s: &str) -> Self {
        MockReply::Text(s.to_string())
    }
}

/// Replays scripted replies in order; the last one repeats once the script runs out.
pub struct MockGenerator {
    replies: Vec<MockReply>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl MockGenerator {
    pub fn new(replies: Vec<MockReply>) -> Self {
        Self {
            replies,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl StructuredGenerator for MockGenerator {
    async fn generate_structured(
        &self,
        request: &GenerationRequest,
    ) -> Result<Option<String>, LlmError> {
        let index = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            requests.len() - 1
        };

        let reply = self
            .replies
            .get(index)
            .or_else(|| self.replies.last())
            .cloned()
            .unwrap_or(MockReply::Empty);

        match reply {
            MockReply::Text(text) => Ok(Some(text)),
            MockReply::Empty => Ok(None),
            MockReply::Fail(message) => Err(LlmError::Api {
                status: 500,
                message,
            }),
        }
    }
}

/// Returns one canned extraction result and counts calls.
pub struct MockExtractor {
    result: Mutex<Option<Result<String, SourceError>>>,
    calls: AtomicUsize,
}

impl MockExtractor {
    pub fn content(text: &str) -> Self {
        Self::with(Ok(text.to_string()))
    }

    pub fn failing(err: SourceError) -> Self {
        Self::with(Err(err))
    }

    fn with(result: Result<String, SourceError>) -> Self {
        Self {
            result: Mutex::new(Some(result)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentExtractor for MockExtractor {
    async fn extract_content(&self, _url: &Url, _mode: ExtractMode) -> Result<String, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result
            .lock()
            .unwrap()
            .take()
            .unwrap_or(Err(SourceError::Empty))
    }
}

/// Wraps the real renderer and records every resume it is handed.
#[derive(Default)]
pub struct CountingRenderer {
    rendered: Mutex<Vec<Resume>>,
}

impl CountingRenderer {
    pub fn call_count(&self) -> usize {
        self.rendered.lock().unwrap().len()
    }

    pub fn rendered(&self) -> Vec<Resume> {
        self.rendered.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentRenderer for CountingRenderer {
    async fn render(&self, resume: &Resume) -> Result<Vec<u8>, RenderError> {
        self.rendered.lock().unwrap().push(resume.clone());
        PdfRenderer.render(resume).await
    }
}

/// Serves `router` on an ephemeral localhost port and returns its base URL.
pub async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn test_config() -> Config {
    Config {
        groq_api_key: Some("test-groq-key".to_string()),
        groq_api_url: "http://localhost:9999/v1/chat/completions".to_string(),
        firecrawl_api_key: Some("test-firecrawl-key".to_string()),
        firecrawl_api_url: "http://localhost:3002".to_string(),
        crawl_page_limit: 3,
        http_timeout_secs: 5,
        llm_max_attempts: 1,
        port: 0,
        rust_log: "debug".to_string(),
    }
}

pub fn test_state(
    config: Config,
    llm: Arc<MockGenerator>,
    extractor: Arc<MockExtractor>,
    renderer: Arc<CountingRenderer>,
) -> AppState {
    AppState {
        config,
        llm,
        extractor,
        renderer,
    }
}
