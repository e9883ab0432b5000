// Document rendering: Resume → paginated PDF.
// Layout is pure and runs inside tokio::task::spawn_blocking together with serialization.

pub mod layout;
pub mod metrics;
pub mod pdf;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::resume::Resume;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF encoding failed: {0}")]
    Pdf(String),

    #[error("render task failed: {0}")]
    Task(String),
}

/// Seam between the pipeline and the document backend.
/// Carried in `AppState` as `Arc<dyn DocumentRenderer>`.
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    async fn render(&self, resume: &Resume) -> Result<Vec<u8>, RenderError>;
}

/// Built-in single-column A4 Helvetica template.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfRenderer;

#[async_trait]
impl DocumentRenderer for PdfRenderer {
    async fn render(&self, resume: &Resume) -> Result<Vec<u8>, RenderError> {
        let resume = resume.clone();
        tokio::task::spawn_blocking(move || pdf::render_pdf(&resume))
            .await
            .map_err(|e| RenderError::Task(e.to_string()))?
    }
}
