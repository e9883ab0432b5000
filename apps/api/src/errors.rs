use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};
use thiserror::Error;

const BLOCKED_DETAILS: &str = "The website is protected or has restrictions that prevent scraping. \
    Try using a different portfolio URL or a personal website.";

const INSUFFICIENT_DETAILS: &str = "The website does not contain enough information to create a basic resume. \
    Please ensure the portfolio includes your name, projects, skills, or professional experience.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Collaborator errors never cross this boundary raw: every variant carries a
/// descriptive message built where the failure was caught.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The content source refused access (HTTP 403, blocklisted domain).
    #[error("Source blocked: {0}")]
    SourceBlocked(String),

    #[error("Source inaccessible: {0}")]
    SourceInaccessible(String),

    #[error("No content extracted")]
    NoContent,

    /// Rejected by the sufficiency gate; carries the classifier's reason if it gave one.
    #[error("Insufficient content: {}", .0.as_deref().unwrap_or("no reason given"))]
    InsufficientContent(Option<String>),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Mutation error: {0}")]
    Mutation(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::SourceBlocked(_) => StatusCode::FORBIDDEN,
            AppError::SourceInaccessible(_)
            | AppError::Extraction(_)
            | AppError::Mutation(_) => StatusCode::BAD_GATEWAY,
            AppError::NoContent | AppError::InsufficientContent(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Configuration(_) | AppError::Render(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::SourceBlocked(_) => "SOURCE_BLOCKED",
            AppError::SourceInaccessible(_) => "SOURCE_INACCESSIBLE",
            AppError::NoContent => "NO_CONTENT",
            AppError::InsufficientContent(_) => "INSUFFICIENT_CONTENT",
            AppError::Extraction(_) => "EXTRACTION_ERROR",
            AppError::Mutation(_) => "MUTATION_ERROR",
            AppError::Render(_) => "RENDER_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Builds the `{"error": {...}}` body. Split out so tests can inspect it without a server.
    pub fn body(&self) -> Value {
        let mut error = Map::new();
        error.insert("code".to_string(), json!(self.code()));

        let message = match self {
            AppError::Validation(msg) | AppError::Configuration(msg) => msg.clone(),
            AppError::SourceBlocked(_) => {
                error.insert("errorType".to_string(), json!("blocklisted"));
                error.insert("details".to_string(), json!(BLOCKED_DETAILS));
                "This website cannot be accessed".to_string()
            }
            AppError::SourceInaccessible(_) => "Failed to scrape website. \
                The site may be down, unreachable, or slow to respond."
                .to_string(),
            AppError::NoContent => "Failed to extract content from the website. \
                The website may be inaccessible or have no readable content."
                .to_string(),
            AppError::InsufficientContent(reason) => {
                let details = reason.as_deref().unwrap_or(INSUFFICIENT_DETAILS);
                error.insert("details".to_string(), json!(details));
                "Insufficient content for resume".to_string()
            }
            AppError::Extraction(msg) => format!("Failed to parse content: {msg}"),
            AppError::Mutation(msg) => format!("Failed to apply modifications: {msg}"),
            AppError::Render(msg) => format!("Failed to generate PDF: {msg}"),
            AppError::Internal(_) => "An internal server error occurred".to_string(),
        };
        error.insert("message".to_string(), json!(message));

        json!({ "error": error })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
            _ if status.is_server_error() => tracing::error!("{self}"),
            _ => tracing::warn!("{self}"),
        }

        (status, Json(self.body())).into_response()
    }
}
