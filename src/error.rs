//! Error types and handling.

use thiserror::Error;

use crate::config::ConfigError;
use crate::layout::LayoutError;
use crate::render::RenderError;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Data parsing error
    #[error("Parse error: {0}")]
    Parse(String),

    /// A required portal fetch failed
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    /// The student has no assessment records at all
    #[error("No marks available for report card generation")]
    NoMarks,

    /// Assembled document failed structural checks
    #[error("Validation failed: {}", errors.join("; "))]
    ValidationFailed { errors: Vec<String> },

    /// Layout or PDF construction failed
    #[error("Render error: {0}")]
    Render(String),

    /// Spreadsheet export error
    #[error("Export error: {0}")]
    Export(String),
}

/// Result type alias for AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Create a parse error with message
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a data-unavailable error with message
    pub fn data_unavailable(msg: impl Into<String>) -> Self {
        Self::DataUnavailable(msg.into())
    }

    /// Create a render error with message
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Whether the user can act on this error (as opposed to an internal failure).
    pub fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::DataUnavailable(_) | Self::NoMarks | Self::ValidationFailed { .. }
        )
    }

    /// Message shown to the user. Internal details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            Self::NoMarks => "No marks available. Please contact your instructor.".to_string(),
            Self::DataUnavailable(_) | Self::Http(_) => {
                "Unable to load your marks data. Please contact your instructor or administrator.".to_string()
            }
            Self::ValidationFailed { .. } => "Report card data is incomplete or invalid.".to_string(),
            _ => "Failed to generate report card. Please try again.".to_string(),
        }
    }
}

impl From<LayoutError> for AppError {
    fn from(e: LayoutError) -> Self {
        Self::Render(e.to_string())
    }
}

impl From<RenderError> for AppError {
    fn from(e: RenderError) -> Self {
        Self::Render(e.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for AppError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        Self::Export(e.to_string())
    }
}
