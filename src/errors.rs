// errors.rs
use thiserror::Error;

/// Errors raised by the qualifier and its collaborators
/// (places lookups, site probes, input files, workbook export).
#[derive(Debug, Error)]
pub enum QualifierError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Places API error ({status}): {message}")]
    Places { status: String, message: String },

    #[error("JSON parse error: {0}")]
    JsonParse(String),

    #[error("HTML parse error: {0}")]
    HtmlParse(String),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("XLSX error: {0}")]
    Xlsx(String),

    #[error("IO error: {0}")]
    Io(String),
}

pub type Result<T> = std::result::Result<T, QualifierError>;
