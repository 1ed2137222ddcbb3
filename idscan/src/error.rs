use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Database error: {0}")]
    Database(#[from] libsql::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No text detected")]
    NoTextDetected,

    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("OCR error: {0}")]
    Ocr(String),

    #[error("OCR unavailable: {0}")]
    OcrUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ScanError {
    /// Whether the error came from an OCR backend (no text, transport, or
    /// engine failure) rather than from storage or input handling.
    pub fn is_backend_failure(&self) -> bool {
        matches!(
            self,
            ScanError::NoTextDetected
                | ScanError::MissingCredential(_)
                | ScanError::Ocr(_)
                | ScanError::OcrUnavailable(_)
                | ScanError::Http(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
