use crate::models::ScanMode;
use crate::ocr::ImagePayload;

/// One scan attempt. Built per call, never persisted.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub image: ImagePayload,
    /// Online OCR credential; falls back to the configured key when `None`.
    pub credential: Option<String>,
    pub mode: ScanMode,
}

impl ScanRequest {
    pub fn new(image: ImagePayload) -> Self {
        Self {
            image,
            credential: None,
            mode: ScanMode::default(),
        }
    }

    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    pub fn with_mode(mut self, mode: ScanMode) -> Self {
        self.mode = mode;
        self
    }
}
