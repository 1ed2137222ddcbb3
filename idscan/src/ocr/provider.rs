use std::time::Duration;

use async_trait::async_trait;
#[cfg(feature = "local-ocr")]
use std::sync::Arc;
#[cfg(feature = "local-ocr")]
use tokio::sync::{Mutex, OnceCell};

#[cfg(feature = "local-ocr")]
use leptess::LepTess;

use crate::config::OcrConfig;
use crate::error::{Result, ScanError};

use super::{ImagePayload, OfflineOcr};

/// Local Tesseract OCR. The engine is created on the first call and reused.
pub struct TesseractProvider {
    languages: String,
    timeout: Duration,
    #[cfg(feature = "local-ocr")]
    engine: OnceCell<Arc<Mutex<LepTess>>>,
}

#[cfg(feature = "local-ocr")]
fn create_tesseract(languages: &str) -> std::result::Result<LepTess, String> {
    LepTess::new(None, languages).map_err(|e| e.to_string())
}

impl TesseractProvider {
    pub fn new(config: &OcrConfig) -> Self {
        Self {
            languages: config.languages.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            #[cfg(feature = "local-ocr")]
            engine: OnceCell::new(),
        }
    }

    pub fn languages(&self) -> &str {
        &self.languages
    }

    /// Whether the engine has been loaded by a previous call.
    pub fn is_loaded(&self) -> bool {
        #[cfg(feature = "local-ocr")]
        {
            self.engine.initialized()
        }
        #[cfg(not(feature = "local-ocr"))]
        {
            false
        }
    }

    #[cfg(feature = "local-ocr")]
    async fn engine(&self) -> Result<Arc<Mutex<LepTess>>> {
        let engine = self
            .engine
            .get_or_try_init(|| async {
                let lt = create_tesseract(&self.languages).map_err(|e| {
                    tracing::warn!(languages = %self.languages, error = %e, "Tesseract failed to load");
                    ScanError::OcrUnavailable(format!("Tesseract not available: {e}"))
                })?;
                tracing::info!(languages = %self.languages, "Tesseract OCR initialized");
                Ok::<_, ScanError>(Arc::new(Mutex::new(lt)))
            })
            .await?;
        Ok(Arc::clone(engine))
    }

    #[cfg(feature = "local-ocr")]
    async fn recognize_internal(&self, image: &ImagePayload) -> Result<String> {
        let tesseract = self.engine().await?;
        let bytes = image.as_bytes().to_vec();

        let text = tokio::task::spawn_blocking(move || {
            let mut lt = tesseract.blocking_lock();
            lt.set_image_from_mem(&bytes)
                .map_err(|e| ScanError::Ocr(format!("Failed to set image: {e}")))?;
            lt.get_utf8_text()
                .map_err(|e| ScanError::Ocr(format!("Failed to extract text: {e}")))
        })
        .await
        .map_err(|e| ScanError::Internal(format!("OCR task panicked: {e}")))??;

        Ok(text.trim().to_string())
    }

    #[cfg(not(feature = "local-ocr"))]
    async fn recognize_internal(&self, _image: &ImagePayload) -> Result<String> {
        Err(ScanError::OcrUnavailable(
            "built with `--no-default-features` (no `local-ocr`)".to_string(),
        ))
    }
}

#[async_trait]
impl OfflineOcr for TesseractProvider {
    async fn recognize(&self, image: &ImagePayload) -> Result<String> {
        match tokio::time::timeout(self.timeout, self.recognize_internal(image)).await {
            Ok(inner_result) => inner_result,
            Err(_) => Err(ScanError::Ocr(format!(
                "OCR operation timed out after {} seconds",
                self.timeout.as_secs()
            ))),
        }
    }
}
