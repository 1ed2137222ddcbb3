use std::sync::Arc;

use tracing::{error, info, warn};

use crate::config::Config;
use crate::db::KeyValueStore;
use crate::error::{Result, ScanError};
use crate::models::{QuotaStatus, ScanMode, ScanResult};
use crate::ocr::{OfflineOcr, OnlineOcr, TesseractProvider, VisionClient};
use crate::parser::{DocumentParser, IdDocumentParser};
use crate::usage::UsageTracker;

use super::ScanRequest;

/// Online OCR calls allowed per calendar month before auto mode goes offline.
pub const DEFAULT_MONTHLY_LIMIT: u64 = 999;

pub struct Scanner {
    online: Arc<dyn OnlineOcr>,
    offline: Arc<dyn OfflineOcr>,
    usage: Arc<UsageTracker>,
    parser: Arc<dyn DocumentParser>,
    monthly_limit: u64,
}

impl Scanner {
    pub fn new(
        online: Arc<dyn OnlineOcr>,
        offline: Arc<dyn OfflineOcr>,
        usage: Arc<UsageTracker>,
    ) -> Self {
        Self {
            online,
            offline,
            usage,
            parser: Arc::new(IdDocumentParser::new()),
            monthly_limit: DEFAULT_MONTHLY_LIMIT,
        }
    }

    /// Vision online, Tesseract offline, usage persisted in `store`.
    pub fn from_config(config: &Config, store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let online = VisionClient::new(&config.ocr)?;
        if !online.has_default_key() {
            info!("VISION_API_KEY not set - online OCR needs a per-request credential");
        }
        let offline = TesseractProvider::new(&config.ocr);

        Ok(Self::new(
            Arc::new(online),
            Arc::new(offline),
            Arc::new(UsageTracker::new(store)),
        ))
    }

    pub fn with_parser(mut self, parser: Arc<dyn DocumentParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_monthly_limit(mut self, limit: u64) -> Self {
        self.monthly_limit = limit;
        self
    }

    pub fn monthly_limit(&self) -> u64 {
        self.monthly_limit
    }

    pub fn usage(&self) -> &UsageTracker {
        &self.usage
    }

    pub async fn quota(&self) -> Result<QuotaStatus> {
        let record = self.usage.snapshot().await?;
        Ok(QuotaStatus::new(record, self.monthly_limit))
    }

    /// Recognize and parse one document image.
    pub async fn scan(&self, request: ScanRequest) -> Result<ScanResult> {
        let text = self.recognize(&request).await?;
        Ok(self.parser.parse(&text))
    }

    /// Callback form of [`Scanner::scan`]: exactly one callback runs.
    /// Errors are dropped when `on_error` is `None`.
    pub async fn scan_with<S, E>(&self, request: ScanRequest, on_success: S, on_error: Option<E>)
    where
        S: FnOnce(ScanResult),
        E: FnOnce(ScanError),
    {
        match self.scan(request).await {
            Ok(result) => on_success(result),
            Err(e) => match on_error {
                Some(on_error) => on_error(e),
                None => warn!(error = %e, "Scan failed with no error handler"),
            },
        }
    }

    async fn recognize(&self, request: &ScanRequest) -> Result<String> {
        let credential = request.credential.as_deref();

        match request.mode {
            ScanMode::Offline => self.offline.recognize(&request.image).await,
            ScanMode::Online => {
                let text = self.online.recognize(&request.image, credential).await?;
                self.record_online_success().await;
                Ok(text)
            }
            ScanMode::Auto => {
                let used = self.usage.current_usage().await?;
                if used >= self.monthly_limit {
                    info!(
                        used,
                        limit = self.monthly_limit,
                        "Monthly online OCR quota reached, using offline OCR"
                    );
                    return self.offline.recognize(&request.image).await;
                }

                match self.online.recognize(&request.image, credential).await {
                    Ok(text) => {
                        self.record_online_success().await;
                        Ok(text)
                    }
                    Err(e) => {
                        warn!(
                            error = %e,
                            backend = e.is_backend_failure(),
                            "Online OCR failed, falling back to offline OCR"
                        );
                        self.offline.recognize(&request.image).await
                    }
                }
            }
        }
    }

    // The recognized text is still delivered if the counter cannot be saved.
    async fn record_online_success(&self) {
        if let Err(e) = self.usage.record_usage().await {
            error!(error = %e, "Failed to record online OCR usage");
        }
    }
}
