use async_trait::async_trait;

use crate::error::Result;

use super::ImagePayload;

/// Remote text detection. Successful calls count against the monthly quota.
#[async_trait]
pub trait OnlineOcr: Send + Sync {
    /// Recognize text in `image`. `credential` overrides any configured key.
    async fn recognize(&self, image: &ImagePayload, credential: Option<&str>) -> Result<String>;
}

/// Local text recognition, no quota.
#[async_trait]
pub trait OfflineOcr: Send + Sync {
    async fn recognize(&self, image: &ImagePayload) -> Result<String>;
}
