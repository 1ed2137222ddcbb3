use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::OcrConfig;
use crate::error::{Result, ScanError};

use super::{ImagePayload, OnlineOcr};

pub const DEFAULT_VISION_BASE_URL: &str = "https://vision.googleapis.com/v1";

// Sent as a header so the key never appears in request URLs or error text.
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Clone, Debug)]
pub struct VisionClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct AnnotateRequest {
    requests: Vec<AnnotateImageRequest>,
}

#[derive(Debug, Serialize)]
struct AnnotateImageRequest {
    image: ImageContent,
    features: Vec<Feature>,
}

#[derive(Debug, Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Debug, Serialize)]
struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    full_text_annotation: Option<TextAnnotation>,
    error: Option<ApiStatus>,
}

#[derive(Debug, Deserialize)]
struct TextAnnotation {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct ApiStatus {
    #[serde(default)]
    message: String,
}

impl VisionClient {
    pub fn new(config: &OcrConfig) -> Result<Self> {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_VISION_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ScanError::Ocr(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url,
        })
    }

    pub fn has_default_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub async fn annotate(&self, image: &ImagePayload, credential: Option<&str>) -> Result<String> {
        let api_key = credential
            .filter(|k| !k.trim().is_empty())
            .or(self.api_key.as_deref())
            .ok_or_else(|| {
                ScanError::MissingCredential("API key required for Vision OCR".to_string())
            })?;

        let request = AnnotateRequest {
            requests: vec![AnnotateImageRequest {
                image: ImageContent {
                    content: image.to_base64(),
                },
                features: vec![Feature {
                    kind: "TEXT_DETECTION",
                }],
            }],
        };

        let response = self
            .client
            .post(format!("{}/images:annotate", self.base_url))
            .header(API_KEY_HEADER, api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ScanError::Http(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScanError::Ocr(format!(
                "Vision API request failed: {status} - {body}"
            )));
        }

        let parsed: AnnotateResponse = response
            .json()
            .await
            .map_err(|e| {
                ScanError::Ocr(format!(
                    "Failed to parse Vision response: {}",
                    e.without_url()
                ))
            })?;

        match parsed.responses.into_iter().next() {
            Some(AnnotateImageResponse {
                full_text_annotation: Some(annotation),
                ..
            }) if !annotation.text.is_empty() => Ok(annotation.text),
            Some(AnnotateImageResponse {
                error: Some(error), ..
            }) => {
                tracing::debug!(message = %error.message, "Vision API reported an image error");
                Err(ScanError::NoTextDetected)
            }
            _ => Err(ScanError::NoTextDetected),
        }
    }
}

#[async_trait]
impl OnlineOcr for VisionClient {
    async fn recognize(&self, image: &ImagePayload, credential: Option<&str>) -> Result<String> {
        self.annotate(image, credential).await
    }
}
