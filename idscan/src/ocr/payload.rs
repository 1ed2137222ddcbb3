use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine};
use image::{GenericImageView, ImageReader};

use crate::config::OcrConfig;
use crate::error::{Result, ScanError};

/// Encoded image bytes (PNG, JPEG, ...) handed to the OCR backends unchanged.
#[derive(Clone, PartialEq, Eq)]
pub struct ImagePayload {
    bytes: Vec<u8>,
}

impl ImagePayload {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Decode plain base64 or a `data:<mime>;base64,<data>` URL.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let data = match encoded.split_once(',') {
            Some((prefix, data)) if prefix.starts_with("data:") => data,
            _ => encoded,
        };
        let compact: String = data.split_whitespace().collect();

        let bytes = STANDARD
            .decode(compact.as_bytes())
            .map_err(|e| ScanError::Validation(format!("Invalid base64 image: {e}")))?;
        if bytes.is_empty() {
            return Err(ScanError::Validation("Image payload is empty".to_string()));
        }
        Ok(Self { bytes })
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path.as_ref()).await?;
        if bytes.is_empty() {
            return Err(ScanError::Validation(format!(
                "Image file is empty: {}",
                path.as_ref().display()
            )));
        }
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    /// Decode the image and check it against the configured size bounds.
    ///
    /// Returns `(width, height)`. The payload itself is not modified.
    pub fn validate(&self, config: &OcrConfig) -> Result<(u32, u32)> {
        let reader = ImageReader::new(std::io::Cursor::new(&self.bytes))
            .with_guessed_format()
            .map_err(|e| ScanError::Validation(format!("Failed to read image: {e}")))?;

        let img = reader
            .decode()
            .map_err(|e| ScanError::Validation(format!("Failed to decode image: {e}")))?;

        let (width, height) = img.dimensions();
        if width < config.min_image_dimension || height < config.min_image_dimension {
            return Err(ScanError::Validation(format!(
                "Image too small: {}x{}, minimum {}x{}",
                width, height, config.min_image_dimension, config.min_image_dimension
            )));
        }
        if width > config.max_image_dimension || height > config.max_image_dimension {
            return Err(ScanError::Validation(format!(
                "Image too large: {}x{}, maximum {}x{}",
                width, height, config.max_image_dimension, config.max_image_dimension
            )));
        }

        Ok((width, height))
    }
}

impl std::fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImagePayload")
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl From<Vec<u8>> for ImagePayload {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_bytes(bytes)
    }
}
