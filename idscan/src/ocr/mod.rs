//! OCR (Optical Character Recognition) Module
//!
//! Two backends turn an identity-document image into raw text:
//!
//! - `VisionClient` calls the Google Cloud Vision `images:annotate` endpoint
//!   with `TEXT_DETECTION`, key in the `x-goog-api-key` header. Each
//!   successful call costs one unit of the monthly quota tracked by
//!   [`crate::usage`].
//! - `TesseractProvider` runs Tesseract locally through leptess. It is free,
//!   loads its engine on first use, and comes with the default `local-ocr`
//!   feature.
//!
//! The [`Scanner`](crate::scanner::Scanner) only sees the `OnlineOcr` and
//! `OfflineOcr` traits, so either side can be replaced in tests.
//!
//! # Configuration
//!
//! Both backends read `OcrConfig` (see `config.rs`):
//! - `api_key`: default Vision credential when a request carries none
//! - `base_url`: Vision endpoint override
//! - `languages`: Tesseract language codes
//! - `timeout_secs`: per-call timeout for both backends
//! - `max/min_image_dimension`: bounds for `ImagePayload::validate`

mod api;
mod backend;
mod payload;
mod provider;

pub use api::{VisionClient, DEFAULT_VISION_BASE_URL};
pub use backend::{OfflineOcr, OnlineOcr};
pub use payload::ImagePayload;
pub use provider::TesseractProvider;
