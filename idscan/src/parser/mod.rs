//! Turns raw OCR text into structured identity-document fields.
//!
//! Parsing is a strategy behind [`DocumentParser`] so the scanner can be given
//! other document formats without touching the dispatch policy.

mod id_document;

pub use id_document::IdDocumentParser;

use crate::models::ScanResult;

pub trait DocumentParser: Send + Sync {
    /// Classify `text` and extract its fields. Never fails: unrecognized text
    /// yields an `unknown` result with the raw text preserved.
    fn parse(&self, text: &str) -> ScanResult;
}
