//! Scan dispatch: picks the OCR backend for a request, applies the monthly
//! online quota, falls back to local OCR, and parses the recognized text.

mod dispatcher;
mod request;

pub use dispatcher::{Scanner, DEFAULT_MONTHLY_LIMIT};
pub use request::ScanRequest;
