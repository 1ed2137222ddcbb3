//! Identity-document scanning: quota-aware online OCR with a local Tesseract
//! fallback, and Aadhaar / driving-license field extraction.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod ocr;
pub mod parser;
pub mod scanner;
pub mod usage;

pub use error::{Result, ScanError};
pub use models::{DocumentType, QuotaStatus, ScanMode, ScanResult, UsageRecord};
pub use scanner::{ScanRequest, Scanner, DEFAULT_MONTHLY_LIMIT};
