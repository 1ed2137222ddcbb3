use serde::{Deserialize, Serialize};

use super::DocumentType;

/// Structured fields parsed from recognized document text.
///
/// Fields that belong to the detected document type are always present
/// (empty when the pattern did not match). Fields that do not belong to it
/// stay `None` and are omitted when serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub raw_text: String,
    pub document_type: DocumentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aadhaar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dl_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

impl ScanResult {
    pub fn unknown(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            document_type: DocumentType::Unknown,
            aadhaar: None,
            dl_number: None,
            name: None,
            dob: None,
            gender: None,
        }
    }

    pub fn is_classified(&self) -> bool {
        self.document_type != DocumentType::Unknown
    }
}
