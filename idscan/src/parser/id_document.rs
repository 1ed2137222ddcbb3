use std::sync::OnceLock;

use regex::Regex;

use crate::models::{DocumentType, ScanResult};

use super::DocumentParser;

/// Words that start another field; a name capture stops at the first one.
const FIELD_LABELS: &[&str] = &[
    "DOB",
    "DATE",
    "BIRTH",
    "YOB",
    "YEAR",
    "GENDER",
    "SEX",
    "MALE",
    "FEMALE",
    "TRANSGENDER",
    "ADDRESS",
    "FATHER",
    "VALID",
    "ISSUE",
];

struct Patterns {
    aadhaar: Regex,
    dl: Regex,
    name: Regex,
    dob: Regex,
    gender: Regex,
}

// Word boundaries are ASCII-only, so Devanagari glued to a number or label
// on bilingual cards still counts as a boundary.
fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        aadhaar: Regex::new(r"(?-u:\b)[0-9]{4} [0-9]{4} [0-9]{4}(?-u:\b)")
            .expect("aadhaar pattern"),
        dl: Regex::new(r"(?-u:\b)[A-Z]{2}[0-9]{2} ?[0-9]{11}(?-u:\b)").expect("dl pattern"),
        name: Regex::new(r"(?i)name[:\s]*([a-z ]{3,})").expect("name pattern"),
        dob: Regex::new(r"(?-u:\b)[0-9]{2}[/-][0-9]{2}[/-][0-9]{4}(?-u:\b)")
            .expect("dob pattern"),
        gender: Regex::new(r"(?i)(?-u:\b)(MALE|FEMALE|TRANSGENDER)(?-u:\b)")
            .expect("gender pattern"),
    })
}

/// Regex extraction for Aadhaar cards and Indian driving licenses.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdDocumentParser;

impl IdDocumentParser {
    pub fn new() -> Self {
        Self
    }

    fn name(text: &str) -> String {
        let Some(caps) = patterns().name.captures(text) else {
            return String::new();
        };
        caps[1]
            .split_whitespace()
            .take_while(|word| !FIELD_LABELS.contains(&word.to_uppercase().as_str()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn dob(text: &str) -> String {
        patterns()
            .dob
            .find(text)
            .map(|m| m.as_str().replace('/', "-"))
            .unwrap_or_default()
    }

    fn gender(text: &str) -> String {
        patterns()
            .gender
            .find(text)
            .map(|m| m.as_str().to_uppercase())
            .unwrap_or_default()
    }
}

impl DocumentParser for IdDocumentParser {
    fn parse(&self, text: &str) -> ScanResult {
        let patterns = patterns();

        if let Some(aadhaar) = patterns.aadhaar.find(text) {
            return ScanResult {
                raw_text: text.to_string(),
                document_type: DocumentType::Aadhaar,
                aadhaar: Some(aadhaar.as_str().to_string()),
                dl_number: None,
                name: Some(Self::name(text)),
                dob: Some(Self::dob(text)),
                gender: Some(Self::gender(text)),
            };
        }

        if let Some(dl) = patterns.dl.find(text) {
            return ScanResult {
                raw_text: text.to_string(),
                document_type: DocumentType::Dl,
                aadhaar: None,
                dl_number: Some(dl.as_str().to_string()),
                name: Some(Self::name(text)),
                dob: Some(Self::dob(text)),
                gender: None,
            };
        }

        ScanResult::unknown(text)
    }
}
