use serde::{Deserialize, Serialize};

/// Which OCR backend(s) a scan may use.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// Online first while quota remains, offline on failure or exhaustion.
    #[default]
    Auto,
    Online,
    Offline,
}

impl std::fmt::Display for ScanMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Online => write!(f, "online"),
            Self::Offline => write!(f, "offline"),
        }
    }
}

impl std::str::FromStr for ScanMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "online" => Ok(Self::Online),
            "offline" => Ok(Self::Offline),
            _ => Err(format!("Unknown scan mode: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Aadhaar,
    Dl,
    #[default]
    Unknown,
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Aadhaar => write!(f, "aadhaar"),
            Self::Dl => write!(f, "dl"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_mode_parsing() {
        assert_eq!("auto".parse::<ScanMode>(), Ok(ScanMode::Auto));
        assert_eq!("ONLINE".parse::<ScanMode>(), Ok(ScanMode::Online));
        assert_eq!(" offline ".parse::<ScanMode>(), Ok(ScanMode::Offline));
        assert!("hybrid".parse::<ScanMode>().is_err());
    }

    #[test]
    fn test_scan_mode_default_is_auto() {
        assert_eq!(ScanMode::default(), ScanMode::Auto);
    }

    #[test]
    fn test_document_type_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&DocumentType::Aadhaar).unwrap(),
            "\"aadhaar\""
        );
        assert_eq!(serde_json::to_string(&DocumentType::Dl).unwrap(), "\"dl\"");
        assert_eq!(
            serde_json::to_string(&DocumentType::Unknown).unwrap(),
            "\"unknown\""
        );
    }

    #[test]
    fn test_document_type_accepts_only_wire_names() {
        assert_eq!(
            serde_json::from_str::<DocumentType>("\"dl\"").unwrap(),
            DocumentType::Dl
        );
        assert_eq!(DocumentType::Dl.to_string(), "dl");
        assert!(serde_json::from_str::<DocumentType>("\"driving_license\"").is_err());
    }
}
