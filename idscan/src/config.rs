use std::env;

use crate::models::ScanMode;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

/// Read an optional string variable, treating an empty value as unset.
fn env_non_empty(var: &str) -> Option<String> {
    env::var(var).ok().filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub ocr: OcrConfig,
    pub scanner: ScannerConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub auth_token: Option<String>,
    pub local_path: Option<String>,
    pub busy_timeout_ms: u64,
    /// SQLite `journal_mode` pragma; unknown values fall back to WAL.
    pub journal_mode: String,
    /// SQLite `synchronous` pragma; unknown values fall back to NORMAL.
    pub synchronous: String,
}

#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Default Vision API key, used when a scan request carries none.
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub languages: String,
    pub timeout_secs: u64,
    pub max_image_dimension: u32,
    pub min_image_dimension: u32,
}

#[derive(Debug, Clone)]
pub struct ScannerConfig {
    pub default_mode: ScanMode,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "file:idscan.db".to_string(),
            auth_token: None,
            local_path: None,
            busy_timeout_ms: 5000,
            journal_mode: "WAL".to_string(),
            synchronous: "NORMAL".to_string(),
        }
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            languages: "eng".to_string(),
            timeout_secs: 60,
            max_image_dimension: 4096,
            min_image_dimension: 50,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or_else(|_| "file:idscan.db".to_string()),
                auth_token: env::var("DATABASE_AUTH_TOKEN").ok(),
                local_path: env::var("DATABASE_LOCAL_PATH").ok(),
                busy_timeout_ms: parse_env_or("DATABASE_BUSY_TIMEOUT_MS", 5000),
                journal_mode: env::var("DATABASE_JOURNAL_MODE")
                    .unwrap_or_else(|_| "WAL".to_string()),
                synchronous: env::var("DATABASE_SYNCHRONOUS")
                    .unwrap_or_else(|_| "NORMAL".to_string()),
            },
            ocr: OcrConfig {
                api_key: env_non_empty("VISION_API_KEY"),
                base_url: env_non_empty("VISION_BASE_URL"),
                languages: env::var("OCR_LANGUAGES").unwrap_or_else(|_| "eng".to_string()),
                timeout_secs: parse_env_or("OCR_TIMEOUT", 60),
                max_image_dimension: parse_env_or("OCR_MAX_DIMENSION", 4096),
                min_image_dimension: parse_env_or("OCR_MIN_DIMENSION", 50),
            },
            scanner: ScannerConfig {
                default_mode: parse_env_or("SCAN_MODE", ScanMode::Auto),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}
