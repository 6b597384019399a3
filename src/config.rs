//! Runtime settings, read from `KYC_`-prefixed environment variables.

use crate::utils::IdentityError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::env;
use std::str::FromStr;

pub const ENV_PREFIX: &str = "KYC_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub app_name: String,
    pub environment: String,
    /// Lower-case, dot-prefixed image extensions accepted for recognition.
    pub allowed_extensions: BTreeSet<String>,
    pub min_name_similarity: u8,
    /// Advisory only; nothing in the extraction or matching filters on it.
    pub min_ocr_confidence: f32,
    pub max_upload_mb: u64,
    /// Tesseract languages, e.g. "tur+eng".
    pub ocr_languages: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            app_name: "VerifyCheck".to_string(),
            environment: "dev".to_string(),
            allowed_extensions: [".jpg", ".jpeg", ".png", ".bmp", ".tif", ".tiff"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            min_name_similarity: 80,
            min_ocr_confidence: 0.35,
            max_upload_mb: 10,
            ocr_languages: "tur+eng".to_string(),
        }
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T, IdentityError> {
    raw.trim()
        .parse()
        .map_err(|_| IdentityError::Config(format!("{}{} has invalid value {:?}", ENV_PREFIX, key, raw)))
}

fn parse_extensions(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(|ext| ext.trim().to_lowercase())
        .filter(|ext| !ext.is_empty())
        .map(|ext| if ext.starts_with('.') { ext } else { format!(".{}", ext) })
        .collect()
}

impl Settings {
    /// Reads settings from the process environment. Variable names are
    /// matched case-insensitively, so `kyc_max_upload_mb` also works.
    pub fn from_env() -> Result<Self, IdentityError> {
        let vars: HashMap<String, String> = env::vars()
            .map(|(key, value)| (key.to_uppercase(), value))
            .collect();
        Self::from_lookup(|key| vars.get(&format!("{}{}", ENV_PREFIX, key)).cloned())
    }

    /// Builds settings from `lookup`, which receives unprefixed upper-case
    /// keys such as `MIN_NAME_SIMILARITY`. Missing keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, IdentityError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();

        if let Some(value) = lookup("APP_NAME") {
            settings.app_name = value;
        }
        if let Some(value) = lookup("ENVIRONMENT") {
            settings.environment = value;
        }
        if let Some(value) = lookup("ALLOWED_EXTENSIONS") {
            settings.allowed_extensions = parse_extensions(&value);
        }
        if let Some(value) = lookup("MIN_NAME_SIMILARITY") {
            settings.min_name_similarity = parse_value("MIN_NAME_SIMILARITY", &value)?;
        }
        if let Some(value) = lookup("MIN_OCR_CONFIDENCE") {
            settings.min_ocr_confidence = parse_value("MIN_OCR_CONFIDENCE", &value)?;
        }
        if let Some(value) = lookup("MAX_UPLOAD_MB") {
            settings.max_upload_mb = parse_value("MAX_UPLOAD_MB", &value)?;
        }
        if let Some(value) = lookup("OCR_LANGUAGES") {
            settings.ocr_languages = value;
        }

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), IdentityError> {
        if self.min_name_similarity > 100 {
            return Err(IdentityError::Config(format!(
                "min_name_similarity must be within 0..=100, got {}",
                self.min_name_similarity
            )));
        }
        if !(0.0..=1.0).contains(&self.min_ocr_confidence) {
            return Err(IdentityError::Config(format!(
                "min_ocr_confidence must be within 0..=1, got {}",
                self.min_ocr_confidence
            )));
        }
        if self.allowed_extensions.is_empty() {
            return Err(IdentityError::Config("allowed_extensions is empty".to_string()));
        }
        Ok(())
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}
