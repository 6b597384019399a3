use std::path::PathBuf;
use thiserror::Error;

/// Failures of the glue around the extraction core: file access, upload
/// checks, line-file parsing, configuration and the recognition engine.
/// The extraction and matching functions themselves never return these.
#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported file extension: {0} (allowed: {1})")]
    UnsupportedExtension(String, String),

    #[error("File {path} is {size} bytes, above the {limit_mb}MB upload limit")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        limit_mb: u64,
    },

    #[error("Line file error at line {line}: {message}")]
    LineFile { line: usize, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Recognition error: {0}")]
    Recognition(String),

    #[error("No recognition engine available for {0}; build with the `tesseract` feature or pass a line file")]
    RecognizerUnavailable(PathBuf),
}

impl IdentityError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IdentityError::Io {
            path: path.into(),
            source,
        }
    }
}
