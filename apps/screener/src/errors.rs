use thiserror::Error;

/// Per-document failure. Fatal to that document only: the pipeline converts
/// it into an error-marked candidate record and moves on to the next
/// attachment.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("file {filename} exceeds {limit} byte limit")]
    TooLarge { filename: String, limit: usize },

    #[error("unsupported file format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("file {filename} appears to be corrupted: {reason}")]
    Corrupted { filename: String, reason: String },

    #[error("document is password-protected")]
    PasswordProtected,

    #[error("no text extracted from document")]
    Empty,
}

impl DocumentError {
    /// True for failures detected before any parse attempt (size/format
    /// checks), false for failures of the parse itself.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DocumentError::TooLarge { .. } | DocumentError::UnsupportedFormat { .. }
        )
    }
}

/// Configuration failure. The only error class allowed to abort a run:
/// scoring cannot proceed meaningfully with malformed weights or thresholds.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("weight for dimension '{dimension}' is negative: {value}")]
    NegativeWeight { dimension: &'static str, value: f64 },

    #[error("invalid threshold: {0}")]
    InvalidThreshold(String),
}
