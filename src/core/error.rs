use rusqlite;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QrTrackError {
    #[error("SQLite error: {0}")]
    RusqliteError(#[from] rusqlite::Error),
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),
    #[error("QR encoding error: {0}")]
    QrEncodeError(#[from] qrcode::types::QrError),
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Config error: {0}")]
    ConfigError(String),
}

impl QrTrackError {
    /// Coarse error class reported to the presentation layer.
    pub fn category(&self) -> &'static str {
        match self {
            QrTrackError::MissingFields(_) | QrTrackError::ValidationError(_) => "validation",
            QrTrackError::RusqliteError(_) => "storage",
            QrTrackError::IoError(_)
            | QrTrackError::ImageError(_)
            | QrTrackError::QrEncodeError(_) => "io",
            QrTrackError::ConfigError(_) => "config",
        }
    }

    pub fn is_validation(&self) -> bool {
        self.category() == "validation"
    }
}
