//! Data directory layout.
//!
//! A `Store` is the root directory holding the production database and the
//! image root. The image path of a batch is derived from its `batch_id` alone,
//! so both the recorder and the listing resolve it through [`Store::qr_path`].

use crate::core::error::QrTrackError;
use crate::core::schemas;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Store {
    /// Directory holding the database file and the image root
    pub root: PathBuf,
    pub db_name: String,
    pub qr_dir_name: String,
}

impl Store {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            db_name: schemas::PRODUKSI_DB_NAME.to_string(),
            qr_dir_name: schemas::QR_DIR_NAME.to_string(),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.root.join(&self.db_name)
    }

    /// The image root.
    pub fn qr_dir(&self) -> PathBuf {
        self.root.join(&self.qr_dir_name)
    }

    /// `<image-root>/<batch_id>.png`, with `batch_id` taken literally.
    pub fn qr_path(&self, batch_id: &str) -> PathBuf {
        self.qr_dir()
            .join(format!("{}.{}", batch_id, schemas::QR_FILE_EXT))
    }

    pub fn ensure_dirs(&self) -> Result<(), QrTrackError> {
        fs::create_dir_all(self.qr_dir())?;
        Ok(())
    }
}

/// Rejects batch identifiers that would resolve outside the image root.
pub fn check_batch_id_path(batch_id: &str) -> Result<(), QrTrackError> {
    if batch_id == "." || batch_id == ".." {
        return Err(QrTrackError::ValidationError(format!(
            "Batch ID '{}' is not a valid file name",
            batch_id
        )));
    }
    if let Some(c) = batch_id.chars().find(|c| matches!(c, '/' | '\\' | '\0')) {
        return Err(QrTrackError::ValidationError(format!(
            "Batch ID '{}' contains forbidden character {:?}",
            batch_id.escape_default(),
            c
        )));
    }
    Ok(())
}
