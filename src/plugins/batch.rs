//! Batch Recorder: validates a submission, stores the row and writes its QR image.
//!
//! The QR image is encoded in memory before touching the database. The insert
//! then runs inside a transaction that only commits once the PNG is on disk, so
//! an image write failure leaves no row behind. A commit failure after the
//! write is the one remaining split state: the image exists (possibly
//! overwriting an older one for the same `batch_id`) without a new row.

use crate::core::db::{BatchInput, RecordStore};
use crate::core::error::QrTrackError;
use crate::core::schemas;
use crate::core::store::{Store, check_batch_id_path};
use crate::plugins::qr;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy)]
pub struct RecordOptions {
    pub module_size: u32,
}

impl Default for RecordOptions {
    fn default() -> Self {
        Self {
            module_size: qr::DEFAULT_MODULE_SIZE,
        }
    }
}

/// Labels of the fields that are empty or whitespace-only, in field order.
pub fn missing_fields(input: &BatchInput<'_>) -> Vec<&'static str> {
    input
        .labelled()
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(label, _)| *label)
        .collect()
}

/// Checks every required field independently, then the `batch_id` path policy.
pub fn validate(input: &BatchInput<'_>) -> Result<(), QrTrackError> {
    let missing = missing_fields(input);
    if !missing.is_empty() {
        return Err(QrTrackError::MissingFields(missing));
    }
    check_batch_id_path(input.batch_id)
}

pub fn record_batch(
    store: &RecordStore,
    layout: &Store,
    input: &BatchInput<'_>,
    options: RecordOptions,
) -> Result<PathBuf, QrTrackError> {
    validate(input)?;

    let payload = qr::format_payload(input);
    let png = qr::encode_png(&payload, options.module_size)?;
    let qr_path = layout.qr_path(input.batch_id);

    let tx = store.transaction()?;
    store.insert(input)?;

    layout.ensure_dirs()?;
    if qr_path.exists() {
        tracing::warn!(
            batch_id = input.batch_id,
            path = %qr_path.display(),
            "overwriting existing QR image"
        );
    }
    fs::write(&qr_path, &png).inspect_err(|e| {
        tracing::error!(batch_id = input.batch_id, error = %e, "QR image write failed; row rolled back");
    })?;

    tx.commit()?;

    tracing::info!(
        batch_id = input.batch_id,
        path = %qr_path.display(),
        bytes = png.len(),
        "batch recorded"
    );
    Ok(qr_path)
}

pub fn schema() -> serde_json::Value {
    serde_json::json!({
        "name": "batch",
        "version": "0.1.0",
        "description": "Record a production batch and generate its QR code",
        "commands": [
            {
                "name": "add",
                "parameters": ["batch-id", "date", "pic", "site", "variant"],
                "labels": schemas::FIELD_LABELS,
            }
        ],
        "storage": [schemas::PRODUKSI_DB_NAME, format!("{}/<batch_id>.png", schemas::QR_DIR_NAME)]
    })
}
