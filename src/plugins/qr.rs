//! QR payload formatting and PNG encoding.

use crate::core::db::BatchInput;
use crate::core::error::QrTrackError;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::QrCode;
use qrcode::render::unicode::Dense1x2;
use std::fs;
use std::io::Cursor;
use std::path::Path;

pub const DEFAULT_MODULE_SIZE: u32 = 10;
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// One `Label: value` line per field, no trailing newline.
pub fn format_payload(input: &BatchInput<'_>) -> String {
    input
        .labelled()
        .iter()
        .map(|(label, value)| format!("{}: {}", label, value))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Encodes `payload` (EC level M, 4-module quiet zone) into grayscale PNG bytes.
pub fn encode_png(payload: &str, module_size: u32) -> Result<Vec<u8>, QrTrackError> {
    let code = QrCode::new(payload.as_bytes())?;
    let img = code
        .render::<Luma<u8>>()
        .quiet_zone(true)
        .module_dimensions(module_size, module_size)
        .build();

    let mut bytes = Vec::new();
    DynamicImage::ImageLuma8(img).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Renders `payload` with Unicode half blocks for terminal preview.
pub fn render_terminal(payload: &str) -> Result<String, QrTrackError> {
    let code = QrCode::new(payload.as_bytes())?;
    Ok(code
        .render::<Dense1x2>()
        .dark_color(Dense1x2::Light)
        .light_color(Dense1x2::Dark)
        .build())
}

pub fn to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn data_uri(bytes: &[u8]) -> String {
    format!("{}{}", PNG_DATA_URI_PREFIX, to_base64(bytes))
}

pub fn image_to_base64(path: &Path) -> Result<String, QrTrackError> {
    let bytes = fs::read(path)?;
    Ok(to_base64(&bytes))
}
