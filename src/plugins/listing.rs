//! Listing Renderer: every stored batch with its QR image inlined.
//!
//! Image lookup failures never abort a listing; the affected row gets the
//! not-found marker instead.

use crate::core::db::{ProductionRecord, RecordStore};
use crate::core::error::QrTrackError;
use crate::core::output::{html_escape, render_table};
use crate::core::schemas;
use crate::core::store::Store;
use crate::plugins::qr;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::PathBuf;

pub const NOT_FOUND_MARKER: &str = "❌ Tidak ditemukan";
pub const EMPTY_MESSAGE: &str = "Belum ada data produksi tersimpan.";
pub const PAGE_TITLE: &str = "QR Tracking Harlur Coffee";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QrCell {
    Inline { data_uri: String, bytes: usize },
    NotFound,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingRow {
    #[serde(flatten)]
    pub record: ProductionRecord,
    pub qr_path: PathBuf,
    pub qr_code: QrCell,
}

impl ListingRow {
    /// Text values of the five data columns, in column order.
    pub fn text_cells(&self) -> [&str; 5] {
        [
            &self.record.batch_id,
            &self.record.tanggal,
            &self.record.pic,
            &self.record.tempat_produksi,
            &self.record.varian_produksi,
        ]
    }
}

#[derive(Debug, Clone)]
pub enum Listing {
    /// No records are stored.
    Empty,
    Rows(Vec<ListingRow>),
}

impl Listing {
    pub fn rows(&self) -> &[ListingRow] {
        match self {
            Listing::Empty => &[],
            Listing::Rows(rows) => rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Listing::Empty)
    }
}

fn resolve_qr(layout: &Store, record: &ProductionRecord) -> (PathBuf, QrCell) {
    let path = layout.qr_path(&record.batch_id);
    let cell = match fs::read(&path) {
        Ok(bytes) => QrCell::Inline {
            data_uri: qr::data_uri(&bytes),
            bytes: bytes.len(),
        },
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::warn!(batch_id = %record.batch_id, "QR image missing");
            QrCell::NotFound
        }
        Err(e) => {
            tracing::warn!(batch_id = %record.batch_id, error = %e, "QR image unreadable");
            QrCell::NotFound
        }
    };
    (path, cell)
}

pub fn render_listing(store: &RecordStore, layout: &Store) -> Result<Listing, QrTrackError> {
    let records = store.fetch_all()?;
    if records.is_empty() {
        return Ok(Listing::Empty);
    }

    let rows = records
        .into_iter()
        .map(|record| {
            let (qr_path, qr_code) = resolve_qr(layout, &record);
            ListingRow {
                record,
                qr_path,
                qr_code,
            }
        })
        .collect::<Vec<_>>();
    tracing::debug!(rows = rows.len(), "listing rendered");
    Ok(Listing::Rows(rows))
}

/// HTML table fragment; the empty state renders as a paragraph.
pub fn render_html(listing: &Listing, thumbnail_width: u32) -> String {
    let rows = match listing {
        Listing::Empty => return format!("<p>{}</p>\n", html_escape(EMPTY_MESSAGE)),
        Listing::Rows(rows) => rows,
    };

    let mut out = String::from("<table border=\"1\" class=\"dataframe\">\n  <thead>\n");
    out.push_str("    <tr style=\"text-align: right;\">\n");
    for column in schemas::LISTING_COLUMNS {
        out.push_str(&format!("      <th>{}</th>\n", html_escape(column)));
    }
    out.push_str("    </tr>\n  </thead>\n  <tbody>\n");
    for row in rows {
        out.push_str("    <tr>\n");
        for cell in row.text_cells() {
            out.push_str(&format!("      <td>{}</td>\n", html_escape(cell)));
        }
        let qr_cell = match &row.qr_code {
            QrCell::Inline { data_uri, .. } => {
                format!("<img src=\"{}\" width=\"{}\">", data_uri, thumbnail_width)
            }
            QrCell::NotFound => NOT_FOUND_MARKER.to_string(),
        };
        out.push_str(&format!("      <td>{}</td>\n", qr_cell));
        out.push_str("    </tr>\n");
    }
    out.push_str("  </tbody>\n</table>\n");
    out
}

/// Standalone HTML document wrapping [`render_html`].
pub fn render_page(listing: &Listing, thumbnail_width: u32) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n<h2>Daftar Data Produksi</h2>\n{table}</body>\n</html>\n",
        title = html_escape(PAGE_TITLE),
        table = render_html(listing, thumbnail_width),
    )
}

/// Terminal table; the QR column shows the image size or the not-found marker.
pub fn render_text(listing: &Listing) -> String {
    let rows = match listing {
        Listing::Empty => return format!("{}\n", EMPTY_MESSAGE),
        Listing::Rows(rows) => rows,
    };
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            let mut cells: Vec<String> = row.text_cells().iter().map(|c| c.to_string()).collect();
            cells.push(match &row.qr_code {
                QrCell::Inline { bytes, .. } => format!("PNG {} bytes", bytes),
                QrCell::NotFound => NOT_FOUND_MARKER.to_string(),
            });
            cells
        })
        .collect();
    render_table(&schemas::LISTING_COLUMNS, &cells, 40)
}

pub fn schema() -> serde_json::Value {
    serde_json::json!({
        "name": "listing",
        "version": "0.1.0",
        "description": "List stored batches with inline QR images",
        "commands": [
            { "name": "list", "parameters": ["format", "output"], "formats": ["text", "json", "html"] }
        ],
        "columns": schemas::LISTING_COLUMNS,
        "storage": [schemas::PRODUKSI_DB_NAME]
    })
}
