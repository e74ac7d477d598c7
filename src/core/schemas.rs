//! Centralized storage names and schema definitions.
//!
//! qrtrack keeps its state in a single data directory:
//! 1. data_produksi.db: the `produksi` table of production batches.
//! 2. qr_codes/: one PNG per batch, named `<batch_id>.png`.

pub const PRODUKSI_DB_NAME: &str = "data_produksi.db";
pub const QR_DIR_NAME: &str = "qr_codes";
pub const QR_FILE_EXT: &str = "png";

pub const PRODUKSI_DB_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS produksi (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        batch_id TEXT,
        tanggal TEXT,
        pic TEXT,
        tempat_produksi TEXT,
        varian_produksi TEXT
    )
";

/// Human-readable labels in payload and column order.
pub const LABEL_BATCH_ID: &str = "Batch ID";
pub const LABEL_TANGGAL: &str = "Tanggal";
pub const LABEL_PIC: &str = "PIC";
pub const LABEL_TEMPAT_PRODUKSI: &str = "Tempat Produksi";
pub const LABEL_VARIAN_PRODUKSI: &str = "Varian Produksi";
pub const LABEL_QR_CODE: &str = "QR Code";

pub const FIELD_LABELS: [&str; 5] = [
    LABEL_BATCH_ID,
    LABEL_TANGGAL,
    LABEL_PIC,
    LABEL_TEMPAT_PRODUKSI,
    LABEL_VARIAN_PRODUKSI,
];

pub const LISTING_COLUMNS: [&str; 6] = [
    LABEL_BATCH_ID,
    LABEL_TANGGAL,
    LABEL_PIC,
    LABEL_TEMPAT_PRODUKSI,
    LABEL_VARIAN_PRODUKSI,
    LABEL_QR_CODE,
];
