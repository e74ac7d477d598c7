//! Record Store: the `produksi` table and the connection that owns it.

use crate::core::error::QrTrackError;
use crate::core::schemas;
use rusqlite::{Connection, Transaction, params};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Five user-supplied fields of one production batch, in column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchInput<'a> {
    pub batch_id: &'a str,
    pub tanggal: &'a str,
    pub pic: &'a str,
    pub tempat_produksi: &'a str,
    pub varian_produksi: &'a str,
}

impl<'a> BatchInput<'a> {
    /// Field values paired with their labels, in payload order.
    pub fn labelled(&self) -> [(&'static str, &'a str); 5] {
        [
            (schemas::LABEL_BATCH_ID, self.batch_id),
            (schemas::LABEL_TANGGAL, self.tanggal),
            (schemas::LABEL_PIC, self.pic),
            (schemas::LABEL_TEMPAT_PRODUKSI, self.tempat_produksi),
            (schemas::LABEL_VARIAN_PRODUKSI, self.varian_produksi),
        ]
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ProductionRecord {
    pub id: i64,
    pub batch_id: String,
    pub tanggal: String,
    pub pic: String,
    pub tempat_produksi: String,
    pub varian_produksi: String,
}

impl ProductionRecord {
    pub fn as_input(&self) -> BatchInput<'_> {
        BatchInput {
            batch_id: &self.batch_id,
            tanggal: &self.tanggal,
            pic: &self.pic,
            tempat_produksi: &self.tempat_produksi,
            varian_produksi: &self.varian_produksi,
        }
    }
}

pub fn db_connect(db_path: &str) -> Result<Connection, QrTrackError> {
    let conn = Connection::open(db_path)?;
    conn.busy_timeout(std::time::Duration::from_secs(5))?;
    conn.query_row("PRAGMA journal_mode=WAL;", [], |_| Ok(()))?;
    Ok(conn)
}

/// Owns the single connection to the production database.
///
/// Constructed once at startup and passed by reference to the recorder and
/// the listing renderer. Dropping the store closes the connection.
pub struct RecordStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl RecordStore {
    /// Opens (creating if needed) the database at `db_path` and ensures the schema.
    pub fn open(db_path: &Path) -> Result<Self, QrTrackError> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let conn = db_connect(&db_path.to_string_lossy())?;
        let store = Self {
            conn,
            path: Some(db_path.to_path_buf()),
        };
        store.ensure_schema()?;
        tracing::debug!(path = %db_path.display(), "record store opened");
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self, QrTrackError> {
        let store = Self {
            conn: Connection::open_in_memory()?,
            path: None,
        };
        store.ensure_schema()?;
        Ok(store)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn ensure_schema(&self) -> Result<(), QrTrackError> {
        self.conn.execute(schemas::PRODUKSI_DB_SCHEMA, [])?;
        Ok(())
    }

    pub fn insert(&self, input: &BatchInput<'_>) -> Result<(), QrTrackError> {
        self.conn.execute(
            "INSERT INTO produksi (batch_id, tanggal, pic, tempat_produksi, varian_produksi)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                input.batch_id,
                input.tanggal,
                input.pic,
                input.tempat_produksi,
                input.varian_produksi
            ],
        )?;
        Ok(())
    }

    pub fn fetch_all(&self) -> Result<Vec<ProductionRecord>, QrTrackError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, batch_id, tanggal, pic, tempat_produksi, varian_produksi
             FROM produksi ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(ProductionRecord {
                id: row.get(0)?,
                batch_id: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                tanggal: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                pic: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                tempat_produksi: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
                varian_produksi: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
            })
        })?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    pub fn count(&self) -> Result<i64, QrTrackError> {
        let n = self
            .conn
            .query_row("SELECT COUNT(*) FROM produksi", [], |row| row.get(0))?;
        Ok(n)
    }

    /// Begins a transaction on the shared connection; dropping it rolls back.
    pub(crate) fn transaction(&self) -> Result<Transaction<'_>, QrTrackError> {
        Ok(self.conn.unchecked_transaction()?)
    }
}
