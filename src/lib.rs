//! qrtrack: production batch tracking with QR codes.
//!
//! Each submitted batch (batch ID, date, person in charge, production site,
//! variant) is stored as one row of the `produksi` table and gets a PNG QR
//! code at `<data_dir>/qr_codes/<batch_id>.png` encoding the same five fields.
//! The listing view reads every row back and inlines its QR image as a
//! base64 `data:` URI.
//!
//! # Architecture
//!
//! - **Record Store** ([`core::db::RecordStore`]): owns the SQLite connection.
//!   It is constructed once per process and passed by reference.
//! - **Batch Recorder** ([`plugins::batch`]): validation, insert, QR write.
//! - **Listing Renderer** ([`plugins::listing`]): rows plus inline images,
//!   rendered as text, JSON or HTML.
//!
//! # Examples
//!
//! ```bash
//! qrtrack add --batch-id B001 --date 2024-01-10 --pic Ani \
//!     --site "Plant A" --variant "Arabica Dark" --preview
//! qrtrack list --format html --output produksi.html
//! ```

mod cli;
pub mod core;
pub mod plugins;

use crate::cli::{AddCli, AddFormat, Cli, Command, ListCli, ListFormat};
use crate::core::config::Config;
use crate::core::db::{BatchInput, RecordStore};
use crate::core::error::QrTrackError;
use crate::core::store::Store;
use crate::core::{logger, time};
use crate::plugins::batch::{self, RecordOptions};
use crate::plugins::{listing, qr};

use clap::Parser;
use colored::Colorize;
use std::fs;

pub fn run() -> Result<(), QrTrackError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Version => {
            println!("v{}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Command::Schema => {
            let schemas = serde_json::json!({
                "subsystems": [batch::schema(), listing::schema()]
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&schemas).unwrap_or_else(|_| schemas.to_string())
            );
            return Ok(());
        }
        _ => {}
    }

    let cwd = std::env::current_dir()?;
    let mut config = Config::load(cli.config.as_deref(), &cwd, |key| std::env::var(key).ok())?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = cwd.join(dir);
    }
    if let Some(level) = cli.log_level {
        config.log.level = level;
    }
    if let Err(e) = logger::init_logger(&config.log.level, config.log.json) {
        eprintln!("warning: logging not initialized: {}", e);
    }

    let layout = config.store();
    tracing::debug!(data_dir = %layout.root.display(), "configuration loaded");

    match cli.command {
        Command::Init => run_init(&layout),
        Command::Add(add) => run_add(&config, &layout, add),
        Command::List(list) => run_list(&config, &layout, list),
        Command::Version | Command::Schema => Ok(()),
    }
}

fn run_init(layout: &Store) -> Result<(), QrTrackError> {
    let store = RecordStore::open(&layout.db_path())?;
    layout.ensure_dirs()?;
    println!(
        "{} Database ready at {} ({} records)",
        "✓".bright_green(),
        layout.db_path().display(),
        store.count()?
    );
    println!("  QR images: {}", layout.qr_dir().display());
    Ok(())
}

fn resolve_date(raw: Option<&str>) -> Result<String, QrTrackError> {
    match raw {
        None => Ok(time::today()),
        // Left empty so the missing-field check reports it with the others.
        Some(raw) if raw.trim().is_empty() => Ok(String::new()),
        Some(raw) => time::normalize_date(raw).ok_or_else(|| {
            QrTrackError::ValidationError(format!(
                "Tanggal '{}' is not a calendar date (expected YYYY-MM-DD)",
                raw
            ))
        }),
    }
}

fn run_add(config: &Config, layout: &Store, add: AddCli) -> Result<(), QrTrackError> {
    let result = resolve_date(add.date.as_deref()).and_then(|tanggal| {
        let input = BatchInput {
            batch_id: add.batch_id.as_deref().unwrap_or_default(),
            tanggal: &tanggal,
            pic: add.pic.as_deref().unwrap_or_default(),
            tempat_produksi: add.site.as_deref().unwrap_or_default(),
            varian_produksi: add.variant.as_deref().unwrap_or_default(),
        };
        // Fail fast before the database file is created.
        batch::validate(&input)?;

        let store = RecordStore::open(&layout.db_path())?;
        let path = batch::record_batch(
            &store,
            layout,
            &input,
            RecordOptions {
                module_size: config.module_size,
            },
        )?;
        let payload = qr::format_payload(&input);
        Ok((path, payload, tanggal))
    });

    match (add.format, result) {
        (AddFormat::Json, Ok((path, payload, tanggal))) => {
            let envelope = time::command_envelope(
                "add",
                "ok",
                serde_json::json!({
                    "record": {
                        "batch_id": add.batch_id,
                        "tanggal": tanggal,
                        "pic": add.pic,
                        "tempat_produksi": add.site,
                        "varian_produksi": add.variant,
                    },
                    "payload": payload,
                    "qr_path": path.display().to_string(),
                }),
            );
            println!("{}", envelope);
            Ok(())
        }
        (AddFormat::Text, Ok((path, payload, _))) => {
            println!("{} Data saved", "✓".bright_green());
            println!("  QR code for batch {}: {}", add.batch_id.unwrap_or_default(), path.display());
            if add.preview {
                println!("{}", qr::render_terminal(&payload)?);
            }
            Ok(())
        }
        (AddFormat::Json, Err(e)) => {
            let mut extra = serde_json::json!({
                "category": e.category(),
                "message": e.to_string(),
            });
            if let QrTrackError::MissingFields(fields) = &e {
                extra["missing_fields"] = serde_json::json!(fields);
            }
            println!("{}", time::command_envelope("add", "error", extra));
            Err(e)
        }
        (AddFormat::Text, Err(e)) => {
            if let QrTrackError::MissingFields(fields) = &e {
                eprintln!(
                    "{} Please fill in every field before saving.",
                    "⚠".bright_yellow()
                );
                for field in fields {
                    eprintln!("  - {}", field);
                }
            }
            Err(e)
        }
    }
}

fn run_list(config: &Config, layout: &Store, list: ListCli) -> Result<(), QrTrackError> {
    let store = RecordStore::open(&layout.db_path())?;
    let rendered = listing::render_listing(&store, layout)?;

    let body = match list.format {
        ListFormat::Text => listing::render_text(&rendered),
        ListFormat::Html => listing::render_page(&rendered, config.thumbnail_width),
        ListFormat::Json => {
            let envelope = time::command_envelope(
                "list",
                "ok",
                serde_json::json!({
                    "empty": rendered.is_empty(),
                    "count": rendered.rows().len(),
                    "rows": rendered.rows(),
                }),
            );
            format!("{}\n", envelope)
        }
    };

    match list.output {
        Some(path) => {
            fs::write(&path, body)?;
            println!(
                "{} Listing of {} records written to {}",
                "✓".bright_green(),
                rendered.rows().len(),
                path.display()
            );
        }
        None => print!("{}", body),
    }
    Ok(())
}
