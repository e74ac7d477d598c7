//! CLI struct definitions for the qrtrack command-line interface.
//!
//! All clap-derived types live here. Dispatch logic lives in `lib.rs`.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "qrtrack",
    version = env!("CARGO_PKG_VERSION"),
    about = "Record coffee production batches and generate a QR code for each one.",
    disable_version_flag = true
)]
pub(crate) struct Cli {
    /// Config file (defaults to ./qrtrack.toml when present).
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,
    /// Data directory holding the database and the qr_codes/ folder.
    #[clap(long, global = true)]
    pub data_dir: Option<PathBuf>,
    /// Log filter, e.g. 'info' or 'qrtrack=debug'. RUST_LOG takes precedence.
    #[clap(long, global = true)]
    pub log_level: Option<String>,
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum AddFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ListFormat {
    Text,
    Json,
    Html,
}

#[derive(clap::Args, Debug)]
pub(crate) struct AddCli {
    /// Batch identifier; also names the QR image file.
    #[clap(long)]
    pub batch_id: Option<String>,
    /// Production date (YYYY-MM-DD). Defaults to today.
    #[clap(long)]
    pub date: Option<String>,
    /// Person in charge (PIC).
    #[clap(long)]
    pub pic: Option<String>,
    /// Production site.
    #[clap(long)]
    pub site: Option<String>,
    /// Production variant (coffee type, flavor, ...).
    #[clap(long)]
    pub variant: Option<String>,
    /// Print the generated QR code to the terminal.
    #[clap(long)]
    pub preview: bool,
    /// Output format: 'text' or 'json'.
    #[clap(long, value_enum, default_value_t = AddFormat::Text)]
    pub format: AddFormat,
}

#[derive(clap::Args, Debug)]
pub(crate) struct ListCli {
    /// Output format: 'text', 'json' or 'html'.
    #[clap(long, value_enum, default_value_t = ListFormat::Text)]
    pub format: ListFormat,
    /// Write the rendered listing to this file instead of stdout.
    #[clap(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Create the data directory, image folder and database schema
    #[clap(name = "init")]
    Init,

    /// Save a production batch and generate its QR code
    #[clap(name = "add", visible_alias = "a")]
    Add(AddCli),

    /// Show all stored batches with their QR codes
    #[clap(name = "list", visible_alias = "ls")]
    List(ListCli),

    /// Print subsystem schemas as JSON
    #[clap(name = "schema")]
    Schema,

    /// Show version information
    #[clap(name = "version")]
    Version,
}
