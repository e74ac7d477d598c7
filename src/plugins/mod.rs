//! Subsystems exposed through the CLI.

pub mod batch;
pub mod listing;
pub mod qr;
