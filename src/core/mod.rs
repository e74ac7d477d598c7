//! Core modules: storage, configuration, logging and shared helpers.
//!
//! Everything the batch recorder and the listing renderer build on lives here.

pub mod config;
pub mod db;
pub mod error;
pub mod logger;
pub mod output;
pub mod schemas;
pub mod store;
pub mod time;
