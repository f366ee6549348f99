//! CLI library for testing purposes

pub mod config;
pub mod export;
pub mod import;
pub mod scan;
pub mod validation;

pub use config::{ConfigFile, ExportOverrides, ImportOverrides};
pub use export::{ExportCommand, run_export_command};
pub use import::{ImportCommand, run_import_command};
pub use scan::{ScanConfig, scan_candidates};
