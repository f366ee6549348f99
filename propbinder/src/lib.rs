#![forbid(unsafe_code)]
//! Moves translations between property resource bundles and a spreadsheet.
//!
//! A resource bundle is a family of `.properties` files sharing a base name,
//! one per locale (`labels.properties`, `labels_de.properties`, ...). Export
//! collects every bundle under a root directory into one table with a row per
//! `(bundle, key)` and a column per locale. Import turns such a table back
//! into property files with the same naming convention.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use propbinder::{ExportOptions, ImportOptions, export_to_spreadsheet, import_from_spreadsheet};
//!
//! let root = Path::new("src/main/resources");
//! let files = ["labels.properties", "labels_de.properties"];
//! export_to_spreadsheet(root, &files, Path::new("i18n.csv"), &ExportOptions::new())?;
//!
//! // ...translators fill in the sheet...
//!
//! import_from_spreadsheet(Path::new("i18n.csv"), root, &ImportOptions::new())?;
//! # Ok::<(), propbinder::Error>(())
//! ```
//!
//! # Modules
//!
//! - [`locale`]: locale detection from file names and locale filtering
//! - [`grouping`]: partitioning files into bundles
//! - [`content`]: the per-bundle translation model
//! - [`matrix`]: flattening bundles into a table and back
//! - [`pipeline`]: the export and import runs
//! - [`formats`]: property file and CSV/TSV codecs

pub mod config;
pub mod content;
pub mod error;
pub mod formats;
pub mod grouping;
pub mod locale;
pub mod matrix;
pub mod pipeline;
pub mod traits;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    config::{
        BundleLayout, ConflictStrategy, EscapingMode, ExportOptions, ImportOptions, ReadOptions,
        UnknownLocalePolicy,
    },
    content::{ResourceBundleContent, ResourceBundleContentBuilder},
    error::Error,
    formats::SpreadsheetFormat,
    grouping::group_bundle_files,
    locale::{LocaleFilter, LocaleMatcher},
    matrix::{TranslationMatrix, from_rows, to_rows},
    pipeline::{
        ExportSummary, ImportSummary, Stage, bundle_file_path, export_bundles,
        export_to_spreadsheet, import_from_spreadsheet,
    },
    types::{BundleFileGroup, BundleValues, Locale, Translation},
};
