//! File formats read and written by propbinder.
//!
//! This module re-exports the main types for each format and provides
//! the [`SpreadsheetFormat`] enum for choosing the table encoding.

pub mod properties;
pub mod spreadsheet;

use std::{
    fmt::{Display, Formatter},
    path::Path,
    str::FromStr,
};

use serde::{Deserialize, Serialize};

// Reexporting the formats for easier access
pub use properties::{Format as PropertiesFormat, Property, flatten_value};
pub use spreadsheet::Spreadsheet;

use crate::Error;

/// The delimited-text flavour of the translation spreadsheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpreadsheetFormat {
    /// Comma-separated values.
    #[default]
    Csv,
    /// Tab-separated values.
    Tsv,
}

/// Implements [`std::fmt::Display`] for [`SpreadsheetFormat`].
///
/// # Example
/// ```rust
/// use propbinder::formats::SpreadsheetFormat;
/// assert_eq!(SpreadsheetFormat::Csv.to_string(), "csv");
/// assert_eq!(SpreadsheetFormat::Tsv.to_string(), "tsv");
/// ```
impl Display for SpreadsheetFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SpreadsheetFormat::Csv => write!(f, "csv"),
            SpreadsheetFormat::Tsv => write!(f, "tsv"),
        }
    }
}

/// Accepts `csv` and `tsv`, case-insensitively.
///
/// Returns [`crate::error::Error::Config`] for anything else.
impl FromStr for SpreadsheetFormat {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "csv" => Ok(SpreadsheetFormat::Csv),
            "tsv" | "tab" => Ok(SpreadsheetFormat::Tsv),
            other => Err(Error::config_error(format!(
                "unknown spreadsheet format `{}`, expected csv or tsv",
                other
            ))),
        }
    }
}

impl SpreadsheetFormat {
    /// Returns the typical file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            SpreadsheetFormat::Csv => "csv",
            SpreadsheetFormat::Tsv => "tsv",
        }
    }

    pub fn delimiter(&self) -> u8 {
        match self {
            SpreadsheetFormat::Csv => b',',
            SpreadsheetFormat::Tsv => b'\t',
        }
    }

    /// Infers the format from a path's extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let extension = path.as_ref().extension()?.to_str()?;
        match extension.to_ascii_lowercase().as_str() {
            "csv" => Some(SpreadsheetFormat::Csv),
            "tsv" | "tab" => Some(SpreadsheetFormat::Tsv),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spreadsheet_format_from_str() {
        assert_eq!(
            SpreadsheetFormat::from_str("csv").unwrap(),
            SpreadsheetFormat::Csv
        );
        assert_eq!(
            SpreadsheetFormat::from_str("  TSV ").unwrap(),
            SpreadsheetFormat::Tsv
        );
        assert!(SpreadsheetFormat::from_str("xls").is_err());
    }

    #[test]
    fn test_spreadsheet_format_from_path() {
        assert_eq!(
            SpreadsheetFormat::from_path("out/i18n.CSV"),
            Some(SpreadsheetFormat::Csv)
        );
        assert_eq!(
            SpreadsheetFormat::from_path("i18n.tsv"),
            Some(SpreadsheetFormat::Tsv)
        );
        assert_eq!(SpreadsheetFormat::from_path("i18n.xls"), None);
        assert_eq!(SpreadsheetFormat::from_path("i18n"), None);
    }

    #[test]
    fn test_spreadsheet_format_extension_and_delimiter() {
        assert_eq!(SpreadsheetFormat::Csv.extension(), "csv");
        assert_eq!(SpreadsheetFormat::Tsv.extension(), "tsv");
        assert_eq!(SpreadsheetFormat::Csv.delimiter(), b',');
        assert_eq!(SpreadsheetFormat::Tsv.delimiter(), b'\t');
    }
}
