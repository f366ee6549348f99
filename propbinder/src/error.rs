//! All error types for the propbinder crate.
//!
//! These are returned from all fallible operations (matching, grouping, reading,
//! encoding, decoding and writing).

use std::path::PathBuf;

use thiserror::Error;

use crate::types::Locale;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parse error: {0}")]
    CsvParse(#[from] csv::Error),

    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("unknown encoding `{0}`")]
    UnknownEncoding(String),

    #[error(
        "inconsistent bundle `{bundle}`: locale `{locale}` is claimed by both {} and {}",
        .existing.display(),
        .duplicate.display()
    )]
    InconsistentBundleBaseName {
        bundle: String,
        locale: Locale,
        existing: PathBuf,
        duplicate: PathBuf,
    },

    #[error(
        "conflicting values for key `{key}` and locale `{locale}` in bundle `{bundle}`: `{first}` vs `{second}`"
    )]
    DuplicateTranslation {
        bundle: String,
        key: String,
        locale: Locale,
        first: String,
        second: String,
    },

    #[error("malformed row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },

    #[error("unknown locale column `{0}`")]
    UnknownLocale(String),

    #[error("invalid data: {0}")]
    DataMismatch(String),

    #[error("{}: {source}", .path.display())]
    AtPath {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wraps this error with the path of the file it concerns.
    pub fn at_path(self, path: impl Into<PathBuf>) -> Self {
        Error::AtPath {
            path: path.into(),
            source: Box::new(self),
        }
    }

    /// Creates a new configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    /// Returns the innermost error, skipping any path context.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::AtPath { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = Error::Io(io_error);
        assert!(error.to_string().contains("I/O error"));
    }

    #[test]
    fn test_invalid_pattern_error() {
        let regex_error = regex::Regex::new("(unclosed").unwrap_err();
        let error = Error::from(regex_error);
        assert!(error.to_string().starts_with("invalid pattern"));
    }

    #[test]
    fn test_inconsistent_bundle_error_names_both_files() {
        let error = Error::InconsistentBundleBaseName {
            bundle: "app".to_string(),
            locale: Locale::tag("de"),
            existing: PathBuf::from("app_de.properties"),
            duplicate: PathBuf::from("app_de.txt"),
        };
        let message = error.to_string();
        assert!(message.contains("`app`"));
        assert!(message.contains("`de`"));
        assert!(message.contains("app_de.properties"));
        assert!(message.contains("app_de.txt"));
    }

    #[test]
    fn test_malformed_row_error() {
        let error = Error::MalformedRow {
            row: 3,
            reason: "missing key".to_string(),
        };
        assert_eq!(error.to_string(), "malformed row 3: missing key");
    }

    #[test]
    fn test_at_path_prefixes_message_and_keeps_cause() {
        let error = Error::UnknownEncoding("klingon".to_string()).at_path("a/b.properties");
        assert_eq!(
            error.to_string(),
            "a/b.properties: unknown encoding `klingon`"
        );
        assert!(matches!(error.root_cause(), Error::UnknownEncoding(_)));
    }

    #[test]
    fn test_error_debug() {
        let error = Error::UnknownLocale("xx".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("UnknownLocale"));
        assert!(debug.contains("xx"));
    }
}
