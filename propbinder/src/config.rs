//! Options for the export and import pipelines.
//!
//! Every option value is passed explicitly into the pipeline entry points; there
//! is no global configuration. All types deserialize with defaults so a partial
//! configuration file only has to name what it changes.

use std::str::FromStr;

use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    formats::SpreadsheetFormat,
    locale::{LocaleFilter, LocaleMatcher},
};

/// Pattern matching `name.properties`, `name_de.properties` and `name_de_DE.properties`.
pub const DEFAULT_FILE_PATTERN: &str = r".*?((_\w{2,3}_\w{2,3})|(_\w{2,3})|())\.properties";
pub const DEFAULT_LOCALE_GROUPS: [usize; 3] = [2, 3, 4];
pub const DEFAULT_LOCALE_FILTER: &str = ".*";
pub const DEFAULT_ENCODING: &str = "UTF-8";

/// How backslash escapes are treated in property files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EscapingMode {
    /// `\uXXXX` sequences are decoded on read and every non-ASCII character is
    /// written as `\uXXXX`.
    #[default]
    JavaUnicode,
    /// Characters are written as-is; `\u` is not treated specially on read.
    Native,
}

impl FromStr for EscapingMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', '_'], "");
        match normalized.as_str() {
            "javaunicode" | "java" | "unicode" => Ok(EscapingMode::JavaUnicode),
            "native" | "none" => Ok(EscapingMode::Native),
            _ => Err(Error::config_error(format!(
                "unknown escaping mode '{}', expected java-unicode or native",
                s
            ))),
        }
    }
}

/// What to do when the same key/locale pair receives two different values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictStrategy {
    /// Keep the first value seen
    First,
    /// Keep the last value seen (default)
    #[default]
    Last,
    /// Fail the run
    Error,
}

impl FromStr for ConflictStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(ConflictStrategy::First),
            "last" => Ok(ConflictStrategy::Last),
            "error" => Ok(ConflictStrategy::Error),
            _ => Err(Error::config_error(format!(
                "unknown conflict strategy '{}', expected first, last or error",
                s
            ))),
        }
    }
}

/// Handling of spreadsheet locale columns the locale filter does not admit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnknownLocalePolicy {
    /// Import the column like any other
    #[default]
    Preserve,
    /// Fail the import
    Reject,
}

impl FromStr for UnknownLocalePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "preserve" => Ok(UnknownLocalePolicy::Preserve),
            "reject" => Ok(UnknownLocalePolicy::Reject),
            _ => Err(Error::config_error(format!(
                "unknown locale policy '{}', expected preserve or reject",
                s
            ))),
        }
    }
}

/// The file naming convention of a bundle tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleLayout {
    /// Full-match pattern over root-relative paths.
    pub file_pattern: String,
    /// Capture groups that may hold the locale segment, in priority order.
    pub locale_groups: Vec<usize>,
    /// Separator in front of the locale tag, stripped from the tag.
    pub locale_separator: String,
    /// Extension used when writing files back.
    pub extension: String,
}

impl Default for BundleLayout {
    fn default() -> Self {
        Self {
            file_pattern: DEFAULT_FILE_PATTERN.to_string(),
            locale_groups: DEFAULT_LOCALE_GROUPS.to_vec(),
            locale_separator: "_".to_string(),
            extension: "properties".to_string(),
        }
    }
}

impl BundleLayout {
    pub fn matcher(&self) -> Result<LocaleMatcher, Error> {
        LocaleMatcher::new(
            &self.file_pattern,
            self.locale_groups.clone(),
            &self.locale_separator,
        )
    }
}

/// Options for reading property files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadOptions {
    /// Encoding label understood by `encoding_rs` (e.g. `UTF-8`, `ISO-8859-1`).
    pub encoding: String,
    pub escaping: EscapingMode,
    pub conflict_strategy: ConflictStrategy,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            encoding: DEFAULT_ENCODING.to_string(),
            escaping: EscapingMode::default(),
            conflict_strategy: ConflictStrategy::default(),
        }
    }
}

impl ReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    pub fn with_escaping(mut self, escaping: EscapingMode) -> Self {
        self.escaping = escaping;
        self
    }

    pub fn with_conflict_strategy(mut self, conflict_strategy: ConflictStrategy) -> Self {
        self.conflict_strategy = conflict_strategy;
        self
    }

    pub fn resolve_encoding(&self) -> Result<&'static Encoding, Error> {
        resolve_encoding(&self.encoding)
    }
}

/// Options for exporting property files into a spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub layout: BundleLayout,
    /// Full-match regex over locale tags; files of other locales are skipped.
    pub locale_filter: String,
    pub properties: ReadOptions,
    pub spreadsheet_format: SpreadsheetFormat,
    pub spreadsheet_encoding: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            layout: BundleLayout::default(),
            locale_filter: DEFAULT_LOCALE_FILTER.to_string(),
            properties: ReadOptions::default(),
            spreadsheet_format: SpreadsheetFormat::default(),
            spreadsheet_encoding: DEFAULT_ENCODING.to_string(),
        }
    }
}

impl ExportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(mut self, layout: BundleLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_locale_filter(mut self, locale_filter: impl Into<String>) -> Self {
        self.locale_filter = locale_filter.into();
        self
    }

    pub fn with_properties(mut self, properties: ReadOptions) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_spreadsheet_format(mut self, format: SpreadsheetFormat) -> Self {
        self.spreadsheet_format = format;
        self
    }

    pub fn with_spreadsheet_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.spreadsheet_encoding = encoding.into();
        self
    }

    pub fn filter(&self) -> Result<LocaleFilter, Error> {
        LocaleFilter::new(&self.locale_filter)
    }
}

/// Options for importing a spreadsheet back into property files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    pub layout: BundleLayout,
    /// Locale columns this filter rejects are handled per `unknown_locales`.
    pub locale_filter: String,
    pub unknown_locales: UnknownLocalePolicy,
    pub conflict_strategy: ConflictStrategy,
    pub property_encoding: String,
    pub escaping: EscapingMode,
    pub spreadsheet_format: SpreadsheetFormat,
    pub spreadsheet_encoding: String,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            layout: BundleLayout::default(),
            locale_filter: DEFAULT_LOCALE_FILTER.to_string(),
            unknown_locales: UnknownLocalePolicy::default(),
            conflict_strategy: ConflictStrategy::default(),
            property_encoding: DEFAULT_ENCODING.to_string(),
            escaping: EscapingMode::default(),
            spreadsheet_format: SpreadsheetFormat::default(),
            spreadsheet_encoding: DEFAULT_ENCODING.to_string(),
        }
    }
}

impl ImportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(mut self, layout: BundleLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_locale_filter(mut self, locale_filter: impl Into<String>) -> Self {
        self.locale_filter = locale_filter.into();
        self
    }

    pub fn with_unknown_locales(mut self, policy: UnknownLocalePolicy) -> Self {
        self.unknown_locales = policy;
        self
    }

    pub fn with_conflict_strategy(mut self, conflict_strategy: ConflictStrategy) -> Self {
        self.conflict_strategy = conflict_strategy;
        self
    }

    pub fn with_property_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.property_encoding = encoding.into();
        self
    }

    pub fn with_escaping(mut self, escaping: EscapingMode) -> Self {
        self.escaping = escaping;
        self
    }

    pub fn with_spreadsheet_format(mut self, format: SpreadsheetFormat) -> Self {
        self.spreadsheet_format = format;
        self
    }

    pub fn with_spreadsheet_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.spreadsheet_encoding = encoding.into();
        self
    }

    pub fn filter(&self) -> Result<LocaleFilter, Error> {
        LocaleFilter::new(&self.locale_filter)
    }
}

/// Looks up an `encoding_rs` encoding by its WHATWG label.
pub fn resolve_encoding(label: &str) -> Result<&'static Encoding, Error> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| Error::UnknownEncoding(label.to_string()))
}
