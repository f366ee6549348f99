use std::path::Path;

use propbinder::{
    BundleLayout, ConflictStrategy, EscapingMode, ExportOptions, ImportOptions, ReadOptions,
    SpreadsheetFormat, UnknownLocalePolicy,
};
use serde::Deserialize;

use crate::scan::ScanConfig;

/// Contents of a `--config` TOML file. Every section and field is optional.
///
/// ```toml
/// [layout]
/// file_pattern = '.*?((_\w{2,3}_\w{2,3})|(_\w{2,3})|())\.properties'
/// locale_groups = [2, 3, 4]
///
/// [scan]
/// include = ["src/main/resources/**/*.properties"]
/// exclude = ["**/target/**"]
///
/// [export]
/// locale_filter = "de|en|fr"
/// encoding = "ISO-8859-1"
///
/// [import]
/// unknown_locales = "reject"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub layout: BundleLayout,
    pub scan: ScanConfig,
    pub export: ExportSection,
    pub import: ImportSection,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportSection {
    pub locale_filter: Option<String>,
    /// Encoding of the property files read.
    pub encoding: Option<String>,
    pub escaping: Option<EscapingMode>,
    pub conflict_strategy: Option<ConflictStrategy>,
    pub spreadsheet_format: Option<SpreadsheetFormat>,
    pub spreadsheet_encoding: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImportSection {
    pub locale_filter: Option<String>,
    pub unknown_locales: Option<UnknownLocalePolicy>,
    pub conflict_strategy: Option<ConflictStrategy>,
    /// Encoding of the property files written.
    pub encoding: Option<String>,
    pub escaping: Option<EscapingMode>,
    pub spreadsheet_format: Option<SpreadsheetFormat>,
    pub spreadsheet_encoding: Option<String>,
}

impl ConfigFile {
    /// Reads and parses a configuration file.
    pub fn load(path: &Path) -> Result<Self, String> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config '{}': {}", path.display(), e))?;
        Self::parse(&text).map_err(|e| format!("Invalid config '{}': {}", path.display(), e))
    }

    pub fn parse(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|e| e.to_string())
    }

    /// Loads `path` if given, otherwise returns the defaults.
    pub fn load_optional(path: Option<&Path>) -> Result<Self, String> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

/// Export settings given on the command line. `Some` wins over the file.
#[derive(Debug, Clone, Default)]
pub struct ExportOverrides {
    pub locale_filter: Option<String>,
    pub encoding: Option<String>,
    pub escaping: Option<EscapingMode>,
    pub conflict_strategy: Option<ConflictStrategy>,
    pub spreadsheet_format: Option<SpreadsheetFormat>,
    pub spreadsheet_encoding: Option<String>,
}

/// Import settings given on the command line. `Some` wins over the file.
#[derive(Debug, Clone, Default)]
pub struct ImportOverrides {
    pub locale_filter: Option<String>,
    pub unknown_locales: Option<UnknownLocalePolicy>,
    pub conflict_strategy: Option<ConflictStrategy>,
    pub encoding: Option<String>,
    pub escaping: Option<EscapingMode>,
    pub spreadsheet_format: Option<SpreadsheetFormat>,
    pub spreadsheet_encoding: Option<String>,
}

impl ConfigFile {
    /// Export options from the file, overridden by `flags`. The spreadsheet
    /// format falls back to the extension of `output`.
    pub fn export_options(&self, flags: ExportOverrides, output: &Path) -> ExportOptions {
        let section = self.export.clone();
        let defaults = ExportOptions::default();
        let read = ReadOptions::new()
            .with_encoding(
                flags
                    .encoding
                    .or(section.encoding)
                    .unwrap_or(defaults.properties.encoding),
            )
            .with_escaping(flags.escaping.or(section.escaping).unwrap_or_default())
            .with_conflict_strategy(
                flags
                    .conflict_strategy
                    .or(section.conflict_strategy)
                    .unwrap_or_default(),
            );

        ExportOptions::new()
            .with_layout(self.layout.clone())
            .with_locale_filter(
                flags
                    .locale_filter
                    .or(section.locale_filter)
                    .unwrap_or(defaults.locale_filter),
            )
            .with_properties(read)
            .with_spreadsheet_format(
                flags
                    .spreadsheet_format
                    .or(section.spreadsheet_format)
                    .or_else(|| SpreadsheetFormat::from_path(output))
                    .unwrap_or_default(),
            )
            .with_spreadsheet_encoding(
                flags
                    .spreadsheet_encoding
                    .or(section.spreadsheet_encoding)
                    .unwrap_or(defaults.spreadsheet_encoding),
            )
    }

    /// Import options from the file, overridden by `flags`. The spreadsheet
    /// format falls back to the extension of `input`.
    pub fn import_options(&self, flags: ImportOverrides, input: &Path) -> ImportOptions {
        let section = self.import.clone();
        let defaults = ImportOptions::default();
        ImportOptions::new()
            .with_layout(self.layout.clone())
            .with_locale_filter(
                flags
                    .locale_filter
                    .or(section.locale_filter)
                    .unwrap_or(defaults.locale_filter),
            )
            .with_unknown_locales(
                flags
                    .unknown_locales
                    .or(section.unknown_locales)
                    .unwrap_or_default(),
            )
            .with_conflict_strategy(
                flags
                    .conflict_strategy
                    .or(section.conflict_strategy)
                    .unwrap_or_default(),
            )
            .with_property_encoding(
                flags
                    .encoding
                    .or(section.encoding)
                    .unwrap_or(defaults.property_encoding),
            )
            .with_escaping(flags.escaping.or(section.escaping).unwrap_or_default())
            .with_spreadsheet_format(
                flags
                    .spreadsheet_format
                    .or(section.spreadsheet_format)
                    .or_else(|| SpreadsheetFormat::from_path(input))
                    .unwrap_or_default(),
            )
            .with_spreadsheet_encoding(
                flags
                    .spreadsheet_encoding
                    .or(section.spreadsheet_encoding)
                    .unwrap_or(defaults.spreadsheet_encoding),
            )
    }
}
