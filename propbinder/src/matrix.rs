//! Flattening bundles into a translation table and back.
//!
//! The table has one column for the bundle name, one for the key and one per
//! locale:
//!
//! | bundle | key      | en    | de    |
//! |--------|----------|-------|-------|
//! | labels | greeting | Hello | Hallo |
//!
//! Locale columns appear in the order they are first seen across the exported
//! bundles. Missing translations are empty cells.

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::{
    config::{ConflictStrategy, ImportOptions, UnknownLocalePolicy},
    content::ResourceBundleContent,
    error::Error,
    locale::LocaleFilter,
    types::{BundleValues, Locale},
};

pub const BUNDLE_COLUMN: &str = "bundle";
pub const KEY_COLUMN: &str = "key";

/// One `(bundle, key)` row of the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixRow {
    pub bundle: String,
    pub key: String,
    pub values: IndexMap<Locale, String>,
}

impl MatrixRow {
    pub fn new(bundle: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bundle: bundle.into(),
            key: key.into(),
            values: IndexMap::new(),
        }
    }

    pub fn value(&self, locale: &Locale) -> Option<&str> {
        self.values.get(locale).map(String::as_str)
    }
}

/// The whole table: the locale columns plus all rows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TranslationMatrix {
    pub locales: Vec<Locale>,
    pub rows: Vec<MatrixRow>,
}

impl TranslationMatrix {
    /// Flattens bundles, keeping bundle order and each bundle's key order.
    ///
    /// Keys that are empty or only whitespace are left out with a warning.
    pub fn from_bundles(bundles: &[ResourceBundleContent]) -> Self {
        let mut locales: Vec<Locale> = Vec::new();
        for bundle in bundles {
            for locale in bundle.locales() {
                if !locales.contains(locale) {
                    locales.push(locale.clone());
                }
            }
        }

        let rows = bundles
            .iter()
            .flat_map(|bundle| {
                bundle
                    .content()
                    .iter()
                    .filter(move |(key, _)| {
                        // Blank key cells do not import.
                        let blank = key.trim().is_empty();
                        if blank {
                            warn!(bundle = %bundle.base_name(), "skipping property with an empty key");
                        }
                        !blank
                    })
                    .map(move |(key, translations)| MatrixRow {
                        bundle: bundle.base_name().to_string(),
                        key: key.clone(),
                        values: translations
                            .iter()
                            .map(|t| (t.locale.clone(), t.value.clone()))
                            .collect(),
                    })
            })
            .collect();

        TranslationMatrix { locales, rows }
    }

    /// The header row: bundle, key, then one label per locale column.
    pub fn header(&self) -> Vec<String> {
        let mut header = vec![BUNDLE_COLUMN.to_string(), KEY_COLUMN.to_string()];
        header.extend(self.locales.iter().map(|l| l.label().to_string()));
        header
    }

    /// Renders header and data rows as cell strings.
    pub fn to_records(&self) -> Vec<Vec<String>> {
        let mut records = Vec::with_capacity(self.rows.len() + 1);
        records.push(self.header());
        for row in &self.rows {
            let mut record = Vec::with_capacity(self.locales.len() + 2);
            record.push(row.bundle.clone());
            record.push(row.key.clone());
            for locale in &self.locales {
                record.push(row.value(locale).unwrap_or_default().to_string());
            }
            records.push(record);
        }
        records
    }

    /// Parses cell strings. The first record must be the header.
    ///
    /// Empty cells are treated as "no translation". Rows that are entirely
    /// empty are skipped; rows with content but no bundle or key fail.
    pub fn from_records(records: &[Vec<String>], options: &ImportOptions) -> Result<Self, Error> {
        let Some((header, data)) = records.split_first() else {
            return Err(Error::DataMismatch("spreadsheet is empty".to_string()));
        };
        let locales = parse_header(header, &options.filter()?, options.unknown_locales)?;

        let mut rows = Vec::with_capacity(data.len());
        for (index, record) in data.iter().enumerate() {
            // 1-based, counting the header row.
            let row_number = index + 2;
            if record.iter().all(|cell| cell.trim().is_empty()) {
                debug!(row = row_number, "skipping blank row");
                continue;
            }

            let cell = |i: usize| record.get(i).map(String::as_str).unwrap_or_default();
            let bundle = cell(0).trim();
            let key = cell(1);
            if bundle.is_empty() {
                return Err(Error::MalformedRow {
                    row: row_number,
                    reason: "missing bundle name".to_string(),
                });
            }
            if key.trim().is_empty() {
                return Err(Error::MalformedRow {
                    row: row_number,
                    reason: "missing key".to_string(),
                });
            }
            if leaves_root(bundle) {
                return Err(Error::MalformedRow {
                    row: row_number,
                    reason: format!("bundle name `{}` points outside the root", bundle),
                });
            }
            if record.len() > locales.len() + 2
                && record[locales.len() + 2..].iter().any(|c| !c.is_empty())
            {
                warn!(row = row_number, "ignoring cells beyond the last locale column");
            }

            let mut row = MatrixRow::new(bundle, key);
            for (offset, locale) in locales.iter().enumerate() {
                let value = cell(offset + 2);
                if !value.is_empty() {
                    row.values.insert(locale.clone(), value.to_string());
                }
            }
            rows.push(row);
        }

        Ok(TranslationMatrix { locales, rows })
    }

    /// Regroups rows into bundle → locale → key → value.
    ///
    /// A repeated `(bundle, key, locale)` with a different value is resolved
    /// by `strategy`.
    pub fn into_bundle_values(self, strategy: ConflictStrategy) -> Result<BundleValues, Error> {
        let mut bundles: BundleValues = IndexMap::new();
        for row in self.rows {
            let locales = bundles.entry(row.bundle.clone()).or_default();
            for (locale, value) in row.values {
                let keys = locales.entry(locale.clone()).or_default();
                match keys.get_mut(&row.key) {
                    None => {
                        keys.insert(row.key.clone(), value);
                    }
                    Some(existing) if *existing == value => {}
                    Some(existing) => match strategy {
                        ConflictStrategy::First => {}
                        ConflictStrategy::Last => *existing = value,
                        ConflictStrategy::Error => {
                            return Err(Error::DuplicateTranslation {
                                bundle: row.bundle,
                                key: row.key,
                                locale,
                                first: existing.clone(),
                                second: value,
                            });
                        }
                    },
                }
            }
        }
        Ok(bundles)
    }
}

fn parse_header(
    header: &[String],
    filter: &LocaleFilter,
    policy: UnknownLocalePolicy,
) -> Result<Vec<Locale>, Error> {
    let column = |i: usize| header.get(i).map(|c| c.trim()).unwrap_or_default();
    if !column(0).eq_ignore_ascii_case(BUNDLE_COLUMN) || !column(1).eq_ignore_ascii_case(KEY_COLUMN)
    {
        return Err(Error::DataMismatch(format!(
            "header must start with `{}` and `{}`, found `{}` and `{}`",
            BUNDLE_COLUMN,
            KEY_COLUMN,
            column(0),
            column(1)
        )));
    }

    // Empty cells after the last label are not locale columns.
    let labels = header
        .iter()
        .skip(2)
        .rposition(|label| !label.trim().is_empty())
        .map_or(&[][..], |last| &header[2..=last + 2]);

    let mut locales: Vec<Locale> = Vec::new();
    for (offset, label) in labels.iter().enumerate() {
        if label.trim().is_empty() {
            return Err(Error::DataMismatch(format!(
                "locale column {} has no label",
                offset + 3
            )));
        }
        let locale = Locale::from_label(label);
        if let Locale::Tag(tag) = &locale
            && (tag.contains(['/', '\\']) || tag == "..")
        {
            return Err(Error::DataMismatch(format!(
                "locale column `{}` is not a valid locale tag",
                tag
            )));
        }
        if locales.contains(&locale) {
            return Err(Error::DataMismatch(format!(
                "locale column `{}` appears more than once",
                locale
            )));
        }
        if !filter.admits(&locale) {
            match policy {
                UnknownLocalePolicy::Preserve => {
                    debug!(%locale, "keeping locale column outside the locale filter");
                }
                UnknownLocalePolicy::Reject => {
                    return Err(Error::UnknownLocale(locale.label().to_string()));
                }
            }
        }
        locales.push(locale);
    }
    Ok(locales)
}

/// Whether a `/`-separated bundle name climbs out of the directory it is
/// written below.
fn leaves_root(bundle: &str) -> bool {
    bundle.split(['/', '\\']).any(|part| part.trim() == "..")
}

/// Flattens bundles into table records, header first.
pub fn to_rows(bundles: &[ResourceBundleContent]) -> Vec<Vec<String>> {
    TranslationMatrix::from_bundles(bundles).to_records()
}

/// Decodes table records into bundle → locale → key → value.
pub fn from_rows(records: &[Vec<String>], options: &ImportOptions) -> Result<BundleValues, Error> {
    TranslationMatrix::from_records(records, options)?.into_bundle_values(options.conflict_strategy)
}
