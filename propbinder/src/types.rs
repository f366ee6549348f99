//! Core, format-agnostic types for propbinder.
//! The property reader decodes into these; the matrix codec flattens these.

use std::{fmt::Display, path::PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Column label used for the bundle's default (no-locale) file.
pub const DEFAULT_LOCALE_LABEL: &str = "default";

/// A language/region variant of a bundle, identified purely by the tag found in
/// the file name.
///
/// `Default` stands for the file without a locale segment, e.g.
/// `messages.properties`. Tags are opaque: `de`, `de_DE` and `pt_BR` are only
/// compared as strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Locale {
    Default,
    Tag(String),
}

impl Locale {
    pub fn tag(tag: impl Into<String>) -> Self {
        Locale::Tag(tag.into())
    }

    /// Parses a spreadsheet column label. Empty labels and `default` map to
    /// [`Locale::Default`].
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.is_empty() || label.eq_ignore_ascii_case(DEFAULT_LOCALE_LABEL) {
            Locale::Default
        } else {
            Locale::Tag(label.to_string())
        }
    }

    /// The column label for this locale.
    pub fn label(&self) -> &str {
        match self {
            Locale::Default => DEFAULT_LOCALE_LABEL,
            Locale::Tag(tag) => tag,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Locale::Default)
    }
}

impl Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for Locale {
    fn from(value: String) -> Self {
        Locale::from_label(&value)
    }
}

impl From<Locale> for String {
    fn from(value: Locale) -> Self {
        value.label().to_string()
    }
}

/// One translated value of a key for a single locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub locale: Locale,
    pub value: String,
}

impl Translation {
    pub fn new(locale: Locale, value: impl Into<String>) -> Self {
        Self {
            locale,
            value: value.into(),
        }
    }
}

impl Display for Translation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.locale, self.value)
    }
}

/// The physical files of one logical bundle, one per locale.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct BundleFileGroup {
    pub base_name: String,
    pub files: IndexMap<Locale, PathBuf>,
}

impl BundleFileGroup {
    pub fn new(base_name: impl Into<String>) -> Self {
        Self {
            base_name: base_name.into(),
            files: IndexMap::new(),
        }
    }

    pub fn locales(&self) -> impl Iterator<Item = &Locale> {
        self.files.keys()
    }
}

/// Translations decoded from a spreadsheet: bundle → locale → key → value.
pub type BundleValues = IndexMap<String, IndexMap<Locale, IndexMap<String, String>>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_label_round_trip() {
        assert_eq!(Locale::from_label("de_DE"), Locale::tag("de_DE"));
        assert_eq!(Locale::tag("de_DE").label(), "de_DE");
        assert_eq!(Locale::from_label("default"), Locale::Default);
        assert_eq!(Locale::from_label("DEFAULT"), Locale::Default);
        assert_eq!(Locale::from_label("  "), Locale::Default);
        assert_eq!(Locale::Default.to_string(), "default");
    }

    #[test]
    fn test_locale_equality_is_by_tag() {
        assert_eq!(Locale::tag("en"), Locale::from_label(" en "));
        assert_ne!(Locale::tag("en"), Locale::tag("EN"));
        assert_ne!(Locale::tag("en"), Locale::Default);
    }

    #[test]
    fn test_translation_display() {
        let translation = Translation::new(Locale::tag("en"), "Hello");
        assert_eq!(translation.to_string(), "en=Hello");
    }

    #[test]
    fn test_bundle_file_group_keeps_insertion_order() {
        let mut group = BundleFileGroup::new("app");
        group
            .files
            .insert(Locale::tag("en"), PathBuf::from("app_en.properties"));
        group
            .files
            .insert(Locale::Default, PathBuf::from("app.properties"));
        let locales: Vec<_> = group.locales().cloned().collect();
        assert_eq!(locales, vec![Locale::tag("en"), Locale::Default]);
    }
}
