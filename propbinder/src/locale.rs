//! Locale detection from file names and locale filtering.
//!
//! A [`LocaleMatcher`] splits a root-relative path like
//! `i18n/messages_de_DE.properties` into the bundle base name `i18n/messages`
//! and the locale `de_DE`. A [`LocaleFilter`] then decides whether that locale
//! takes part in the run at all.

use regex::Regex;

use crate::{error::Error, types::Locale};

/// Result of matching a single file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMatch {
    pub base_name: String,
    pub locale: Locale,
}

/// Extracts the locale segment and bundle base name from file names.
#[derive(Debug, Clone)]
pub struct LocaleMatcher {
    pattern: Regex,
    locale_groups: Vec<usize>,
    separator: String,
}

impl LocaleMatcher {
    /// Compiles `pattern` as a full match. `locale_groups` are capture group
    /// indices of `pattern`, tried in order.
    pub fn new(
        pattern: &str,
        locale_groups: Vec<usize>,
        separator: impl Into<String>,
    ) -> Result<Self, Error> {
        // Non-capturing wrapper keeps the caller's group numbering.
        let anchored = Regex::new(&format!("^(?:{})$", pattern))?;
        let group_count = anchored.captures_len() - 1;
        if let Some(bad) = locale_groups.iter().find(|&&i| i == 0 || i > group_count) {
            return Err(Error::config_error(format!(
                "locale group {} is not a capture group of '{}' ({} groups)",
                bad, pattern, group_count
            )));
        }

        Ok(Self {
            pattern: anchored,
            locale_groups,
            separator: separator.into(),
        })
    }

    /// Matches a `/`-separated relative path. Returns `None` when the pattern
    /// does not match the whole name.
    pub fn match_file(&self, name: &str) -> Option<FileMatch> {
        let captures = self.pattern.captures(name)?;

        let locale_match = self
            .locale_groups
            .iter()
            .filter_map(|&index| captures.get(index))
            .find(|m| !m.as_str().is_empty());

        let (stem, locale) = match locale_match {
            Some(m) => {
                let tag = m
                    .as_str()
                    .strip_prefix(self.separator.as_str())
                    .unwrap_or(m.as_str());
                let stem = format!("{}{}", &name[..m.start()], &name[m.end()..]);
                let locale = if tag.is_empty() {
                    Locale::Default
                } else {
                    Locale::tag(tag)
                };
                (stem, locale)
            }
            None => (name.to_string(), Locale::Default),
        };

        Some(FileMatch {
            base_name: strip_extension(&stem).to_string(),
            locale,
        })
    }
}

/// Drops the last extension of the final path component.
fn strip_extension(name: &str) -> &str {
    let file_start = name.rfind('/').map_or(0, |i| i + 1);
    match name[file_start..].rfind('.') {
        Some(0) | None => name,
        Some(dot) => &name[..file_start + dot],
    }
}

/// Admits or rejects locales by a full-match regex over their tag.
#[derive(Debug, Clone)]
pub struct LocaleFilter {
    // `None` admits everything.
    pattern: Option<Regex>,
}

impl LocaleFilter {
    pub fn new(pattern: &str) -> Result<Self, Error> {
        Ok(Self {
            pattern: Some(Regex::new(&format!("^(?:{})$", pattern))?),
        })
    }

    /// Accepts every locale.
    pub fn any() -> Self {
        Self { pattern: None }
    }

    /// The default locale is always admitted.
    pub fn admits(&self, locale: &Locale) -> bool {
        match (locale, &self.pattern) {
            (Locale::Default, _) | (_, None) => true,
            (Locale::Tag(tag), Some(pattern)) => pattern.is_match(tag),
        }
    }
}

impl Default for LocaleFilter {
    fn default() -> Self {
        Self::any()
    }
}
