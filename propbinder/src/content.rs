//! The per-bundle translation model.
//!
//! A [`ResourceBundleContent`] is read-only once built. All additions go
//! through a [`ResourceBundleContentBuilder`], which enforces one translation
//! per key and locale.
//!
//! ```rust,no_run
//! use indexmap::IndexMap;
//! use propbinder::{Locale, ReadOptions, ResourceBundleContent};
//!
//! let mut files = IndexMap::new();
//! files.insert(Locale::tag("en"), "labels_en.properties".into());
//! files.insert(Locale::tag("de"), "labels_de.properties".into());
//!
//! let bundle = ResourceBundleContent::for_name("labels").from_files(&files, &ReadOptions::new())?;
//! # Ok::<(), propbinder::Error>(())
//! ```

use std::path::PathBuf;

use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::debug;

use crate::{
    config::{ConflictStrategy, ReadOptions},
    error::Error,
    formats::PropertiesFormat,
    traits::Parser,
    types::{BundleFileGroup, Locale, Translation},
};

/// All keys of one bundle and their translations, keys in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResourceBundleContent {
    base_name: String,
    content: IndexMap<String, Vec<Translation>>,
}

impl ResourceBundleContent {
    /// An empty bundle carrying only its name.
    pub fn for_name(base_name: impl Into<String>) -> Self {
        Self {
            base_name: base_name.into(),
            content: IndexMap::new(),
        }
    }

    pub fn builder(base_name: impl Into<String>) -> ResourceBundleContentBuilder {
        ResourceBundleContentBuilder::new(base_name, ConflictStrategy::default())
    }

    /// Reads every file of `files` and returns a new bundle with this bundle's
    /// name. `self` is left untouched.
    ///
    /// Files are parsed in parallel and merged in map order, so key order and
    /// conflict resolution do not depend on thread scheduling.
    pub fn from_files(
        &self,
        files: &IndexMap<Locale, PathBuf>,
        options: &ReadOptions,
    ) -> Result<Self, Error> {
        let encoding = options.resolve_encoding()?;

        let parsed = files
            .par_iter()
            .map(|(locale, path)| {
                debug!(bundle = %self.base_name, %locale, path = %path.display(), "reading property file");
                PropertiesFormat::read_from(path, encoding, &options.escaping)
                    .map(|format| (locale, format))
            })
            .collect::<Vec<_>>();

        let mut builder =
            ResourceBundleContentBuilder::new(self.base_name.clone(), options.conflict_strategy);
        for result in parsed {
            let (locale, format) = result?;
            for (key, value) in format.pairs() {
                builder.add_translation(key, Translation::new(locale.clone(), value))?;
            }
        }
        Ok(builder.build())
    }

    /// Builds the bundle for a group produced by the bundle grouper.
    pub fn from_group(group: &BundleFileGroup, options: &ReadOptions) -> Result<Self, Error> {
        Self::for_name(group.base_name.clone()).from_files(&group.files, options)
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// Keys with all their translations, in insertion order.
    pub fn content(&self) -> &IndexMap<String, Vec<Translation>> {
        &self.content
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.content.keys().map(String::as_str)
    }

    pub fn translations(&self, key: &str) -> &[Translation] {
        self.content.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn translation(&self, key: &str, locale: &Locale) -> Option<&str> {
        self.translations(key)
            .iter()
            .find(|t| &t.locale == locale)
            .map(|t| t.value.as_str())
    }

    /// Locales that have at least one translation, in first-seen order.
    pub fn locales(&self) -> Vec<&Locale> {
        let mut seen: Vec<&Locale> = Vec::new();
        for translation in self.content.values().flatten() {
            if !seen.contains(&&translation.locale) {
                seen.push(&translation.locale);
            }
        }
        seen
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Accumulates translations for one bundle before it is handed on.
#[derive(Debug, Clone)]
pub struct ResourceBundleContentBuilder {
    base_name: String,
    strategy: ConflictStrategy,
    content: IndexMap<String, Vec<Translation>>,
}

impl ResourceBundleContentBuilder {
    pub fn new(base_name: impl Into<String>, strategy: ConflictStrategy) -> Self {
        Self {
            base_name: base_name.into(),
            strategy,
            content: IndexMap::new(),
        }
    }

    pub fn with_conflict_strategy(mut self, strategy: ConflictStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Adds one translation. A repeat of an identical value is ignored; a
    /// different value for the same key and locale is resolved by the
    /// conflict strategy.
    pub fn add_translation(
        &mut self,
        key: impl Into<String>,
        translation: Translation,
    ) -> Result<&mut Self, Error> {
        let key = key.into();
        let translations = self.content.entry(key.clone()).or_default();

        match translations
            .iter_mut()
            .find(|t| t.locale == translation.locale)
        {
            None => translations.push(translation),
            Some(existing) if existing.value == translation.value => {}
            Some(existing) => match self.strategy {
                ConflictStrategy::First => {
                    debug!(bundle = %self.base_name, %key, locale = %existing.locale, "keeping first value");
                }
                ConflictStrategy::Last => {
                    debug!(bundle = %self.base_name, %key, locale = %existing.locale, "replacing earlier value");
                    existing.value = translation.value;
                }
                ConflictStrategy::Error => {
                    return Err(Error::DuplicateTranslation {
                        bundle: self.base_name.clone(),
                        key,
                        locale: translation.locale,
                        first: existing.value.clone(),
                        second: translation.value,
                    });
                }
            },
        }
        Ok(self)
    }

    pub fn build(self) -> ResourceBundleContent {
        ResourceBundleContent {
            base_name: self.base_name,
            content: self.content,
        }
    }
}
