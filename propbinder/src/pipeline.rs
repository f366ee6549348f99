//! The export and import batch runs.
//!
//! Both directions build their whole result in memory before touching the
//! destination. A failure at any stage returns before the first write.

use std::{
    fmt::{Display, Formatter},
    path::{Path, PathBuf},
};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    config::{BundleLayout, ExportOptions, ImportOptions, resolve_encoding},
    content::ResourceBundleContent,
    error::Error,
    formats::{PropertiesFormat, Spreadsheet},
    grouping::{group_bundle_files, relative_name, relativize},
    matrix::{TranslationMatrix, from_rows},
    traits::{Parser, write_atomically},
    types::Locale,
};

/// Where a run currently is. Only used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Scanning,
    Grouping,
    Reading,
    Encoding,
    Decoding,
    Writing,
    Done,
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Scanning => "scanning",
            Stage::Grouping => "grouping",
            Stage::Reading => "reading",
            Stage::Encoding => "encoding",
            Stage::Decoding => "decoding",
            Stage::Writing => "writing",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// What an export run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    pub output: PathBuf,
    pub bundles: usize,
    pub keys: usize,
    pub locales: Vec<String>,
    /// False when there was nothing to export and the output was left alone.
    pub written: bool,
}

/// What an import run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub bundles: usize,
    pub translations: usize,
    pub files: Vec<PathBuf>,
}

/// Groups and reads the candidate `files` below `root` into bundles.
///
/// `files` may be absolute or relative to `root`. Bundle names are derived
/// from the root-relative path.
pub fn export_bundles<P: AsRef<Path>>(
    root: &Path,
    files: &[P],
    options: &ExportOptions,
) -> Result<Vec<ResourceBundleContent>, Error> {
    ensure_root(root)?;
    let matcher = options.layout.matcher()?;
    let filter = options.filter()?;
    options.properties.resolve_encoding()?;

    log_stage(Stage::Scanning);
    let relative = relativize(root, files);
    if relative.is_empty() {
        warn!(root = %root.display(), "no candidate files to export");
        return Ok(Vec::new());
    }
    debug!(count = relative.len(), "candidate files");

    log_stage(Stage::Grouping);
    let groups = group_bundle_files(&relative, &matcher, &filter)?;
    info!(bundles = groups.len(), "grouped candidate files");

    log_stage(Stage::Reading);
    let mut bundles = Vec::with_capacity(groups.len());
    for group in groups.values() {
        let located = group
            .files
            .iter()
            .map(|(locale, path)| (locale.clone(), root.join(path)))
            .collect();
        let bundle = ResourceBundleContent::for_name(group.base_name.clone())
            .from_files(&located, &options.properties)?;
        debug!(bundle = %bundle.base_name(), keys = bundle.len(), "read bundle");
        bundles.push(bundle);
    }
    Ok(bundles)
}

/// Exports the candidate `files` below `root` into one spreadsheet at `output`.
pub fn export_to_spreadsheet<P: AsRef<Path>>(
    root: &Path,
    files: &[P],
    output: &Path,
    options: &ExportOptions,
) -> Result<ExportSummary, Error> {
    log_stage(Stage::Idle);
    if output.file_name().is_none() {
        return Err(Error::config_error(format!(
            "output '{}' does not name a file",
            output.display()
        )));
    }
    let encoding = resolve_encoding(&options.spreadsheet_encoding)?;

    let bundles = export_bundles(root, files, options)?;
    let matrix = TranslationMatrix::from_bundles(&bundles);
    let keys = matrix.rows.len();
    if keys == 0 {
        warn!(output = %output.display(), "nothing to export, output not written");
        log_stage(Stage::Done);
        return Ok(ExportSummary {
            output: output.to_path_buf(),
            bundles: bundles.len(),
            keys,
            locales: Vec::new(),
            written: false,
        });
    }

    log_stage(Stage::Encoding);
    let locales = matrix.locales.iter().map(|l| l.label().to_string()).collect();
    let bytes = Spreadsheet::with_records(matrix.to_records())
        .to_bytes(encoding, &options.spreadsheet_format)
        .map_err(|e| e.at_path(output))?;

    log_stage(Stage::Writing);
    write_atomically(output, &bytes)?;
    info!(output = %output.display(), bundles = bundles.len(), keys, "exported spreadsheet");

    log_stage(Stage::Done);
    Ok(ExportSummary {
        output: output.to_path_buf(),
        bundles: bundles.len(),
        keys,
        locales,
        written: true,
    })
}

/// Regenerates property files below `root` from the spreadsheet at `input`.
///
/// Every `(bundle, locale)` pair with at least one value becomes one file,
/// named by [`bundle_file_path`]. Existing files at those paths are replaced.
pub fn import_from_spreadsheet(
    input: &Path,
    root: &Path,
    options: &ImportOptions,
) -> Result<ImportSummary, Error> {
    log_stage(Stage::Idle);
    ensure_root(root)?;
    let matcher = options.layout.matcher()?;
    options.filter()?;
    let sheet_encoding = resolve_encoding(&options.spreadsheet_encoding)?;
    let property_encoding = resolve_encoding(&options.property_encoding)?;

    log_stage(Stage::Reading);
    let sheet = Spreadsheet::read_from(input, sheet_encoding, &options.spreadsheet_format)?;

    log_stage(Stage::Decoding);
    let values = from_rows(&sheet.records, options).map_err(|e| e.at_path(input))?;

    log_stage(Stage::Encoding);
    let mut outputs: Vec<(PathBuf, Vec<u8>)> = Vec::new();
    let mut translations = 0;
    for (bundle, locales) in &values {
        for (locale, entries) in locales {
            if entries.is_empty() {
                continue;
            }
            let path = bundle_file_path(root, bundle, locale, &options.layout);
            let name = relative_name(path.strip_prefix(root).unwrap_or(&path));
            match matcher.match_file(&name) {
                Some(found) if found.base_name == *bundle && found.locale == *locale => {}
                _ => warn!(file = %name, "file name will not be recognised by the bundle pattern"),
            }

            let bytes = PropertiesFormat::with_pairs(entries.iter())
                .to_bytes(property_encoding, &options.escaping)
                .map_err(|e| e.at_path(&path))?;
            translations += entries.len();
            outputs.push((path, bytes));
        }
    }

    if outputs.is_empty() {
        warn!(input = %input.display(), "spreadsheet holds no translations, nothing written");
        log_stage(Stage::Done);
        return Ok(ImportSummary {
            bundles: 0,
            translations: 0,
            files: Vec::new(),
        });
    }

    log_stage(Stage::Writing);
    for (path, bytes) in &outputs {
        write_atomically(path, bytes)?;
        debug!(path = %path.display(), "wrote property file");
    }
    info!(files = outputs.len(), translations, "imported spreadsheet");

    log_stage(Stage::Done);
    Ok(ImportSummary {
        bundles: values.len(),
        translations,
        files: outputs.into_iter().map(|(path, _)| path).collect(),
    })
}

/// The file a bundle's locale is written to: `base_tag.ext` below `root`, or
/// `base.ext` for the default locale.
pub fn bundle_file_path(
    root: &Path,
    base_name: &str,
    locale: &Locale,
    layout: &BundleLayout,
) -> PathBuf {
    let mut name = base_name.to_string();
    if let Locale::Tag(tag) = locale {
        name.push_str(&layout.locale_separator);
        name.push_str(tag);
    }
    if !layout.extension.is_empty() {
        name.push('.');
        name.push_str(&layout.extension);
    }
    name.split('/')
        .filter(|part| !part.is_empty())
        .fold(root.to_path_buf(), |path, part| path.join(part))
}

fn ensure_root(root: &Path) -> Result<(), Error> {
    if !root.is_dir() {
        return Err(Error::config_error(format!(
            "root directory '{}' does not exist",
            root.display()
        )));
    }
    Ok(())
}

fn log_stage(stage: Stage) {
    info!(%stage, "stage");
}
