//! Partitioning candidate files into bundles.

use std::path::{Component, Path, PathBuf};

use indexmap::IndexMap;
use tracing::debug;

use crate::{
    error::Error,
    locale::{LocaleFilter, LocaleMatcher},
    types::BundleFileGroup,
};

/// Groups `files` by bundle base name, mapping each locale to its file.
///
/// `files` are `/`-separated names relative to the scanned root, which is
/// what the matcher sees and what ends up in the bundle names. Files the
/// matcher rejects or whose locale the filter rejects are skipped. The input
/// is sorted first, so the grouping and its order only depend on the set of
/// names.
///
/// Fails with [`Error::InconsistentBundleBaseName`] if two files land on the
/// same bundle and locale; nothing is returned in that case.
pub fn group_bundle_files<P: AsRef<Path>>(
    files: &[P],
    matcher: &LocaleMatcher,
    filter: &LocaleFilter,
) -> Result<IndexMap<String, BundleFileGroup>, Error> {
    let mut sorted: Vec<&Path> = files.iter().map(AsRef::as_ref).collect();
    sorted.sort();
    sorted.dedup();

    let mut groups: IndexMap<String, BundleFileGroup> = IndexMap::new();
    for path in sorted {
        let name = relative_name(path);
        let Some(found) = matcher.match_file(&name) else {
            debug!(file = %name, "file name does not match the bundle pattern");
            continue;
        };
        if !filter.admits(&found.locale) {
            debug!(file = %name, locale = %found.locale, "locale excluded by filter");
            continue;
        }

        let group = groups
            .entry(found.base_name.clone())
            .or_insert_with(|| BundleFileGroup::new(found.base_name.clone()));
        if let Some(existing) = group.files.get(&found.locale) {
            return Err(Error::InconsistentBundleBaseName {
                bundle: found.base_name,
                locale: found.locale,
                existing: existing.clone(),
                duplicate: path.to_path_buf(),
            });
        }
        group.files.insert(found.locale, path.to_path_buf());
    }

    Ok(groups)
}

/// Renders a path with `/` separators regardless of platform. Root, drive
/// and `.` components are dropped, so the name never starts with `/`.
pub fn relative_name(path: &Path) -> String {
    path.components()
        .filter(|c| matches!(c, Component::Normal(_) | Component::ParentDir))
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Strips `root` from every path, keeping paths outside `root` unchanged.
pub fn relativize<P: AsRef<Path>>(root: &Path, files: &[P]) -> Vec<PathBuf> {
    files
        .iter()
        .map(|f| {
            let f = f.as_ref();
            f.strip_prefix(root).unwrap_or(f).to_path_buf()
        })
        .collect()
}
