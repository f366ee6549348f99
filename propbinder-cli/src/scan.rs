use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use ignore::{DirEntry, WalkBuilder};
use propbinder::grouping::relative_name;
use rayon::prelude::*;
use serde::Deserialize;
use tracing::{debug, warn};

pub const DEFAULT_INCLUDE: &str = "**/*.properties";

/// Which files below the root are export candidates.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Globs over root-relative paths. `*` does not cross `/`.
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    /// Skip files ignored by `.gitignore` and `.ignore`.
    pub respect_ignore_files: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            include: vec![DEFAULT_INCLUDE.to_string()],
            exclude: Vec::new(),
            respect_ignore_files: true,
        }
    }
}

fn has_glob_meta(s: &str) -> bool {
    s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
}

/// The directory part of `pattern` before its first glob meta-character.
fn static_prefix(pattern: &str) -> &str {
    let end = pattern
        .find(['*', '?', '[', '{'])
        .unwrap_or(pattern.len());
    match pattern[..end].rfind('/') {
        Some(slash) => &pattern[..slash],
        None => "",
    }
}

fn build_set(patterns: &[String]) -> Result<GlobSet, String> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|e| format!("Invalid glob pattern '{}': {}", pattern, e))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| format!("Failed to build glob set: {}", e))
}

/// Lists the candidate files below `root`, sorted and without duplicates.
///
/// Each include pattern is walked from its static directory prefix, and the
/// walks run in parallel.
pub fn scan_candidates(root: &Path, config: &ScanConfig) -> Result<Vec<PathBuf>, String> {
    if !root.is_dir() {
        return Err(format!("Root directory does not exist: {}", root.display()));
    }
    let includes = build_set(&config.include)?;
    let excludes = build_set(&config.exclude)?;

    // Unique walk roots, skipping any nested in another.
    let mut prefixes: Vec<PathBuf> = config
        .include
        .iter()
        .map(|pattern| {
            if has_glob_meta(pattern) {
                root.join(static_prefix(pattern))
            } else {
                root.join(pattern)
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf())
            }
        })
        .filter(|dir| dir.is_dir())
        .collect();
    prefixes.sort();
    prefixes.dedup();
    let walk_roots: Vec<PathBuf> = prefixes
        .iter()
        .filter(|dir| !prefixes.iter().any(|other| other != *dir && dir.starts_with(other)))
        .cloned()
        .collect();

    let walked: Vec<Vec<PathBuf>> = walk_roots
        .par_iter()
        .map(|walk_root| -> Result<Vec<PathBuf>, String> {
            debug!(dir = %walk_root.display(), "scanning");
            let walker = WalkBuilder::new(walk_root)
                .git_ignore(config.respect_ignore_files)
                .git_global(config.respect_ignore_files)
                .git_exclude(config.respect_ignore_files)
                .ignore(config.respect_ignore_files)
                .require_git(false)
                .hidden(false)
                .parents(true)
                .build();

            matching_files(root, walk_root, walker, &includes, &excludes)
        })
        .collect::<Result<_, String>>()?;

    let mut collected: Vec<PathBuf> = walked.into_iter().flatten().collect();
    collected.sort();
    collected.dedup();
    for file in &collected {
        debug!(file = %file.display(), "included");
    }
    Ok(collected)
}

/// Keeps the walked files whose root-relative name passes the globs. The
/// first walk error aborts the scan.
fn matching_files<I>(
    root: &Path,
    walk_root: &Path,
    entries: I,
    includes: &GlobSet,
    excludes: &GlobSet,
) -> Result<Vec<PathBuf>, String>
where
    I: IntoIterator<Item = Result<DirEntry, ignore::Error>>,
{
    let mut out = Vec::new();
    for entry in entries {
        let entry =
            entry.map_err(|e| format!("Failed to scan {}: {}", walk_root.display(), e))?;
        if let Some(err) = entry.error() {
            warn!(path = %entry.path().display(), "{}", err);
        }
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let name = relative_name(relative);
        if includes.is_match(&name) && !excludes.is_match(&name) {
            out.push(entry.path().to_path_buf());
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, name: &str) {
        let path = root.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "k=v\n").unwrap();
    }

    fn names(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| relative_name(f.strip_prefix(root).unwrap()))
            .collect()
    }

    #[test]
    fn test_static_prefix() {
        assert_eq!(static_prefix("**/*.properties"), "");
        assert_eq!(static_prefix("app/i18n/**/*.properties"), "app/i18n");
        assert_eq!(static_prefix("app/messages_*.properties"), "app");
    }

    #[test]
    fn test_default_scan_finds_nested_properties() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "b/messages.properties");
        touch(dir.path(), "a.properties");
        touch(dir.path(), "notes.txt");

        let files = scan_candidates(dir.path(), &ScanConfig::default()).unwrap();
        assert_eq!(
            names(dir.path(), &files),
            vec!["a.properties", "b/messages.properties"]
        );
    }

    #[test]
    fn test_include_and_exclude() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "app/labels.properties");
        touch(dir.path(), "app/old/labels.properties");
        touch(dir.path(), "lib/labels.properties");

        let config = ScanConfig {
            include: vec!["app/**/*.properties".to_string()],
            exclude: vec!["**/old/**".to_string()],
            ..ScanConfig::default()
        };
        let files = scan_candidates(dir.path(), &config).unwrap();
        assert_eq!(names(dir.path(), &files), vec!["app/labels.properties"]);
    }

    #[test]
    fn test_overlapping_includes_are_deduplicated() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "app/labels.properties");

        let config = ScanConfig {
            include: vec![
                "**/*.properties".to_string(),
                "app/*.properties".to_string(),
            ],
            ..ScanConfig::default()
        };
        let files = scan_candidates(dir.path(), &config).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_ignore_file_is_respected() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "keep.properties");
        touch(dir.path(), "build/generated.properties");
        fs::write(dir.path().join(".ignore"), "build/\n").unwrap();

        let files = scan_candidates(dir.path(), &ScanConfig::default()).unwrap();
        assert_eq!(names(dir.path(), &files), vec!["keep.properties"]);

        let all = ScanConfig {
            respect_ignore_files: false,
            ..ScanConfig::default()
        };
        assert_eq!(scan_candidates(dir.path(), &all).unwrap().len(), 2);
    }

    #[test]
    fn test_walk_errors_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let any = build_set(&[DEFAULT_INCLUDE.to_string()]).unwrap();
        let none = build_set(&[]).unwrap();
        let denied = ignore::Error::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "permission denied",
        ));

        let entries: Vec<Result<DirEntry, ignore::Error>> = vec![Err(denied)];
        let error = matching_files(dir.path(), dir.path(), entries, &any, &none).unwrap_err();
        assert!(error.starts_with("Failed to scan"), "{error}");
        assert!(error.contains("permission denied"), "{error}");
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_is_reported() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "open/labels.properties");
        touch(dir.path(), "locked/labels.properties");
        let locked = dir.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let readable = fs::read_dir(&locked).is_ok();
        let result = scan_candidates(dir.path(), &ScanConfig::default());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        // Permission bits do not bind a privileged user.
        if !readable {
            assert!(result.unwrap_err().contains("Failed to scan"));
        }
    }

    #[test]
    fn test_invalid_glob_and_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let config = ScanConfig {
            include: vec!["[".to_string()],
            ..ScanConfig::default()
        };
        assert!(scan_candidates(dir.path(), &config).unwrap_err().contains("Invalid glob"));
        assert!(scan_candidates(&dir.path().join("missing"), &ScanConfig::default()).is_err());
    }
}
