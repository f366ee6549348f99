use std::path::Path;

use propbinder::LocaleFilter;

/// Validate file path exists and is a regular file
pub fn validate_file_path(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Err(format!("File does not exist: {}", path.display()));
    }

    if !path.is_file() {
        return Err(format!("Path is not a file: {}", path.display()));
    }

    Ok(())
}

/// Validate a root directory exists
pub fn validate_directory(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Err(format!("Directory does not exist: {}", path.display()));
    }

    if !path.is_dir() {
        return Err(format!("Path is not a directory: {}", path.display()));
    }

    Ok(())
}

/// Validate the output names a file. Missing parent directories are created
/// when the output is written.
pub fn validate_output_path(path: &Path) -> Result<(), String> {
    if path.file_name().is_none() || path.is_dir() {
        return Err(format!("Output must name a file: {}", path.display()));
    }

    if let Some(parent) = path.parent()
        && parent.is_file()
    {
        return Err(format!("Output directory is a file: {}", parent.display()));
    }

    Ok(())
}

/// Validate a locale filter compiles
pub fn validate_locale_filter(pattern: &str) -> Result<(), String> {
    LocaleFilter::new(pattern)
        .map(|_| ())
        .map_err(|e| format!("Invalid locale filter '{}': {}", pattern, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_validate_file_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("i18n.csv");
        fs::write(&file, "bundle,key\n").unwrap();

        assert!(validate_file_path(&file).is_ok());
        assert!(validate_file_path(dir.path()).unwrap_err().contains("not a file"));
        assert!(
            validate_file_path(&dir.path().join("missing.csv"))
                .unwrap_err()
                .contains("does not exist")
        );
    }

    #[test]
    fn test_validate_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(validate_directory(dir.path()).is_ok());
        assert!(validate_directory(&dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_validate_output_path() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out").join("i18n.csv");
        assert!(validate_output_path(&output).is_ok());
        // Validation has no side effects.
        assert!(!dir.path().join("out").exists());
        assert!(validate_output_path(dir.path()).is_err());

        let file = dir.path().join("plain");
        fs::write(&file, "").unwrap();
        assert!(validate_output_path(&file.join("i18n.csv")).is_err());
    }

    #[test]
    fn test_validate_locale_filter() {
        assert!(validate_locale_filter("de|en_.*").is_ok());
        assert!(validate_locale_filter("(de").unwrap_err().contains("Invalid locale filter"));
    }
}
