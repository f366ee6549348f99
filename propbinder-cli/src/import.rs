use std::path::PathBuf;

use propbinder::{ImportSummary, import_from_spreadsheet};

use crate::config::{ConfigFile, ImportOverrides};
use crate::validation::{validate_directory, validate_file_path, validate_locale_filter};

#[derive(Debug, Clone)]
pub struct ImportCommand {
    pub input: PathBuf,
    pub root: PathBuf,
    pub overrides: ImportOverrides,
    pub json: bool,
}

/// Run the import command: regenerate property files from a spreadsheet.
pub fn run_import_command(cmd: ImportCommand, config: &ConfigFile) -> Result<ImportSummary, String> {
    validate_file_path(&cmd.input)?;
    validate_directory(&cmd.root)?;
    if let Some(filter) = &cmd.overrides.locale_filter {
        validate_locale_filter(filter)?;
    }

    let options = config.import_options(cmd.overrides.clone(), &cmd.input);
    let summary = import_from_spreadsheet(&cmd.input, &cmd.root, &options)
        .map_err(|e| format!("Import failed: {}", e))?;

    if cmd.json {
        let text = serde_json::to_string_pretty(&summary)
            .map_err(|e| format!("Failed to serialize summary JSON: {}", e))?;
        println!("{}", text);
    } else if summary.files.is_empty() {
        println!("⚠️  {} holds no translations, nothing written", cmd.input.display());
    } else {
        println!(
            "✅ Imported {} translations into {} files ({} bundles) under {}",
            summary.translations,
            summary.files.len(),
            summary.bundles,
            cmd.root.display()
        );
    }
    Ok(summary)
}
