use std::path::PathBuf;

use propbinder::{ExportSummary, export_to_spreadsheet};

use crate::config::{ConfigFile, ExportOverrides};
use crate::scan::scan_candidates;
use crate::validation::{validate_directory, validate_locale_filter, validate_output_path};

#[derive(Debug, Clone)]
pub struct ExportCommand {
    pub root: PathBuf,
    pub output: PathBuf,
    /// Extra include globs, replacing the configured ones when non-empty.
    pub include: Vec<String>,
    /// Extra exclude globs, added to the configured ones.
    pub exclude: Vec<String>,
    pub no_ignore: bool,
    pub overrides: ExportOverrides,
    pub json: bool,
}

/// Run the export command: scan the root, export every bundle into one spreadsheet.
pub fn run_export_command(cmd: ExportCommand, config: &ConfigFile) -> Result<ExportSummary, String> {
    validate_directory(&cmd.root)?;
    validate_output_path(&cmd.output)?;
    if let Some(filter) = &cmd.overrides.locale_filter {
        validate_locale_filter(filter)?;
    }

    let mut scan = config.scan.clone();
    if !cmd.include.is_empty() {
        scan.include = cmd.include.clone();
    }
    scan.exclude.extend(cmd.exclude.iter().cloned());
    if cmd.no_ignore {
        scan.respect_ignore_files = false;
    }

    let files = scan_candidates(&cmd.root, &scan)?;
    let options = config.export_options(cmd.overrides.clone(), &cmd.output);
    let summary = export_to_spreadsheet(&cmd.root, &files, &cmd.output, &options)
        .map_err(|e| format!("Export failed: {}", e))?;

    if cmd.json {
        let text = serde_json::to_string_pretty(&summary)
            .map_err(|e| format!("Failed to serialize summary JSON: {}", e))?;
        println!("{}", text);
    } else if summary.written {
        println!(
            "✅ Exported {} keys from {} bundles ({} locales) to {}",
            summary.keys,
            summary.bundles,
            summary.locales.len(),
            summary.output.display()
        );
    } else {
        println!("⚠️  No translations found under {}, nothing written", cmd.root.display());
    }
    Ok(summary)
}
