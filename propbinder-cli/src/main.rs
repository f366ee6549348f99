use std::path::PathBuf;

use clap::{Parser, Subcommand};
use propbinder::{ConflictStrategy, EscapingMode, SpreadsheetFormat, UnknownLocalePolicy};
use propbinder_cli::{
    ConfigFile, ExportCommand, ExportOverrides, ImportCommand, ImportOverrides,
    run_export_command, run_import_command,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML configuration file; command-line flags take precedence
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log debug details to stderr (RUST_LOG overrides this)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Export all property bundles below a directory into one spreadsheet.
    Export {
        /// Directory the bundle names are relative to
        #[arg(short, long, default_value = ".")]
        root: PathBuf,
        /// The spreadsheet to write (.csv or .tsv)
        #[arg(short, long)]
        output: PathBuf,
        /// Glob of files to consider, relative to the root (repeatable)
        #[arg(long)]
        include: Vec<String>,
        /// Glob of files to skip, relative to the root (repeatable)
        #[arg(long)]
        exclude: Vec<String>,
        /// Do not honour .gitignore and .ignore files
        #[arg(long)]
        no_ignore: bool,
        /// Only export locales whose tag fully matches this regex
        #[arg(short, long)]
        locales: Option<String>,
        /// Encoding of the property files
        #[arg(long)]
        encoding: Option<String>,
        /// Escaping used in the property files: java-unicode or native
        #[arg(long)]
        escaping: Option<EscapingMode>,
        /// Handling of differing values for one key: first, last or error
        #[arg(long)]
        on_conflict: Option<ConflictStrategy>,
        /// Spreadsheet flavour: csv or tsv (default: from the output extension)
        #[arg(long)]
        format: Option<SpreadsheetFormat>,
        /// Encoding of the spreadsheet
        #[arg(long)]
        sheet_encoding: Option<String>,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Regenerate property files from a spreadsheet.
    Import {
        /// The spreadsheet to read (.csv or .tsv)
        #[arg(short, long)]
        input: PathBuf,
        /// Directory to write the property files into
        #[arg(short, long, default_value = ".")]
        root: PathBuf,
        /// Locale columns outside this regex follow --unknown-locales
        #[arg(short, long)]
        locales: Option<String>,
        /// Handling of filtered locale columns: preserve or reject
        #[arg(long)]
        unknown_locales: Option<UnknownLocalePolicy>,
        /// Handling of repeated rows with differing values: first, last or error
        #[arg(long)]
        on_conflict: Option<ConflictStrategy>,
        /// Encoding of the property files written
        #[arg(long)]
        encoding: Option<String>,
        /// Escaping used in the property files: java-unicode or native
        #[arg(long)]
        escaping: Option<EscapingMode>,
        /// Spreadsheet flavour: csv or tsv (default: from the input extension)
        #[arg(long)]
        format: Option<SpreadsheetFormat>,
        /// Encoding of the spreadsheet
        #[arg(long)]
        sheet_encoding: Option<String>,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: Args) -> Result<(), String> {
    let config = ConfigFile::load_optional(args.config.as_deref())?;

    match args.commands {
        Commands::Export {
            root,
            output,
            include,
            exclude,
            no_ignore,
            locales,
            encoding,
            escaping,
            on_conflict,
            format,
            sheet_encoding,
            json,
        } => {
            let cmd = ExportCommand {
                root,
                output,
                include,
                exclude,
                no_ignore,
                overrides: ExportOverrides {
                    locale_filter: locales,
                    encoding,
                    escaping,
                    conflict_strategy: on_conflict,
                    spreadsheet_format: format,
                    spreadsheet_encoding: sheet_encoding,
                },
                json,
            };
            run_export_command(cmd, &config).map(|_| ())
        }
        Commands::Import {
            input,
            root,
            locales,
            unknown_locales,
            on_conflict,
            encoding,
            escaping,
            format,
            sheet_encoding,
            json,
        } => {
            let cmd = ImportCommand {
                input,
                root,
                overrides: ImportOverrides {
                    locale_filter: locales,
                    unknown_locales,
                    conflict_strategy: on_conflict,
                    encoding,
                    escaping,
                    spreadsheet_format: format,
                    spreadsheet_encoding: sheet_encoding,
                },
                json,
            };
            run_import_command(cmd, &config).map(|_| ())
        }
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}
