use clap::Parser;
use eyre::{Context, Result, eyre};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use mstodo_export::exporter;
use mstodo_export::interact::ConsolePrompter;
use mstodo_export::utils::ExportConfig;

/// Export Microsoft To-Do task lists to Markdown files.
/// One directory per list, one file per task, attachments copied alongside.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory to export markdown files into.
    #[arg(value_name = "OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Path to the To-Do SQLite database.
    #[arg(long, value_name = "PATH")]
    db_path: Option<PathBuf>,

    /// Path to a specific configuration file.
    /// Defaults to $XDG_CONFIG_HOME/mstodo-export/config.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Archive the output directory first if it already exists.
    #[arg(long)]
    archive_output_dir_if_exists_before_export: bool,

    /// Recursively delete the output directory before exporting.
    #[arg(long)]
    clear_output_dir_before_export: bool,

    /// Zip the output directory after the export finishes.
    #[arg(long)]
    archive_output: bool,

    /// Delete the output directory once it has been archived.
    #[arg(long)]
    remove_output_dir_after_archive: bool,

    /// Never prompt; abort instead of asking for confirmation.
    #[arg(long)]
    non_interactive: bool,

    /// Suppress progress output.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Deserialize, Default)]
struct FileConfig {
    db_path: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    clear_output_dir_before_export: Option<bool>,
    archive_output: Option<bool>,
    remove_output_dir_after_archive: Option<bool>,
    archive_output_dir_if_exists_before_export: Option<bool>,
    non_interactive: Option<bool>,
}

fn load_file_config(explicit_path: Option<&Path>) -> Result<FileConfig> {
    let path = if let Some(p) = explicit_path {
        if !p.exists() {
            return Err(eyre!("Config file not found: {}", p.display()));
        }
        Some(p.to_path_buf())
    } else {
        // Search: XDG/OS config dir, then nothing
        dirs::config_dir()
            .map(|d| d.join("mstodo-export/config.toml"))
            .filter(|p| p.exists())
    };

    match path {
        None => Ok(FileConfig::default()),
        Some(p) => {
            let content = fs::read_to_string(&p)
                .wrap_err_with(|| format!("Failed to read config: {}", p.display()))?;
            toml::from_str(&content)
                .wrap_err_with(|| format!("Failed to parse config: {}", p.display()))
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load config file (CLI path > default path)
    let file_cfg = load_file_config(cli.config.as_deref())?;

    // 2. Resolve paths (CLI > Config). Boolean flags can only switch on;
    //    absence falls back to the file value.
    let db_path = cli.db_path.or(file_cfg.db_path);
    let output_dir = cli.output_dir.or(file_cfg.output_dir);

    // 3. Validate. Both failures print and return cleanly — no partial state.
    let Some(db_path) = db_path.filter(|p| p.exists()) else {
        println!(
            "Database file not found. Please check 'db_path' in the configuration file or provide it with --db-path."
        );
        return Ok(());
    };

    let Some(output_dir) = output_dir.filter(|p| !p.as_os_str().is_empty()) else {
        println!(
            "Output directory not specified. Please check 'output_dir' in the configuration file or provide it as an argument."
        );
        return Ok(());
    };

    // 4. Build the Export Config
    let config = ExportConfig {
        db_path,
        output_dir,
        clear_output_dir_before_export: cli.clear_output_dir_before_export
            || file_cfg.clear_output_dir_before_export.unwrap_or(false),
        archive_output: cli.archive_output || file_cfg.archive_output.unwrap_or(false),
        remove_output_dir_after_archive: cli.remove_output_dir_after_archive
            || file_cfg.remove_output_dir_after_archive.unwrap_or(false),
        archive_output_dir_if_exists_before_export: cli
            .archive_output_dir_if_exists_before_export
            || file_cfg
                .archive_output_dir_if_exists_before_export
                .unwrap_or(false),
        non_interactive: cli.non_interactive || file_cfg.non_interactive.unwrap_or(false),
        quiet: cli.quiet,
    };

    // 5. Run the Business Logic
    exporter::execute(&config, &mut ConsolePrompter)
}
