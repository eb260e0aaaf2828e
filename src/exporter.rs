use crate::archive::archive_directory;
use crate::interact::Prompter;
use crate::loader::{self, Attachment, ExportData};
use crate::renderer;
use crate::utils::{ExportConfig, sanitize_file_name};
use eyre::{Context, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// The main entry point for an export run.
///
/// A strictly linear pass: pre-export directory handling, load everything
/// from the database, render one Markdown file per task, then the optional
/// post-export archive. Abort paths print a message and return `Ok` — the
/// run simply stops, nothing already written is rolled back.
pub fn execute(config: &ExportConfig, prompter: &mut dyn Prompter) -> Result<()> {
    if config.archive_output_dir_if_exists_before_export && config.output_dir.exists() {
        println!("Output directory already exists.");
        archive_directory(&config.output_dir, "exported_tasks_backup")?;
    }

    if config.clear_output_dir_before_export && config.output_dir.exists() {
        println!("Clearing existing output directory...");
        if let Err(e) = fs::remove_dir_all(&config.output_dir)
            && !continue_after_clear_failure(&e, config.non_interactive, prompter)
        {
            return Ok(());
        }
    }

    fs::create_dir_all(&config.output_dir).wrap_err_with(|| {
        format!(
            "Failed to create output directory: {}",
            config.output_dir.display()
        )
    })?;

    // Scoped so the connection is closed before any file is written.
    let data = {
        let conn = loader::open_read_only(&config.db_path)?;
        loader::load(&conn)?
    };

    let task_count = write_tree(&data, config)?;

    if config.archive_output {
        archive_directory(&config.output_dir, "exported_tasks")?;
        if config.remove_output_dir_after_archive {
            fs::remove_dir_all(&config.output_dir).wrap_err_with(|| {
                format!(
                    "Failed to remove output directory: {}",
                    config.output_dir.display()
                )
            })?;
            println!("Removed output directory after archiving.");
        }
    }

    if !config.quiet {
        eprintln!("Done. {} folder(s), {} task(s) exported.", data.folders.len(), task_count);
    }
    println!("Export complete!");
    Ok(())
}

/// Decide whether the run may continue after the output directory could not
/// be cleared. Interactive runs ask the user; non-interactive runs abort.
fn continue_after_clear_failure(
    err: &std::io::Error,
    non_interactive: bool,
    prompter: &mut dyn Prompter,
) -> bool {
    println!("Error clearing output directory: {}", err);
    if non_interactive {
        println!("Aborting export due to error in non-interactive mode.");
        return false;
    }
    if prompter.confirm("Do you want to continue? (y/n)") {
        true
    } else {
        println!("Aborting export.");
        false
    }
}

/// Render every folder and task to disk. Returns the number of tasks written.
fn write_tree(data: &ExportData, config: &ExportConfig) -> Result<usize> {
    let attachments_root = config
        .db_path
        .parent()
        .unwrap_or(Path::new(""))
        .join("Attachments");

    let mut task_count = 0usize;
    for folder in &data.folders {
        let folder_dir = config.output_dir.join(sanitize_file_name(&folder.name));
        fs::create_dir_all(&folder_dir).wrap_err_with(|| {
            format!("Failed to create folder directory: {}", folder_dir.display())
        })?;

        let Some(tasks) = data.tasks_by_folder.get(&folder.id) else {
            continue;
        };
        for task in tasks {
            let steps = data
                .steps_by_task
                .get(&task.id)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            let attachments = data
                .attachments_by_task
                .get(&task.id)
                .map(Vec::as_slice)
                .unwrap_or(&[]);

            let task_path = folder_dir.join(format!("{}.md", sanitize_file_name(&task.subject)));
            let file = File::create(&task_path)
                .wrap_err_with(|| format!("Failed to create: {}", task_path.display()))?;
            let mut writer = BufWriter::new(file);
            renderer::write_task_markdown(&mut writer, task, steps, attachments)
                .wrap_err_with(|| format!("Failed to write: {}", task_path.display()))?;
            writer.flush().wrap_err("Failed to flush markdown file")?;

            copy_attachments(attachments, &attachments_root, &folder_dir)?;
            task_count += 1;
        }
    }
    Ok(task_count)
}

/// Copy each named attachment into `{folder_dir}/assets/`, overwriting any
/// file of the same name. A missing source or a failed copy is reported and
/// skipped — the link in the Markdown stays either way.
fn copy_attachments(
    attachments: &[Attachment],
    attachments_root: &Path,
    folder_dir: &Path,
) -> Result<()> {
    let named: Vec<&Attachment> = attachments
        .iter()
        .filter(|a| !a.display_name.is_empty())
        .collect();
    if named.is_empty() {
        return Ok(());
    }

    let assets_dir = folder_dir.join("assets");
    fs::create_dir_all(&assets_dir)
        .wrap_err_with(|| format!("Failed to create assets directory: {}", assets_dir.display()))?;

    for att in named {
        let source = attachments_root.join(&att.local_id).join(&att.display_name);
        let dest = assets_dir.join(&att.display_name);
        if !source.exists() {
            println!("Attachment not found: {}", source.display());
            continue;
        }
        if let Err(e) = fs::copy(&source, &dest) {
            println!("Error copying attachment: {}", e);
        }
    }
    Ok(())
}
