use chrono::Local;
use eyre::{Context, Result, eyre};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

/// Zip `dir` into `{parent}/{base_name}_{timestamp}.zip`, replacing any file
/// already at that exact path, and report the result on the console.
/// Returns the path of the written archive.
pub fn archive_directory(dir: &Path, base_name: &str) -> Result<PathBuf> {
    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    let parent = dir
        .parent()
        .ok_or_else(|| eyre!("Directory has no parent to place the archive in: {}", dir.display()))?;
    let zip_path = parent.join(format!("{}_{}.zip", base_name, timestamp));

    if zip_path.exists() {
        fs::remove_file(&zip_path)
            .wrap_err_with(|| format!("Failed to remove stale archive: {}", zip_path.display()))?;
    }

    zip_dir(dir, &zip_path)?;
    println!("Directory '{}' archived to '{}'", dir.display(), zip_path.display());
    Ok(zip_path)
}

/// Deflate-compress every file under `dir` into `zip_path`.
/// Entry names are relative to `dir`, with forward slashes.
fn zip_dir(dir: &Path, zip_path: &Path) -> Result<()> {
    let file = File::create(zip_path)
        .wrap_err_with(|| format!("Failed to create archive: {}", zip_path.display()))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in WalkDir::new(dir) {
        let entry = entry.wrap_err("Failed to walk directory for archiving")?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(dir)
            .wrap_err("Walked outside the directory being archived")?;
        let name = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");

        zip.start_file(name, options)
            .wrap_err_with(|| format!("Failed to add archive entry: {}", rel.display()))?;
        let mut src = File::open(entry.path())
            .wrap_err_with(|| format!("Failed to open for archiving: {}", entry.path().display()))?;
        io::copy(&mut src, &mut zip)
            .wrap_err_with(|| format!("Failed to compress: {}", entry.path().display()))?;
    }

    zip.finish().wrap_err("Failed to finalize archive")?;
    Ok(())
}
