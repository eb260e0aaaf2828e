use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::path::PathBuf;

/// Configuration required to run the export process.
/// This decouples the logic from how the arguments were parsed (CLI/Config file).
#[derive(Clone)]
pub struct ExportConfig {
    pub db_path: PathBuf,
    pub output_dir: PathBuf,
    pub clear_output_dir_before_export: bool,
    pub archive_output: bool,
    pub remove_output_dir_after_archive: bool,
    pub archive_output_dir_if_exists_before_export: bool,
    pub non_interactive: bool,
    pub quiet: bool,
}

/// Characters that cannot appear in a file or directory name on at least one
/// of the filesystems an export may land on.
const INVALID_NAME_CHARS: &[char] = &['/', '\\', '<', '>', ':', '"', '|', '?', '*'];

/// Rewrite `name` so it is usable as a single file or directory name,
/// substituting `_` for each invalid character. ASCII control characters
/// count as invalid too.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_control() || INVALID_NAME_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect()
}

// Everything outside the RFC 3986 unreserved set gets escaped.
const LINK_TARGET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode an attachment file name for use as a Markdown link target.
pub fn encode_link_target(name: &str) -> String {
    utf8_percent_encode(name, LINK_TARGET).to_string()
}
