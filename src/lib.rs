//! # mstodo-export
//!
//! A CLI tool that exports Microsoft To-Do task lists to local Markdown files.
//!
//! ## What it does
//!
//! The To-Do client keeps its data in a SQLite database with an
//! `Attachments/` directory next to it for linked files. This tool reads that
//! database and writes one Markdown file per task, grouped into one directory
//! per task list, with any linked attachments copied into an `assets/`
//! subdirectory so the links in the Markdown resolve locally. The result can
//! optionally be zipped, for keeping dated snapshots of your tasks.
//!
//! The database is opened **read-only** — your data is never modified.
//! Soft-deleted rows (`deleted = 1`) are excluded from the export.
//!
//! ## Usage
//!
//! ```sh
//! # Export all task lists to a directory
//! mstodo-export ~/notes/todo --db-path /path/to/AC/todosqlite.db
//!
//! # Refresh an existing export and keep a zip snapshot
//! mstodo-export ~/notes/todo --clear-output-dir-before-export --archive-output
//! ```
//!
//! Preferences can be persisted in `~/.config/mstodo-export/config.toml`;
//! command-line arguments take precedence over the file.
//!
//! ## Compatibility
//!
//! Tracks the To-Do client's internal (undocumented) SQLite schema: the
//! `task_folders`, `tasks`, `steps` and `linked_entities` tables plus the
//! sibling `Attachments/{local_id}/{display_name}` file layout.

pub mod archive;
pub mod exporter;
pub mod interact;
pub mod loader;
pub mod renderer;
pub mod utils;
