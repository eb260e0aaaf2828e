//! Record types and read queries for the To-Do SQLite schema.
//!
//! The slice of the schema this tool reads:
//!
//! ```sql
//! task_folders(local_id TEXT, name TEXT, deleted INTEGER, ...)
//! tasks(local_id TEXT, task_folder_local_id TEXT, subject TEXT,
//!       body_content TEXT, due_date TEXT, reminder_datetime TEXT, deleted INTEGER, ...)
//! steps(task_local_id TEXT, subject TEXT, completed INTEGER, deleted INTEGER, ...)
//! linked_entities(task_local_id TEXT, display_name TEXT, web_link TEXT,
//!                 local_id TEXT, deleted INTEGER, ...)
//! ```
//!
//! Rows with `deleted = 1` are soft-deleted by the client and excluded from
//! every query. Attachment payloads live next to the database under
//! `Attachments/{local_id}/{display_name}`.

use eyre::{Context, Result};
use rusqlite::{Connection, OpenFlags};
use std::collections::HashMap;
use std::path::Path;

/// A task list. Its `name` becomes a directory name after sanitization.
#[derive(Debug, Clone)]
pub struct TaskFolder {
    pub id: String,
    pub name: String,
}

/// A single to-do item. Date fields are kept exactly as stored; no parsing.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: String,
    pub folder_id: String,
    pub subject: String,
    pub body: Option<String>,
    pub due_date: Option<String>,
    pub reminder_date: Option<String>,
}

/// A checklist entry within a task. Ordered by load order only.
#[derive(Debug, Clone)]
pub struct Step {
    pub task_id: String,
    pub subject: String,
    pub completed: bool,
}

/// A file linked to a task. Entries with an empty `display_name` are
/// skipped entirely at render time.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub task_id: String,
    pub display_name: String,
    /// Present in the client schema; not rendered anywhere.
    pub web_link: Option<String>,
    /// Subdirectory of the source `Attachments/` directory holding the file.
    pub local_id: String,
}

/// Everything one export run needs, fully materialized before any file is
/// written, with child records grouped by their owning foreign key.
/// Load order is preserved within each group.
pub struct ExportData {
    pub folders: Vec<TaskFolder>,
    pub tasks_by_folder: HashMap<String, Vec<Task>>,
    pub steps_by_task: HashMap<String, Vec<Step>>,
    pub attachments_by_task: HashMap<String, Vec<Attachment>>,
}

pub fn open_read_only(path: &Path) -> Result<Connection> {
    Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .wrap_err_with(|| format!("Failed to open database: {}", path.display()))
}

/// Run the four SELECTs and group the results.
pub fn load(conn: &Connection) -> Result<ExportData> {
    let folders = load_folders(conn)?;
    let tasks = load_tasks(conn)?;
    let steps = load_steps(conn)?;
    let attachments = load_attachments(conn)?;

    Ok(ExportData {
        folders,
        tasks_by_folder: group_by(tasks, |t| t.folder_id.clone()),
        steps_by_task: group_by(steps, |s| s.task_id.clone()),
        attachments_by_task: group_by(attachments, |a| a.task_id.clone()),
    })
}

fn group_by<T>(items: Vec<T>, key: impl Fn(&T) -> String) -> HashMap<String, Vec<T>> {
    let mut map: HashMap<String, Vec<T>> = HashMap::new();
    for item in items {
        map.entry(key(&item)).or_default().push(item);
    }
    map
}

fn load_folders(conn: &Connection) -> Result<Vec<TaskFolder>> {
    let mut stmt = conn
        .prepare("SELECT local_id, name FROM task_folders WHERE deleted = 0")
        .wrap_err("Failed to prepare task_folders query")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(TaskFolder {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })
        .wrap_err("Failed to query task_folders")?;
    rows.collect::<Result<_, _>>()
        .wrap_err("Failed to read task_folders row")
}

fn load_tasks(conn: &Connection) -> Result<Vec<Task>> {
    let mut stmt = conn
        .prepare(
            "SELECT local_id, task_folder_local_id, subject, body_content, due_date, reminder_datetime \
             FROM tasks WHERE deleted = 0",
        )
        .wrap_err("Failed to prepare tasks query")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(Task {
                id: row.get(0)?,
                folder_id: row.get(1)?,
                subject: row.get(2)?,
                body: row.get(3)?,
                due_date: row.get(4)?,
                reminder_date: row.get(5)?,
            })
        })
        .wrap_err("Failed to query tasks")?;
    rows.collect::<Result<_, _>>().wrap_err("Failed to read tasks row")
}

fn load_steps(conn: &Connection) -> Result<Vec<Step>> {
    let mut stmt = conn
        .prepare("SELECT task_local_id, subject, completed FROM steps WHERE deleted = 0")
        .wrap_err("Failed to prepare steps query")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(Step {
                task_id: row.get(0)?,
                subject: row.get(1)?,
                completed: row.get(2)?,
            })
        })
        .wrap_err("Failed to query steps")?;
    rows.collect::<Result<_, _>>().wrap_err("Failed to read steps row")
}

fn load_attachments(conn: &Connection) -> Result<Vec<Attachment>> {
    let mut stmt = conn
        .prepare(
            "SELECT task_local_id, display_name, web_link, local_id \
             FROM linked_entities WHERE deleted = 0",
        )
        .wrap_err("Failed to prepare linked_entities query")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(Attachment {
                task_id: row.get(0)?,
                display_name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                web_link: row.get(2)?,
                local_id: row.get(3)?,
            })
        })
        .wrap_err("Failed to query linked_entities")?;
    rows.collect::<Result<_, _>>()
        .wrap_err("Failed to read linked_entities row")
}
