use crate::loader::{Attachment, Step, Task};
use crate::utils::encode_link_target;
use std::io::Write;

/// Write one task as a standalone Markdown document.
///
/// Section order is fixed: Notes, Due, Reminder, Steps, Attachments. A
/// section appears only when the backing field or collection is non-empty.
/// The body text goes through verbatim — no escaping.
pub fn write_task_markdown<W: Write>(
    writer: &mut W,
    task: &Task,
    steps: &[Step],
    attachments: &[Attachment],
) -> std::io::Result<()> {
    writeln!(writer, "# {}", task.subject)?;
    writeln!(writer)?;

    if let Some(body) = task.body.as_deref().filter(|b| !b.is_empty()) {
        writeln!(writer, "## Notes")?;
        writeln!(writer, "{}", body)?;
        writeln!(writer)?;
    }

    if let Some(due) = task.due_date.as_deref().filter(|d| !d.is_empty()) {
        writeln!(writer, "**Due:** {}", due)?;
        writeln!(writer)?;
    }

    if let Some(reminder) = task.reminder_date.as_deref().filter(|r| !r.is_empty()) {
        writeln!(writer, "**Reminder:** {}", reminder)?;
        writeln!(writer)?;
    }

    if !steps.is_empty() {
        writeln!(writer, "## Steps")?;
        for step in steps {
            let mark = if step.completed { "x" } else { " " };
            writeln!(writer, "- [{}] {}", mark, step.subject)?;
        }
        writeln!(writer)?;
    }

    let linked: Vec<&Attachment> = attachments
        .iter()
        .filter(|a| !a.display_name.is_empty())
        .collect();
    if !linked.is_empty() {
        writeln!(writer, "## Attachments")?;
        for att in linked {
            writeln!(
                writer,
                "- [{}](assets/{})",
                att.display_name,
                encode_link_target(&att.display_name)
            )?;
        }
        writeln!(writer)?;
    }

    Ok(())
}
