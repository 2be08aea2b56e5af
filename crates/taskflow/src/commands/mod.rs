use std::io::Write;

use anyhow::{Result, bail};
use taskflow_app::{TaskPersistence, TaskService};
use taskflow_core::{Counters, Projection, Task};

use crate::{Command, LsFormat};

/// Execute one subcommand against `service`, writing user output to `out`.
pub fn run<P: TaskPersistence>(
    command: Command,
    service: &mut TaskService<P>,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Command::Add { text } => {
            let task = service.add_task(&text.join(" "))?;
            writeln!(out, "Added {}: {}", task.id(), task.text())?;
        }

        Command::Rm { id } => {
            let id = service.resolve_id(&id)?;
            if !service.remove_task(id) {
                bail!("task {id} disappeared before it could be removed");
            }
            writeln!(out, "Removed {id}")?;
        }

        Command::Toggle { id } => {
            let id = service.resolve_id(&id)?;
            let Some(completed) = service.toggle_task(id) else {
                bail!("task {id} disappeared before it could be toggled");
            };
            let state = if completed { "done" } else { "active" };
            writeln!(out, "Marked {id} {state}")?;
        }

        Command::Clear => match service.clear_completed() {
            0 => writeln!(out, "No completed tasks to clear")?,
            1 => writeln!(out, "Cleared 1 completed task")?,
            n => writeln!(out, "Cleared {n} completed tasks")?,
        },

        Command::Ls {
            filter,
            sort,
            format,
        } => {
            if let Some(filter) = filter {
                service.set_filter(filter);
            }
            if let Some(sort) = sort {
                service.set_sort_order(sort);
            }
            let view = service.view();
            match format {
                LsFormat::Table => render_view(&view, out)?,
                LsFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&view)?)?,
            }
        }

        Command::Stats => render_stats(&service.counters(), out)?,
    }

    Ok(())
}

fn render_view(view: &Projection<'_>, out: &mut impl Write) -> Result<()> {
    if let Some(empty) = view.empty_state() {
        writeln!(out, "{}", empty.headline())?;
        writeln!(out, "{}", empty.hint())?;
        return Ok(());
    }

    writeln!(out, "ID | Status | Task | Created")?;
    writeln!(out, "-- | ------ | ---- | -------")?;
    for task in &view.tasks {
        writeln!(out, "{}", task_row(task))?;
    }
    writeln!(
        out,
        "{} | {} | {}",
        view.filter.label(),
        view.sort.label(),
        progress_line(&view.counters)
    )?;
    Ok(())
}

fn task_row(task: &Task) -> String {
    let status = if task.is_completed() { "done" } else { "active" };
    let created = task.created_rfc3339().unwrap_or_else(|| "-".to_owned());
    format!("{} | {status} | {} | {created}", task.id(), task.text())
}

fn progress_line(counters: &Counters) -> String {
    format!(
        "{} of {} done ({}%)",
        counters.completed_count,
        counters.total,
        counters.rounded_progress()
    )
}

fn render_stats(counters: &Counters, out: &mut impl Write) -> Result<()> {
    writeln!(out, "Total: {}", counters.total)?;
    writeln!(out, "Active: {}", counters.active_count)?;
    writeln!(out, "Done: {}", counters.completed_count)?;
    writeln!(out, "Progress: {}%", counters.rounded_progress())?;
    Ok(())
}
