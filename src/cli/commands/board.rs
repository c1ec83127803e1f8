use chrono::{DateTime, Utc};
use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::board::{Board, MoveOutcome, RemoveOutcome};
use crate::cli::config;
use crate::cli::utils::{output_error, output_success, prompt_line};
use crate::cli::OutputFormat;
use crate::database::models::task::{CreateTask, Task, TaskPriority, TaskStatus, UpdateTask};

#[derive(Subcommand)]
pub enum BoardCommands {
    #[command(about = "Render the three board columns")]
    Show,

    #[command(about = "Add a task to the board")]
    Add {
        #[arg(help = "Task title")]
        title: String,
        #[arg(long, help = "Task description")]
        description: Option<String>,
        #[arg(long, help = "Initial column: todo, inProgress or completed")]
        status: Option<String>,
        #[arg(long, help = "Priority: low, medium or high")]
        priority: Option<String>,
        #[arg(long, help = "Due date (RFC 3339, e.g. 2026-03-01T12:00:00Z)")]
        due: Option<String>,
        #[arg(long, help = "Set a reminder on the task")]
        reminder: bool,
    },

    #[command(about = "Move a card to another column")]
    Move {
        #[arg(help = "Task id")]
        id: String,
        #[arg(help = "Target column: todo, inProgress or completed")]
        status: String,
    },

    #[command(about = "Toggle a task's completion flag")]
    Toggle {
        #[arg(help = "Task id")]
        id: String,
    },

    #[command(about = "Edit a task's fields")]
    Edit {
        #[arg(help = "Task id")]
        id: String,
        #[arg(long, help = "New title")]
        title: Option<String>,
        #[arg(long, help = "New description")]
        description: Option<String>,
        #[arg(long, help = "New column: todo, inProgress or completed")]
        status: Option<String>,
        #[arg(long, help = "New priority: low, medium or high")]
        priority: Option<String>,
        #[arg(long, help = "New due date (RFC 3339)")]
        due: Option<String>,
        #[arg(long, help = "Clear the due date", conflicts_with = "due")]
        clear_due: bool,
        #[arg(long, help = "Set the completion flag")]
        completed: Option<bool>,
        #[arg(long, help = "Set the reminder flag")]
        reminder: Option<bool>,
    },

    #[command(about = "Delete a task (asks for confirmation)")]
    Delete {
        #[arg(help = "Task id")]
        id: String,
        #[arg(long, help = "Skip the confirmation prompt")]
        yes: bool,
    },
}

pub async fn handle(cmd: BoardCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = config::authenticated_client()?;
    let mut board = Board::new();
    board.refresh(&client).await?;

    match cmd {
        BoardCommands::Show => render_board(&board, &output_format),
        BoardCommands::Add { title, description, status, priority, due, reminder } => {
            let input = CreateTask {
                title,
                description,
                status: parse_opt_status(status)?,
                priority: parse_opt_priority(priority)?,
                due_date: parse_opt_due(due)?,
                has_reminder: reminder.then_some(true),
            };

            let task = board.add(&client, input).await?;
            output_success(
                &output_format,
                &format!("Added '{}' to {}", task.title, column_name(task.status)),
                Some(json!({ "task": task })),
            )
        }
        BoardCommands::Move { id, status } => {
            let id = parse_task_id(&id)?;
            let target = parse_status(&status)?;

            match board.move_task(&client, id, target).await? {
                MoveOutcome::Moved => output_success(
                    &output_format,
                    &format!("Moved task to {}", column_name(target)),
                    None,
                ),
                MoveOutcome::SameColumn => output_success(
                    &output_format,
                    &format!("Task is already in {}; nothing to do", column_name(target)),
                    None,
                ),
                MoveOutcome::UnknownTask => {
                    output_error(&output_format, &format!("Task {} not found on the board", id))
                }
            }
        }
        BoardCommands::Toggle { id } => {
            let id = parse_task_id(&id)?;
            let task = board.toggle(&client, id).await?;

            let state = if task.completed { "completed" } else { "not completed" };
            output_success(
                &output_format,
                &format!("'{}' is now {}", task.title, state),
                Some(json!({ "task": task })),
            )
        }
        BoardCommands::Edit {
            id, title, description, status, priority, due, clear_due, completed, reminder,
        } => {
            let id = parse_task_id(&id)?;

            let due_date = if clear_due {
                Some(None)
            } else {
                parse_opt_due(due)?.map(Some)
            };

            let changes = UpdateTask {
                title,
                description,
                status: parse_opt_status(status)?,
                priority: parse_opt_priority(priority)?,
                due_date,
                completed,
                has_reminder: reminder,
            };

            let task = board.edit(&client, id, changes).await?;
            output_success(
                &output_format,
                &format!("Updated '{}'", task.title),
                Some(json!({ "task": task })),
            )
        }
        BoardCommands::Delete { id, yes } => {
            let id = parse_task_id(&id)?;

            let Some(task) = board.get(id) else {
                return output_error(&output_format, &format!("Task {} not found on the board", id));
            };
            let title = task.title.clone();

            if !yes {
                let answer = prompt_line(&format!("Are you sure you want to delete task: {}? [y/N] ", title))?;
                if !matches!(answer.to_lowercase().as_str(), "y" | "yes") {
                    return output_success(&output_format, "Delete cancelled", None);
                }
            }

            match board.remove(&client, id).await {
                RemoveOutcome::Deleted => {
                    output_success(&output_format, &format!("Deleted '{}'", title), None)
                }
                RemoveOutcome::DroppedLocally(e) => output_error(
                    &output_format,
                    &format!("Task removed from view, but server error occurred: {}", e),
                ),
            }
        }
    }
}

fn render_board(board: &Board, output_format: &OutputFormat) -> anyhow::Result<()> {
    let columns = board.columns();

    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "todo": columns.todo,
                    "inProgress": columns.in_progress,
                    "completed": columns.completed,
                }))?
            );
        }
        OutputFormat::Text => {
            render_column("TODO", &columns.todo);
            render_column("IN PROGRESS", &columns.in_progress);
            render_column("COMPLETED", &columns.completed);
        }
    }
    Ok(())
}

fn render_column(heading: &str, tasks: &[&Task]) {
    println!("{} ({})", heading, tasks.len());
    for task in tasks {
        let check = if task.completed { "x" } else { " " };
        let due = task
            .due_date
            .map(|d| format!(", due {}", d.format("%Y-%m-%d")))
            .unwrap_or_default();
        println!("  [{}] {}  {} ({}{})", check, task.id, task.title, task.priority, due);
    }
    println!();
}

fn column_name(status: TaskStatus) -> &'static str {
    status.as_str()
}

fn parse_task_id(raw: &str) -> anyhow::Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| anyhow::anyhow!("invalid task id '{}'", raw))
}

fn parse_status(raw: &str) -> anyhow::Result<TaskStatus> {
    raw.parse::<TaskStatus>().map_err(|e| anyhow::anyhow!(e))
}

fn parse_opt_status(raw: Option<String>) -> anyhow::Result<Option<TaskStatus>> {
    raw.map(|s| parse_status(&s)).transpose()
}

fn parse_opt_priority(raw: Option<String>) -> anyhow::Result<Option<TaskPriority>> {
    raw.map(|s| s.parse::<TaskPriority>().map_err(|e| anyhow::anyhow!(e)))
        .transpose()
}

fn parse_opt_due(raw: Option<String>) -> anyhow::Result<Option<DateTime<Utc>>> {
    raw.map(|s| {
        s.parse::<DateTime<Utc>>()
            .map_err(|e| anyhow::anyhow!("invalid due date '{}': {}", s, e))
    })
    .transpose()
}
