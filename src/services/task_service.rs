use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::task::{CreateTask, Task, TaskPriority, TaskStatus, UpdateTask};

const TITLE_MAX_CHARS: usize = 100;
const DESCRIPTION_MAX_CHARS: usize = 1000;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("{0}")]
    Validation(String),

    #[error("Task not found with id {0} or not authorized")]
    NotFound(Uuid),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Ownership-scoped CRUD over the tasks table. Every operation takes the
/// caller's user id and touches only rows where `created_by` matches it;
/// mutations fetch the owned row first and never update blindly by id.
pub struct TaskService {
    pool: PgPool,
}

impl TaskService {
    pub async fn new() -> Result<Self, TaskError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self { pool })
    }

    pub async fn create(&self, owner: Uuid, input: CreateTask) -> Result<Task, TaskError> {
        let title = validate_title(&input.title)?;
        validate_description(input.description.as_deref())?;

        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (id, title, description, status, priority, due_date, completed, has_reminder, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, FALSE, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(&input.description)
        .bind(input.status.unwrap_or(TaskStatus::Todo))
        .bind(input.priority.unwrap_or(TaskPriority::Medium))
        .bind(input.due_date)
        .bind(input.has_reminder.unwrap_or(false))
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    pub async fn list(&self, owner: Uuid) -> Result<Vec<Task>, TaskError> {
        let tasks = sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks WHERE created_by = $1 ORDER BY created_at",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    /// Fetch a task scoped to its owner. Absent and not-owned are the same
    /// error so a caller cannot probe for foreign task ids.
    pub async fn get(&self, owner: Uuid, id: Uuid) -> Result<Task, TaskError> {
        sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1 AND created_by = $2")
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(TaskError::NotFound(id))
    }

    pub async fn update(&self, owner: Uuid, id: Uuid, changes: UpdateTask) -> Result<Task, TaskError> {
        let existing = self.get(owner, id).await?;

        let title = match changes.title {
            Some(ref t) => validate_title(t)?,
            None => existing.title,
        };
        if let Some(ref d) = changes.description {
            validate_description(Some(d))?;
        }

        let description = changes.description.or(existing.description);
        let status = changes.status.unwrap_or(existing.status);
        let priority = changes.priority.unwrap_or(existing.priority);
        let due_date = match changes.due_date {
            Some(explicit) => explicit, // Some(None) clears the date
            None => existing.due_date,
        };
        let completed = changes.completed.unwrap_or(existing.completed);
        let has_reminder = changes.has_reminder.unwrap_or(existing.has_reminder);

        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = $1, description = $2, status = $3, priority = $4,
                due_date = $5, completed = $6, has_reminder = $7, updated_at = now()
            WHERE id = $8 AND created_by = $9
            RETURNING *
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(status)
        .bind(priority)
        .bind(due_date)
        .bind(completed)
        .bind(has_reminder)
        .bind(id)
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    pub async fn update_status(&self, owner: Uuid, id: Uuid, status: TaskStatus) -> Result<Task, TaskError> {
        self.get(owner, id).await?;

        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks SET status = $1, updated_at = now()
            WHERE id = $2 AND created_by = $3
            RETURNING *
            "#,
        )
        .bind(status)
        .bind(id)
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    pub async fn toggle_completed(&self, owner: Uuid, id: Uuid) -> Result<Task, TaskError> {
        let existing = self.get(owner, id).await?;

        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks SET completed = $1, updated_at = now()
            WHERE id = $2 AND created_by = $3
            RETURNING *
            "#,
        )
        .bind(!existing.completed)
        .bind(id)
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    pub async fn delete(&self, owner: Uuid, id: Uuid) -> Result<(), TaskError> {
        self.get(owner, id).await?;

        sqlx::query("DELETE FROM tasks WHERE id = $1 AND created_by = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

/// Trim the title and reject blank or over-long values.
fn validate_title(title: &str) -> Result<String, TaskError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TaskError::Validation("Please provide a task title".to_string()));
    }
    if trimmed.chars().count() > TITLE_MAX_CHARS {
        return Err(TaskError::Validation(format!(
            "Title cannot be more than {} characters",
            TITLE_MAX_CHARS
        )));
    }
    Ok(trimmed.to_string())
}

fn validate_description(description: Option<&str>) -> Result<(), TaskError> {
    if let Some(d) = description {
        if d.chars().count() > DESCRIPTION_MAX_CHARS {
            return Err(TaskError::Validation(format!(
                "Description cannot be more than {} characters",
                DESCRIPTION_MAX_CHARS
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_titles_are_rejected() {
        assert!(validate_title("").is_err());
        assert!(validate_title("   ").is_err());
        assert!(validate_title("\t\n").is_err());
    }

    #[test]
    fn titles_are_trimmed_and_length_checked() {
        assert_eq!(validate_title("  Buy milk  ").unwrap(), "Buy milk");
        assert!(validate_title(&"x".repeat(100)).is_ok());
        assert!(validate_title(&"x".repeat(101)).is_err());
    }

    #[test]
    fn description_length_is_bounded() {
        assert!(validate_description(None).is_ok());
        assert!(validate_description(Some(&"d".repeat(1000))).is_ok());
        assert!(validate_description(Some(&"d".repeat(1001))).is_err());
    }
}
