use uuid::Uuid;

use crate::client::{ApiClient, ClientError};
use crate::database::models::task::{CreateTask, Task, TaskStatus, UpdateTask};

/// In-memory mirror of the authenticated user's tasks, presented as the
/// three fixed board columns.
///
/// The server is always the source of truth: the mirror is replaced
/// wholesale after login and after every mutation response, never merged
/// field-by-field. The one deliberate exception is delete, which drops the
/// task from the mirror even when the server call fails.
#[derive(Debug, Default)]
pub struct Board {
    tasks: Vec<Task>,
}

/// The three display groups, derived by filtering the mirror on status.
#[derive(Debug)]
pub struct Columns<'a> {
    pub todo: Vec<&'a Task>,
    pub in_progress: Vec<&'a Task>,
    pub completed: Vec<&'a Task>,
}

/// What a requested column move amounted to.
#[derive(Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Status PATCH issued and mirror refreshed
    Moved,
    /// Card dropped on the column it already lives in; no request fired
    SameColumn,
    /// Id not present in the mirror
    UnknownTask,
}

/// What happened to a delete request.
#[derive(Debug)]
pub enum RemoveOutcome {
    /// Server confirmed the delete
    Deleted,
    /// Server call failed; the task was still dropped from the local view
    /// and the next refresh reconciles
    DroppedLocally(ClientError),
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn columns(&self) -> Columns<'_> {
        Columns {
            todo: self.filter_status(TaskStatus::Todo),
            in_progress: self.filter_status(TaskStatus::InProgress),
            completed: self.filter_status(TaskStatus::Completed),
        }
    }

    fn filter_status(&self, status: TaskStatus) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.status == status).collect()
    }

    /// Replace the mirror with the server's current task list.
    pub async fn refresh(&mut self, client: &ApiClient) -> Result<(), ClientError> {
        self.tasks = client.list_tasks().await?;
        Ok(())
    }

    pub async fn add(&mut self, client: &ApiClient, input: CreateTask) -> Result<Task, ClientError> {
        let task = client.create_task(&input).await?;
        self.refresh(client).await?;
        Ok(task)
    }

    pub async fn edit(
        &mut self,
        client: &ApiClient,
        id: Uuid,
        changes: UpdateTask,
    ) -> Result<Task, ClientError> {
        let task = client.update_task(id, &changes).await?;
        self.refresh(client).await?;
        Ok(task)
    }

    /// Move a card to another column. Dropping on the current column is a
    /// no-op and does not issue a request.
    pub async fn move_task(
        &mut self,
        client: &ApiClient,
        id: Uuid,
        target: TaskStatus,
    ) -> Result<MoveOutcome, ClientError> {
        match self.plan_move(id, target) {
            MoveOutcome::Moved => {
                client.update_status(id, target).await?;
                self.refresh(client).await?;
                Ok(MoveOutcome::Moved)
            }
            outcome => Ok(outcome),
        }
    }

    fn plan_move(&self, id: Uuid, target: TaskStatus) -> MoveOutcome {
        match self.get(id) {
            None => MoveOutcome::UnknownTask,
            Some(task) if task.status == target => MoveOutcome::SameColumn,
            Some(_) => MoveOutcome::Moved,
        }
    }

    pub async fn toggle(&mut self, client: &ApiClient, id: Uuid) -> Result<Task, ClientError> {
        let task = client.toggle_completed(id).await?;
        self.refresh(client).await?;
        Ok(task)
    }

    /// Delete a task. The caller is expected to have confirmed with the
    /// user first. On server failure the task is still dropped locally so
    /// the view does not get stuck holding an undeletable card.
    pub async fn remove(&mut self, client: &ApiClient, id: Uuid) -> RemoveOutcome {
        match client.delete_task(id).await {
            Ok(()) => {
                // Ignore refresh failure here; the mirror no longer holds the task either way
                if self.refresh(client).await.is_err() {
                    self.drop_local(id);
                }
                RemoveOutcome::Deleted
            }
            Err(e) => {
                self.drop_local(id);
                RemoveOutcome::DroppedLocally(e)
            }
        }
    }

    fn drop_local(&mut self, id: Uuid) {
        self.tasks.retain(|t| t.id != id);
    }
}
