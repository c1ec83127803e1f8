use axum::{extract::Path, Extension, Json};
use serde_json::Value;
use uuid::Uuid;

use crate::database::models::task::{Task, TaskStatus, UpdateTask};
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult, EmptyData};
use crate::middleware::AuthUser;
use crate::services::task_service::TaskService;

/// An unparseable id can't name an owned task, so it gets the same 404 as
/// an unknown one.
fn parse_task_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw)
        .map_err(|_| ApiError::not_found(format!("Task not found with id {} or not authorized", raw)))
}

/// GET /api/tasks/:id
pub async fn record_get(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Task> {
    let id = parse_task_id(&id)?;
    let service = TaskService::new().await?;
    let task = service.get(user.user_id, id).await?;

    Ok(ApiResponse::success(task))
}

/// PUT /api/tasks/:id - Update any subset of the mutable fields
pub async fn record_put(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(changes): Json<UpdateTask>,
) -> ApiResult<Task> {
    let id = parse_task_id(&id)?;
    let service = TaskService::new().await?;
    let task = service.update(user.user_id, id, changes).await?;

    Ok(ApiResponse::success(task))
}

/// DELETE /api/tasks/:id - Hard delete
pub async fn record_delete(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<EmptyData> {
    let id = parse_task_id(&id)?;
    let service = TaskService::new().await?;
    service.delete(user.user_id, id).await?;

    Ok(ApiResponse::success(EmptyData))
}

/// PATCH /api/tasks/:id/status - Move a task to another board column
pub async fn status_patch(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<Task> {
    let id = parse_task_id(&id)?;

    let status = body
        .get("status")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<TaskStatus>().ok())
        .ok_or_else(|| ApiError::bad_request("Please provide a valid status"))?;

    let service = TaskService::new().await?;
    let task = service.update_status(user.user_id, id, status).await?;

    Ok(ApiResponse::success(task))
}

/// PATCH /api/tasks/:id/completed - Flip the completion flag
pub async fn completed_patch(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Task> {
    let id = parse_task_id(&id)?;
    let service = TaskService::new().await?;
    let task = service.toggle_completed(user.user_id, id).await?;

    Ok(ApiResponse::success(task))
}
