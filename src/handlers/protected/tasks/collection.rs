use axum::{Extension, Json};

use crate::database::models::task::{CreateTask, Task};
use crate::error::ApiError;
use crate::middleware::response::{ApiListResponse, ApiResponse};
use crate::middleware::AuthUser;
use crate::services::task_service::TaskService;

/// GET /api/tasks - All tasks owned by the caller
pub async fn collection_get(
    Extension(user): Extension<AuthUser>,
) -> Result<ApiListResponse<Task>, ApiError> {
    let service = TaskService::new().await?;
    let tasks = service.list(user.user_id).await?;

    Ok(ApiListResponse::success(tasks))
}

/// POST /api/tasks - Create a task owned by the caller
pub async fn collection_post(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateTask>,
) -> Result<ApiResponse<Task>, ApiError> {
    let service = TaskService::new().await?;
    let task = service.create(user.user_id, payload).await?;

    Ok(ApiResponse::created(task))
}
