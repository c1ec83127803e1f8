use axum::Extension;

use crate::database::models::user::PublicUser;
use crate::middleware::response::{ApiResponse, ApiResult, EmptyData};
use crate::middleware::AuthUser;
use crate::services::user_service::UserService;

/// GET /api/auth/me - Current authenticated user's profile
pub async fn me(Extension(user): Extension<AuthUser>) -> ApiResult<PublicUser> {
    let service = UserService::new().await?;
    let account = service.get(user.user_id).await?;

    Ok(ApiResponse::success(PublicUser::from(account)))
}

/// POST /api/auth/logout - Acknowledge logout
///
/// Tokens are stateless, so there is nothing to revoke server-side; the
/// client discards its copy.
pub async fn logout(Extension(user): Extension<AuthUser>) -> ApiResult<EmptyData> {
    tracing::info!(user = %user.username, "user logged out");
    Ok(ApiResponse::success(EmptyData))
}
