use axum::{response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;

use crate::auth::{generate_jwt, Claims};
use crate::database::models::user::PublicUser;
use crate::error::ApiError;
use crate::services::user_service::UserService;

use super::utils;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// POST /api/auth/login - Authenticate credentials and receive a JWT token
pub async fn login(Json(payload): Json<LoginRequest>) -> Result<impl IntoResponse, ApiError> {
    utils::validate_login(&payload.email, &payload.password)?;

    let service = UserService::new().await?;
    let user = service.authenticate(payload.email.trim(), &payload.password).await?;

    let token = generate_jwt(Claims::new(user.id, user.username.clone()))?;

    Ok(Json(json!({
        "success": true,
        "token": token,
        "data": PublicUser::from(user),
    })))
}
