use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;

use crate::auth::{generate_jwt, Claims};
use crate::database::models::user::PublicUser;
use crate::error::ApiError;
use crate::services::user_service::UserService;

use super::utils;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// POST /api/auth/register - Create an account and receive a JWT token
pub async fn register(Json(payload): Json<RegisterRequest>) -> Result<impl IntoResponse, ApiError> {
    utils::validate_registration(&payload.username, &payload.email, &payload.password)?;

    let service = UserService::new().await?;
    let user = service
        .register(payload.username.trim(), payload.email.trim(), &payload.password)
        .await?;

    let token = generate_jwt(Claims::new(user.id, user.username.clone()))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "token": token,
            "data": PublicUser::from(user),
        })),
    ))
}
