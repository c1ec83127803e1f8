use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::task::{CreateTask, Task, TaskStatus, UpdateTask};
use crate::database::models::user::PublicUser;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("unexpected response shape: {0}")]
    Shape(String),
}

/// Token plus the user it was issued for, as returned by register/login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: PublicUser,
}

/// Typed HTTP client over the task store's REST surface. Each call attaches
/// the bearer token (when present) and unwraps the `{success, data}`
/// envelope into the concrete type.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self.http.request(method, format!("{}{}", self.base_url, path));
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn execute<T: DeserializeOwned>(&self, builder: reqwest::RequestBuilder) -> Result<T, ClientError> {
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body: Value = response.json().await?;
        envelope_data(status, body)
    }

    async fn execute_auth(&self, builder: reqwest::RequestBuilder) -> Result<AuthSession, ClientError> {
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body: Value = response.json().await?;
        auth_session(status, body)
    }

    pub async fn ping(&self) -> Result<bool, ClientError> {
        let response = self.request(Method::GET, "/health").send().await?;
        Ok(response.status().is_success())
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<AuthSession, ClientError> {
        let body = serde_json::json!({
            "username": username,
            "email": email,
            "password": password,
        });
        self.execute_auth(self.request(Method::POST, "/api/auth/register").json(&body)).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, ClientError> {
        let body = serde_json::json!({ "email": email, "password": password });
        self.execute_auth(self.request(Method::POST, "/api/auth/login").json(&body)).await
    }

    pub async fn me(&self) -> Result<PublicUser, ClientError> {
        self.execute(self.request(Method::GET, "/api/auth/me")).await
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        let _: Value = self.execute(self.request(Method::POST, "/api/auth/logout")).await?;
        Ok(())
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>, ClientError> {
        self.execute(self.request(Method::GET, "/api/tasks")).await
    }

    pub async fn get_task(&self, id: Uuid) -> Result<Task, ClientError> {
        self.execute(self.request(Method::GET, &format!("/api/tasks/{}", id))).await
    }

    pub async fn create_task(&self, task: &CreateTask) -> Result<Task, ClientError> {
        self.execute(self.request(Method::POST, "/api/tasks").json(task)).await
    }

    pub async fn update_task(&self, id: Uuid, changes: &UpdateTask) -> Result<Task, ClientError> {
        self.execute(self.request(Method::PUT, &format!("/api/tasks/{}", id)).json(changes)).await
    }

    pub async fn update_status(&self, id: Uuid, status: TaskStatus) -> Result<Task, ClientError> {
        let body = serde_json::json!({ "status": status });
        self.execute(
            self.request(Method::PATCH, &format!("/api/tasks/{}/status", id)).json(&body),
        )
        .await
    }

    pub async fn toggle_completed(&self, id: Uuid) -> Result<Task, ClientError> {
        self.execute(self.request(Method::PATCH, &format!("/api/tasks/{}/completed", id))).await
    }

    pub async fn delete_task(&self, id: Uuid) -> Result<(), ClientError> {
        let _: Value = self
            .execute(self.request(Method::DELETE, &format!("/api/tasks/{}", id)))
            .await?;
        Ok(())
    }
}

/// Unwrap `{success: true, data}` into T, or surface the server's message.
fn envelope_data<T: DeserializeOwned>(status: u16, mut body: Value) -> Result<T, ClientError> {
    if body.get("success").and_then(Value::as_bool) == Some(true) {
        let data = body.get_mut("data").map(Value::take).unwrap_or(Value::Null);
        serde_json::from_value(data).map_err(|e| ClientError::Shape(e.to_string()))
    } else {
        Err(ClientError::Api {
            status,
            message: envelope_message(&body),
        })
    }
}

fn auth_session(status: u16, mut body: Value) -> Result<AuthSession, ClientError> {
    if body.get("success").and_then(Value::as_bool) == Some(true) {
        let token = body
            .get("token")
            .and_then(Value::as_str)
            .ok_or_else(|| ClientError::Shape("missing token".to_string()))?
            .to_string();
        let data = body.get_mut("data").map(Value::take).unwrap_or(Value::Null);
        let user = serde_json::from_value(data).map_err(|e| ClientError::Shape(e.to_string()))?;
        Ok(AuthSession { token, user })
    } else {
        Err(ClientError::Api {
            status,
            message: envelope_message(&body),
        })
    }
}

fn envelope_message(body: &Value) -> String {
    if let Some(message) = body.get("message").and_then(Value::as_str) {
        return message.to_string();
    }
    // Field-level validation list: report the first entry
    if let Some(first) = body
        .get("errors")
        .and_then(Value::as_array)
        .and_then(|errors| errors.first())
    {
        if let Some(message) = first.get("message").and_then(Value::as_str) {
            return message.to_string();
        }
    }
    "request failed".to_string()
}
