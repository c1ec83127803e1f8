use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        // Assumes debug profile; adjust if you run tests with --release
        let mut cmd = Command::new("target/debug/taskboard-api");
        cmd.env("TASKBOARD_PORT", port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit environment so the server can see DATABASE_URL and JWT_SECRET from .env (loaded by the server)
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline { break; }
            let url = format!("{}/health", self.base_url);
            match client.get(&url).send().await {
                Ok(resp) => {
                    // Consider server ready on any non-404 response
                    if resp.status() == StatusCode::OK || resp.status() == StatusCode::SERVICE_UNAVAILABLE {
                        return Ok(());
                    }
                }
                Err(_) => {}
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    // Use stable get_or_init and convert init errors into a panic with context.
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Database-backed tests are skipped when no database is configured, either
/// directly in the environment or via a .env the server would load.
#[allow(dead_code)]
pub fn database_configured() -> bool {
    std::env::var("DATABASE_URL").is_ok() || std::path::Path::new(".env").exists()
}

/// Register a throwaway user and return (token, user) for driving the
/// protected API. Emails are timestamp-unique so tests don't collide.
#[allow(dead_code)]
pub async fn register_user(base_url: &str) -> Result<(String, Value)> {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)?
        .as_nanos();

    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/api/auth/register", base_url))
        .json(&json!({
            "username": format!("user{}", nanos % 1_000_000_000),
            "email": format!("user{}@example.com", nanos),
            "password": "hunter42",
        }))
        .send()
        .await?;

    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "registration failed with status {}",
        res.status()
    );

    let body = res.json::<Value>().await?;
    let token = body["token"]
        .as_str()
        .context("registration response missing token")?
        .to_string();

    Ok((token, body["data"].clone()))
}

/// Create a task for the given token and return its JSON representation.
#[allow(dead_code)]
pub async fn create_task(base_url: &str, token: &str, body: Value) -> Result<Value> {
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/api/tasks", base_url))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await?;

    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "task creation failed with status {}",
        res.status()
    );

    let body = res.json::<Value>().await?;
    Ok(body["data"].clone())
}
