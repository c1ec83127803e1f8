use clap::Subcommand;
use serde_json::json;

use crate::cli::config::{self, SessionConfig};
use crate::cli::utils::{output_error, output_success, resolve_password};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Register a new account and log in")]
    Register {
        #[arg(help = "Username")]
        username: String,
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Login to the server")]
    Login {
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Logout and discard the saved session")]
    Logout,

    #[command(about = "Show current user information")]
    Whoami,

    #[command(about = "Show current authentication status")]
    Status,
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Register { username, email, password } => {
            let password = resolve_password(password)?;
            let client = config::anonymous_client()?;

            let session = client.register(&username, &email, &password).await?;
            config::save_session(&SessionConfig::new(
                session.token,
                session.user.username.clone(),
                session.user.email.clone(),
            ))?;

            output_success(
                &output_format,
                &format!("Registered and logged in as {}", session.user.username),
                Some(json!({ "user": session.user })),
            )
        }
        AuthCommands::Login { email, password } => {
            let password = resolve_password(password)?;
            let client = config::anonymous_client()?;

            let session = client.login(&email, &password).await?;
            config::save_session(&SessionConfig::new(
                session.token,
                session.user.username.clone(),
                session.user.email.clone(),
            ))?;

            output_success(
                &output_format,
                &format!("Logged in as {}", session.user.username),
                Some(json!({ "user": session.user })),
            )
        }
        AuthCommands::Logout => {
            // Best-effort server acknowledgement; the session file is the
            // thing that actually ends the session
            if let Ok(client) = config::authenticated_client() {
                let _ = client.logout().await;
            }
            config::clear_session()?;

            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Whoami => {
            let client = config::authenticated_client()?;
            let user = client.me().await?;

            output_success(
                &output_format,
                &format!("{} <{}>", user.username, user.email),
                Some(json!({ "user": user })),
            )
        }
        AuthCommands::Status => match config::load_session()? {
            Some(session) => {
                let server = config::load_server_config()?;
                output_success(
                    &output_format,
                    &format!(
                        "Logged in as {} <{}> against {} (since {})",
                        session.username, session.email, server.url, session.logged_in_at
                    ),
                    Some(json!({
                        "username": session.username,
                        "email": session.email,
                        "server": server.url,
                        "logged_in_at": session.logged_in_at,
                    })),
                )
            }
            None => output_error(&output_format, "Not logged in"),
        },
    }
}
