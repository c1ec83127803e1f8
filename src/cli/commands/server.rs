use clap::Subcommand;
use serde_json::json;

use crate::cli::config::{self, ServerConfig};
use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Select the API server to talk to")]
    Use {
        #[arg(help = "Server base URL, e.g. http://localhost:5000")]
        url: String,
    },

    #[command(about = "Show the selected server")]
    Show,

    #[command(about = "Check whether the server is reachable")]
    Ping,
}

pub async fn handle(cmd: ServerCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ServerCommands::Use { url } => {
            let parsed = url::Url::parse(&url)
                .map_err(|e| anyhow::anyhow!("invalid server URL '{}': {}", url, e))?;

            let normalized = parsed.as_str().trim_end_matches('/').to_string();
            config::save_server_config(&ServerConfig { url: normalized.clone() })?;

            output_success(
                &output_format,
                &format!("Using server {}", normalized),
                Some(json!({ "server": normalized })),
            )
        }
        ServerCommands::Show => {
            let server = config::load_server_config()?;
            output_success(
                &output_format,
                &format!("Server: {}", server.url),
                Some(json!({ "server": server.url })),
            )
        }
        ServerCommands::Ping => {
            let client = config::anonymous_client()?;
            match client.ping().await {
                Ok(true) => output_success(&output_format, "Server is up", None),
                Ok(false) => output_error(&output_format, "Server responded but is degraded"),
                Err(e) => output_error(&output_format, &format!("Server unreachable: {}", e)),
            }
        }
    }
}
