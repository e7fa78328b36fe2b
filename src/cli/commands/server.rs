use chrono::Utc;
use clap::Subcommand;
use serde_json::json;

use crate::cli::config::{load_session, save_session};
use crate::cli::utils::{output_error, output_success};
use crate::cli::{CliContext, OutputFormat};
use crate::client::FolioClient;

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Select the server used by later commands")]
    Use {
        #[arg(help = "Server URL, e.g. http://localhost:3000")]
        url: String,
    },

    #[command(about = "Show the selected server and signed-in account")]
    Current,

    #[command(about = "Check server health via /health")]
    Ping,
}

pub async fn handle(cmd: ServerCommands, ctx: &CliContext) -> anyhow::Result<()> {
    match cmd {
        ServerCommands::Use { url } => {
            url::Url::parse(&url).map_err(|e| anyhow::anyhow!("Invalid server URL '{}': {}", url, e))?;
            let mut session = load_session()?;
            session.use_server(&url);
            save_session(&session)?;
            output_success(
                &ctx.output,
                &format!("Using server {}", session.server_url()),
                Some(json!({ "server_url": session.server_url() })),
            )
        }
        ServerCommands::Current => {
            let session = load_session()?;
            let url = ctx.server.as_deref().unwrap_or(session.server_url());
            match ctx.output {
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "server_url": url,
                        "email": session.email,
                        "signed_in_at": session.signed_in_at,
                        "last_ping": session.last_ping,
                    }))?
                ),
                OutputFormat::Text => {
                    println!("Server: {}", url);
                    match &session.email {
                        Some(email) => println!("Signed in as: {}", email),
                        None => println!("Not signed in"),
                    }
                }
            }
            Ok(())
        }
        ServerCommands::Ping => {
            let client: FolioClient = ctx.client()?;
            match client.health().await {
                Ok(health) => {
                    let mut session = load_session()?;
                    session.last_ping = Some(Utc::now());
                    save_session(&session)?;
                    output_success(&ctx.output, &format!("{} is up", client.base_url()), Some(health))
                }
                Err(e) => {
                    output_error(&ctx.output, &format!("{} is down: {}", client.base_url(), e), Some("SERVER_DOWN"))?;
                    Err(anyhow::anyhow!("health check failed"))
                }
            }
        }
    }
}
