pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::client::FolioClient;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Folio CLI - manage portfolio content and messages from the terminal")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, env = "FOLIO_SERVER", help = "Server URL (overrides the saved one)")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Saved server selection and health")]
    Server {
        #[command(subcommand)]
        cmd: commands::server::ServerCommands,
    },

    #[command(about = "Sign in, sign up and session management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Show the public site content")]
    Site,

    #[command(about = "Send a message through the public contact form")]
    Contact(commands::site::ContactArgs),

    #[command(about = "Experience, education and skills records")]
    Data {
        #[command(subcommand)]
        cmd: commands::data::DataCommands,
    },

    #[command(about = "Profile shown on the site")]
    Profile {
        #[command(subcommand)]
        cmd: commands::profile::ProfileCommands,
    },

    #[command(about = "Contact form inbox")]
    Messages {
        #[command(subcommand)]
        cmd: commands::messages::MessageCommands,
    },

    #[command(about = "Apply database migrations using DATABASE_URL")]
    Migrate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Per-invocation settings shared by every command handler.
pub struct CliContext {
    pub output: OutputFormat,
    pub server: Option<String>,
}

impl CliContext {
    /// Client for the selected server carrying the saved session token.
    pub fn client(&self) -> anyhow::Result<FolioClient> {
        let session = config::load_session()?;
        let url = self
            .server
            .clone()
            .unwrap_or_else(|| session.server_url().to_string());
        Ok(FolioClient::new(url)?.with_token(session.token))
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = CliContext {
        output: OutputFormat::from_cli(&cli),
        server: cli.server,
    };

    match cli.command {
        Commands::Server { cmd } => commands::server::handle(cmd, &ctx).await,
        Commands::Auth { cmd } => commands::auth::handle(cmd, &ctx).await,
        Commands::Site => commands::site::show(&ctx).await,
        Commands::Contact(args) => commands::site::contact(args, &ctx).await,
        Commands::Data { cmd } => commands::data::handle(cmd, &ctx).await,
        Commands::Profile { cmd } => commands::profile::handle(cmd, &ctx).await,
        Commands::Messages { cmd } => commands::messages::handle(cmd, &ctx).await,
        Commands::Migrate => commands::migrate::handle(&ctx).await,
    }
}
