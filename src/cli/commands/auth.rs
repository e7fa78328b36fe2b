use clap::Subcommand;
use serde_json::json;

use crate::cli::config::{load_session, save_session};
use crate::cli::utils::{output_record, output_success};
use crate::cli::CliContext;
use crate::client::{ClientError, Gate, SessionState};
use crate::database::models::Credentials;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Sign in and save the session token")]
    Login {
        #[arg(help = "Account email")]
        email: String,
        #[arg(long, env = "FOLIO_PASSWORD", hide_env_values = true, help = "Account password")]
        password: String,
    },

    #[command(about = "Create an account (when the server allows it) and sign in")]
    Signup {
        #[arg(help = "Account email")]
        email: String,
        #[arg(long, env = "FOLIO_PASSWORD", hide_env_values = true, help = "Account password")]
        password: String,
    },

    #[command(about = "Revoke the saved token and forget it")]
    Logout,

    #[command(about = "Exchange the saved token for a fresh one")]
    Refresh,

    #[command(about = "Show the signed-in account")]
    Whoami,
}

pub async fn handle(cmd: AuthCommands, ctx: &CliContext) -> anyhow::Result<()> {
    let session = SessionState::new(ctx.client()?);

    match cmd {
        AuthCommands::Login { email, password } => {
            let user = session.sign_in(&Credentials::new(email, password)).await?;
            remember(&session, &user.email)?;
            output_success(&ctx.output, &format!("Signed in as {}", user.email), Some(json!({ "user": user })))
        }
        AuthCommands::Signup { email, password } => {
            let user = session.sign_up(&Credentials::new(email, password)).await?;
            remember(&session, &user.email)?;
            output_success(&ctx.output, &format!("Account created for {}", user.email), Some(json!({ "user": user })))
        }
        AuthCommands::Logout => {
            let result = session.sign_out().await;
            let mut saved = load_session()?;
            saved.sign_out();
            save_session(&saved)?;
            match result {
                Ok(()) | Err(ClientError::SignedOut) => output_success(&ctx.output, "Signed out", None),
                Err(e) => {
                    tracing::warn!("Server-side sign-out failed: {}", e);
                    output_success(&ctx.output, "Signed out locally", None)
                }
            }
        }
        AuthCommands::Refresh => {
            let refreshed = session.refresh().await;
            let mut saved = load_session()?;
            saved.token = session.client().token();
            save_session(&saved)?;
            let user = refreshed?;
            output_success(&ctx.output, "Session refreshed", Some(json!({ "user": user })))
        }
        AuthCommands::Whoami => {
            session.initialize().await;
            match session.require_user() {
                Gate::Allowed(user) => output_record(&ctx.output, &user),
                Gate::Loading | Gate::Redirect(_) => Err(ClientError::SignedOut.into()),
            }
        }
    }
}

fn remember(session: &SessionState, email: &str) -> anyhow::Result<()> {
    let mut saved = load_session()?;
    saved.sign_in(session.client().token(), email);
    save_session(&saved)
}
