use clap::Subcommand;
use uuid::Uuid;

use crate::cli::utils::{output_notices, output_record, output_records, output_success};
use crate::cli::CliContext;
use crate::client::InboxScreen;

#[derive(Subcommand)]
pub enum MessageCommands {
    #[command(about = "List messages, newest first")]
    List {
        #[arg(long, help = "Only unread messages")]
        unread: bool,
    },

    #[command(about = "Show a message and mark it read")]
    Open {
        #[arg(help = "Message ID")]
        id: Uuid,
    },

    #[command(about = "Delete a message")]
    Delete {
        #[arg(help = "Message ID")]
        id: Uuid,
    },
}

pub async fn handle(cmd: MessageCommands, ctx: &CliContext) -> anyhow::Result<()> {
    let inbox = InboxScreen::new(ctx.client()?);
    inbox.load().await?;

    match cmd {
        MessageCommands::List { unread } => {
            let messages: Vec<_> = inbox.messages().into_iter().filter(|m| !unread || !m.read).collect();
            output_records(&ctx.output, "messages", &messages)
        }
        MessageCommands::Open { id } => {
            let opened = inbox.open(id).await;
            output_notices(&ctx.output, inbox.take_notices());
            match opened? {
                Some(message) => output_record(&ctx.output, &message),
                None => Err(anyhow::anyhow!("Message {} not found", id)),
            }
        }
        MessageCommands::Delete { id } => {
            let deleted = inbox.delete(id).await;
            output_notices(&ctx.output, inbox.take_notices());
            deleted?;
            output_success(
                &ctx.output,
                "Message deleted",
                Some(serde_json::json!({ "id": id, "unread": inbox.unread_count() })),
            )
        }
    }
}
