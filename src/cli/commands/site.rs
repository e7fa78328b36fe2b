use clap::Args;

use crate::cli::utils::{output_record, output_success};
use crate::cli::CliContext;
use crate::database::models::ContactForm;

#[derive(Args)]
pub struct ContactArgs {
    #[arg(long, help = "Sender name")]
    pub name: String,
    #[arg(long, help = "Sender email")]
    pub email: String,
    #[arg(long, help = "Subject (defaults on the server when omitted)")]
    pub subject: Option<String>,
    #[arg(help = "Message text")]
    pub message: String,
}

pub async fn show(ctx: &CliContext) -> anyhow::Result<()> {
    let content = ctx.client()?.site().await?;
    output_record(&ctx.output, &content)
}

pub async fn contact(args: ContactArgs, ctx: &CliContext) -> anyhow::Result<()> {
    let form = ContactForm {
        name: args.name,
        email: args.email,
        subject: args.subject,
        message: args.message,
    };
    let sent = ctx.client()?.contact(&form).await?;
    output_success(
        &ctx.output,
        "Message sent successfully",
        Some(serde_json::json!({ "message_id": sent.id, "subject": sent.subject })),
    )
}
