use clap::Subcommand;
use serde_json::Value;

use crate::cli::utils::{output_record, output_success, read_json_input};
use crate::cli::CliContext;
use crate::crud::Form;
use crate::database::models::ProfileForm;

#[derive(Subcommand)]
pub enum ProfileCommands {
    #[command(about = "Show the saved profile")]
    Show,

    #[command(about = "Save the profile from a JSON object (argument or stdin)")]
    Save {
        #[arg(help = "JSON object; read from stdin when omitted")]
        body: Option<String>,
        #[arg(long, help = "Merge into the saved profile instead of replacing it")]
        merge: bool,
    },
}

pub async fn handle(cmd: ProfileCommands, ctx: &CliContext) -> anyhow::Result<()> {
    let client = ctx.client()?;

    match cmd {
        ProfileCommands::Show => match client.profile().await? {
            Some(profile) => output_record(&ctx.output, &profile),
            None => output_success(&ctx.output, "No profile saved yet", None),
        },
        ProfileCommands::Save { body, merge } => {
            let input = read_json_input(body)?;
            let form: ProfileForm = if merge {
                let mut base = match client.profile().await? {
                    Some(profile) => serde_json::to_value(ProfileForm::from_profile(&profile))?,
                    None => Value::Object(Default::default()),
                };
                if let (Value::Object(base), Value::Object(changes)) = (&mut base, input) {
                    base.extend(changes);
                }
                serde_json::from_value(base)?
            } else {
                serde_json::from_value(input)?
            };
            form.validate()?;
            let saved = client.save_profile(&form).await?;
            output_success(&ctx.output, "Profile saved successfully", Some(serde_json::to_value(saved)?))
        }
    }
}
