use clap::{Subcommand, ValueEnum};
use serde_json::json;
use uuid::Uuid;

use crate::cli::utils::{output_notices, output_record, output_records, output_success, read_json_input};
use crate::cli::CliContext;
use crate::client::{CrudScreen, FolioClient};
use crate::crud::{to_row, Entity};
use crate::database::models::{Education, Experience, Skill};
use crate::database::Row;
use crate::filter::filter_order::FilterOrder;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DataTable {
    Experience,
    Education,
    Skills,
}

#[derive(Subcommand)]
pub enum DataCommands {
    #[command(about = "List records in display order")]
    List {
        #[arg(value_enum, help = "Table name")]
        table: DataTable,
        #[arg(long, help = "Re-sort locally, e.g. \"end_date desc, company\"")]
        order: Option<String>,
    },

    #[command(about = "Show one record")]
    Show {
        #[arg(value_enum, help = "Table name")]
        table: DataTable,
        #[arg(help = "Record ID")]
        id: Uuid,
    },

    #[command(about = "Create a record from a JSON object (argument or stdin)")]
    Create {
        #[arg(value_enum, help = "Table name")]
        table: DataTable,
        #[arg(help = "JSON object; read from stdin when omitted")]
        body: Option<String>,
    },

    #[command(about = "Change only the given fields of a record")]
    Update {
        #[arg(value_enum, help = "Table name")]
        table: DataTable,
        #[arg(help = "Record ID")]
        id: Uuid,
        #[arg(help = "JSON object; read from stdin when omitted")]
        body: Option<String>,
    },

    #[command(about = "Delete a record")]
    Delete {
        #[arg(value_enum, help = "Table name")]
        table: DataTable,
        #[arg(help = "Record ID")]
        id: Uuid,
    },
}

impl DataCommands {
    fn table(&self) -> DataTable {
        match self {
            DataCommands::List { table, .. }
            | DataCommands::Show { table, .. }
            | DataCommands::Create { table, .. }
            | DataCommands::Update { table, .. }
            | DataCommands::Delete { table, .. } => *table,
        }
    }
}

pub async fn handle(cmd: DataCommands, ctx: &CliContext) -> anyhow::Result<()> {
    let client = ctx.client()?;
    match cmd.table() {
        DataTable::Experience => run::<Experience>(cmd, client, ctx).await,
        DataTable::Education => run::<Education>(cmd, client, ctx).await,
        DataTable::Skills => run::<Skill>(cmd, client, ctx).await,
    }
}

async fn run<E: Entity>(cmd: DataCommands, client: FolioClient, ctx: &CliContext) -> anyhow::Result<()> {
    let screen = CrudScreen::<E>::new(client.clone());

    match cmd {
        DataCommands::List { order, .. } => {
            screen.load().await?;
            match order {
                None => output_records(&ctx.output, E::PATH, &screen.rows()),
                Some(order) => {
                    let infos = FilterOrder::parse_order_string(&order)?;
                    let mut rows: Vec<Row> = screen.rows().iter().map(to_row).collect();
                    rows.sort_by(|a, b| FilterOrder::compare(&infos, a, b));
                    output_records(&ctx.output, E::PATH, &rows)
                }
            }
        }
        DataCommands::Show { id, .. } => {
            let record = client.show::<E>(id).await?;
            output_record(&ctx.output, &record)
        }
        DataCommands::Create { body, .. } => {
            let draft: E::Draft = serde_json::from_value(read_json_input(body)?)?;
            let created = screen.create(draft).await;
            output_notices(&ctx.output, screen.take_notices());
            output_record(&ctx.output, &created?)
        }
        DataCommands::Update { id, body, .. } => {
            let patch: E::Patch = serde_json::from_value(read_json_input(body)?)?;
            let updated = screen.update(id, patch).await;
            output_notices(&ctx.output, screen.take_notices());
            output_record(&ctx.output, &updated?)
        }
        DataCommands::Delete { id, .. } => {
            let deleted = screen.delete(id).await;
            output_notices(&ctx.output, screen.take_notices());
            deleted?;
            output_success(
                &ctx.output,
                &format!("{} {} deleted", E::LABEL, id),
                Some(json!({ "id": id, "remaining": screen.rows().len() })),
            )
        }
    }
}
