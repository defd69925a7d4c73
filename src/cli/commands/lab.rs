use std::sync::Arc;

use anyhow::Context;
use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_detail, output_labs, output_success};
use crate::cli::{CliContext, OutputFormat};
use crate::database::fixture::Fixture;
use crate::database::memory::MemoryStore;
use crate::database::models::{LabFields, LabSearch, UpdateLab};
use crate::services::LabService;
use crate::types::LabId;

#[derive(Subcommand)]
pub enum LabCommands {
    #[command(about = "List labs with their professors")]
    List {
        #[arg(long, help = "Case-insensitive name substring")]
        name: Option<String>,
        #[arg(long, help = "Exact category")]
        category: Option<String>,
        #[arg(long, help = "Maximum number of labs to return")]
        limit: Option<usize>,
        #[arg(long, help = "Number of matching labs to skip")]
        offset: Option<usize>,
    },

    #[command(about = "Create a lab owned by the caller (professors only)")]
    Create {
        #[arg(long, help = "Lab name")]
        name: String,
        #[arg(long, default_value = "", help = "Lab category")]
        category: String,
        #[arg(long, default_value = "", help = "Short introduction")]
        introduction: String,
    },

    #[command(about = "Update name, category and introduction (owning professor only)")]
    Update {
        #[arg(help = "Lab id")]
        id: LabId,
        #[arg(long, help = "Lab name")]
        name: String,
        #[arg(long, help = "Lab category (replaces the stored value)")]
        category: String,
        #[arg(long, help = "Short introduction (replaces the stored value)")]
        introduction: String,
    },

    #[command(about = "Show lab detail as seen by the caller")]
    Show {
        #[arg(help = "Lab id")]
        id: LabId,
    },

    #[command(about = "Join a lab, replacing the caller's current membership")]
    Join {
        #[arg(help = "Lab id")]
        id: LabId,
    },

    #[command(about = "List the caller's labs")]
    Mine,
}

pub async fn handle(
    cmd: LabCommands,
    context: &CliContext,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let store = open_store(context).await?;
    let service = LabService::from_store(store.clone());

    match cmd {
        LabCommands::List { name, category, limit, offset } => {
            let search = LabSearch { name, category, limit, offset };
            let labs = service.list_labs(search).await?;
            output_labs(&output_format, &labs)
        }
        LabCommands::Create { name, category, introduction } => {
            let caller = context.require_caller()?;
            let fields = LabFields { name: name.clone(), category, introduction };
            let ack = service.create_lab(fields, caller).await?;
            persist(&store, context).await?;
            output_success(
                &output_format,
                &format!("Created lab '{}'", name),
                Some(json!({ "ok": ack.ok })),
            )
        }
        LabCommands::Update { id, name, category, introduction } => {
            let caller = context.require_caller()?;
            let update = UpdateLab {
                id,
                fields: LabFields { name, category, introduction },
            };
            let ack = service.update_lab(update, caller).await?;
            persist(&store, context).await?;
            output_success(&output_format, &format!("Updated lab {}", id), Some(json!({ "ok": ack.ok })))
        }
        LabCommands::Show { id } => {
            let caller = context.require_caller()?;
            let detail = service.get_lab_detail(id, caller).await?;
            output_detail(&output_format, &detail)
        }
        LabCommands::Join { id } => {
            let caller = context.require_caller()?;
            let ack = service.join_lab(id, caller).await?;
            persist(&store, context).await?;
            output_success(
                &output_format,
                &format!("User {} joined lab {}", caller, id),
                Some(json!({ "ok": ack.ok })),
            )
        }
        LabCommands::Mine => {
            let caller = context.require_caller()?;
            let labs = service.get_my_lab(caller).await?;
            output_labs(&output_format, &labs)
        }
    }
}

async fn open_store(context: &CliContext) -> anyhow::Result<Arc<MemoryStore>> {
    let path = &context.fixture_path;
    let fixture = Fixture::read(path).with_context(|| {
        format!(
            "failed to load fixture {}; run `labctl fixture init` first",
            path.display()
        )
    })?;
    Ok(Arc::new(fixture.into_store().await?))
}

async fn persist(store: &MemoryStore, context: &CliContext) -> anyhow::Result<()> {
    Fixture::snapshot(store).await.write(&context.fixture_path)?;
    Ok(())
}
