use anyhow::Context;
use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::{CliContext, OutputFormat};
use crate::database::fixture::Fixture;

#[derive(Subcommand)]
pub enum FixtureCommands {
    #[command(about = "Write a starter fixture with two professors, two students and one lab")]
    Init {
        #[arg(long, help = "Overwrite an existing fixture file")]
        force: bool,
    },

    #[command(about = "Validate the fixture and print its contents")]
    Show,
}

pub async fn handle(
    cmd: FixtureCommands,
    context: &CliContext,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let path = &context.fixture_path;

    match cmd {
        FixtureCommands::Init { force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "fixture {} already exists; pass --force to overwrite",
                    path.display()
                );
            }
            Fixture::sample().write(path)?;
            output_success(
                &output_format,
                &format!("Initialized fixture {}", path.display()),
                Some(json!({ "path": path.display().to_string() })),
            )
        }
        FixtureCommands::Show => {
            let fixture = Fixture::read(path)
                .with_context(|| format!("failed to load fixture {}", path.display()))?;
            match output_format {
                OutputFormat::Json => {
                    let response = json!({
                        "success": true,
                        "fixture": fixture
                    });
                    println!("{}", serde_json::to_string_pretty(&response)?);
                }
                OutputFormat::Text => {
                    println!("Fixture: {}", path.display());
                    println!("  users:         {}", fixture.users.len());
                    println!("  labs:          {}", fixture.labs.len());
                    println!("  subscriptions: {}", fixture.subscriptions.len());
                }
            }
            Ok(())
        }
    }
}
