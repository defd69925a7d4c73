pub mod commands;
pub mod utils;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::config::config;
use crate::database::fixture::FixtureError;
use crate::error::LabError;
use crate::types::UserId;

#[derive(Parser)]
#[command(name = "labctl")]
#[command(about = "Lab CLI - run lab policy operations against a fixture-backed store")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, help = "Fixture file backing the store (defaults to LAB_FIXTURE or config)")]
    pub fixture: Option<PathBuf>,

    #[arg(long = "as", global = true, env = "LAB_CALLER", value_name = "USER_ID", help = "Id of the calling user")]
    pub caller: Option<UserId>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "List, create, update, show and join labs")]
    Lab {
        #[command(subcommand)]
        cmd: commands::lab::LabCommands,
    },

    #[command(about = "Create and inspect fixture files")]
    Fixture {
        #[command(subcommand)]
        cmd: commands::fixture::FixtureCommands,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
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

/// Values shared by every command
#[derive(Debug, Clone)]
pub struct CliContext {
    pub fixture_path: PathBuf,
    pub caller: Option<UserId>,
}

impl CliContext {
    pub fn require_caller(&self) -> anyhow::Result<UserId> {
        self.caller
            .context("this command needs a caller; pass --as <USER_ID> or set LAB_CALLER")
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let context = CliContext {
        fixture_path: cli
            .fixture
            .clone()
            .unwrap_or_else(|| config().storage.fixture_path.clone()),
        caller: cli.caller,
    };

    let result = match cli.command {
        Commands::Lab { cmd } => commands::lab::handle(cmd, &context, output_format).await,
        Commands::Fixture { cmd } => commands::fixture::handle(cmd, &context, output_format).await,
    };

    // Failures get a machine-readable body on stdout in JSON mode
    if let (Err(err), OutputFormat::Json) = (&result, output_format) {
        match err.downcast_ref::<LabError>() {
            Some(lab_err) => println!("{}", serde_json::to_string_pretty(&lab_err.to_json())?),
            None => utils::output_error(&output_format, &format!("{err:#}"), Some(error_code(err)))?,
        }
    }

    result
}

/// Code for failures raised outside the service layer
fn error_code(err: &anyhow::Error) -> &'static str {
    if err.downcast_ref::<FixtureError>().is_some() {
        "FIXTURE_ERROR"
    } else {
        "INVALID_INPUT"
    }
}
