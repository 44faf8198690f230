//! HeartWise console - interactive front end for the session gate.

mod app;
mod pages;
mod predictor;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use common::AppConfig;
use credential_store::{open_memory_store, open_sql_store, CredentialService, MigrateAction};
use session_gate::{Predictor, SessionGate};

use crate::app::ConsoleApp;
use crate::predictor::CommandPredictor;

#[derive(Parser)]
#[command(name = "heartwise")]
#[command(about = "HeartWise heart disease risk console")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Credential database URL (overrides DATABASE_URL)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session (default)
    Run {
        /// Keep credentials in memory only; nothing is written to disk
        #[arg(long)]
        ephemeral: bool,
    },
    /// Manage the credential database schema
    Migrate {
        #[command(subcommand)]
        action: MigrateCommand,
    },
}

#[derive(Subcommand, Clone, Copy)]
enum MigrateCommand {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

impl From<MigrateCommand> for MigrateAction {
    fn from(command: MigrateCommand) -> Self {
        match command {
            MigrateCommand::Up => MigrateAction::Up,
            MigrateCommand::Down => MigrateAction::Down,
            MigrateCommand::Status => MigrateAction::Status,
            MigrateCommand::Fresh => MigrateAction::Fresh,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    common::init_tracing(cli.verbose);

    let mut config = AppConfig::from_env();
    if let Some(url) = cli.database_url {
        config.store.database_url = url;
    }
    tracing::debug!(?config, "Configuration loaded");

    match cli.command.unwrap_or(Commands::Run { ephemeral: false }) {
        Commands::Run { ephemeral } => run_session(config, ephemeral).await,
        Commands::Migrate { action } => {
            credential_store::run_migrations(&config.store, action.into()).await?;
            Ok(())
        }
    }
}

async fn run_session(
    config: AppConfig,
    ephemeral: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let credentials: Arc<dyn CredentialService> = if ephemeral {
        info!("Using in-memory credential store");
        Arc::new(open_memory_store(&config.store))
    } else {
        Arc::new(open_sql_store(&config.store).await?)
    };

    let gate = SessionGate::new(credentials).with_throttle(config.throttle.clone());

    let predictor: Option<Box<dyn Predictor>> = config
        .inference
        .model_command
        .clone()
        .map(|command| Box::new(CommandPredictor::new(command)) as Box<dyn Predictor>);
    if predictor.is_none() {
        info!("MODEL_COMMAND not set; predictions are disabled");
    }

    ConsoleApp::new(gate, predictor, config.inference.metrics_report_path).run().await?;

    info!("Session ended");
    Ok(())
}
