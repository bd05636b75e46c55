use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use warcraft_notifications::*;

#[derive(Parser)]
#[command(name = "warcraft-notify")]
#[command(about = "Route host lifecycle events to notification actions", version)]
struct Cli {
    /// Configuration file (skips project and user lookup)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Use a built-in preset instead of a configuration file
    #[arg(long, global = true, conflicts_with = "config")]
    preset: Option<String>,

    /// Worktree root
    #[arg(short, long, global = true, default_value = ".")]
    worktree: PathBuf,

    /// Project identifier exposed as {{project}}
    #[arg(short, long, global = true, default_value = "local")]
    project: String,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate the configuration
    Validate,
    /// List registered event kinds
    List {
        /// Output format (table or json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },
    /// Show what an event kind triggers
    Inspect {
        /// Event kind
        kind: String,

        /// Output format (table or json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },
    /// Read host events as NDJSON from stdin and dispatch them
    Run,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .context("Invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let loaded = load_config(&cli)?;
    info!(source = %loaded.source, "Using configuration");

    match cli.command {
        Commands::Validate => validate(loaded).await?,
        Commands::List { ref format } => {
            let command = NotifyCommand::List {
                format: Some(format.clone()),
            };
            inspect_registry(loaded, command).await?;
        }
        Commands::Inspect {
            ref kind,
            ref format,
        } => {
            let command = NotifyCommand::Inspect {
                kind: kind.clone(),
                format: Some(format.clone()),
            };
            inspect_registry(loaded, command).await?;
        }
        Commands::Run => {
            let ctx = PluginContext {
                project: Project {
                    id: cli.project.clone(),
                },
                worktree: cli.worktree.clone(),
            };
            run(ctx, loaded.config).await?;
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<LoadedConfig> {
    if let Some(path) = &cli.config {
        return Ok(ConfigLoader::load_explicit(path)?);
    }

    if let Some(name) = &cli.preset {
        return Ok(LoadedConfig {
            config: PresetManager::get_preset(name)?,
            source: ConfigSource::BuiltIn,
        });
    }

    Ok(ConfigLoader::load(&cli.worktree)?)
}

async fn validate(loaded: LoadedConfig) -> anyhow::Result<()> {
    let dispatcher = Dispatcher::initialize(loaded.config, ActionCatalog::new())?;

    println!(
        "Configuration valid: {} event kinds ({})",
        dispatcher.registry().len(),
        loaded.source
    );

    dispatcher.shutdown().await;
    Ok(())
}

async fn inspect_registry(loaded: LoadedConfig, command: NotifyCommand) -> anyhow::Result<()> {
    let dispatcher = Dispatcher::initialize(loaded.config, ActionCatalog::new())?;

    let output = NotifyCli::new(dispatcher.registry()).execute(command)?;
    println!("{}", output);

    dispatcher.shutdown().await;
    Ok(())
}

async fn run(ctx: PluginContext, config: NotificationConfig) -> anyhow::Result<()> {
    let hooks = NotificationsPlugin::load_with(ctx, config, ActionCatalog::new())?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("Failed to read host events")?,
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                None
            }
        };

        let Some(line) = line else { break };
        if line.trim().is_empty() {
            continue;
        }

        match hooks.event_json(&line).await {
            Ok(result) => println!("{}", serde_json::to_string(&result)?),
            Err(e) => warn!(error = %e, "Skipping malformed host message"),
        }
    }

    let report = hooks.shutdown().await;
    if report.timed_out {
        warn!(cancelled = report.cancelled, "Shutdown cancelled in-flight actions");
    }

    Ok(())
}
