//! Travel Concierge - command line entry point
//!
//! `run` drives the agent sequence over a task document; the other commands
//! inspect configuration, manage saved preferences and render results.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use tracing::{error, info, warn, Level};
use travel_concierge::agent::travel_registry;
use travel_concierge::config::ConciergeConfig;
use travel_concierge::error::ConciergeResult;
use travel_concierge::observability::{init_default_logging, init_logging, LogFormat};
use travel_concierge::pipeline::{RetryPolicy, RunDriver};
use travel_concierge::report::render_summary;
use travel_concierge::store::{JsonFilePreferenceStore, PreferenceStore};

/// Sequential multi-agent trip planner
#[derive(Parser)]
#[command(name = "concierge")]
#[command(about = "Plan a trip by running a fixed sequence of agents")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", env = "CONCIERGE_CONFIG")]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every agent over the task document and write the result
    Run {
        /// Initial task document
        #[arg(long, value_name = "FILE")]
        task: Option<PathBuf>,
        /// Where the final state is written
        #[arg(long, value_name = "FILE")]
        result: Option<PathBuf>,
        /// Retries after the first failed attempt
        #[arg(long)]
        max_retries: Option<u32>,
    },
    /// Validate configuration
    Config {
        /// Show the resolved configuration
        #[arg(long)]
        show: bool,
    },
    /// Inspect or change saved travel preferences
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },
    /// Render a result document as text
    Report {
        #[arg(long, value_name = "FILE")]
        result: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum PrefsAction {
    /// Print saved preferences
    Show,
    /// Save preferences, filling unspecified ones from configured defaults
    Save {
        #[arg(long)]
        airline: Option<String>,
        #[arg(long)]
        food: Option<String>,
        #[arg(long)]
        budget: Option<String>,
    },
    /// Delete saved preferences
    Clear,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.verbose > 0 {
        let format = LogFormat::parse(&std::env::var("LOG_FORMAT").unwrap_or_default());
        init_logging(Level::DEBUG, format, cli.verbose > 1);
    } else {
        init_default_logging();
    }

    let config = match load_configuration(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Run {
            task,
            result,
            max_retries,
        } => run_orchestration(config, task, result, max_retries).await,
        Commands::Config { show } => handle_config_command(&config, show),
        Commands::Prefs { action } => handle_prefs_command(&config, action),
        Commands::Report { result } => handle_report_command(&config, result),
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn load_configuration(config_path: Option<&Path>) -> ConciergeResult<ConciergeConfig> {
    if let Some(path) = config_path {
        info!("Loading configuration from: {}", path.display());
        return Ok(ConciergeConfig::load_from_file(path)?);
    }

    for path_str in ["concierge.toml", "config/concierge.toml"] {
        let path = Path::new(path_str);
        if path.exists() {
            info!("Loading configuration from: {}", path.display());
            return Ok(ConciergeConfig::load_from_file(path)?);
        }
    }

    info!("No configuration file found, using built-in defaults");
    Ok(ConciergeConfig::default())
}

async fn run_orchestration(
    config: ConciergeConfig,
    task: Option<PathBuf>,
    result: Option<PathBuf>,
    max_retries: Option<u32>,
) -> ConciergeResult<()> {
    let task_path = task.unwrap_or_else(|| config.orchestrator.task_path.clone());
    let result_path = result.unwrap_or_else(|| config.orchestrator.result_path.clone());
    let policy = RetryPolicy::new(max_retries.unwrap_or(config.orchestrator.max_retries))
        .with_backoff(config.orchestrator.retry_backoff());

    let store: Arc<dyn PreferenceStore> =
        Arc::new(JsonFilePreferenceStore::new(config.preferences.store_path.clone()));
    let registry = travel_registry(&config, store)?;
    let driver = RunDriver::new(Arc::new(registry), policy);

    let (state, report) = driver.run(&task_path, &result_path).await?;

    if !report.failed.is_empty() {
        warn!(failed = ?report.failed, "Some agents exhausted their retries");
    }
    info!(
        run_id = %report.run_id,
        result = %result_path.display(),
        "Run finished"
    );

    println!("{}", serde_json::to_string_pretty(state.memory.as_map())?);
    Ok(())
}

fn handle_config_command(config: &ConciergeConfig, show: bool) -> ConciergeResult<()> {
    config.validate()?;
    info!("Configuration is valid");

    if show {
        println!("{}", toml::to_string_pretty(config)?);
    }
    Ok(())
}

fn handle_prefs_command(config: &ConciergeConfig, action: PrefsAction) -> ConciergeResult<()> {
    let store = JsonFilePreferenceStore::new(config.preferences.store_path.clone());

    match action {
        PrefsAction::Show => {
            let prefs = store.all()?;
            if prefs.is_empty() {
                println!("No saved preferences");
            }
            for (key, value) in prefs {
                println!("{key} = {value}");
            }
        }
        PrefsAction::Save {
            airline,
            food,
            budget,
        } => {
            let mut prefs = config.preferences.defaults.clone();
            for (key, value) in [
                ("preferred_airline", airline),
                ("preferred_food", food),
                ("budget_level", budget),
            ] {
                if let Some(value) = value {
                    prefs.insert(key.to_string(), value);
                }
            }
            for (key, value) in &prefs {
                store.set(key, value)?;
            }
            println!("Preferences saved to {}", store.path().display());
        }
        PrefsAction::Clear => {
            store.clear()?;
            println!("Preferences cleared");
        }
    }
    Ok(())
}

fn handle_report_command(config: &ConciergeConfig, result: Option<PathBuf>) -> ConciergeResult<()> {
    let path = result.unwrap_or_else(|| config.orchestrator.result_path.clone());
    if !path.exists() {
        println!("No run yet: {} does not exist", path.display());
        return Ok(());
    }

    let document = travel_concierge::persistence::read_document(&path)?;
    print!("{}", render_summary(&document));
    Ok(())
}
