//! Rust IRC Services - Main binary

use rustserv_core::{Actor, Config, NoticeWriter};
use rustserv_services::{HelpRenderer, Service, ServiceManager, ServiceResult};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::io::AsyncBufReadExt;
use tracing::{error, info, warn};

/// Rust IRC Services - help and command dispatch for service pseudo-clients
#[derive(Parser)]
#[command(name = "rustserv")]
#[command(about = "Modular IRC services in Rust")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "services.toml")]
    config: PathBuf,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Nickname of the actor issuing commands
    #[arg(long, default_value = "guest")]
    nick: String,

    /// Account the actor is logged in to
    #[arg(long)]
    account: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a default configuration file
    Config {
        /// Output file path
        #[arg(short, long, default_value = "services.toml")]
        output: PathBuf,
    },
    /// Show help for a topic, or the topic list, of one service
    Help {
        /// Service nick, e.g. NickServ
        service: String,
        /// Topic, e.g. SET EMAIL
        topic: Vec<String>,
    },
    /// Validate the configuration and check that every help file exists
    Check,
    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(&cli.log_level)?;

    // Handle subcommands that need no configuration
    match &cli.command {
        Some(Commands::Config { output }) => {
            generate_config(output)?;
            return Ok(());
        }
        Some(Commands::Version) => {
            show_version();
            return Ok(());
        }
        _ => {}
    }

    // Load configuration
    let config = if cli.config.exists() {
        info!("Loading configuration from {:?}", cli.config);
        Config::from_file(&cli.config)?
    } else {
        info!("Configuration file not found, using defaults");
        Config::default()
    };
    config.validate()?;

    if let Some(Commands::Check) = cli.command {
        return check_help_files(&config);
    }

    let actor = match &cli.account {
        Some(account) => Actor::with_account(&cli.nick, account),
        None => Actor::new(&cli.nick),
    };
    let mut manager = ServiceManager::from_config(&config).await?;

    match cli.command {
        Some(Commands::Help { service, topic }) => {
            let line = format!("HELP {}", topic.join(" "));
            run_command(&mut manager, &actor, &service, &line).await
        }
        _ => interactive(&mut manager, &actor).await,
    }
}

/// Read `<service> <command> [params]` lines from stdin until EOF or `QUIT`
async fn interactive(manager: &mut ServiceManager, actor: &Actor) -> anyhow::Result<()> {
    info!("Services loaded: {}", manager.get_loaded_services().join(", "));

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (target, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        if target.eq_ignore_ascii_case("QUIT") {
            break;
        }

        if let Err(e) = run_command(manager, actor, target, rest).await {
            error!("Command to {} failed: {}", target, e);
        }
    }

    Ok(())
}

/// Dispatch one command and print the replies as notices on stdout
async fn run_command(
    manager: &mut ServiceManager,
    actor: &Actor,
    target: &str,
    line: &str,
) -> anyhow::Result<()> {
    let from = manager
        .get_service(target)
        .map(|s| s.name().to_string())
        .unwrap_or_else(|| target.to_string());
    let mut sink = NoticeWriter::new(std::io::stdout(), &from, &actor.nick);

    if let ServiceResult::Rejected(reason) = manager.dispatch(target, actor, line, &mut sink).await? {
        warn!("{}", reason);
    }

    Ok(())
}

/// Report help files that cannot be found
fn check_help_files(config: &Config) -> anyhow::Result<()> {
    let renderer = HelpRenderer::from_config(config);
    let mut missing = 0;

    for service in &config.services {
        for entry in &service.help {
            let path = renderer.resolve_path(&entry.file);
            if !path.is_file() {
                warn!("{} HELP {}: {} not found", service.nick, entry.topic, path.display());
                missing += 1;
            }
        }
    }

    if missing > 0 {
        anyhow::bail!("{} help files are missing", missing);
    }

    info!("Configuration is valid");
    Ok(())
}

/// Initialize logging
fn init_logging(level: &str) -> anyhow::Result<()> {
    let log_level = match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    };

    // stdout carries service output
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Generate default configuration file
fn generate_config(output: &PathBuf) -> anyhow::Result<()> {
    let config = Config::default();
    config.to_file(output)?;
    println!("Generated default configuration file: {:?}", output);
    Ok(())
}

/// Show version information
fn show_version() {
    println!("rustserv {}", env!("CARGO_PKG_VERSION"));
}
