pub mod commands;
pub mod display;
pub mod output;

use std::time::Duration;

use clap::{Parser, Subcommand};

use repodeck::config::{self, types::RepodeckConfig};
use repodeck::core::registry::Registry;
use repodeck::core::store::JsonFileStore;
use repodeck::sync::{OperationRequest, OperationResponse, SyncClient};

#[derive(Parser)]
#[command(name = "repodeck", about = "Keep a deck of repositories and push between them.", version)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a repository to the registry
    Add(commands::add::AddArgs),
    /// List registered repositories
    List,
    /// Make a repository the protected master
    Master(commands::master::MasterArgs),
    /// Push one repository into another
    Push(commands::push::PushArgs),
    /// Copy a repository into the shared table used by the sync service
    Publish(commands::publish::PublishArgs),
    /// Ask the sync service for a repository's latest commit
    LastCommit(commands::last_commit::LastCommitArgs),
    /// Run the sync service
    Serve(commands::serve::ServeArgs),
    /// Show current configuration
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, clap::ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Dispatch a CLI command.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let cfg = config::load_config()?;

    match cli.command {
        Some(Commands::Add(args)) => commands::add::run(args, &cfg, cli.format),
        Some(Commands::List) => commands::list::run(&cfg, cli.format),
        Some(Commands::Master(args)) => commands::master::run(args, &cfg, cli.format),
        Some(Commands::Push(args)) => commands::push::run(args, &cfg, cli.format),
        Some(Commands::Publish(args)) => commands::publish::run(args, &cfg, cli.format),
        Some(Commands::LastCommit(args)) => commands::last_commit::run(args, &cfg, cli.format),
        Some(Commands::Serve(args)) => commands::serve::run(args, &cfg),
        Some(Commands::Config) => commands::config::run(&cfg, cli.format),
        None => {
            // No subcommand: print help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
    }
}

/// Open the local registry from the configured location.
pub fn open_registry(cfg: &RepodeckConfig) -> anyhow::Result<Registry<JsonFileStore>> {
    let store = JsonFileStore::new(&config::registry_dir(cfg));
    Ok(Registry::open(store)?)
}

/// Send one operation to the configured sync service and wait for the answer.
pub fn send_remote(
    cfg: &RepodeckConfig,
    request: &OperationRequest,
) -> anyhow::Result<OperationResponse> {
    let Some(endpoint) = cfg.remote.endpoint.as_deref() else {
        anyhow::bail!("no sync endpoint configured; set remote.endpoint in the config file");
    };
    let client = SyncClient::new(endpoint, Duration::from_secs(cfg.github.timeout_secs))?;
    let rt = tokio::runtime::Runtime::new()?;
    Ok(rt.block_on(client.send(request))?)
}
