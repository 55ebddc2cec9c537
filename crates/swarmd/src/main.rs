//! swarmd — the SwarmGrid daemon.
//!
//! Single binary that serves the swarm registry over HTTP, plus one-shot
//! admin subcommands that run the same CRUD entry points against the
//! local store and print the resulting envelope.
//!
//! # Usage
//!
//! ```text
//! swarmd serve --listen 0.0.0.0:8080
//! swarmd add prod 10.0.0.5
//! swarmd activate prod
//! swarmd list --check-state
//! ```
//!
//! Admin subcommands open the redb file directly, which redb locks; stop
//! the daemon (or point `--db` elsewhere) before using them.

mod admin;
mod serve;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use swarmgrid_core::SwarmgridConfig;
use swarmgrid_engine::EngineClient;
use swarmgrid_registry::SwarmRegistry;
use swarmgrid_state::RedbStore;

#[derive(Parser)]
#[command(name = "swarmd", about = "SwarmGrid swarm registry daemon")]
struct Cli {
    /// Path to swarmgrid.toml (defaults apply if it does not exist).
    #[arg(long, global = true, default_value = "/etc/swarmgrid/swarmgrid.toml")]
    config: PathBuf,

    /// Override the redb database file from the config.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value = "text")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the REST API.
    Serve {
        /// Address to listen on (overrides `[api] listen`).
        #[arg(long)]
        listen: Option<String>,
    },
    /// List registered swarms.
    List {
        /// Check each swarm's leader health.
        #[arg(long)]
        check_state: bool,
    },
    /// Show one swarm.
    Get { name: String },
    /// Show the active swarm.
    Active,
    /// Show the leader of the active swarm.
    Leader,
    /// Register the swarm that the node at ADDRESS belongs to.
    Add { name: String, address: String },
    /// Unregister a swarm.
    Remove { name: String },
    /// Make a swarm the active one.
    Activate { name: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let mut config = SwarmgridConfig::load(Some(cli.config.as_path()))?;
    if let Some(db) = cli.db {
        config.storage.path = db;
    }

    match cli.command {
        Command::Serve { listen } => {
            if let Some(listen) = listen {
                config.api.listen = listen;
            }
            let registry = open_registry(&config)?;
            serve::run(registry, &config.api.listen).await
        }
        command => {
            let registry = open_registry(&config)?;
            admin::run(&registry, command).await
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,swarmd=debug,swarmgrid=debug"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Wire the redb store and the engine client into a registry.
fn open_registry(config: &SwarmgridConfig) -> anyhow::Result<Arc<SwarmRegistry>> {
    let db_path = &config.storage.path;
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create data directory {}", parent.display()))?;
    }

    let store = RedbStore::open(db_path)?;
    info!(path = ?db_path, "state store opened");

    let engine = EngineClient::from_config(&config.engine)?;
    info!(
        port = config.engine.port,
        timeout_secs = config.engine.timeout_secs,
        tls = config.engine.tls,
        "engine client initialized"
    );

    let registry = SwarmRegistry::new(Arc::new(store), Arc::new(engine))
        .with_keys(config.storage.swarm_key.clone(), config.storage.active_key.clone());
    Ok(Arc::new(registry))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_admin_commands() {
        let cli = Cli::parse_from(["swarmd", "--db", "/tmp/s.redb", "add", "prod", "10.0.0.5"]);
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/s.redb")));
        match cli.command {
            Command::Add { name, address } => {
                assert_eq!(name, "prod");
                assert_eq!(address, "10.0.0.5");
            }
            _ => panic!("expected add"),
        }

        let cli = Cli::parse_from(["swarmd", "list", "--check-state"]);
        assert!(matches!(cli.command, Command::List { check_state: true }));
    }

    #[test]
    fn serve_listen_override() {
        let cli = Cli::parse_from(["swarmd", "serve", "--listen", "127.0.0.1:9000"]);
        match cli.command {
            Command::Serve { listen } => assert_eq!(listen.as_deref(), Some("127.0.0.1:9000")),
            _ => panic!("expected serve"),
        }
    }
}
