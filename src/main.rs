mod alerts;
mod api;
mod backend;
mod client;
mod commands;
mod config;
mod domain;
mod logging;
mod server;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "aerowatch", version, about = "Alert engine and polling daemon for the AeroWaste drone fleet")]
struct Cli {
    /// Path to config file (default: ~/.config/aerowatch/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate alerts once, from a snapshot file or the live backend
    Evaluate {
        /// Snapshot file ({drones, bases, routes}) in JSON or YAML
        #[arg(long)]
        file: Option<PathBuf>,

        /// Backend URL (overrides config, ignored with --file)
        #[arg(long)]
        backend_url: Option<String>,

        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Run the aerowatch daemon (poll loop + REST + GraphQL)
    Daemon {
        /// HTTP listen address (overrides config)
        #[arg(long)]
        http_addr: Option<String>,

        /// Backend URL (overrides config)
        #[arg(long)]
        backend_url: Option<String>,

        /// Seconds between polls, 0 to disable (overrides config)
        #[arg(long)]
        poll_interval: Option<u64>,

        /// Log level (overrides config)
        #[arg(long)]
        log_level: Option<String>,
    },

    /// Query a running aerowatch daemon's REST API
    Query {
        /// Daemon URL (defaults to daemon.http_addr from config)
        #[arg(long, global = true)]
        url: Option<String>,

        /// Output format (table or json)
        #[arg(long, global = true, default_value = "table")]
        format: String,

        #[command(subcommand)]
        command: commands::query::QueryCommands,
    },

    /// List alert rules and active thresholds
    Rules,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Evaluate {
            file,
            backend_url,
            format,
        } => commands::evaluate::run(config, file.as_deref(), backend_url, &format),
        Commands::Daemon {
            http_addr,
            backend_url,
            poll_interval,
            log_level,
        } => commands::daemon::run(config, http_addr, backend_url, poll_interval, log_level),
        Commands::Query {
            url,
            format,
            command,
        } => commands::query::run(config, url.as_deref(), &format, &command),
        Commands::Rules => commands::rules::list(config),
    }
}
