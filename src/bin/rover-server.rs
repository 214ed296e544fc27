//! Rover guidance server binary.
//!
//! Configuration is layered: built-in defaults, then an optional TOML
//! file, then `ROVER_*` environment variables, then command-line flags.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use rover_protocol::utils::logging;
use rover_protocol::{transport, ServerConfig};

/// Guidance server for remote rovers.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Host name or address to bind [default: localhost]
    #[clap(short = 'H', long)]
    host: Option<String>,

    /// TCP port to listen on [default: 2022]
    #[clap(short, long)]
    port: Option<u16>,

    /// Number of rovers served concurrently [default: 12]
    #[clap(short, long)]
    max_clients: Option<usize>,

    /// Per-session motion command budget [default: 10000]
    #[clap(long)]
    command_limit: Option<u32>,

    /// Path to a TOML configuration file
    #[clap(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init("info");

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match ServerConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                error!(error = %e, path = %path.display(), "Cannot load configuration file");
                return ExitCode::from(3);
            }
        },
        None => ServerConfig::default(),
    };
    config.apply_env();

    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(max_clients) = args.max_clients {
        config.max_clients = max_clients;
    }
    if let Some(command_limit) = args.command_limit {
        config.command_limit = command_limit;
    }

    if let Err(e) = config.validate_strict() {
        error!(error = %e, "Invalid configuration");
        return ExitCode::from(3);
    }

    info!(
        addr = %config.listen_addr(),
        max_clients = config.max_clients,
        "Rover server starting"
    );

    if let Err(e) = transport::start_server(&config).await {
        error!(error = %e, "Server terminated");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
