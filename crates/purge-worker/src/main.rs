//! fcgi-purge Worker Entrypoint
//!
//! Usage: purge-worker rpc
//!
//! Reads a single JSON RPC request from stdin, dispatches to the
//! appropriate handler, and writes a JSON response to stdout.
//! Configuration is read from `$PURGE_WORKER_CONFIG` when set.

use std::path::PathBuf;
use std::process::ExitCode;

use purge_worker::{RpcHandler, WorkerConfig};
use tracing_subscriber::EnvFilter;

const CONFIG_ENV: &str = "PURGE_WORKER_CONFIG";

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    if args.len() != 2 || args[1] != "rpc" {
        eprintln!("Usage: purge-worker rpc");
        eprintln!();
        eprintln!("Runs the RPC handler, reading JSON from stdin and writing to stdout.");
        eprintln!("Set {} to load a TOML configuration file.", CONFIG_ENV);
        return ExitCode::FAILURE;
    }

    init_tracing();

    let config = match std::env::var_os(CONFIG_ENV) {
        Some(path) => match WorkerConfig::from_file(&PathBuf::from(path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Configuration error: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => WorkerConfig::default(),
    };

    let handler = RpcHandler::new(config);
    if let Err(e) = handler.run() {
        eprintln!("RPC handler error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Log to stderr so stdout carries only the JSON response.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("purge_worker=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
