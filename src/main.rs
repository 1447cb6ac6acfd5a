//! fcgi-purge CLI
//!
//! Entry point for the `fcgi-purge` command-line tool.

use clap::{Parser, Subcommand};
use fcgi_purge::{
    invalidation_of, logging, ConfigSource, ExitKind, KeyDeriver, LocalClient, PurgeConfig,
    RpcHandler, RpcResponse,
};
use purge_protocol::ops::names;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "fcgi-purge")]
#[command(about = "Invalidate FastCGI page cache entries and object caches", version)]
struct Cli {
    /// Path to config file (default: $FCGI_PURGE_CONFIG or /etc/fcgi-purge/config.toml)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Override the cache root directory
    #[arg(long, global = true)]
    cache_root: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clear the cached page for one URL
    ClearUrl {
        /// Absolute URL, e.g. https://example.com/blog/
        url: String,
    },

    /// Remove every entry under the cache root
    ClearAll,

    /// Flush the object cache
    ClearObject,

    /// Show the cache key and file path for a URL without touching the disk
    Key {
        url: String,
    },

    /// Mint an anti-forgery token for an operation
    Token {
        /// Operation name (clear_one, clear_all, clear_object)
        op: String,

        /// Principal to mint for (default: configured principal)
        #[arg(long, short = 'p')]
        principal: Option<String>,
    },

    /// Serve one JSON RPC request from stdin
    Rpc,
}

fn main() {
    let cli = Cli::parse();

    let (config, source) = match load_config(cli.config.clone(), cli.cache_root.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = logging::init(&config.log) {
        eprintln!("Error initializing logging: {}", e);
        process::exit(1);
    }

    match &source {
        ConfigSource::File(path) => tracing::debug!(path = %path.display(), "loaded config"),
        ConfigSource::Builtin => tracing::debug!("using built-in config"),
    }

    match cli.command {
        Commands::ClearUrl { url } => {
            let client = LocalClient::new(&config);
            report(client.clear_url(&url), cli.json);
        }
        Commands::ClearAll => {
            let client = LocalClient::new(&config);
            report(client.clear_all(), cli.json);
        }
        Commands::ClearObject => {
            let client = LocalClient::new(&config);
            report(client.clear_object(), cli.json);
        }
        Commands::Key { url } => run_key(&config, &url, cli.json),
        Commands::Token { op, principal } => run_token(&config, &op, principal),
        Commands::Rpc => run_rpc(&config),
    }
}

fn load_config(
    path: Option<PathBuf>,
    cache_root: Option<PathBuf>,
) -> Result<(PurgeConfig, ConfigSource), String> {
    let (config, source) = PurgeConfig::load(path.as_deref()).map_err(|e| e.to_string())?;
    let config = config.with_overrides(cache_root).map_err(|e| e.to_string())?;
    Ok((config, source))
}

fn report(response: RpcResponse, json_output: bool) {
    let exit = ExitKind::from_response(&response);

    if json_output {
        match serde_json::to_string_pretty(&response) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else if let Some(inv) = invalidation_of(&response) {
        println!("{}", inv.message);
        if let Some(path) = inv.path {
            println!("  Path: {}", path);
        }
        if let Some(summary) = inv.summary {
            println!(
                "  Removed: {} files, {} directories",
                summary.files_removed, summary.dirs_removed
            );
            if summary.failures > 0 {
                println!("  Failures: {}", summary.failures);
            }
        }
    } else if let Some(err) = response.error {
        eprintln!("{}", err);
    }

    process::exit(exit.code());
}

fn run_key(config: &PurgeConfig, url: &str, json_output: bool) {
    let deriver = KeyDeriver::new(&config.worker.cache_root);
    let key = match deriver.key_for(url) {
        Ok(k) => k,
        Err(e) => {
            eprintln!("Invalid URL entered: {}", e);
            process::exit(ExitKind::InvalidInput.code());
        }
    };
    let path = key.shard_path(deriver.cache_root());

    if json_output {
        let output = serde_json::json!({
            "url": url,
            "key": key.as_str(),
            "path": path.display().to_string(),
        });
        println!("{}", output);
    } else {
        println!("Key:  {}", key);
        println!("Path: {}", path.display());
    }
}

fn run_token(config: &PurgeConfig, op: &str, principal: Option<String>) {
    if !names::ALL.contains(&op) {
        eprintln!("Unknown operation '{}'. Expected one of: {}", op, names::ALL.join(", "));
        process::exit(1);
    }
    if config.worker.access.secret.is_empty() {
        eprintln!("No access secret configured; tokens would be rejected.");
        process::exit(1);
    }

    let principal = principal.unwrap_or_else(|| config.principal.clone());
    println!("{}", config.worker.access.issue_token(op, &principal));
}

fn run_rpc(config: &PurgeConfig) {
    let handler = RpcHandler::new(config.worker.clone());
    if let Err(e) = handler.run() {
        eprintln!("RPC handler error: {}", e);
        process::exit(1);
    }
}
