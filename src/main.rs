use std::path::PathBuf;

use clap::Parser;
use tableref::{config, identifier::SqlDialect, server, table_map::LANGUAGE_OVERLAY_PREFIX};

/// tableref - table alias resolution service for SQL query builders
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// HTTP server host address
    #[arg(long, default_value = "0.0.0.0")]
    http_host: String,

    /// HTTP server port
    #[arg(long, default_value_t = 8080)]
    http_port: u16,

    /// Dialect assumed when a request names none
    #[arg(long, default_value_t = SqlDialect::PostgreSQL)]
    dialect: SqlDialect,

    /// Alias prefix of language overlay joins
    #[arg(long, default_value = LANGUAGE_OVERLAY_PREFIX)]
    overlay_prefix: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    request_timeout_secs: u64,

    /// Maximum request body size in bytes
    #[arg(long, default_value_t = 1024 * 1024)]
    max_body_bytes: usize,

    /// Load configuration from a YAML file (other flags except --daemon are ignored)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Read configuration from TABLEREF_* environment variables (and .env)
    #[arg(long, conflicts_with = "config")]
    from_env: bool,

    /// Run server in daemon mode (background process)
    #[arg(long)]
    daemon: bool,
}

impl From<Cli> for config::CliConfig {
    fn from(cli: Cli) -> Self {
        config::CliConfig {
            http_host: cli.http_host,
            http_port: cli.http_port,
            default_dialect: cli.dialect,
            overlay_prefix: cli.overlay_prefix,
            request_timeout_secs: cli.request_timeout_secs,
            max_body_bytes: cli.max_body_bytes,
            daemon: cli.daemon,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize logger - defaults to INFO level, can be overridden with RUST_LOG env var
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    println!("\ntableref v{}\n", env!("CARGO_PKG_VERSION"));

    let daemon = cli.daemon;
    let result = if let Some(path) = cli.config.clone() {
        config::ServerConfig::from_yaml_file(path)
    } else if cli.from_env {
        config::ServerConfig::from_env()
    } else {
        config::ServerConfig::from_cli(cli.into())
    };

    // --daemon still applies on top of a config file or the environment
    let result = result.map(|mut config| {
        config.daemon |= daemon;
        config
    });

    let config = match result {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    server::run_with_config(config).await;
}
