use clap::Parser;
use dotenvy::dotenv;
use relquery::{config, server};

/// Relquery - schema-driven SQL query builder and execution service
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// HTTP server host address
    #[arg(long, default_value = "0.0.0.0")]
    http_host: String,

    /// HTTP server port
    #[arg(long, default_value_t = 3010)]
    http_port: u16,

    /// Path to the JSON schema document (overrides SCHEMA_PATH)
    #[arg(long)]
    schema_path: Option<String>,

    /// Path of the JSON-lines audit log (overrides AUDIT_LOG_PATH)
    #[arg(long)]
    audit_log: Option<String>,
}

impl From<Cli> for config::CliConfig {
    fn from(cli: Cli) -> Self {
        config::CliConfig {
            http_host: cli.http_host,
            http_port: cli.http_port,
            schema_path: cli.schema_path,
            audit_log_path: cli.audit_log,
        }
    }
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    // Defaults to INFO level, can be overridden with RUST_LOG env var
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    println!("\nRelquery v{}\n", env!("CARGO_PKG_VERSION"));

    let cli_config: config::CliConfig = cli.into();
    let config = match config::ServerConfig::from_cli(cli_config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    server::run_with_config(config).await;
}
