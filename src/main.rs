use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pve_storages::config::{
    ProviderConfig, ENV_ENDPOINT, ENV_SKIP_VERIFY, ENV_TOKEN_ID, ENV_TOKEN_SECRET,
};
use pve_storages::error::PveError;
use pve_storages::output::{self, DocumentFormat, OutputFormat};
use pve_storages::provider::{Provider, StoragesDataSource};
use pve_storages::pve::http::format_pve_error;
use pve_storages::VERSION;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the log filter, in `EnvFilter` syntax
const ENV_LOG: &str = "PVE_STORAGES_LOG";

/// Read-only Proxmox VE storage data source
#[derive(Parser, Debug)]
#[command(name = "pve-storages", version = VERSION, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Config file (defaults to <config dir>/pve-storages/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    /// Log file (defaults to <state dir>/pve-storages/pve-storages.log)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct ConnectionArgs {
    /// Proxmox API endpoint URL (e.g., https://proxmox.example.com:8006)
    #[arg(long, env = ENV_ENDPOINT, global = true)]
    endpoint: Option<String>,

    /// Proxmox API token ID (e.g., root@pam!mytesttoken)
    #[arg(long, env = ENV_TOKEN_ID, global = true)]
    token_id: Option<String>,

    /// Proxmox API token secret
    #[arg(long, env = ENV_TOKEN_SECRET, hide_env_values = true, global = true)]
    token_secret: Option<String>,

    /// Skip TLS certificate verification (`--skip-verify` alone means true)
    #[arg(
        long,
        env = ENV_SKIP_VERIFY,
        global = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    skip_verify: Option<bool>,
}

impl ConnectionArgs {
    fn into_config(self) -> ProviderConfig {
        ProviderConfig {
            endpoint: self.endpoint,
            token_id: self.token_id,
            token_secret: self.token_secret,
            skip_verify: self.skip_verify,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List storages configured on the cluster
    Storages {
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },
    /// Validate the provider configuration without contacting the API
    Validate,
    /// Print provider metadata and schemas
    Schema {
        #[arg(short, long, value_enum, default_value = "json")]
        output: DocumentFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_str(self) -> Option<&'static str> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some("error"),
            LogLevel::Warn => Some("warn"),
            LogLevel::Info => Some("info"),
            LogLevel::Debug => Some("debug"),
            LogLevel::Trace => Some("trace"),
        }
    }

    /// Filter directive: the chosen level for this crate, errors only for
    /// dependencies such as reqwest and hyper
    fn directive(self) -> Option<String> {
        self.as_str().map(|level| format!("error,pve_storages={level}"))
    }
}

/// Log to a file when `--log-level` or `PVE_STORAGES_LOG` asks for it
///
/// Stdout carries command output, so logs never go to the terminal.
fn setup_logging(
    level: LogLevel,
    log_file: Option<PathBuf>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let filter = match std::env::var(ENV_LOG) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(&directives)
            .with_context(|| format!("Invalid {} filter '{}'", ENV_LOG, directives))?,
        _ => match level.directive() {
            Some(directive) => EnvFilter::new(directive),
            None => return Ok(None),
        },
    };

    let log_path = log_file.unwrap_or_else(default_log_path);
    if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .init();

    tracing::info!("pve-storages {} logging to {}", VERSION, log_path.display());

    Ok(Some(guard))
}

fn default_log_path() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .unwrap_or_else(std::env::temp_dir)
        .join("pve-storages")
        .join("pve-storages.log")
}

/// Config file values, overridden by flags and environment
fn load_config(path: Option<PathBuf>, overrides: ProviderConfig) -> Result<ProviderConfig> {
    let file = match path {
        Some(path) => ProviderConfig::load(&path)?,
        None => ProviderConfig::load_default()?,
    };
    Ok(file.merge(overrides))
}

#[derive(Serialize)]
struct SchemaDocument {
    provider: pve_storages::provider::ProviderMetadata,
    provider_schema: pve_storages::provider::schema::Schema,
    data_sources: Vec<DataSourceSchema>,
}

#[derive(Serialize)]
struct DataSourceSchema {
    name: String,
    schema: pve_storages::provider::schema::Schema,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let _log_guard = match setup_logging(cli.log_level, cli.log_file.clone()) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("Error: {err:?}");
            return ExitCode::FAILURE;
        }
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<PveError>() {
                Some(pve_err) => eprintln!("Error: {}", format_pve_error(pve_err)),
                None => eprintln!("Error: {err:?}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let provider = Provider::new(VERSION);

    match cli.command {
        Command::Schema { output } => {
            let document = SchemaDocument {
                provider: provider.metadata(),
                provider_schema: provider.schema(),
                data_sources: vec![DataSourceSchema {
                    name: StoragesDataSource::type_name(),
                    schema: StoragesDataSource::schema(),
                }],
            };
            print!("{}", output::render_document(&document, output)?);
        }
        Command::Validate => {
            let config = load_config(cli.config, cli.connection.into_config())?;
            let client = provider.configure(&config)?;
            println!(
                "Configuration is valid: {} as {}{}",
                client.endpoint(),
                client.token_id(),
                if client.skips_verification() {
                    " (TLS verification disabled)"
                } else {
                    ""
                }
            );
        }
        Command::Storages { output } => {
            let config = load_config(cli.config, cli.connection.into_config())?;
            let client = provider.configure(&config)?;
            let state = StoragesDataSource::new(client).read().await?;
            print!("{}", output::render_storages(&state, output)?);
        }
    }

    Ok(())
}
