mod cli;
mod core;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::core::config::AppConfig;

#[derive(Parser)]
#[command(
    name = "cloudopt",
    about = "Cloud cost optimization reports from CloudHealth",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Output format (text|json)
    #[arg(short, long, global = true)]
    format: Option<String>,

    /// Shorthand for --format json
    #[arg(short = 'j', long = "json", global = true)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    /// Verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch reports and print the optimization summary
    Report {
        /// CloudHealth API token (overrides CLOUDHEALTH_API_KEY and config)
        #[arg(long)]
        api_key: Option<String>,

        /// CloudHealth client API id of the customer
        #[arg(long)]
        client_id: Option<String>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Generate default config file
    Init,
    /// Validate config file
    Check,
    /// Set a config value (api_key, client_id, base_url, timeout_secs,
    /// snapshot_cutoff_year, gp2_size_threshold_gb, gp2_savings_ratio)
    Set {
        key: String,
        value: String,
    },
}

fn init_logging(verbose: bool, no_color: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("cloudopt={}", default_level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.no_color);

    let loaded = AppConfig::load();
    let settings = loaded
        .as_ref()
        .map(|c| c.settings.clone())
        .unwrap_or_default();

    let output_opts = cli::output::OutputOptions::resolve(
        cli.format.as_deref(),
        cli.json,
        cli.pretty,
        cli.no_color,
        cli.verbose,
        &settings,
    );

    match cli.command {
        None | Some(Commands::Report { .. }) => {
            let (api_key, client_id) = match cli.command {
                Some(Commands::Report { api_key, client_id }) => (api_key, client_id),
                _ => (None, None),
            };
            let config = loaded.context("Failed to load config")?;
            cli::report_cmd::run(api_key, client_id, &config, &output_opts).await?;
        }
        Some(Commands::Config { action }) => match action {
            ConfigAction::Init => cli::config_cmd::init(&output_opts)?,
            ConfigAction::Check => cli::config_cmd::check(&output_opts)?,
            ConfigAction::Set { key, value } => {
                cli::config_cmd::set(&key, &value, &output_opts)?
            }
        },
    }

    Ok(())
}
