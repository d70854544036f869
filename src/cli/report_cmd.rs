use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use colored::Colorize;
use tracing::debug;

use crate::cli::output::{OutputFormat, OutputOptions};
use crate::cli::renderer;
use crate::core::client::CloudHealthClient;
use crate::core::config::{resolve_value, AppConfig, API_KEY_ENV, CLIENT_ID_ENV};
use crate::core::report;

pub async fn run(
    api_key_flag: Option<String>,
    client_id_flag: Option<String>,
    config: &AppConfig,
    opts: &OutputOptions,
) -> Result<()> {
    let api_key = resolve_value(
        api_key_flag,
        std::env::var(API_KEY_ENV).ok(),
        config.api.api_key.as_deref(),
    );
    let client_id = resolve_value(
        client_id_flag,
        std::env::var(CLIENT_ID_ENV).ok(),
        config.api.client_id.as_deref(),
    );
    let (Some(api_key), Some(client_id)) = (api_key, client_id) else {
        eprintln!("Please enter a valid API token and client ID.");
        eprintln!(
            "  Pass --api-key/--client-id, set {}/{}, or run `cloudopt config set api_key <token>`.",
            API_KEY_ENV, CLIENT_ID_ENV
        );
        std::process::exit(1);
    };

    let client = CloudHealthClient::new(
        &config.api.base_url,
        &api_key,
        &client_id,
        Duration::from_secs(config.api.timeout_secs),
    )
    .context("Failed to set up CloudHealth client")?;

    // Show spinner on stderr (text mode only)
    let spinner = if matches!(opts.format, OutputFormat::Text) && !opts.verbose {
        Some(tokio::spawn(async move {
            let frames = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
            let mut i = 0usize;
            loop {
                eprint!("\r {} Fetching CloudHealth reports...", frames[i % frames.len()]);
                i = i.wrapping_add(1);
                tokio::time::sleep(Duration::from_millis(80)).await;
            }
        }))
    } else {
        None
    };

    let fetched = client.fetch_all().await;

    // Stop spinner and clear the line
    if let Some(s) = spinner {
        s.abort();
        eprint!("\r\x1b[2K");
    }

    let raw = match fetched {
        Ok(raw) => raw,
        Err(e) if e.is_credentials() => {
            debug!(error = %e, "credential check failed");
            let msg = e.to_string();
            if opts.use_color {
                eprintln!("{}", msg.red());
            } else {
                eprintln!("{}", msg);
            }
            std::process::exit(1);
        }
        Err(e) => return Err(e).context("Failed to fetch CloudHealth reports"),
    };

    let report = report::analyze(&raw, &client_id, Utc::now(), &config.policy)
        .context("Failed to analyse CloudHealth reports")?;

    match opts.format {
        OutputFormat::Text => {
            println!("{}", renderer::render_report(&report, opts.use_color));
        }
        OutputFormat::Json => {
            let json = if opts.pretty {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_json::to_string(&report)?
            };
            println!("{}", json);
        }
    }

    Ok(())
}
