use anyhow::Result;

use crate::cli::output::OutputOptions;
use crate::core::config::{AppConfig, API_KEY_ENV, CLIENT_ID_ENV};

pub fn init(_opts: &OutputOptions) -> Result<()> {
    let path = AppConfig::config_path();
    if path.exists() {
        eprintln!("Config file already exists at {}", path.display());
        eprintln!("Remove it first if you want to regenerate.");
        return Ok(());
    }

    match AppConfig::default().save() {
        Ok(path) => {
            println!("Generated config at {}", path.display());
            println!("  Set credentials with `cloudopt config set api_key <token>` and");
            println!("  `cloudopt config set client_id <id>`, or via {} / {}.", API_KEY_ENV, CLIENT_ID_ENV);
        }
        Err(e) => {
            eprintln!("Failed to generate config: {}", e);
            std::process::exit(1);
        }
    }
    Ok(())
}

pub fn set(key: &str, value: &str, _opts: &OutputOptions) -> Result<()> {
    let mut config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = config.set(key, value) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    let issues = config.validate();
    if !issues.is_empty() {
        eprintln!("Refusing to save invalid config:");
        for issue in &issues {
            eprintln!("  - {}", issue);
        }
        std::process::exit(1);
    }

    let path = config.save()?;
    let shown = if key == "api_key" { mask_secret(value) } else { value.to_string() };
    println!("Set {} = {} in {}", key, shown, path.display());
    Ok(())
}

pub fn check(_opts: &OutputOptions) -> Result<()> {
    let path = AppConfig::config_path();
    if !path.exists() {
        eprintln!("No config file found at {}", path.display());
        eprintln!("Run `cloudopt config init` to create one.");
        return Ok(());
    }

    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    let issues = config.validate();
    if issues.is_empty() {
        println!("Config is valid: {}", path.display());
        println!("  Endpoint:  {}", config.api.base_url);
        println!(
            "  API key:   {}",
            config
                .api
                .api_key
                .as_deref()
                .map(mask_secret)
                .unwrap_or_else(|| format!("not set (falls back to {})", API_KEY_ENV))
        );
        println!(
            "  Client ID: {}",
            config
                .api
                .client_id
                .clone()
                .unwrap_or_else(|| format!("not set (falls back to {})", CLIENT_ID_ENV))
        );
    } else {
        eprintln!("Config issues found in {}:", path.display());
        for issue in &issues {
            eprintln!("  - {}", issue);
        }
        std::process::exit(1);
    }
    Ok(())
}

/// Show only the last four characters of a secret.
fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_secret_keeps_last_four() {
        assert_eq!(mask_secret("abcdef123456"), "****3456");
    }

    #[test]
    fn mask_secret_hides_short_values() {
        assert_eq!(mask_secret("abc"), "****");
        assert_eq!(mask_secret(""), "****");
    }
}
