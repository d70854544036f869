use std::io::IsTerminal;

use crate::core::config::Settings;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format: OutputFormat,
    pub pretty: bool,
    pub use_color: bool,
    pub verbose: bool,
}

impl OutputOptions {
    /// Combine CLI flags with the config file's `[settings]`; flags win.
    pub fn resolve(
        format_flag: Option<&str>,
        json_flag: bool,
        pretty: bool,
        no_color: bool,
        verbose: bool,
        settings: &Settings,
    ) -> Self {
        let format = if json_flag {
            OutputFormat::Json
        } else {
            match format_flag.unwrap_or(settings.default_format.as_str()) {
                "json" => OutputFormat::Json,
                _ => OutputFormat::Text,
            }
        };
        let use_color = match settings.color.as_str() {
            _ if no_color => false,
            "always" => std::env::var("NO_COLOR").is_err(),
            "never" => false,
            _ => detect_color(true),
        };
        Self {
            format,
            pretty,
            use_color,
            verbose,
        }
    }
}

pub fn detect_color(color_flag: bool) -> bool {
    if !color_flag {
        return false;
    }
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    std::io::stdout().is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(format: &str, color: &str) -> Settings {
        Settings {
            default_format: format.to_string(),
            color: color.to_string(),
        }
    }

    #[test]
    fn json_flag_overrides_settings() {
        let opts = OutputOptions::resolve(None, true, false, false, false, &settings("text", "auto"));
        assert_eq!(opts.format, OutputFormat::Json);
    }

    #[test]
    fn format_flag_overrides_settings() {
        let opts =
            OutputOptions::resolve(Some("text"), false, false, false, false, &settings("json", "auto"));
        assert_eq!(opts.format, OutputFormat::Text);
    }

    #[test]
    fn settings_default_format_applies() {
        let opts = OutputOptions::resolve(None, false, true, false, false, &settings("json", "auto"));
        assert_eq!(opts.format, OutputFormat::Json);
        assert!(opts.pretty);
    }

    #[test]
    fn no_color_flag_and_never_disable_color() {
        let opts = OutputOptions::resolve(None, false, false, true, false, &settings("text", "always"));
        assert!(!opts.use_color);
        let opts = OutputOptions::resolve(None, false, false, false, false, &settings("text", "never"));
        assert!(!opts.use_color);
    }
}
