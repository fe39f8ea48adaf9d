//! Configuration commands

use colored::Colorize;

use crate::cli::args::GlobalOptions;
use crate::cli::context::resolve_format;
use crate::cli::OutputFormat;
use crate::config::{Config, DEFAULT_API_URL};
use crate::error::{ConfigError, Result};

/// Run the config show command
pub fn show(opts: &GlobalOptions) -> Result<()> {
    let path = Config::resolve_path(opts.config_ref())?;
    let config = Config::load_from(&path)?;
    let api_url = config.resolve_api_url(opts.api_url_ref());

    let source = if opts.api_url_ref().is_some_and(|u| !u.trim().is_empty()) {
        "flag or TASKDESK_API_URL"
    } else if config.api_url.as_deref().is_some_and(|u| !u.trim().is_empty()) {
        "config file"
    } else {
        "default"
    };

    let format = match resolve_format(opts, &config) {
        OutputFormat::Table => "table",
        OutputFormat::Json => "json",
    };

    let exists = if path.exists() { "" } else { " (not created yet)" };
    println!(
        "Config file: {}{}",
        path.display().to_string().cyan(),
        exists.dimmed()
    );
    println!(
        "Session:     {}",
        Config::session_path(opts.config_ref())?.display()
    );
    println!("API URL:     {} {}", api_url.cyan(), format!("({})", source).dimmed());
    println!("Format:      {}", format);

    Ok(())
}

/// Run the config set-url command
pub fn set_url(opts: &GlobalOptions, url: &str) -> Result<()> {
    let url = validate_url(url)?;

    let path = Config::resolve_path(opts.config_ref())?;
    let mut config = Config::load_from(&path)?;
    config.api_url = if url == DEFAULT_API_URL {
        None
    } else {
        Some(url.clone())
    };
    config.save_to(&path)?;

    println!("{} API URL set to {}", "✓".green(), url.cyan());
    println!("  Saved to: {}", path.display());

    Ok(())
}

/// Accept absolute http(s) URLs; trailing slashes are dropped
pub fn validate_url(url: &str) -> Result<String> {
    let trimmed = url.trim().trim_end_matches('/');
    let parsed = reqwest::Url::parse(trimmed)
        .map_err(|e| ConfigError::Invalid(format!("'{}' is not a valid URL: {}", url, e)))?;

    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(ConfigError::Invalid(format!(
            "'{}' must be an http or https URL",
            url
        ))
        .into());
    }

    Ok(trimmed.to_string())
}
