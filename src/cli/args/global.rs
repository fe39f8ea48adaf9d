//! Global CLI options shared across all commands

use crate::cli::{Cli, OutputFormat};

/// Global CLI options passed to all command handlers.
///
/// # Precedence
///
/// CLI flag > environment variable > config file > default. This struct
/// captures the CLI/env layer; config file defaults are resolved later in
/// `CommandContext`.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Output format override (table, json)
    pub format: Option<OutputFormat>,

    /// Custom config file path (defaults to ~/.taskdesk/config.yaml)
    pub config: Option<String>,

    /// Backend base URL override
    pub api_url: Option<String>,

    /// Verbose logging
    pub debug: bool,
}

impl GlobalOptions {
    /// Create GlobalOptions from a parsed CLI struct
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            config: cli.config.clone(),
            api_url: cli.api_url.clone(),
            debug: cli.debug,
        }
    }

    /// Get config path as `Option<&str>`.
    pub fn config_ref(&self) -> Option<&str> {
        self.config.as_deref()
    }

    /// Get API URL override as `Option<&str>`.
    pub fn api_url_ref(&self) -> Option<&str> {
        self.api_url.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_options_accessors() {
        let opts = GlobalOptions {
            format: Some(OutputFormat::Json),
            config: Some("/custom/path".to_string()),
            api_url: Some("http://localhost:5000".to_string()),
            debug: true,
        };

        assert_eq!(opts.config_ref(), Some("/custom/path"));
        assert_eq!(opts.api_url_ref(), Some("http://localhost:5000"));
    }

    #[test]
    fn test_from_cli_carries_debug_flag() {
        use clap::Parser;

        let cli = Cli::try_parse_from(["taskdesk", "--debug", "--format", "json", "whoami"])
            .unwrap();
        let opts = GlobalOptions::from_cli(&cli);

        assert!(opts.debug);
        assert_eq!(opts.format, Some(OutputFormat::Json));
    }

    #[test]
    fn test_global_options_none_accessors() {
        let opts = GlobalOptions::default();

        assert_eq!(opts.format, None);
        assert_eq!(opts.config_ref(), None);
        assert_eq!(opts.api_url_ref(), None);
        assert!(!opts.debug);
    }
}
