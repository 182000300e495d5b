//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Overrides;

/// salarysheet - sync employee salaries into Google Sheets
#[derive(Debug, Parser)]
#[command(name = "salarysheet")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "SALARYSHEET_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    /// Log format: pretty, compact or json
    #[arg(long, default_value = "compact", global = true)]
    pub log_format: String,

    /// Address to listen on
    #[arg(long, env = "SALARYSHEET_BIND", global = true)]
    pub bind: Option<String>,

    /// Spreadsheet holding the employee data
    #[arg(long, env = "SPREADSHEET_ID", global = true, hide_env_values = true)]
    pub spreadsheet_id: Option<String>,

    /// Service-account key file
    #[arg(long, env = "GOOGLE_APPLICATION_CREDENTIALS", global = true)]
    pub credentials_file: Option<PathBuf>,

    /// Refresh token for the salary service
    #[arg(long, env = "REFRESH_TOKEN", global = true, hide_env_values = true)]
    pub refresh_token: Option<String>,

    /// Static token authorizing the refresh-token exchange
    #[arg(long, env = "API_AUTH_TOKEN", global = true, hide_env_values = true)]
    pub api_auth_token: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Config values given on the command line or via the environment.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            bind: self.bind.clone(),
            spreadsheet_id: self.spreadsheet_id.clone(),
            credentials_file: self.credentials_file.clone(),
            refresh_token: self.refresh_token.clone(),
            auth_token: self.api_auth_token.clone(),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve `GET /process` over HTTP (default)
    Serve,

    /// Run one sync and print the result as JSON
    Run,

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Dump,
    /// Check that the configuration is complete and the key file loads
    Validate,
    /// Print the default configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn default_is_no_subcommand() {
        let cli = Cli::try_parse_from(["salarysheet"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.log_format, "compact");
    }

    #[test]
    fn flags_become_overrides() {
        let cli = Cli::try_parse_from([
            "salarysheet",
            "run",
            "--spreadsheet-id",
            "sheet-1",
            "--bind",
            "127.0.0.1:9999",
        ])
        .unwrap();

        assert!(matches!(cli.command, Some(Command::Run)));
        let overrides = cli.overrides();
        assert_eq!(overrides.spreadsheet_id.as_deref(), Some("sheet-1"));
        assert_eq!(overrides.bind.as_deref(), Some("127.0.0.1:9999"));
    }

    #[test]
    fn config_subcommands() {
        let cli = Cli::try_parse_from(["salarysheet", "config", "validate"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Config {
                action: ConfigAction::Validate
            })
        ));
    }
}
