//! Configuration commands.

use salarysheet_providers::google::ServiceAccountKey;

use crate::config::AppConfig;
use crate::error::{ServerError, ServerResult};

/// Dump the effective configuration to stdout.
pub fn dump(config: &AppConfig) -> ServerResult<()> {
    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| ServerError::config(format!("failed to serialize config: {}", e)))?;
    println!("# config.toml ({})", AppConfig::default_path().display());
    println!("{}", toml_str);
    Ok(())
}

/// Validate the configuration and the service-account key it points at.
pub fn validate(config: &AppConfig) -> ServerResult<()> {
    let resolved = config.resolve().map_err(ServerError::config)?;
    let key = ServiceAccountKey::from_file(&resolved.credentials_file)?;
    println!("Service account: {}", key.client_email);
    println!("Configuration is valid.");
    Ok(())
}

/// Show the configuration file path.
pub fn path() -> ServerResult<()> {
    println!("config: {}", AppConfig::default_path().display());
    Ok(())
}
