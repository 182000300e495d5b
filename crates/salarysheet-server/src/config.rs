//! Service configuration.
//!
//! Settings live in `~/.config/salarysheet/config.toml` by default. Secret
//! values (`spreadsheet_id`, `refresh_token`, `auth_token`) accept the
//! reference prefixes understood by [`crate::secret`]. Command-line flags and
//! their environment variables override the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use salarysheet_providers::google::SheetsConfig;
use salarysheet_providers::salary::SalaryApiConfig;

use crate::secret;

// ---------------------------------------------------------------------------
// AppConfig (config.toml)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub sheets: SheetsSettings,
    pub salary_api: SalaryApiSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Socket address the HTTP service listens on.
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetsSettings {
    pub spreadsheet_id: Option<String>,
    /// Service-account key JSON.
    pub credentials_file: Option<PathBuf>,
    pub source_range: String,
    pub target_sheet: String,
    pub api_base: String,
    pub timeout_secs: u64,
}

impl Default for SheetsSettings {
    fn default() -> Self {
        Self {
            spreadsheet_id: None,
            credentials_file: None,
            source_range: SheetsConfig::DEFAULT_SOURCE_RANGE.to_string(),
            target_sheet: SheetsConfig::DEFAULT_TARGET_SHEET.to_string(),
            api_base: SheetsConfig::DEFAULT_API_BASE.to_string(),
            timeout_secs: SheetsConfig::DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SalaryApiSettings {
    pub token_url: String,
    pub salary_url: String,
    pub refresh_token: Option<String>,
    pub auth_token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for SalaryApiSettings {
    fn default() -> Self {
        Self {
            token_url: SalaryApiConfig::DEFAULT_TOKEN_URL.to_string(),
            salary_url: SalaryApiConfig::DEFAULT_SALARY_URL.to_string(),
            refresh_token: None,
            auth_token: None,
            timeout_secs: SalaryApiConfig::DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub bind: Option<String>,
    pub spreadsheet_id: Option<String>,
    pub credentials_file: Option<PathBuf>,
    pub refresh_token: Option<String>,
    pub auth_token: Option<String>,
}

/// Fully resolved settings, ready to build providers from.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub bind: String,
    pub sheets: SheetsConfig,
    pub credentials_file: PathBuf,
    pub salary_api: SalaryApiConfig,
}

impl AppConfig {
    /// Loads the default config file, or defaults if it does not exist.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("failed to parse config: {}", e))
    }

    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("salarysheet")
            .join("config.toml")
    }

    /// Applies command-line and environment overrides.
    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(bind) = overrides.bind {
            self.server.bind = bind;
        }
        if let Some(id) = overrides.spreadsheet_id {
            self.sheets.spreadsheet_id = Some(id);
        }
        if let Some(path) = overrides.credentials_file {
            self.sheets.credentials_file = Some(path);
        }
        if let Some(token) = overrides.refresh_token {
            self.salary_api.refresh_token = Some(token);
        }
        if let Some(token) = overrides.auth_token {
            self.salary_api.auth_token = Some(token);
        }
    }

    /// Resolves secret references and validates everything.
    pub fn resolve(&self) -> Result<ResolvedConfig, String> {
        let spreadsheet_id = required_secret(&self.sheets.spreadsheet_id, "sheets.spreadsheet_id")?;
        let credentials_file = self
            .sheets
            .credentials_file
            .clone()
            .ok_or("sheets.credentials_file is required")?;

        let sheets = SheetsConfig::new(spreadsheet_id)
            .with_source_range(&self.sheets.source_range)
            .with_target_sheet(&self.sheets.target_sheet)
            .with_api_base(&self.sheets.api_base)
            .with_timeout(Duration::from_secs(self.sheets.timeout_secs));
        sheets.validate()?;

        let api = &self.salary_api;
        let salary_api = SalaryApiConfig::new(
            &api.token_url,
            &api.salary_url,
            required_secret(&api.refresh_token, "salary_api.refresh_token")?,
            required_secret(&api.auth_token, "salary_api.auth_token")?,
        )
        .with_timeout(Duration::from_secs(api.timeout_secs));
        salary_api.validate()?;

        Ok(ResolvedConfig {
            bind: self.server.bind.clone(),
            sheets,
            credentials_file,
            salary_api,
        })
    }
}

fn required(value: &Option<String>, name: &str) -> Result<String, String> {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => Ok(v.to_string()),
        _ => Err(format!("{} is required", name)),
    }
}

fn required_secret(value: &Option<String>, name: &str) -> Result<String, String> {
    let resolved = secret::resolve(&required(value, name)?)
        .map_err(|e| format!("{}: {}", name, e))?;
    if resolved.is_empty() {
        return Err(format!("{} resolved to an empty value", name));
    }
    Ok(resolved)
}
