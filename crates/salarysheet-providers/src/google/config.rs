//! Google Sheets configuration and service-account credentials.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{ProviderError, ProviderResult};

/// The service-account key JSON downloaded from the Google Cloud Console.
///
/// Only the fields needed for the JWT-bearer grant are kept.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    /// Always `"service_account"` for keys this module accepts.
    #[serde(rename = "type")]
    pub key_type: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub private_key_id: Option<String>,
    /// PEM-encoded RSA private key.
    pub private_key: String,
    pub client_email: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    ServiceAccountKey::DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    pub const DEFAULT_TOKEN_URI: &'static str = "https://oauth2.googleapis.com/token";

    /// Loads and validates a key file.
    pub fn from_file(path: impl AsRef<Path>) -> ProviderResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ProviderError::configuration(format!(
                "failed to read service account key {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> ProviderResult<Self> {
        let key: Self = serde_json::from_str(json).map_err(|e| {
            ProviderError::configuration(format!("failed to parse service account key: {}", e))
        })?;
        key.validate()?;
        Ok(key)
    }

    pub fn validate(&self) -> ProviderResult<()> {
        if let Some(ref kind) = self.key_type {
            if kind != "service_account" {
                return Err(ProviderError::configuration(format!(
                    "expected a service_account key, got `{}`",
                    kind
                )));
            }
        }
        if self.client_email.is_empty() {
            return Err(ProviderError::configuration("client_email is required"));
        }
        if !self.private_key.contains("PRIVATE KEY") {
            return Err(ProviderError::configuration(
                "private_key does not look like a PEM private key",
            ));
        }
        Ok(())
    }
}

/// Settings for the Google Sheets side of a run.
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    /// A1 range holding the employee table, header row first.
    pub source_range: String,
    /// Title of the tab that receives the results.
    pub target_sheet: String,
    /// Sheets API root, overridable for testing against a stub.
    pub api_base: String,
    pub timeout: Duration,
    pub scopes: Vec<String>,
}

impl SheetsConfig {
    pub const DEFAULT_API_BASE: &'static str = "https://sheets.googleapis.com/v4";
    pub const DEFAULT_SOURCE_RANGE: &'static str = "Employee Data!A:D";
    pub const DEFAULT_TARGET_SHEET: &'static str = "Employee Salaries";
    pub const DEFAULT_SCOPE: &'static str = "https://www.googleapis.com/auth/spreadsheets";
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    pub fn new(spreadsheet_id: impl Into<String>) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            source_range: Self::DEFAULT_SOURCE_RANGE.to_string(),
            target_sheet: Self::DEFAULT_TARGET_SHEET.to_string(),
            api_base: Self::DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            scopes: vec![Self::DEFAULT_SCOPE.to_string()],
        }
    }

    pub fn with_source_range(mut self, range: impl Into<String>) -> Self {
        self.source_range = range.into();
        self
    }

    pub fn with_target_sheet(mut self, title: impl Into<String>) -> Self {
        self.target_sheet = title.into();
        self
    }

    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The A1 range the result table is written to, for `rows` rows of five
    /// columns.
    pub fn target_range(&self, rows: usize) -> String {
        format!(
            "'{}'!A1:E{}",
            self.target_sheet.replace('\'', "''"),
            rows.max(1)
        )
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.spreadsheet_id.trim().is_empty() {
            return Err("spreadsheet_id is required".to_string());
        }
        if self.source_range.trim().is_empty() {
            return Err("source_range is required".to_string());
        }
        if self.target_sheet.trim().is_empty() {
            return Err("target_sheet is required".to_string());
        }
        url::Url::parse(&self.api_base)
            .map_err(|e| format!("invalid Sheets API base `{}`: {}", self.api_base, e))?;
        if self.scopes.is_empty() {
            return Err("at least one OAuth scope is required".to_string());
        }
        Ok(())
    }
}
