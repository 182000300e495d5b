//! Salary service configuration.

use std::fmt;
use std::time::Duration;

/// Endpoints and credentials for the salary service.
#[derive(Clone)]
pub struct SalaryApiConfig {
    /// Refresh-token exchange endpoint (POST).
    pub token_url: String,
    /// Salary lookup endpoint (GET, `?empid=<id>`).
    pub salary_url: String,
    /// Long-lived refresh token exchanged for access tokens.
    pub refresh_token: String,
    /// Static bearer token authorizing the exchange itself.
    pub auth_token: String,
    pub timeout: Duration,
}

impl SalaryApiConfig {
    pub const DEFAULT_TOKEN_URL: &'static str =
        "https://sleeve-stars-automation-2-32676f7875b4.herokuapp.com/welcome/refreshToken/request";
    pub const DEFAULT_SALARY_URL: &'static str =
        "https://sleeve-stars-automation-2-32676f7875b4.herokuapp.com/welcome/salaryData";
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    pub fn new(
        token_url: impl Into<String>,
        salary_url: impl Into<String>,
        refresh_token: impl Into<String>,
        auth_token: impl Into<String>,
    ) -> Self {
        Self {
            token_url: token_url.into(),
            salary_url: salary_url.into(),
            refresh_token: refresh_token.into(),
            auth_token: auth_token.into(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [("token_url", &self.token_url), ("salary_url", &self.salary_url)] {
            url::Url::parse(value).map_err(|e| format!("invalid {} `{}`: {}", name, value, e))?;
        }
        if self.refresh_token.is_empty() {
            return Err("refresh_token is required".to_string());
        }
        if self.auth_token.is_empty() {
            return Err("auth_token is required".to_string());
        }
        Ok(())
    }
}

// Tokens stay out of logs.
impl fmt::Debug for SalaryApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SalaryApiConfig")
            .field("token_url", &self.token_url)
            .field("salary_url", &self.salary_url)
            .field("refresh_token", &"<redacted>")
            .field("auth_token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SalaryApiConfig {
        SalaryApiConfig::new(
            "https://payroll.example.com/welcome/refreshToken/request",
            "https://payroll.example.com/welcome/salaryData",
            "refresh",
            "static",
        )
    }

    #[test]
    fn valid_config() {
        assert!(config().validate().is_ok());
        assert_eq!(config().timeout, Duration::from_secs(30));
    }

    #[test]
    fn rejects_bad_urls_and_missing_tokens() {
        let mut bad_url = config();
        bad_url.salary_url = "payroll/salaryData".to_string();
        assert!(bad_url.validate().unwrap_err().contains("salary_url"));

        let mut no_refresh = config();
        no_refresh.refresh_token.clear();
        assert!(no_refresh.validate().unwrap_err().contains("refresh_token"));

        let mut no_auth = config();
        no_auth.auth_token.clear();
        assert!(no_auth.validate().unwrap_err().contains("auth_token"));
    }

    #[test]
    fn default_endpoints_are_valid() {
        let config = SalaryApiConfig::new(
            SalaryApiConfig::DEFAULT_TOKEN_URL,
            SalaryApiConfig::DEFAULT_SALARY_URL,
            "refresh",
            "static",
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn debug_redacts_tokens() {
        let rendered = format!("{:?}", config());
        assert!(!rendered.contains("refresh\""));
        assert!(!rendered.contains("static"));
        assert!(rendered.contains("<redacted>"));
    }
}
