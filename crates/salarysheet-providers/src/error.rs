//! Error types for upstream API operations.

use std::fmt;
use thiserror::Error;

/// The category of a provider error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorCode {
    /// Credentials missing, rejected or expired.
    AuthenticationFailed,
    /// Authenticated, but not allowed (403).
    AuthorizationFailed,
    /// Connection failed, timed out, or the body could not be read.
    NetworkError,
    /// 429 from upstream.
    RateLimited,
    /// 5xx or any other unexpected status.
    ServerError,
    /// Body did not match the expected shape.
    InvalidResponse,
    NotFound,
    BadRequest,
    ConfigurationError,
    /// Spreadsheet structure operations (add/delete tab) failed.
    SheetError,
    InternalError,
}

impl ProviderErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed => "authentication_failed",
            Self::AuthorizationFailed => "authorization_failed",
            Self::NetworkError => "network_error",
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::InvalidResponse => "invalid_response",
            Self::NotFound => "not_found",
            Self::BadRequest => "bad_request",
            Self::ConfigurationError => "configuration_error",
            Self::SheetError => "sheet_error",
            Self::InternalError => "internal_error",
        }
    }

    /// Classifies a non-success HTTP status.
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        match status {
            reqwest::StatusCode::UNAUTHORIZED => Self::AuthenticationFailed,
            reqwest::StatusCode::FORBIDDEN => Self::AuthorizationFailed,
            reqwest::StatusCode::NOT_FOUND => Self::NotFound,
            reqwest::StatusCode::TOO_MANY_REQUESTS => Self::RateLimited,
            s if s.is_client_error() => Self::BadRequest,
            _ => Self::ServerError,
        }
    }
}

impl fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error that occurred while talking to an upstream API.
#[derive(Debug, Error)]
pub struct ProviderError {
    code: ProviderErrorCode,
    message: String,
    /// Which upstream produced the error (e.g. "sheets", "salary").
    provider: Option<String>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ProviderError {
    pub fn new(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider: None,
            source: None,
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::AuthenticationFailed, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::NetworkError, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InvalidResponse, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::ConfigurationError, message)
    }

    pub fn sheet(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::SheetError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InternalError, message)
    }

    /// Builds an error from a failed HTTP exchange.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let body = body.trim();
        let message = if body.is_empty() {
            format!("API error ({})", status)
        } else {
            format!("API error ({}): {}", status, body)
        };
        Self::new(ProviderErrorCode::from_status(status), message)
    }

    /// Maps a transport-level reqwest failure.
    pub fn from_request(context: &str, err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("{}: request timeout", context)
        } else if err.is_connect() {
            format!("{}: connection failed: {}", context, err)
        } else {
            format!("{}: request failed: {}", context, err)
        };
        Self::network(message).with_source(err)
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Rewrites the message as `"<context>: <message>"`, keeping code and source.
    pub fn context(mut self, context: impl fmt::Display) -> Self {
        self.message = format!("{}: {}", context, self.message);
        self
    }

    pub fn code(&self) -> ProviderErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref provider) = self.provider {
            write!(f, "[{}] ", provider)?;
        }
        write!(f, "{}: {}", self.code, self.message)
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;
