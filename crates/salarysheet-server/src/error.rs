//! Server error types.

use std::io;
use thiserror::Error;

use salarysheet_core::TracingError;
use salarysheet_providers::ProviderError;

use crate::process::ProcessError;

pub type ServerResult<T> = Result<T, ServerError>;

/// Errors outside a single `/process` run: startup, config, serving.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Tracing error: {0}")]
    Tracing(#[from] TracingError),

    #[error("Process error: {0}")]
    Process(#[from] ProcessError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ServerError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
