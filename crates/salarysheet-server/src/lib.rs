//! HTTP service, CLI and orchestration for the salary sheet sync
//!
//! This crate provides the `salarysheet` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod process;
pub mod routes;
pub mod secret;

pub use cli::Cli;
pub use config::{AppConfig, ResolvedConfig};
pub use error::{ServerError, ServerResult};
pub use process::{ProcessError, ProcessReport, Processor};
pub use routes::{AppState, router};
