//! Subcommand implementations.

pub mod config;
pub mod run;
pub mod serve;

use std::sync::Arc;

use salarysheet_providers::google::{GoogleSheetStore, ServiceAccountKey};
use salarysheet_providers::salary::SalaryClient;

use crate::config::ResolvedConfig;
use crate::error::ServerResult;
use crate::process::Processor;

/// Wires the Google Sheets store and the salary client into a [`Processor`].
pub fn build_processor(resolved: &ResolvedConfig) -> ServerResult<Processor> {
    let key = ServiceAccountKey::from_file(&resolved.credentials_file)?;
    let store = GoogleSheetStore::new(resolved.sheets.clone(), key)?;
    let salaries = SalaryClient::new(resolved.salary_api.clone())?;
    Ok(Processor::new(Arc::new(store), Arc::new(salaries)))
}
