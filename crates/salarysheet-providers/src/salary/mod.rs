//! Salary service provider.

mod client;
mod config;

pub use client::SalaryClient;
pub use config::SalaryApiConfig;
