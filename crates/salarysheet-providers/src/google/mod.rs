//! Google Sheets provider.
//!
//! Authenticates with a service-account key (JWT-bearer grant) and talks to
//! the Sheets v4 REST API:
//!
//! - `values.get` to read the employee range
//! - `spreadsheets.get` + `batchUpdate` to drop and re-add the result tab
//! - `values.update` with `USER_ENTERED` to write the result table
//!
//! ```ignore
//! use salarysheet_providers::google::{GoogleSheetStore, ServiceAccountKey, SheetsConfig};
//!
//! let key = ServiceAccountKey::from_file("service-account.json")?;
//! let store = GoogleSheetStore::new(SheetsConfig::new(spreadsheet_id), key)?;
//! let records = store.read_records().await?;
//! ```

mod auth;
mod client;
mod config;
mod store;

pub use auth::{AssertionClaims, CachedToken, ServiceAccountAuth};
pub use client::{SheetProperties, SheetRequest, SheetsClient};
pub use config::{ServiceAccountKey, SheetsConfig};
pub use store::GoogleSheetStore;
