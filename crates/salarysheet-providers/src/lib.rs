//! Upstream API clients for salarysheet.
//!
//! - [`SpreadsheetStore`] - read the employee range, recreate the result tab, write values
//! - [`SalarySource`] - obtain an access token and look up one employee's salary
//! - [`ProviderError`] - error type shared by both
//!
//! ```text
//! ┌──────────────────┐        ┌──────────────────┐
//! │ Google Sheets v4 │        │   Salary service │
//! └────────┬─────────┘        └────────┬─────────┘
//!          │ service-account JWT       │ refresh token
//!          ▼                           ▼
//! ┌──────────────────┐        ┌──────────────────┐
//! │ GoogleSheetStore │        │   SalaryClient   │
//! └────────┬─────────┘        └────────┬─────────┘
//!          │ SpreadsheetStore          │ SalarySource
//!          └─────────────┬─────────────┘
//!                        ▼
//!                  orchestration
//! ```

pub mod error;
pub mod google;
pub mod provider;
pub mod salary;

pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use provider::{BoxFuture, SalarySource, SpreadsheetStore};
