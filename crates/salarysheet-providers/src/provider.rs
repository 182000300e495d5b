//! Provider traits used by the orchestration layer.
//!
//! The orchestrator only sees these two traits, so the Google and salary
//! clients can be swapped for in-memory fakes.

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;

use salarysheet_core::EmployeeRecord;

use crate::error::ProviderResult;

/// A boxed future for object-safe async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Spreadsheet read and write access.
pub trait SpreadsheetStore: Send + Sync {
    /// Reads the employee range and maps it to records.
    ///
    /// Returns an empty list when the range holds no rows.
    fn read_records(&self) -> BoxFuture<'_, ProviderResult<Vec<EmployeeRecord>>>;

    /// Deletes the result tab if present, then adds a fresh one.
    ///
    /// Returns the new tab's sheet id.
    fn recreate_result_sheet(&self) -> BoxFuture<'_, ProviderResult<i64>>;

    /// Writes `values` to the result tab starting at `A1`.
    fn write_result_values(&self, values: Vec<Vec<Value>>) -> BoxFuture<'_, ProviderResult<()>>;
}

/// Salary lookup service.
pub trait SalarySource: Send + Sync {
    /// Exchanges the stored refresh token for a short-lived access token.
    fn access_token(&self) -> BoxFuture<'_, ProviderResult<String>>;

    /// Looks up one employee's salary, returning the `salary` field verbatim.
    fn salary<'a>(
        &'a self,
        access_token: &'a str,
        employee_id: &'a str,
    ) -> BoxFuture<'a, ProviderResult<Value>>;
}
