//! Salary results and the table written back to the spreadsheet.

use serde::Serialize;
use serde_json::Value;

use crate::employee::EmployeeRecord;

/// Column headers of the result sheet, in write order.
pub const RESULT_HEADERS: [&str; 5] = ["id", "name", "position", "isActive", "salary"];

/// Salary written for a row whose lookup failed.
pub const FALLBACK_SALARY: &str = "0";

/// An employee record merged with its salary lookup outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<String>,
    /// Salary as returned by the API (string or number), or `"0"` on failure.
    pub salary: Value,
    /// Why the lookup failed, if it did.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SalaryResult {
    /// A successful lookup.
    pub fn fetched(record: &EmployeeRecord, salary: Value) -> Self {
        Self::from_record(record, salary, None)
    }

    /// A failed lookup: salary falls back to `"0"` and the reason is kept.
    pub fn failed(record: &EmployeeRecord, reason: impl std::fmt::Display) -> Self {
        Self::from_record(
            record,
            Value::String(FALLBACK_SALARY.to_string()),
            Some(format!("Failed to fetch salary: {}", reason)),
        )
    }

    fn from_record(record: &EmployeeRecord, salary: Value, error: Option<String>) -> Self {
        Self {
            id: record.id().map(String::from),
            name: record.name().map(String::from),
            position: record.position().map(String::from),
            is_active: record.is_active_flag().map(String::from),
            salary,
            error,
        }
    }

    /// Returns true if the salary lookup failed.
    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }

    /// The sheet row for this result, in [`RESULT_HEADERS`] order.
    pub fn to_row(&self) -> Vec<Value> {
        let cell = |v: &Option<String>| Value::String(v.clone().unwrap_or_default());
        vec![
            cell(&self.id),
            cell(&self.name),
            cell(&self.position),
            cell(&self.is_active),
            self.salary.clone(),
        ]
    }
}

/// Builds the values written to the result sheet: header row first.
pub fn result_table(results: &[SalaryResult]) -> Vec<Vec<Value>> {
    let header = RESULT_HEADERS
        .iter()
        .map(|h| Value::String((*h).to_string()))
        .collect();

    std::iter::once(header)
        .chain(results.iter().map(SalaryResult::to_row))
        .collect()
}
