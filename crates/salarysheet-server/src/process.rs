//! The salary sync run: read, look up, write.
//!
//! Phases run strictly in order. Only the salary lookups run concurrently,
//! one future per active employee, joined before the write. A failed lookup
//! degrades its own row and never aborts the run; every other failure does.

use std::sync::Arc;

use futures_util::future::join_all;
use thiserror::Error;
use tracing::{info, warn};

use salarysheet_core::{EmployeeRecord, SalaryResult, active_records, result_table};
use salarysheet_providers::{ProviderError, SalarySource, SpreadsheetStore};

/// Why a run stopped.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The source range held no employee rows.
    #[error("No employee data found in the Google Sheet.")]
    NoData,

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct ProcessReport {
    /// Number of data rows read from the source range.
    pub source_rows: usize,
    /// One entry per active employee, in sheet order.
    pub results: Vec<SalaryResult>,
    /// Id of the freshly created result tab.
    pub sheet_id: i64,
}

impl ProcessReport {
    pub fn degraded(&self) -> usize {
        self.results.iter().filter(|r| r.is_degraded()).count()
    }
}

/// Runs the sync against a spreadsheet store and a salary source.
#[derive(Clone)]
pub struct Processor {
    store: Arc<dyn SpreadsheetStore>,
    salaries: Arc<dyn SalarySource>,
}

impl Processor {
    pub fn new(store: Arc<dyn SpreadsheetStore>, salaries: Arc<dyn SalarySource>) -> Self {
        Self { store, salaries }
    }

    pub async fn run(&self) -> Result<ProcessReport, ProcessError> {
        let records = self.store.read_records().await?;
        if records.is_empty() {
            return Err(ProcessError::NoData);
        }

        let active = active_records(&records);
        info!(rows = records.len(), active = active.len(), "read employee data");

        let access_token = self.salaries.access_token().await?;
        let results = self.fetch_salaries(&access_token, &active).await;

        let sheet_id = self.store.recreate_result_sheet().await?;
        self.store.write_result_values(result_table(&results)).await?;

        let report = ProcessReport {
            source_rows: records.len(),
            results,
            sheet_id,
        };
        info!(
            written = report.results.len(),
            degraded = report.degraded(),
            sheet_id,
            "salary processing complete"
        );
        Ok(report)
    }

    /// Looks up every record's salary concurrently; output order matches input.
    pub async fn fetch_salaries(
        &self,
        access_token: &str,
        records: &[EmployeeRecord],
    ) -> Vec<SalaryResult> {
        join_all(records.iter().map(|record| self.fetch_one(access_token, record))).await
    }

    async fn fetch_one(&self, access_token: &str, record: &EmployeeRecord) -> SalaryResult {
        let Some(id) = record.id().filter(|id| !id.is_empty()) else {
            warn!("active employee row has no id, skipping salary lookup");
            return SalaryResult::failed(record, "employee row has no id");
        };

        match self.salaries.salary(access_token, id).await {
            Ok(salary) => SalaryResult::fetched(record, salary),
            Err(e) => {
                warn!(employee_id = id, error = %e, "error fetching salary");
                SalaryResult::failed(record, e.message())
            }
        }
    }
}
