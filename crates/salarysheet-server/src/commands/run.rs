//! `salarysheet run`: one sync, result printed to stdout.

use tracing::info;

use crate::config::ResolvedConfig;
use crate::error::ServerResult;
use crate::process::Processor;
use crate::routes::ProcessResponse;

use super::build_processor;

/// Runs a single sync and prints the JSON body a successful `GET /process`
/// returns. Failures are returned for the caller to report.
pub async fn run_once(resolved: ResolvedConfig) -> ServerResult<()> {
    let processor = build_processor(&resolved)?;
    let body = sync(&processor).await?;
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

async fn sync(processor: &Processor) -> ServerResult<ProcessResponse> {
    let report = processor.run().await?;
    info!(
        rows = report.source_rows,
        written = report.results.len(),
        degraded = report.degraded(),
        "sync finished"
    );
    Ok(ProcessResponse::new(report.results))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use serde_json::json;

    use crate::error::ServerError;
    use crate::process::ProcessError;
    use crate::process::tests::{FakeSalaries, FakeStore, employee};

    #[tokio::test]
    async fn sync_returns_success_body() {
        let processor = Processor::new(
            Arc::new(FakeStore::new(vec![employee("E1", "TRUE")])),
            Arc::new(FakeSalaries::new(&[("E1", json!(10))])),
        );

        let body = sync(&processor).await.unwrap();
        assert_eq!(body.salaries.len(), 1);
        assert_eq!(body.message, "Employee salary processing complete");
    }

    #[tokio::test]
    async fn sync_failure_is_returned_not_rendered() {
        let processor = Processor::new(
            Arc::new(FakeStore::new(vec![])),
            Arc::new(FakeSalaries::new(&[])),
        );

        let err = sync(&processor).await.unwrap_err();
        assert!(matches!(err, ServerError::Process(ProcessError::NoData)));
        assert_eq!(
            err.to_string(),
            "Process error: No employee data found in the Google Sheet."
        );
    }
}
