//! Core types: employee records, salary results, sheet tables, tracing

pub mod employee;
pub mod salary;
pub mod tracing;

pub use employee::{EmployeeRecord, active_records, records_from_rows};
pub use salary::{RESULT_HEADERS, SalaryResult, result_table};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
