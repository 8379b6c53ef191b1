//! Application layer - run orchestration and reporting

pub mod report;
pub mod runner;

pub use report::{OutcomeRecord, ReportSummary, RunReport};
pub use runner::{RunContext, RunSettings, SwapRunner};
