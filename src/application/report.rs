// src/application/report.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::execution::DeliveryOutcome;
use crate::shared::errors::{BuildError, LegFailure};
use crate::shared::types::{DeliveryMode, SwapLeg};
use crate::shared::utils::{explorer_tx_url, generate_id};

/// Outcome of one RunPlan entry
#[derive(Debug, Clone)]
pub struct OutcomeRecord {
    /// 1-based position in the run plan
    pub index: usize,
    pub leg: SwapLeg,
    /// Position within the leg's split
    pub position: usize,
    pub outcome: DeliveryOutcome,
}

impl OutcomeRecord {
    /// Human-readable result line
    pub fn line(&self, mode: DeliveryMode, explorer_url: &str) -> String {
        let i = self.index;
        match &self.outcome {
            DeliveryOutcome::Submitted(signature) => {
                format!("Transaction {} succeeded: {}", i, explorer_tx_url(explorer_url, signature))
            }
            DeliveryOutcome::SubmissionFailed(e) => format!("Transaction {} failed: {}", i, e),
            DeliveryOutcome::Simulated(log) => format!("Simulation {} result: {}", i, log),
            DeliveryOutcome::SimulationFailed(e) => format!("Simulation {} failed: {}", i, e),
            DeliveryOutcome::SigningFailed(e) if mode.is_simulation() => {
                format!("Simulation {} failed: {}", i, e)
            }
            DeliveryOutcome::SigningFailed(e) => format!("Transaction {} failed: {}", i, e),
        }
    }

    fn status(&self) -> &'static str {
        match self.outcome {
            DeliveryOutcome::Submitted(_) => "submitted",
            DeliveryOutcome::SubmissionFailed(_) => "submission_failed",
            DeliveryOutcome::Simulated(_) => "simulated",
            DeliveryOutcome::SimulationFailed(_) => "simulation_failed",
            DeliveryOutcome::SigningFailed(_) => "signing_failed",
        }
    }
}

/// Everything that happened in one run. Outcomes are kept per entry, never folded into one verdict.
#[derive(Debug)]
pub struct RunReport {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub mode: DeliveryMode,
    pub build_failures: Vec<LegFailure>,
    pub records: Vec<OutcomeRecord>,
}

impl RunReport {
    pub fn new(mode: DeliveryMode) -> Self {
        Self {
            run_id: generate_id(),
            started_at: Utc::now(),
            mode,
            build_failures: Vec::new(),
            records: Vec::new(),
        }
    }

    pub fn record_build_failure(&mut self, leg: SwapLeg, error: BuildError) {
        self.build_failures.push(LegFailure { leg, error });
    }

    pub fn record(&mut self, record: OutcomeRecord) {
        self.records.push(record);
    }

    pub fn succeeded(&self) -> usize {
        self.records.iter().filter(|r| r.outcome.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.records.len() - self.succeeded()
    }

    pub fn lines(&self, explorer_url: &str) -> Vec<String> {
        self.records.iter().map(|r| r.line(self.mode, explorer_url)).collect()
    }

    pub fn summary(&self, explorer_url: &str) -> ReportSummary {
        ReportSummary {
            run_id: self.run_id.clone(),
            started_at: self.started_at,
            simulate_only: self.mode.is_simulation(),
            succeeded: self.succeeded(),
            failed: self.failed(),
            build_failures: self
                .build_failures
                .iter()
                .map(|f| BuildFailureSummary { leg: f.leg, error: f.error.to_string() })
                .collect(),
            entries: self
                .records
                .iter()
                .map(|r| EntrySummary {
                    index: r.index,
                    leg: r.leg,
                    position: r.position,
                    status: r.status().to_string(),
                    detail: r.line(self.mode, explorer_url),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportSummary {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub simulate_only: bool,
    pub succeeded: usize,
    pub failed: usize,
    pub build_failures: Vec<BuildFailureSummary>,
    pub entries: Vec<EntrySummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BuildFailureSummary {
    pub leg: SwapLeg,
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EntrySummary {
    pub index: usize,
    pub leg: SwapLeg,
    pub position: usize,
    pub status: String,
    pub detail: String,
}

impl ReportSummary {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::execution::SimulationLog;
    use crate::shared::errors::{DeliveryError, NetworkError, PrepareError, SigningError};
    use solana_sdk::signature::Signature;

    fn record(index: usize, outcome: DeliveryOutcome) -> OutcomeRecord {
        OutcomeRecord { index, leg: SwapLeg::Forward, position: index - 1, outcome }
    }

    #[test]
    fn test_execute_lines() {
        let sig = Signature::default();
        let mut report = RunReport::new(DeliveryMode::Execute { max_retries: 1 });
        report.record(record(1, DeliveryOutcome::Submitted(sig)));
        report.record(record(
            2,
            DeliveryOutcome::SubmissionFailed(DeliveryError::Submission {
                attempts: 2,
                last: NetworkError::Rpc("timeout".to_string()),
            }),
        ));
        report.record(record(
            3,
            DeliveryOutcome::SigningFailed(PrepareError::Signing(SigningError::MissingKey("payer".to_string()))),
        ));

        let lines = report.lines("https://solscan.io");
        assert_eq!(lines[0], format!("Transaction 1 succeeded: https://solscan.io/tx/{}", sig));
        assert_eq!(lines[1], "Transaction 2 failed: Submission failed after 2 attempt(s): RPC request failed: timeout");
        assert_eq!(lines[2], "Transaction 3 failed: Missing key: payer");
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 2);
    }

    #[test]
    fn test_simulation_lines_and_summary() {
        let mut report = RunReport::new(DeliveryMode::Simulate);
        report.record(record(
            1,
            DeliveryOutcome::Simulated(SimulationLog {
                err: None,
                logs: vec!["Program log: ok".to_string()],
                units_consumed: Some(42),
            }),
        ));
        report.record_build_failure(SwapLeg::Reverse, BuildError::InvalidAmount("0".to_string()));

        assert_eq!(
            report.lines("https://solscan.io"),
            vec!["Simulation 1 result: 42 CU consumed, logs: [Program log: ok]".to_string()]
        );

        let summary = report.summary("https://solscan.io");
        assert!(summary.simulate_only);
        assert_eq!(summary.entries[0].status, "simulated");
        assert_eq!(summary.build_failures[0].leg, SwapLeg::Reverse);
        let json = summary.to_json().unwrap();
        assert!(json.contains("\"run_id\""));
    }
}
