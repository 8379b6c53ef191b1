//! Delivery stage: submit with bounded retries, or simulate

use solana_sdk::{signature::Signature, transaction::Transaction};
use std::time::Duration;
use tracing::{info, warn};

use super::{SignedSubTransaction, SimulationLog, SolanaNetwork};
use crate::shared::errors::{DeliveryError, PrepareError};
use crate::shared::types::DeliveryMode;

/// What happened to one sub-transaction
#[derive(Debug, Clone)]
pub enum DeliveryOutcome {
    Submitted(Signature),
    SubmissionFailed(DeliveryError),
    Simulated(SimulationLog),
    SimulationFailed(DeliveryError),
    /// Never reached delivery
    SigningFailed(PrepareError),
}

impl DeliveryOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DeliveryOutcome::Submitted(_) | DeliveryOutcome::Simulated(_))
    }
}

/// Deliver one signed sub-transaction according to the run's mode.
///
/// Never returns an error: failures become outcome variants so the caller
/// can move on to the next entry.
pub async fn deliver(
    signed: &SignedSubTransaction,
    network: &dyn SolanaNetwork,
    mode: DeliveryMode,
    retry_delay: Duration,
) -> DeliveryOutcome {
    match mode {
        DeliveryMode::Execute { max_retries } => {
            match submit_with_retry(&signed.transaction, network, max_retries, retry_delay).await {
                Ok(signature) => DeliveryOutcome::Submitted(signature),
                Err(e) => DeliveryOutcome::SubmissionFailed(e),
            }
        }
        DeliveryMode::Simulate => match simulate(&signed.transaction, network).await {
            Ok(log) => DeliveryOutcome::Simulated(log),
            Err(e) => DeliveryOutcome::SimulationFailed(e),
        },
    }
}

/// At most `1 + max_retries` attempts; permanent errors stop immediately.
async fn submit_with_retry(
    transaction: &Transaction,
    network: &dyn SolanaNetwork,
    max_retries: u32,
    retry_delay: Duration,
) -> Result<Signature, DeliveryError> {
    let mut attempts = 0;

    loop {
        attempts += 1;
        match network.send_transaction(transaction, max_retries).await {
            Ok(signature) => {
                info!("Transaction {} landed after {} attempt(s)", signature, attempts);
                return Ok(signature);
            }
            Err(e) if e.is_transient() && attempts <= max_retries => {
                warn!("Submission attempt {} failed: {}", attempts, e);
                if !retry_delay.is_zero() {
                    tokio::time::sleep(retry_delay).await;
                }
            }
            Err(e) => return Err(DeliveryError::Submission { attempts, last: e }),
        }
    }
}

async fn simulate(
    transaction: &Transaction,
    network: &dyn SolanaNetwork,
) -> Result<SimulationLog, DeliveryError> {
    let log = network
        .simulate_transaction(transaction)
        .await
        .map_err(DeliveryError::SimulationRequest)?;

    match log.err {
        Some(reason) => Err(DeliveryError::SimulationRejected { reason, logs: log.logs }),
        None => Ok(log),
    }
}
