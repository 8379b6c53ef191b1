//! Execution domain - splitting, signing and delivering swap transactions

mod delivery;
mod preparer;
mod splitter;
mod sub_transaction;

pub use delivery::{deliver, DeliveryOutcome};
pub use preparer::prepare;
pub use splitter::{split, LegacyTransactionSizer, TransactionSizer, MAX_TRANSACTION_SIZE};
pub use sub_transaction::{RunPlan, SignedSubTransaction, SubTransaction};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use solana_sdk::{hash::Hash, pubkey::Pubkey, signature::Signature, transaction::Transaction};
use std::fmt;

use crate::shared::errors::{NetworkError, SigningError};

/// Result of a successful simulation request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationLog {
    /// Set when the simulated transaction itself failed
    pub err: Option<String>,
    pub logs: Vec<String>,
    pub units_consumed: Option<u64>,
}

impl fmt::Display for SimulationLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.units_consumed {
            Some(units) => write!(f, "{} CU consumed", units)?,
            None => write!(f, "CU usage unknown")?,
        }
        if let Some(err) = &self.err {
            write!(f, ", error: {}", err)?;
        }
        write!(f, ", logs: [{}]", self.logs.join(" | "))
    }
}

/// RPC operations the orchestrator needs
#[async_trait]
pub trait SolanaNetwork: Send + Sync {
    /// Current blockhash, fetched fresh on every call
    async fn latest_blockhash(&self) -> Result<Hash, NetworkError>;

    /// Single submission attempt. `max_retries` is forwarded to the RPC node's
    /// own rebroadcast setting.
    async fn send_transaction(
        &self,
        transaction: &Transaction,
        max_retries: u32,
    ) -> Result<Signature, NetworkError>;

    async fn simulate_transaction(&self, transaction: &Transaction) -> Result<SimulationLog, NetworkError>;

    /// Raw balance of an SPL token account
    async fn token_balance(&self, account: &Pubkey) -> Result<u64, NetworkError>;
}

/// Wallet seam: identity plus signing
pub trait TransactionSigner: Send + Sync {
    fn pubkey(&self) -> Pubkey;

    fn sign(&self, transaction: &mut Transaction, recent_blockhash: Hash) -> Result<(), SigningError>;
}

#[cfg(test)]
pub(crate) mod testing;
