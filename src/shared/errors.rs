//! Error handling for the application

use solana_client::client_error::{ClientError, ClientErrorKind};
use thiserror::Error;

use crate::shared::types::SwapLeg;

/// Pool-related errors
#[derive(Error, Debug)]
pub enum PoolError {
    #[error("Pool info not found")]
    NotFound,

    #[error("Failed to load liquidity file {source_location}: {reason}")]
    LoadFailed { source_location: String, reason: String },

    #[error("Invalid pool data: {0}")]
    InvalidPoolData(String),
}

/// Swap construction errors, fatal for one leg only
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Token {0} is not part of the pool")]
    TokenNotInPool(String),

    #[error("Invalid swap amount: {0}")]
    InvalidAmount(String),

    #[error("Pool reserves cannot satisfy the swap: {0}")]
    InsufficientLiquidity(String),

    #[error("Failed to read pool state: {0}")]
    PoolState(#[from] NetworkError),

    #[error("Instruction construction failed: {0}")]
    Instruction(String),

    #[error(transparent)]
    Split(#[from] SplitError),
}

/// Transaction splitting errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SplitError {
    #[error("Transaction has no instructions")]
    Empty,

    #[error("Instruction {index} needs {size} bytes on its own, limit is {limit}")]
    InstructionTooLarge { index: usize, size: usize, limit: usize },

    #[error("Failed to measure transaction size: {0}")]
    Serialization(String),
}

/// Wallet signing errors
#[derive(Error, Debug, Clone)]
pub enum SigningError {
    #[error("Signer {signer} is not the fee payer {fee_payer}")]
    PayerMismatch { signer: String, fee_payer: String },

    #[error("Signing rejected: {0}")]
    Rejected(String),

    #[error("Missing key: {0}")]
    MissingKey(String),
}

/// RPC / network errors
#[derive(Error, Debug, Clone)]
pub enum NetworkError {
    #[error("RPC request failed: {0}")]
    Rpc(String),

    #[error("Transaction rejected: {0}")]
    Rejected(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),
}

impl NetworkError {
    /// Whether the same request may succeed when sent again.
    pub fn is_transient(&self) -> bool {
        matches!(self, NetworkError::Rpc(_))
    }
}

impl From<ClientError> for NetworkError {
    fn from(err: ClientError) -> Self {
        match err.kind() {
            ClientErrorKind::TransactionError(e) => NetworkError::Rejected(e.to_string()),
            ClientErrorKind::SigningError(e) => NetworkError::Rejected(e.to_string()),
            _ => NetworkError::Rpc(err.to_string()),
        }
    }
}

/// Freshness & signing stage errors
#[derive(Error, Debug, Clone)]
pub enum PrepareError {
    #[error("Failed to fetch latest blockhash: {0}")]
    Blockhash(NetworkError),

    #[error(transparent)]
    Signing(#[from] SigningError),
}

/// Delivery stage errors
#[derive(Error, Debug, Clone)]
pub enum DeliveryError {
    #[error("Submission failed after {attempts} attempt(s): {last}")]
    Submission { attempts: u32, last: NetworkError },

    #[error("Simulation request failed: {0}")]
    SimulationRequest(NetworkError),

    #[error("Simulated transaction failed: {reason}")]
    SimulationRejected { reason: String, logs: Vec<String> },
}

/// Errors that abort the whole run
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Pool(#[from] PoolError),
}

/// Per-leg build failure kept in the run report
#[derive(Debug)]
pub struct LegFailure {
    pub leg: SwapLeg,
    pub error: BuildError,
}

/// General application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Wallet error: {0}")]
    WalletError(String),
}
