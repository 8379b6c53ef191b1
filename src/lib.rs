//! Rayswap - Raydium AMM v4 swap runner
//! Splits, signs and submits (or simulates) a forward and reverse swap against one pool

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod shared;

// Re-export main types for convenience
pub use application::{RunReport, RunSettings, SwapRunner};
pub use config::Config;
pub use domain::execution::{SolanaNetwork, TransactionSigner};
pub use domain::pool::{PoolKeys, PoolResolver};
pub use domain::swap::{SwapBuilder, SwapRequest};
