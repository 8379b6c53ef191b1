//! Raydium AMM v4 integration: pool lookup and swap construction

pub mod compute_budget;
pub mod instruction;
pub mod liquidity;
pub mod swap_builder;

pub use liquidity::{ApiPoolInfo, LiquidityFile};
pub use swap_builder::{RaydiumSwapBuilder, DEFAULT_SLIPPAGE_BPS};
