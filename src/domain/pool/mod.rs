//! Pool domain - liquidity pool lookup

mod pool_keys;

pub use pool_keys::{PoolKeys, PoolSide};
#[cfg(test)]
pub(crate) use pool_keys::sample_pool_keys;

use solana_sdk::pubkey::Pubkey;

/// Finds the pool trading a token pair
pub trait PoolResolver: Send + Sync {
    fn find_pool(&self, mint_a: &Pubkey, mint_b: &Pubkey) -> Option<PoolKeys>;
}
