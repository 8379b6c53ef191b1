//! Raydium AMM v4 pool key set

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

/// Everything needed to address a Raydium AMM v4 pool and its OpenBook market
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolKeys {
    pub id: Pubkey,
    pub base_mint: Pubkey,
    pub quote_mint: Pubkey,
    pub lp_mint: Pubkey,
    pub base_decimals: u8,
    pub quote_decimals: u8,
    pub program_id: Pubkey,
    pub authority: Pubkey,
    pub open_orders: Pubkey,
    pub target_orders: Pubkey,
    pub base_vault: Pubkey,
    pub quote_vault: Pubkey,
    pub market_program_id: Pubkey,
    pub market_id: Pubkey,
    pub market_authority: Pubkey,
    pub market_base_vault: Pubkey,
    pub market_quote_vault: Pubkey,
    pub market_bids: Pubkey,
    pub market_asks: Pubkey,
    pub market_event_queue: Pubkey,
}

/// One side of a pool's token pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSide {
    pub mint: Pubkey,
    pub vault: Pubkey,
    pub decimals: u8,
}

impl PoolKeys {
    /// True when the pool trades exactly this pair, in either order.
    pub fn trades_pair(&self, mint_a: &Pubkey, mint_b: &Pubkey) -> bool {
        (self.base_mint == *mint_a && self.quote_mint == *mint_b)
            || (self.base_mint == *mint_b && self.quote_mint == *mint_a)
    }

    pub fn base(&self) -> PoolSide {
        PoolSide { mint: self.base_mint, vault: self.base_vault, decimals: self.base_decimals }
    }

    pub fn quote(&self) -> PoolSide {
        PoolSide { mint: self.quote_mint, vault: self.quote_vault, decimals: self.quote_decimals }
    }

    /// Input and output sides for a swap that ends in `output_mint`.
    ///
    /// Receiving quote means paying base, anything else means paying quote.
    pub fn sides_for_output(&self, output_mint: &Pubkey) -> Option<(PoolSide, PoolSide)> {
        if *output_mint == self.quote_mint {
            Some((self.base(), self.quote()))
        } else if *output_mint == self.base_mint {
            Some((self.quote(), self.base()))
        } else {
            None
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_pool_keys() -> PoolKeys {
    PoolKeys {
        id: Pubkey::new_unique(),
        base_mint: spl_token::native_mint::id(),
        quote_mint: Pubkey::new_unique(),
        lp_mint: Pubkey::new_unique(),
        base_decimals: 9,
        quote_decimals: 6,
        program_id: Pubkey::new_unique(),
        authority: Pubkey::new_unique(),
        open_orders: Pubkey::new_unique(),
        target_orders: Pubkey::new_unique(),
        base_vault: Pubkey::new_unique(),
        quote_vault: Pubkey::new_unique(),
        market_program_id: Pubkey::new_unique(),
        market_id: Pubkey::new_unique(),
        market_authority: Pubkey::new_unique(),
        market_base_vault: Pubkey::new_unique(),
        market_quote_vault: Pubkey::new_unique(),
        market_bids: Pubkey::new_unique(),
        market_asks: Pubkey::new_unique(),
        market_event_queue: Pubkey::new_unique(),
    }
}
