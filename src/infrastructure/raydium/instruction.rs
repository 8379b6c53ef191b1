//! Raydium AMM v4 swap instructions

use borsh::BorshSerialize;
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

use crate::domain::pool::PoolKeys;
use crate::shared::errors::BuildError;

pub const SWAP_BASE_IN_TAG: u8 = 9;
pub const SWAP_BASE_OUT_TAG: u8 = 11;

/// Packed little-endian payload shared by both swap variants.
///
/// For `SwapBaseIn` the amounts are `(amount_in, minimum_amount_out)`,
/// for `SwapBaseOut` they are `(max_amount_in, amount_out)`.
#[derive(BorshSerialize, Debug, Clone, Copy, PartialEq, Eq)]
struct SwapInstructionData {
    tag: u8,
    first: u64,
    second: u64,
}

/// User-side accounts of a swap
#[derive(Debug, Clone, Copy)]
pub struct SwapAccounts {
    pub user_source: Pubkey,
    pub user_destination: Pubkey,
    pub owner: Pubkey,
}

pub fn swap_base_in(
    pool: &PoolKeys,
    accounts: &SwapAccounts,
    amount_in: u64,
    minimum_amount_out: u64,
) -> Result<Instruction, BuildError> {
    swap(pool, accounts, SWAP_BASE_IN_TAG, amount_in, minimum_amount_out)
}

pub fn swap_base_out(
    pool: &PoolKeys,
    accounts: &SwapAccounts,
    max_amount_in: u64,
    amount_out: u64,
) -> Result<Instruction, BuildError> {
    swap(pool, accounts, SWAP_BASE_OUT_TAG, max_amount_in, amount_out)
}

fn swap(
    pool: &PoolKeys,
    accounts: &SwapAccounts,
    tag: u8,
    first: u64,
    second: u64,
) -> Result<Instruction, BuildError> {
    let data = SwapInstructionData { tag, first, second }
        .try_to_vec()
        .map_err(|e| BuildError::Instruction(e.to_string()))?;

    let metas = vec![
        AccountMeta::new_readonly(spl_token::id(), false),
        AccountMeta::new(pool.id, false),
        AccountMeta::new_readonly(pool.authority, false),
        AccountMeta::new(pool.open_orders, false),
        AccountMeta::new(pool.target_orders, false),
        AccountMeta::new(pool.base_vault, false),
        AccountMeta::new(pool.quote_vault, false),
        AccountMeta::new_readonly(pool.market_program_id, false),
        AccountMeta::new(pool.market_id, false),
        AccountMeta::new(pool.market_bids, false),
        AccountMeta::new(pool.market_asks, false),
        AccountMeta::new(pool.market_event_queue, false),
        AccountMeta::new(pool.market_base_vault, false),
        AccountMeta::new(pool.market_quote_vault, false),
        AccountMeta::new_readonly(pool.market_authority, false),
        AccountMeta::new(accounts.user_source, false),
        AccountMeta::new(accounts.user_destination, false),
        AccountMeta::new_readonly(accounts.owner, true),
    ];

    Ok(Instruction {
        program_id: pool.program_id,
        accounts: metas,
        data,
    })
}
