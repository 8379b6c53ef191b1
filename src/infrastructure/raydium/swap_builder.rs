//! Builds the full instruction set of one Raydium v4 swap

use async_trait::async_trait;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, system_instruction};
use spl_associated_token_account::{
    get_associated_token_address, instruction::create_associated_token_account_idempotent,
};
use std::sync::Arc;
use tracing::info;

use super::compute_budget::create_compute_budget_instructions;
use super::instruction::{swap_base_in, swap_base_out, SwapAccounts};
use crate::domain::execution::SolanaNetwork;
use crate::domain::pool::PoolKeys;
use crate::domain::swap::{SwapBuilder, SwapRequest, UnsplitTransaction};
use crate::shared::errors::BuildError;
use crate::shared::math::{calculate_min_out, quote_exact_in, RAYDIUM_V4_FEE_BPS};
use crate::shared::types::{Amount, SwapDirection, SwapLeg};
use crate::shared::utils::{format_address, format_amount};

/// Default slippage tolerance (5%)
pub const DEFAULT_SLIPPAGE_BPS: u32 = 500;

pub struct RaydiumSwapBuilder {
    network: Arc<dyn SolanaNetwork>,
    owner: Pubkey,
    slippage_bps: u32,
    compute_unit_limit: Option<u32>,
}

impl RaydiumSwapBuilder {
    pub fn new(network: Arc<dyn SolanaNetwork>, owner: Pubkey) -> Self {
        Self {
            network,
            owner,
            slippage_bps: DEFAULT_SLIPPAGE_BPS,
            compute_unit_limit: None,
        }
    }

    pub fn with_slippage_bps(mut self, slippage_bps: u32) -> Self {
        self.slippage_bps = slippage_bps;
        self
    }

    pub fn with_compute_unit_limit(mut self, compute_unit_limit: Option<u32>) -> Self {
        self.compute_unit_limit = compute_unit_limit;
        self
    }
}

#[async_trait]
impl SwapBuilder for RaydiumSwapBuilder {
    async fn build(
        &self,
        request: &SwapRequest,
        pool: &PoolKeys,
        leg: SwapLeg,
    ) -> Result<UnsplitTransaction, BuildError> {
        let (input, output) = pool
            .sides_for_output(&request.destination_token)
            .ok_or_else(|| BuildError::TokenNotInPool(request.destination_token.to_string()))?;

        let amount_in = Amount::from_ui(request.amount, input.decimals)
            .filter(|amount| amount.value > 0)
            .ok_or_else(|| BuildError::InvalidAmount(request.amount.to_string()))?
            .value;

        let reserve_in = self.network.token_balance(&input.vault).await?;
        let reserve_out = self.network.token_balance(&output.vault).await?;
        let expected_out = quote_exact_in(amount_in, reserve_in, reserve_out, RAYDIUM_V4_FEE_BPS)
            .ok_or_else(|| {
                BuildError::InsufficientLiquidity(format!(
                    "{} in against reserves {}/{}",
                    amount_in, reserve_in, reserve_out
                ))
            })?;
        let min_out = calculate_min_out(expected_out, self.slippage_bps);

        info!(
            "🔨 Building {} swap on pool {}: {} {} -> min {} {} (fixed side: {})",
            leg,
            format_address(&pool.id),
            format_amount(amount_in, input.decimals),
            format_address(&input.mint),
            format_amount(min_out, output.decimals),
            format_address(&output.mint),
            request.direction.as_str()
        );

        let accounts = SwapAccounts {
            user_source: get_associated_token_address(&self.owner, &input.mint),
            user_destination: get_associated_token_address(&self.owner, &output.mint),
            owner: self.owner,
        };
        let native_mint = spl_token::native_mint::id();

        let mut instructions: Vec<Instruction> =
            create_compute_budget_instructions(self.compute_unit_limit, request.fee_ceiling);

        for mint in [&input.mint, &output.mint] {
            instructions.push(create_associated_token_account_idempotent(
                &self.owner,
                &self.owner,
                mint,
                &spl_token::id(),
            ));
        }

        // Native SOL must be moved into the wSOL account before the swap can spend it
        if input.mint == native_mint {
            instructions.push(system_instruction::transfer(&self.owner, &accounts.user_source, amount_in));
            instructions.push(
                spl_token::instruction::sync_native(&spl_token::id(), &accounts.user_source)
                    .map_err(|e| BuildError::Instruction(e.to_string()))?,
            );
        }

        instructions.push(match request.direction {
            SwapDirection::In => swap_base_in(pool, &accounts, amount_in, min_out)?,
            SwapDirection::Out => swap_base_out(pool, &accounts, amount_in, min_out)?,
        });

        let wsol_account = if input.mint == native_mint {
            Some(accounts.user_source)
        } else if output.mint == native_mint {
            Some(accounts.user_destination)
        } else {
            None
        };
        if let Some(account) = wsol_account {
            instructions.push(
                spl_token::instruction::close_account(&spl_token::id(), &account, &self.owner, &self.owner, &[])
                    .map_err(|e| BuildError::Instruction(e.to_string()))?,
            );
        }

        info!("✅ Built {} swap with {} instruction(s)", leg, instructions.len());
        Ok(UnsplitTransaction::new(leg, instructions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::execution::testing::MockNetwork;
    use crate::domain::pool::sample_pool_keys;
    use crate::infrastructure::raydium::instruction::{SWAP_BASE_IN_TAG, SWAP_BASE_OUT_TAG};

    fn network_for(pool: &PoolKeys) -> Arc<MockNetwork> {
        Arc::new(
            MockNetwork::new()
                .with_balance(pool.base_vault, 1_000_000_000_000)
                .with_balance(pool.quote_vault, 150_000_000_000),
        )
    }

    fn data_amounts(ix: &Instruction) -> (u8, u64, u64) {
        (
            ix.data[0],
            u64::from_le_bytes(ix.data[1..9].try_into().unwrap()),
            u64::from_le_bytes(ix.data[9..17].try_into().unwrap()),
        )
    }

    #[tokio::test]
    async fn test_sol_input_wraps_and_closes() {
        let pool = sample_pool_keys();
        let owner = Pubkey::new_unique();
        let builder = RaydiumSwapBuilder::new(network_for(&pool), owner);
        let request = SwapRequest::new(pool.base_mint, pool.quote_mint, 0.01, 100_000, SwapDirection::In);

        let tx = builder.build(&request, &pool, SwapLeg::Forward).await.unwrap();
        let ixs = tx.instructions();

        // budget, 2x ATA, transfer, sync_native, swap, close
        assert_eq!(ixs.len(), 7);
        assert_eq!(tx.leg(), SwapLeg::Forward);
        let swap = &ixs[5];
        assert_eq!(swap.program_id, pool.program_id);
        let (tag, amount_in, min_out) = data_amounts(swap);
        assert_eq!(tag, SWAP_BASE_IN_TAG);
        assert_eq!(amount_in, 10_000_000);
        let expected = quote_exact_in(10_000_000, 1_000_000_000_000, 150_000_000_000, RAYDIUM_V4_FEE_BPS).unwrap();
        assert_eq!(min_out, calculate_min_out(expected, DEFAULT_SLIPPAGE_BPS));
        assert_eq!(ixs[6].program_id, spl_token::id());
    }

    #[tokio::test]
    async fn test_sol_output_closes_destination_only() {
        let pool = sample_pool_keys();
        let owner = Pubkey::new_unique();
        let builder = RaydiumSwapBuilder::new(network_for(&pool), owner)
            .with_slippage_bps(100)
            .with_compute_unit_limit(Some(300_000));
        let request = SwapRequest::new(pool.quote_mint, pool.base_mint, 5.0, 1_000, SwapDirection::Out);

        let tx = builder.build(&request, &pool, SwapLeg::Reverse).await.unwrap();
        let ixs = tx.instructions();

        // 2x budget, 2x ATA, swap, close
        assert_eq!(ixs.len(), 6);
        let (tag, max_in, _) = data_amounts(&ixs[4]);
        assert_eq!(tag, SWAP_BASE_OUT_TAG);
        assert_eq!(max_in, 5_000_000);
        let destination = get_associated_token_address(&owner, &pool.base_mint);
        assert_eq!(ixs[5].accounts[0].pubkey, destination);
    }

    #[tokio::test]
    async fn test_unknown_token_is_rejected() {
        let pool = sample_pool_keys();
        let builder = RaydiumSwapBuilder::new(network_for(&pool), Pubkey::new_unique());
        let request = SwapRequest::new(pool.base_mint, Pubkey::new_unique(), 1.0, 0, SwapDirection::In);

        let err = builder.build(&request, &pool, SwapLeg::Forward).await.unwrap_err();
        assert!(matches!(err, BuildError::TokenNotInPool(_)));
    }

    #[tokio::test]
    async fn test_zero_amount_is_rejected() {
        let pool = sample_pool_keys();
        let builder = RaydiumSwapBuilder::new(network_for(&pool), Pubkey::new_unique());
        let request = SwapRequest::new(pool.base_mint, pool.quote_mint, 0.0, 0, SwapDirection::In);

        let err = builder.build(&request, &pool, SwapLeg::Forward).await.unwrap_err();
        assert!(matches!(err, BuildError::InvalidAmount(_)));
    }

    #[tokio::test]
    async fn test_missing_vault_is_a_build_error() {
        let pool = sample_pool_keys();
        let builder = RaydiumSwapBuilder::new(Arc::new(MockNetwork::new()), Pubkey::new_unique());
        let request = SwapRequest::new(pool.base_mint, pool.quote_mint, 1.0, 0, SwapDirection::In);

        let err = builder.build(&request, &pool, SwapLeg::Forward).await.unwrap_err();
        assert!(matches!(err, BuildError::PoolState(_)));
    }
}
