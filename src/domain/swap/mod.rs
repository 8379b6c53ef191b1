//! Swap domain - swap requests and the builder seam

use async_trait::async_trait;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;

use crate::domain::pool::PoolKeys;
use crate::shared::errors::BuildError;
use crate::shared::types::{SwapDirection, SwapLeg};

/// One swap to build, taken from configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SwapRequest {
    pub source_token: Pubkey,
    pub destination_token: Pubkey,
    /// UI amount, scaled by the input mint's decimals at build time
    pub amount: f64,
    /// Compute-unit price in micro-lamports
    pub fee_ceiling: u64,
    pub direction: SwapDirection,
}

impl SwapRequest {
    pub fn new(
        source_token: Pubkey,
        destination_token: Pubkey,
        amount: f64,
        fee_ceiling: u64,
        direction: SwapDirection,
    ) -> Self {
        Self { source_token, destination_token, amount, fee_ceiling, direction }
    }

    /// Forward and reverse requests for one run.
    ///
    /// The reverse leg reuses the forward amount and is always exact-in; only
    /// the destination mint changes.
    pub fn legs(
        token_a: Pubkey,
        token_b: Pubkey,
        amount: f64,
        fee_ceiling: u64,
        direction: SwapDirection,
    ) -> [(SwapLeg, SwapRequest); 2] {
        [
            (SwapLeg::Forward, SwapRequest::new(token_a, token_b, amount, fee_ceiling, direction)),
            (SwapLeg::Reverse, SwapRequest::new(token_b, token_a, amount, fee_ceiling, SwapDirection::In)),
        ]
    }
}

/// All instructions of one complete swap, in execution order
#[derive(Debug, Clone, PartialEq)]
pub struct UnsplitTransaction {
    leg: SwapLeg,
    instructions: Vec<Instruction>,
}

impl UnsplitTransaction {
    pub fn new(leg: SwapLeg, instructions: Vec<Instruction>) -> Self {
        Self { leg, instructions }
    }

    pub fn leg(&self) -> SwapLeg {
        self.leg
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn into_instructions(self) -> Vec<Instruction> {
        self.instructions
    }
}

/// Builds the instruction set for one swap against a resolved pool
#[async_trait]
pub trait SwapBuilder: Send + Sync {
    async fn build(
        &self,
        request: &SwapRequest,
        pool: &PoolKeys,
        leg: SwapLeg,
    ) -> Result<UnsplitTransaction, BuildError>;
}
