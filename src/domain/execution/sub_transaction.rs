//! Sub-transactions and the ordered run plan

use solana_sdk::{hash::Hash, instruction::Instruction, pubkey::Pubkey, transaction::Transaction};

use crate::shared::types::SwapLeg;

/// A size-bounded slice of one swap's instructions.
///
/// Blockhash and fee payer stay empty until the transaction is prepared for signing.
#[derive(Debug, Clone, PartialEq)]
pub struct SubTransaction {
    pub leg: SwapLeg,
    /// Position within its leg's split, 0-based
    pub position: usize,
    pub instructions: Vec<Instruction>,
    pub recent_blockhash: Option<Hash>,
    pub fee_payer: Option<Pubkey>,
}

impl SubTransaction {
    pub fn new(leg: SwapLeg, position: usize, instructions: Vec<Instruction>) -> Self {
        Self {
            leg,
            position,
            instructions,
            recent_blockhash: None,
            fee_payer: None,
        }
    }
}

/// A sub-transaction with blockhash, fee payer and signature in place
#[derive(Debug, Clone)]
pub struct SignedSubTransaction {
    pub leg: SwapLeg,
    pub position: usize,
    pub transaction: Transaction,
}

/// Every sub-transaction of a run, in delivery order
#[derive(Debug, Clone, Default)]
pub struct RunPlan {
    entries: Vec<SubTransaction>,
}

impl RunPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one leg's split, keeping its internal order.
    pub fn extend(&mut self, split: Vec<SubTransaction>) {
        self.entries.extend(split);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[SubTransaction] {
        &self.entries
    }

    pub fn instruction_count(&self) -> usize {
        self.entries.iter().map(|sub| sub.instructions.len()).sum()
    }
}

impl IntoIterator for RunPlan {
    type Item = SubTransaction;
    type IntoIter = std::vec::IntoIter<SubTransaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
