//! Splits an oversized swap into size-bounded sub-transactions

use solana_sdk::{instruction::Instruction, message::Message, pubkey::Pubkey, transaction::Transaction};
use tracing::{debug, info};

use super::SubTransaction;
use crate::domain::swap::UnsplitTransaction;
use crate::shared::errors::SplitError;

/// Solana transaction size limit
pub const MAX_TRANSACTION_SIZE: usize = solana_sdk::packet::PACKET_DATA_SIZE;

/// Measures the serialized size of a transaction holding `instructions`,
/// per-transaction overhead included.
///
/// Implementations must be monotonic: appending an instruction never shrinks the size.
pub trait TransactionSizer {
    fn transaction_size(&self, instructions: &[Instruction]) -> Result<usize, SplitError>;
}

/// Wire size of a legacy transaction paid by `fee_payer`
#[derive(Debug, Clone)]
pub struct LegacyTransactionSizer {
    fee_payer: Pubkey,
}

impl LegacyTransactionSizer {
    pub fn new(fee_payer: Pubkey) -> Self {
        Self { fee_payer }
    }
}

impl TransactionSizer for LegacyTransactionSizer {
    fn transaction_size(&self, instructions: &[Instruction]) -> Result<usize, SplitError> {
        // Unsigned transactions still carry one zeroed slot per required signature,
        // and the blockhash field has a fixed width.
        let message = Message::new(instructions, Some(&self.fee_payer));
        let transaction = Transaction::new_unsigned(message);
        bincode::serialized_size(&transaction)
            .map(|size| size as usize)
            .map_err(|e| SplitError::Serialization(e.to_string()))
    }
}

/// Greedily pack instructions into sub-transactions no larger than `limit`.
///
/// Order is preserved and no instruction is dropped, duplicated or split.
pub fn split(
    unsplit: UnsplitTransaction,
    sizer: &dyn TransactionSizer,
    limit: usize,
) -> Result<Vec<SubTransaction>, SplitError> {
    if unsplit.instructions().is_empty() {
        return Err(SplitError::Empty);
    }

    let leg = unsplit.leg();
    let total = unsplit.instructions().len();
    let mut parts: Vec<SubTransaction> = Vec::new();
    let mut current: Vec<Instruction> = Vec::new();

    for (index, instruction) in unsplit.into_instructions().into_iter().enumerate() {
        let alone = sizer.transaction_size(std::slice::from_ref(&instruction))?;
        if alone > limit {
            return Err(SplitError::InstructionTooLarge { index, size: alone, limit });
        }

        current.push(instruction);
        if current.len() > 1 && sizer.transaction_size(&current)? > limit {
            let carried = current.split_off(current.len() - 1);
            let full = std::mem::replace(&mut current, carried);
            debug!("Closing {} sub-transaction {} with {} instruction(s)", leg, parts.len(), full.len());
            parts.push(SubTransaction::new(leg, parts.len(), full));
        }
    }

    if !current.is_empty() {
        parts.push(SubTransaction::new(leg, parts.len(), current));
    }

    info!(
        "Split {} swap: {} instruction(s) into {} sub-transaction(s), limit {} bytes",
        leg,
        total,
        parts.len(),
        limit
    );
    Ok(parts)
}
