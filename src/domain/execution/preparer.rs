//! Freshness & signing stage

use solana_sdk::{message::Message, pubkey::Pubkey, transaction::Transaction};
use tracing::debug;

use super::{SignedSubTransaction, SolanaNetwork, SubTransaction, TransactionSigner};
use crate::shared::errors::PrepareError;

/// Attach a fresh blockhash and the fee payer to `sub`, then sign it.
///
/// The blockhash is fetched here and nowhere earlier: it expires after roughly
/// 150 slots, so it must be bound right before the signature.
pub async fn prepare(
    sub: &mut SubTransaction,
    network: &dyn SolanaNetwork,
    fee_payer: &Pubkey,
    signer: &dyn TransactionSigner,
) -> Result<SignedSubTransaction, PrepareError> {
    let blockhash = network.latest_blockhash().await.map_err(PrepareError::Blockhash)?;
    sub.recent_blockhash = Some(blockhash);
    sub.fee_payer = Some(*fee_payer);

    let message = Message::new_with_blockhash(&sub.instructions, Some(fee_payer), &blockhash);
    let mut transaction = Transaction::new_unsigned(message);
    signer.sign(&mut transaction, blockhash)?;

    debug!(
        "Signed {} sub-transaction {} with blockhash {}",
        sub.leg, sub.position, blockhash
    );

    Ok(SignedSubTransaction {
        leg: sub.leg,
        position: sub.position,
        transaction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::execution::testing::{MockNetwork, MockSigner, NetworkCall};
    use crate::shared::errors::SigningError;
    use crate::shared::types::SwapLeg;
    use solana_sdk::instruction::{AccountMeta, Instruction};

    fn sub_for(payer: Pubkey) -> SubTransaction {
        let ix = Instruction::new_with_bytes(
            Pubkey::new_unique(),
            &[1, 2, 3],
            vec![AccountMeta::new(payer, true)],
        );
        SubTransaction::new(SwapLeg::Forward, 0, vec![ix])
    }

    #[tokio::test]
    async fn test_prepare_binds_blockhash_and_payer() {
        let network = MockNetwork::new();
        let signer = MockSigner::new();
        let payer = signer.pubkey();
        let mut sub = sub_for(payer);

        let signed = prepare(&mut sub, &network, &payer, &signer).await.unwrap();

        let fetched = match network.calls().as_slice() {
            [NetworkCall::Blockhash(hash)] => *hash,
            other => panic!("unexpected calls: {:?}", other),
        };
        assert_eq!(sub.recent_blockhash, Some(fetched));
        assert_eq!(sub.fee_payer, Some(payer));
        assert_eq!(signed.transaction.message.recent_blockhash, fetched);
        assert_eq!(signed.transaction.message.account_keys[0], payer);
        assert!(signed.transaction.is_signed());
        assert!(signed.transaction.verify().is_ok());
    }

    #[tokio::test]
    async fn test_prepare_reports_signer_rejection() {
        let network = MockNetwork::new();
        let signer = MockSigner::failing_on(&[0]);
        let payer = signer.pubkey();
        let mut sub = sub_for(payer);

        let err = prepare(&mut sub, &network, &payer, &signer).await.unwrap_err();
        assert!(matches!(err, PrepareError::Signing(SigningError::MissingKey(_))));
    }

    #[tokio::test]
    async fn test_prepare_fails_when_payer_is_not_the_signer() {
        let network = MockNetwork::new();
        let signer = MockSigner::new();
        let other_payer = Pubkey::new_unique();
        let mut sub = sub_for(other_payer);

        let err = prepare(&mut sub, &network, &other_payer, &signer).await.unwrap_err();
        assert!(matches!(err, PrepareError::Signing(_)));
    }
}
