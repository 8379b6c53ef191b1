//! Local keypair wallet

use solana_sdk::{
    hash::Hash,
    pubkey::Pubkey,
    signature::{read_keypair_file, Keypair, Signer},
    signer::SignerError,
    transaction::Transaction,
};
use std::path::PathBuf;

use crate::domain::execution::TransactionSigner;
use crate::shared::errors::{AppError, SigningError};

/// Signs with a single in-memory keypair
pub struct KeypairWallet {
    keypair: Keypair,
}

impl KeypairWallet {
    pub fn new(keypair: Keypair) -> Self {
        Self { keypair }
    }

    /// Load a JSON keypair file as written by `solana-keygen`; a leading `~` is expanded
    pub fn from_file(path: &str) -> Result<Self, AppError> {
        let path = expand_path(path);
        read_keypair_file(&path)
            .map(Self::new)
            .map_err(|e| AppError::WalletError(format!("Failed to load keypair {}: {}", path.display(), e)))
    }

    /// Load a base58-encoded 64-byte secret key
    pub fn from_base58(private_key: &str) -> Result<Self, AppError> {
        let bytes = bs58::decode(private_key.trim())
            .into_vec()
            .map_err(|e| AppError::WalletError(format!("Private key is not valid base58: {}", e)))?;
        Keypair::from_bytes(&bytes)
            .map(Self::new)
            .map_err(|e| AppError::WalletError(format!("Invalid private key: {}", e)))
    }
}

fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

impl TransactionSigner for KeypairWallet {
    fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    fn sign(&self, transaction: &mut Transaction, recent_blockhash: Hash) -> Result<(), SigningError> {
        transaction
            .try_sign(&[&self.keypair], recent_blockhash)
            .map_err(|e| match e {
                SignerError::KeypairPubkeyMismatch => SigningError::PayerMismatch {
                    signer: self.keypair.pubkey().to_string(),
                    fee_payer: transaction
                        .message
                        .account_keys
                        .first()
                        .map(|k| k.to_string())
                        .unwrap_or_default(),
                },
                SignerError::NotEnoughSigners => {
                    SigningError::MissingKey("transaction needs more signers than this wallet".to_string())
                }
                other => SigningError::Rejected(other.to_string()),
            })
    }
}
