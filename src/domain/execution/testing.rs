//! Scripted collaborators for tests

use async_trait::async_trait;
use solana_sdk::{
    hash::Hash,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::Transaction,
};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{SimulationLog, SolanaNetwork, TransactionSigner};
use crate::shared::errors::{NetworkError, SigningError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkCall {
    Blockhash(Hash),
    Send { blockhash: Hash, max_retries: u32 },
    Simulate { blockhash: Hash },
    Balance(Pubkey),
}

/// Records every call; sends and simulations follow a script, then succeed
#[derive(Default)]
pub struct MockNetwork {
    calls: Mutex<Vec<NetworkCall>>,
    next_hash: AtomicU64,
    send_script: Mutex<VecDeque<Result<(), NetworkError>>>,
    simulate_script: Mutex<VecDeque<Result<SimulationLog, NetworkError>>>,
    balances: HashMap<Pubkey, u64>,
}

impl MockNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_send_script(self, script: Vec<Result<(), NetworkError>>) -> Self {
        *self.send_script.lock().unwrap() = script.into();
        self
    }

    pub fn with_simulate_script(self, script: Vec<Result<SimulationLog, NetworkError>>) -> Self {
        *self.simulate_script.lock().unwrap() = script.into();
        self
    }

    pub fn with_balance(mut self, account: Pubkey, amount: u64) -> Self {
        self.balances.insert(account, amount);
        self
    }

    pub fn calls(&self) -> Vec<NetworkCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn send_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, NetworkCall::Send { .. }))
            .count()
    }

    fn record(&self, call: NetworkCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl SolanaNetwork for MockNetwork {
    async fn latest_blockhash(&self) -> Result<Hash, NetworkError> {
        let n = self.next_hash.fetch_add(1, Ordering::SeqCst) + 1;
        let mut bytes = [0u8; 32];
        bytes[..8].copy_from_slice(&n.to_le_bytes());
        let hash = Hash::new_from_array(bytes);
        self.record(NetworkCall::Blockhash(hash));
        Ok(hash)
    }

    async fn send_transaction(
        &self,
        transaction: &Transaction,
        max_retries: u32,
    ) -> Result<Signature, NetworkError> {
        self.record(NetworkCall::Send {
            blockhash: transaction.message.recent_blockhash,
            max_retries,
        });
        let scripted = self.send_script.lock().unwrap().pop_front();
        match scripted {
            Some(Err(e)) => Err(e),
            _ => Ok(transaction.signatures[0]),
        }
    }

    async fn simulate_transaction(&self, transaction: &Transaction) -> Result<SimulationLog, NetworkError> {
        self.record(NetworkCall::Simulate {
            blockhash: transaction.message.recent_blockhash,
        });
        let scripted = self.simulate_script.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| {
            Ok(SimulationLog {
                err: None,
                logs: vec!["Program log: ok".to_string()],
                units_consumed: Some(1_000),
            })
        })
    }

    async fn token_balance(&self, account: &Pubkey) -> Result<u64, NetworkError> {
        self.record(NetworkCall::Balance(*account));
        self.balances
            .get(account)
            .copied()
            .ok_or_else(|| NetworkError::AccountNotFound(account.to_string()))
    }
}

/// Keypair signer that refuses the calls listed in `fail_on` (0-based)
pub struct MockSigner {
    keypair: Keypair,
    fail_on: HashSet<usize>,
    calls: AtomicUsize,
}

impl MockSigner {
    pub fn new() -> Self {
        Self::failing_on(&[])
    }

    pub fn failing_on(calls: &[usize]) -> Self {
        Self {
            keypair: Keypair::new(),
            fail_on: calls.iter().copied().collect(),
            calls: AtomicUsize::new(0),
        }
    }
}

impl TransactionSigner for MockSigner {
    fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    fn sign(&self, transaction: &mut Transaction, recent_blockhash: Hash) -> Result<(), SigningError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_on.contains(&call) {
            return Err(SigningError::MissingKey("test signer refused".to_string()));
        }
        transaction
            .try_sign(&[&self.keypair], recent_blockhash)
            .map_err(|e| SigningError::Rejected(e.to_string()))
    }
}
