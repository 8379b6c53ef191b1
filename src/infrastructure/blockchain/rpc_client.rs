//! Solana RPC client wrapper

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::RpcSendTransactionConfig;
use solana_sdk::{
    commitment_config::CommitmentConfig,
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::Transaction,
};
use std::time::Duration;
use tracing::{debug, info};

use crate::domain::execution::{SimulationLog, SolanaNetwork};
use crate::shared::errors::NetworkError;

const CONFIRM_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// RPC client configuration
#[derive(Debug, Clone)]
pub struct RpcSettings {
    pub commitment: CommitmentConfig,
    /// How long to wait for a sent transaction to reach `commitment`
    pub confirm_timeout: Duration,
}

impl Default for RpcSettings {
    fn default() -> Self {
        Self {
            commitment: CommitmentConfig::confirmed(),
            confirm_timeout: Duration::from_secs(60),
        }
    }
}

/// Solana RPC client wrapper
pub struct SolanaRpcClient {
    client: RpcClient,
    settings: RpcSettings,
}

impl SolanaRpcClient {
    /// Create new RPC client
    pub fn new(rpc_url: String, settings: RpcSettings) -> Self {
        Self {
            client: RpcClient::new_with_commitment(rpc_url, settings.commitment),
            settings,
        }
    }

    /// Poll until the signature reaches the configured commitment.
    ///
    /// On timeout the error is only transient while the transaction's blockhash
    /// is still valid; a resend with an expired blockhash can never land.
    async fn confirm(&self, signature: &Signature, blockhash: &Hash) -> Result<(), NetworkError> {
        let polls = (self.settings.confirm_timeout.as_millis() / CONFIRM_POLL_INTERVAL.as_millis()).max(1);

        for _ in 0..polls {
            let status = self
                .client
                .get_signature_status_with_commitment(signature, self.settings.commitment)
                .await?;
            match status {
                Some(Ok(())) => return Ok(()),
                Some(Err(e)) => return Err(NetworkError::Rejected(e.to_string())),
                None => tokio::time::sleep(CONFIRM_POLL_INTERVAL).await,
            }
        }

        let blockhash_valid = self
            .client
            .is_blockhash_valid(blockhash, self.settings.commitment)
            .await?;
        Err(confirm_timeout_error(signature, blockhash_valid, self.settings.confirm_timeout))
    }
}

fn confirm_timeout_error(signature: &Signature, blockhash_valid: bool, timeout: Duration) -> NetworkError {
    if blockhash_valid {
        NetworkError::Rpc(format!(
            "transaction {} not confirmed within {}s",
            signature,
            timeout.as_secs()
        ))
    } else {
        NetworkError::Rejected(format!("transaction {} dropped: blockhash expired", signature))
    }
}

#[async_trait]
impl SolanaNetwork for SolanaRpcClient {
    async fn latest_blockhash(&self) -> Result<Hash, NetworkError> {
        let blockhash = self.client.get_latest_blockhash().await?;
        debug!("Latest blockhash: {}", blockhash);
        Ok(blockhash)
    }

    async fn send_transaction(
        &self,
        transaction: &Transaction,
        max_retries: u32,
    ) -> Result<Signature, NetworkError> {
        let config = RpcSendTransactionConfig {
            skip_preflight: true,
            max_retries: Some(max_retries as usize),
            ..RpcSendTransactionConfig::default()
        };
        let signature = self.client.send_transaction_with_config(transaction, config).await?;
        info!("🚀 Sent transaction {}", signature);

        self.confirm(&signature, &transaction.message.recent_blockhash).await?;
        info!("✅ Transaction {} confirmed", signature);
        Ok(signature)
    }

    async fn simulate_transaction(&self, transaction: &Transaction) -> Result<SimulationLog, NetworkError> {
        let response = self.client.simulate_transaction(transaction).await?;
        let result = response.value;

        Ok(SimulationLog {
            err: result.err.map(|e| e.to_string()),
            logs: result.logs.unwrap_or_default(),
            units_consumed: result.units_consumed,
        })
    }

    async fn token_balance(&self, account: &Pubkey) -> Result<u64, NetworkError> {
        let balance = self.client.get_token_account_balance(account).await?;
        balance
            .amount
            .parse::<u64>()
            .map_err(|e| NetworkError::Rpc(format!("invalid balance for {}: {}", account, e)))
    }
}
