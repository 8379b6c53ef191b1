//! Utility functions and helpers

use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;

use crate::shared::types::Amount;

pub const DEFAULT_EXPLORER_URL: &str = "https://solscan.io";

/// Format amount with proper decimals
pub fn format_amount(amount: u64, decimals: u8) -> String {
    format!("{:.6}", Amount::new(amount, decimals).to_ui())
}

/// Shorten an address for log lines
pub fn format_address(address: &Pubkey) -> String {
    let s = address.to_string();
    format!("{}...{}", &s[..8], &s[s.len() - 8..])
}

/// Generate unique ID
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Link to a transaction on a block explorer
pub fn explorer_tx_url(explorer_url: &str, signature: &Signature) -> String {
    format!("{}/tx/{}", explorer_url.trim_end_matches('/'), signature)
}
