//! Raydium liquidity list (`official` + `unOfficial` pool keys)

use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use tracing::{info, warn};

use crate::domain::pool::{PoolKeys, PoolResolver};
use crate::shared::errors::PoolError;

/// One pool entry as published by Raydium
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPoolInfo {
    pub id: String,
    pub base_mint: String,
    pub quote_mint: String,
    pub lp_mint: String,
    pub base_decimals: u8,
    pub quote_decimals: u8,
    pub program_id: String,
    pub authority: String,
    pub open_orders: String,
    pub target_orders: String,
    pub base_vault: String,
    pub quote_vault: String,
    pub market_program_id: String,
    pub market_id: String,
    pub market_authority: String,
    pub market_base_vault: String,
    pub market_quote_vault: String,
    pub market_bids: String,
    pub market_asks: String,
    pub market_event_queue: String,
}

fn parse_key(field: &str, value: &str) -> Result<Pubkey, PoolError> {
    Pubkey::from_str(value).map_err(|e| PoolError::InvalidPoolData(format!("{} {}: {}", field, value, e)))
}

impl TryFrom<&ApiPoolInfo> for PoolKeys {
    type Error = PoolError;

    fn try_from(info: &ApiPoolInfo) -> Result<Self, Self::Error> {
        Ok(PoolKeys {
            id: parse_key("id", &info.id)?,
            base_mint: parse_key("baseMint", &info.base_mint)?,
            quote_mint: parse_key("quoteMint", &info.quote_mint)?,
            lp_mint: parse_key("lpMint", &info.lp_mint)?,
            base_decimals: info.base_decimals,
            quote_decimals: info.quote_decimals,
            program_id: parse_key("programId", &info.program_id)?,
            authority: parse_key("authority", &info.authority)?,
            open_orders: parse_key("openOrders", &info.open_orders)?,
            target_orders: parse_key("targetOrders", &info.target_orders)?,
            base_vault: parse_key("baseVault", &info.base_vault)?,
            quote_vault: parse_key("quoteVault", &info.quote_vault)?,
            market_program_id: parse_key("marketProgramId", &info.market_program_id)?,
            market_id: parse_key("marketId", &info.market_id)?,
            market_authority: parse_key("marketAuthority", &info.market_authority)?,
            market_base_vault: parse_key("marketBaseVault", &info.market_base_vault)?,
            market_quote_vault: parse_key("marketQuoteVault", &info.market_quote_vault)?,
            market_bids: parse_key("marketBids", &info.market_bids)?,
            market_asks: parse_key("marketAsks", &info.market_asks)?,
            market_event_queue: parse_key("marketEventQueue", &info.market_event_queue)?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LiquidityJson {
    #[serde(default)]
    official: Vec<ApiPoolInfo>,
    #[serde(default)]
    un_official: Vec<ApiPoolInfo>,
}

/// All pools from a liquidity list, official entries first
#[derive(Debug, Clone, Default)]
pub struct LiquidityFile {
    pools: Vec<ApiPoolInfo>,
}

impl LiquidityFile {
    /// Load from an `http(s)://` URL or a local path
    pub async fn load(source: &str) -> Result<Self, PoolError> {
        let load_failed = |reason: String| PoolError::LoadFailed {
            source_location: source.to_string(),
            reason,
        };

        let body = if source.starts_with("http://") || source.starts_with("https://") {
            info!("Downloading liquidity list from {}", source);
            reqwest::get(source)
                .await
                .and_then(|resp| resp.error_for_status())
                .map_err(|e| load_failed(e.to_string()))?
                .text()
                .await
                .map_err(|e| load_failed(e.to_string()))?
        } else {
            info!("Reading liquidity list from {}", source);
            tokio::fs::read_to_string(source)
                .await
                .map_err(|e| load_failed(e.to_string()))?
        };

        Self::from_json(&body).map_err(|e| load_failed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let parsed: LiquidityJson = serde_json::from_str(json)?;
        let mut pools = parsed.official;
        pools.extend(parsed.un_official);
        info!("Loaded {} pool(s) from liquidity list", pools.len());
        Ok(Self { pools })
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}

impl PoolResolver for LiquidityFile {
    fn find_pool(&self, mint_a: &Pubkey, mint_b: &Pubkey) -> Option<PoolKeys> {
        let (a, b) = (mint_a.to_string(), mint_b.to_string());

        self.pools
            .iter()
            .filter(|p| (p.base_mint == a && p.quote_mint == b) || (p.base_mint == b && p.quote_mint == a))
            .find_map(|p| match PoolKeys::try_from(p) {
                Ok(keys) => Some(keys),
                Err(e) => {
                    warn!("Skipping malformed pool entry {}: {}", p.id, e);
                    None
                }
            })
    }
}

#[cfg(test)]
pub(crate) fn pool_entry_json(id: &Pubkey, base: &Pubkey, quote: &Pubkey) -> serde_json::Value {
    let key = || Pubkey::new_unique().to_string();
    serde_json::json!({
        "id": id.to_string(),
        "baseMint": base.to_string(),
        "quoteMint": quote.to_string(),
        "lpMint": key(),
        "baseDecimals": 9,
        "quoteDecimals": 6,
        "lpDecimals": 9,
        "version": 4,
        "programId": key(),
        "authority": key(),
        "openOrders": key(),
        "targetOrders": key(),
        "baseVault": key(),
        "quoteVault": key(),
        "withdrawQueue": key(),
        "lpVault": key(),
        "marketVersion": 3,
        "marketProgramId": key(),
        "marketId": key(),
        "marketAuthority": key(),
        "marketBaseVault": key(),
        "marketQuoteVault": key(),
        "marketBids": key(),
        "marketAsks": key(),
        "marketEventQueue": key(),
        "lookupTableAccount": key()
    })
}
