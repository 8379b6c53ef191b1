// src/config.rs
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use crate::application::RunSettings;
use crate::domain::execution::MAX_TRANSACTION_SIZE;
use crate::infrastructure::blockchain::RpcSettings;
use crate::infrastructure::raydium::DEFAULT_SLIPPAGE_BPS;
use crate::shared::errors::AppError;
use crate::shared::types::{DeliveryMode, SwapDirection};
use crate::shared::utils::DEFAULT_EXPLORER_URL;

const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";
const DEFAULT_LIQUIDITY_FILE: &str = "https://api.raydium.io/v2/sdk/liquidity/mainnet.json";

#[derive(Debug, Clone, Deserialize)]
pub struct RpcCfg {
    #[serde(default = "default_rpc_url")]
    pub url: String,
    #[serde(default = "default_commitment")]
    pub commitment: String,
    /// How long to wait for a sent transaction to confirm before resending
    #[serde(default = "default_confirm_timeout_secs")]
    pub confirm_timeout_secs: u64,
}

/// Either a keypair file or a base58 secret key; the secret key wins when both are set
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WalletCfg {
    pub keypair: Option<String>,
    pub private_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SwapCfg {
    pub token_a: String,
    pub token_b: String,
    /// Input amount in UI units of token A
    pub amount: f64,
    /// Compute-unit price in micro-lamports
    #[serde(default)]
    pub max_lamports: u64,
    #[serde(default)]
    pub direction: SwapDirection,
    /// When false every sub-transaction is only simulated
    #[serde(default)]
    pub execute_swap: bool,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    #[serde(default = "default_slippage_bps")]
    pub slippage_bps: u32,
    pub compute_unit_limit: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PoolsCfg {
    /// URL or local path of the Raydium liquidity list
    #[serde(default = "default_liquidity_file")]
    pub liquidity_file: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SplitCfg {
    #[serde(default = "default_max_transaction_size")]
    pub max_transaction_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportCfg {
    #[serde(default = "default_explorer_url")]
    pub explorer_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub rpc: RpcCfg,
    #[serde(default)]
    pub wallet: WalletCfg,
    pub swap: SwapCfg,
    #[serde(default)]
    pub pools: PoolsCfg,
    #[serde(default)]
    pub split: SplitCfg,
    #[serde(default)]
    pub report: ReportCfg,
}

fn default_rpc_url() -> String {
    DEFAULT_RPC_URL.to_string()
}

fn default_commitment() -> String {
    "confirmed".to_string()
}

fn default_confirm_timeout_secs() -> u64 {
    60
}

fn default_max_retries() -> u32 {
    20
}

fn default_retry_delay_ms() -> u64 {
    500
}

fn default_slippage_bps() -> u32 {
    DEFAULT_SLIPPAGE_BPS
}

fn default_liquidity_file() -> String {
    DEFAULT_LIQUIDITY_FILE.to_string()
}

fn default_max_transaction_size() -> usize {
    MAX_TRANSACTION_SIZE
}

fn default_explorer_url() -> String {
    DEFAULT_EXPLORER_URL.to_string()
}

impl Default for RpcCfg {
    fn default() -> Self {
        Self {
            url: default_rpc_url(),
            commitment: default_commitment(),
            confirm_timeout_secs: default_confirm_timeout_secs(),
        }
    }
}

impl Default for PoolsCfg {
    fn default() -> Self {
        Self { liquidity_file: default_liquidity_file() }
    }
}

impl Default for SplitCfg {
    fn default() -> Self {
        Self { max_transaction_size: default_max_transaction_size() }
    }
}

impl Default for ReportCfg {
    fn default() -> Self {
        Self { explorer_url: default_explorer_url() }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(path.as_ref())
            .with_context(|| format!("read {}", path.as_ref().display()))?;
        Self::from_toml(&s)
    }

    pub fn from_toml(s: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(s).context("parse Config.toml")?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        parse_mint("swap.token_a", &self.swap.token_a)?;
        parse_mint("swap.token_b", &self.swap.token_b)?;
        if self.swap.token_a == self.swap.token_b {
            bail!("swap.token_a and swap.token_b must differ");
        }
        if !(self.swap.amount.is_finite() && self.swap.amount > 0.0) {
            bail!("swap.amount must be positive, got {}", self.swap.amount);
        }
        if self.swap.slippage_bps >= 10_000 {
            bail!("swap.slippage_bps must be below 10000, got {}", self.swap.slippage_bps);
        }
        let size = self.split.max_transaction_size;
        if size == 0 || size > MAX_TRANSACTION_SIZE {
            bail!("split.max_transaction_size must be in 1..={}, got {}", MAX_TRANSACTION_SIZE, size);
        }
        if self.rpc.confirm_timeout_secs == 0 {
            bail!("rpc.confirm_timeout_secs must be positive");
        }
        self.rpc_settings()?;
        Ok(())
    }

    pub fn rpc_settings(&self) -> Result<RpcSettings> {
        let commitment = CommitmentConfig::from_str(&self.rpc.commitment)
            .map_err(|e| AppError::ConfigError(format!("rpc.commitment {}: {}", self.rpc.commitment, e)))?;
        Ok(RpcSettings {
            commitment,
            confirm_timeout: Duration::from_secs(self.rpc.confirm_timeout_secs),
        })
    }

    pub fn delivery_mode(&self) -> DeliveryMode {
        DeliveryMode::from_flags(self.swap.execute_swap, self.swap.max_retries)
    }

    pub fn run_settings(&self) -> Result<RunSettings> {
        Ok(RunSettings {
            token_a: parse_mint("swap.token_a", &self.swap.token_a)?,
            token_b: parse_mint("swap.token_b", &self.swap.token_b)?,
            amount: self.swap.amount,
            fee_ceiling: self.swap.max_lamports,
            direction: self.swap.direction,
            mode: self.delivery_mode(),
            retry_delay: Duration::from_millis(self.swap.retry_delay_ms),
            max_transaction_size: self.split.max_transaction_size,
            explorer_url: self.report.explorer_url.clone(),
        })
    }
}

/// Load `KEY=value` pairs from a `.env` file into the process environment.
///
/// `None` searches the working directory and its parents. Variables already set
/// are kept. Returns the file that was loaded, if any.
pub fn load_env_file(path: Option<&Path>) -> Option<PathBuf> {
    match path {
        Some(path) => dotenvy::from_path(path).ok().map(|_| path.to_path_buf()),
        None => dotenvy::dotenv().ok(),
    }
}

fn parse_mint(field: &str, value: &str) -> Result<Pubkey> {
    Pubkey::from_str(value).with_context(|| format!("{} is not a valid mint: {}", field, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOL: &str = "So11111111111111111111111111111111111111112";
    const USDC: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

    fn minimal() -> String {
        format!("[swap]\ntoken_a = \"{}\"\ntoken_b = \"{}\"\namount = 0.01\n", SOL, USDC)
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::from_toml(&minimal()).unwrap();
        cfg.validate().unwrap();

        assert_eq!(cfg.rpc.url, DEFAULT_RPC_URL);
        assert_eq!(cfg.swap.direction, SwapDirection::In);
        assert_eq!(cfg.swap.max_retries, 20);
        assert_eq!(cfg.swap.slippage_bps, 500);
        assert_eq!(cfg.split.max_transaction_size, 1232);
        assert_eq!(cfg.delivery_mode(), DeliveryMode::Simulate);
        let rpc = cfg.rpc_settings().unwrap();
        assert_eq!(rpc.commitment, CommitmentConfig::confirmed());
        assert_eq!(rpc.confirm_timeout, Duration::from_secs(60));
        assert_eq!(cfg.run_settings().unwrap().explorer_url, DEFAULT_EXPLORER_URL);
    }

    #[test]
    fn test_full_file() {
        let toml = format!(
            r#"
[rpc]
url = "http://localhost:8899"
commitment = "finalized"
confirm_timeout_secs = 20

[wallet]
keypair = "/home/trader/.config/solana/id.json"

[swap]
token_a = "{}"
token_b = "{}"
amount = 1.5
max_lamports = 1000000
direction = "out"
execute_swap = true
max_retries = 3
retry_delay_ms = 250
compute_unit_limit = 300000

[split]
max_transaction_size = 1000

[report]
explorer_url = "https://explorer.solana.com"
"#,
            SOL, USDC
        );
        let cfg = Config::from_toml(&toml).unwrap();
        cfg.validate().unwrap();

        let settings = cfg.run_settings().unwrap();
        assert_eq!(settings.mode, DeliveryMode::Execute { max_retries: 3 });
        assert_eq!(settings.direction, SwapDirection::Out);
        assert_eq!(settings.fee_ceiling, 1_000_000);
        assert_eq!(settings.retry_delay, Duration::from_millis(250));
        assert_eq!(settings.max_transaction_size, 1000);
        assert_eq!(settings.token_b.to_string(), USDC);
        assert_eq!(cfg.swap.compute_unit_limit, Some(300_000));
        assert_eq!(cfg.rpc_settings().unwrap().confirm_timeout, Duration::from_secs(20));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut cfg = Config::from_toml(&minimal()).unwrap();
        cfg.swap.amount = 0.0;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::from_toml(&minimal()).unwrap();
        cfg.swap.token_b = "not-a-mint".to_string();
        assert!(cfg.validate().is_err());

        let mut cfg = Config::from_toml(&minimal()).unwrap();
        cfg.swap.slippage_bps = 10_000;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::from_toml(&minimal()).unwrap();
        cfg.split.max_transaction_size = 1233;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::from_toml(&minimal()).unwrap();
        cfg.rpc.commitment = "eventually".to_string();
        assert!(cfg.validate().is_err());

        let mut cfg = Config::from_toml(&minimal()).unwrap();
        cfg.rpc.confirm_timeout_secs = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_env_file_feeds_process_environment() {
        let path = std::env::temp_dir().join(format!("rayswap-{}.env", uuid::Uuid::new_v4()));
        fs::write(&path, "RAYSWAP_ENV_FILE_RPC_URL=http://localhost:8899\n").unwrap();

        assert_eq!(load_env_file(Some(&path)), Some(path.clone()));
        assert_eq!(std::env::var("RAYSWAP_ENV_FILE_RPC_URL").unwrap(), "http://localhost:8899");

        fs::remove_file(&path).unwrap();
        assert!(load_env_file(Some(&path)).is_none());
    }

    #[test]
    fn test_missing_swap_section_fails() {
        assert!(Config::from_toml("[rpc]\nurl = \"http://localhost:8899\"\n").is_err());
    }
}
