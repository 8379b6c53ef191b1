use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rayswap::application::{RunContext, SwapRunner};
use rayswap::config::{Config, PoolsCfg, ReportCfg, RpcCfg, SplitCfg, SwapCfg, WalletCfg};
use rayswap::domain::execution::{SolanaNetwork, TransactionSigner};
use rayswap::infrastructure::blockchain::{KeypairWallet, SolanaRpcClient};
use rayswap::infrastructure::raydium::{LiquidityFile, RaydiumSwapBuilder};
use rayswap::shared::types::SwapDirection;

#[derive(Parser, Debug)]
#[command(version, about = "Raydium AMM v4 swap runner: split, sign, then submit or simulate")]
struct Args {
    /// Path to config file (optional)
    #[arg(long)]
    config: Option<String>,

    /// RPC endpoint URL
    #[arg(long, env = "RPC_URL")]
    rpc_url: Option<String>,

    /// Path to keypair file
    #[arg(long)]
    keypair: Option<String>,

    /// Base58 wallet secret key (takes priority over --keypair)
    #[arg(long, env = "WALLET_PRIVATE_KEY", hide_env_values = true)]
    private_key: Option<String>,

    /// Input token mint
    #[arg(long)]
    token_a: Option<String>,

    /// Output token mint
    #[arg(long)]
    token_b: Option<String>,

    /// Amount of token A to swap (UI units)
    #[arg(long)]
    amount: Option<f64>,

    /// Compute-unit price in micro-lamports
    #[arg(long)]
    max_lamports: Option<u64>,

    /// Which side of the forward swap is fixed: in | out
    #[arg(long)]
    direction: Option<SwapDirection>,

    /// Send transactions instead of simulating them
    #[arg(long)]
    execute: bool,

    /// Retries per transaction when sending
    #[arg(long)]
    max_retries: Option<u32>,

    /// Raydium liquidity list (URL or path)
    #[arg(long)]
    liquidity_file: Option<String>,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    /// CLI args > config file > defaults
    fn into_config(self) -> Result<(Config, bool)> {
        let mut cfg = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config {
                rpc: RpcCfg::default(),
                wallet: WalletCfg::default(),
                swap: SwapCfg {
                    token_a: self.token_a.clone().context("--token-a is required when not using --config")?,
                    token_b: self.token_b.clone().context("--token-b is required when not using --config")?,
                    amount: self.amount.context("--amount is required when not using --config")?,
                    max_lamports: 0,
                    direction: SwapDirection::In,
                    execute_swap: false,
                    max_retries: 20,
                    retry_delay_ms: 500,
                    slippage_bps: rayswap::infrastructure::raydium::DEFAULT_SLIPPAGE_BPS,
                    compute_unit_limit: None,
                },
                pools: PoolsCfg::default(),
                split: SplitCfg::default(),
                report: ReportCfg::default(),
            },
        };

        if let Some(rpc_url) = self.rpc_url {
            cfg.rpc.url = rpc_url;
        }
        if let Some(keypair) = self.keypair {
            cfg.wallet.keypair = Some(keypair);
        }
        if let Some(private_key) = self.private_key {
            cfg.wallet.private_key = Some(private_key);
        }
        if let Some(token_a) = self.token_a {
            cfg.swap.token_a = token_a;
        }
        if let Some(token_b) = self.token_b {
            cfg.swap.token_b = token_b;
        }
        if let Some(amount) = self.amount {
            cfg.swap.amount = amount;
        }
        if let Some(max_lamports) = self.max_lamports {
            cfg.swap.max_lamports = max_lamports;
        }
        if let Some(direction) = self.direction {
            cfg.swap.direction = direction;
        }
        if self.execute {
            cfg.swap.execute_swap = true;
        }
        if let Some(max_retries) = self.max_retries {
            cfg.swap.max_retries = max_retries;
        }
        if let Some(liquidity_file) = self.liquidity_file {
            cfg.pools.liquidity_file = liquidity_file;
        }

        cfg.validate()?;
        Ok((cfg, self.json))
    }
}

fn load_wallet(cfg: &WalletCfg) -> Result<KeypairWallet> {
    let wallet = match (&cfg.private_key, &cfg.keypair) {
        (Some(private_key), _) => KeypairWallet::from_base58(private_key)?,
        (None, Some(path)) => KeypairWallet::from_file(path)?,
        (None, None) => anyhow::bail!("no wallet configured: set wallet.keypair, --keypair or WALLET_PRIVATE_KEY"),
    };
    Ok(wallet)
}

#[tokio::main]
async fn main() -> Result<()> {
    // RPC_URL and WALLET_PRIVATE_KEY may come from a .env file
    let env_file = rayswap::config::load_env_file(None);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    if let Some(path) = &env_file {
        info!("Loaded environment from {}", path.display());
    }
    let (cfg, json) = Args::parse().into_config()?;

    let wallet = load_wallet(&cfg.wallet)?;
    let network: Arc<dyn SolanaNetwork> = Arc::new(SolanaRpcClient::new(cfg.rpc.url.clone(), cfg.rpc_settings()?));
    info!("🔑 Wallet {} on {}", wallet.pubkey(), cfg.rpc.url);

    let liquidity = LiquidityFile::load(&cfg.pools.liquidity_file).await?;
    let builder = RaydiumSwapBuilder::new(network.clone(), wallet.pubkey())
        .with_slippage_bps(cfg.swap.slippage_bps)
        .with_compute_unit_limit(cfg.swap.compute_unit_limit);

    let ctx = RunContext {
        resolver: &liquidity,
        builder: &builder,
        network: network.as_ref(),
        signer: &wallet,
    };
    let settings = cfg.run_settings()?;
    let explorer_url = settings.explorer_url.clone();

    let report = SwapRunner::new(ctx, settings).run().await?;

    if json {
        println!("{}", report.summary(&explorer_url).to_json()?);
    } else {
        for line in report.lines(&explorer_url) {
            println!("{}", line);
        }
        for failure in &report.build_failures {
            println!("Failed to build {} swap: {}", failure.leg, failure.error);
        }
        println!(
            "Run {}: {} succeeded, {} failed",
            report.run_id,
            report.succeeded(),
            report.failed()
        );
    }
    Ok(())
}
