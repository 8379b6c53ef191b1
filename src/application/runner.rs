//! Swap run orchestration: resolve, build, split, then sign and deliver in order

use solana_sdk::pubkey::Pubkey;
use std::time::Duration;
use tracing::{error, info, warn};

use super::report::{OutcomeRecord, RunReport};
use crate::domain::execution::{
    deliver, prepare, split, DeliveryOutcome, LegacyTransactionSizer, RunPlan, SolanaNetwork, SubTransaction,
    TransactionSigner, TransactionSizer, MAX_TRANSACTION_SIZE,
};
use crate::domain::pool::{PoolKeys, PoolResolver};
use crate::domain::swap::{SwapBuilder, SwapRequest};
use crate::shared::errors::{BuildError, PoolError, RunError};
use crate::shared::types::{DeliveryMode, SwapDirection, SwapLeg};
use crate::shared::utils::DEFAULT_EXPLORER_URL;

/// Fixed parameters of one run
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub token_a: Pubkey,
    pub token_b: Pubkey,
    pub amount: f64,
    pub fee_ceiling: u64,
    pub direction: SwapDirection,
    pub mode: DeliveryMode,
    pub retry_delay: Duration,
    pub max_transaction_size: usize,
    pub explorer_url: String,
}

impl RunSettings {
    pub fn new(token_a: Pubkey, token_b: Pubkey, amount: f64, mode: DeliveryMode) -> Self {
        Self {
            token_a,
            token_b,
            amount,
            fee_ceiling: 0,
            direction: SwapDirection::In,
            mode,
            retry_delay: Duration::ZERO,
            max_transaction_size: MAX_TRANSACTION_SIZE,
            explorer_url: DEFAULT_EXPLORER_URL.to_string(),
        }
    }
}

/// Collaborators shared by every stage of the run
#[derive(Clone, Copy)]
pub struct RunContext<'a> {
    pub resolver: &'a dyn PoolResolver,
    pub builder: &'a dyn SwapBuilder,
    pub network: &'a dyn SolanaNetwork,
    pub signer: &'a dyn TransactionSigner,
}

pub struct SwapRunner<'a> {
    ctx: RunContext<'a>,
    settings: RunSettings,
}

impl<'a> SwapRunner<'a> {
    pub fn new(ctx: RunContext<'a>, settings: RunSettings) -> Self {
        Self { ctx, settings }
    }

    /// Run to completion. Only a missing pool aborts; every other failure is
    /// recorded in the report and the run moves on.
    pub async fn run(&self) -> Result<RunReport, RunError> {
        let settings = &self.settings;
        info!(
            "Swapping {} of {} for {}...",
            settings.amount, settings.token_a, settings.token_b
        );

        let pool = match self.ctx.resolver.find_pool(&settings.token_a, &settings.token_b) {
            Some(pool) => pool,
            None => {
                error!("Pool info not found");
                return Err(PoolError::NotFound.into());
            }
        };
        info!("Found pool info: {}", pool.id);

        let mut report = RunReport::new(settings.mode);
        let plan = self.plan(&pool, &mut report).await;
        info!(
            "Run plan ready: {} sub-transaction(s), {} instruction(s)",
            plan.len(),
            plan.instruction_count()
        );
        if plan.is_empty() {
            warn!("Nothing to deliver: both legs failed to build");
        }

        self.execute(plan, &mut report).await;
        info!(
            "Run {} finished: {} succeeded, {} failed",
            report.run_id,
            report.succeeded(),
            report.failed()
        );
        Ok(report)
    }

    /// Build and split both legs. A leg that fails is left out of the plan.
    async fn plan(&self, pool: &PoolKeys, report: &mut RunReport) -> RunPlan {
        let s = &self.settings;
        let sizer = LegacyTransactionSizer::new(self.ctx.signer.pubkey());
        let mut plan = RunPlan::new();

        for (leg, request) in SwapRequest::legs(s.token_a, s.token_b, s.amount, s.fee_ceiling, s.direction) {
            match self.build_leg(&request, pool, leg, &sizer).await {
                Ok(parts) => plan.extend(parts),
                Err(e) => {
                    error!("Failed to build {} swap: {}", leg, e);
                    report.record_build_failure(leg, e);
                }
            }
        }
        plan
    }

    async fn build_leg(
        &self,
        request: &SwapRequest,
        pool: &PoolKeys,
        leg: SwapLeg,
        sizer: &dyn TransactionSizer,
    ) -> Result<Vec<SubTransaction>, BuildError> {
        let unsplit = self.ctx.builder.build(request, pool, leg).await?;
        Ok(split(unsplit, sizer, self.settings.max_transaction_size)?)
    }

    /// Strictly sequential: entry i+1 is not touched until entry i has an outcome.
    async fn execute(&self, plan: RunPlan, report: &mut RunReport) {
        let fee_payer = self.ctx.signer.pubkey();

        for (i, mut sub) in plan.into_iter().enumerate() {
            let outcome = match prepare(&mut sub, self.ctx.network, &fee_payer, self.ctx.signer).await {
                Ok(signed) => {
                    deliver(&signed, self.ctx.network, self.settings.mode, self.settings.retry_delay).await
                }
                Err(e) => DeliveryOutcome::SigningFailed(e),
            };

            let record = OutcomeRecord {
                index: i + 1,
                leg: sub.leg,
                position: sub.position,
                outcome,
            };
            let line = record.line(self.settings.mode, &self.settings.explorer_url);
            if record.outcome.is_success() {
                info!("{}", line);
            } else {
                error!("{}", line);
            }
            report.record(record);
        }
    }
}
