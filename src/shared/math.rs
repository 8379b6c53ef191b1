//! Constant-product quoting used by the Raydium v4 swap builder

/// Raydium AMM v4 trade fee (0.25%)
pub const RAYDIUM_V4_FEE_BPS: u32 = 25;

const BPS_DENOMINATOR: u128 = 10_000;

/// Calculate minimum output amount with slippage protection
pub fn calculate_min_out(amount_out: u64, slippage_bps: u32) -> u64 {
    let slippage_bps = (slippage_bps as u128).min(BPS_DENOMINATOR);
    (amount_out as u128 * (BPS_DENOMINATOR - slippage_bps) / BPS_DENOMINATOR) as u64
}

/// Output for an exact input, fee taken from the input side.
///
/// Returns `None` when the pool is empty or the result is zero.
pub fn quote_exact_in(amount_in: u64, reserve_in: u64, reserve_out: u64, fee_bps: u32) -> Option<u64> {
    if reserve_in == 0 || reserve_out == 0 || fee_bps as u128 >= BPS_DENOMINATOR {
        return None;
    }
    let in_after_fee = amount_in as u128 * (BPS_DENOMINATOR - fee_bps as u128) / BPS_DENOMINATOR;
    let out = reserve_out as u128 * in_after_fee / (reserve_in as u128 + in_after_fee);
    match out {
        0 => None,
        out => u64::try_from(out).ok(),
    }
}
