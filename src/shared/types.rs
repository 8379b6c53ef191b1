//! Common types used across the application

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which side of the swap is fixed.
///
/// `In` fixes the input amount (Raydium `SwapBaseIn`), `Out` fixes the
/// output amount (Raydium `SwapBaseOut`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapDirection {
    #[default]
    In,
    Out,
}

impl SwapDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwapDirection::In => "in",
            SwapDirection::Out => "out",
        }
    }
}

impl FromStr for SwapDirection {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "in" => Ok(SwapDirection::In),
            "out" => Ok(SwapDirection::Out),
            _ => Err(anyhow::anyhow!("Unknown swap direction: {}", s)),
        }
    }
}

/// The two swaps of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwapLeg {
    Forward,
    Reverse,
}

impl fmt::Display for SwapLeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwapLeg::Forward => write!(f, "forward"),
            SwapLeg::Reverse => write!(f, "reverse"),
        }
    }
}

/// How signed transactions are delivered. Fixed for a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryMode {
    Execute { max_retries: u32 },
    Simulate,
}

impl DeliveryMode {
    pub fn from_flags(execute_swap: bool, max_retries: u32) -> Self {
        if execute_swap {
            DeliveryMode::Execute { max_retries }
        } else {
            DeliveryMode::Simulate
        }
    }

    pub fn is_simulation(&self) -> bool {
        matches!(self, DeliveryMode::Simulate)
    }
}

/// Amount representation with precision
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Amount {
    pub value: u64,
    pub decimals: u8,
}

impl Amount {
    pub fn new(value: u64, decimals: u8) -> Self {
        Self { value, decimals }
    }

    /// Convert a UI amount (e.g. `0.01` SOL) into raw token units.
    ///
    /// Returns `None` for negative, non-finite or overflowing inputs.
    pub fn from_ui(ui_amount: f64, decimals: u8) -> Option<Self> {
        if !ui_amount.is_finite() || ui_amount < 0.0 {
            return None;
        }
        let raw = (ui_amount * 10_f64.powi(decimals as i32)).round();
        if raw > u64::MAX as f64 {
            return None;
        }
        Some(Self::new(raw as u64, decimals))
    }

    pub fn to_ui(&self) -> f64 {
        self.value as f64 / 10_f64.powi(self.decimals as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_from_ui() {
        assert_eq!(Amount::from_ui(0.01, 9), Some(Amount::new(10_000_000, 9)));
        assert_eq!(Amount::from_ui(1.5, 6), Some(Amount::new(1_500_000, 6)));
        assert_eq!(Amount::from_ui(-1.0, 6), None);
        assert_eq!(Amount::from_ui(f64::NAN, 6), None);
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!("IN".parse::<SwapDirection>().unwrap(), SwapDirection::In);
        assert_eq!("out".parse::<SwapDirection>().unwrap(), SwapDirection::Out);
        assert!("sideways".parse::<SwapDirection>().is_err());
    }

    #[test]
    fn test_delivery_mode_from_flags() {
        assert_eq!(DeliveryMode::from_flags(true, 3), DeliveryMode::Execute { max_retries: 3 });
        assert!(DeliveryMode::from_flags(false, 3).is_simulation());
    }
}
