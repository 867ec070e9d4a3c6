use crate::error::AnalyticsError;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

/// Direction of a simulated investment over the period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Gain,
    Loss,
    Unchanged,
}

/// What an amount invested at the first bar would be worth at the last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatedInvestment {
    pub amount: Decimal,
    /// Profit or loss, rounded to cents.
    pub delta: Decimal,
    pub final_value: Decimal,
}

impl SimulatedInvestment {
    /// Applies a period return (e.g. `0.25` for +25%) to `amount`.
    pub fn from_return(amount: Decimal, total_return: f64) -> Result<Self, AnalyticsError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(AnalyticsError::InvalidAmount(amount.to_string()));
        }

        let rate =
            Decimal::from_f64(total_return).ok_or(AnalyticsError::NonFiniteReturn(total_return))?;
        let overflow = || AnalyticsError::AmountOverflow(amount.to_string());
        let delta = amount.checked_mul(rate).ok_or_else(overflow)?.round_dp(2);
        let final_value = amount.checked_add(delta).ok_or_else(overflow)?;

        Ok(Self {
            amount,
            delta,
            final_value,
        })
    }

    pub fn outcome(&self) -> Outcome {
        if self.delta > Decimal::ZERO {
            Outcome::Gain
        } else if self.delta < Decimal::ZERO {
            Outcome::Loss
        } else {
            Outcome::Unchanged
        }
    }
}
