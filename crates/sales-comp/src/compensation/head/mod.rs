//! Leadership payout derived from Closer results and SDR team attainment.
//!
//! Two incompatible designs are supported side by side; callers choose one through
//! [`HeadStrategy`]. Both classify the same two inputs into bands first, then read the
//! payout parameters from the strategy's table.

mod bands;
mod strategy;

pub use bands::{
    sdr_attainment_pct, CloserBand, SdrBand, CLOSER_STRETCH_REVENUE, CLOSER_TOP_REVENUE,
    CLOSER_UNLOCK_REVENUE, SDR_NEAR_TARGET_PCT, SDR_ON_TARGET_PCT,
};
pub use strategy::{HeadStrategy, MatrixError, MultiplierMatrix, RateBonusPlan};

use super::money::{round_cents, Money, MAX_AMOUNT};
use super::pipeline::PipelineSummary;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Facts the Head evaluation depends on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HeadInputs {
    pub closer_revenue: Money,
    pub closer_final_commission: Money,
    pub high_score_delivered: u32,
    pub high_score_target: u32,
}

impl HeadInputs {
    pub fn from_summary(
        summary: &PipelineSummary,
        high_score_delivered: u32,
        high_score_target: u32,
    ) -> Self {
        Self {
            closer_revenue: summary.total_revenue,
            closer_final_commission: summary.final_commission,
            high_score_delivered,
            high_score_target,
        }
    }

    /// Rejects amounts outside `[0, MAX_AMOUNT]`.
    pub fn validate(&self) -> Result<(), HeadError> {
        let amounts = [
            ("closer_revenue", self.closer_revenue),
            ("closer_final_commission", self.closer_final_commission),
        ];
        for (field, value) in amounts {
            if value < Decimal::ZERO || value > MAX_AMOUNT {
                return Err(HeadError::OutOfRange { field, value });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadEvaluation {
    pub strategy: &'static str,
    pub sdr_attainment_pct: Decimal,
    pub sdr_band: SdrBand,
    pub closer_band: CloserBand,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue_rate: Option<Decimal>,
    pub milestone_bonus: Money,
    pub head_commission: Money,
}

impl HeadStrategy {
    pub fn evaluate(&self, inputs: &HeadInputs) -> Result<HeadEvaluation, HeadError> {
        inputs.validate()?;
        let sdr_attainment_pct =
            sdr_attainment_pct(inputs.high_score_delivered, inputs.high_score_target);
        let sdr_band = SdrBand::from_attainment(sdr_attainment_pct);
        let closer_band = CloserBand::from_revenue(inputs.closer_revenue);

        let mut evaluation = HeadEvaluation {
            strategy: self.label(),
            sdr_attainment_pct,
            sdr_band,
            closer_band,
            multiplier: None,
            revenue_rate: None,
            milestone_bonus: Decimal::ZERO,
            head_commission: Decimal::ZERO,
        };

        match self {
            HeadStrategy::MultiplierMatrix(matrix) => {
                let multiplier = closer_band
                    .index()
                    .and_then(|column| matrix.lookup(sdr_band.index(), column));
                if let Some(multiplier) = multiplier {
                    evaluation.multiplier = Some(multiplier);
                    let commission = inputs
                        .closer_final_commission
                        .checked_mul(multiplier)
                        .ok_or(HeadError::Overflow)?;
                    evaluation.head_commission = round_cents(commission);
                }
            }
            HeadStrategy::RateBonus(plan) => {
                let rate = if sdr_attainment_pct >= plan.attainment_target_pct {
                    plan.on_target_rate
                } else {
                    plan.below_target_rate
                };
                let bonus = match closer_band {
                    CloserBand::Locked => Decimal::ZERO,
                    CloserBand::Unlocked | CloserBand::Stretch => plan.mid_milestone_bonus,
                    CloserBand::Top => plan.top_milestone_bonus,
                };
                evaluation.revenue_rate = Some(rate);
                evaluation.milestone_bonus = bonus;
                let commission = inputs
                    .closer_revenue
                    .checked_mul(rate)
                    .and_then(|variable| variable.checked_add(bonus))
                    .ok_or(HeadError::Overflow)?;
                evaluation.head_commission = round_cents(commission);
            }
        }

        Ok(evaluation)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HeadError {
    #[error("{field} {value} is outside the accepted range")]
    OutOfRange { field: &'static str, value: Money },
    #[error("head commission exceeds the representable range")]
    Overflow,
}
