use super::super::money::Money;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

pub const SDR_NEAR_TARGET_PCT: Decimal = dec!(90);
pub const SDR_ON_TARGET_PCT: Decimal = dec!(100);

pub const CLOSER_UNLOCK_REVENUE: Money = dec!(100000);
pub const CLOSER_STRETCH_REVENUE: Money = dec!(130000);
pub const CLOSER_TOP_REVENUE: Money = dec!(150000);

/// Share of the high-score team target delivered, in percent. Zero when there is no target.
pub fn sdr_attainment_pct(delivered: u32, target: u32) -> Decimal {
    if target == 0 {
        return Decimal::ZERO;
    }
    Decimal::from(delivered) * Decimal::ONE_HUNDRED / Decimal::from(target)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SdrBand {
    /// Below 90%.
    BelowTarget,
    /// [90%, 100%).
    NearTarget,
    /// 100% and above.
    OnTarget,
}

impl SdrBand {
    pub fn from_attainment(pct: Decimal) -> Self {
        if pct >= SDR_ON_TARGET_PCT {
            Self::OnTarget
        } else if pct >= SDR_NEAR_TARGET_PCT {
            Self::NearTarget
        } else {
            Self::BelowTarget
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::BelowTarget => 0,
            Self::NearTarget => 1,
            Self::OnTarget => 2,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::BelowTarget => "Below 90%",
            Self::NearTarget => "90% to 99%",
            Self::OnTarget => "100% or more",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloserBand {
    /// Below the pipeline trigger; no Head payout under the matrix strategy.
    Locked,
    /// [100000, 130000).
    Unlocked,
    /// [130000, 150000).
    Stretch,
    /// 150000 and above.
    Top,
}

impl CloserBand {
    pub fn from_revenue(revenue: Money) -> Self {
        if revenue >= CLOSER_TOP_REVENUE {
            Self::Top
        } else if revenue >= CLOSER_STRETCH_REVENUE {
            Self::Stretch
        } else if revenue >= CLOSER_UNLOCK_REVENUE {
            Self::Unlocked
        } else {
            Self::Locked
        }
    }

    /// Matrix column, absent while locked.
    pub const fn index(self) -> Option<usize> {
        match self {
            Self::Locked => None,
            Self::Unlocked => Some(0),
            Self::Stretch => Some(1),
            Self::Top => Some(2),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Locked => "Locked (below 100k)",
            Self::Unlocked => "100k to 130k",
            Self::Stretch => "130k to 150k",
            Self::Top => "150k or more",
        }
    }
}
