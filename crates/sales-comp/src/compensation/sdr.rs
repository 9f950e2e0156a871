use super::money::{round_cents, Money};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Volume gate applied to the first two pillars.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SdrGatePolicy {
    /// Only the qualified count is gated; high-score leads always pay.
    #[default]
    IndependentPillars,
    /// Qualified plus high-score leads must reach the minimum, gating both pillars.
    CombinedGate,
}

impl SdrGatePolicy {
    pub const fn label(self) -> &'static str {
        match self {
            Self::IndependentPillars => "independent pillars",
            Self::CombinedGate => "combined gate",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "independent" | "independent_pillars" | "a" => Some(Self::IndependentPillars),
            "combined" | "combined_gate" | "b" => Some(Self::CombinedGate),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SdrRates {
    pub minimum_volume: u32,
    pub qualified_rate: Money,
    pub high_score_rate: Money,
    pub closed_deal_rate: Money,
}

impl Default for SdrRates {
    fn default() -> Self {
        Self {
            minimum_volume: 10,
            qualified_rate: dec!(20),
            high_score_rate: dec!(40),
            closed_deal_rate: dec!(600),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdrPlan {
    pub policy: SdrGatePolicy,
    pub rates: SdrRates,
}

/// Production counters for one evaluation period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdrCounters {
    pub qualified: u32,
    pub high_score: u32,
    pub closed_deals: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SdrBreakdown {
    pub policy: SdrGatePolicy,
    pub qualified: u32,
    pub high_score: u32,
    pub closed_deals: u32,
    /// Set when the high-score count exceeded the qualified count and was clamped.
    pub high_score_adjusted: bool,
    pub pillar1: Money,
    pub pillar2: Money,
    pub pillar3: Money,
    pub total: Money,
    pub volume_met: bool,
    pub volume_shortfall: u32,
}

impl SdrPlan {
    pub fn new(policy: SdrGatePolicy) -> Self {
        Self {
            policy,
            rates: SdrRates::default(),
        }
    }

    pub fn evaluate(&self, counters: SdrCounters) -> SdrBreakdown {
        let SdrCounters {
            qualified,
            high_score,
            closed_deals,
        } = counters;
        let high_score_adjusted = high_score > qualified;
        let high_score = high_score.min(qualified);
        let rates = &self.rates;

        let gated_volume = match self.policy {
            SdrGatePolicy::IndependentPillars => qualified,
            SdrGatePolicy::CombinedGate => qualified.saturating_add(high_score),
        };
        let volume_met = gated_volume >= rates.minimum_volume;

        let qualified_pay = Decimal::from(qualified) * rates.qualified_rate;
        let high_score_pay = Decimal::from(high_score) * rates.high_score_rate;

        let (pillar1, pillar2) = match (self.policy, volume_met) {
            (_, true) => (qualified_pay, high_score_pay),
            (SdrGatePolicy::IndependentPillars, false) => (Decimal::ZERO, high_score_pay),
            (SdrGatePolicy::CombinedGate, false) => (Decimal::ZERO, Decimal::ZERO),
        };
        let pillar1 = round_cents(pillar1);
        let pillar2 = round_cents(pillar2);
        let pillar3 = round_cents(Decimal::from(closed_deals) * rates.closed_deal_rate);

        SdrBreakdown {
            policy: self.policy,
            qualified,
            high_score,
            closed_deals,
            high_score_adjusted,
            pillar1,
            pillar2,
            pillar3,
            total: pillar1 + pillar2 + pillar3,
            volume_met,
            volume_shortfall: rates.minimum_volume.saturating_sub(gated_volume),
        }
    }
}
