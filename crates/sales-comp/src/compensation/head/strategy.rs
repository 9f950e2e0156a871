use super::super::money::Money;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Head multiplier table, rows indexed by SDR band and columns by unlocked Closer band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiplierMatrix {
    pub rows: [[Decimal; 3]; 3],
}

impl Default for MultiplierMatrix {
    fn default() -> Self {
        Self::conservative()
    }
}

impl MultiplierMatrix {
    pub fn conservative() -> Self {
        Self {
            rows: [
                [dec!(0.80), dec!(0.85), dec!(0.90)],
                [dec!(0.95), dec!(1.00), dec!(1.00)],
                [dec!(1.05), dec!(1.10), dec!(1.15)],
            ],
        }
    }

    pub fn progressive() -> Self {
        Self {
            rows: [
                [dec!(0.5), dec!(0.6), dec!(0.7)],
                [dec!(0.8), dec!(0.9), dec!(1.0)],
                [dec!(1.1), dec!(1.2), dec!(1.3)],
            ],
        }
    }

    pub fn preset(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "conservative" => Some(Self::conservative()),
            "progressive" => Some(Self::progressive()),
            _ => None,
        }
    }

    pub fn lookup(&self, sdr_index: usize, closer_index: usize) -> Option<Decimal> {
        self.rows
            .get(sdr_index)
            .and_then(|row| row.get(closer_index))
            .copied()
    }

    pub fn validate(&self) -> Result<(), MatrixError> {
        for (row_idx, row) in self.rows.iter().enumerate() {
            for (col_idx, value) in row.iter().enumerate() {
                if *value < Decimal::ZERO {
                    return Err(MatrixError::NegativeMultiplier {
                        row: row_idx,
                        column: col_idx,
                        value: *value,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Flat share of Closer revenue plus a revenue milestone bonus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateBonusPlan {
    pub on_target_rate: Decimal,
    pub below_target_rate: Decimal,
    pub attainment_target_pct: Decimal,
    /// Paid for Closer revenue in [100000, 150000).
    pub mid_milestone_bonus: Money,
    /// Paid for Closer revenue of 150000 and above.
    pub top_milestone_bonus: Money,
}

impl Default for RateBonusPlan {
    fn default() -> Self {
        Self {
            on_target_rate: dec!(0.05),
            below_target_rate: dec!(0.025),
            attainment_target_pct: dec!(100),
            mid_milestone_bonus: dec!(1500),
            top_milestone_bonus: dec!(4000),
        }
    }
}

impl RateBonusPlan {
    pub fn validate(&self) -> Result<(), MatrixError> {
        let values = [
            self.on_target_rate,
            self.below_target_rate,
            self.attainment_target_pct,
            self.mid_milestone_bonus,
            self.top_milestone_bonus,
        ];
        if values.iter().any(|value| *value < Decimal::ZERO) {
            return Err(MatrixError::NegativeRate);
        }
        Ok(())
    }
}

/// Selectable Head payout design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum HeadStrategy {
    MultiplierMatrix(MultiplierMatrix),
    RateBonus(RateBonusPlan),
}

impl Default for HeadStrategy {
    fn default() -> Self {
        Self::MultiplierMatrix(MultiplierMatrix::conservative())
    }
}

impl HeadStrategy {
    pub fn label(&self) -> &'static str {
        match self {
            Self::MultiplierMatrix(_) => "multiplier_matrix",
            Self::RateBonus(_) => "rate_bonus",
        }
    }

    pub fn validate(&self) -> Result<(), MatrixError> {
        match self {
            Self::MultiplierMatrix(matrix) => matrix.validate(),
            Self::RateBonus(plan) => plan.validate(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MatrixError {
    #[error("multiplier at row {row}, column {column} is negative ({value})")]
    NegativeMultiplier {
        row: usize,
        column: usize,
        value: Decimal,
    },
    #[error("rate and bonus parameters must not be negative")]
    NegativeRate,
}
