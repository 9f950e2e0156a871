use super::money::{round_cents, Money, MAX_AMOUNT};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Contract value that has passed boundary validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ContractValue(Money);

impl ContractValue {
    pub fn new(amount: Money) -> Result<Self, ContractValueError> {
        if amount < Decimal::ZERO {
            return Err(ContractValueError::Negative(amount));
        }
        if amount > MAX_AMOUNT {
            return Err(ContractValueError::AboveMaximum(amount));
        }
        Ok(Self(amount))
    }

    pub fn amount(self) -> Money {
        self.0
    }
}

impl TryFrom<Money> for ContractValue {
    type Error = ContractValueError;

    fn try_from(value: Money) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ContractValueError {
    #[error("contract value {0} is negative")]
    Negative(Money),
    #[error("contract value {0} is above the accepted maximum")]
    AboveMaximum(Money),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissionTier {
    BelowFloor,
    MinimumTicket,
    MidLow,
    Mid,
    GoodTicket,
    HighTicket,
    GoldIcp,
}

impl CommissionTier {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::BelowFloor,
            Self::MinimumTicket,
            Self::MidLow,
            Self::Mid,
            Self::GoodTicket,
            Self::HighTicket,
            Self::GoldIcp,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::BelowFloor => "Below floor",
            Self::MinimumTicket => "Minimum ticket",
            Self::MidLow => "Mid-low",
            Self::Mid => "Mid",
            Self::GoodTicket => "Good ticket",
            Self::HighTicket => "High ticket",
            Self::GoldIcp => "Gold ICP",
        }
    }

    pub const fn icon(self) -> &'static str {
        match self {
            Self::BelowFloor => "🔴",
            Self::MinimumTicket => "🟠",
            Self::MidLow | Self::Mid => "🟡",
            Self::GoodTicket | Self::HighTicket => "🟢",
            Self::GoldIcp => "🌟",
        }
    }
}

/// How a band derives its commission from the schedule base.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "factor", rename_all = "snake_case")]
pub enum BaseAdjustment {
    Zero,
    Divide(Decimal),
    Multiply(Decimal),
}

impl BaseAdjustment {
    fn apply(self, base: Money) -> Money {
        match self {
            BaseAdjustment::Zero => Decimal::ZERO,
            BaseAdjustment::Divide(divisor) => base.checked_div(divisor).unwrap_or(Decimal::ZERO),
            BaseAdjustment::Multiply(factor) => base.saturating_mul(factor),
        }
    }
}

/// Half-open band `[lower_bound, next band's lower_bound)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionBand {
    pub tier: CommissionTier,
    pub lower_bound: Money,
    pub adjustment: BaseAdjustment,
}

/// Upper bound for a band's `Multiply` factor.
pub const MAX_FACTOR: Decimal = dec!(1000);
/// Lower bound for a band's `Divide` divisor.
pub const MIN_DIVISOR: Decimal = dec!(0.001);

/// Step function mapping a single contract value to a commission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionSchedule {
    pub base: Money,
    /// Cumulative revenue a pipeline must reach before any commission is payable.
    pub trigger_threshold: Money,
    pub bands: Vec<CommissionBand>,
}

impl Default for CommissionSchedule {
    fn default() -> Self {
        Self::standard()
    }
}

impl CommissionSchedule {
    pub fn standard() -> Self {
        let band = |tier, lower_bound, adjustment| CommissionBand {
            tier,
            lower_bound,
            adjustment,
        };

        Self {
            base: dec!(1000.00),
            trigger_threshold: dec!(100000),
            bands: vec![
                band(CommissionTier::BelowFloor, dec!(0), BaseAdjustment::Zero),
                band(
                    CommissionTier::MinimumTicket,
                    dec!(30000),
                    BaseAdjustment::Divide(dec!(2.0)),
                ),
                band(
                    CommissionTier::MidLow,
                    dec!(40000),
                    BaseAdjustment::Divide(dec!(1.5)),
                ),
                band(
                    CommissionTier::Mid,
                    dec!(50000),
                    BaseAdjustment::Divide(dec!(1.2)),
                ),
                band(
                    CommissionTier::GoodTicket,
                    dec!(60000),
                    BaseAdjustment::Multiply(dec!(1.3)),
                ),
                band(
                    CommissionTier::HighTicket,
                    dec!(70000),
                    BaseAdjustment::Multiply(dec!(1.5)),
                ),
                band(
                    CommissionTier::GoldIcp,
                    dec!(90000),
                    BaseAdjustment::Multiply(dec!(1.6)),
                ),
            ],
        }
    }

    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.base < Decimal::ZERO {
            return Err(ScheduleError::NegativeBase(self.base));
        }
        if self.trigger_threshold < Decimal::ZERO {
            return Err(ScheduleError::NegativeThreshold(self.trigger_threshold));
        }
        for amount in [self.base, self.trigger_threshold] {
            if amount > MAX_AMOUNT {
                return Err(ScheduleError::AboveMaximum(amount));
            }
        }

        let first = self.bands.first().ok_or(ScheduleError::Empty)?;
        if !first.lower_bound.is_zero() {
            return Err(ScheduleError::FloorNotAtZero(first.lower_bound));
        }

        for pair in self.bands.windows(2) {
            if pair[1].lower_bound <= pair[0].lower_bound {
                return Err(ScheduleError::UnorderedBands {
                    previous: pair[0].lower_bound,
                    next: pair[1].lower_bound,
                });
            }
        }

        for band in &self.bands {
            match band.adjustment {
                BaseAdjustment::Divide(divisor) if divisor < MIN_DIVISOR => {
                    return Err(ScheduleError::InvalidFactor(band.tier));
                }
                BaseAdjustment::Multiply(factor)
                    if factor < Decimal::ZERO || factor > MAX_FACTOR =>
                {
                    return Err(ScheduleError::InvalidFactor(band.tier));
                }
                _ => {}
            }
        }

        Ok(())
    }

    pub fn classify(&self, value: ContractValue) -> Classification {
        let amount = value.amount();
        let band = self
            .bands
            .iter()
            .rev()
            .find(|band| amount >= band.lower_bound);

        match band {
            Some(band) => {
                let commission = round_cents(band.adjustment.apply(self.base));
                Classification::new(band.tier, commission)
            }
            None => Classification::new(CommissionTier::BelowFloor, Decimal::ZERO),
        }
    }
}

/// Classifies a contract against the standard schedule.
pub fn classify(value: ContractValue) -> Classification {
    CommissionSchedule::standard().classify(value)
}

/// Commission owed for one contract plus its display decoration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub commission: Money,
    pub tier: CommissionTier,
    pub label: &'static str,
    pub icon: &'static str,
}

impl Classification {
    fn new(tier: CommissionTier, commission: Money) -> Self {
        Self {
            commission,
            tier,
            label: tier.label(),
            icon: tier.icon(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScheduleError {
    #[error("commission schedule has no bands")]
    Empty,
    #[error("commission base {0} is negative")]
    NegativeBase(Money),
    #[error("trigger threshold {0} is negative")]
    NegativeThreshold(Money),
    #[error("schedule amount {0} is above the accepted maximum")]
    AboveMaximum(Money),
    #[error("first commission band must start at 0, found {0}")]
    FloorNotAtZero(Money),
    #[error("band lower bounds must increase ({previous} then {next})")]
    UnorderedBands { previous: Money, next: Money },
    #[error("band {0:?} has an invalid factor")]
    InvalidFactor(CommissionTier),
}
