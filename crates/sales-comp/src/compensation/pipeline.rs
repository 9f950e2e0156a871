use super::closer::{CommissionSchedule, CommissionTier, ContractValue, ContractValueError};
use super::money::{CurrencyFormat, Money};
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

/// One closed contract. The commission is frozen when the entry is created.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DealEntry {
    pub sequence: usize,
    pub contract_value: Money,
    pub tier: CommissionTier,
    pub tier_label: &'static str,
    pub tier_icon: &'static str,
    pub commission: Money,
    pub added_at: DateTime<Utc>,
}

/// Ordered list of deals owned by a single session.
#[derive(Debug, Clone)]
pub struct Pipeline {
    schedule: CommissionSchedule,
    deals: Vec<DealEntry>,
    next_sequence: usize,
}

impl Pipeline {
    pub fn new(schedule: CommissionSchedule) -> Self {
        Self {
            schedule,
            deals: Vec::new(),
            next_sequence: 1,
        }
    }

    /// Swaps the schedule for future additions; existing entries keep their commission.
    pub fn replace_schedule(&mut self, schedule: CommissionSchedule) {
        self.schedule = schedule;
    }

    /// Classifies and appends a deal, returning the stored entry.
    pub fn add(&mut self, value: Money) -> Result<DealEntry, PipelineError> {
        if value <= Decimal::ZERO {
            return Err(PipelineError::NonPositiveValue(value));
        }
        let contract = ContractValue::new(value).map_err(|err| match err {
            ContractValueError::Negative(amount) => PipelineError::NonPositiveValue(amount),
            ContractValueError::AboveMaximum(amount) => PipelineError::AboveMaximum(amount),
        })?;
        let classification = self.schedule.classify(contract);

        let entry = DealEntry {
            sequence: self.next_sequence,
            contract_value: contract.amount(),
            tier: classification.tier,
            tier_label: classification.label,
            tier_icon: classification.icon,
            commission: classification.commission,
            added_at: Utc::now(),
        };
        self.next_sequence += 1;
        self.deals.push(entry.clone());

        Ok(entry)
    }

    pub fn clear(&mut self) {
        self.deals.clear();
        self.next_sequence = 1;
    }

    pub fn deals(&self) -> &[DealEntry] {
        &self.deals
    }

    pub fn len(&self) -> usize {
        self.deals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deals.is_empty()
    }

    pub fn summary(&self) -> PipelineSummary {
        let (total_revenue, total_commission_raw) = self.deals.iter().fold(
            (Decimal::ZERO, Decimal::ZERO),
            |(revenue, commission), deal| {
                (
                    revenue.saturating_add(deal.contract_value),
                    commission.saturating_add(deal.commission),
                )
            },
        );
        let threshold = self.schedule.trigger_threshold;
        let trigger_met = total_revenue >= threshold;

        let progress_fraction = if threshold > Decimal::ZERO {
            total_revenue
                .checked_div(threshold)
                .map_or(Decimal::ONE, |fraction| fraction.min(Decimal::ONE))
        } else {
            Decimal::ONE
        };
        let progress_percent = (progress_fraction * Decimal::ONE_HUNDRED)
            .trunc()
            .to_u8()
            .unwrap_or(100);

        PipelineSummary {
            deal_count: self.deals.len(),
            total_revenue,
            total_commission_raw,
            trigger_threshold: threshold,
            trigger_met,
            final_commission: if trigger_met {
                total_commission_raw
            } else {
                Decimal::ZERO
            },
            progress_fraction,
            progress_percent,
            remaining_to_trigger: threshold.saturating_sub(total_revenue).max(Decimal::ZERO),
            surplus_over_trigger: total_revenue.saturating_sub(threshold).max(Decimal::ZERO),
        }
    }

    pub fn view(&self, format: &CurrencyFormat) -> PipelineView {
        let summary = self.summary();
        let display = SummaryDisplay::new(&summary, format);
        let deals = self
            .deals
            .iter()
            .map(|deal| DealRow {
                sequence: deal.sequence,
                contract_value: deal.contract_value,
                contract_value_display: format.format(deal.contract_value),
                classification: format!("{} {}", deal.tier_icon, deal.tier_label),
                commission: deal.commission,
                commission_display: format.format(deal.commission),
                added_at: deal.added_at,
            })
            .collect();

        PipelineView {
            summary,
            display,
            deals,
        }
    }
}

/// Aggregates derived from the current deal list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineSummary {
    pub deal_count: usize,
    pub total_revenue: Money,
    pub total_commission_raw: Money,
    pub trigger_threshold: Money,
    pub trigger_met: bool,
    pub final_commission: Money,
    pub progress_fraction: Decimal,
    pub progress_percent: u8,
    pub remaining_to_trigger: Money,
    pub surplus_over_trigger: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerStatus {
    Locked,
    Unlocked,
}

impl TriggerStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Locked => "LOCKED",
            Self::Unlocked => "UNLOCKED",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryDisplay {
    pub total_revenue: String,
    pub final_commission: String,
    pub trigger_status: TriggerStatus,
    pub trigger_status_label: &'static str,
    pub trigger_delta: String,
    pub commission_status: &'static str,
    pub progress: String,
}

impl SummaryDisplay {
    fn new(summary: &PipelineSummary, format: &CurrencyFormat) -> Self {
        let (trigger_status, trigger_delta, commission_status) = if summary.trigger_met {
            (
                TriggerStatus::Unlocked,
                format!("+ {}", format.format(summary.surplus_over_trigger)),
                "Confirmed",
            )
        } else {
            (
                TriggerStatus::Locked,
                format!("- {} to go", format.format(summary.remaining_to_trigger)),
                "Pending",
            )
        };

        Self {
            total_revenue: format.format(summary.total_revenue),
            final_commission: format.format(summary.final_commission),
            trigger_status,
            trigger_status_label: trigger_status.label(),
            trigger_delta,
            commission_status,
            progress: format!("Progress to unlock: {}%", summary.progress_percent),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DealRow {
    pub sequence: usize,
    pub contract_value: Money,
    pub contract_value_display: String,
    pub classification: String,
    pub commission: Money,
    pub commission_display: String,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineView {
    pub summary: PipelineSummary,
    pub display: SummaryDisplay,
    pub deals: Vec<DealRow>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    #[error("contract value must be positive, got {0}")]
    NonPositiveValue(Money),
    #[error("contract value {0} is above the accepted maximum")]
    AboveMaximum(Money),
}
