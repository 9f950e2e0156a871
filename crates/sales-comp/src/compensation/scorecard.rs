use serde::{Deserialize, Serialize};

/// Minimum score for a lead to count as high score.
pub const HIGH_SCORE_THRESHOLD: u8 = 75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    UnitsOver200,
    Urgency,
    OpennessToProposal,
    ClearPain,
    SupplierSwitchHistory,
    AccessibleDecisionMaker,
}

impl Criterion {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::UnitsOver200,
            Self::Urgency,
            Self::OpennessToProposal,
            Self::ClearPain,
            Self::SupplierSwitchHistory,
            Self::AccessibleDecisionMaker,
        ]
    }

    pub const fn weight(self) -> u8 {
        match self {
            Self::UnitsOver200 => 25,
            Self::Urgency | Self::OpennessToProposal => 20,
            Self::ClearPain => 15,
            Self::SupplierSwitchHistory | Self::AccessibleDecisionMaker => 10,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::UnitsOver200 => "Units / employees at least 200",
            Self::Urgency => "Project urgency",
            Self::OpennessToProposal => "Openness to a proposal",
            Self::ClearPain => "Clear pain identified",
            Self::SupplierSwitchHistory => "History of switching suppliers",
            Self::AccessibleDecisionMaker => "Accessible decision maker",
        }
    }

    pub const fn importance(self) -> Importance {
        match self {
            Self::UnitsOver200 | Self::Urgency | Self::OpennessToProposal => Importance::High,
            Self::ClearPain | Self::SupplierSwitchHistory => Importance::Medium,
            Self::AccessibleDecisionMaker => Importance::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    High,
    Medium,
    Low,
}

/// The six yes/no qualification questions for a lead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorecardCriteria {
    pub units_over_200: bool,
    pub urgency: bool,
    pub openness_to_proposal: bool,
    pub clear_pain: bool,
    pub supplier_switch_history: bool,
    pub accessible_decision_maker: bool,
}

impl ScorecardCriteria {
    pub fn is_met(&self, criterion: Criterion) -> bool {
        match criterion {
            Criterion::UnitsOver200 => self.units_over_200,
            Criterion::Urgency => self.urgency,
            Criterion::OpennessToProposal => self.openness_to_proposal,
            Criterion::ClearPain => self.clear_pain,
            Criterion::SupplierSwitchHistory => self.supplier_switch_history,
            Criterion::AccessibleDecisionMaker => self.accessible_decision_maker,
        }
    }

    pub fn score(&self) -> ScorecardResult {
        let met: Vec<Criterion> = Criterion::ordered()
            .into_iter()
            .filter(|criterion| self.is_met(*criterion))
            .collect();
        let score: u8 = met.iter().map(|criterion| criterion.weight()).sum();

        ScorecardResult {
            score,
            high_score: score >= HIGH_SCORE_THRESHOLD,
            points_to_high_score: HIGH_SCORE_THRESHOLD.saturating_sub(score),
            met,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScorecardResult {
    pub score: u8,
    pub high_score: bool,
    pub points_to_high_score: u8,
    pub met: Vec<Criterion>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RubricEntry {
    pub criterion: Criterion,
    pub label: &'static str,
    pub weight: u8,
    pub importance: Importance,
}

/// Official weight table, in display order.
pub fn rubric() -> Vec<RubricEntry> {
    Criterion::ordered()
        .into_iter()
        .map(|criterion| RubricEntry {
            criterion,
            label: criterion.label(),
            weight: criterion.weight(),
            importance: criterion.importance(),
        })
        .collect()
}
