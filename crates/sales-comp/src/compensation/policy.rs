use super::closer::{CommissionSchedule, ScheduleError};
use super::head::{HeadStrategy, MatrixError};
use super::sdr::SdrPlan;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Every tunable rule of the compensation plan. Missing sections fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompensationPolicy {
    pub closer: CommissionSchedule,
    pub sdr: SdrPlan,
    pub head: HeadStrategy,
}

impl CompensationPolicy {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, PolicyError> {
        let policy: Self = serde_json::from_reader(reader)?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn validate(&self) -> Result<(), PolicyError> {
        self.closer.validate()?;
        self.head.validate()?;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("failed to read policy file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid policy JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid closer schedule: {0}")]
    Schedule(#[from] ScheduleError),
    #[error("invalid head strategy: {0}")]
    Head(#[from] MatrixError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compensation::head::MultiplierMatrix;
    use crate::compensation::sdr::SdrGatePolicy;
    use rust_decimal_macros::dec;

    #[test]
    fn empty_document_yields_defaults() {
        let policy = CompensationPolicy::from_reader("{}".as_bytes()).expect("defaults load");
        assert_eq!(policy, CompensationPolicy::default());
        assert_eq!(policy.sdr.policy, SdrGatePolicy::IndependentPillars);
        assert_eq!(
            policy.head,
            HeadStrategy::MultiplierMatrix(MultiplierMatrix::conservative())
        );
    }

    #[test]
    fn sections_can_be_overridden() {
        let json = r#"{
            "sdr": { "policy": "combined_gate" },
            "head": {
                "strategy": "rate_bonus",
                "on_target_rate": 0.06,
                "below_target_rate": 0.03,
                "attainment_target_pct": 100,
                "mid_milestone_bonus": 1000,
                "top_milestone_bonus": 3000
            }
        }"#;

        let policy = CompensationPolicy::from_reader(json.as_bytes()).expect("policy loads");
        assert_eq!(policy.sdr.policy, SdrGatePolicy::CombinedGate);
        assert_eq!(policy.sdr.rates.closed_deal_rate, dec!(600));
        match policy.head {
            HeadStrategy::RateBonus(plan) => {
                assert_eq!(plan.on_target_rate, dec!(0.06));
                assert_eq!(plan.top_milestone_bonus, dec!(3000));
            }
            other => panic!("expected rate bonus strategy, got {other:?}"),
        }
    }

    #[test]
    fn custom_matrix_is_validated() {
        let json = r#"{
            "head": {
                "strategy": "multiplier_matrix",
                "rows": [[0.5, 0.6, 0.7], [0.8, -0.9, 1.0], [1.1, 1.2, 1.3]]
            }
        }"#;

        let err = CompensationPolicy::from_reader(json.as_bytes()).expect_err("negative cell");
        assert!(matches!(
            err,
            PolicyError::Head(MatrixError::NegativeMultiplier { row: 1, column: 1, .. })
        ));
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = CompensationPolicy::from_reader("{ not json".as_bytes()).expect_err("bad json");
        assert!(matches!(err, PolicyError::Json(_)));
    }
}
