//! Commission rule engine for the Closer, SDR and Head roles.
//!
//! Calculators are pure functions of their inputs. The only state is the per-session
//! [`Pipeline`], which callers own explicitly and reach through [`CompensationService`].

pub mod access;
pub mod closer;
pub mod head;
pub mod import;
pub mod money;
pub mod pipeline;
pub mod policy;
pub mod router;
pub mod scorecard;
pub mod sdr;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use access::{AccessDenied, LeadershipAccess, LeadershipGate};
pub use closer::{
    classify, BaseAdjustment, Classification, CommissionBand, CommissionSchedule, CommissionTier,
    ContractValue, ContractValueError, ScheduleError,
};
pub use head::{
    CloserBand, HeadError, HeadEvaluation, HeadInputs, HeadStrategy, MultiplierMatrix,
    RateBonusPlan, SdrBand,
};
pub use import::{import_deals, DealImportError, ImportReport};
pub use money::{
    format_currency, parse_amount, parse_currency, CurrencyFormat, CurrencyParseError, Money,
    MAX_AMOUNT,
};
pub use pipeline::{
    DealEntry, DealRow, Pipeline, PipelineError, PipelineSummary, PipelineView, SummaryDisplay,
    TriggerStatus,
};
pub use policy::{CompensationPolicy, PolicyError};
pub use router::compensation_router;
pub use scorecard::{
    rubric, Criterion, Importance, RubricEntry, ScorecardCriteria, ScorecardResult,
    HIGH_SCORE_THRESHOLD,
};
pub use sdr::{SdrBreakdown, SdrCounters, SdrGatePolicy, SdrPlan, SdrRates};
pub use service::{CompensationService, ServiceError, SessionView};
pub use store::{PipelineSession, PipelineStore, SessionId, StoreError};
