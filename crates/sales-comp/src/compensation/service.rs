use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::access::{AccessDenied, LeadershipAccess, LeadershipGate};
use super::closer::{Classification, ContractValue, ContractValueError};
use super::head::{HeadError, HeadEvaluation, HeadInputs};
use super::money::{CurrencyFormat, Money};
use super::pipeline::{Pipeline, PipelineError, PipelineView};
use super::policy::CompensationPolicy;
use super::scorecard::{rubric, RubricEntry, ScorecardCriteria, ScorecardResult};
use super::sdr::{SdrBreakdown, SdrCounters};
use super::store::{PipelineSession, PipelineStore, SessionId, StoreError};

/// Service composing the policy, the session store and the leadership gate.
pub struct CompensationService<S> {
    store: Arc<S>,
    policy: Arc<CompensationPolicy>,
    gate: Arc<LeadershipGate>,
    currency: CurrencyFormat,
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("session-{id:06}"))
}

impl<S> CompensationService<S>
where
    S: PipelineStore + 'static,
{
    pub fn new(store: Arc<S>, policy: CompensationPolicy, gate: LeadershipGate) -> Self {
        Self {
            store,
            policy: Arc::new(policy),
            gate: Arc::new(gate),
            currency: CurrencyFormat::default(),
        }
    }

    pub fn with_currency(mut self, currency: CurrencyFormat) -> Self {
        self.currency = currency;
        self
    }

    pub fn policy(&self) -> &CompensationPolicy {
        &self.policy
    }

    /// Start a session with an empty pipeline bound to the current Closer schedule.
    pub fn open_session(&self) -> Result<SessionView, ServiceError> {
        let session = PipelineSession {
            id: next_session_id(),
            pipeline: Pipeline::new(self.policy.closer.clone()),
            opened_at: Utc::now(),
        };
        self.store.insert(session.clone())?;
        debug!(session = %session.id, "pipeline session opened");
        Ok(self.session_view(&session))
    }

    pub fn pipeline(&self, id: &SessionId) -> Result<SessionView, ServiceError> {
        let session = self.fetch(id)?;
        Ok(self.session_view(&session))
    }

    pub fn add_deal(&self, id: &SessionId, value: Money) -> Result<SessionView, ServiceError> {
        let (entry, view) = self.store.modify(id, |session| {
            let entry = session.pipeline.add(value)?;
            Ok::<_, PipelineError>((entry, self.session_view(session)))
        })??;
        info!(
            session = %id,
            contract_value = %entry.contract_value,
            commission = %entry.commission,
            tier = entry.tier_label,
            "deal added to pipeline"
        );
        Ok(view)
    }

    pub fn clear_pipeline(&self, id: &SessionId) -> Result<SessionView, ServiceError> {
        let view = self.store.modify(id, |session| {
            session.pipeline.clear();
            self.session_view(session)
        })?;
        info!(session = %id, "pipeline cleared");
        Ok(view)
    }

    pub fn close_session(&self, id: &SessionId) -> Result<(), ServiceError> {
        self.store.remove(id)?;
        debug!(session = %id, "pipeline session closed");
        Ok(())
    }

    pub fn classify(&self, value: Money) -> Result<Classification, ServiceError> {
        let value = ContractValue::new(value)?;
        Ok(self.policy.closer.classify(value))
    }

    pub fn evaluate_sdr(&self, counters: SdrCounters) -> SdrBreakdown {
        let breakdown = self.policy.sdr.evaluate(counters);
        if breakdown.high_score_adjusted {
            debug!(
                requested = counters.high_score,
                clamped = breakdown.high_score,
                "high-score leads clamped to qualified total"
            );
        }
        breakdown
    }

    pub fn score_lead(&self, criteria: &ScorecardCriteria) -> ScorecardResult {
        criteria.score()
    }

    pub fn rubric(&self) -> Vec<RubricEntry> {
        rubric()
    }

    pub fn unlock(&self, credential: &str) -> Result<LeadershipAccess, ServiceError> {
        self.gate.unlock(credential).map_err(|denied| {
            warn!("leadership panel access denied");
            ServiceError::Access(denied)
        })
    }

    pub fn evaluate_head(
        &self,
        credential: &str,
        inputs: &HeadInputs,
    ) -> Result<HeadEvaluation, ServiceError> {
        let _access = self.unlock(credential)?;
        Ok(self.policy.head.evaluate(inputs)?)
    }

    /// Evaluate the Head payout from a session's live pipeline summary.
    pub fn evaluate_head_for_session(
        &self,
        credential: &str,
        id: &SessionId,
        high_score_delivered: u32,
        high_score_target: u32,
    ) -> Result<HeadEvaluation, ServiceError> {
        let _access = self.unlock(credential)?;
        let session = self.fetch(id)?;
        let inputs = HeadInputs::from_summary(
            &session.pipeline.summary(),
            high_score_delivered,
            high_score_target,
        );
        Ok(self.policy.head.evaluate(&inputs)?)
    }

    fn fetch(&self, id: &SessionId) -> Result<PipelineSession, ServiceError> {
        let session = self.store.fetch(id)?.ok_or(StoreError::NotFound)?;
        Ok(session)
    }

    fn session_view(&self, session: &PipelineSession) -> SessionView {
        SessionView {
            session_id: session.id.clone(),
            opened_at: session.opened_at,
            pipeline: session.pipeline.view(&self.currency),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub opened_at: DateTime<Utc>,
    #[serde(flatten)]
    pub pipeline: PipelineView,
}

/// Error raised by the compensation service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    ContractValue(#[from] ContractValueError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Access(#[from] AccessDenied),
    #[error(transparent)]
    Head(#[from] HeadError),
}
