use metrics_exporter_prometheus::PrometheusHandle;
use sales_comp::compensation::{
    parse_amount, CompensationPolicy, CurrencyFormat, Money, PipelineSession, PipelineStore,
    SessionId, StoreError,
};
use sales_comp::config::AppConfig;
use sales_comp::error::AppError;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) policy: Arc<CompensationPolicy>,
    pub(crate) currency: CurrencyFormat,
}

/// Session pipelines held in process memory; a restart drops every session.
#[derive(Default, Clone)]
pub(crate) struct InMemoryPipelineStore {
    sessions: Arc<Mutex<HashMap<SessionId, PipelineSession>>>,
}

impl InMemoryPipelineStore {
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<SessionId, PipelineSession>>, StoreError> {
        self.sessions
            .lock()
            .map_err(|_| StoreError::Unavailable("session store mutex poisoned".to_string()))
    }
}

impl PipelineStore for InMemoryPipelineStore {
    fn insert(&self, session: PipelineSession) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        if guard.contains_key(&session.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(session.id.clone(), session);
        Ok(())
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<PipelineSession>, StoreError> {
        let guard = self.lock()?;
        Ok(guard.get(id).cloned())
    }

    fn modify<T, F>(&self, id: &SessionId, apply: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut PipelineSession) -> T,
    {
        let mut guard = self.lock()?;
        guard.get_mut(id).map(apply).ok_or(StoreError::NotFound)
    }

    fn remove(&self, id: &SessionId) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        guard.remove(id).map(|_| ()).ok_or(StoreError::NotFound)
    }
}

/// Loads configuration and resolves the active compensation policy.
pub(crate) fn load_policy() -> Result<(AppConfig, CompensationPolicy), AppError> {
    let config = AppConfig::load()?;
    let policy = config.compensation.resolve_policy()?;
    Ok((config, policy))
}

/// Accepts `35000.50` as well as `R$ 35.000,50`.
pub(crate) fn parse_money(raw: &str) -> Result<Money, String> {
    parse_amount(raw, &CurrencyFormat::brl())
        .map_err(|err| format!("failed to parse '{raw}' as an amount ({err})"))
}
