use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::compensation::access::LeadershipGate;
use crate::compensation::policy::CompensationPolicy;
use crate::compensation::router::compensation_router;
use crate::compensation::service::CompensationService;
use crate::compensation::store::{PipelineSession, PipelineStore, SessionId, StoreError};

pub(super) const LEADERSHIP_SECRET: &str = "board-2025";

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    sessions: Arc<Mutex<HashMap<SessionId, PipelineSession>>>,
}

impl MemoryStore {
    pub(super) fn len(&self) -> usize {
        self.sessions.lock().expect("lock").len()
    }
}

impl PipelineStore for MemoryStore {
    fn insert(&self, session: PipelineSession) -> Result<(), StoreError> {
        let mut guard = self.sessions.lock().expect("lock");
        if guard.contains_key(&session.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(session.id.clone(), session);
        Ok(())
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<PipelineSession>, StoreError> {
        let guard = self.sessions.lock().expect("lock");
        Ok(guard.get(id).cloned())
    }

    fn modify<T, F>(&self, id: &SessionId, apply: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut PipelineSession) -> T,
    {
        let mut guard = self.sessions.lock().expect("lock");
        guard.get_mut(id).map(apply).ok_or(StoreError::NotFound)
    }

    fn remove(&self, id: &SessionId) -> Result<(), StoreError> {
        let mut guard = self.sessions.lock().expect("lock");
        guard.remove(id).map(|_| ()).ok_or(StoreError::NotFound)
    }
}

pub(super) struct UnavailableStore;

impl PipelineStore for UnavailableStore {
    fn insert(&self, _session: PipelineSession) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<PipelineSession>, StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }

    fn modify<T, F>(&self, _id: &SessionId, _apply: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut PipelineSession) -> T,
    {
        Err(StoreError::Unavailable("offline".to_string()))
    }

    fn remove(&self, _id: &SessionId) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }
}

pub(super) fn build_service_with(
    policy: CompensationPolicy,
) -> (CompensationService<MemoryStore>, MemoryStore) {
    let store = MemoryStore::default();
    let service = CompensationService::new(
        Arc::new(store.clone()),
        policy,
        LeadershipGate::new(LEADERSHIP_SECRET),
    );
    (service, store)
}

pub(super) fn build_service() -> (CompensationService<MemoryStore>, MemoryStore) {
    build_service_with(CompensationPolicy::default())
}

pub(super) fn router_with_service(service: CompensationService<MemoryStore>) -> axum::Router {
    compensation_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
