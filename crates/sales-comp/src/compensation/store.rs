use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::pipeline::Pipeline;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A user session and the pipeline it exclusively owns.
#[derive(Debug, Clone)]
pub struct PipelineSession {
    pub id: SessionId,
    pub pipeline: Pipeline,
    pub opened_at: DateTime<Utc>,
}

/// Storage abstraction for session pipelines. Implementations are expected to be
/// in-memory; pipelines do not survive a restart.
pub trait PipelineStore: Send + Sync {
    fn insert(&self, session: PipelineSession) -> Result<(), StoreError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<PipelineSession>, StoreError>;
    /// Runs `apply` against the stored session under exclusive access. Edits to one
    /// session are serialized; `NotFound` when the id is unknown.
    fn modify<T, F>(&self, id: &SessionId, apply: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut PipelineSession) -> T;
    fn remove(&self, id: &SessionId) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session already exists")]
    Conflict,
    #[error("session not found")]
    NotFound,
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}
