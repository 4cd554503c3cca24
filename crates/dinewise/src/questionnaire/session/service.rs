use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use super::super::checks::{run_checks, standard_cases, CheckResult};
use super::super::engine::Explanation;
use super::super::flow::{FlowError, SessionFlow};
use super::super::recommender::Recommender;
use super::repository::{SessionId, SessionRecord, SessionStore, StoreError};

/// Service composing the shared recommender with per-session storage.
///
/// Each call fetches the session, applies the operation to a copy, and writes the copy back
/// only when the operation succeeded and no other request wrote the session in between.
pub struct RecommenderService<S> {
    recommender: Arc<Recommender>,
    store: Arc<S>,
}

/// Random ids so one client cannot guess and drive another client's flow.
fn next_session_id() -> SessionId {
    SessionId(format!("session-{}", Uuid::new_v4().simple()))
}

impl<S> RecommenderService<S>
where
    S: SessionStore + 'static,
{
    pub fn new(recommender: Arc<Recommender>, store: Arc<S>) -> Self {
        Self { recommender, store }
    }

    pub fn recommender(&self) -> &Recommender {
        &self.recommender
    }

    /// Open a fresh session waiting on the region question.
    pub fn start(&self) -> Result<SessionRecord, RecommenderServiceError> {
        let now = Utc::now();
        let record = SessionRecord {
            id: next_session_id(),
            version: 0,
            started_at: now,
            updated_at: now,
            flow: SessionFlow::start(self.recommender.clone()),
        };

        let stored = self.store.insert(record)?;
        info!(session = %stored.id, "session started");
        Ok(stored)
    }

    pub fn get(&self, id: &SessionId) -> Result<SessionRecord, RecommenderServiceError> {
        let record = self.store.fetch(id)?.ok_or(StoreError::NotFound)?;
        Ok(record)
    }

    pub fn confirm_region(
        &self,
        id: &SessionId,
        in_region: bool,
    ) -> Result<SessionRecord, RecommenderServiceError> {
        self.transition(id, |flow| flow.confirm_region(in_region).map(drop))
    }

    pub fn submit_answer(
        &self,
        id: &SessionId,
        attribute: &str,
        value: &str,
    ) -> Result<SessionRecord, RecommenderServiceError> {
        debug!(session = %id, attribute, value, "answer submitted");
        self.transition(id, |flow| flow.submit_answer(attribute, value).map(drop))
    }

    pub fn go_back(&self, id: &SessionId) -> Result<SessionRecord, RecommenderServiceError> {
        self.transition(id, |flow| flow.go_back().map(drop))
    }

    pub fn restart(&self, id: &SessionId) -> Result<SessionRecord, RecommenderServiceError> {
        self.transition(id, |flow| {
            flow.restart();
            Ok(())
        })
    }

    /// Drop a session once its adapter is done with it.
    pub fn discard(&self, id: &SessionId) -> Result<(), RecommenderServiceError> {
        self.store.remove(id)?;
        info!(session = %id, "session discarded");
        Ok(())
    }

    pub fn explain(&self, id: &SessionId) -> Result<Explanation, RecommenderServiceError> {
        Ok(self.get(id)?.flow.explain())
    }

    pub fn self_check(&self) -> Vec<CheckResult> {
        run_checks(&self.recommender, &standard_cases())
    }

    fn transition<F>(&self, id: &SessionId, apply: F) -> Result<SessionRecord, RecommenderServiceError>
    where
        F: FnOnce(&mut SessionFlow) -> Result<(), FlowError>,
    {
        let mut record = self.get(id)?;
        let expected_version = record.version;
        apply(&mut record.flow)?;
        record.version = expected_version + 1;
        record.updated_at = Utc::now();
        self.store.update(record.clone(), expected_version)?;
        debug!(session = %id, stage = record.flow.state().stage.label(), "session updated");
        Ok(record)
    }
}

/// Error raised by the recommender service.
#[derive(Debug, thiserror::Error)]
pub enum RecommenderServiceError {
    #[error(transparent)]
    Flow(#[from] FlowError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
