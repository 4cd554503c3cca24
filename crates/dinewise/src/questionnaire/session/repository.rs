use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::super::answers::AnswerSet;
use super::super::catalog::Recommendation;
use super::super::flow::{FlowStage, SessionFlow};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stored session: the flow plus bookkeeping timestamps.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub id: SessionId,
    /// Bumped on every successful write; stores compare it to reject stale copies.
    pub version: u64,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub flow: SessionFlow,
}

impl SessionRecord {
    pub fn view(&self) -> SessionView {
        let state = self.flow.state();
        let schema = self.flow.recommender().schema();
        let total = schema.questions().len();

        let question = match state.stage {
            FlowStage::Asking { index } => schema.question(index).map(|question| QuestionView {
                number: index + 1,
                total,
                attribute: question.attribute,
                prompt: question.prompt,
                options: question.options.clone(),
                can_go_back: index > 0,
            }),
            _ => None,
        };

        SessionView {
            session_id: self.id.clone(),
            status: state.stage.label(),
            started_at: self.started_at,
            updated_at: self.updated_at,
            answers: state.answers.clone(),
            question,
            recommendation: self.flow.recommendation(),
            message: self.flow.message(),
        }
    }
}

/// Storage abstraction so the service can be exercised in isolation.
pub trait SessionStore: Send + Sync {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, StoreError>;
    /// Replaces the stored record only while it is still at `expected_version`; otherwise
    /// another writer got there first and the call fails with [`StoreError::Conflict`].
    fn update(&self, record: SessionRecord, expected_version: u64) -> Result<(), StoreError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, StoreError>;
    fn remove(&self, id: &SessionId) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session already exists or was modified concurrently")]
    Conflict,
    #[error("session not found")]
    NotFound,
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

/// Snapshot adapters render; carries everything needed for the next prompt.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub status: &'static str,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub answers: AnswerSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<Recommendation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub number: usize,
    pub total: usize,
    pub attribute: &'static str,
    pub prompt: &'static str,
    pub options: Vec<&'static str>,
    pub can_go_back: bool,
}
