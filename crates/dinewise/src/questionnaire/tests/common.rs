use std::collections::HashMap;
use std::sync::{Arc, Barrier, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::config::DEFAULT_EVALUATION_THRESHOLD;
use crate::questionnaire::answers::AnswerSet;
use crate::questionnaire::catalog::RestaurantCatalog;
use crate::questionnaire::recommender::Recommender;
use crate::questionnaire::rules::RuleBase;
use crate::questionnaire::schema::QuestionSchema;
use crate::questionnaire::session::repository::{
    SessionId, SessionRecord, SessionStore, StoreError,
};
use crate::questionnaire::session::{recommender_router, RecommenderService};

pub(super) const REGION: (&str, &str) = ("location", "san_francisco");

pub(super) fn standard_recommender() -> Arc<Recommender> {
    let schema = QuestionSchema::standard();
    let rules = RuleBase::standard(&schema).expect("bundled rules load");
    Arc::new(Recommender::new(
        schema,
        RestaurantCatalog::standard(),
        rules,
        DEFAULT_EVALUATION_THRESHOLD,
    ))
}

pub(super) fn recommender_with_rules(source: &str, threshold: usize) -> Arc<Recommender> {
    let schema = QuestionSchema::standard();
    let rules = RuleBase::load(source.as_bytes(), &schema).expect("test rules load");
    Arc::new(Recommender::new(
        schema,
        RestaurantCatalog::standard(),
        rules,
        threshold,
    ))
}

pub(super) fn tratto_breakfast() -> Vec<(&'static str, &'static str)> {
    vec![
        ("meal_type", "breakfast"),
        ("cuisine", "italian"),
        ("diet", "vegetarian"),
        ("price", "expensive"),
        ("atmosphere", "upscale"),
        ("distance", "walking_distance"),
        ("service_style", "dine_in"),
        ("group_size", "small_group"),
        ("noise", "quiet"),
    ]
}

pub(super) fn raavi_lunch() -> Vec<(&'static str, &'static str)> {
    vec![
        ("meal_type", "lunch"),
        ("cuisine", "indian"),
        ("diet", "halal"),
        ("price", "affordable"),
        ("atmosphere", "casual"),
        ("distance", "walking_distance"),
        ("service_style", "dine_in"),
        ("group_size", "small_group"),
        ("noise", "moderate"),
    ]
}

/// Complete combination no bundled rule covers, sentinel rules included.
pub(super) fn unmatched_dinner() -> Vec<(&'static str, &'static str)> {
    vec![
        ("meal_type", "dinner"),
        ("cuisine", "japanese"),
        ("diet", "gluten_free"),
        ("price", "moderate"),
        ("atmosphere", "trendy"),
        ("distance", "bart_required"),
        ("service_style", "take_out"),
        ("group_size", "large_group"),
        ("noise", "lively"),
    ]
}

/// Every question answered, steered into an `ask_others` rule.
pub(super) fn mexican_night_out() -> Vec<(&'static str, &'static str)> {
    vec![
        ("meal_type", "dinner"),
        ("cuisine", "mexican"),
        ("diet", "standard"),
        ("price", "moderate"),
        ("atmosphere", "trendy"),
        ("distance", "muni_required"),
        ("service_style", "dine_in"),
        ("group_size", "large_group"),
        ("noise", "lively"),
    ]
}

/// Region fact followed by the given answers, resolved through the standard schema.
pub(super) fn answer_set(answers: &[(&'static str, &'static str)]) -> AnswerSet {
    let schema = QuestionSchema::standard();
    std::iter::once(REGION)
        .chain(answers.iter().copied())
        .map(|(attribute, value)| {
            schema
                .resolve(attribute, value)
                .expect("fixture answers are in the schema")
        })
        .collect()
}

pub(super) fn build_service() -> (RecommenderService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let service = RecommenderService::new(standard_recommender(), store.clone());
    (service, store)
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    pub(super) records: Arc<Mutex<HashMap<SessionId, SessionRecord>>>,
}

impl MemoryStore {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("store mutex poisoned").len()
    }
}

impl SessionStore for MemoryStore {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: SessionRecord, expected_version: u64) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        match guard.get(&record.id) {
            None => Err(StoreError::NotFound),
            Some(stored) if stored.version != expected_version => Err(StoreError::Conflict),
            Some(_) => {
                guard.insert(record.id.clone(), record);
                Ok(())
            }
        }
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, StoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn remove(&self, id: &SessionId) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        guard.remove(id).map(drop).ok_or(StoreError::NotFound)
    }
}

/// Holds every `fetch` until `parties` callers have arrived, so each of them reads the same
/// version of a session before any of them writes.
pub(super) struct RendezvousStore {
    pub(super) inner: MemoryStore,
    barrier: Barrier,
}

impl RendezvousStore {
    pub(super) fn new(inner: MemoryStore, parties: usize) -> Self {
        Self {
            inner,
            barrier: Barrier::new(parties),
        }
    }
}

impl SessionStore for RendezvousStore {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, StoreError> {
        self.inner.insert(record)
    }

    fn update(&self, record: SessionRecord, expected_version: u64) -> Result<(), StoreError> {
        self.inner.update(record, expected_version)
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, StoreError> {
        let record = self.inner.fetch(id);
        self.barrier.wait();
        record
    }

    fn remove(&self, id: &SessionId) -> Result<(), StoreError> {
        self.inner.remove(id)
    }
}

pub(super) struct UnavailableStore;

impl SessionStore for UnavailableStore {
    fn insert(&self, _record: SessionRecord) -> Result<SessionRecord, StoreError> {
        Err(StoreError::Unavailable("cache offline".to_string()))
    }

    fn update(&self, _record: SessionRecord, _expected_version: u64) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("cache offline".to_string()))
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<SessionRecord>, StoreError> {
        Err(StoreError::Unavailable("cache offline".to_string()))
    }

    fn remove(&self, _id: &SessionId) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("cache offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn router_with_service(service: RecommenderService<MemoryStore>) -> axum::Router {
    recommender_router(Arc::new(service))
}
