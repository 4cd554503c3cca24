use crate::cli::RecommenderArgs;
use chrono::{DateTime, Utc};
use dinewise::config::AppConfig;
use dinewise::error::AppError;
use dinewise::questionnaire::{
    Recommender, SessionId, SessionRecord, SessionStore, StoreError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::debug;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local session map. Sessions idle for longer than `ttl` are evicted lazily: a stale
/// record reads as missing, and every insert sweeps the rest.
#[derive(Clone)]
pub(crate) struct InMemorySessionStore {
    records: Arc<Mutex<HashMap<SessionId, SessionRecord>>>,
    ttl: Duration,
}

impl InMemorySessionStore {
    pub(crate) fn new(ttl: Duration) -> Self {
        Self {
            records: Arc::default(),
            ttl,
        }
    }

    fn records(&self) -> Result<MutexGuard<'_, HashMap<SessionId, SessionRecord>>, StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::Unavailable("session store lock poisoned".to_string()))
    }

    fn is_stale(&self, record: &SessionRecord, now: DateTime<Utc>) -> bool {
        (now - record.updated_at)
            .to_std()
            .map_or(false, |idle| idle > self.ttl)
    }
}

impl SessionStore for InMemorySessionStore {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, StoreError> {
        let mut guard = self.records()?;
        let now = Utc::now();
        let before = guard.len();
        guard.retain(|_, stored| !self.is_stale(stored, now));
        let evicted = before - guard.len();
        if evicted > 0 {
            debug!(evicted, "expired sessions evicted");
        }

        if guard.contains_key(&record.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: SessionRecord, expected_version: u64) -> Result<(), StoreError> {
        let mut guard = self.records()?;
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
        let mut guard = self.records()?;
        let stale = match guard.get(id) {
            Some(record) => self.is_stale(record, Utc::now()),
            None => return Ok(None),
        };
        if stale {
            guard.remove(id);
            debug!(session = %id, "expired session evicted");
            return Ok(None);
        }
        Ok(guard.get(id).cloned())
    }

    fn remove(&self, id: &SessionId) -> Result<(), StoreError> {
        self.records()?
            .remove(id)
            .map(drop)
            .ok_or(StoreError::NotFound)
    }
}

/// Environment configuration with command-line overrides applied.
pub(crate) fn load_config(args: &RecommenderArgs) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::load()?;
    if let Some(path) = &args.rules {
        config.recommender.rules_path = Some(path.clone());
    }
    if let Some(threshold) = args.threshold {
        config.recommender.evaluation_threshold = threshold;
    }
    Ok(config)
}

pub(crate) fn build_recommender(config: &AppConfig) -> Result<Arc<Recommender>, AppError> {
    Ok(Arc::new(Recommender::from_config(&config.recommender)?))
}
