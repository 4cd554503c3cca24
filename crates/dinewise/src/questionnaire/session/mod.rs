pub mod repository;
pub mod router;
pub mod service;

pub use repository::{
    QuestionView, SessionId, SessionRecord, SessionStore, SessionView, StoreError,
};
pub use router::recommender_router;
pub use service::{RecommenderService, RecommenderServiceError};
