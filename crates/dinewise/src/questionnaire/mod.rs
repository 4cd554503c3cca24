//! Guided dining questionnaire: reference data, the restaurant rule base, the decision engine
//! that evaluates answers against it, and the per-session flow controller adapters drive.

pub mod answers;
pub mod catalog;
pub mod checks;
pub mod engine;
pub mod flow;
mod recommender;
pub mod rules;
pub mod schema;
pub mod session;

#[cfg(test)]
mod tests;

pub use answers::AnswerSet;
pub use catalog::{Recommendation, RestaurantCatalog, RestaurantId, RestaurantRecord};
pub use checks::{run_checks, standard_cases, CheckResult, ScenarioCase};
pub use engine::{Decision, DecisionEngine, Explanation, RuleFiring};
pub use flow::{
    FlowError, FlowOutcome, FlowStage, FlowState, InvalidAnswerError, SequenceError, SessionFlow,
};
pub use recommender::Recommender;
pub use rules::{Constraint, MalformedRuleError, Rule, RuleBase, RuleOutcome, ASK_OTHERS};
pub use schema::{option_label, Question, QuestionSchema, RegionGate};
pub use session::{
    recommender_router, RecommenderService, RecommenderServiceError, SessionId, SessionRecord,
    SessionStore, SessionView, StoreError,
};
