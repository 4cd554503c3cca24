use super::answers::AnswerSet;
use super::catalog::RestaurantCatalog;
use super::engine::{Decision, DecisionEngine, Explanation};
use super::rules::{MalformedRuleError, RuleBase};
use super::schema::QuestionSchema;
use crate::config::RecommenderConfig;
use tracing::info;

/// Read-only reference data, rule base, and engine shared by every session.
#[derive(Debug)]
pub struct Recommender {
    schema: QuestionSchema,
    catalog: RestaurantCatalog,
    rules: RuleBase,
    engine: DecisionEngine,
}

impl Recommender {
    pub fn new(
        schema: QuestionSchema,
        catalog: RestaurantCatalog,
        rules: RuleBase,
        threshold: usize,
    ) -> Self {
        let engine = DecisionEngine::new(threshold, schema.attribute_count());
        Self {
            schema,
            catalog,
            rules,
            engine,
        }
    }

    /// Standard reference data with the rule table named by the configuration, falling back to
    /// the bundled table. Fails before any session can start if the rules are malformed.
    pub fn from_config(config: &RecommenderConfig) -> Result<Self, MalformedRuleError> {
        let schema = QuestionSchema::standard();
        let catalog = RestaurantCatalog::standard();
        let rules = match &config.rules_path {
            Some(path) => {
                info!(path = %path.display(), "loading rule base");
                RuleBase::from_path(path, &schema)?
            }
            None => RuleBase::standard(&schema)?,
        };
        rules.validate_outcomes(&catalog)?;
        info!(
            rules = rules.len(),
            threshold = config.evaluation_threshold,
            "rule base ready"
        );

        Ok(Self::new(
            schema,
            catalog,
            rules,
            config.evaluation_threshold,
        ))
    }

    pub fn schema(&self) -> &QuestionSchema {
        &self.schema
    }

    pub fn catalog(&self) -> &RestaurantCatalog {
        &self.catalog
    }

    pub fn rules(&self) -> &RuleBase {
        &self.rules
    }

    pub fn engine(&self) -> &DecisionEngine {
        &self.engine
    }

    pub fn evaluate(&self, answers: &AnswerSet) -> Decision {
        self.engine.evaluate(answers, &self.rules)
    }

    pub fn explain(&self, answers: &AnswerSet) -> Explanation {
        self.engine.explain(answers, &self.rules)
    }
}
