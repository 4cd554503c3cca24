//! Restaurant eligibility rules.
//!
//! A rule is a conjunction of `attribute = value` constraints with a result. Rules are kept in
//! source order because the decision engine applies them first-match-wins: when two rules can
//! fire on the same answers, the one written earlier decides. Authors must place more specific
//! rules above broader ones.

mod parser;

use super::answers::AnswerSet;
use super::catalog::{RestaurantCatalog, RestaurantId};
use super::schema::QuestionSchema;
use serde::Serialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Result cell marking a combination the table cannot answer.
pub const ASK_OTHERS: &str = "ask_others";

const STANDARD_RULES: &str = include_str!("standard_rules.csv");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Constraint {
    pub attribute: &'static str,
    pub value: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "restaurant_id", rename_all = "snake_case")]
pub enum RuleOutcome {
    Restaurant(RestaurantId),
    AskOthers,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    /// Line in the rule source, for diagnostics.
    pub line: u64,
    pub constraints: Vec<Constraint>,
    pub outcome: RuleOutcome,
}

impl Rule {
    /// Every constrained attribute must be answered with exactly the required value. A missing
    /// attribute never satisfies a constraint.
    pub fn is_satisfied_by(&self, answers: &AnswerSet) -> bool {
        self.constraints
            .iter()
            .all(|constraint| answers.get(constraint.attribute) == Some(constraint.value))
    }

    pub fn restaurant(&self) -> Option<&RestaurantId> {
        match &self.outcome {
            RuleOutcome::Restaurant(id) => Some(id),
            RuleOutcome::AskOthers => None,
        }
    }
}

/// Ordered, immutable rule list shared read-only by every session.
#[derive(Debug, Clone)]
pub struct RuleBase {
    rules: Vec<Rule>,
}

impl RuleBase {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn load<R: Read>(source: R, schema: &QuestionSchema) -> Result<Self, MalformedRuleError> {
        parser::parse_rules(source, schema).map(Self::new)
    }

    pub fn from_path<P: AsRef<Path>>(
        path: P,
        schema: &QuestionSchema,
    ) -> Result<Self, MalformedRuleError> {
        let file = File::open(path)?;
        Self::load(file, schema)
    }

    /// The rule table bundled with the crate.
    pub fn standard(schema: &QuestionSchema) -> Result<Self, MalformedRuleError> {
        Self::load(STANDARD_RULES.as_bytes(), schema)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rejects results naming restaurants the catalog cannot render.
    pub fn validate_outcomes(&self, catalog: &RestaurantCatalog) -> Result<(), MalformedRuleError> {
        for rule in &self.rules {
            if let Some(id) = rule.restaurant() {
                if !catalog.contains(id) {
                    return Err(MalformedRuleError::UnknownRestaurant {
                        line: rule.line,
                        restaurant: id.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MalformedRuleError {
    #[error("failed to read rule source: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid rule CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("rule source has no `restaurant` column")]
    MissingOutcomeColumn,
    #[error("column `{column}` appears more than once")]
    DuplicateColumn { column: String },
    #[error("column `{column}` is not a known attribute")]
    UnknownAttribute { column: String },
    #[error("line {line}: `{value}` is not a valid option for `{attribute}`")]
    UnknownValue {
        line: u64,
        attribute: String,
        value: String,
    },
    #[error("line {line}: rule has no restaurant result")]
    EmptyOutcome { line: u64 },
    #[error("line {line}: rule constrains no attributes")]
    Unconstrained { line: u64 },
    #[error("line {line}: restaurant `{restaurant}` is not in the catalog")]
    UnknownRestaurant { line: u64, restaurant: RestaurantId },
}
