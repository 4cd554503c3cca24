use super::answers::AnswerSet;
use super::catalog::RestaurantId;
use super::rules::{RuleBase, RuleOutcome};
use serde::Serialize;

/// Three-valued result of evaluating the rule base against an answer set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "restaurant_id", rename_all = "snake_case")]
pub enum Decision {
    Pending,
    Matched(RestaurantId),
    NoMatch,
}

/// Pure rule evaluator. Holds no per-session state, so one instance serves every flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionEngine {
    threshold: usize,
    attribute_count: usize,
}

impl DecisionEngine {
    /// `threshold` counts answered attributes (region included) before rules are scanned on an
    /// incomplete set; `attribute_count` is the size of a complete set.
    pub fn new(threshold: usize, attribute_count: usize) -> Self {
        Self {
            threshold,
            attribute_count,
        }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn is_complete(&self, answers: &AnswerSet) -> bool {
        answers.len() >= self.attribute_count
    }

    pub fn evaluate(&self, answers: &AnswerSet, rules: &RuleBase) -> Decision {
        let complete = self.is_complete(answers);
        if !complete && answers.len() < self.threshold {
            return Decision::Pending;
        }

        let mut sentinel_fired = false;
        for rule in rules.rules() {
            if !rule.is_satisfied_by(answers) {
                continue;
            }
            match &rule.outcome {
                RuleOutcome::Restaurant(id) => return Decision::Matched(id.clone()),
                RuleOutcome::AskOthers => sentinel_fired = true,
            }
        }

        if sentinel_fired || complete {
            Decision::NoMatch
        } else {
            Decision::Pending
        }
    }

    /// Every rule that currently fires, in priority order, next to the decision it produces.
    pub fn explain(&self, answers: &AnswerSet, rules: &RuleBase) -> Explanation {
        let firing = rules
            .rules()
            .iter()
            .filter(|rule| rule.is_satisfied_by(answers))
            .map(|rule| RuleFiring {
                line: rule.line,
                outcome: rule.outcome.clone(),
            })
            .collect();

        Explanation {
            answered: answers.len(),
            threshold: self.threshold,
            complete: self.is_complete(answers),
            decision: self.evaluate(answers, rules),
            firing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleFiring {
    pub line: u64,
    pub outcome: RuleOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Explanation {
    pub answered: usize,
    pub threshold: usize,
    pub complete: bool,
    pub decision: Decision,
    pub firing: Vec<RuleFiring>,
}
