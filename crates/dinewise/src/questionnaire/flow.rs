use super::answers::AnswerSet;
use super::catalog::{Recommendation, RestaurantId};
use super::engine::{Decision, Explanation};
use super::recommender::Recommender;
use super::schema::Question;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Position of a flow in the questionnaire state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum FlowStage {
    AwaitingRegion,
    Asking { index: usize },
    Recommending { restaurant_id: RestaurantId },
    NoMatch,
    OutOfRegion,
}

impl FlowStage {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Recommending { .. } | Self::NoMatch | Self::OutOfRegion
        )
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::AwaitingRegion => "awaiting_region",
            Self::Asking { .. } => "asking",
            Self::Recommending { .. } => "recommending",
            Self::NoMatch => "no_match",
            Self::OutOfRegion => "out_of_region",
        }
    }
}

/// How a finished flow ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "restaurant_id", rename_all = "snake_case")]
pub enum FlowOutcome {
    Matched(RestaurantId),
    NoMatch,
    OutOfRegion,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowState {
    #[serde(flatten)]
    pub stage: FlowStage,
    pub answers: AnswerSet,
}

impl FlowState {
    fn initial() -> Self {
        Self {
            stage: FlowStage::AwaitingRegion,
            answers: AnswerSet::new(),
        }
    }
}

/// Drives one user through the questionnaire.
///
/// Every operation either applies completely or leaves the state untouched and returns the
/// reason, so adapters can re-prompt without repairing anything.
#[derive(Debug, Clone)]
pub struct SessionFlow {
    recommender: Arc<Recommender>,
    state: FlowState,
}

impl SessionFlow {
    pub fn start(recommender: Arc<Recommender>) -> Self {
        Self {
            recommender,
            state: FlowState::initial(),
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn recommender(&self) -> &Recommender {
        &self.recommender
    }

    pub fn confirm_region(&mut self, in_region: bool) -> Result<&FlowState, FlowError> {
        match &self.state.stage {
            FlowStage::AwaitingRegion => {}
            stage if stage.is_terminal() => {
                return Err(SequenceError::Finished {
                    stage: stage.label(),
                }
                .into())
            }
            _ => return Err(SequenceError::RegionAlreadyAnswered.into()),
        }

        if !in_region {
            info!("flow ended outside the supported region");
            self.state.stage = FlowStage::OutOfRegion;
            return Ok(&self.state);
        }

        let region = self.recommender.schema().region();
        let mut answers = AnswerSet::new();
        answers.insert(region.attribute, region.value);

        let stage = if self.recommender.schema().questions().is_empty() {
            self.settle(&answers, 0)
        } else {
            FlowStage::Asking { index: 0 }
        };

        self.state = FlowState { stage, answers };
        Ok(&self.state)
    }

    pub fn submit_answer(&mut self, attribute: &str, value: &str) -> Result<&FlowState, FlowError> {
        let index = self.asking_index()?;
        let schema = self.recommender.schema();
        let question = schema
            .question(index)
            .ok_or(SequenceError::Finished { stage: "asking" })?;

        let attribute = attribute.trim();
        if attribute != question.attribute {
            return Err(match schema.attribute(attribute) {
                Some(_) => InvalidAnswerError::UnexpectedAttribute {
                    expected: question.attribute,
                    received: attribute.to_string(),
                },
                None => InvalidAnswerError::UnknownAttribute {
                    attribute: attribute.to_string(),
                },
            }
            .into());
        }

        let value = value.trim();
        if value.is_empty() {
            return Err(InvalidAnswerError::Empty {
                attribute: question.attribute,
            }
            .into());
        }
        let option = question
            .option(value)
            .ok_or_else(|| InvalidAnswerError::UnknownOption {
                attribute: question.attribute,
                value: value.to_string(),
            })?;

        let mut answers = self.state.answers.clone();
        answers.insert(question.attribute, option);
        debug!(
            attribute = question.attribute,
            value = option,
            answered = answers.len(),
            "answer recorded"
        );

        let stage = self.settle(&answers, index + 1);
        self.state = FlowState { stage, answers };
        Ok(&self.state)
    }

    pub fn go_back(&mut self) -> Result<&FlowState, FlowError> {
        let index = self.asking_index()?;
        if index == 0 {
            return Err(SequenceError::AtFirstQuestion.into());
        }

        let previous = index - 1;
        if let Some(question) = self.recommender.schema().question(previous) {
            self.state.answers.remove(question.attribute);
        }
        self.state.stage = FlowStage::Asking { index: previous };
        Ok(&self.state)
    }

    /// Discards every answer and returns to the region question. Allowed from any stage.
    pub fn restart(&mut self) -> &FlowState {
        self.state = FlowState::initial();
        &self.state
    }

    pub fn current_question(&self) -> Option<&Question> {
        match self.state.stage {
            FlowStage::Asking { index } => self.recommender.schema().question(index),
            _ => None,
        }
    }

    pub fn outcome(&self) -> Option<FlowOutcome> {
        match &self.state.stage {
            FlowStage::Recommending { restaurant_id } => {
                Some(FlowOutcome::Matched(restaurant_id.clone()))
            }
            FlowStage::NoMatch => Some(FlowOutcome::NoMatch),
            FlowStage::OutOfRegion => Some(FlowOutcome::OutOfRegion),
            FlowStage::AwaitingRegion | FlowStage::Asking { .. } => None,
        }
    }

    pub fn recommendation(&self) -> Option<Recommendation> {
        match &self.state.stage {
            FlowStage::Recommending { restaurant_id } => {
                Some(self.recommender.catalog().recommendation(restaurant_id))
            }
            _ => None,
        }
    }

    /// Text shown in place of a question: the region prompt or the reason the flow ended.
    pub fn message(&self) -> Option<String> {
        let region = self.recommender.schema().region();
        match self.state.stage {
            FlowStage::AwaitingRegion => Some(region.prompt.to_string()),
            FlowStage::NoMatch => Some(
                "Sorry, we couldn't find a restaurant matching all your criteria.".to_string(),
            ),
            FlowStage::OutOfRegion => Some(format!(
                "Sorry, we only support {} at this time.",
                region.label
            )),
            FlowStage::Asking { .. } | FlowStage::Recommending { .. } => None,
        }
    }

    pub fn explain(&self) -> Explanation {
        self.recommender.explain(&self.state.answers)
    }

    fn asking_index(&self) -> Result<usize, SequenceError> {
        match &self.state.stage {
            FlowStage::Asking { index } => Ok(*index),
            FlowStage::AwaitingRegion => Err(SequenceError::RegionNotConfirmed),
            stage => Err(SequenceError::Finished {
                stage: stage.label(),
            }),
        }
    }

    /// Stage that follows evaluating `answers` when `next_index` is the next unanswered question.
    fn settle(&self, answers: &AnswerSet, next_index: usize) -> FlowStage {
        let exhausted = next_index >= self.recommender.schema().questions().len();

        match self.recommender.evaluate(answers) {
            Decision::Matched(restaurant_id) => {
                info!(restaurant = %restaurant_id, answered = answers.len(), "recommendation reached");
                FlowStage::Recommending { restaurant_id }
            }
            Decision::Pending if exhausted => {
                warn!("engine reported pending on a complete answer set; ending without a match");
                FlowStage::NoMatch
            }
            Decision::NoMatch if exhausted => {
                info!(answered = answers.len(), "no restaurant matches the answers");
                FlowStage::NoMatch
            }
            Decision::Pending | Decision::NoMatch => FlowStage::Asking { index: next_index },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    #[error(transparent)]
    InvalidAnswer(#[from] InvalidAnswerError),
    #[error(transparent)]
    Sequence(#[from] SequenceError),
}

/// Answer rejected at the current question; the flow stays where it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidAnswerError {
    #[error("`{attribute}` is not a question in this questionnaire")]
    UnknownAttribute { attribute: String },
    #[error("expected an answer for `{expected}`, received `{received}`")]
    UnexpectedAttribute {
        expected: &'static str,
        received: String,
    },
    #[error("please select an option for `{attribute}`")]
    Empty { attribute: &'static str },
    #[error("`{value}` is not an option for `{attribute}`")]
    UnknownOption {
        attribute: &'static str,
        value: String,
    },
}

/// Operation not available at the flow's current position.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SequenceError {
    #[error("the region question has not been answered yet")]
    RegionNotConfirmed,
    #[error("the region question has already been answered")]
    RegionAlreadyAnswered,
    #[error("already at the first question")]
    AtFirstQuestion,
    #[error("the flow has finished ({stage}); restart to begin again")]
    Finished { stage: &'static str },
}
