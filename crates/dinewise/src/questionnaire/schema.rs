use serde::Serialize;

/// Gate asked before the questionnaire proper. Answering yes seeds the answer set with
/// `attribute = value`.
#[derive(Debug, Clone, Serialize)]
pub struct RegionGate {
    pub attribute: &'static str,
    pub value: &'static str,
    /// Region name for user-facing messages.
    pub label: &'static str,
    pub prompt: &'static str,
}

/// A single multiple-choice question over one attribute.
#[derive(Debug, Clone, Serialize)]
pub struct Question {
    pub attribute: &'static str,
    pub prompt: &'static str,
    pub options: Vec<&'static str>,
}

impl Question {
    pub fn option(&self, value: &str) -> Option<&'static str> {
        let value = value.trim();
        self.options.iter().copied().find(|option| *option == value)
    }
}

/// Ordered question definitions. The position of a question is its flow index.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionSchema {
    region: RegionGate,
    questions: Vec<Question>,
}

impl QuestionSchema {
    pub fn new(region: RegionGate, questions: Vec<Question>) -> Self {
        Self { region, questions }
    }

    pub fn standard() -> Self {
        Self::new(
            RegionGate {
                attribute: "location",
                value: "san_francisco",
                label: "San Francisco",
                prompt: "First, are you currently in San Francisco?",
            },
            standard_questions(),
        )
    }

    pub fn region(&self) -> &RegionGate {
        &self.region
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn position(&self, attribute: &str) -> Option<usize> {
        self.questions
            .iter()
            .position(|question| question.attribute == attribute)
    }

    /// Region attribute plus every question attribute.
    pub fn attribute_count(&self) -> usize {
        self.questions.len() + 1
    }

    pub fn attribute(&self, name: &str) -> Option<&'static str> {
        let name = name.trim();
        if name == self.region.attribute {
            return Some(self.region.attribute);
        }
        self.questions
            .iter()
            .map(|question| question.attribute)
            .find(|attribute| *attribute == name)
    }

    /// Canonical static value for `attribute = value`, if both are in the schema.
    pub fn resolve(&self, attribute: &str, value: &str) -> Option<(&'static str, &'static str)> {
        let attribute = attribute.trim();
        let value = value.trim();
        if attribute == self.region.attribute {
            return (value == self.region.value)
                .then_some((self.region.attribute, self.region.value));
        }
        let question = self.questions.get(self.position(attribute)?)?;
        question
            .option(value)
            .map(|option| (question.attribute, option))
    }
}

/// Human label for an option or attribute key: `walking_distance` -> `Walking distance`.
pub fn option_label(value: &str) -> String {
    let spaced = value.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn standard_questions() -> Vec<Question> {
    vec![
        Question {
            attribute: "meal_type",
            prompt: "What meal are you looking for?",
            options: vec!["breakfast", "lunch", "dinner"],
        },
        Question {
            attribute: "cuisine",
            prompt: "What kind of food are you in the mood for today?",
            options: vec![
                "american",
                "chinese",
                "italian",
                "japanese",
                "mexican",
                "thai",
                "indian",
                "middle_eastern",
                "seafood",
            ],
        },
        Question {
            attribute: "diet",
            prompt: "Do you have any specific dietary requirements or preferences?",
            options: vec!["standard", "vegetarian", "vegan", "halal", "gluten_free"],
        },
        Question {
            attribute: "price",
            prompt: "What price range are you comfortable with for this meal?",
            options: vec!["affordable", "moderate", "expensive"],
        },
        Question {
            attribute: "atmosphere",
            prompt: "What kind of dining atmosphere would you prefer?",
            options: vec!["casual", "upscale", "cozy", "trendy", "quiet"],
        },
        Question {
            attribute: "distance",
            prompt: "How far are you willing to travel from Minerva residence?",
            options: vec!["walking_distance", "muni_required", "bart_required"],
        },
        Question {
            attribute: "service_style",
            prompt: "What type of service are you looking for?",
            options: vec!["dine_in", "take_out", "quick_bite"],
        },
        Question {
            attribute: "group_size",
            prompt: "How many people will be dining?",
            options: vec!["solo", "small_group", "large_group"],
        },
        Question {
            attribute: "noise",
            prompt: "What noise level would be ideal for your dining experience?",
            options: vec!["quiet", "moderate", "lively"],
        },
    ]
}
