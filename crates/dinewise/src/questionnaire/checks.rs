use super::answers::AnswerSet;
use super::catalog::RestaurantId;
use super::engine::Decision;
use super::recommender::Recommender;
use serde::Serialize;

/// Complete answer set with the restaurant the rule table must produce for it.
#[derive(Debug, Clone)]
pub struct ScenarioCase {
    pub name: &'static str,
    pub answers: Vec<(&'static str, &'static str)>,
    pub expected: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub name: &'static str,
    pub expected: String,
    pub actual: String,
    pub decision: Decision,
    pub passed: bool,
}

pub fn standard_cases() -> Vec<ScenarioCase> {
    vec![
        ScenarioCase {
            name: "Breakfast at Tratto",
            answers: vec![
                ("location", "san_francisco"),
                ("meal_type", "breakfast"),
                ("cuisine", "italian"),
                ("diet", "vegetarian"),
                ("price", "expensive"),
                ("atmosphere", "upscale"),
                ("distance", "walking_distance"),
                ("service_style", "dine_in"),
                ("group_size", "small_group"),
                ("noise", "quiet"),
            ],
            expected: "tratto",
        },
        ScenarioCase {
            name: "Lunch at Raavi",
            answers: vec![
                ("location", "san_francisco"),
                ("meal_type", "lunch"),
                ("cuisine", "indian"),
                ("diet", "halal"),
                ("price", "affordable"),
                ("atmosphere", "casual"),
                ("distance", "walking_distance"),
                ("service_style", "dine_in"),
                ("group_size", "small_group"),
                ("noise", "moderate"),
            ],
            expected: "raavi",
        },
        ScenarioCase {
            name: "Quick Vegan Lunch at Mr. Charlie's",
            answers: vec![
                ("location", "san_francisco"),
                ("meal_type", "lunch"),
                ("cuisine", "american"),
                ("diet", "vegan"),
                ("price", "affordable"),
                ("atmosphere", "casual"),
                ("distance", "walking_distance"),
                ("service_style", "quick_bite"),
                ("group_size", "solo"),
                ("noise", "lively"),
            ],
            expected: "mr_charlies",
        },
        ScenarioCase {
            name: "Upscale Seafood Dinner",
            answers: vec![
                ("location", "san_francisco"),
                ("meal_type", "dinner"),
                ("cuisine", "seafood"),
                ("diet", "standard"),
                ("price", "expensive"),
                ("atmosphere", "upscale"),
                ("distance", "bart_required"),
                ("service_style", "dine_in"),
                ("group_size", "small_group"),
                ("noise", "moderate"),
            ],
            expected: "scomas",
        },
    ]
}

/// Evaluates each case against the loaded rule base. Pairs the schema does not recognise are
/// dropped, which leaves the set incomplete and the case failing.
pub fn run_checks(recommender: &Recommender, cases: &[ScenarioCase]) -> Vec<CheckResult> {
    let schema = recommender.schema();
    let catalog = recommender.catalog();

    cases
        .iter()
        .map(|case| {
            let answers: AnswerSet = case
                .answers
                .iter()
                .filter_map(|(attribute, value)| schema.resolve(attribute, value))
                .collect();
            let decision = recommender.evaluate(&answers);
            let expected = RestaurantId::new(case.expected);
            let (actual, passed) = match &decision {
                Decision::Matched(id) => (catalog.recommendation(id).name, *id == expected),
                Decision::Pending | Decision::NoMatch => ("No result".to_string(), false),
            };

            CheckResult {
                name: case.name,
                expected: catalog.recommendation(&expected).name,
                actual,
                decision,
                passed,
            }
        })
        .collect()
}
