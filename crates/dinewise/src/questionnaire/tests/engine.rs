use super::common::*;
use crate::questionnaire::catalog::RestaurantId;
use crate::questionnaire::checks::{run_checks, standard_cases};
use crate::questionnaire::engine::Decision;
use crate::questionnaire::rules::RuleOutcome;

fn matched(id: &str) -> Decision {
    Decision::Matched(RestaurantId::new(id))
}

#[test]
fn complete_scenarios_match_their_restaurants() {
    let recommender = standard_recommender();
    assert_eq!(
        recommender.evaluate(&answer_set(&tratto_breakfast())),
        matched("tratto")
    );
    assert_eq!(
        recommender.evaluate(&answer_set(&raavi_lunch())),
        matched("raavi")
    );
}

#[test]
fn evaluation_is_repeatable() {
    let recommender = standard_recommender();
    let answers = answer_set(&raavi_lunch());
    let first = recommender.evaluate(&answers);
    for _ in 0..3 {
        assert_eq!(recommender.evaluate(&answers), first);
    }
}

#[test]
fn scenario_prefixes_stay_pending_until_the_last_answer() {
    let recommender = standard_recommender();
    for scenario in [tratto_breakfast(), raavi_lunch(), unmatched_dinner()] {
        for answered in 0..scenario.len() {
            let answers = answer_set(&scenario[..answered]);
            assert_eq!(
                recommender.evaluate(&answers),
                Decision::Pending,
                "prefix of {answered} answers should not decide"
            );
        }
    }
}

#[test]
fn complete_set_without_a_rule_is_no_match() {
    let recommender = standard_recommender();
    assert_eq!(
        recommender.evaluate(&answer_set(&unmatched_dinner())),
        Decision::NoMatch
    );
}

#[test]
fn rules_are_skipped_below_the_threshold() {
    let recommender =
        recommender_with_rules("restaurant,location,meal_type\nsubway,san_francisco,lunch\n", 3);

    let answers = answer_set(&[("meal_type", "lunch")]);
    assert_eq!(answers.len(), 2);
    assert_eq!(recommender.evaluate(&answers), Decision::Pending);

    let answers = answer_set(&[("meal_type", "lunch"), ("cuisine", "thai")]);
    assert_eq!(recommender.evaluate(&answers), matched("subway"));
}

#[test]
fn first_firing_rule_wins_over_later_ones() {
    let recommender = recommender_with_rules(
        "restaurant,cuisine,price\n\
         kin_khao,thai,\n\
         panda_express,thai,affordable\n",
        1,
    );

    let answers = answer_set(&[
        ("meal_type", "dinner"),
        ("cuisine", "thai"),
        ("diet", "standard"),
        ("price", "affordable"),
    ]);
    assert_eq!(recommender.evaluate(&answers), matched("kin_khao"));

    let explanation = recommender.explain(&answers);
    assert_eq!(explanation.firing.len(), 2);
    assert_eq!(explanation.decision, matched("kin_khao"));
}

#[test]
fn sentinel_results_are_never_recommended() {
    let recommender = recommender_with_rules(
        "restaurant,cuisine,diet\n\
         ask_others,chinese,halal\n\
         panda_express,chinese,\n",
        1,
    );

    let answers = answer_set(&[("cuisine", "chinese"), ("diet", "halal")]);
    assert_eq!(recommender.evaluate(&answers), matched("panda_express"));

    let recommender =
        recommender_with_rules("restaurant,cuisine,diet\nask_others,chinese,halal\n", 1);
    assert_eq!(recommender.evaluate(&answers), Decision::NoMatch);
}

#[test]
fn sentinel_rule_in_bundled_table_ends_complete_flows_without_match() {
    let recommender = standard_recommender();
    let answers = answer_set(&mexican_night_out());
    assert_eq!(recommender.evaluate(&answers), Decision::NoMatch);

    let explanation = recommender.explain(&answers);
    assert!(explanation.complete);
    assert!(explanation
        .firing
        .iter()
        .all(|firing| firing.outcome == RuleOutcome::AskOthers));
}

#[test]
fn bundled_self_check_scenarios_pass() {
    let recommender = standard_recommender();
    let results = run_checks(&recommender, &standard_cases());
    assert_eq!(results.len(), 4);
    for result in &results {
        assert!(result.passed, "{} failed: got {}", result.name, result.actual);
        assert_eq!(result.expected, result.actual);
    }
}

#[test]
fn self_check_reports_failures_against_other_rule_tables() {
    let recommender =
        recommender_with_rules("restaurant,cuisine\nhinodeya_ramen,italian\n", 4);
    let results = run_checks(&recommender, &standard_cases());

    let tratto = &results[0];
    assert!(!tratto.passed);
    assert_eq!(tratto.actual, "HINODEYA Ramen Japantown");
    assert_eq!(tratto.expected, "Tratto");

    let raavi = &results[1];
    assert!(!raavi.passed);
    assert_eq!(raavi.actual, "No result");
    assert_eq!(raavi.decision, Decision::NoMatch);
}
