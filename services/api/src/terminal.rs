//! Terminal front end: an interactive prompt loop over the flow controller, plus the `check`
//! and `rules inspect` reports.

use crate::cli::RecommenderArgs;
use crate::infra::{build_recommender, load_config};
use dinewise::error::AppError;
use dinewise::questionnaire::{
    option_label, run_checks, standard_cases, CheckResult, FlowError, FlowStage, Recommender,
    RuleBase, RuleOutcome, SequenceError, SessionFlow,
};
use std::io::{self, BufRead, Write};
use std::sync::Arc;

pub(crate) fn run_prompt<R: BufRead, W: Write>(
    args: &RecommenderArgs,
    input: R,
    output: W,
) -> Result<(), AppError> {
    let config = load_config(args)?;
    let recommender = build_recommender(&config)?;
    prompt_loop(recommender, input, output)?;
    Ok(())
}

pub(crate) fn run_check<W: Write>(args: &RecommenderArgs, mut output: W) -> Result<(), AppError> {
    let config = load_config(args)?;
    let recommender = build_recommender(&config)?;
    let results = run_checks(&recommender, &standard_cases());
    let failed = render_checks(&results, &mut output)?;
    if failed > 0 {
        return Err(AppError::CheckFailed {
            failed,
            total: results.len(),
        });
    }
    Ok(())
}

pub(crate) fn run_inspect<W: Write>(args: &RecommenderArgs, mut output: W) -> Result<(), AppError> {
    let config = load_config(args)?;
    let recommender = build_recommender(&config)?;
    render_rules(recommender.rules(), &mut output)?;
    Ok(())
}

enum Input {
    Line(String),
    Eof,
}

fn read_input<R: BufRead>(input: &mut R) -> io::Result<Input> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(Input::Eof);
    }
    Ok(Input::Line(line.trim().to_string()))
}

/// Drives one flow after another until the user quits or input runs out.
fn prompt_loop<R: BufRead, W: Write>(
    recommender: Arc<Recommender>,
    mut input: R,
    mut output: W,
) -> io::Result<()> {
    let mut flow = SessionFlow::start(recommender);
    writeln!(output, "Welcome to the San Francisco restaurant recommender.")?;

    loop {
        let stage = flow.state().stage.clone();
        match stage {
            FlowStage::AwaitingRegion => {
                writeln!(output)?;
                writeln!(output, "{}", flow.message().unwrap_or_default())?;
                writeln!(output, "  1. Yes")?;
                writeln!(output, "  2. No")?;
                write!(output, "Choose 1 or 2 (q to quit): ")?;
                output.flush()?;

                let Input::Line(line) = read_input(&mut input)? else {
                    break;
                };
                let in_region = match line.as_str() {
                    "1" => true,
                    "2" => false,
                    "q" | "Q" => break,
                    _ => {
                        writeln!(output, "Please enter 1, 2, or q.")?;
                        continue;
                    }
                };
                if let Err(err) = flow.confirm_region(in_region) {
                    writeln!(output, "{err}")?;
                }
            }
            FlowStage::Asking { index } => {
                render_question(&flow, index, &mut output)?;
                let Input::Line(line) = read_input(&mut input)? else {
                    break;
                };
                match line.as_str() {
                    "q" | "Q" => break,
                    "p" | "P" => match flow.go_back() {
                        Ok(_) => {}
                        Err(FlowError::Sequence(SequenceError::AtFirstQuestion)) => {
                            writeln!(output, "Already at the first question.")?;
                        }
                        Err(err) => writeln!(output, "{err}")?,
                    },
                    choice => {
                        let Some(question) = flow.current_question() else {
                            continue;
                        };
                        let option = choice
                            .parse::<usize>()
                            .ok()
                            .and_then(|number| number.checked_sub(1))
                            .and_then(|position| question.options.get(position).copied());
                        let Some(option) = option else {
                            writeln!(output, "Please choose one of the numbered options.")?;
                            continue;
                        };
                        let attribute = question.attribute;
                        if let Err(err) = flow.submit_answer(attribute, option) {
                            writeln!(output, "{err}")?;
                        }
                    }
                }
            }
            FlowStage::Recommending { .. } | FlowStage::NoMatch | FlowStage::OutOfRegion => {
                writeln!(output)?;
                match flow.recommendation() {
                    Some(recommendation) => {
                        writeln!(output, "We recommend: {}", recommendation.name)?;
                        if !recommendation.link.is_empty() {
                            writeln!(output, "Map: {}", recommendation.link)?;
                        }
                    }
                    None => writeln!(output, "{}", flow.message().unwrap_or_default())?,
                }
                write!(output, "Press Enter to start over or q to quit: ")?;
                output.flush()?;

                match read_input(&mut input)? {
                    Input::Eof => break,
                    Input::Line(line) if line.eq_ignore_ascii_case("q") => break,
                    Input::Line(_) => {
                        flow.restart();
                    }
                }
            }
        }
    }

    writeln!(output)?;
    writeln!(output, "Goodbye!")?;
    output.flush()
}

fn render_question<W: Write>(flow: &SessionFlow, index: usize, output: &mut W) -> io::Result<()> {
    let schema = flow.recommender().schema();
    let Some(question) = schema.question(index) else {
        return Ok(());
    };

    writeln!(output)?;
    let selections: Vec<String> = schema
        .questions()
        .iter()
        .filter_map(|asked| {
            flow.state().answers.get(asked.attribute).map(|value| {
                format!("{}: {}", option_label(asked.attribute), option_label(value))
            })
        })
        .collect();
    if !selections.is_empty() {
        writeln!(output, "Your selections: {}", selections.join(", "))?;
    }

    writeln!(
        output,
        "Question {} of {}: {}",
        index + 1,
        schema.questions().len(),
        question.prompt
    )?;
    for (position, option) in question.options.iter().enumerate() {
        writeln!(output, "  {}. {}", position + 1, option_label(option))?;
    }
    if index > 0 {
        write!(output, "Enter a number, p for the previous question, or q to quit: ")?;
    } else {
        write!(output, "Enter a number or q to quit: ")?;
    }
    output.flush()
}

/// Writes one line per scenario and returns how many failed.
fn render_checks<W: Write>(results: &[CheckResult], output: &mut W) -> io::Result<usize> {
    let mut failed = 0;
    for result in results {
        let verdict = if result.passed { "PASS" } else { "FAIL" };
        if !result.passed {
            failed += 1;
        }
        writeln!(
            output,
            "{verdict} {}: expected {}, got {}",
            result.name, result.expected, result.actual
        )?;
    }
    writeln!(
        output,
        "{} of {} scenarios passed",
        results.len() - failed,
        results.len()
    )?;
    Ok(failed)
}

fn render_rules<W: Write>(rules: &RuleBase, output: &mut W) -> io::Result<()> {
    let sentinels = rules
        .rules()
        .iter()
        .filter(|rule| rule.outcome == RuleOutcome::AskOthers)
        .count();
    writeln!(
        output,
        "{} rules loaded ({} ask_others)",
        rules.len(),
        sentinels
    )?;

    for rule in rules.rules() {
        let constraints: Vec<String> = rule
            .constraints
            .iter()
            .map(|constraint| format!("{}={}", constraint.attribute, constraint.value))
            .collect();
        let outcome = match &rule.outcome {
            RuleOutcome::Restaurant(id) => id.as_str(),
            RuleOutcome::AskOthers => "ask_others",
        };
        writeln!(
            output,
            "line {:>3}: {} -> {}",
            rule.line,
            constraints.join(", "),
            outcome
        )?;
    }
    Ok(())
}
