use super::{Constraint, MalformedRuleError, Rule, RuleOutcome, ASK_OTHERS};
use crate::questionnaire::catalog::RestaurantId;
use crate::questionnaire::schema::QuestionSchema;
use std::collections::HashSet;
use std::io::Read;

const OUTCOME_COLUMN: &str = "restaurant";
const DONT_CARE: &str = "*";

#[derive(Debug, Clone, Copy)]
enum Column {
    Outcome,
    Attribute(&'static str),
}

pub(crate) fn parse_rules<R: Read>(
    reader: R,
    schema: &QuestionSchema,
) -> Result<Vec<Rule>, MalformedRuleError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);

    let columns = resolve_columns(csv_reader.headers()?, schema)?;
    let mut rules = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map(|position| position.line()).unwrap_or(0);

        let mut outcome = None;
        let mut constraints = Vec::new();

        for (column, cell) in columns.iter().zip(record.iter()) {
            match column {
                Column::Outcome => outcome = parse_outcome(cell),
                Column::Attribute(attribute) => {
                    if cell.is_empty() || cell == DONT_CARE {
                        continue;
                    }
                    let (attribute, value) = schema.resolve(attribute, cell).ok_or_else(|| {
                        MalformedRuleError::UnknownValue {
                            line,
                            attribute: attribute.to_string(),
                            value: cell.to_string(),
                        }
                    })?;
                    constraints.push(Constraint { attribute, value });
                }
            }
        }

        let outcome = outcome.ok_or(MalformedRuleError::EmptyOutcome { line })?;
        if constraints.is_empty() {
            return Err(MalformedRuleError::Unconstrained { line });
        }

        rules.push(Rule {
            line,
            constraints,
            outcome,
        });
    }

    Ok(rules)
}

fn resolve_columns(
    headers: &csv::StringRecord,
    schema: &QuestionSchema,
) -> Result<Vec<Column>, MalformedRuleError> {
    let mut seen = HashSet::new();
    let mut columns = Vec::with_capacity(headers.len());

    for header in headers.iter() {
        if !seen.insert(header.to_string()) {
            return Err(MalformedRuleError::DuplicateColumn {
                column: header.to_string(),
            });
        }

        if header == OUTCOME_COLUMN {
            columns.push(Column::Outcome);
            continue;
        }

        let attribute =
            schema
                .attribute(header)
                .ok_or_else(|| MalformedRuleError::UnknownAttribute {
                    column: header.to_string(),
                })?;
        columns.push(Column::Attribute(attribute));
    }

    if !columns
        .iter()
        .any(|column| matches!(column, Column::Outcome))
    {
        return Err(MalformedRuleError::MissingOutcomeColumn);
    }

    Ok(columns)
}

fn parse_outcome(cell: &str) -> Option<RuleOutcome> {
    match cell {
        "" => None,
        ASK_OTHERS => Some(RuleOutcome::AskOthers),
        id => Some(RuleOutcome::Restaurant(RestaurantId::new(id))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Result<Vec<Rule>, MalformedRuleError> {
        parse_rules(source.as_bytes(), &QuestionSchema::standard())
    }

    #[test]
    fn parses_rows_in_order_and_skips_dont_care_cells() {
        let rules = parse(
            "# comment\n\
             restaurant,cuisine,price,noise\n\
             kin_khao,thai,moderate,\n\
             ask_others,mexican,*,\n",
        )
        .expect("rules parse");

        assert_eq!(rules.len(), 2);
        assert_eq!(
            rules[0].outcome,
            RuleOutcome::Restaurant(RestaurantId::new("kin_khao"))
        );
        assert_eq!(
            rules[0].constraints,
            vec![
                Constraint {
                    attribute: "cuisine",
                    value: "thai"
                },
                Constraint {
                    attribute: "price",
                    value: "moderate"
                },
            ]
        );
        assert_eq!(rules[1].outcome, RuleOutcome::AskOthers);
        assert_eq!(rules[1].constraints.len(), 1);
        assert!(rules[0].line < rules[1].line);
    }

    #[test]
    fn rejects_columns_outside_the_schema() {
        match parse("restaurant,mood\nkin_khao,happy\n") {
            Err(MalformedRuleError::UnknownAttribute { column }) => assert_eq!(column, "mood"),
            other => panic!("expected unknown attribute, got {other:?}"),
        }
    }

    #[test]
    fn rejects_out_of_domain_values_with_line_number() {
        match parse("restaurant,cuisine\nkin_khao,thai\ntratto,french\n") {
            Err(MalformedRuleError::UnknownValue {
                line,
                attribute,
                value,
            }) => {
                assert_eq!(line, 3);
                assert_eq!(attribute, "cuisine");
                assert_eq!(value, "french");
            }
            other => panic!("expected unknown value, got {other:?}"),
        }
    }

    #[test]
    fn rejects_structural_problems() {
        assert!(matches!(
            parse("cuisine,price\nthai,moderate\n"),
            Err(MalformedRuleError::MissingOutcomeColumn)
        ));
        assert!(matches!(
            parse("restaurant,cuisine,cuisine\nkin_khao,thai,thai\n"),
            Err(MalformedRuleError::DuplicateColumn { .. })
        ));
        assert!(matches!(
            parse("restaurant,cuisine\n,thai\n"),
            Err(MalformedRuleError::EmptyOutcome { line: 2 })
        ));
        assert!(matches!(
            parse("restaurant,cuisine\nkin_khao,*\n"),
            Err(MalformedRuleError::Unconstrained { line: 2 })
        ));
        assert!(matches!(
            parse("restaurant,cuisine\nkin_khao,thai,extra\n"),
            Err(MalformedRuleError::Csv(_))
        ));
    }
}
