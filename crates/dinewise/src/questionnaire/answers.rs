use serde::Serialize;
use std::collections::BTreeMap;

/// Accumulated `attribute = value` selections for one flow.
///
/// Keys and values are the schema's own static strings; the flow controller resolves user
/// input through [`QuestionSchema::resolve`](super::schema::QuestionSchema::resolve) before
/// writing, so the set never holds an attribute or value outside the schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnswerSet {
    values: BTreeMap<&'static str, &'static str>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last write wins.
    pub fn insert(&mut self, attribute: &'static str, value: &'static str) -> Option<&'static str> {
        self.values.insert(attribute, value)
    }

    pub fn remove(&mut self, attribute: &str) -> Option<&'static str> {
        self.values.remove(attribute)
    }

    pub fn get(&self, attribute: &str) -> Option<&'static str> {
        self.values.get(attribute).copied()
    }

    pub fn contains(&self, attribute: &str) -> bool {
        self.values.contains_key(attribute)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.values.iter().map(|(attribute, value)| (*attribute, *value))
    }
}

impl FromIterator<(&'static str, &'static str)> for AnswerSet {
    fn from_iter<T: IntoIterator<Item = (&'static str, &'static str)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_writes_replace_earlier_values() {
        let mut answers = AnswerSet::new();
        assert_eq!(answers.insert("price", "affordable"), None);
        assert_eq!(answers.insert("price", "expensive"), Some("affordable"));
        assert_eq!(answers.len(), 1);
        assert_eq!(answers.get("price"), Some("expensive"));
    }

    #[test]
    fn remove_shrinks_by_one_entry() {
        let mut answers: AnswerSet = [("location", "san_francisco"), ("meal_type", "lunch")]
            .into_iter()
            .collect();
        assert_eq!(answers.remove("meal_type"), Some("lunch"));
        assert_eq!(answers.len(), 1);
        assert!(answers.contains("location"));
        assert_eq!(answers.remove("meal_type"), None);
    }
}
