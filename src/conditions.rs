//! Conditions object: ordered column → value constraints
//!
//! A scalar value compiles to an equality predicate (`col = $n`), a list
//! compiles to a membership predicate (`col IN ($n, ...)`). Entry order is
//! significant: clause fragments and bound values are emitted in insertion
//! order.

use serde_json::Value;

/// A record being inserted: an ordered column → value mapping
pub type Record = serde_json::Map<String, Value>;

/// The value side of a single condition entry
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionValue {
    /// Compiles to `col = $n`
    Scalar(Value),
    /// Compiles to `col IN ($n, $n+1, ...)`, one placeholder per element
    List(Vec<Value>),
}

impl ConditionValue {
    /// Number of placeholders this value consumes
    pub fn placeholder_count(&self) -> usize {
        match self {
            ConditionValue::Scalar(_) => 1,
            ConditionValue::List(items) => items.len(),
        }
    }
}

impl From<Value> for ConditionValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => ConditionValue::List(items),
            other => ConditionValue::Scalar(other),
        }
    }
}

/// Insertion-ordered set of column constraints
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Conditions {
    entries: Vec<(String, ConditionValue)>,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality constraint: `column = value`
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries
            .push((column.into(), ConditionValue::Scalar(value.into())));
        self
    }

    /// Add a membership constraint: `column IN (values...)`
    pub fn one_of<V>(mut self, column: impl Into<String>, values: V) -> Self
    where
        V: IntoIterator,
        V::Item: Into<Value>,
    {
        let items = values.into_iter().map(Into::into).collect();
        self.entries
            .push((column.into(), ConditionValue::List(items)));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, ConditionValue)> {
        self.entries.iter()
    }

    /// Rebuild the conditions as a JSON object, in entry order
    ///
    /// Used as the source argument for property transforms in mapped
    /// value-expression mode.
    pub fn to_value(&self) -> Value {
        let mut object = serde_json::Map::new();
        for (column, value) in &self.entries {
            let json = match value {
                ConditionValue::Scalar(v) => v.clone(),
                ConditionValue::List(items) => Value::Array(items.clone()),
            };
            object.insert(column.clone(), json);
        }
        Value::Object(object)
    }

}

impl From<serde_json::Map<String, Value>> for Conditions {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        let entries = map
            .into_iter()
            .map(|(column, value)| (column, ConditionValue::from(value)))
            .collect();
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_preserves_order() {
        let conditions = Conditions::new()
            .eq("article_id", 1)
            .one_of("title", vec!["a", "b"])
            .eq("published", true);

        let columns: Vec<&str> = conditions.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(columns, vec!["article_id", "title", "published"]);
    }

    fn from_json(value: Value) -> Conditions {
        match value {
            Value::Object(map) => Conditions::from(map),
            other => panic!("expected an object, got {other}"),
        }
    }

    #[test]
    fn test_scalar_vs_list_dispatch() {
        let conditions = from_json(json!({
            "id": 1,
            "titles": ["x", "y"]
        }));

        let entries: Vec<_> = conditions.iter().collect();
        assert_eq!(entries[0].1, ConditionValue::Scalar(json!(1)));
        assert_eq!(
            entries[1].1,
            ConditionValue::List(vec![json!("x"), json!("y")])
        );
    }

    #[test]
    fn test_placeholder_count() {
        assert_eq!(ConditionValue::Scalar(json!(1)).placeholder_count(), 1);
        assert_eq!(
            ConditionValue::List(vec![json!(1), json!(2), json!(3)]).placeholder_count(),
            3
        );
        assert_eq!(ConditionValue::List(vec![]).placeholder_count(), 0);
    }

    #[test]
    fn test_to_value_round_trip() {
        let source = json!({"id": 1, "tags": ["a", "b"]});
        let conditions = from_json(source.clone());
        assert_eq!(conditions.to_value(), source);
    }
}
