//! Filter expression builder: per-field clause groups rendered into the
//! index's boolean filter grammar.
//!
//! ```text
//! (color = "blue" OR color = "green") AND (size = "M") AND (price >= 0 AND price <= 100)
//! ```
//!
//! Clauses added under the same field are OR-combined into one parenthesized
//! group; groups of different fields are AND-combined. Field order in the
//! rendered string follows the order in which each field was first touched.
//!
//! Values are interpolated verbatim. String values are wrapped in double
//! quotes but embedded quotes are NOT escaped; callers must only pass labels
//! that passed [`crate::validate`].

/// Comparison operator of a single clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Gte,
    Lte,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Gte => ">=",
            Operator::Lte => "<=",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Right-hand side of a clause.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Str(String),
    Number(f64),
}

impl std::fmt::Display for FilterValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterValue::Str(s) => write!(f, "\"{s}\""),
            // f64's Display is the shortest round-trip form: 20 renders "20".
            FilterValue::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Str(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Str(value)
    }
}

impl From<&String> for FilterValue {
    fn from(value: &String) -> Self {
        FilterValue::Str(value.clone())
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        FilterValue::Number(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Number(value as f64)
    }
}

/// Accumulates clause groups keyed by field, then renders them once.
///
/// Constructed fresh per translation and discarded after [`render`](Self::render).
#[derive(Debug, Clone, Default)]
pub struct FilterExpressionBuilder {
    groups: Vec<(String, Vec<String>)>,
}

impl FilterExpressionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `field operator value` to the field's OR-group.
    pub fn add(&mut self, field: &str, operator: Operator, value: impl Into<FilterValue>) -> &mut Self {
        let clause = format!("{field} {operator} {}", value.into());
        self.group_mut(field).push(clause);
        self
    }

    /// Replace the field's group with exactly one literal clause, discarding
    /// anything added for that field before.
    pub fn add_raw(&mut self, field: &str, clause: impl Into<String>) -> &mut Self {
        let group = self.group_mut(field);
        group.clear();
        group.push(clause.into());
        self
    }

    /// `true` iff at least one field has a non-empty group.
    pub fn has_groups(&self) -> bool {
        self.groups.iter().any(|(_, clauses)| !clauses.is_empty())
    }

    /// Clauses currently grouped under `field`, in insertion order.
    pub fn clauses(&self, field: &str) -> Option<&[String]> {
        self.groups
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, clauses)| clauses.as_slice())
    }

    /// AND-join of every field's parenthesized OR-group.
    pub fn render(&self) -> String {
        self.groups
            .iter()
            .filter(|(_, clauses)| !clauses.is_empty())
            .map(|(_, clauses)| format!("({})", clauses.join(" OR ")))
            .collect::<Vec<_>>()
            .join(" AND ")
    }

    /// [`render`](Self::render) when there is anything to render.
    pub fn build(&self) -> Option<String> {
        self.has_groups().then(|| self.render())
    }

    fn group_mut(&mut self, field: &str) -> &mut Vec<String> {
        let idx = match self.groups.iter().position(|(name, _)| name == field) {
            Some(idx) => idx,
            None => {
                self.groups.push((field.to_string(), Vec::new()));
                self.groups.len() - 1
            }
        };
        &mut self.groups[idx].1
    }
}
