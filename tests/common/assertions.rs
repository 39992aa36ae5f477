//! Domain-specific assertions for shelf harnesses.
//!
//! These split a rendered filter expression into its top-level groups so
//! tests can check grouping without depending on field order.

use shelf_core::QueryMatch;

/// Split `(g1) AND (g2) AND ...` into the inner text of each group.
///
/// Only parentheses at depth 0 delimit groups, so the price group's inner
/// `AND` stays inside its group.
pub fn split_groups(rendered: &str) -> Vec<String> {
    let mut groups = Vec::new();
    let mut depth = 0usize;
    let mut start = None;
    let mut in_string = false;

    for (i, c) in rendered.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '(' if !in_string => {
                if depth == 0 {
                    start = Some(i + 1);
                }
                depth += 1;
            }
            ')' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    if let Some(s) = start.take() {
                        groups.push(rendered[s..i].to_string());
                    }
                }
            }
            _ => {}
        }
    }
    groups
}

/// The group whose clauses all start with `field `.
pub fn group_for(rendered: &str, field: &str) -> Option<String> {
    let prefix = format!("{field} ");
    split_groups(rendered)
        .into_iter()
        .find(|g| g.starts_with(&prefix))
}

/// Assert that `rendered` contains a group for `$field` whose OR-terms are
/// exactly `$clauses` in any order.
///
/// ```rust
/// assert_group!(filter, "color", [r#"color = "blue""#, r#"color = "green""#]);
/// ```
#[macro_export]
macro_rules! assert_group {
    ($rendered:expr, $field:expr, $clauses:expr) => {{
        let rendered: &str = &$rendered;
        let field: &str = $field;
        let group = match $crate::common::group_for(rendered, field) {
            Some(g) => g,
            None => panic!(
                "assert_group! failed: no group for {:?} in\n  {}",
                field, rendered
            ),
        };
        let mut actual: Vec<String> = group.split(" OR ").map(str::to_string).collect();
        let mut expected: Vec<String> = $clauses.iter().map(|c| c.to_string()).collect();
        actual.sort();
        expected.sort();
        pretty_assertions::assert_eq!(actual, expected, "group for {:?} in {}", field, rendered);
    }};
}

/// Assert that every hit carries metadata satisfying `$pred`.
///
/// ```rust
/// assert_hits_all!(hits, |item| item.color == "blue");
/// ```
#[macro_export]
macro_rules! assert_hits_all {
    ($hits:expr, $pred:expr) => {{
        let hits: &[shelf_core::QueryMatch] = &$hits;
        let pred = $pred;
        let failing: Vec<_> = hits
            .iter()
            .filter(|h| !h.metadata.as_ref().is_some_and(|m| pred(m)))
            .map(|h| h.id.clone())
            .collect();
        if !failing.is_empty() {
            panic!(
                "assert_hits_all! failed: {} of {} hits did not satisfy predicate: {:?}",
                failing.len(),
                hits.len(),
                failing
            );
        }
    }};
}

/// Hit ids in ranked order.
pub fn hit_ids(hits: &[QueryMatch]) -> Vec<&str> {
    hits.iter().map(|h| h.id.as_str()).collect()
}

/// Hit prices in ranked order.
pub fn hit_prices(hits: &[QueryMatch]) -> Vec<f64> {
    hits.iter()
        .filter_map(|h| h.metadata.as_ref().map(|m| m.price))
        .collect()
}
