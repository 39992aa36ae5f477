//! Boundary validation of the transport body into a [`FacetFilterState`].
//!
//! The body shape is `{ "filter": { "sort", "color", "size", "price" } }`.
//! Any deviation fails the whole request with
//! [`SearchError::InvalidFilterInput`]; nothing is defaulted.
//!
//! Facet labels are interpolated into the filter grammar without escaping,
//! so labels containing a double quote, a backslash or a control character
//! are rejected here regardless of the configured vocabulary.

use serde_json::{json, Map, Value};

use crate::config::FacetsConfig;
use crate::types::{FacetFilterState, PriceRange, SortMode};
use crate::{Result, SearchError};

/// Validates transport bodies against the catalog's facet vocabulary.
///
/// An empty vocabulary for a facet accepts any label that is safe to
/// interpolate.
#[derive(Debug, Clone, Default)]
pub struct FilterValidator {
    colors: Vec<String>,
    sizes: Vec<String>,
}

impl FilterValidator {
    pub fn new(facets: &FacetsConfig) -> Self {
        Self {
            colors: facets.colors.clone(),
            sizes: facets.sizes.clone(),
        }
    }

    /// Validate a full transport body (`{ "filter": {...} }`).
    pub fn parse_body(&self, body: &Value) -> Result<FacetFilterState> {
        let filter = body
            .as_object()
            .ok_or_else(|| invalid("body: expected a JSON object"))?
            .get("filter")
            .ok_or_else(|| invalid("filter: missing"))?;
        self.parse_filter(filter)
    }

    /// Validate the inner filter object.
    pub fn parse_filter(&self, filter: &Value) -> Result<FacetFilterState> {
        let filter = filter
            .as_object()
            .ok_or_else(|| invalid("filter: expected an object"))?;

        let sort_mode = parse_sort(filter)?;
        let colors = parse_labels(filter, "color", &self.colors)?;
        let sizes = parse_labels(filter, "size", &self.sizes)?;
        let price_range = parse_price(filter)?;

        Ok(FacetFilterState::new(colors, sizes, price_range, sort_mode))
    }
}

/// The transport body a client sends for `state`.
pub fn to_body(state: &FacetFilterState) -> Value {
    json!({
        "filter": {
            "sort": state.sort_mode.as_str(),
            "color": state.colors,
            "size": state.sizes,
            "price": [state.price_range.low, state.price_range.high],
        }
    })
}

/// `true` when `label` can be placed between double quotes in a filter
/// expression without changing its structure.
pub fn is_safe_label(label: &str) -> bool {
    !label.chars().any(|c| c == '"' || c == '\\' || c.is_control())
}

fn invalid(message: impl Into<String>) -> SearchError {
    SearchError::InvalidFilterInput(message.into())
}

fn field<'a>(filter: &'a Map<String, Value>, key: &str) -> Result<&'a Value> {
    filter
        .get(key)
        .ok_or_else(|| invalid(format!("{key}: missing")))
}

fn parse_sort(filter: &Map<String, Value>) -> Result<SortMode> {
    match field(filter, "sort")? {
        Value::String(s) => s.parse(),
        other => Err(invalid(format!("sort: expected a string, got {other}"))),
    }
}

fn parse_labels(filter: &Map<String, Value>, key: &str, vocabulary: &[String]) -> Result<Vec<String>> {
    let items = field(filter, key)?
        .as_array()
        .ok_or_else(|| invalid(format!("{key}: expected an array of strings")))?;

    items
        .iter()
        .map(|item| {
            let label = item
                .as_str()
                .ok_or_else(|| invalid(format!("{key}: expected a string, got {item}")))?;
            if !is_safe_label(label) {
                return Err(invalid(format!(
                    "{key}: label {label:?} contains a quote, backslash or control character"
                )));
            }
            if !vocabulary.is_empty() && !vocabulary.iter().any(|v| v == label) {
                return Err(invalid(format!(
                    "{key}: {label:?} is not one of {}",
                    vocabulary.join(", ")
                )));
            }
            Ok(label.to_string())
        })
        .collect()
}

fn parse_price(filter: &Map<String, Value>) -> Result<PriceRange> {
    let pair = field(filter, "price")?
        .as_array()
        .ok_or_else(|| invalid("price: expected a [low, high] pair"))?;

    if pair.len() != 2 {
        return Err(invalid(format!(
            "price: expected exactly 2 numbers, got {}",
            pair.len()
        )));
    }

    let mut bounds = [0.0_f64; 2];
    for (slot, value) in bounds.iter_mut().zip(pair) {
        let n = value
            .as_f64()
            .ok_or_else(|| invalid(format!("price: expected a number, got {value}")))?;
        if !n.is_finite() || n < 0.0 {
            return Err(invalid(format!("price: {n} is not a non-negative number")));
        }
        // -0.0 passes the sign check but renders as "-0".
        *slot = if n == 0.0 { 0.0 } else { n };
    }

    Ok(PriceRange::new(bounds[0], bounds[1]))
}
