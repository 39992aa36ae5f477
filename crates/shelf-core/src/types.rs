//! Core types shared by every layer of shelf.
//!
//! This module defines the user's facet selections ([`FacetFilterState`]),
//! the request shape handed to the vector index ([`QueryRequest`]) and what
//! comes back ([`QueryMatch`] carrying an [`ItemRecord`]).

use serde::{Deserialize, Serialize};

/// Length of every query vector sent to the index.
pub const VECTOR_DIMENSIONS: usize = 3;

/// Index of the price-bias coordinate inside a query vector.
pub const PRICE_BIAS_AXIS: usize = 2;

/// The user's facet selections at the moment a search is requested.
///
/// `colors` and `sizes` have set semantics: duplicates are dropped on
/// construction (first occurrence wins) and an empty list means "match
/// nothing" for that facet, not "unconstrained".
#[derive(Debug, Clone, PartialEq)]
pub struct FacetFilterState {
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    pub price_range: PriceRange,
    pub sort_mode: SortMode,
}

impl FacetFilterState {
    pub fn new<C, S>(colors: C, sizes: S, price_range: PriceRange, sort_mode: SortMode) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            colors: dedup_labels(colors),
            sizes: dedup_labels(sizes),
            price_range,
            sort_mode,
        }
    }
}

impl Default for FacetFilterState {
    /// The catalog's initial view: every color and size selected, the full
    /// default price range, no sort preference.
    fn default() -> Self {
        let facets = crate::config::FacetsConfig::default();
        Self::new(
            facets.colors,
            facets.sizes,
            PriceRange::new(0.0, 100.0),
            SortMode::None,
        )
    }
}

fn dedup_labels<I>(labels: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let mut out: Vec<String> = Vec::new();
    for label in labels {
        let label = label.into();
        if !out.contains(&label) {
            out.push(label);
        }
    }
    out
}

/// A price interval as the caller labelled it. The endpoints may arrive in
/// either order; use [`PriceRange::bounds`] for the normalised interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub low: f64,
    pub high: f64,
}

impl PriceRange {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// `(min, max)` of the two endpoints.
    pub fn bounds(&self) -> (f64, f64) {
        (self.low.min(self.high), self.low.max(self.high))
    }
}

/// User-selected ranking intent, realised purely through the query vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortMode {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "price-asc")]
    PriceAscending,
    #[serde(rename = "price-desc")]
    PriceDescending,
}

impl SortMode {
    pub const ALL: [SortMode; 3] = [
        SortMode::None,
        SortMode::PriceAscending,
        SortMode::PriceDescending,
    ];

    /// Wire name used by the transport body.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::None => "none",
            SortMode::PriceAscending => "price-asc",
            SortMode::PriceDescending => "price-desc",
        }
    }
}

impl std::fmt::Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortMode {
    type Err = crate::SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| {
                crate::SearchError::InvalidFilterInput(format!(
                    "sort: expected one of none, price-asc, price-desc, got {s:?}"
                ))
            })
    }
}

/// Catalog item metadata as stored alongside each vector in the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    pub id: String,
    pub name: String,
    pub image_id: String,
    pub size: String,
    pub color: String,
    pub price: f64,
}

/// The request handed to the vector index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub top_k: usize,
    pub vector: [f64; VECTOR_DIMENSIONS],
    pub include_metadata: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

/// One ranked hit returned by the index. Higher `score` is a closer match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryMatch {
    pub id: String,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ItemRecord>,
}
