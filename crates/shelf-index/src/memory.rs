//! In-process vector index.
//!
//! Holds `(id, vector, ItemRecord)` rows in memory, evaluates the same filter
//! grammar the hosted index accepts, and ranks survivors by euclidean
//! proximity to the query vector (`score = 1 / (1 + d²)`, ties broken by id).
//! Used for local runs (`shelf serve --catalog items.json`) and in tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use serde_json::{Map, Value};
use shelf_core::types::PRICE_BIAS_AXIS;
use shelf_core::{ItemRecord, QueryMatch, QueryRequest, Result, SearchError, VECTOR_DIMENSIONS};

use crate::expr::Expr;
use crate::VectorIndex;

struct Row {
    id: String,
    vector: [f64; VECTOR_DIMENSIONS],
    record: ItemRecord,
    metadata: Map<String, Value>,
}

/// Rows in insertion order plus the position of each id.
#[derive(Default)]
struct Table {
    rows: Vec<Row>,
    positions: HashMap<String, usize>,
}

/// In-memory [`VectorIndex`].
#[derive(Default)]
pub struct MemoryIndex {
    table: RwLock<Table>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from records, each placed at `[0, 0, price]`.
    pub fn from_records(records: impl IntoIterator<Item = ItemRecord>) -> Self {
        let index = Self::new();
        for record in records {
            index.insert_record(record);
        }
        index
    }

    /// Load a JSON array of [`ItemRecord`] values.
    pub fn load_catalog(path: &Path) -> anyhow::Result<Self> {
        let bytes = std::fs::read(path)?;
        let records: Vec<ItemRecord> = serde_json::from_slice(&bytes)?;
        tracing::info!(path = %path.display(), items = records.len(), "loaded catalog");
        Ok(Self::from_records(records))
    }

    /// Insert `record` at `[0, 0, price]`, the position the price-bias
    /// coordinate of a query vector ranks against.
    pub fn insert_record(&self, record: ItemRecord) {
        let mut vector = [0.0; VECTOR_DIMENSIONS];
        vector[PRICE_BIAS_AXIS] = record.price;
        self.insert(record.id.clone(), vector, record);
    }

    /// Insert or replace the row with `id`.
    pub fn insert(&self, id: impl Into<String>, vector: [f64; VECTOR_DIMENSIONS], record: ItemRecord) {
        let id = id.into();
        let metadata = match serde_json::to_value(&record) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        let row = Row {
            id,
            vector,
            record,
            metadata,
        };

        let mut table = self.table.write().unwrap_or_else(|e| e.into_inner());
        match table.positions.get(&row.id).copied() {
            Some(pos) => table.rows[pos] = row,
            None => {
                let pos = table.rows.len();
                table.positions.insert(row.id.clone(), pos);
                table.rows.push(row);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.table.read().unwrap_or_else(|e| e.into_inner()).rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn search(&self, request: &QueryRequest) -> Result<Vec<QueryMatch>> {
        let filter = request
            .filter
            .as_deref()
            .map(Expr::parse)
            .transpose()
            .map_err(|e| SearchError::UpstreamQueryFailure {
                status: Some(400),
                message: format!("invalid filter: {e}"),
            })?;

        let table = self.table.read().unwrap_or_else(|e| e.into_inner());
        let mut hits: Vec<QueryMatch> = table
            .rows
            .iter()
            .filter(|row| filter.as_ref().map_or(true, |f| f.matches(&row.metadata)))
            .map(|row| QueryMatch {
                id: row.id.clone(),
                score: score(&request.vector, &row.vector),
                metadata: request.include_metadata.then(|| row.record.clone()),
            })
            .collect();

        hits.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
        hits.truncate(request.top_k);
        Ok(hits)
    }
}

fn score(query: &[f64; VECTOR_DIMENSIONS], row: &[f64; VECTOR_DIMENSIONS]) -> f64 {
    let d2: f64 = query.iter().zip(row).map(|(q, r)| (q - r) * (q - r)).sum();
    1.0 / (1.0 + d2)
}

#[async_trait::async_trait]
impl VectorIndex for MemoryIndex {
    async fn query(&self, request: &QueryRequest) -> Result<Vec<QueryMatch>> {
        let hits = self.search(request)?;
        tracing::debug!(rows = self.len(), hits = hits.len(), "memory index query");
        Ok(hits)
    }
}
