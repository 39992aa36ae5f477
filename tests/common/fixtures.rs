//! Static catalog used across harnesses.
//!
//! Twelve cotton shirts spread over the default color and size vocabulary
//! with distinct prices, so ranking by price bias is fully determined.

use shelf_core::ItemRecord;
use shelf_index::MemoryIndex;

/// `(id, color, size, price)`
pub const CATALOG: &[(&str, &str, &str, f64)] = &[
    ("shirt-01", "white", "S", 12.0),
    ("shirt-02", "white", "M", 18.0),
    ("shirt-03", "beige", "L", 22.0),
    ("shirt-04", "beige", "S", 27.0),
    ("shirt-05", "blue", "S", 9.0),
    ("shirt-06", "blue", "M", 31.0),
    ("shirt-07", "blue", "L", 44.0),
    ("shirt-08", "green", "M", 15.0),
    ("shirt-09", "green", "L", 38.0),
    ("shirt-10", "purple", "S", 25.0),
    ("shirt-11", "purple", "M", 49.0),
    ("shirt-12", "purple", "L", 35.0),
];

pub fn catalog_records() -> Vec<ItemRecord> {
    CATALOG
        .iter()
        .map(|&(id, color, size, price)| ItemRecord {
            id: id.to_string(),
            name: format!("{color} cotton shirt"),
            image_id: format!("/{color}_{size}.png"),
            size: size.to_string(),
            color: color.to_string(),
            price,
        })
        .collect()
}

/// A [`MemoryIndex`] loaded with [`CATALOG`].
pub fn catalog_index() -> MemoryIndex {
    MemoryIndex::from_records(catalog_records())
}

/// Transport body with the given facets.
pub fn filter_body(sort: &str, color: &[&str], size: &[&str], price: [f64; 2]) -> serde_json::Value {
    serde_json::json!({
        "filter": { "sort": sort, "color": color, "size": size, "price": price }
    })
}
