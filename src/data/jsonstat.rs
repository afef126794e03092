//! JSON-stat payload decoding (statistics API convention).
//!
//! Only the parts needed to rebuild a time series are modelled:
//!
//! ```text
//! { "dimension": { "time": { "category": { "index": { "2023M07": 0, ... } } } },
//!   "value": { "0": 3.1, ... } }
//! ```
//!
//! `index` may also be an array of codes, and `value` a dense array with nulls.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::data::RawObservations;

#[derive(Debug, Deserialize)]
pub struct JsonStatPayload {
    dimension: Dimensions,
    value: ValueField,
}

#[derive(Debug, Deserialize)]
struct Dimensions {
    time: Dimension,
}

#[derive(Debug, Deserialize)]
struct Dimension {
    category: Category,
}

#[derive(Debug, Deserialize)]
struct Category {
    index: CategoryIndex,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CategoryIndex {
    Map(BTreeMap<String, usize>),
    List(Vec<String>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ValueField {
    Map(BTreeMap<String, Option<f64>>),
    Dense(Vec<Option<f64>>),
}

impl JsonStatPayload {
    pub fn into_raw(self) -> RawObservations {
        let code_index: Vec<(String, usize)> = match self.dimension.time.category.index {
            CategoryIndex::Map(map) => map.into_iter().collect(),
            CategoryIndex::List(codes) => codes.into_iter().enumerate().map(|(i, c)| (c, i)).collect(),
        };

        let values = match self.value {
            ValueField::Map(map) => map
                .into_iter()
                .filter_map(|(key, v)| v.map(|v| (key, v)))
                .collect(),
            ValueField::Dense(values) => values
                .into_iter()
                .enumerate()
                .filter_map(|(i, v)| v.map(|v| (i.to_string(), v)))
                .collect(),
        };

        RawObservations::from_code_index(code_index, values)
    }
}

/// Decode a JSON-stat body.
pub fn parse_json_stat(body: &str) -> Result<RawObservations, serde_json::Error> {
    let payload: JsonStatPayload = serde_json::from_str(body)?;
    Ok(payload.into_raw())
}
