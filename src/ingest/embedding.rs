//! Embedding-service response decoding
//!
//! Providers wrap the vector in different envelopes. Each known envelope is a
//! named rule tried in a fixed order; the first one that yields a numeric
//! vector of the expected dimension wins.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmbeddingDecodeError {
    /// A known envelope held a vector of the wrong size
    #[error("embedding from rule '{rule}' has {actual} dimensions, expected {expected}")]
    DimensionMismatch {
        rule: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("response matches no known embedding shape")]
    UnrecognizedShape,
}

type ExtractionRule = fn(&Value) -> Option<&Value>;

fn flat_embedding(v: &Value) -> Option<&Value> {
    v.get("embedding")
}

fn embedding_values(v: &Value) -> Option<&Value> {
    v.get("embedding")?.get("values")
}

fn first_embeddings_values(v: &Value) -> Option<&Value> {
    v.get("embeddings")?.get(0)?.get("values")
}

fn first_data_embedding(v: &Value) -> Option<&Value> {
    v.get("data")?.get(0)?.get("embedding")
}

fn bare_array(v: &Value) -> Option<&Value> {
    Some(v)
}

const RULES: &[(&str, ExtractionRule)] = &[
    ("embedding", flat_embedding),
    ("embedding.values", embedding_values),
    ("embeddings[0].values", first_embeddings_values),
    ("data[0].embedding", first_data_embedding),
    ("bare array", bare_array),
];

/// Decode a `dimension`-sized embedding out of a service response
///
/// # Errors
///
/// `DimensionMismatch` when the only numeric vectors found have the wrong
/// length, `UnrecognizedShape` when no rule finds a numeric vector at all.
pub fn decode_embedding(response: &Value, dimension: usize) -> Result<Vec<f32>, EmbeddingDecodeError> {
    let mut mismatch = None;

    for &(rule, extract) in RULES {
        let Some(vector) = extract(response).and_then(numeric_vector) else {
            continue;
        };
        if vector.len() == dimension {
            return Ok(vector);
        }
        mismatch.get_or_insert(EmbeddingDecodeError::DimensionMismatch {
            rule,
            expected: dimension,
            actual: vector.len(),
        });
    }

    Err(mismatch.unwrap_or(EmbeddingDecodeError::UnrecognizedShape))
}

/// Non-empty array made only of numbers
fn numeric_vector(value: &Value) -> Option<Vec<f32>> {
    let items = value.as_array().filter(|items| !items.is_empty())?;
    items
        .iter()
        .map(|item| item.as_f64().map(|n| n as f32))
        .collect()
}
