//! Aggregation of successful response bodies.
//!
//! Bodies are assumed to already be JSON documents. The fast path does not parse
//! them: it decodes the whole concatenation `[body,body,...]` as UTF-8 in one go.
//! Only when that fails are the bodies decoded one by one, to name the response
//! that broke the batch. Validation happens later, when the aggregate is parsed
//! by `parse_aggregate` or `fragments`.

use log::{error, warn};
use serde_json::Value;

use crate::error_handling::AggregatorError;
use crate::store::ResponseRecord;

/// Aggregated data in one of the two shapes `return_data` offers.
#[derive(Debug, Clone, PartialEq)]
pub enum ReturnData {
    /// The aggregate parsed as a JSON array
    Json(Value),
    /// One compact JSON string per element of the aggregate
    Fragments(Vec<String>),
}

/// Joins the bodies of the 200 records into one JSON array string.
///
/// # Errors
///
/// - `NoSuccessfulResponses` if `records` is empty
/// - `Decode` naming the first record whose body is not valid UTF-8; the whole
///   aggregation is abandoned rather than skipping that record
pub fn aggregate_bodies(records: &[ResponseRecord]) -> Result<String, AggregatorError> {
    if records.is_empty() {
        error!("No successful responses");
        return Err(AggregatorError::NoSuccessfulResponses);
    }

    let bodies: Vec<&[u8]> = records.iter().map(|r| r.body().unwrap_or_default()).collect();
    let capacity = bodies.iter().map(|b| b.len() + 1).sum::<usize>() + 1;
    let mut joined = Vec::with_capacity(capacity);
    joined.push(b'[');
    for (i, body) in bodies.iter().enumerate() {
        if i > 0 {
            joined.push(b',');
        }
        joined.extend_from_slice(body);
    }
    joined.push(b']');

    match String::from_utf8(joined) {
        Ok(aggregate) => Ok(aggregate),
        Err(_) => {
            warn!("Aggregated bodies are not valid UTF-8; decoding responses individually");
            aggregate_individually(records)
        }
    }
}

fn aggregate_individually(records: &[ResponseRecord]) -> Result<String, AggregatorError> {
    let mut decoded = Vec::with_capacity(records.len());
    for record in records {
        match std::str::from_utf8(record.body().unwrap_or_default()) {
            Ok(text) => decoded.push(text),
            Err(source) => {
                error!("Response body from {} is not valid UTF-8", record.url());
                return Err(AggregatorError::Decode {
                    url: record.url().to_string(),
                    source,
                });
            }
        }
    }
    Ok(format!("[{}]", decoded.join(",")))
}

/// Parses an aggregate, validating every body at once.
///
/// Number text and object key order survive the round trip, so re-serializing the
/// result gives back the bodies' own values.
pub fn parse_aggregate(aggregate: &str) -> Result<Value, AggregatorError> {
    Ok(serde_json::from_str(aggregate)?)
}

/// Splits an aggregate into one compact JSON string per element.
///
/// Parses first and re-serializes each element, so commas and brackets inside
/// payloads never split an element.
pub fn fragments(aggregate: &str) -> Result<Vec<String>, AggregatorError> {
    let elements: Vec<Value> = serde_json::from_str(aggregate)?;
    Ok(elements.iter().map(Value::to_string).collect())
}
