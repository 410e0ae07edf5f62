//! JSON wire shape of change batches and events.
//!
//! ```text
//! {
//!   "structural": [
//!     { "type": "insert", "parentId": 0, "childId": 1, "kind": 1, "childIndex": 0 },
//!     { "type": "move", "parentId": 0, "fromIndex": 0, "toIndex": 2, "count": 1 },
//!     { "type": "remove", "parentId": 0, "index": 0, "count": 1 },
//!     { "type": "clear" }
//!   ],
//!   "properties": [
//!     { "nodeId": 1, "tag": 1, "value": "Hi" }
//!   ]
//! }
//! ```
//!
//! Events are encoded as `{ "id": 1, "tag": 1, "value": "text" }` with `value` omitted when null.
//! JSON has no spelling for NaN or the infinities, so messages carrying them are refused.
//! Transport framing is left to the embedder.

use alloc::string::String;

use thiserror::Error;

use crate::change::{Change, ChangeBatch};
use crate::event::Event;
use crate::value::Value;

/// Errors produced while encoding or decoding protocol messages.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The message could not be serialized.
    #[error("failed to encode protocol message: {0}")]
    Encode(#[source] serde_json::Error),
    /// The message is not valid JSON or does not match the protocol shape.
    #[error("failed to decode protocol message: {0}")]
    Decode(#[source] serde_json::Error),
    /// A number is NaN or infinite and has no JSON representation.
    #[error("cannot encode non-finite number {0}")]
    NonFinite(f64),
}

fn ensure_finite(value: &Value) -> Result<(), CodecError> {
    match value {
        Value::Number(number) if !number.is_finite() => Err(CodecError::NonFinite(*number)),
        _ => Ok(()),
    }
}

/// Encodes a change batch.
///
/// # Errors
///
/// Returns [`CodecError::NonFinite`] if a property value is NaN or infinite, and
/// [`CodecError::Encode`] if serialization fails.
pub fn encode_batch(batch: &ChangeBatch) -> Result<String, CodecError> {
    let misplaced = batch.structural.iter().filter_map(|change| match change {
        Change::Property(property) => Some(property),
        _ => None,
    });
    for property in misplaced.chain(&batch.properties) {
        ensure_finite(&property.value)?;
    }
    serde_json::to_string(batch).map_err(CodecError::Encode)
}

/// Decodes a change batch.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] if `input` is not a valid change batch.
pub fn decode_batch(input: &str) -> Result<ChangeBatch, CodecError> {
    serde_json::from_str(input).map_err(CodecError::Decode)
}

/// Encodes an event.
///
/// # Errors
///
/// Returns [`CodecError::NonFinite`] if the payload is NaN or infinite, and
/// [`CodecError::Encode`] if serialization fails.
pub fn encode_event(event: &Event) -> Result<String, CodecError> {
    ensure_finite(&event.value)?;
    serde_json::to_string(event).map_err(CodecError::Encode)
}

/// Decodes an event.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] if `input` is not a valid event.
pub fn decode_event(input: &str) -> Result<Event, CodecError> {
    serde_json::from_str(input).map_err(CodecError::Decode)
}
