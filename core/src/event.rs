//! Notifications sent from the host back to the guest.

use serde::{Deserialize, Serialize};

use crate::id::{EventTag, NodeId};
use crate::value::Value;

/// Reports that node `id` experienced interaction `tag`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Node on which the interaction happened.
    pub id: NodeId,
    /// Which interaction happened. Only meaningful together with the node's widget kind.
    pub tag: EventTag,
    /// Optional payload, for example the new text of an input field.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub value: Value,
}

impl Event {
    /// Creates an event carrying `value`.
    #[must_use]
    pub fn new(id: NodeId, tag: EventTag, value: impl Into<Value>) -> Self {
        Self {
            id,
            tag,
            value: value.into(),
        }
    }

    /// Creates an event without payload.
    #[must_use]
    pub const fn signal(id: NodeId, tag: EventTag) -> Self {
        Self {
            id,
            tag,
            value: Value::Null,
        }
    }
}
