//! Error taxonomy shared by the host apply engine and the guest event dispatch.

use alloc::string::String;

use thiserror::Error;

use crate::id::{EventTag, NodeId, PropertyTag, WidgetKind};

/// Errors raised while applying a change batch or dispatching an event.
///
/// Structural violations ([`UnknownId`](Self::UnknownId), [`UnknownParent`](Self::UnknownParent),
/// [`DuplicateChildId`](Self::DuplicateChildId), [`IndexOutOfRange`](Self::IndexOutOfRange),
/// [`InvalidValue`](Self::InvalidValue) and [`IdsExhausted`](Self::IdsExhausted)) always stop
/// the batch. The remaining variants describe
/// version skew and are only raised when the configured
/// [`MismatchPolicy`](crate::MismatchPolicy) decides so.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// A change references a node which is not registered.
    #[error("unknown node id {}", .0.value())]
    UnknownId(NodeId),

    /// A structural change targets a parent which is not registered.
    #[error("unknown parent id {}", .0.value())]
    UnknownParent(NodeId),

    /// An insert reuses the id of a live node.
    #[error("insert attempted to replace existing node with id {}", .0.value())]
    DuplicateChildId(NodeId),

    /// A structural change violates the bounds of a children container.
    #[error("index out of range for children of node {}: {detail}", .parent.value())]
    IndexOutOfRange {
        /// Node whose children were addressed.
        parent: NodeId,
        /// Description of the violated bound.
        detail: String,
    },

    /// The host does not know how to construct the requested widget kind.
    #[error("unknown widget kind {} for parent {}", .kind.value(), .parent.value())]
    UnknownWidgetKind {
        /// Parent the node would have been inserted into.
        parent: NodeId,
        /// Requested widget kind.
        kind: WidgetKind,
    },

    /// The node's widget kind has no setter for the property.
    #[error("unknown property tag {} for widget kind {} (node {})", .tag.value(), .kind.value(), .id.value())]
    UnknownPropertyTag {
        /// Node the property change targets.
        id: NodeId,
        /// Widget kind of that node.
        kind: WidgetKind,
        /// Unrecognized property tag.
        tag: PropertyTag,
    },

    /// A structural change targets a node whose widget kind cannot hold children.
    #[error("widget kind {} of node {} has no children", .kind.value(), .id.value())]
    UnknownChildren {
        /// Node the structural change targets.
        id: NodeId,
        /// Widget kind of that node.
        kind: WidgetKind,
    },

    /// An event carries a tag the guest does not know for the node's widget kind.
    #[error("unknown event tag {} for widget kind {} (node {})", .tag.value(), .kind.value(), .id.value())]
    UnknownEventTag {
        /// Node the event originated from.
        id: NodeId,
        /// Widget kind of that node.
        kind: WidgetKind,
        /// Unrecognized event tag.
        tag: EventTag,
    },

    /// An event originated from a node the guest does not track.
    #[error("unknown event node {} for event tag {}", .id.value(), .tag.value())]
    UnknownEventNode {
        /// Untracked node id.
        id: NodeId,
        /// Event tag carried by the event.
        tag: EventTag,
    },

    /// A setter could not coerce the value to the shape it expects.
    #[error("invalid value for property tag {} of node {}: expected {expected}, found {found}", .tag.value(), .id.value())]
    InvalidValue {
        /// Node the property change targets.
        id: NodeId,
        /// Property tag being set.
        tag: PropertyTag,
        /// Shape the setter expects.
        expected: &'static str,
        /// Shape that was received.
        found: &'static str,
    },

    /// The guest has handed out every node id.
    #[error("node ids exhausted")]
    IdsExhausted,
}

impl ProtocolError {
    /// Returns `true` for the version-skew errors governed by a mismatch policy.
    #[must_use]
    pub const fn is_mismatch(&self) -> bool {
        matches!(
            self,
            Self::UnknownWidgetKind { .. }
                | Self::UnknownPropertyTag { .. }
                | Self::UnknownChildren { .. }
                | Self::UnknownEventTag { .. }
                | Self::UnknownEventNode { .. }
        )
    }
}
