//! The change vocabulary sent from the guest to the host.
//!
//! A [`ChangeBatch`] is an ordered pair of sequences: structural changes and property changes.
//! Producers may record them in any interleaving; the host always applies every structural
//! change of a batch before any property change of the same batch.

use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::id::{NodeId, PropertyTag, WidgetKind};
use crate::value::Value;

/// A single mutation of the widget tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Change {
    /// Create a node of `kind` and insert it under `parent_id` at `child_index`.
    #[serde(rename_all = "camelCase")]
    Insert {
        /// Node whose children change.
        parent_id: NodeId,
        /// Identifier under which the new node is registered.
        child_id: NodeId,
        /// Widget kind to instantiate.
        kind: WidgetKind,
        /// Position of the new node among the children of `parent_id`.
        child_index: usize,
    },
    /// Relocate `count` contiguous children of `parent_id`.
    #[serde(rename_all = "camelCase")]
    Move {
        /// Node whose children change.
        parent_id: NodeId,
        /// Index of the first moved child.
        from_index: usize,
        /// Insertion point, expressed against the children before the move.
        to_index: usize,
        /// Number of moved children.
        count: usize,
    },
    /// Detach `count` contiguous children of `parent_id`.
    #[serde(rename_all = "camelCase")]
    Remove {
        /// Node whose children change.
        parent_id: NodeId,
        /// Index of the first removed child.
        index: usize,
        /// Number of removed children.
        count: usize,
    },
    /// Detach every child of the root and forget every node but the root.
    Clear,
    /// Set one attribute of an existing node.
    Property(PropertyChange),
}

impl Change {
    /// The node whose children (or, for property changes, whose own state) are affected.
    #[must_use]
    pub const fn subject(&self) -> NodeId {
        match self {
            Self::Insert { parent_id, .. }
            | Self::Move { parent_id, .. }
            | Self::Remove { parent_id, .. } => *parent_id,
            Self::Clear => NodeId::ROOT,
            Self::Property(change) => change.node_id,
        }
    }

    /// Returns `true` for every variant except [`Change::Property`].
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        !matches!(self, Self::Property(_))
    }
}

/// Assignment of a single property on an existing node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyChange {
    /// Node whose property changes.
    pub node_id: NodeId,
    /// Which property changes. Only meaningful together with the node's widget kind.
    pub tag: PropertyTag,
    /// The new value.
    #[serde(default)]
    pub value: Value,
}

impl PropertyChange {
    /// Creates a new [`PropertyChange`].
    #[must_use]
    pub fn new(node_id: NodeId, tag: PropertyTag, value: impl Into<Value>) -> Self {
        Self {
            node_id,
            tag,
            value: value.into(),
        }
    }
}

impl From<PropertyChange> for Change {
    fn from(value: PropertyChange) -> Self {
        Self::Property(value)
    }
}

/// One ordered unit of changes produced by the guest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeBatch {
    /// Insert, move, remove and clear changes in production order.
    ///
    /// A [`Change::Property`] found here is applied together with the property changes.
    #[serde(default)]
    pub structural: Vec<Change>,
    /// Property changes in production order.
    #[serde(default)]
    pub properties: Vec<PropertyChange>,
}

impl ChangeBatch {
    /// Creates an empty batch.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            structural: Vec::new(),
            properties: Vec::new(),
        }
    }

    /// Appends a change to the sequence it belongs to.
    pub fn push(&mut self, change: impl Into<Change>) {
        match change.into() {
            Change::Property(property) => self.properties.push(property),
            structural => self.structural.push(structural),
        }
    }

    /// Returns `true` if the batch carries no change at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.structural.is_empty() && self.properties.is_empty()
    }

    /// Total number of changes in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.structural.len() + self.properties.len()
    }
}

impl FromIterator<Change> for ChangeBatch {
    fn from_iter<T: IntoIterator<Item = Change>>(iter: T) -> Self {
        let mut batch = Self::new();
        for change in iter {
            batch.push(change);
        }
        batch
    }
}

impl Extend<Change> for ChangeBatch {
    fn extend<T: IntoIterator<Item = Change>>(&mut self, iter: T) {
        for change in iter {
            self.push(change);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert(child: u32) -> Change {
        Change::Insert {
            parent_id: NodeId::ROOT,
            child_id: NodeId::new(child),
            kind: WidgetKind::new(1),
            child_index: 0,
        }
    }

    #[test]
    fn push_splits_by_category() {
        let mut batch = ChangeBatch::new();
        batch.push(PropertyChange::new(NodeId::new(1), PropertyTag::new(1), "Hi"));
        batch.push(insert(1));
        batch.push(Change::Clear);

        assert_eq!(batch.structural, vec![insert(1), Change::Clear]);
        assert_eq!(batch.properties.len(), 1);
        assert_eq!(batch.len(), 3);
        assert!(!batch.is_empty());
    }

    #[test]
    fn subject_of_each_variant() {
        assert_eq!(insert(4).subject(), NodeId::ROOT);
        assert_eq!(Change::Clear.subject(), NodeId::ROOT);
        let move_change = Change::Move {
            parent_id: NodeId::new(3),
            from_index: 0,
            to_index: 2,
            count: 1,
        };
        assert_eq!(move_change.subject(), NodeId::new(3));
        let property: Change = PropertyChange::new(NodeId::new(9), PropertyTag::new(1), true).into();
        assert_eq!(property.subject(), NodeId::new(9));
        assert!(!property.is_structural());
        assert!(move_change.is_structural());
    }

    #[test]
    fn collect_preserves_order_within_each_sequence() {
        let batch: ChangeBatch = vec![
            PropertyChange::new(NodeId::new(1), PropertyTag::new(1), 1).into(),
            insert(1),
            PropertyChange::new(NodeId::new(1), PropertyTag::new(2), 2).into(),
            insert(2),
        ]
        .into_iter()
        .collect();

        assert_eq!(batch.structural, vec![insert(1), insert(2)]);
        assert_eq!(batch.properties[0].tag, PropertyTag::new(1));
        assert_eq!(batch.properties[1].tag, PropertyTag::new(2));
    }
}
