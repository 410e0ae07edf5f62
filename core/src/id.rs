//! Identifier space of the protocol.
//!
//! Node identifiers are assigned by the guest and are unique within one tree instance for its
//! whole lifetime. [`NodeId::ROOT`] is reserved for the root of the tree: it is never inserted,
//! moved or removed itself, only its children change.
//!
//! Widget kinds, property tags and event tags are small integers defined by the widget schema.
//! Property and event tags are only unique within one widget kind.

use core::fmt;

use serde::{Deserialize, Serialize};

macro_rules! raw_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            #[doc = concat!("Creates a new [`", stringify!($name), "`] from its raw value.")]
            #[must_use]
            pub const fn new(value: u32) -> Self {
                Self(value)
            }

            /// Returns the raw value backing this identifier.
            #[must_use]
            pub const fn value(self) -> u32 {
                self.0
            }
        }

        impl From<u32> for $name {
            fn from(value: u32) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, " {}"), self.0)
            }
        }
    };
}

raw_id!(
    /// Identifier of a node inside one tree instance.
    NodeId,
    "node"
);

raw_id!(
    /// Identifies which concrete widget type a node is an instance of.
    WidgetKind,
    "widget kind"
);

raw_id!(
    /// Identifies a settable attribute of a widget kind.
    PropertyTag,
    "property tag"
);

raw_id!(
    /// Identifies a user interaction a widget kind can report.
    EventTag,
    "event tag"
);

impl NodeId {
    /// The reserved identifier of the tree root.
    pub const ROOT: Self = Self(0);

    /// Returns `true` when this is the reserved root identifier.
    #[must_use]
    pub const fn is_root(self) -> bool {
        self.0 == Self::ROOT.0
    }
}

impl WidgetKind {
    /// Kind reported by the synthetic root node. Factories never produce it.
    pub const ROOT: Self = Self(0);
}
