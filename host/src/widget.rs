//! Platform widgets as seen by the apply engine.

use std::fmt::Debug;

use thiserror::Error;
use waterui_protocol_core::{PropertyTag, Value, WidgetKind};

use crate::children::Children;
use crate::sink::NodeEventSink;

/// Failure of a property setter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    /// The widget has no setter for the tag.
    #[error("unknown property tag")]
    UnknownTag,
    /// The value has the wrong shape.
    #[error("expected {expected}, found {found}")]
    InvalidValue {
        /// Shape the setter expects.
        expected: &'static str,
        /// Shape that was received.
        found: &'static str,
    },
}

impl PropertyError {
    /// Builds an [`InvalidValue`](Self::InvalidValue) error for `value`.
    #[must_use]
    pub fn invalid(expected: &'static str, value: &Value) -> Self {
        Self::InvalidValue {
            expected,
            found: value.shape(),
        }
    }
}

/// A platform widget created by a [`WidgetFactory`](crate::WidgetFactory).
///
/// `W` is the platform handle inserted into the parent's [`Children`].
pub trait Widget<W>: Debug {
    /// The widget kind this instance was created for.
    fn kind(&self) -> WidgetKind;

    /// The platform handle to attach to the parent.
    fn value(&self) -> W;

    /// Applies property `tag`.
    ///
    /// Callback-valued properties receive `Value::Bool(true)` when the guest installed a handler
    /// and `Value::Bool(false)` when it removed it; the widget reports interaction through
    /// `events`.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::UnknownTag`] if the widget has no such property and
    /// [`PropertyError::InvalidValue`] if `value` cannot be coerced.
    fn apply(
        &mut self,
        tag: PropertyTag,
        value: &Value,
        events: &NodeEventSink,
    ) -> Result<(), PropertyError>;

    /// The widget's children container, if it can hold children.
    fn children(&mut self) -> Option<&mut dyn Children<W>> {
        None
    }

    /// Called once the node has been removed from the tree and unregistered.
    fn detach(&mut self) {}
}
