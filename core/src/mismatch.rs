//! Handling of version skew between guest and host.
//!
//! Guest and host code may be built from different versions of the widget schema, for example
//! when the guest is hot-reloaded against an older host. Every "I don't know this kind/tag/id"
//! decision on either side is routed through one [`MismatchPolicy`] so both sides can be upgraded
//! independently.

use alloc::boxed::Box;
use core::{fmt::Debug, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ProtocolError;
use crate::id::{EventTag, NodeId, PropertyTag, WidgetKind};

/// Decides what happens when the protocol encounters an entity it does not know.
///
/// Returning `Ok(())` skips the offending change or event and lets the rest of the batch or
/// stream continue. Returning an error stops processing.
pub trait MismatchPolicy: Debug {
    /// The host factory cannot construct `kind` for an insert under `parent`.
    ///
    /// # Errors
    ///
    /// Returns an error when the mismatch must abort the batch.
    fn on_unknown_widget_kind(&self, parent: NodeId, kind: WidgetKind)
    -> Result<(), ProtocolError>;

    /// Node `id` of widget `kind` has no setter for property `tag`.
    ///
    /// # Errors
    ///
    /// Returns an error when the mismatch must abort the batch.
    fn on_unknown_property_tag(
        &self,
        id: NodeId,
        kind: WidgetKind,
        tag: PropertyTag,
    ) -> Result<(), ProtocolError>;

    /// A structural change targets node `id` whose widget `kind` cannot hold children.
    ///
    /// # Errors
    ///
    /// Returns an error when the mismatch must abort the batch.
    fn on_unknown_children(&self, id: NodeId, kind: WidgetKind) -> Result<(), ProtocolError>;

    /// The guest does not know event `tag` for widget `kind`.
    ///
    /// Invoked once per offending event; use `kind` and `tag` to de-duplicate if desired.
    ///
    /// # Errors
    ///
    /// Returns an error when the mismatch must abort event processing.
    fn on_unknown_event_tag(
        &self,
        id: NodeId,
        kind: WidgetKind,
        tag: EventTag,
    ) -> Result<(), ProtocolError>;

    /// The guest does not track node `id` which produced an event.
    ///
    /// # Errors
    ///
    /// Returns an error when the mismatch must abort event processing.
    fn on_unknown_event_node(&self, id: NodeId, tag: EventTag) -> Result<(), ProtocolError>;
}

/// Treats every mismatch as a fatal protocol error.
#[derive(Debug, Clone, Copy, Default)]
pub struct Throwing;

impl MismatchPolicy for Throwing {
    fn on_unknown_widget_kind(
        &self,
        parent: NodeId,
        kind: WidgetKind,
    ) -> Result<(), ProtocolError> {
        Err(ProtocolError::UnknownWidgetKind { parent, kind })
    }

    fn on_unknown_property_tag(
        &self,
        id: NodeId,
        kind: WidgetKind,
        tag: PropertyTag,
    ) -> Result<(), ProtocolError> {
        Err(ProtocolError::UnknownPropertyTag { id, kind, tag })
    }

    fn on_unknown_children(&self, id: NodeId, kind: WidgetKind) -> Result<(), ProtocolError> {
        Err(ProtocolError::UnknownChildren { id, kind })
    }

    fn on_unknown_event_tag(
        &self,
        id: NodeId,
        kind: WidgetKind,
        tag: EventTag,
    ) -> Result<(), ProtocolError> {
        Err(ProtocolError::UnknownEventTag { id, kind, tag })
    }

    fn on_unknown_event_node(&self, id: NodeId, tag: EventTag) -> Result<(), ProtocolError> {
        Err(ProtocolError::UnknownEventNode { id, tag })
    }
}

/// Reports every mismatch through `tracing` and skips the offending change or event.
#[derive(Debug, Clone, Copy, Default)]
pub struct Logging;

impl MismatchPolicy for Logging {
    fn on_unknown_widget_kind(
        &self,
        parent: NodeId,
        kind: WidgetKind,
    ) -> Result<(), ProtocolError> {
        warn!(
            parent = parent.value(),
            kind = kind.value(),
            "Skipping insert of unknown widget kind"
        );
        Ok(())
    }

    fn on_unknown_property_tag(
        &self,
        id: NodeId,
        kind: WidgetKind,
        tag: PropertyTag,
    ) -> Result<(), ProtocolError> {
        warn!(
            id = id.value(),
            kind = kind.value(),
            tag = tag.value(),
            "Skipping unknown property tag"
        );
        Ok(())
    }

    fn on_unknown_children(&self, id: NodeId, kind: WidgetKind) -> Result<(), ProtocolError> {
        warn!(
            id = id.value(),
            kind = kind.value(),
            "Skipping children change on widget without children"
        );
        Ok(())
    }

    fn on_unknown_event_tag(
        &self,
        id: NodeId,
        kind: WidgetKind,
        tag: EventTag,
    ) -> Result<(), ProtocolError> {
        warn!(
            id = id.value(),
            kind = kind.value(),
            tag = tag.value(),
            "Dropping event with unknown tag"
        );
        Ok(())
    }

    fn on_unknown_event_node(&self, id: NodeId, tag: EventTag) -> Result<(), ProtocolError> {
        warn!(
            id = id.value(),
            tag = tag.value(),
            "Dropping event for untracked node"
        );
        Ok(())
    }
}

/// Selects one of the built-in policies, typically from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    /// [`Throwing`].
    #[default]
    Throwing,
    /// [`Logging`].
    Logging,
}

impl PolicyKind {
    /// Boxes the selected built-in policy.
    #[must_use]
    pub fn into_policy(self) -> Box<dyn MismatchPolicy> {
        match self {
            Self::Throwing => Box::new(Throwing),
            Self::Logging => Box::new(Logging),
        }
    }
}

/// Error returned when parsing an unknown policy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mismatch policy `{0}`, expected `throwing` or `logging`")]
pub struct UnknownPolicy(pub alloc::string::String);

impl FromStr for PolicyKind {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "throwing" => Ok(Self::Throwing),
            "logging" => Ok(Self::Logging),
            other => Err(UnknownPolicy(other.into())),
        }
    }
}
