//! The guest's view of the widget schema.

use std::collections::{HashMap, HashSet};

use waterui_protocol_core::{EventTag, WidgetKind};

/// Event tags the guest understands, per widget kind.
///
/// Events whose tag is missing here are routed to the mismatch policy instead of a handler.
#[derive(Debug, Clone, Default)]
pub struct GuestSchema {
    events: HashMap<WidgetKind, HashSet<EventTag>>,
}

impl GuestSchema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `kind` together with the event tags it can emit.
    pub fn register(&mut self, kind: WidgetKind, events: impl IntoIterator<Item = EventTag>) {
        self.events.entry(kind).or_default().extend(events);
    }

    /// Builder form of [`register`](Self::register).
    #[must_use]
    pub fn with(mut self, kind: WidgetKind, events: impl IntoIterator<Item = EventTag>) -> Self {
        self.register(kind, events);
        self
    }

    /// Returns `true` if `kind` was declared.
    #[must_use]
    pub fn knows_kind(&self, kind: WidgetKind) -> bool {
        self.events.contains_key(&kind)
    }

    /// Returns `true` if widgets of `kind` can emit `tag`.
    #[must_use]
    pub fn knows_event(&self, kind: WidgetKind, tag: EventTag) -> bool {
        self.events
            .get(&kind)
            .is_some_and(|events| events.contains(&tag))
    }
}
