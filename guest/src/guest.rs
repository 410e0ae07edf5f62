//! Change recording and event dispatch on the guest side.

use std::collections::HashMap;

use tracing::{debug, trace};
use waterui_protocol_core::bounds::{
    IndexError, adjusted_move_index, validate_insert, validate_move, validate_remove,
};
use waterui_protocol_core::{
    Change, ChangeBatch, Event, EventTag, MismatchPolicy, NodeId, PropertyChange, PropertyTag,
    ProtocolError, Throwing, Value, WidgetKind,
};

use crate::handler::BoxEventHandler;
use crate::schema::GuestSchema;

/// An installed callback. `handler` is `None` while the callback runs.
#[derive(Debug)]
struct Callback {
    property: PropertyTag,
    handler: Option<BoxEventHandler>,
}

#[derive(Debug)]
struct ShadowNode {
    kind: WidgetKind,
    children: Vec<NodeId>,
    callbacks: HashMap<EventTag, Callback>,
}

impl ShadowNode {
    fn new(kind: WidgetKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
            callbacks: HashMap::new(),
        }
    }
}

/// The guest end of one tree instance.
///
/// Every mutation is validated against a shadow copy of the tree, mirrored into it and recorded
/// as a [`Change`]. [`take_changes`](Self::take_changes) hands the recorded batch to the host.
/// Events coming back are routed to the callbacks installed with
/// [`set_callback`](Self::set_callback).
#[derive(Debug)]
pub struct ProtocolGuest {
    next_id: u32,
    nodes: HashMap<NodeId, ShadowNode>,
    changes: ChangeBatch,
    schema: GuestSchema,
    policy: Box<dyn MismatchPolicy>,
}

impl ProtocolGuest {
    /// Creates a guest holding only the root.
    ///
    /// Mismatches are fatal until another policy is installed.
    #[must_use]
    pub fn new(schema: GuestSchema) -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(NodeId::ROOT, ShadowNode::new(WidgetKind::ROOT));
        Self {
            next_id: NodeId::ROOT.value() + 1,
            nodes,
            changes: ChangeBatch::new(),
            schema,
            policy: Box::new(Throwing),
        }
    }

    /// Replaces the mismatch policy.
    #[must_use]
    pub fn with_policy(self, policy: impl MismatchPolicy + 'static) -> Self {
        self.with_boxed_policy(Box::new(policy))
    }

    /// Replaces the mismatch policy with an already boxed one.
    #[must_use]
    pub fn with_boxed_policy(mut self, policy: Box<dyn MismatchPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// The schema events are checked against.
    #[must_use]
    pub const fn schema(&self) -> &GuestSchema {
        &self.schema
    }

    /// Returns `true` if node `id` is tracked.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Widget kind of node `id`.
    #[must_use]
    pub fn kind_of(&self, id: NodeId) -> Option<WidgetKind> {
        self.nodes.get(&id).map(|node| node.kind)
    }

    /// Children of node `id` in order.
    #[must_use]
    pub fn children_of(&self, id: NodeId) -> Option<&[NodeId]> {
        self.nodes.get(&id).map(|node| node.children.as_slice())
    }

    /// Ids of all tracked nodes in ascending order, root included.
    #[must_use]
    pub fn live_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.nodes.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Creates a node of `kind` under `parent` at `index` and returns its freshly allocated id.
    ///
    /// Ids start at 1 and are never reused within one guest.
    ///
    /// # Errors
    ///
    /// Fails with [`ProtocolError::UnknownParent`] or [`ProtocolError::IndexOutOfRange`], and
    /// with [`ProtocolError::IdsExhausted`] once `u32::MAX - 1` ids were allocated.
    pub fn insert(
        &mut self,
        parent: NodeId,
        index: usize,
        kind: WidgetKind,
    ) -> Result<NodeId, ProtocolError> {
        let children = &mut self
            .nodes
            .get_mut(&parent)
            .ok_or(ProtocolError::UnknownParent(parent))?
            .children;
        validate_insert(children.len(), index).map_err(|error| out_of_range(parent, error))?;

        let id = NodeId::new(self.next_id);
        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or(ProtocolError::IdsExhausted)?;
        children.insert(index, id);
        self.nodes.insert(id, ShadowNode::new(kind));
        self.record(Change::Insert {
            parent_id: parent,
            child_id: id,
            kind,
            child_index: index,
        });
        Ok(id)
    }

    /// Moves `count` children of `parent` from `from` to the insertion point `to`.
    ///
    /// # Errors
    ///
    /// Fails with [`ProtocolError::UnknownParent`] or [`ProtocolError::IndexOutOfRange`].
    pub fn move_children(
        &mut self,
        parent: NodeId,
        from: usize,
        to: usize,
        count: usize,
    ) -> Result<(), ProtocolError> {
        let children = &mut self
            .nodes
            .get_mut(&parent)
            .ok_or(ProtocolError::UnknownParent(parent))?
            .children;
        validate_move(children.len(), from, to, count)
            .map_err(|error| out_of_range(parent, error))?;

        let moved: Vec<NodeId> = children.drain(from..from + count).collect();
        let dest = adjusted_move_index(from, to, count);
        children.splice(dest..dest, moved);
        self.record(Change::Move {
            parent_id: parent,
            from_index: from,
            to_index: to,
            count,
        });
        Ok(())
    }

    /// Removes `count` children of `parent` starting at `index`.
    ///
    /// The removed nodes and all their descendants stop being tracked, together with their
    /// callbacks.
    ///
    /// # Errors
    ///
    /// Fails with [`ProtocolError::UnknownParent`] or [`ProtocolError::IndexOutOfRange`].
    pub fn remove_children(
        &mut self,
        parent: NodeId,
        index: usize,
        count: usize,
    ) -> Result<(), ProtocolError> {
        let children = &mut self
            .nodes
            .get_mut(&parent)
            .ok_or(ProtocolError::UnknownParent(parent))?
            .children;
        validate_remove(children.len(), index, count)
            .map_err(|error| out_of_range(parent, error))?;

        let mut pending: Vec<NodeId> = children.drain(index..index + count).collect();
        while let Some(id) = pending.pop() {
            if let Some(node) = self.nodes.remove(&id) {
                pending.extend(node.children);
            }
        }
        self.record(Change::Remove {
            parent_id: parent,
            index,
            count,
        });
        Ok(())
    }

    /// Removes every node but the root.
    pub fn clear(&mut self) {
        self.nodes.retain(|id, _| id.is_root());
        if let Some(root) = self.nodes.get_mut(&NodeId::ROOT) {
            root.children.clear();
        }
        self.record(Change::Clear);
    }

    /// Sets property `tag` of node `id`.
    ///
    /// # Errors
    ///
    /// Fails with [`ProtocolError::UnknownId`] if `id` is not tracked.
    pub fn set_property(
        &mut self,
        id: NodeId,
        tag: PropertyTag,
        value: impl Into<Value>,
    ) -> Result<(), ProtocolError> {
        if !self.nodes.contains_key(&id) {
            return Err(ProtocolError::UnknownId(id));
        }
        self.record(PropertyChange::new(id, tag, value));
        Ok(())
    }

    /// Installs or removes the callback behind the callback-valued property `property`.
    ///
    /// The host receives `true` when a handler is installed and `false` when it is removed.
    /// Events tagged `event` from node `id` are routed to `handler`.
    ///
    /// # Errors
    ///
    /// Fails with [`ProtocolError::UnknownId`] if `id` is not tracked.
    pub fn set_callback(
        &mut self,
        id: NodeId,
        property: PropertyTag,
        event: EventTag,
        handler: Option<BoxEventHandler>,
    ) -> Result<(), ProtocolError> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(ProtocolError::UnknownId(id))?;
        let installed = handler.is_some();
        match handler {
            Some(handler) => {
                node.callbacks.insert(
                    event,
                    Callback {
                        property,
                        handler: Some(handler),
                    },
                );
            }
            None => {
                node.callbacks.remove(&event);
            }
        }
        self.record(PropertyChange::new(id, property, installed));
        Ok(())
    }

    /// Property tag of the callback routed from `event` on node `id`, if one is installed.
    #[must_use]
    pub fn callback_property(&self, id: NodeId, event: EventTag) -> Option<PropertyTag> {
        self.nodes
            .get(&id)?
            .callbacks
            .get(&event)
            .map(|callback| callback.property)
    }

    /// Returns `true` if changes are waiting to be taken.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Takes every change recorded since the last call.
    pub fn take_changes(&mut self) -> ChangeBatch {
        core::mem::take(&mut self.changes)
    }

    /// Routes `event` to the callback installed on its node.
    ///
    /// An event for a known tag without an installed callback is ignored.
    ///
    /// # Errors
    ///
    /// Returns the mismatch policy's verdict for untracked nodes and unknown event tags.
    pub fn dispatch(&mut self, event: &Event) -> Result<(), ProtocolError> {
        let Some(node) = self.nodes.get_mut(&event.id) else {
            return self.policy.on_unknown_event_node(event.id, event.tag);
        };
        let kind = node.kind;
        if !self.schema.knows_event(kind, event.tag) {
            return self.policy.on_unknown_event_tag(event.id, kind, event.tag);
        }

        let handler = node
            .callbacks
            .get_mut(&event.tag)
            .and_then(|callback| callback.handler.take());
        let Some(mut handler) = handler else {
            debug!(
                id = event.id.value(),
                tag = event.tag.value(),
                "No callback installed, ignoring event"
            );
            return Ok(());
        };

        trace!(id = event.id.value(), tag = event.tag.value(), "Dispatching event");
        handler.handle(self, &event.value);

        // The handler may have replaced or removed its own callback, or removed the node.
        let slot = self
            .nodes
            .get_mut(&event.id)
            .and_then(|node| node.callbacks.get_mut(&event.tag));
        if let Some(callback) = slot {
            callback.handler.get_or_insert(handler);
        }
        Ok(())
    }

    fn record(&mut self, change: impl Into<Change>) {
        let change = change.into();
        trace!(?change, "Recording change");
        self.changes.push(change);
    }
}

fn out_of_range(parent: NodeId, error: IndexError) -> ProtocolError {
    ProtocolError::IndexOutOfRange {
        parent,
        detail: error.0,
    }
}
