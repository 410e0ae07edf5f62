//! Node registry arena.
//!
//! Maps every live [`NodeId`] to its handle and mirrors the child order of each container, so
//! that removing a node can unregister its whole subtree. The root entry ([`NodeId::ROOT`]) is
//! created with the registry and never removed.

use std::collections::HashMap;

use thiserror::Error;
use waterui_protocol_core::{NodeId, PropertyTag, Value, WidgetKind};

use crate::children::Children;
use crate::sink::NodeEventSink;
use crate::widget::{PropertyError, Widget};

/// Errors raised by [`NodeRegistry`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No node is registered under the id.
    #[error("unknown node id {}", .0.value())]
    UnknownId(NodeId),
    /// A node is already registered under the id.
    #[error("node id {} is already registered", .0.value())]
    DuplicateId(NodeId),
    /// The root entry cannot be unregistered.
    #[error("the root node cannot be unregistered")]
    Root,
}

/// What the registry stores for one node.
#[derive(Debug)]
pub enum NodeHandle<W> {
    /// The host-provided root container.
    Root(Box<dyn Children<W>>),
    /// A widget created from an insert.
    Widget(Box<dyn Widget<W>>),
}

impl<W> NodeHandle<W> {
    /// Widget kind of the node; [`WidgetKind::ROOT`] for the root.
    #[must_use]
    pub fn kind(&self) -> WidgetKind {
        match self {
            Self::Root(_) => WidgetKind::ROOT,
            Self::Widget(widget) => widget.kind(),
        }
    }

    /// The node's children container, if it has one.
    pub fn children(&mut self) -> Option<&mut dyn Children<W>> {
        match self {
            Self::Root(container) => Some(container.as_mut()),
            Self::Widget(widget) => widget.children(),
        }
    }

    /// Applies property `tag`. The root has no properties.
    ///
    /// # Errors
    ///
    /// See [`Widget::apply`].
    pub fn apply(
        &mut self,
        tag: PropertyTag,
        value: &Value,
        events: &NodeEventSink,
    ) -> Result<(), PropertyError> {
        match self {
            Self::Root(_) => Err(PropertyError::UnknownTag),
            Self::Widget(widget) => widget.apply(tag, value, events),
        }
    }

    /// The widget, unless this is the root.
    #[must_use]
    pub fn widget(&self) -> Option<&dyn Widget<W>> {
        match self {
            Self::Root(_) => None,
            Self::Widget(widget) => Some(widget.as_ref()),
        }
    }

    fn detach(&mut self) {
        if let Self::Widget(widget) = self {
            widget.detach();
        }
    }
}

/// A registered node together with its tree links.
#[derive(Debug)]
pub struct NodeEntry<W> {
    handle: NodeHandle<W>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl<W> NodeEntry<W> {
    const fn new(handle: NodeHandle<W>) -> Self {
        Self {
            handle,
            parent: None,
            children: Vec::new(),
        }
    }

    /// The node's handle.
    #[must_use]
    pub const fn handle(&self) -> &NodeHandle<W> {
        &self.handle
    }

    /// Mutable access to the node's handle.
    pub const fn handle_mut(&mut self) -> &mut NodeHandle<W> {
        &mut self.handle
    }

    /// Widget kind of the node.
    #[must_use]
    pub fn kind(&self) -> WidgetKind {
        self.handle.kind()
    }

    /// Parent the node is attached to, `None` for the root.
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Ids of the attached children in container order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Arena of live nodes keyed by [`NodeId`].
#[derive(Debug)]
pub struct NodeRegistry<W> {
    nodes: HashMap<NodeId, NodeEntry<W>>,
}

impl<W> NodeRegistry<W> {
    /// Creates a registry holding only the root, backed by `root`.
    #[must_use]
    pub fn new(root: Box<dyn Children<W>>) -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(NodeId::ROOT, NodeEntry::new(NodeHandle::Root(root)));
        Self { nodes }
    }

    /// Registers `widget` under `id`, detached from any parent.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateId`] if `id` is already live.
    pub fn register(&mut self, id: NodeId, widget: Box<dyn Widget<W>>) -> Result<(), RegistryError> {
        if self.nodes.contains_key(&id) {
            return Err(RegistryError::DuplicateId(id));
        }
        self.nodes
            .insert(id, NodeEntry::new(NodeHandle::Widget(widget)));
        Ok(())
    }

    /// Looks up node `id`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownId`] if `id` is not live.
    pub fn lookup(&self, id: NodeId) -> Result<&NodeEntry<W>, RegistryError> {
        self.nodes.get(&id).ok_or(RegistryError::UnknownId(id))
    }

    /// Looks up node `id` mutably.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownId`] if `id` is not live.
    pub fn lookup_mut(&mut self, id: NodeId) -> Result<&mut NodeEntry<W>, RegistryError> {
        self.nodes.get_mut(&id).ok_or(RegistryError::UnknownId(id))
    }

    /// Returns `true` if `id` is live.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of live nodes, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if only the root is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Ids of all live nodes in ascending order, root included.
    #[must_use]
    pub fn live_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.nodes.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Ids of the children attached to `id`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownId`] if `id` is not live.
    pub fn children_of(&self, id: NodeId) -> Result<&[NodeId], RegistryError> {
        self.lookup(id).map(NodeEntry::children)
    }

    /// Records that `child` was inserted into `parent` at `index`.
    ///
    /// `index` is clamped to the number of children.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownId`] if either node is not live.
    pub fn attach(&mut self, parent: NodeId, index: usize, child: NodeId) -> Result<(), RegistryError> {
        self.lookup_mut(child)?.parent = Some(parent);
        let children = &mut self.lookup_mut(parent)?.children;
        children.insert(index.min(children.len()), child);
        Ok(())
    }

    /// Mirrors a move of `count` children of `parent`.
    ///
    /// The caller has validated the range.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownId`] if `parent` is not live.
    pub fn move_children(
        &mut self,
        parent: NodeId,
        from: usize,
        to: usize,
        count: usize,
    ) -> Result<(), RegistryError> {
        let children = &mut self.lookup_mut(parent)?.children;
        let end = from.saturating_add(count).min(children.len());
        let moved: Vec<NodeId> = children.drain(from.min(end)..end).collect();
        let dest = crate::children::adjusted_move_index(from, to, moved.len()).min(children.len());
        children.splice(dest..dest, moved);
        Ok(())
    }

    /// Detaches `count` children of `parent` starting at `index` and returns their ids.
    ///
    /// The detached nodes stay registered.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownId`] if `parent` is not live.
    pub fn detach_children(
        &mut self,
        parent: NodeId,
        index: usize,
        count: usize,
    ) -> Result<Vec<NodeId>, RegistryError> {
        let children = &mut self.lookup_mut(parent)?.children;
        let end = index.saturating_add(count).min(children.len());
        Ok(children.drain(index.min(end)..end).collect())
    }

    /// Unregisters node `id` alone and returns its handle.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Root`] for the root and [`RegistryError::UnknownId`] if `id` is
    /// not live.
    pub fn unregister(&mut self, id: NodeId) -> Result<NodeHandle<W>, RegistryError> {
        if id.is_root() {
            return Err(RegistryError::Root);
        }
        self.nodes
            .remove(&id)
            .map(|entry| entry.handle)
            .ok_or(RegistryError::UnknownId(id))
    }

    /// Unregisters `id` and every node below it, detaching each widget.
    ///
    /// Returns the unregistered ids, parents before children. Unknown ids are skipped.
    pub fn unregister_subtree(&mut self, id: NodeId) -> Vec<NodeId> {
        let mut removed = Vec::new();
        let mut pending = vec![id];
        while let Some(id) = pending.pop() {
            if id.is_root() {
                continue;
            }
            let Some(mut entry) = self.nodes.remove(&id) else {
                continue;
            };
            entry.handle.detach();
            pending.extend(entry.children.iter().rev().copied());
            removed.push(id);
        }
        removed
    }

    /// Unregisters every node except the root and forgets the root's children.
    pub fn reset(&mut self) {
        self.nodes.retain(|id, entry| {
            if id.is_root() {
                entry.children.clear();
                true
            } else {
                entry.handle.detach();
                false
            }
        });
    }
}
