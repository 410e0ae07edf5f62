//! The host apply engine.
//!
//! [`HostProtocol`] owns the node registry, the widget factory and the mismatch policy. Each
//! [`ChangeBatch`] is applied in two phases: every structural change in order, then every
//! property change in order. A failing change stops the batch; changes already applied stay
//! applied.

use async_channel::Receiver;
use tracing::{debug, debug_span, error, trace};
use uuid::Uuid;
use waterui_protocol_core::{
    Change, ChangeBatch, MismatchPolicy, NodeId, PropertyChange, ProtocolError, Throwing,
    WidgetKind,
};

use crate::children::{Children, IndexError, validate_insert, validate_move, validate_remove};
use crate::factory::WidgetFactory;
use crate::registry::{NodeRegistry, RegistryError};
use crate::sink::EventSink;
use crate::widget::PropertyError;

/// Applies change batches from a guest to the platform widget tree.
pub struct HostProtocol<W> {
    instance: Uuid,
    registry: NodeRegistry<W>,
    factory: Box<dyn WidgetFactory<W>>,
    policy: Box<dyn MismatchPolicy>,
    events: EventSink,
}

impl<W> core::fmt::Debug for HostProtocol<W> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HostProtocol")
            .field("instance", &self.instance)
            .field("nodes", &self.registry.len())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl<W> HostProtocol<W> {
    /// Creates an engine whose root node is backed by `root`.
    ///
    /// `root` must start empty: every child of the tree is created by an insert. Structural
    /// changes against a container whose length differs from the registered children fail
    /// with [`ProtocolError::IndexOutOfRange`].
    ///
    /// Mismatches are fatal until another policy is installed with
    /// [`with_policy`](Self::with_policy).
    pub fn new(
        root: impl Children<W> + 'static,
        factory: impl WidgetFactory<W> + 'static,
        events: EventSink,
    ) -> Self {
        Self {
            instance: Uuid::new_v4(),
            registry: NodeRegistry::new(Box::new(root)),
            factory: Box::new(factory),
            policy: Box::new(Throwing),
            events,
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

    /// Identifier of this tree instance, attached to every log record.
    #[must_use]
    pub const fn instance(&self) -> Uuid {
        self.instance
    }

    /// The node registry.
    #[must_use]
    pub const fn registry(&self) -> &NodeRegistry<W> {
        &self.registry
    }

    /// Applies `batch`.
    ///
    /// A [`Change::Property`] found among the structural changes is applied in the property
    /// phase, before the batch's own property changes.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a change or by the mismatch policy. Changes preceding
    /// the failing one remain applied.
    pub fn apply(&mut self, batch: &ChangeBatch) -> Result<(), ProtocolError> {
        let span = debug_span!(
            "apply",
            instance = %self.instance,
            structural = batch.structural.len(),
            properties = batch.properties.len(),
        );
        let _guard = span.enter();

        for change in &batch.structural {
            trace!(?change, "Applying structural change");
            match change {
                Change::Insert {
                    parent_id,
                    child_id,
                    kind,
                    child_index,
                } => self.insert(*parent_id, *child_id, *kind, *child_index)?,
                Change::Move {
                    parent_id,
                    from_index,
                    to_index,
                    count,
                } => self.move_children(*parent_id, *from_index, *to_index, *count)?,
                Change::Remove {
                    parent_id,
                    index,
                    count,
                } => self.remove(*parent_id, *index, *count)?,
                Change::Clear => self.clear(),
                Change::Property(_) => {}
            }
        }

        let misplaced = batch.structural.iter().filter_map(|change| match change {
            Change::Property(property) => Some(property),
            _ => None,
        });
        for property in misplaced.chain(&batch.properties) {
            trace!(?property, "Applying property change");
            self.set_property(property)?;
        }

        debug!(nodes = self.registry.len(), "Applied change batch");
        Ok(())
    }

    /// Applies every batch received from `batches` until the guest closes the channel.
    ///
    /// A failing batch is logged and the loop continues with the next one.
    pub async fn run(&mut self, batches: Receiver<ChangeBatch>) {
        while let Ok(batch) = batches.recv().await {
            if let Err(error) = self.apply(&batch) {
                error!(instance = %self.instance, %error, "Failed to apply change batch");
            }
        }
        debug!(instance = %self.instance, "Change channel closed");
    }

    fn insert(
        &mut self,
        parent: NodeId,
        child: NodeId,
        kind: WidgetKind,
        index: usize,
    ) -> Result<(), ProtocolError> {
        if !self.registry.contains(parent) {
            return Err(ProtocolError::UnknownParent(parent));
        }
        if !self.factory.supports(kind) {
            return self.policy.on_unknown_widget_kind(parent, kind);
        }
        if self.registry.contains(child) {
            return Err(ProtocolError::DuplicateChildId(child));
        }
        let Some(len) = self.children_len(parent)? else {
            return Ok(());
        };
        validate_insert(len, index).map_err(|error| out_of_range(parent, error))?;

        let Some(widget) = self.factory.create(kind) else {
            return self.policy.on_unknown_widget_kind(parent, kind);
        };
        let value = widget.value();
        self.registry
            .register(child, widget)
            .map_err(|error| registry_error(parent, error))?;

        let container = self.container(parent)?;
        if let Err(error) = container.insert(index, value) {
            self.registry.unregister_subtree(child);
            return Err(out_of_range(parent, error));
        }
        self.registry
            .attach(parent, index, child)
            .map_err(|error| registry_error(parent, error))
    }

    fn move_children(
        &mut self,
        parent: NodeId,
        from: usize,
        to: usize,
        count: usize,
    ) -> Result<(), ProtocolError> {
        let Some(len) = self.children_len(parent)? else {
            return Ok(());
        };
        validate_move(len, from, to, count).map_err(|error| out_of_range(parent, error))?;

        self.container(parent)?
            .move_range(from, to, count)
            .map_err(|error| out_of_range(parent, error))?;
        self.registry
            .move_children(parent, from, to, count)
            .map_err(|error| registry_error(parent, error))
    }

    fn remove(&mut self, parent: NodeId, index: usize, count: usize) -> Result<(), ProtocolError> {
        let Some(len) = self.children_len(parent)? else {
            return Ok(());
        };
        validate_remove(len, index, count).map_err(|error| out_of_range(parent, error))?;

        self.container(parent)?
            .remove(index, count)
            .map_err(|error| out_of_range(parent, error))?;
        let detached = self
            .registry
            .detach_children(parent, index, count)
            .map_err(|error| registry_error(parent, error))?;
        for id in detached {
            let removed = self.registry.unregister_subtree(id);
            trace!(?removed, "Unregistered subtree");
        }
        Ok(())
    }

    fn clear(&mut self) {
        if let Ok(Some(container)) = self
            .registry
            .lookup_mut(NodeId::ROOT)
            .map(|entry| entry.handle_mut().children())
        {
            container.clear();
        }
        self.registry.reset();
    }

    fn set_property(&mut self, change: &PropertyChange) -> Result<(), ProtocolError> {
        let id = change.node_id;
        let events = self.events.for_node(id);
        let entry = self
            .registry
            .lookup_mut(id)
            .map_err(|_| ProtocolError::UnknownId(id))?;
        let kind = entry.kind();

        match entry.handle_mut().apply(change.tag, &change.value, &events) {
            Ok(()) => Ok(()),
            Err(PropertyError::UnknownTag) => {
                self.policy.on_unknown_property_tag(id, kind, change.tag)
            }
            Err(PropertyError::InvalidValue { expected, found }) => {
                Err(ProtocolError::InvalidValue {
                    id,
                    tag: change.tag,
                    expected,
                    found,
                })
            }
        }
    }

    /// Number of children of `parent`, or `None` when the policy skipped a node without
    /// children.
    ///
    /// The container and the registry must agree on the count; a container populated behind
    /// the engine's back is reported instead of being addressed with shifted indices.
    fn children_len(&mut self, parent: NodeId) -> Result<Option<usize>, ProtocolError> {
        let entry = self
            .registry
            .lookup_mut(parent)
            .map_err(|_| ProtocolError::UnknownParent(parent))?;
        let kind = entry.kind();
        let registered = entry.children().len();
        let Some(container) = entry.handle_mut().children() else {
            self.policy.on_unknown_children(parent, kind)?;
            return Ok(None);
        };
        let len = container.len();
        if len != registered {
            return Err(ProtocolError::IndexOutOfRange {
                parent,
                detail: format!("container holds {len} children but {registered} are registered"),
            });
        }
        Ok(Some(len))
    }

    fn container(&mut self, parent: NodeId) -> Result<&mut dyn Children<W>, ProtocolError> {
        let entry = self
            .registry
            .lookup_mut(parent)
            .map_err(|_| ProtocolError::UnknownParent(parent))?;
        let kind = entry.kind();
        entry
            .handle_mut()
            .children()
            .ok_or(ProtocolError::UnknownChildren { id: parent, kind })
    }
}

fn out_of_range(parent: NodeId, error: IndexError) -> ProtocolError {
    ProtocolError::IndexOutOfRange {
        parent,
        detail: error.0,
    }
}

fn registry_error(parent: NodeId, error: RegistryError) -> ProtocolError {
    match error {
        RegistryError::UnknownId(id) if id == parent => ProtocolError::UnknownParent(id),
        RegistryError::UnknownId(id) => ProtocolError::UnknownId(id),
        RegistryError::DuplicateId(id) => ProtocolError::DuplicateChildId(id),
        RegistryError::Root => ProtocolError::DuplicateChildId(NodeId::ROOT),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use waterui_protocol_core::{Event, EventTag, Logging, PropertyTag, Value};

    use super::*;
    use crate::children::VecChildren;
    use crate::factory::KindDispatcher;
    use crate::sink::NodeEventSink;
    use crate::widget::Widget;

    const LABEL: WidgetKind = WidgetKind::new(1);
    const STACK: WidgetKind = WidgetKind::new(2);
    const BUTTON: WidgetKind = WidgetKind::new(3);

    const TEXT: PropertyTag = PropertyTag::new(1);
    const ON_CLICK: PropertyTag = PropertyTag::new(2);
    const CLICK: EventTag = EventTag::new(1);

    type Shared = Rc<RefCell<VecChildren<Item>>>;

    #[derive(Debug, Clone)]
    enum Item {
        Label(Rc<RefCell<String>>),
        Stack(Shared),
        Button(Rc<RefCell<Option<NodeEventSink>>>),
    }

    /// Root container shared with the test so it can inspect what was attached.
    #[derive(Debug, Clone, Default)]
    struct SharedChildren(Shared);

    impl Children<Item> for SharedChildren {
        fn len(&self) -> usize {
            self.0.borrow().len()
        }

        fn insert(&mut self, index: usize, widget: Item) -> Result<(), IndexError> {
            self.0.borrow_mut().insert(index, widget)
        }

        fn move_range(&mut self, from: usize, to: usize, count: usize) -> Result<(), IndexError> {
            self.0.borrow_mut().move_range(from, to, count)
        }

        fn remove(&mut self, index: usize, count: usize) -> Result<(), IndexError> {
            self.0.borrow_mut().remove(index, count)
        }

        fn clear(&mut self) {
            self.0.borrow_mut().clear();
        }
    }

    #[derive(Debug)]
    struct TestWidget {
        kind: WidgetKind,
        item: Item,
        children: Option<SharedChildren>,
    }

    impl Widget<Item> for TestWidget {
        fn kind(&self) -> WidgetKind {
            self.kind
        }

        fn value(&self) -> Item {
            self.item.clone()
        }

        fn apply(
            &mut self,
            tag: PropertyTag,
            value: &Value,
            events: &NodeEventSink,
        ) -> Result<(), PropertyError> {
            match (&self.item, tag) {
                (Item::Label(text), TEXT) => {
                    *text.borrow_mut() = crate::property::string(value)?.to_owned();
                    Ok(())
                }
                (Item::Button(listener), ON_CLICK) => {
                    *listener.borrow_mut() =
                        crate::property::callback(value)?.then(|| events.clone());
                    Ok(())
                }
                _ => Err(PropertyError::UnknownTag),
            }
        }

        fn children(&mut self) -> Option<&mut dyn Children<Item>> {
            self.children
                .as_mut()
                .map(|children| children as &mut dyn Children<Item>)
        }
    }

    fn factory() -> KindDispatcher<Item> {
        KindDispatcher::new()
            .with(LABEL, || TestWidget {
                kind: LABEL,
                item: Item::Label(Rc::default()),
                children: None,
            })
            .with(STACK, || {
                let children = SharedChildren::default();
                TestWidget {
                    kind: STACK,
                    item: Item::Stack(children.0.clone()),
                    children: Some(children),
                }
            })
            .with(BUTTON, || TestWidget {
                kind: BUTTON,
                item: Item::Button(Rc::default()),
                children: None,
            })
    }

    fn host() -> (HostProtocol<Item>, Shared) {
        let root = SharedChildren::default();
        let shared = root.0.clone();
        let host = HostProtocol::new(root, factory(), EventSink::disconnected());
        (host, shared)
    }

    fn insert(parent: u32, child: u32, kind: WidgetKind, index: usize) -> Change {
        Change::Insert {
            parent_id: NodeId::new(parent),
            child_id: NodeId::new(child),
            kind,
            child_index: index,
        }
    }

    fn batch(changes: impl IntoIterator<Item = Change>) -> ChangeBatch {
        changes.into_iter().collect()
    }

    fn label_text(item: &Item) -> String {
        match item {
            Item::Label(text) => text.borrow().clone(),
            other => panic!("expected a label, found {other:?}"),
        }
    }

    #[test]
    fn insert_then_set_property() {
        let (mut host, root) = host();
        host.apply(&batch([
            insert(0, 1, LABEL, 0),
            PropertyChange::new(NodeId::new(1), TEXT, "Hi").into(),
        ]))
        .unwrap();

        assert_eq!(root.borrow().len(), 1);
        assert_eq!(label_text(&root.borrow().as_slice()[0]), "Hi");
        assert_eq!(host.registry().live_ids(), vec![NodeId::ROOT, NodeId::new(1)]);
    }

    #[test]
    fn structural_changes_precede_properties() {
        let (mut host, root) = host();
        let mut changes = ChangeBatch::new();
        changes
            .properties
            .push(PropertyChange::new(NodeId::new(1), TEXT, "late"));
        changes.structural.push(insert(0, 1, LABEL, 0));
        host.apply(&changes).unwrap();
        assert_eq!(label_text(&root.borrow().as_slice()[0]), "late");
    }

    #[test]
    fn move_uses_adjusted_index() {
        let (mut host, root) = host();
        let mut changes: ChangeBatch = (1..=5)
            .map(|raw| insert(0, raw, LABEL, raw as usize - 1))
            .collect();
        for (raw, text) in (1..=5).zip(["A", "B", "C", "D", "E"]) {
            changes.push(PropertyChange::new(NodeId::new(raw), TEXT, text));
        }
        host.apply(&changes).unwrap();

        host.apply(&batch([Change::Move {
            parent_id: NodeId::ROOT,
            from_index: 1,
            to_index: 4,
            count: 2,
        }]))
        .unwrap();

        let texts: Vec<String> = root.borrow().iter().map(label_text).collect();
        assert_eq!(texts, vec!["A", "D", "B", "C", "E"]);
        let ids: Vec<u32> = host
            .registry()
            .children_of(NodeId::ROOT)
            .unwrap()
            .iter()
            .map(|id| id.value())
            .collect();
        assert_eq!(ids, vec![1, 4, 2, 3, 5]);
    }

    #[test]
    fn remove_unregisters_subtree() {
        let (mut host, root) = host();
        host.apply(&batch([
            insert(0, 1, STACK, 0),
            insert(1, 2, LABEL, 0),
            insert(1, 3, STACK, 1),
            insert(3, 4, LABEL, 0),
            insert(0, 5, LABEL, 1),
        ]))
        .unwrap();

        host.apply(&batch([Change::Remove {
            parent_id: NodeId::ROOT,
            index: 0,
            count: 1,
        }]))
        .unwrap();

        assert_eq!(root.borrow().len(), 1);
        assert_eq!(host.registry().live_ids(), vec![NodeId::ROOT, NodeId::new(5)]);

        let error = host
            .apply(&batch([PropertyChange::new(NodeId::new(2), TEXT, "gone").into()]))
            .unwrap_err();
        assert_eq!(error, ProtocolError::UnknownId(NodeId::new(2)));
    }

    #[test]
    fn clear_resets_to_root() {
        let (mut host, root) = host();
        host.apply(&batch([
            insert(0, 1, STACK, 0),
            insert(1, 2, LABEL, 0),
            insert(0, 3, LABEL, 1),
        ]))
        .unwrap();

        host.apply(&batch([Change::Clear])).unwrap();
        assert!(root.borrow().is_empty());
        assert_eq!(host.registry().live_ids(), vec![NodeId::ROOT]);

        host.apply(&batch([insert(0, 1, LABEL, 0)])).unwrap();
        assert_eq!(root.borrow().len(), 1);
    }

    #[test]
    fn structural_violations() {
        let (mut host, _root) = host();
        host.apply(&batch([insert(0, 1, LABEL, 0)])).unwrap();

        assert_eq!(
            host.apply(&batch([insert(9, 2, LABEL, 0)])).unwrap_err(),
            ProtocolError::UnknownParent(NodeId::new(9))
        );
        assert_eq!(
            host.apply(&batch([insert(0, 1, LABEL, 1)])).unwrap_err(),
            ProtocolError::DuplicateChildId(NodeId::new(1))
        );
        assert_eq!(
            host.apply(&batch([insert(0, 0, LABEL, 1)])).unwrap_err(),
            ProtocolError::DuplicateChildId(NodeId::ROOT)
        );
        assert!(matches!(
            host.apply(&batch([insert(0, 2, LABEL, 5)])).unwrap_err(),
            ProtocolError::IndexOutOfRange { parent, .. } if parent == NodeId::ROOT
        ));
        assert!(matches!(
            host.apply(&batch([Change::Remove {
                parent_id: NodeId::ROOT,
                index: 0,
                count: 2,
            }]))
            .unwrap_err(),
            ProtocolError::IndexOutOfRange { .. }
        ));
        assert!(matches!(
            host.apply(&batch([Change::Move {
                parent_id: NodeId::ROOT,
                from_index: 1,
                to_index: 0,
                count: 1,
            }]))
            .unwrap_err(),
            ProtocolError::IndexOutOfRange { .. }
        ));
        assert_eq!(host.registry().live_ids(), vec![NodeId::ROOT, NodeId::new(1)]);
    }

    #[test]
    fn failing_change_keeps_earlier_changes() {
        let (mut host, root) = host();
        let error = host
            .apply(&batch([
                insert(0, 1, LABEL, 0),
                insert(0, 2, LABEL, 7),
                insert(0, 3, LABEL, 1),
            ]))
            .unwrap_err();
        assert!(matches!(error, ProtocolError::IndexOutOfRange { .. }));
        assert_eq!(root.borrow().len(), 1);
        assert_eq!(host.registry().live_ids(), vec![NodeId::ROOT, NodeId::new(1)]);
    }

    #[test]
    fn invalid_value_is_reported() {
        let (mut host, _root) = host();
        let error = host
            .apply(&batch([
                insert(0, 1, LABEL, 0),
                PropertyChange::new(NodeId::new(1), TEXT, 4).into(),
            ]))
            .unwrap_err();
        assert_eq!(
            error,
            ProtocolError::InvalidValue {
                id: NodeId::new(1),
                tag: TEXT,
                expected: "string",
                found: "number",
            }
        );
    }

    #[test]
    fn throwing_policy_names_unknown_kind() {
        let (mut host, _root) = host();
        let error = host
            .apply(&batch([insert(0, 1, WidgetKind::new(99), 0)]))
            .unwrap_err();
        assert_eq!(
            error,
            ProtocolError::UnknownWidgetKind {
                parent: NodeId::ROOT,
                kind: WidgetKind::new(99),
            }
        );
        assert_eq!(host.registry().live_ids(), vec![NodeId::ROOT]);
    }

    #[test]
    fn logging_policy_skips_mismatches() {
        let (host, root) = host();
        let mut host = host.with_policy(Logging);
        host.apply(&batch([
            insert(0, 1, WidgetKind::new(99), 0),
            insert(0, 2, LABEL, 0),
            insert(2, 3, LABEL, 0),
            PropertyChange::new(NodeId::new(2), PropertyTag::new(42), "x").into(),
            PropertyChange::new(NodeId::new(2), TEXT, "kept").into(),
        ]))
        .unwrap();

        assert_eq!(root.borrow().len(), 1);
        assert_eq!(label_text(&root.borrow().as_slice()[0]), "kept");
        assert_eq!(host.registry().live_ids(), vec![NodeId::ROOT, NodeId::new(2)]);
    }

    #[test]
    fn unknown_kind_is_resolved_before_bounds() {
        let (strict, root) = host();
        let mut lenient = strict.with_policy(Logging);
        lenient
            .apply(&batch([
                insert(0, 1, WidgetKind::new(42), 0),
                insert(0, 2, WidgetKind::new(42), 1),
                insert(0, 3, LABEL, 0),
                insert(0, 3, WidgetKind::new(42), 4),
            ]))
            .unwrap();
        assert_eq!(root.borrow().len(), 1);
        assert_eq!(lenient.registry().live_ids(), vec![NodeId::ROOT, NodeId::new(3)]);

        let (mut host, _root) = host();
        let unknown = ProtocolError::UnknownWidgetKind {
            parent: NodeId::ROOT,
            kind: WidgetKind::new(42),
        };
        assert_eq!(
            host.apply(&batch([insert(0, 1, WidgetKind::new(42), 3)])).unwrap_err(),
            unknown
        );
        host.apply(&batch([insert(0, 1, LABEL, 0)])).unwrap();
        assert_eq!(
            host.apply(&batch([insert(0, 1, WidgetKind::new(42), 0)])).unwrap_err(),
            unknown
        );
    }

    #[test]
    fn throwing_policy_names_unknown_property_tag() {
        let (mut host, root) = host();
        let error = host
            .apply(&batch([
                insert(0, 1, LABEL, 0),
                PropertyChange::new(NodeId::new(1), PropertyTag::new(42), "x").into(),
                PropertyChange::new(NodeId::new(1), TEXT, "never").into(),
            ]))
            .unwrap_err();
        assert_eq!(
            error,
            ProtocolError::UnknownPropertyTag {
                id: NodeId::new(1),
                kind: LABEL,
                tag: PropertyTag::new(42),
            }
        );
        assert_eq!(label_text(&root.borrow().as_slice()[0]), "");
    }

    #[test]
    fn prepopulated_container_is_reported() {
        let root = SharedChildren::default();
        root.0
            .borrow_mut()
            .insert(0, Item::Label(Rc::default()))
            .unwrap();
        let mut host = HostProtocol::new(root, factory(), EventSink::disconnected());

        let error = host.apply(&batch([insert(0, 1, LABEL, 1)])).unwrap_err();
        assert_eq!(
            error,
            ProtocolError::IndexOutOfRange {
                parent: NodeId::ROOT,
                detail: "container holds 1 children but 0 are registered".into(),
            }
        );
        assert_eq!(host.registry().live_ids(), vec![NodeId::ROOT]);
    }

    #[test]
    fn throwing_policy_rejects_children_on_leaf() {
        let (mut host, _root) = host();
        host.apply(&batch([insert(0, 1, LABEL, 0)])).unwrap();
        assert_eq!(
            host.apply(&batch([insert(1, 2, LABEL, 0)])).unwrap_err(),
            ProtocolError::UnknownChildren {
                id: NodeId::new(1),
                kind: LABEL,
            }
        );
    }

    #[test]
    fn callback_property_wires_events() {
        let (sink, events) = EventSink::channel(None);
        let root = SharedChildren::default();
        let shared = root.0.clone();
        let mut host = HostProtocol::new(root, factory(), sink);

        host.apply(&batch([
            insert(0, 7, BUTTON, 0),
            PropertyChange::new(NodeId::new(7), ON_CLICK, true).into(),
        ]))
        .unwrap();

        let Item::Button(listener) = shared.borrow().as_slice()[0].clone() else {
            panic!("expected a button");
        };
        listener.borrow().as_ref().unwrap().signal(CLICK);
        assert_eq!(events.try_recv().unwrap(), Event::signal(NodeId::new(7), CLICK));

        host.apply(&batch([
            PropertyChange::new(NodeId::new(7), ON_CLICK, false).into(),
        ]))
        .unwrap();
        assert!(listener.borrow().is_none());
    }

    #[test]
    fn run_applies_until_closed() {
        let (mut host, root) = host();
        let (sender, receiver) = async_channel::unbounded();
        sender.try_send(batch([insert(0, 1, LABEL, 0)])).unwrap();
        sender.try_send(batch([insert(0, 1, LABEL, 0)])).unwrap();
        sender.try_send(batch([insert(0, 2, LABEL, 1)])).unwrap();
        drop(sender);

        futures::executor::block_on(host.run(receiver));
        assert_eq!(root.borrow().len(), 2);
    }
}
