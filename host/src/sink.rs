//! Event delivery from platform widgets back to the guest.

use async_channel::{Receiver, Sender, TrySendError};
use tracing::{debug, warn};
use waterui_protocol_core::{Event, EventTag, NodeId, Value};

/// Non-blocking handle through which widgets report user interaction.
///
/// Sending never waits. With a bounded channel a full queue drops the event with a warning, so a
/// slow guest cannot stall the UI thread.
#[derive(Debug, Clone)]
pub struct EventSink {
    sender: Option<Sender<Event>>,
}

impl EventSink {
    /// Wraps the sending half of an event channel.
    #[must_use]
    pub const fn new(sender: Sender<Event>) -> Self {
        Self {
            sender: Some(sender),
        }
    }

    /// Creates a sink which discards every event.
    #[must_use]
    pub const fn disconnected() -> Self {
        Self { sender: None }
    }

    /// Creates a sink together with the receiver the guest reads from.
    ///
    /// `capacity` bounds the queue; `None` makes it unbounded.
    #[must_use]
    pub fn channel(capacity: Option<usize>) -> (Self, Receiver<Event>) {
        let (sender, receiver) = match capacity {
            Some(capacity) => async_channel::bounded(capacity.max(1)),
            None => async_channel::unbounded(),
        };
        (Self::new(sender), receiver)
    }

    /// Queues `event` for the guest.
    pub fn send(&self, event: Event) {
        let Some(sender) = &self.sender else {
            return;
        };
        match sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                warn!(
                    id = event.id.value(),
                    tag = event.tag.value(),
                    "Event queue full, dropping event"
                );
            }
            Err(TrySendError::Closed(event)) => {
                debug!(
                    id = event.id.value(),
                    tag = event.tag.value(),
                    "Guest disconnected, dropping event"
                );
            }
        }
    }

    /// Binds the sink to the node whose widget emits events.
    #[must_use]
    pub fn for_node(&self, id: NodeId) -> NodeEventSink {
        NodeEventSink {
            id,
            sink: self.clone(),
        }
    }
}

/// An [`EventSink`] bound to one node.
///
/// Widgets capture this in their platform listeners.
#[derive(Debug, Clone)]
pub struct NodeEventSink {
    id: NodeId,
    sink: EventSink,
}

impl NodeEventSink {
    /// The node events are reported for.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Emits event `tag` with `value` as payload.
    pub fn emit(&self, tag: EventTag, value: impl Into<Value>) {
        self.sink.send(Event::new(self.id, tag, value));
    }

    /// Emits event `tag` without payload.
    pub fn signal(&self, tag: EventTag) {
        self.sink.send(Event::signal(self.id, tag));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_sink_tags_events() {
        let (sink, receiver) = EventSink::channel(None);
        let node = sink.for_node(NodeId::new(4));
        node.signal(EventTag::new(1));
        node.emit(EventTag::new(2), "typed");

        assert_eq!(
            receiver.try_recv().unwrap(),
            Event::signal(NodeId::new(4), EventTag::new(1))
        );
        assert_eq!(
            receiver.try_recv().unwrap(),
            Event::new(NodeId::new(4), EventTag::new(2), "typed")
        );
    }

    #[test]
    fn full_queue_drops() {
        let (sink, receiver) = EventSink::channel(Some(1));
        sink.send(Event::signal(NodeId::new(1), EventTag::new(1)));
        sink.send(Event::signal(NodeId::new(2), EventTag::new(1)));
        assert_eq!(receiver.len(), 1);
        assert_eq!(receiver.try_recv().unwrap().id, NodeId::new(1));
    }

    #[test]
    fn closed_and_disconnected_sinks_do_not_panic() {
        let (sink, receiver) = EventSink::channel(None);
        drop(receiver);
        sink.send(Event::signal(NodeId::new(1), EventTag::new(1)));
        EventSink::disconnected().send(Event::signal(NodeId::new(1), EventTag::new(1)));
    }
}
