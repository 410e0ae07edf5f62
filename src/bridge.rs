//! In-process wiring of a guest and a host.
//!
//! [`connect`] creates both channels of one tree instance: change batches flow from the guest
//! to the host through an unbounded channel, events flow back through a channel bounded by
//! [`BridgeConfig::event_capacity`]. Each end is driven on its own executor, either with the
//! async `run` loops or by pumping pending messages, for example once per frame on the UI
//! thread. Dropping either end closes both loops.

use core::pin::Pin;
use core::task::{Context, Poll};

use async_channel::Receiver;
use futures::{Stream, StreamExt};
use tracing::debug;
use waterui_protocol_core::{ChangeBatch, Event, ProtocolError};
use waterui_protocol_guest::{GuestRunner, GuestSchema, ProtocolGuest};
use waterui_protocol_host::{Children, EventSink, HostProtocol, WidgetFactory};

use crate::config::BridgeConfig;

/// Events delivered to the guest.
///
/// Implements `Stream<Item = Event>`.
#[derive(Debug)]
pub struct EventStream {
    receiver: Receiver<Event>,
}

impl EventStream {
    /// Takes the next event without waiting.
    pub fn try_next(&self) -> Option<Event> {
        self.receiver.try_recv().ok()
    }

    /// Number of events waiting.
    #[must_use]
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Returns `true` if no event is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

impl Stream for EventStream {
    type Item = Event;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_next_unpin(cx)
    }
}

/// The guest end of a bridge.
#[derive(Debug)]
pub struct GuestEnd {
    runner: GuestRunner,
    events: EventStream,
}

impl GuestEnd {
    /// The guest, for recording changes.
    pub const fn guest(&mut self) -> &mut ProtocolGuest {
        self.runner.guest_mut()
    }

    /// Events waiting to be dispatched.
    #[must_use]
    pub const fn events(&self) -> &EventStream {
        &self.events
    }

    /// Sends the recorded changes, if any. Returns `false` once the host has gone away.
    pub async fn flush(&mut self) -> bool {
        self.runner.flush().await
    }

    /// Dispatches every waiting event, then sends the resulting changes.
    ///
    /// Returns the number of dispatched events.
    ///
    /// # Errors
    ///
    /// Stops at the first event the mismatch policy rejects; changes recorded so far are still
    /// sent.
    pub async fn pump(&mut self) -> Result<usize, ProtocolError> {
        let mut dispatched = 0;
        let mut result = Ok(());
        while let Some(event) = self.events.try_next() {
            dispatched += 1;
            result = self.runner.guest_mut().dispatch(&event);
            if result.is_err() {
                break;
            }
        }
        self.runner.flush().await;
        result.map(|()| dispatched)
    }

    /// Flushes, then dispatches events until the host goes away.
    pub async fn run(&mut self) {
        self.runner.run(&mut self.events).await;
    }

    /// Returns the guest and the event stream.
    #[must_use]
    pub fn into_parts(self) -> (GuestRunner, EventStream) {
        (self.runner, self.events)
    }
}

/// The host end of a bridge.
#[derive(Debug)]
pub struct HostEnd<W> {
    protocol: HostProtocol<W>,
    batches: Receiver<ChangeBatch>,
}

impl<W> HostEnd<W> {
    /// The apply engine.
    #[must_use]
    pub const fn protocol(&self) -> &HostProtocol<W> {
        &self.protocol
    }

    /// Applies every waiting batch without suspending.
    ///
    /// Returns the number of applied batches.
    ///
    /// # Errors
    ///
    /// Stops at the first failing batch; later batches stay queued.
    pub fn pump(&mut self) -> Result<usize, ProtocolError> {
        let mut applied = 0;
        while let Ok(batch) = self.batches.try_recv() {
            self.protocol.apply(&batch)?;
            applied += 1;
        }
        Ok(applied)
    }

    /// Applies batches until the guest goes away.
    pub async fn run(&mut self) {
        self.protocol.run(self.batches.clone()).await;
    }

    /// Returns the apply engine and the batch receiver.
    #[must_use]
    pub fn into_parts(self) -> (HostProtocol<W>, Receiver<ChangeBatch>) {
        (self.protocol, self.batches)
    }
}

/// Connects a guest using `schema` to a host rendering into `root` with widgets from `factory`.
///
/// Both ends use the mismatch policy selected by `config`.
pub fn connect<W>(
    config: &BridgeConfig,
    root: impl Children<W> + 'static,
    factory: impl WidgetFactory<W> + 'static,
    schema: GuestSchema,
) -> (GuestEnd, HostEnd<W>) {
    let (batch_sender, batch_receiver) = async_channel::unbounded();
    let (sink, events) = EventSink::channel(config.event_capacity);
    debug!(
        mismatch = ?config.mismatch,
        event_capacity = ?config.event_capacity,
        "Connecting protocol bridge"
    );

    let guest = ProtocolGuest::new(schema).with_boxed_policy(config.mismatch.into_policy());
    let protocol =
        HostProtocol::new(root, factory, sink).with_boxed_policy(config.mismatch.into_policy());

    (
        GuestEnd {
            runner: GuestRunner::new(guest, batch_sender),
            events: EventStream { receiver: events },
        },
        HostEnd {
            protocol,
            batches: batch_receiver,
        },
    )
}
