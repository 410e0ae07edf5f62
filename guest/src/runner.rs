//! The guest's event loop.

use async_channel::Sender;
use futures::{Stream, StreamExt};
use tracing::{debug, error};
use waterui_protocol_core::{ChangeBatch, Event};

use crate::guest::ProtocolGuest;

/// Drives a [`ProtocolGuest`]: dispatches incoming events and ships the resulting batches.
#[derive(Debug)]
pub struct GuestRunner {
    guest: ProtocolGuest,
    batches: Sender<ChangeBatch>,
}

impl GuestRunner {
    /// Creates a runner sending batches through `batches`.
    #[must_use]
    pub const fn new(guest: ProtocolGuest, batches: Sender<ChangeBatch>) -> Self {
        Self { guest, batches }
    }

    /// The driven guest.
    #[must_use]
    pub const fn guest(&self) -> &ProtocolGuest {
        &self.guest
    }

    /// Mutable access to the driven guest, for recording changes outside of event handlers.
    pub const fn guest_mut(&mut self) -> &mut ProtocolGuest {
        &mut self.guest
    }

    /// Returns the driven guest.
    #[must_use]
    pub fn into_inner(self) -> ProtocolGuest {
        self.guest
    }

    /// Sends the recorded changes, if any.
    ///
    /// Returns `false` once the host has gone away.
    pub async fn flush(&mut self) -> bool {
        if !self.guest.has_changes() {
            return true;
        }
        let batch = self.guest.take_changes();
        debug!(changes = batch.len(), "Sending change batch");
        if self.batches.send(batch).await.is_err() {
            debug!("Host disconnected, dropping change batch");
            return false;
        }
        true
    }

    /// Flushes pending changes, then handles `events` until the stream ends or the host goes
    /// away.
    ///
    /// A failing dispatch is logged and the loop continues with the next event.
    pub async fn run(&mut self, mut events: impl Stream<Item = Event> + Unpin) {
        if !self.flush().await {
            return;
        }
        while let Some(event) = events.next().await {
            if let Err(error) = self.guest.dispatch(&event) {
                error!(%error, "Failed to dispatch event");
            }
            if !self.flush().await {
                return;
            }
        }
        debug!("Event stream ended");
    }
}
