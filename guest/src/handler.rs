//! Event handlers installed on guest nodes.

use core::{any::type_name, fmt::Debug};

use waterui_protocol_core::Value;

use crate::guest::ProtocolGuest;

/// Reacts to an event delivered to a guest node.
///
/// Handlers receive the guest itself so they can record the changes their reaction implies.
pub trait EventHandler: 'static {
    /// Handles one event carrying `value`.
    fn handle(&mut self, guest: &mut ProtocolGuest, value: &Value);
}

impl Debug for dyn EventHandler {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(type_name::<Self>())
    }
}

impl<F> EventHandler for F
where
    F: FnMut(&mut ProtocolGuest, &Value) + 'static,
{
    fn handle(&mut self, guest: &mut ProtocolGuest, value: &Value) {
        self(guest, value);
    }
}

/// A boxed event handler.
pub type BoxEventHandler = Box<dyn EventHandler>;

/// Boxes `handler`.
pub fn boxed(handler: impl EventHandler) -> BoxEventHandler {
    Box::new(handler)
}
