//! Guest side of the WaterUI protocol.
//!
//! The guest decides which widget tree should exist. It records every mutation through a
//! [`ProtocolGuest`], which allocates node ids, keeps a shadow copy of the tree and hands the
//! recorded [`ChangeBatch`](waterui_protocol_core::ChangeBatch) to the host. Events reported by
//! the host are dispatched to the [`EventHandler`]s installed on each node; a [`GuestRunner`]
//! ties both directions together.

pub mod guest;
pub mod handler;
pub mod runner;
pub mod schema;

pub use guest::ProtocolGuest;
pub use handler::{BoxEventHandler, EventHandler, boxed};
pub use runner::GuestRunner;
pub use schema::GuestSchema;
