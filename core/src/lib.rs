//! # WaterUI Protocol Core
//!
//! Shared vocabulary of the WaterUI guest/host protocol.
//!
//! A *guest* decides which widget tree should exist and describes it as an ordered
//! [`ChangeBatch`]. A *host* owns the real platform widgets, replays the batch onto them and
//! reports user interaction back as [`Event`]s. The two sides never share memory or types;
//! everything crossing the boundary is defined in this crate:
//!
//! - [`id`] - node identifiers and the small integer tags of the widget schema
//! - [`Value`] - the closed set of scalar payloads carried by properties and events
//! - [`Change`] / [`ChangeBatch`] - structural and property mutations
//! - [`bounds`] - index validation shared by host containers and the guest shadow tree
//! - [`Event`] - host to guest notifications
//! - [`ProtocolError`] - the error taxonomy shared by both sides
//! - [`MismatchPolicy`] - how version skew between guest and host is handled
//! - [`codec`] - the JSON wire shape of batches and events

extern crate alloc;

pub mod bounds;
pub mod change;
pub mod codec;
pub mod error;
pub mod event;
pub mod id;
pub mod mismatch;
pub mod value;

pub use bounds::IndexError;
pub use change::{Change, ChangeBatch, PropertyChange};
pub use codec::CodecError;
pub use error::ProtocolError;
pub use event::Event;
pub use id::{EventTag, NodeId, PropertyTag, WidgetKind};
pub use mismatch::{Logging, MismatchPolicy, PolicyKind, Throwing};
pub use value::Value;
