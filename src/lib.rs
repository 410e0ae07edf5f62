//! # WaterUI Protocol
//!
//! A changes/events protocol that lets a *guest* (code that may be hot-reloaded, sandboxed or run
//! off the UI thread) drive a widget tree owned by a *host*.
//!
//! - The guest records mutations through a [`ProtocolGuest`] and ships them as [`ChangeBatch`]es.
//! - The host replays each batch onto its platform widgets with a [`HostProtocol`].
//! - User interaction travels back as [`Event`]s and is dispatched to guest callbacks.
//! - A [`MismatchPolicy`] decides how both sides react to version skew.
//!
//! [`bridge::connect`] wires both ends of one tree instance together in-process.
//!
//! ```ignore
//! let config = BridgeConfig::from_env()?;
//! let (mut guest, mut host) = bridge::connect(&config, root, factory, schema);
//! let button = guest.guest().insert(NodeId::ROOT, 0, BUTTON)?;
//! guest.guest().set_property(button, TEXT, "Hi")?;
//! guest.flush().await;
//! host.pump()?;
//! ```

pub mod bridge;
pub mod config;
pub mod logging;

#[doc(inline)]
pub use waterui_protocol_core::*;
pub use waterui_protocol_guest as guest;
pub use waterui_protocol_host as host;

pub use bridge::{EventStream, GuestEnd, HostEnd, connect};
pub use config::{BridgeConfig, ConfigError};
pub use waterui_protocol_guest::{EventHandler, GuestRunner, GuestSchema, ProtocolGuest};
pub use waterui_protocol_host::{Children, HostProtocol, Widget, WidgetFactory};
