//! Host side of the WaterUI protocol.
//!
//! The host owns the platform widget tree. It receives [`ChangeBatch`]es from a guest, applies
//! them through a [`HostProtocol`] and reports user interaction back through an [`EventSink`].
//!
//! Platform integrations provide three things:
//!
//! - a [`Children`] implementation for the root container,
//! - one [`Widget`] per supported widget kind, usually backed by a [`PropertyTable`],
//! - a [`WidgetFactory`], typically a [`KindDispatcher`], mapping kinds to constructors.
//!
//! [`ChangeBatch`]: waterui_protocol_core::ChangeBatch

pub mod apply;
pub mod children;
pub mod factory;
pub mod property;
pub mod registry;
pub mod sink;
pub mod widget;

pub use apply::HostProtocol;
pub use children::{Children, IndexError, VecChildren};
pub use factory::{KindDispatcher, WidgetFactory};
pub use property::PropertyTable;
pub use registry::{NodeEntry, NodeHandle, NodeRegistry, RegistryError};
pub use sink::{EventSink, NodeEventSink};
pub use widget::{PropertyError, Widget};
