//! Test support for WaterUI protocol integrations.
//!
//! Provides a small sample widget schema ([`schema`]), recording mock widgets for the host side
//! ([`mock`]) and the matching [`GuestSchema`] for the guest side.

pub mod mock;
pub mod schema;

use waterui_protocol_core::EventTag;
use waterui_protocol_guest::GuestSchema;

pub use mock::{MockChildren, MockState, MockView, root, widget_factory};
pub use schema::{button, kind, row, text, text_input};

/// The guest's view of the sample schema.
#[must_use]
pub fn guest_schema() -> GuestSchema {
    GuestSchema::new()
        .with(kind::BUTTON, [button::CLICK])
        .with(kind::TEXT, std::iter::empty::<EventTag>())
        .with(kind::TEXT_INPUT, [text_input::CHANGE])
        .with(kind::ROW, std::iter::empty::<EventTag>())
}
