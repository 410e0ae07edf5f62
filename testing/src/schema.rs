//! Tags of the sample widget schema.
//!
//! | Kind | Properties | Events |
//! |------|------------|--------|
//! | [`kind::BUTTON`] | text, enabled, on click | click |
//! | [`kind::TEXT`] | text | |
//! | [`kind::TEXT_INPUT`] | text, hint, on change | change (new text) |
//! | [`kind::ROW`] | spacing (dp) | |

/// Widget kinds.
pub mod kind {
    use waterui_protocol_core::WidgetKind;

    /// A clickable button with a label.
    pub const BUTTON: WidgetKind = WidgetKind::new(1);
    /// Static text.
    pub const TEXT: WidgetKind = WidgetKind::new(2);
    /// An editable single line of text.
    pub const TEXT_INPUT: WidgetKind = WidgetKind::new(3);
    /// A horizontal container.
    pub const ROW: WidgetKind = WidgetKind::new(4);
}

/// Tags of [`kind::BUTTON`](super::kind::BUTTON).
pub mod button {
    use waterui_protocol_core::{EventTag, PropertyTag};

    /// Label, a string.
    pub const TEXT: PropertyTag = PropertyTag::new(1);
    /// Whether clicks are reported, a bool.
    pub const ENABLED: PropertyTag = PropertyTag::new(2);
    /// Callback property for [`CLICK`].
    pub const ON_CLICK: PropertyTag = PropertyTag::new(3);
    /// The button was clicked. No payload.
    pub const CLICK: EventTag = EventTag::new(1);
}

/// Tags of [`kind::TEXT`](super::kind::TEXT).
pub mod text {
    use waterui_protocol_core::PropertyTag;

    /// Displayed text, a string.
    pub const TEXT: PropertyTag = PropertyTag::new(1);
}

/// Tags of [`kind::TEXT_INPUT`](super::kind::TEXT_INPUT).
pub mod text_input {
    use waterui_protocol_core::{EventTag, PropertyTag};

    /// Current text, a string.
    pub const TEXT: PropertyTag = PropertyTag::new(1);
    /// Placeholder, a string or null.
    pub const HINT: PropertyTag = PropertyTag::new(2);
    /// Callback property for [`CHANGE`].
    pub const ON_CHANGE: PropertyTag = PropertyTag::new(3);
    /// The user edited the text. Carries the new text.
    pub const CHANGE: EventTag = EventTag::new(1);
}

/// Tags of [`kind::ROW`](super::kind::ROW).
pub mod row {
    use waterui_protocol_core::PropertyTag;

    /// Gap between children in density-independent units, a number.
    pub const SPACING: PropertyTag = PropertyTag::new(1);
}
