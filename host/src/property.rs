//! Per-kind property setter tables.
//!
//! A [`PropertyTable`] maps each [`PropertyTag`] of one widget kind to a setter. Widgets usually
//! share one table per kind and look incoming tags up in it from [`Widget::apply`](crate::Widget).

use core::fmt::Debug;
use std::collections::HashMap;

use waterui_protocol_core::{PropertyTag, Value};

use crate::sink::NodeEventSink;
use crate::widget::PropertyError;

type SetterFn<N> = Box<dyn Fn(&mut N, &Value, &NodeEventSink) -> Result<(), PropertyError>>;

/// Setters of one widget kind, keyed by property tag.
pub struct PropertyTable<N> {
    setters: HashMap<PropertyTag, SetterFn<N>>,
}

impl<N> Debug for PropertyTable<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut tags: Vec<u32> = self.setters.keys().map(|tag| tag.value()).collect();
        tags.sort_unstable();
        f.debug_struct("PropertyTable")
            .field("node", &core::any::type_name::<N>())
            .field("tags", &tags)
            .finish()
    }
}

impl<N> Default for PropertyTable<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> PropertyTable<N> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            setters: HashMap::new(),
        }
    }

    /// Registers the setter for `tag`, replacing any previous one.
    pub fn register(
        &mut self,
        tag: PropertyTag,
        setter: impl Fn(&mut N, &Value, &NodeEventSink) -> Result<(), PropertyError> + 'static,
    ) {
        self.setters.insert(tag, Box::new(setter));
    }

    /// Builder form of [`register`](Self::register).
    #[must_use]
    pub fn with(
        mut self,
        tag: PropertyTag,
        setter: impl Fn(&mut N, &Value, &NodeEventSink) -> Result<(), PropertyError> + 'static,
    ) -> Self {
        self.register(tag, setter);
        self
    }

    /// Returns `true` if a setter is registered for `tag`.
    #[must_use]
    pub fn contains(&self, tag: PropertyTag) -> bool {
        self.setters.contains_key(&tag)
    }

    /// Runs the setter for `tag` on `node`.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::UnknownTag`] if no setter is registered, otherwise whatever the
    /// setter returns.
    pub fn apply(
        &self,
        node: &mut N,
        tag: PropertyTag,
        value: &Value,
        events: &NodeEventSink,
    ) -> Result<(), PropertyError> {
        let setter = self.setters.get(&tag).ok_or(PropertyError::UnknownTag)?;
        setter(node, value, events)
    }
}

/// Coerces `value` to a string.
///
/// # Errors
///
/// Fails unless `value` is a string.
pub fn string(value: &Value) -> Result<&str, PropertyError> {
    value
        .as_str()
        .ok_or_else(|| PropertyError::invalid("string", value))
}

/// Coerces `value` to an optional string; null maps to `None`.
///
/// # Errors
///
/// Fails unless `value` is a string or null.
pub fn optional_string(value: &Value) -> Result<Option<&str>, PropertyError> {
    if value.is_null() {
        return Ok(None);
    }
    string(value).map(Some)
}

/// Coerces `value` to a boolean.
///
/// # Errors
///
/// Fails unless `value` is a boolean.
pub fn boolean(value: &Value) -> Result<bool, PropertyError> {
    value
        .as_bool()
        .ok_or_else(|| PropertyError::invalid("bool", value))
}

/// Coerces `value` to a number.
///
/// # Errors
///
/// Fails unless `value` is a number.
pub fn number(value: &Value) -> Result<f64, PropertyError> {
    value
        .as_f64()
        .ok_or_else(|| PropertyError::invalid("number", value))
}

/// Coerces a callback property: `true` when the guest installed a handler.
///
/// Null is accepted as "no handler".
///
/// # Errors
///
/// Fails unless `value` is a boolean or null.
pub fn callback(value: &Value) -> Result<bool, PropertyError> {
    if value.is_null() {
        return Ok(false);
    }
    boolean(value)
}

/// Converts density-independent units to physical pixels.
#[must_use]
pub fn dp_to_px(dp: f64, density: f64) -> f64 {
    dp * density
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::EventSink;
    use waterui_protocol_core::NodeId;

    #[derive(Debug, Default)]
    struct Label {
        text: String,
        visible: bool,
    }

    fn table() -> PropertyTable<Label> {
        PropertyTable::new()
            .with(PropertyTag::new(1), |label: &mut Label, value, _| {
                label.text = string(value)?.to_owned();
                Ok(())
            })
            .with(PropertyTag::new(2), |label: &mut Label, value, _| {
                label.visible = boolean(value)?;
                Ok(())
            })
    }

    #[test]
    fn dispatches_by_tag() {
        let table = table();
        let events = EventSink::disconnected().for_node(NodeId::new(1));
        let mut label = Label::default();

        table
            .apply(&mut label, PropertyTag::new(1), &Value::from("Hi"), &events)
            .unwrap();
        table
            .apply(&mut label, PropertyTag::new(2), &Value::from(true), &events)
            .unwrap();

        assert_eq!(label.text, "Hi");
        assert!(label.visible);
        assert!(table.contains(PropertyTag::new(2)));
        assert!(!table.contains(PropertyTag::new(3)));
    }

    #[test]
    fn unknown_tag_and_invalid_value() {
        let table = table();
        let events = EventSink::disconnected().for_node(NodeId::new(1));
        let mut label = Label::default();

        assert_eq!(
            table.apply(&mut label, PropertyTag::new(9), &Value::Null, &events),
            Err(PropertyError::UnknownTag)
        );
        assert_eq!(
            table.apply(&mut label, PropertyTag::new(1), &Value::from(3), &events),
            Err(PropertyError::InvalidValue {
                expected: "string",
                found: "number",
            })
        );
    }

    #[test]
    fn coercions() {
        assert_eq!(optional_string(&Value::Null), Ok(None));
        assert_eq!(optional_string(&Value::from("a")), Ok(Some("a")));
        assert_eq!(callback(&Value::Null), Ok(false));
        assert_eq!(callback(&Value::from(true)), Ok(true));
        assert!(number(&Value::from("1")).is_err());
        assert!((dp_to_px(8.0, 2.5) - 20.0).abs() < f64::EPSILON);
    }
}
