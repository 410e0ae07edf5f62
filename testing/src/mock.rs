//! Recording mock widgets implementing the sample schema on the host side.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use waterui_protocol_core::{IndexError, PropertyTag, Value, WidgetKind};
use waterui_protocol_host::property::{
    boolean, callback, dp_to_px, number, optional_string, string,
};
use waterui_protocol_host::{
    Children, KindDispatcher, NodeEventSink, PropertyError, PropertyTable, VecChildren, Widget,
};

use crate::schema::{button, kind, row, text, text_input};

/// Everything a mock widget has been told so far.
#[derive(Debug)]
pub struct MockState {
    /// Widget kind the view was created for.
    pub kind: WidgetKind,
    /// Label or content.
    pub text: Option<String>,
    /// Placeholder of a text input.
    pub hint: Option<String>,
    /// Whether interaction is reported.
    pub enabled: bool,
    /// Row spacing converted to pixels.
    pub spacing_px: f64,
    /// Attached children.
    pub children: VecChildren<MockView>,
    /// Set once the node has been unregistered.
    pub detached: bool,
    listener: Option<NodeEventSink>,
    density: f64,
}

/// A shared handle to a mock platform view.
#[derive(Debug, Clone)]
pub struct MockView(Rc<RefCell<MockState>>);

impl MockView {
    fn new(kind: WidgetKind, density: f64) -> Self {
        Self(Rc::new(RefCell::new(MockState {
            kind,
            text: None,
            hint: None,
            enabled: true,
            spacing_px: 0.0,
            children: VecChildren::new(),
            detached: false,
            listener: None,
            density,
        })))
    }

    /// Borrows the recorded state.
    ///
    /// # Panics
    ///
    /// Panics if the view is being mutated.
    #[must_use]
    pub fn state(&self) -> Ref<'_, MockState> {
        self.0.borrow()
    }

    /// Widget kind of the view.
    #[must_use]
    pub fn kind(&self) -> WidgetKind {
        self.state().kind
    }

    /// Label or content of the view.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        self.state().text.clone()
    }

    /// Attached children, in order.
    #[must_use]
    pub fn children(&self) -> Vec<Self> {
        self.state().children.iter().cloned().collect()
    }

    /// Returns `true` if the guest installed an interaction callback.
    #[must_use]
    pub fn has_listener(&self) -> bool {
        self.state().listener.is_some()
    }

    /// Simulates a click. Returns `false` if nothing was reported.
    pub fn click(&self) -> bool {
        let state = self.state();
        match &state.listener {
            Some(listener) if state.enabled => {
                listener.signal(button::CLICK);
                true
            }
            _ => false,
        }
    }

    /// Simulates the user typing `input`. Returns `false` if nothing was reported.
    pub fn type_text(&self, input: &str) -> bool {
        self.0.borrow_mut().text = Some(input.to_owned());
        let state = self.state();
        match &state.listener {
            Some(listener) => {
                listener.emit(text_input::CHANGE, input);
                true
            }
            None => false,
        }
    }
}

/// The children container of a [`MockView`].
#[derive(Debug, Clone)]
pub struct MockChildren(MockView);

impl MockChildren {
    /// The view whose children this container holds.
    #[must_use]
    pub const fn view(&self) -> &MockView {
        &self.0
    }
}

impl Children<MockView> for MockChildren {
    fn len(&self) -> usize {
        self.0.state().children.len()
    }

    fn insert(&mut self, index: usize, widget: MockView) -> Result<(), IndexError> {
        self.0.0.borrow_mut().children.insert(index, widget)
    }

    fn move_range(&mut self, from: usize, to: usize, count: usize) -> Result<(), IndexError> {
        self.0.0.borrow_mut().children.move_range(from, to, count)
    }

    fn remove(&mut self, index: usize, count: usize) -> Result<(), IndexError> {
        self.0.0.borrow_mut().children.remove(index, count)
    }

    fn clear(&mut self) {
        self.0.0.borrow_mut().children.clear();
    }
}

/// Creates the root container together with a handle to inspect it.
#[must_use]
pub fn root() -> (MockChildren, MockView) {
    let view = MockView::new(WidgetKind::ROOT, 1.0);
    (MockChildren(view.clone()), view)
}

#[derive(Debug)]
struct MockWidget {
    view: MockView,
    properties: Rc<PropertyTable<MockState>>,
    children: Option<MockChildren>,
}

impl Widget<MockView> for MockWidget {
    fn kind(&self) -> WidgetKind {
        self.view.kind()
    }

    fn value(&self) -> MockView {
        self.view.clone()
    }

    fn apply(
        &mut self,
        tag: PropertyTag,
        value: &Value,
        events: &NodeEventSink,
    ) -> Result<(), PropertyError> {
        let mut state = self.view.0.borrow_mut();
        self.properties.apply(&mut state, tag, value, events)
    }

    fn children(&mut self) -> Option<&mut dyn Children<MockView>> {
        self.children
            .as_mut()
            .map(|children| children as &mut dyn Children<MockView>)
    }

    fn detach(&mut self) {
        let mut state = self.view.0.borrow_mut();
        state.detached = true;
        state.listener = None;
    }
}

fn set_listener(state: &mut MockState, installed: bool, events: &NodeEventSink) {
    state.listener = installed.then(|| events.clone());
}

fn button_properties() -> PropertyTable<MockState> {
    PropertyTable::new()
        .with(button::TEXT, |state: &mut MockState, value, _| {
            state.text = Some(string(value)?.to_owned());
            Ok(())
        })
        .with(button::ENABLED, |state: &mut MockState, value, _| {
            state.enabled = boolean(value)?;
            Ok(())
        })
        .with(button::ON_CLICK, |state: &mut MockState, value, events| {
            set_listener(state, callback(value)?, events);
            Ok(())
        })
}

fn text_properties() -> PropertyTable<MockState> {
    PropertyTable::new().with(text::TEXT, |state: &mut MockState, value, _| {
        state.text = Some(string(value)?.to_owned());
        Ok(())
    })
}

fn text_input_properties() -> PropertyTable<MockState> {
    PropertyTable::new()
        .with(text_input::TEXT, |state: &mut MockState, value, _| {
            state.text = Some(string(value)?.to_owned());
            Ok(())
        })
        .with(text_input::HINT, |state: &mut MockState, value, _| {
            state.hint = optional_string(value)?.map(str::to_owned);
            Ok(())
        })
        .with(text_input::ON_CHANGE, |state: &mut MockState, value, events| {
            set_listener(state, callback(value)?, events);
            Ok(())
        })
}

fn row_properties() -> PropertyTable<MockState> {
    PropertyTable::new().with(row::SPACING, |state: &mut MockState, value, _| {
        state.spacing_px = dp_to_px(number(value)?, state.density);
        Ok(())
    })
}

fn register(
    factory: &mut KindDispatcher<MockView>,
    kind: WidgetKind,
    properties: PropertyTable<MockState>,
    container: bool,
    density: f64,
) {
    let properties = Rc::new(properties);
    factory.register(kind, move || {
        let view = MockView::new(kind, density);
        MockWidget {
            children: container.then(|| MockChildren(view.clone())),
            view,
            properties: properties.clone(),
        }
    });
}

/// A factory for every kind of the sample schema.
///
/// `density` converts row spacing from density-independent units to pixels.
#[must_use]
pub fn widget_factory(density: f64) -> KindDispatcher<MockView> {
    let mut factory = KindDispatcher::new();
    register(&mut factory, kind::BUTTON, button_properties(), false, density);
    register(&mut factory, kind::TEXT, text_properties(), false, density);
    register(
        &mut factory,
        kind::TEXT_INPUT,
        text_input_properties(),
        false,
        density,
    );
    register(&mut factory, kind::ROW, row_properties(), true, density);
    factory
}

#[cfg(test)]
mod tests {
    use super::*;
    use waterui_protocol_core::{Event, NodeId};
    use waterui_protocol_host::{EventSink, WidgetFactory};

    #[test]
    fn button_records_properties_and_clicks() {
        let factory = widget_factory(1.0);
        let mut widget = factory.create(kind::BUTTON).unwrap();
        let (sink, events) = EventSink::channel(None);
        let node = sink.for_node(NodeId::new(3));

        widget.apply(button::TEXT, &Value::from("Ok"), &node).unwrap();
        let view = widget.value();
        assert_eq!(view.text().as_deref(), Some("Ok"));
        assert!(!view.click());

        widget.apply(button::ON_CLICK, &Value::from(true), &node).unwrap();
        assert!(view.click());
        assert_eq!(
            events.try_recv().unwrap(),
            Event::signal(NodeId::new(3), button::CLICK)
        );

        widget.apply(button::ENABLED, &Value::from(false), &node).unwrap();
        assert!(!view.click());
        assert!(widget.children().is_none());
    }

    #[test]
    fn row_converts_spacing() {
        let factory = widget_factory(2.0);
        let mut widget = factory.create(kind::ROW).unwrap();
        let node = EventSink::disconnected().for_node(NodeId::new(1));
        widget.apply(row::SPACING, &Value::from(8), &node).unwrap();
        assert!((widget.value().state().spacing_px - 16.0).abs() < f64::EPSILON);
        assert!(widget.children().is_some());
    }

    #[test]
    fn unknown_kind_is_not_created() {
        assert!(widget_factory(1.0).create(WidgetKind::new(99)).is_none());
    }
}
