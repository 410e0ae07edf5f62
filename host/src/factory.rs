//! Widget construction by kind.

use core::fmt::Debug;
use std::collections::HashMap;

use waterui_protocol_core::WidgetKind;

use crate::widget::Widget;

/// Creates platform widgets for the kinds an insert requests.
pub trait WidgetFactory<W> {
    /// Creates a fresh widget of `kind`, or `None` if the kind is unknown to this host.
    fn create(&self, kind: WidgetKind) -> Option<Box<dyn Widget<W>>>;

    /// Returns `true` if [`create`](Self::create) would produce a widget of `kind`.
    ///
    /// The apply engine asks before any other check of an insert so that unknown kinds reach
    /// the mismatch policy first. The default builds a widget and drops it.
    fn supports(&self, kind: WidgetKind) -> bool {
        self.create(kind).is_some()
    }
}

type ConstructorFn<W> = Box<dyn Fn() -> Box<dyn Widget<W>>>;

/// A [`WidgetFactory`] assembled from one constructor per kind.
pub struct KindDispatcher<W> {
    constructors: HashMap<WidgetKind, ConstructorFn<W>>,
}

impl<W> Debug for KindDispatcher<W> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut kinds: Vec<u32> = self.constructors.keys().map(|kind| kind.value()).collect();
        kinds.sort_unstable();
        f.debug_struct("KindDispatcher")
            .field("widget", &core::any::type_name::<W>())
            .field("kinds", &kinds)
            .finish()
    }
}

impl<W> Default for KindDispatcher<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> KindDispatcher<W> {
    /// Creates a dispatcher without any kind.
    #[must_use]
    pub fn new() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Registers the constructor for `kind`, replacing any previous one.
    pub fn register<N>(&mut self, kind: WidgetKind, constructor: impl Fn() -> N + 'static)
    where
        N: Widget<W> + 'static,
    {
        let constructor = move || -> Box<dyn Widget<W>> { Box::new(constructor()) };
        self.constructors.insert(kind, Box::new(constructor));
    }

    /// Builder form of [`register`](Self::register).
    #[must_use]
    pub fn with<N>(mut self, kind: WidgetKind, constructor: impl Fn() -> N + 'static) -> Self
    where
        N: Widget<W> + 'static,
    {
        self.register(kind, constructor);
        self
    }

    /// Returns `true` if `kind` can be constructed.
    #[must_use]
    pub fn contains(&self, kind: WidgetKind) -> bool {
        self.constructors.contains_key(&kind)
    }
}

impl<W> WidgetFactory<W> for KindDispatcher<W> {
    fn create(&self, kind: WidgetKind) -> Option<Box<dyn Widget<W>>> {
        self.constructors.get(&kind).map(|constructor| constructor())
    }

    fn supports(&self, kind: WidgetKind) -> bool {
        self.contains(kind)
    }
}
