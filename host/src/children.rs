//! Children containers of platform widgets.
//!
//! Every container validates its bounds the same way, through [`validate_insert`],
//! [`validate_move`] and [`validate_remove`]. The apply engine runs the same checks against its
//! registry before touching the platform, so a rejected change leaves both untouched.

use std::fmt::Debug;

pub use waterui_protocol_core::bounds::{
    IndexError, adjusted_move_index, validate_insert, validate_move, validate_remove,
};

/// Ordered children of one platform widget.
///
/// `W` is the platform's widget handle (a view, an element, a native control). Implementations
/// forward each operation to the platform synchronously.
pub trait Children<W>: Debug {
    /// Number of children currently attached.
    fn len(&self) -> usize;

    /// Returns `true` if no child is attached.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts `widget` at `index`.
    ///
    /// # Errors
    ///
    /// Fails when `index > len()`.
    fn insert(&mut self, index: usize, widget: W) -> Result<(), IndexError>;

    /// Moves `count` children starting at `from` so that they end up before the child which
    /// was at `to` prior to the move.
    ///
    /// # Errors
    ///
    /// Fails when the moved run or the insertion point is out of bounds.
    fn move_range(&mut self, from: usize, to: usize, count: usize) -> Result<(), IndexError>;

    /// Detaches `count` children starting at `index`.
    ///
    /// # Errors
    ///
    /// Fails when the removed run is out of bounds.
    fn remove(&mut self, index: usize, count: usize) -> Result<(), IndexError>;

    /// Detaches every child.
    fn clear(&mut self);
}

/// A list-backed [`Children`] implementation.
///
/// Useful as the root container of hosts whose platform tree is rebuilt from a list, and as a
/// reference for platform implementations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VecChildren<W> {
    items: Vec<W>,
}

impl<W> VecChildren<W> {
    /// Creates an empty container.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Returns the attached children in order.
    #[must_use]
    pub fn as_slice(&self) -> &[W] {
        &self.items
    }

    /// Iterates over the attached children in order.
    pub fn iter(&self) -> std::slice::Iter<'_, W> {
        self.items.iter()
    }
}

impl<W> Default for VecChildren<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> From<Vec<W>> for VecChildren<W> {
    fn from(items: Vec<W>) -> Self {
        Self { items }
    }
}

impl<W: Debug> Children<W> for VecChildren<W> {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn insert(&mut self, index: usize, widget: W) -> Result<(), IndexError> {
        validate_insert(self.items.len(), index)?;
        self.items.insert(index, widget);
        Ok(())
    }

    fn move_range(&mut self, from: usize, to: usize, count: usize) -> Result<(), IndexError> {
        validate_move(self.items.len(), from, to, count)?;
        let moved: Vec<W> = self.items.drain(from..from + count).collect();
        let dest = adjusted_move_index(from, to, count);
        self.items.splice(dest..dest, moved);
        Ok(())
    }

    fn remove(&mut self, index: usize, count: usize) -> Result<(), IndexError> {
        validate_remove(self.items.len(), index, count)?;
        self.items.drain(index..index + count);
        Ok(())
    }

    fn clear(&mut self) {
        self.items.clear();
    }
}
