//! Bounds checks shared by every children container.
//!
//! Host containers and the guest's shadow tree validate structural changes with the same
//! functions, so both sides reject exactly the same changes.

use alloc::format;
use alloc::string::String;

use thiserror::Error;

/// A bounds violation on a children container.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct IndexError(pub String);

/// Validates an insertion point. `index` may equal `len` (append).
///
/// # Errors
///
/// Returns an [`IndexError`] describing the violated bound.
pub fn validate_insert(len: usize, index: usize) -> Result<(), IndexError> {
    if index > len {
        return Err(IndexError(format!(
            "index must be in range [0, {len}]: {index}"
        )));
    }
    Ok(())
}

/// Validates a move of `count` children from `from` to the insertion point `to`.
///
/// An insertion point strictly inside the moved run is rejected.
///
/// # Errors
///
/// Returns an [`IndexError`] describing the violated bound.
pub fn validate_move(len: usize, from: usize, to: usize, count: usize) -> Result<(), IndexError> {
    if from >= len {
        return Err(IndexError(format!(
            "fromIndex must be in range [0, {len}): {from}"
        )));
    }
    if to > len {
        return Err(IndexError(format!(
            "toIndex must be in range [0, {len}]: {to}"
        )));
    }
    let end = from.checked_add(count).filter(|end| *end <= len);
    let Some(end) = end else {
        return Err(IndexError(format!(
            "count exceeds children: fromIndex={from}, count={count}, children={len}"
        )));
    };
    if to > from && to < end {
        return Err(IndexError(format!(
            "toIndex must not fall inside the moved range [{from}, {end}): {to}"
        )));
    }
    Ok(())
}

/// Validates the removal of `count` children starting at `index`.
///
/// # Errors
///
/// Returns an [`IndexError`] describing the violated bound.
pub fn validate_remove(len: usize, index: usize, count: usize) -> Result<(), IndexError> {
    if index >= len {
        return Err(IndexError(format!(
            "index must be in range [0, {len}): {index}"
        )));
    }
    if index.checked_add(count).is_none_or(|end| end > len) {
        return Err(IndexError(format!(
            "count must be in range [0, {}]: {count}",
            len - index
        )));
    }
    Ok(())
}

/// Index at which a moved run is reinserted once it has been detached.
///
/// Detaching the run shifts every later index down by `count`.
#[must_use]
pub const fn adjusted_move_index(from: usize, to: usize, count: usize) -> usize {
    if to > from { to - count } else { to }
}
