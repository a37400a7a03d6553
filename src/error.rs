//! Error types for reading from sequence views.

use thiserror::Error;

/// Errors surfaced by read access on a [`SequenceView`](crate::view::sequence::SequenceView).
///
/// Mutations of a source that violate the change protocol (for example a
/// sub-edit whose range lies outside the current length) are programming
/// errors of the source and are not reported through this type.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SequenceError {
    /// The requested index lies outside `[0, len)`.
    #[error("index {idx} out of range for sequence of length {len}")]
    IndexOutOfRange {
        /// Index that was requested
        idx: usize,
        /// Length of the sequence at the time of the request
        len: usize,
    },
}

impl SequenceError {
    pub fn is_index_out_of_range(&self) -> bool {
        matches!(self, SequenceError::IndexOutOfRange { .. })
    }
}

pub type Result<T> = std::result::Result<T, SequenceError>;

/// Returns `Ok(())` if `idx` addresses an element of a sequence of length `len`.
pub fn check_index(idx: usize, len: usize) -> Result<()> {
    if idx < len {
        Ok(())
    } else {
        Err(SequenceError::IndexOutOfRange { idx, len })
    }
}
