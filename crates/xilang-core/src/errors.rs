//! Error types for core value types.

use thiserror::Error;

/// An out-of-bounds slice request on a [`crate::Path`] or [`crate::PathBuf`].
///
/// `begin` and `end` are relative to the sliced value, `len` is its length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid range {begin}..{end} for path of length {len}")]
pub struct RangeError {
    pub begin: usize,
    pub end: usize,
    pub len: usize,
}

impl RangeError {
    pub(crate) fn check(begin: usize, end: usize, len: usize) -> Result<(), Self> {
        if begin >= end || end > len {
            Err(Self { begin, end, len })
        } else {
            Ok(())
        }
    }
}
