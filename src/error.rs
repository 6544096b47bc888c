use alloc::collections::TryReserveError;
use thiserror::Error;

use crate::bitmap::MAX_ENTRY;

/// Errors returned by the fallible [`Bitmap`] operations.
///
/// Neither variant leaves the bitmap partially modified.
///
/// [`Bitmap`]: crate::Bitmap
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BitmapError {
    /// The integer is larger than [`MAX_ENTRY`].
    #[error("bit index {idx} exceeds maximum entry {max}", max = MAX_ENTRY)]
    OutOfRange {
        /// The rejected integer.
        idx: usize,
    },
    /// Backing storage could not be reserved.
    #[error("failed to allocate storage for {words} bitmap words")]
    Alloc {
        /// Number of words the failed reservation asked for.
        words: usize,
        /// The allocator's error.
        #[source]
        source: TryReserveError,
    },
}
