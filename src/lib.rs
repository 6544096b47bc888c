//! A small, growable bitmap for tracking small integer identifiers.
//! `no_std` with `alloc`, no `unsafe`.
//!
//! Designed for bookkeeping of a bounded set of identifiers such as enum
//! values or signal numbers (`0..=65535`).
//!
//! [`Bitmap`] is the main struct in this library. Its [features](#features)
//! are listed below.
//!
//! # Examples
//! ```
//! use grow_bitmap::{Bitmap, BitmapError};
//!
//! let mut bitmap = Bitmap::new();
//! assert!(bitmap.is_clear());
//! bitmap.set(3)?;
//! bitmap.set(130)?;
//! assert!(bitmap.is_set(3));
//! assert_eq!(bitmap.iter_ones().collect::<Vec<_>>(), [3, 130]);
//! # Ok::<(), BitmapError>(())
//! ```
//!
//! # Use Cases
//!
//! - Tracking which enum values or signal numbers are active
//! - Sets that are usually tiny or empty, where allocating up front is
//!   wasteful
//! - Code that must handle allocation failure instead of aborting
//! - Not a general purpose bit vector: there is no set algebra and no
//!   support for integers above [`MAX_ENTRY`]
//!
//! # Features
//!
//! - `#![no_std]` compatible (needs `alloc`)
//! - Storage grows on demand and is only released by `clear`
//! - Fallible `set` and `try_clone` reporting [`BitmapError`]
//! - Equality and hashing that ignore trailing zero words
//! - Ascending iteration over set integers:
//!   - `iter_ones()` (borrowing iterator)
//!   - `next_set()` with a detached [`Cursor`]
//! - The [`slot`] module for bitmaps held in an `Option` that may not exist
//!   yet
//!
//! # Logging
//!
//! Storage growth, release and allocation failures are reported through the
//! [`log`](https://docs.rs/log) facade at `trace` and `debug` level.

#![deny(missing_docs)]
#![forbid(unsafe_code)]
#![no_std]

extern crate alloc;

mod bitmap;
mod error;
pub mod slot;

pub use bitmap::{Bitmap, Cursor, IterOnes, MAX_ENTRY, WORD_BITS};
pub use error::BitmapError;
