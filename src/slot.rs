//! Operations on bitmaps that may not exist yet.
//!
//! Code that tracks identifiers often keeps an `Option<Bitmap>` and only
//! creates the bitmap once the first identifier shows up. The functions here
//! treat an absent bitmap exactly like an empty one, so callers never need to
//! special-case `None` for reads.
//!
//! # Examples
//! ```
//! use grow_bitmap::{Bitmap, BitmapError, slot};
//!
//! let mut pending: Option<Bitmap> = None;
//! assert!(slot::isclear(pending.as_ref()));
//! assert!(!slot::isset(pending.as_ref(), 9));
//!
//! slot::ensure_allocated(&mut pending).set(9)?;
//! assert!(slot::isset(pending.as_ref(), 9));
//!
//! slot::unset(pending.as_mut(), 9);
//! assert!(slot::equal(pending.as_ref(), None));
//! # Ok::<(), BitmapError>(())
//! ```

use crate::bitmap::{Bitmap, Cursor, IterOnes};

/// Returns the bitmap in `slot`, creating an empty one first if there is
/// none.
///
/// An existing bitmap is returned untouched.
///
/// Unlike [`Bitmap::set`] and [`Bitmap::try_clone`] this returns no
/// `Result`: the bitmap lives inline in the `Option` and an empty one owns no
/// storage, so binding it cannot run out of memory. The first allocation
/// happens in [`Bitmap::set`], which reports [`BitmapError::Alloc`].
///
/// # Examples
/// ```
/// use grow_bitmap::{Bitmap, slot};
///
/// let mut pending: Option<Bitmap> = None;
/// let bitmap = slot::ensure_allocated(&mut pending);
/// assert_eq!(bitmap.capacity(), 0);
/// assert!(pending.is_some());
/// ```
///
/// [`BitmapError::Alloc`]: crate::BitmapError::Alloc
pub fn ensure_allocated(slot: &mut Option<Bitmap>) -> &mut Bitmap {
    slot.get_or_insert_with(Bitmap::new)
}

/// Removes `idx` from `bitmap` if there is one.
#[inline]
pub fn unset(bitmap: Option<&mut Bitmap>, idx: usize) {
    if let Some(bitmap) = bitmap {
        bitmap.unset(idx);
    }
}

/// Clears `bitmap` and releases its storage if there is one.
#[inline]
pub fn clear(bitmap: Option<&mut Bitmap>) {
    if let Some(bitmap) = bitmap {
        bitmap.clear();
    }
}

/// Returns `true` if `bitmap` exists and contains `idx`.
#[inline]
pub fn isset(bitmap: Option<&Bitmap>, idx: usize) -> bool {
    bitmap.is_some_and(|bitmap| bitmap.is_set(idx))
}

/// Returns `true` if `bitmap` is absent or contains no integer.
#[inline]
pub fn isclear(bitmap: Option<&Bitmap>) -> bool {
    bitmap.is_none_or(Bitmap::is_clear)
}

/// Compares two possibly absent bitmaps by content.
///
/// Two absent bitmaps are equal, an absent and a present one never are (even
/// if the present one is clear). Present bitmaps are compared with
/// [`Bitmap`]'s `PartialEq`, which ignores trailing zero words.
///
/// # Examples
/// ```
/// use grow_bitmap::{Bitmap, slot};
///
/// let empty = Bitmap::new();
/// assert!(slot::equal(None, None));
/// assert!(!slot::equal(Some(&empty), None));
/// assert!(slot::equal(Some(&empty), Some(&Bitmap::new())));
/// ```
pub fn equal(a: Option<&Bitmap>, b: Option<&Bitmap>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a == b,
        (None, None) => true,
        _ => false,
    }
}

/// Returns the next integer of `bitmap` at or after the cursor position.
///
/// An absent bitmap exhausts the cursor immediately. See
/// [`Bitmap::next_set`].
///
/// # Examples
/// ```
/// use grow_bitmap::{Cursor, slot};
///
/// let mut cursor = Cursor::new();
/// assert_eq!(slot::iterate(None, &mut cursor), None);
/// assert!(cursor.is_exhausted());
/// ```
pub fn iterate(bitmap: Option<&Bitmap>, cursor: &mut Cursor) -> Option<usize> {
    match bitmap {
        Some(bitmap) => bitmap.next_set(cursor),
        None => {
            cursor.finish();
            None
        }
    }
}

/// Returns an iterator over the integers of `bitmap`, in ascending order.
///
/// Yields nothing if `bitmap` is absent.
#[inline]
pub fn iter_ones(bitmap: Option<&Bitmap>) -> IterOnes<'_> {
    IterOnes {
        bitmap,
        cursor: Cursor::new(),
    }
}
