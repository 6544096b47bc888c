use alloc::vec::Vec;
use core::fmt::{Debug, Formatter};
use core::hash::{Hash, Hasher};
use core::iter::{FusedIterator, Iterator};

use log::{debug, trace};

use crate::error::BitmapError;

/// The largest integer a [`Bitmap`] can hold.
///
/// Bitmaps are meant for small identifiers such as enum values or signal
/// numbers, so 64k entries is plenty.
pub const MAX_ENTRY: usize = 0xffff;

/// Number of bits stored in each backing word.
pub const WORD_BITS: usize = u64::BITS as usize;

/// Upper bound on the number of words a bitmap ever needs.
pub(crate) const MAX_WORDS: usize = MAX_ENTRY / WORD_BITS + 1;

/// Smallest reservation made when a bitmap has to grow (one 64-byte block).
pub(crate) const MIN_GROW_WORDS: usize = 64 / size_of::<u64>();

/// Position reserved for a cursor that ran past the last set bit.
const CURSOR_END: usize = usize::MAX;

/// Splits an integer into its word index and bit offset within that word.
#[inline]
pub(crate) const fn idxs(idx: usize) -> (usize, usize) {
    (idx / WORD_BITS, idx % WORD_BITS)
}

/// Number of words to reserve so that at least `need` words fit.
///
/// Doubles the requirement to keep repeated one-word growth amortized, but
/// never reserves past [`MAX_WORDS`].
#[inline]
pub(crate) fn greedy_words(need: usize) -> usize {
    need.saturating_mul(2)
        .max(MIN_GROW_WORDS)
        .min(MAX_WORDS)
        .max(need)
}

/// A growable set of small integers in `0..=MAX_ENTRY`.
///
/// Internally stores bits in a `Vec<u64>` where bit `r` of word `w` stands for
/// the integer `w * 64 + r`. Storage grows on demand in [`set`] and is only
/// released again by [`clear`]; [`unset`] never shrinks it.
///
/// Two bitmaps compare equal when they contain the same integers, no matter
/// how many trailing zero words either of them carries.
///
/// [`set`]: Bitmap::set
/// [`unset`]: Bitmap::unset
/// [`clear`]: Bitmap::clear
#[derive(Clone, Default)]
pub struct Bitmap {
    pub(crate) words: Vec<u64>,
}

impl Bitmap {
    /// Creates an empty bitmap. Nothing is allocated until the first [`set`].
    ///
    /// # Examples
    /// ```
    /// use grow_bitmap::Bitmap;
    ///
    /// let bitmap = Bitmap::new();
    /// assert!(bitmap.is_clear());
    /// assert_eq!(bitmap.capacity(), 0);
    /// ```
    ///
    /// [`set`]: Bitmap::set
    pub const fn new() -> Self {
        Self { words: Vec::new() }
    }

    /// Creates a bitmap containing every integer yielded by `iter`.
    ///
    /// # Errors
    /// Returns [`BitmapError::OutOfRange`] for the first integer above
    /// [`MAX_ENTRY`] and [`BitmapError::Alloc`] if storage cannot be
    /// reserved. The partially built bitmap is dropped in both cases.
    ///
    /// # Examples
    /// ```
    /// use grow_bitmap::{Bitmap, BitmapError};
    ///
    /// let bitmap = Bitmap::try_from_ones([2, 9, 64])?;
    /// assert!(bitmap.is_set(64));
    /// assert_eq!(bitmap.popcount(), 3);
    ///
    /// let err = Bitmap::try_from_ones([1, 70_000]).unwrap_err();
    /// assert_eq!(err, BitmapError::OutOfRange { idx: 70_000 });
    /// # Ok::<(), BitmapError>(())
    /// ```
    pub fn try_from_ones<I: IntoIterator<Item = usize>>(iter: I) -> Result<Self, BitmapError> {
        let mut bitmap = Self::new();
        for idx in iter {
            bitmap.set(idx)?;
        }
        Ok(bitmap)
    }

    /// Returns a deep copy of the bitmap with independently owned storage.
    ///
    /// The copy keeps the same number of words as `self` and reserves no
    /// spare capacity.
    ///
    /// # Errors
    /// Returns [`BitmapError::Alloc`] if the copy's storage cannot be
    /// reserved. Nothing is leaked in that case.
    ///
    /// # Examples
    /// ```
    /// use grow_bitmap::{Bitmap, BitmapError};
    ///
    /// let mut original = Bitmap::try_from_ones([3, 100])?;
    /// let copy = original.try_clone()?;
    /// assert_eq!(copy, original);
    ///
    /// original.unset(3);
    /// assert!(copy.is_set(3));
    /// # Ok::<(), BitmapError>(())
    /// ```
    pub fn try_clone(&self) -> Result<Self, BitmapError> {
        let mut words = Vec::new();
        words
            .try_reserve_exact(self.words.len())
            .map_err(|source| {
                debug!("bitmap copy of {} words failed: {source}", self.words.len());
                BitmapError::Alloc {
                    words: self.words.len(),
                    source,
                }
            })?;
        words.extend_from_slice(&self.words);
        Ok(Self { words })
    }

    /// Adds `idx` to the bitmap, growing the storage if needed.
    ///
    /// # Errors
    /// Returns [`BitmapError::OutOfRange`] if `idx > MAX_ENTRY` and
    /// [`BitmapError::Alloc`] if growing fails. The bitmap is unchanged on
    /// error.
    ///
    /// # Examples
    /// ```
    /// use grow_bitmap::{Bitmap, BitmapError, MAX_ENTRY};
    ///
    /// let mut bm = Bitmap::new();
    /// bm.set(130)?;
    /// assert!(bm.is_set(130));
    /// assert_eq!(bm.word_len(), 3);
    ///
    /// assert!(bm.set(MAX_ENTRY + 1).is_err());
    /// # Ok::<(), BitmapError>(())
    /// ```
    pub fn set(&mut self, idx: usize) -> Result<(), BitmapError> {
        // keeps storage within MAX_WORDS
        if idx > MAX_ENTRY {
            return Err(BitmapError::OutOfRange { idx });
        }
        let (word_idx, bit_idx) = idxs(idx);
        if word_idx >= self.words.len() {
            self.grow(word_idx + 1)?;
        }
        self.words[word_idx] |= 1 << bit_idx;
        Ok(())
    }

    fn grow(&mut self, need: usize) -> Result<(), BitmapError> {
        if need > self.words.capacity() {
            let target = greedy_words(need);
            trace!(
                "growing bitmap storage from {} to {target} words (need {need})",
                self.words.capacity()
            );
            self.words
                .try_reserve_exact(target - self.words.len())
                .map_err(|source| {
                    debug!("bitmap growth to {target} words failed: {source}");
                    BitmapError::Alloc {
                        words: target,
                        source,
                    }
                })?;
        }
        // capacity already covers `need`, so this only zero-fills
        self.words.resize(need, 0);
        Ok(())
    }

    /// Removes `idx` from the bitmap.
    ///
    /// Does nothing if `idx` lies beyond the current storage. Never shrinks
    /// the storage.
    ///
    /// # Examples
    /// ```
    /// use grow_bitmap::{Bitmap, BitmapError};
    ///
    /// let mut bm = Bitmap::try_from_ones([3])?;
    /// bm.unset(3);
    /// bm.unset(60_000);
    /// assert!(!bm.is_set(3));
    /// assert_eq!(bm.word_len(), 1);
    /// # Ok::<(), BitmapError>(())
    /// ```
    #[inline]
    pub fn unset(&mut self, idx: usize) {
        let (word_idx, bit_idx) = idxs(idx);
        if let Some(word) = self.words.get_mut(word_idx) {
            *word &= !(1 << bit_idx);
        }
    }

    /// Removes every integer and releases the backing storage.
    ///
    /// The bitmap stays usable afterwards.
    ///
    /// # Examples
    /// ```
    /// use grow_bitmap::{Bitmap, BitmapError};
    ///
    /// let mut bm = Bitmap::try_from_ones([1, 500])?;
    /// bm.clear();
    /// assert!(bm.is_clear());
    /// assert_eq!(bm.capacity(), 0);
    /// # Ok::<(), BitmapError>(())
    /// ```
    pub fn clear(&mut self) {
        if self.words.capacity() != 0 {
            trace!("releasing {} bitmap words", self.words.capacity());
        }
        self.words = Vec::new();
    }

    /// Returns `true` if `idx` is in the bitmap.
    ///
    /// Unlike [`set`], integers above [`MAX_ENTRY`] are not an error here;
    /// they are simply never contained.
    ///
    /// # Examples
    /// ```
    /// use grow_bitmap::{Bitmap, BitmapError};
    ///
    /// let bm = Bitmap::try_from_ones([1])?;
    /// assert!(bm.is_set(1));
    /// assert!(!bm.is_set(0));
    /// assert!(!bm.is_set(usize::MAX));
    /// # Ok::<(), BitmapError>(())
    /// ```
    ///
    /// [`set`]: Bitmap::set
    #[inline]
    pub fn is_set(&self, idx: usize) -> bool {
        let (word_idx, bit_idx) = idxs(idx);
        self.words
            .get(word_idx)
            .is_some_and(|&word| word & 1 << bit_idx != 0)
    }

    /// Returns `true` if no integer is in the bitmap.
    #[inline]
    pub fn is_clear(&self) -> bool {
        self.words.iter().all(|word| *word == 0)
    }

    /// Returns the number of integers in the bitmap.
    ///
    /// # Examples
    /// ```
    /// use grow_bitmap::{Bitmap, BitmapError};
    ///
    /// let bm = Bitmap::try_from_ones([0, 64, 65_535])?;
    /// assert_eq!(bm.popcount(), 3);
    /// # Ok::<(), BitmapError>(())
    /// ```
    #[inline]
    pub fn popcount(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns the smallest integer in the bitmap or `None` if it is clear.
    ///
    /// # Examples
    /// ```
    /// use grow_bitmap::{Bitmap, BitmapError};
    ///
    /// assert_eq!(Bitmap::new().first_set_bit(), None);
    /// assert_eq!(Bitmap::try_from_ones([300, 70])?.first_set_bit(), Some(70));
    /// # Ok::<(), BitmapError>(())
    /// ```
    pub fn first_set_bit(&self) -> Option<usize> {
        for (i, word) in self.words.iter().enumerate() {
            if *word != 0 {
                return Some(i * WORD_BITS + word.trailing_zeros() as usize);
            }
        }
        None
    }

    /// Number of words currently in logical use.
    #[inline]
    pub fn word_len(&self) -> usize {
        self.words.len()
    }

    /// Number of words the backing storage can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.words.capacity()
    }

    /// Returns the next integer in the bitmap at or after the cursor
    /// position, and moves the cursor one past it.
    ///
    /// Once no integer is left the cursor is marked exhausted and every
    /// further call returns `None` without scanning again. Changing the
    /// bitmap between calls is allowed but the remaining results are then
    /// unspecified.
    ///
    /// # Examples
    /// ```
    /// use grow_bitmap::{Bitmap, BitmapError, Cursor};
    ///
    /// let bm = Bitmap::try_from_ones([0, 5, 130])?;
    /// let mut cursor = Cursor::new();
    /// assert_eq!(bm.next_set(&mut cursor), Some(0));
    /// assert_eq!(bm.next_set(&mut cursor), Some(5));
    /// assert_eq!(bm.next_set(&mut cursor), Some(130));
    /// assert_eq!(bm.next_set(&mut cursor), None);
    /// assert!(cursor.is_exhausted());
    /// # Ok::<(), BitmapError>(())
    /// ```
    pub fn next_set(&self, cursor: &mut Cursor) -> Option<usize> {
        if cursor.is_exhausted() {
            return None;
        }
        let (mut word_idx, bit_idx) = idxs(cursor.pos);
        let mut mask = !0u64 << bit_idx;

        while let Some(word) = self.words.get(word_idx) {
            let bits = word & mask;
            if bits != 0 {
                let idx = word_idx * WORD_BITS + bits.trailing_zeros() as usize;
                cursor.pos = idx + 1;
                return Some(idx);
            }
            word_idx += 1;
            mask = !0;
        }

        cursor.pos = CURSOR_END;
        None
    }

    /// Returns an iterator over the integers in the bitmap, in ascending
    /// order.
    ///
    /// # Examples
    /// ```
    /// use grow_bitmap::{Bitmap, BitmapError};
    ///
    /// let bm = Bitmap::try_from_ones([130, 5, 0])?;
    /// let mut ones = bm.iter_ones();
    /// assert_eq!(ones.next(), Some(0));
    /// assert_eq!(ones.next(), Some(5));
    /// assert_eq!(ones.next(), Some(130));
    /// assert_eq!(ones.next(), None);
    /// # Ok::<(), BitmapError>(())
    /// ```
    #[inline]
    pub fn iter_ones(&self) -> IterOnes<'_> {
        IterOnes {
            bitmap: Some(self),
            cursor: Cursor::new(),
        }
    }

    /// Number of words up to and including the last non-zero one.
    fn significant_len(&self) -> usize {
        self.words
            .iter()
            .rposition(|word| *word != 0)
            .map_or(0, |last| last + 1)
    }
}

impl PartialEq for Bitmap {
    fn eq(&self, other: &Self) -> bool {
        if core::ptr::eq(self, other) {
            return true;
        }
        let common = self.words.len().min(other.words.len());
        let (head, tail) = self.words.split_at(common);
        let (other_head, other_tail) = other.words.split_at(common);

        // at most one of the tails is non-empty
        head == other_head && tail.iter().chain(other_tail).all(|word| *word == 0)
    }
}

impl Eq for Bitmap {}

impl Hash for Bitmap {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.words[..self.significant_len()].hash(state);
    }
}

impl<'bitmap> IntoIterator for &'bitmap Bitmap {
    type Item = usize;
    type IntoIter = IterOnes<'bitmap>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_ones()
    }
}

impl Debug for Bitmap {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter_ones()).finish()
    }
}

/// Iteration state for [`Bitmap::next_set`] and [`slot::iterate`].
///
/// A cursor starts before the smallest possible integer and only moves
/// forward. Start over by creating a new one.
///
/// [`slot::iterate`]: crate::slot::iterate
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pos: usize,
}

impl Cursor {
    /// Creates a cursor positioned at the start.
    pub const fn new() -> Self {
        Self { pos: 0 }
    }

    /// Returns `true` once the cursor has run past the last integer.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.pos == CURSOR_END
    }

    pub(crate) fn finish(&mut self) {
        self.pos = CURSOR_END;
    }
}

/// Iterator over the integers contained in a bitmap.
///
/// Yields them in ascending order. An absent bitmap yields nothing.
///
/// Returned by [`Bitmap::iter_ones()`] and [`slot::iter_ones()`].
///
/// [`slot::iter_ones()`]: crate::slot::iter_ones
#[derive(Clone, Copy)]
pub struct IterOnes<'bitmap> {
    pub(crate) bitmap: Option<&'bitmap Bitmap>,
    pub(crate) cursor: Cursor,
}

impl Iterator for IterOnes<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        crate::slot::iterate(self.bitmap, &mut self.cursor)
    }
}

impl FusedIterator for IterOnes<'_> {}
