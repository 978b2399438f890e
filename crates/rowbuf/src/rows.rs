//! Typed fixed-width rows over the shared growth policy.
//!
//! [`RowVec`] is the parametric face of the buffer engine: a growable array
//! of rows of some `T: Copy`. The `Copy` bound is the contract that rows
//! are plain data with no drop glue — the engine moves and duplicates them
//! bytewise and never runs destructors for vacated rows.
//!
//! Unlike [`RawBuf`](crate::RawBuf), whose logical size can be set without
//! initializing the exposed bytes, every row a `RowVec` exposes is a value
//! the caller supplied, so operations borrow `&mut self` instead of moving
//! the vector through every call.

use std::fmt;
use std::mem;
use std::ops::{Deref, DerefMut, Range};

use crate::growth::GrowthPolicy;

/// A growable array of fixed-width rows.
///
/// Backed by a `Vec<T>`, but capacity is driven by the engine's
/// [`GrowthPolicy`], computed in bytes and converted back to rows.
/// Dereferences to `[T]` for indexing, iteration, and fills.
///
/// Capacity (in rows) never decreases, and the length never exceeds it.
#[derive(Clone)]
pub struct RowVec<T: Copy> {
    data: Vec<T>,
    policy: GrowthPolicy,
}

impl<T: Copy> RowVec<T> {
    /// The empty vector, with the default growth policy. Does not allocate.
    pub fn new() -> Self {
        Self::with_policy(GrowthPolicy::default())
    }

    /// The empty vector with a custom growth policy. Does not allocate.
    pub fn with_policy(policy: GrowthPolicy) -> Self {
        Self {
            data: Vec::new(),
            policy,
        }
    }

    /// A vector of `rows` default-valued rows, fully in use.
    ///
    /// The typed "array of N rows, default-initialized" constructor.
    /// `zeroed(0)` is the empty vector and does not allocate.
    pub fn zeroed(rows: usize) -> Self
    where
        T: Default,
    {
        Self::filled(rows, T::default())
    }

    /// A vector of `rows` copies of `value`, fully in use.
    pub fn filled(rows: usize, value: T) -> Self {
        Self {
            data: vec![value; rows],
            policy: GrowthPolicy::default(),
        }
    }

    /// Rows in use.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether no rows are in use.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Capacity in rows.
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Bytes in use: `len * size_of::<T>()`.
    pub fn size_bytes(&self) -> usize {
        self.data.len() * mem::size_of::<T>()
    }

    /// The growth policy this vector uses.
    pub fn policy(&self) -> GrowthPolicy {
        self.policy
    }

    /// Grow capacity (if needed) so that `additional` more rows fit,
    /// following the growth policy.
    ///
    /// # Panics
    ///
    /// Panics if the required capacity in bytes exceeds
    /// [`MAX_CAPACITY`](crate::MAX_CAPACITY).
    fn grow_for(&mut self, additional: usize) {
        let row = mem::size_of::<T>();
        if row == 0 {
            // Zero-width rows occupy no storage; Vec handles them natively.
            return;
        }
        let required_rows = match self.data.len().checked_add(additional) {
            Some(required_rows) => required_rows,
            None => panic!(
                "capacity overflow: {} rows + {additional}",
                self.data.len()
            ),
        };
        if required_rows <= self.data.capacity() {
            return;
        }
        let required_bytes = match required_rows.checked_mul(row) {
            Some(required_bytes) => required_bytes,
            None => panic!("capacity overflow: {required_rows} rows of {row} bytes"),
        };
        let cap_bytes = self.data.capacity().saturating_mul(row);
        let next_rows = self.policy.next_capacity(cap_bytes, required_bytes) / row;
        self.data.reserve_exact(next_rows - self.data.len());
    }

    /// Ensure room for at least `additional` more rows.
    pub fn reserve(&mut self, additional: usize) {
        self.grow_for(additional);
    }

    /// Append one row.
    pub fn push(&mut self, row: T) {
        self.grow_for(1);
        self.data.push(row);
    }

    /// Remove and return the last row, or `None` when empty.
    pub fn pop(&mut self) -> Option<T> {
        self.data.pop()
    }

    /// Shorten to at most `rows` rows.
    ///
    /// Never reallocates or reduces capacity; vacated rows keep their
    /// storage until overwritten. A `rows` past the current length is a
    /// no-op.
    pub fn truncate(&mut self, rows: usize) {
        self.data.truncate(rows);
    }

    /// Resize to exactly `rows` rows, filling any new rows with `value`.
    pub fn resize(&mut self, rows: usize, value: T) {
        if rows > self.data.len() {
            self.grow_for(rows - self.data.len());
        }
        self.data.resize(rows, value);
    }

    /// Append copies of every row in `rows`.
    pub fn extend_from_slice(&mut self, rows: &[T]) {
        self.grow_for(rows.len());
        self.data.extend_from_slice(rows);
    }

    /// Append a copy of the vector's own `src` row range at the tail.
    ///
    /// The overlapping-copy case of
    /// [`extend_from_slice`](RowVec::extend_from_slice).
    ///
    /// # Panics
    ///
    /// Panics if `src` does not lie within `0..len`.
    pub fn extend_from_within(&mut self, src: Range<usize>) {
        assert!(
            src.start <= src.end && src.end <= self.data.len(),
            "source range {src:?} outside vector of length {}",
            self.data.len()
        );
        self.grow_for(src.len());
        self.data.extend_from_within(src);
    }

    /// View of the rows in use.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable view of the rows in use.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Discard the growth policy and return the rows as a plain `Vec`.
    ///
    /// The vector keeps its spare capacity; use
    /// [`into_boxed_slice`](RowVec::into_boxed_slice) for an exact block.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Discard all bookkeeping and return exactly `len` rows as a plain,
    /// independently freeable block.
    pub fn into_boxed_slice(self) -> Box<[T]> {
        self.data.into_boxed_slice()
    }
}

impl<T: Copy> Default for RowVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy> Deref for RowVec<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Copy> DerefMut for RowVec<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Copy> Extend<T> for RowVec<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (low, _) = iter.size_hint();
        self.grow_for(low);
        for row in iter {
            self.push(row);
        }
    }
}

impl<T: Copy> fmt::Debug for RowVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowVec")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish_non_exhaustive()
    }
}
