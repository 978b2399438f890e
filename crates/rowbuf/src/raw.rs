//! Byte-level growable buffer engine.
//!
//! [`RawBuf`] owns a contiguous byte allocation and tracks how much of it is
//! logically in use. Every operation that may grow the buffer takes it by
//! value and returns it: growth can relocate the backing allocation, so a
//! caller must rebind its handle after every mutating call, and taking
//! `self` makes that rebind a move the borrow checker enforces rather than
//! a discipline the caller has to remember.
//!
//! The empty buffer owns no allocation. It reports size 0 and capacity 0,
//! costs nothing to construct, and dropping it does nothing. The first
//! growing operation allocates.

use std::fmt;
use std::ops::{Deref, DerefMut, Range};

use crate::growth::{GrowthPolicy, MAX_CAPACITY};

/// An owned, growable byte buffer with explicit size and capacity.
///
/// Size is the number of bytes logically in use; capacity is the number of
/// bytes allocated. Invariants, upheld after every operation:
///
/// - `size <= capacity`
/// - `capacity <= MAX_CAPACITY` (`usize::MAX / 2`)
/// - capacity never decreases
///
/// Bytes between the old and new size after a growing [`set_size`] are
/// initialized but unspecified: freshly grown capacity is zero-filled,
/// while bytes vacated by an earlier shrink keep their previous contents.
///
/// Dereferences to `[u8]` over the bytes in use, so indexing, iteration
/// (forward and reverse), and `fill` come straight from the slice.
///
/// [`set_size`]: RawBuf::set_size
#[must_use]
pub struct RawBuf {
    /// Backing storage, kept at exactly `capacity` bytes.
    data: Vec<u8>,
    /// Bytes logically in use. Invariant: `size <= data.len()`.
    size: usize,
    policy: GrowthPolicy,
}

impl RawBuf {
    /// The empty buffer, with the default growth policy. Does not allocate.
    pub fn new() -> Self {
        Self::with_policy(GrowthPolicy::default())
    }

    /// The empty buffer with a custom growth policy. Does not allocate.
    pub fn with_policy(policy: GrowthPolicy) -> Self {
        Self {
            data: Vec::new(),
            size: 0,
            policy,
        }
    }

    /// Allocate a buffer of `rows * row_size` bytes, fully in use and
    /// zero-filled. The standard "array of N rows, default-initialized"
    /// constructor.
    ///
    /// Returns the empty buffer if either argument is zero. Capacity equals
    /// size exactly; later growth follows the default policy.
    ///
    /// # Panics
    ///
    /// Panics if `rows * row_size` overflows or exceeds
    /// [`MAX_CAPACITY`](crate::MAX_CAPACITY).
    pub fn alloc_zeroed(rows: usize, row_size: usize) -> Self {
        if rows == 0 || row_size == 0 {
            return Self::new();
        }
        let total = match rows.checked_mul(row_size) {
            Some(total) if total <= MAX_CAPACITY => total,
            _ => panic!("capacity overflow: {rows} rows of {row_size} bytes"),
        };
        Self {
            data: vec![0; total],
            size: total,
            policy: GrowthPolicy::default(),
        }
    }

    /// Bytes logically in use.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether no bytes are in use.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Bytes allocated.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// The growth policy this buffer uses.
    pub fn policy(&self) -> GrowthPolicy {
        self.policy
    }

    /// Ensure room for at least `additional` more bytes past the current
    /// size.
    ///
    /// If the capacity already suffices the buffer is returned unchanged,
    /// with no allocator call. Otherwise capacity grows to
    /// `max(size + additional, step(capacity))` per the growth policy; all
    /// bytes in use are preserved across the reallocation.
    ///
    /// # Panics
    ///
    /// Panics if `size + additional` exceeds
    /// [`MAX_CAPACITY`](crate::MAX_CAPACITY).
    pub fn reserve(mut self, additional: usize) -> Self {
        let required = match self.size.checked_add(additional) {
            Some(required) => required,
            None => panic!(
                "capacity overflow: size {} + {additional} additional bytes",
                self.size
            ),
        };
        if required <= self.capacity() {
            return self;
        }
        let new_cap = self.policy.next_capacity(self.capacity(), required);
        self.data.resize(new_cap, 0);
        self
    }

    /// Set the logical size directly, growing capacity first if needed.
    ///
    /// Shrinking never reallocates, never reduces capacity, and leaves the
    /// vacated bytes in place. Growing exposes initialized but unspecified
    /// bytes (see the type-level docs).
    ///
    /// # Panics
    ///
    /// Panics if `new_size` exceeds [`MAX_CAPACITY`](crate::MAX_CAPACITY).
    pub fn set_size(mut self, new_size: usize) -> Self {
        if new_size > self.capacity() {
            let additional = new_size - self.size;
            self = self.reserve(additional);
        }
        debug_assert!(new_size <= self.capacity());
        self.size = new_size;
        self
    }

    /// Adjust the logical size by a signed delta.
    ///
    /// Equivalent to [`set_size`](RawBuf::set_size)`(size + delta)`. A
    /// negative delta shrinks the logical size without deallocating or
    /// zeroing the vacated region.
    ///
    /// # Panics
    ///
    /// Panics if the delta would take the size below zero or past
    /// [`MAX_CAPACITY`](crate::MAX_CAPACITY).
    pub fn add_size(self, delta: isize) -> Self {
        let new_size = match self.size.checked_add_signed(delta) {
            Some(new_size) => new_size,
            None => panic!(
                "size adjustment out of range: size {}, delta {delta}",
                self.size
            ),
        };
        self.set_size(new_size)
    }

    /// Append a copy of `bytes` at the tail, growing as needed.
    ///
    /// An empty slice is a no-op. The source can be any plain byte data;
    /// this is the designated way to build a managed buffer from an
    /// unmanaged block. For copying out of the buffer's own storage, use
    /// [`append_from_within`](RawBuf::append_from_within).
    ///
    /// # Panics
    ///
    /// Panics if the grown size would exceed
    /// [`MAX_CAPACITY`](crate::MAX_CAPACITY).
    pub fn append(mut self, bytes: &[u8]) -> Self {
        if bytes.is_empty() {
            return self;
        }
        self = self.reserve(bytes.len());
        let start = self.size;
        self.size += bytes.len();
        self.data[start..self.size].copy_from_slice(bytes);
        self
    }

    /// Append a copy of the buffer's own `src` byte range at the tail.
    ///
    /// The overlapping-copy case of [`append`](RawBuf::append): source and
    /// destination share one allocation, so the copy is expressed as an
    /// in-buffer move rather than a borrow of an external slice.
    ///
    /// # Panics
    ///
    /// Panics if `src` does not lie within the first `size` bytes, or if
    /// the grown size would exceed [`MAX_CAPACITY`](crate::MAX_CAPACITY).
    pub fn append_from_within(mut self, src: Range<usize>) -> Self {
        assert!(
            src.start <= src.end && src.end <= self.size,
            "source range {src:?} outside buffer of size {}",
            self.size
        );
        if src.is_empty() {
            return self;
        }
        let len = src.len();
        self = self.reserve(len);
        let start = self.size;
        self.data.copy_within(src, start);
        self.size = start + len;
        self
    }

    /// View of the bytes in use.
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.size]
    }

    /// Mutable view of the bytes in use.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data[..self.size]
    }

    /// Discard the size/capacity bookkeeping and return exactly the bytes
    /// in use as a plain block.
    ///
    /// The escape hatch for handing data to code that expects an ordinary
    /// allocation: the box holds exactly `size` bytes and is freed by the
    /// global allocator like any other. The empty buffer yields an empty
    /// box.
    pub fn into_boxed_slice(mut self) -> Box<[u8]> {
        self.data.truncate(self.size);
        self.data.into_boxed_slice()
    }
}

impl Default for RawBuf {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for RawBuf {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl DerefMut for RawBuf {
    fn deref_mut(&mut self) -> &mut [u8] {
        self.as_mut_slice()
    }
}

impl fmt::Debug for RawBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawBuf")
            .field("size", &self.size)
            .field("capacity", &self.capacity())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::growth::MIN_BLOCK;
    use proptest::prelude::*;

    #[test]
    fn empty_reports_zero() {
        let buf = RawBuf::new();
        assert_eq!(buf.size(), 0);
        assert_eq!(buf.capacity(), 0);
        assert!(buf.is_empty());
    }

    #[test]
    fn dropping_empty_is_a_no_op() {
        drop(RawBuf::new());
    }

    #[test]
    fn reserve_from_empty_allocates_min_block() {
        let buf = RawBuf::new().reserve(1);
        assert_eq!(buf.capacity(), MIN_BLOCK);
        assert_eq!(buf.size(), 0);
    }

    #[test]
    fn reserve_is_noop_when_capacity_suffices() {
        let buf = RawBuf::new().reserve(1);
        let cap = buf.capacity();
        let buf = buf.reserve(cap);
        assert_eq!(buf.capacity(), cap);
    }

    #[test]
    fn reserve_honors_requests_past_the_step() {
        let buf = RawBuf::new().reserve(10_000);
        assert_eq!(buf.capacity(), 10_000);
    }

    #[test]
    fn growth_is_geometric_past_min_block() {
        let buf = RawBuf::new().set_size(MIN_BLOCK).reserve(1);
        assert_eq!(buf.capacity(), MIN_BLOCK + MIN_BLOCK / 2);
    }

    #[test]
    fn append_round_trips() {
        let buf = RawBuf::new().append(b"hello world");
        assert_eq!(buf.as_slice(), b"hello world");
        assert_eq!(buf.size(), 11);
    }

    #[test]
    fn append_empty_slice_is_noop() {
        let buf = RawBuf::new().append(&[]);
        assert_eq!(buf.size(), 0);
        assert_eq!(buf.capacity(), 0);
    }

    #[test]
    fn append_to_empty_builds_a_buffer() {
        let src: Vec<u8> = (0..20).collect();
        let buf = RawBuf::new().append(&src);
        assert_eq!(buf.size(), 20);
        assert_eq!(buf.as_slice(), src.as_slice());
    }

    #[test]
    fn append_preserves_bytes_across_growth() {
        let first = vec![0xAB; MIN_BLOCK];
        let second = vec![0xCD; MIN_BLOCK];
        let buf = RawBuf::new().append(&first).append(&second);
        assert_eq!(&buf[..MIN_BLOCK], first.as_slice());
        assert_eq!(&buf[MIN_BLOCK..], second.as_slice());
    }

    #[test]
    fn append_from_within_duplicates_the_range() {
        let buf = RawBuf::new().append(b"abcd").append_from_within(0..4);
        assert_eq!(buf.as_slice(), b"abcdabcd");

        let buf = buf.append_from_within(6..8);
        assert_eq!(buf.as_slice(), b"abcdabcdcd");
    }

    #[test]
    fn append_from_within_empty_range_is_noop() {
        let buf = RawBuf::new().append(b"abcd").append_from_within(2..2);
        assert_eq!(buf.as_slice(), b"abcd");
    }

    #[test]
    #[should_panic(expected = "outside buffer")]
    fn append_from_within_rejects_out_of_range() {
        let _ = RawBuf::new().append(b"abcd").append_from_within(2..5);
    }

    #[test]
    fn set_size_grows_and_shrinks() {
        let buf = RawBuf::new().set_size(100);
        assert_eq!(buf.size(), 100);
        assert!(buf.capacity() >= 100);

        let cap = buf.capacity();
        let buf = buf.set_size(10);
        assert_eq!(buf.size(), 10);
        assert_eq!(buf.capacity(), cap);
    }

    #[test]
    fn set_size_growth_exposes_zeroed_bytes() {
        let buf = RawBuf::new().set_size(32);
        assert!(buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn add_size_round_trips_without_touching_capacity() {
        let buf = RawBuf::new().append(b"abc");
        let (size, cap) = (buf.size(), buf.capacity());
        let buf = buf.add_size(5).add_size(-5);
        assert_eq!(buf.size(), size);
        assert_eq!(buf.capacity(), cap);
    }

    #[test]
    fn shrink_never_reallocates() {
        let buf = RawBuf::new().append(&[7; 100]);
        let cap = buf.capacity();
        let buf = buf.add_size(-100);
        assert_eq!(buf.size(), 0);
        assert_eq!(buf.capacity(), cap);
    }

    #[test]
    #[should_panic(expected = "size adjustment out of range")]
    fn add_size_below_zero_panics() {
        let _ = RawBuf::new().append(b"ab").add_size(-3);
    }

    #[test]
    fn alloc_zeroed_is_full_and_zero() {
        let buf = RawBuf::alloc_zeroed(5, 8);
        assert_eq!(buf.size(), 40);
        assert_eq!(buf.capacity(), 40);
        assert!(buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn alloc_zeroed_with_zero_args_is_empty() {
        assert!(RawBuf::alloc_zeroed(0, 8).is_empty());
        assert_eq!(RawBuf::alloc_zeroed(0, 8).capacity(), 0);
        assert!(RawBuf::alloc_zeroed(5, 0).is_empty());
        assert_eq!(RawBuf::alloc_zeroed(5, 0).capacity(), 0);
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn alloc_zeroed_rejects_overflow() {
        let _ = RawBuf::alloc_zeroed(usize::MAX, 2);
    }

    #[test]
    fn into_boxed_slice_is_exact() {
        let buf = RawBuf::new().append(b"payload").reserve(1000);
        assert!(buf.capacity() > buf.size());
        let block = buf.into_boxed_slice();
        assert_eq!(block.len(), 7);
        assert_eq!(&*block, b"payload");
    }

    #[test]
    fn into_boxed_slice_of_empty_is_empty() {
        let block = RawBuf::new().into_boxed_slice();
        assert!(block.is_empty());
    }

    #[test]
    fn deref_gives_indexing_and_reverse_iteration() {
        let buf = RawBuf::new().append(&[1, 2, 3]);
        assert_eq!(buf[0], 1);
        let reversed: Vec<u8> = buf.iter().rev().copied().collect();
        assert_eq!(reversed, vec![3, 2, 1]);
    }

    #[test]
    fn deref_mut_allows_fill() {
        let mut buf = RawBuf::new().set_size(16);
        buf.fill(0x5A);
        assert!(buf.iter().all(|&b| b == 0x5A));
    }

    #[test]
    fn custom_policy_drives_growth() {
        let policy = GrowthPolicy::new(|cap| 4096.max(cap * 2));
        let buf = RawBuf::with_policy(policy).append(b"x");
        assert_eq!(buf.capacity(), 4096);
    }

    #[test]
    fn pushing_1000_ints_one_at_a_time() {
        let mut buf = RawBuf::new();
        let mut last_cap = 0;
        for i in 0..1000u32 {
            buf = buf.append(&i.to_le_bytes());
            assert!(buf.capacity() >= last_cap);
            last_cap = buf.capacity();
        }
        assert_eq!(buf.size(), 4000);
        for (i, chunk) in buf.chunks_exact(4).enumerate() {
            assert_eq!(u32::from_le_bytes(chunk.try_into().unwrap()), i as u32);
        }
    }

    #[derive(Clone, Debug)]
    enum Op {
        Reserve(usize),
        Append(Vec<u8>),
        SetSize(usize),
        Shrink(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0usize..4096).prop_map(Op::Reserve),
            proptest::collection::vec(any::<u8>(), 0..128).prop_map(Op::Append),
            (0usize..8192).prop_map(Op::SetSize),
            (0usize..8192).prop_map(Op::Shrink),
        ]
    }

    proptest! {
        #[test]
        fn invariants_hold_across_op_sequences(
            ops in proptest::collection::vec(op(), 1..64),
        ) {
            let mut buf = RawBuf::new();
            let mut last_cap = 0;
            for op in ops {
                buf = match op {
                    Op::Reserve(n) => buf.reserve(n),
                    Op::Append(bytes) => buf.append(&bytes),
                    Op::SetSize(n) => buf.set_size(n),
                    Op::Shrink(n) => {
                        let n = n.min(buf.size());
                        buf.add_size(-(n as isize))
                    }
                };
                prop_assert!(buf.size() <= buf.capacity());
                prop_assert!(buf.capacity() <= MAX_CAPACITY);
                prop_assert!(buf.capacity() >= last_cap);
                last_cap = buf.capacity();
            }
        }

        #[test]
        fn appended_chunks_read_back_in_order(
            chunks in proptest::collection::vec(
                proptest::collection::vec(any::<u8>(), 0..64),
                0..16,
            ),
        ) {
            let mut buf = RawBuf::new();
            let mut expected = Vec::new();
            for chunk in &chunks {
                buf = buf.append(chunk);
                expected.extend_from_slice(chunk);
            }
            prop_assert_eq!(buf.as_slice(), expected.as_slice());
        }

        #[test]
        fn self_append_equals_external_append(
            bytes in proptest::collection::vec(any::<u8>(), 1..64),
            split in 0usize..64,
        ) {
            let split = split.min(bytes.len());
            let from_within = RawBuf::new()
                .append(&bytes)
                .append_from_within(0..split);
            let external = RawBuf::new().append(&bytes).append(&bytes[..split]);
            prop_assert_eq!(from_within.as_slice(), external.as_slice());
        }
    }
}
