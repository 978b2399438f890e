//! Growable byte and row buffers with an explicit, pluggable growth policy.
//!
//! `rowbuf` is a small dynamic-array engine: a contiguous allocation that
//! tracks how many bytes are in use (size) and how many are allocated
//! (capacity), growing geometrically as data is appended.
//!
//! Two faces over one engine:
//!
//! - [`RawBuf`] — byte-oriented. Append arbitrary byte blocks, adjust the
//!   logical size directly, strip the bookkeeping off at the end with
//!   [`RawBuf::into_boxed_slice`]. Mutating operations take the buffer by
//!   value and return it, because growth may relocate the allocation; the
//!   borrow checker enforces the rebind.
//! - [`RowVec`] — typed fixed-width rows (`T: Copy`) over the same growth
//!   policy, dereferencing to `[T]`.
//!
//! # Invariants
//!
//! After every operation, `size <= capacity <= MAX_CAPACITY`
//! (`usize::MAX / 2`), and capacity never decreases. Violations of the
//! arithmetic contract (size past the limit, negative size, out-of-range
//! self-copy) are programming errors and panic — they are never clamped.
//! Allocation exhaustion follows `Vec`: the global allocator's abort path.
//!
//! # Example
//!
//! ```rust
//! use rowbuf::{RawBuf, RowVec};
//!
//! // Byte face: build a managed buffer from plain data, then strip it.
//! let buf = RawBuf::new().append(b"header").append(b"payload");
//! assert_eq!(buf.size(), 13);
//! let plain: Box<[u8]> = buf.into_boxed_slice();
//! assert_eq!(&plain[..6], b"header");
//!
//! // Typed face: fixed-width rows.
//! let mut points = RowVec::<[f32; 2]>::zeroed(4);
//! points.push([1.0, 2.0]);
//! assert_eq!(points.len(), 5);
//! assert_eq!(points[4], [1.0, 2.0]);
//! ```
//!
//! # Concurrency
//!
//! None. Buffers are single-owner values with no interior mutability;
//! sharing one across threads is whatever `Send`/`Sync` auto-derivation
//! says about the element type, and there is no internal locking.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod growth;
pub mod raw;
pub mod rows;

pub use growth::{GrowthFn, GrowthPolicy, MAX_CAPACITY, MIN_BLOCK};
pub use raw::RawBuf;
pub use rows::RowVec;
