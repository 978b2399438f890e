//! Capacity limits and the growth policy.
//!
//! Growth is driven by a step function mapping the current capacity to a
//! proposed next capacity. The engine takes the maximum of the proposal and
//! the bytes actually required, so a policy can never under-allocate, then
//! clamps the result to [`MAX_CAPACITY`].

/// Largest capacity the engine will ever allocate, in bytes.
///
/// Half the address space: with `capacity <= usize::MAX / 2`, the default
/// 1.5x step (`cap + cap / 2`) cannot wrap around `usize`.
pub const MAX_CAPACITY: usize = usize::MAX / 2;

/// Smallest non-zero capacity the default step proposes, in bytes.
pub const MIN_BLOCK: usize = 64;

/// A growth step function: current capacity in, proposed next capacity out.
pub type GrowthFn = fn(usize) -> usize;

/// Default step: 1.5x the current capacity, floored at [`MIN_BLOCK`] bytes.
///
/// A fresh buffer therefore starts at 64 bytes and grows geometrically from
/// there. There is no ceiling short of [`MAX_CAPACITY`].
pub fn amortized_step(cap: usize) -> usize {
    MIN_BLOCK.max(cap + cap / 2)
}

/// Pluggable buffer growth policy.
///
/// The default policy uses [`amortized_step`]. A custom step function can
/// trade reallocation frequency against slack, e.g. page-sized steps for
/// buffers that are handed to I/O.
#[derive(Clone, Copy, Debug)]
pub struct GrowthPolicy {
    step: GrowthFn,
}

impl GrowthPolicy {
    /// Create a policy from a custom step function.
    pub fn new(step: GrowthFn) -> Self {
        Self { step }
    }

    /// Capacity for a buffer currently at `cap` bytes that must hold
    /// `required` bytes: `max(required, step(cap))`, clamped to
    /// [`MAX_CAPACITY`]. The result is always at least `required`.
    ///
    /// # Panics
    ///
    /// Panics if `required` exceeds [`MAX_CAPACITY`].
    pub(crate) fn next_capacity(&self, cap: usize, required: usize) -> usize {
        assert!(
            required <= MAX_CAPACITY,
            "capacity overflow: {required} bytes required, limit is {MAX_CAPACITY}"
        );
        required.max((self.step)(cap)).min(MAX_CAPACITY)
    }
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self::new(amortized_step)
    }
}
