//! Node degree type and degree-table sizing.
//!
//! # Why u8?
//!
//! A Fibonacci heap node of degree `d` roots a subtree of at least `F(d+2)`
//! nodes, so degrees stay below `log_φ(n) ≈ 1.44 · log₂(n)`. Even a heap
//! filling a 64-bit address space has degrees under 93, so `u8` is enough and
//! keeps `Node` small.
//!
//! # Runtime Checks
//!
//! [`checked_increment`] panics if the type limit is reached, which can only
//! happen through structural corruption.

/// Number of direct children of a node.
pub type Degree = u8;

/// Largest representable degree.
pub const MAX_DEGREE: Degree = u8::MAX;

/// Increment a degree, panicking on overflow.
///
/// # Panics
///
/// Panics if `degree == MAX_DEGREE`.
///
/// # Example
///
/// ```rust
/// use fib_heap_engine::degree::checked_increment;
///
/// assert_eq!(checked_increment(5), 6);
/// ```
#[inline]
pub fn checked_increment(degree: Degree) -> Degree {
    degree
        .checked_add(1)
        .expect("degree overflow: degrees are bounded by 1.44 * log2(n)")
}

/// Decrement a degree, saturating at zero.
#[inline]
pub fn saturating_decrement(degree: Degree) -> Degree {
    degree.saturating_sub(1)
}

/// Initial number of degree buckets used by consolidation for `len` nodes:
/// `⌊log₂ len⌋ + 2`.
///
/// This follows the classical `log₂` sizing. The true bound is `log_φ`, so the
/// table may still need to grow during a pass; see [`bucket_index`].
///
/// ```rust
/// use fib_heap_engine::degree::initial_buckets;
///
/// assert_eq!(initial_buckets(0), 2);
/// assert_eq!(initial_buckets(1), 2);
/// assert_eq!(initial_buckets(8), 5);
/// ```
#[inline]
pub fn initial_buckets(len: usize) -> usize {
    match len {
        0 => 2,
        n => n.ilog2() as usize + 2,
    }
}

/// Table index for a degree.
#[inline]
pub fn bucket_index(degree: Degree) -> usize {
    usize::from(degree)
}
