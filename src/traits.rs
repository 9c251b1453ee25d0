//! Common traits for heap data structures
//!
//! This module provides a layered trait hierarchy for priority queues:
//!
//! - [`Heap`]: Base trait with the `BinaryHeap`-like push/peek/pop surface
//! - [`MergeableHeap`]: Adds consuming `merge`
//! - [`DecreaseKeyHeap`]: Adds handle-based `decrease_key` and `delete`
//!
//! The shortest-path drivers in [`crate::pathfinding`] are written against
//! these traits, so the Fibonacci heap and the binary-heap baseline can be
//! swapped in the same algorithm for comparison.

use thiserror::Error;

/// Error type for handle-based heap operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeapError {
    /// `decrease_key` was asked to raise a key
    #[error("invalid argument: new key is greater than the current key")]
    InvalidArgument,
    /// The handle refers to an element that was removed, or to another heap
    #[error("stale handle: element was removed or belongs to another heap")]
    StaleHandle,
}

/// A handle to an element in the heap, used for decrease_key and delete
///
/// Handles are opaque. They stay valid until the element they name is removed
/// by `pop`/`extract_min` or `delete`.
pub trait Handle: Clone + PartialEq + Eq {}

/// Base trait for heap/priority queue data structures
///
/// These heaps store (priority, item) pairs and are min-heaps, unlike
/// `std::collections::BinaryHeap`.
///
/// # Example
///
/// ```rust
/// use fib_heap_engine::Heap;
/// use fib_heap_engine::simple_binary::SimpleBinaryHeap;
///
/// let mut heap = SimpleBinaryHeap::new();
/// heap.push(3, "three");
/// heap.push(1, "one");
/// heap.push(2, "two");
///
/// assert_eq!(heap.peek(), Some((&1, &"one")));
/// assert_eq!(heap.pop(), Some((1, "one")));
/// ```
pub trait Heap<T, P: Ord> {
    /// Creates a new empty heap
    fn new() -> Self;

    /// Returns true if the heap is empty
    fn is_empty(&self) -> bool;

    /// Returns the number of elements in the heap
    fn len(&self) -> usize;

    /// Inserts an element with the given priority
    fn push(&mut self, priority: P, item: T);

    /// Returns the minimum priority and associated item without removing it
    ///
    /// # Time Complexity
    /// O(1) for all implementations
    fn peek(&self) -> Option<(&P, &T)>;

    /// Removes and returns the minimum priority and associated item
    fn pop(&mut self) -> Option<(P, T)>;
}

/// Heaps that can absorb another heap of the same type
pub trait MergeableHeap<T, P: Ord>: Heap<T, P> {
    /// Merges another heap into this one, consuming the other heap
    ///
    /// # Time Complexity
    /// Varies by implementation: O(n log n) for the binary baseline. The
    /// Fibonacci heap splices root rings in O(1) and merges arena tables
    /// without moving nodes, so handles from both sides stay valid.
    fn merge(&mut self, other: Self);
}

/// Extended heap trait with `decrease_key` and `delete` support
///
/// # Example
///
/// ```rust
/// use fib_heap_engine::{DecreaseKeyHeap, Heap};
/// use fib_heap_engine::fibonacci::FibonacciHeap;
///
/// let mut heap = FibonacciHeap::new();
/// let handle = heap.push_with_handle(10, "item");
/// heap.decrease_key(&handle, 5).unwrap();
/// assert_eq!(heap.peek(), Some((&5, &"item")));
/// ```
pub trait DecreaseKeyHeap<T, P: Ord>: Heap<T, P> {
    /// The handle type for this heap
    type Handle: Handle;

    /// Inserts an element with the given priority, returning a handle
    fn push_with_handle(&mut self, priority: P, item: T) -> Self::Handle;

    /// Lowers the priority of the element identified by the handle
    ///
    /// # Errors
    /// - [`HeapError::InvalidArgument`] if `new_priority` is greater than the
    ///   current priority. The heap is left untouched.
    /// - [`HeapError::StaleHandle`] if the element is no longer in this heap.
    fn decrease_key(&mut self, handle: &Self::Handle, new_priority: P) -> Result<(), HeapError>;

    /// Removes the element identified by the handle and returns it
    ///
    /// # Errors
    /// [`HeapError::StaleHandle`] if the element is no longer in this heap.
    fn delete(&mut self, handle: &Self::Handle) -> Result<(P, T), HeapError>;
}
