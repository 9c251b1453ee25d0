//! Simple Binary Heap baseline
//!
//! An array-backed binary min-heap that only implements [`Heap`] and
//! [`MergeableHeap`]. It has no `decrease_key`: the lazy Dijkstra driver in
//! [`crate::pathfinding`] pushes a fresh entry on every relaxation and skips
//! stale ones when they are popped. It is the reference point the
//! [`FibonacciHeap`](crate::fibonacci::FibonacciHeap) is compared against.
//!
//! # Time Complexity
//!
//! | Operation | Complexity   |
//! |-----------|--------------|
//! | `push`    | O(log n)     |
//! | `pop`     | O(log n)     |
//! | `peek`    | O(1)         |
//! | `merge`   | O(n + m)     |
//!
//! # Example
//!
//! ```rust
//! use fib_heap_engine::Heap;
//! use fib_heap_engine::simple_binary::SimpleBinaryHeap;
//!
//! let mut heap = SimpleBinaryHeap::new();
//! heap.push(3, "three");
//! heap.push(1, "one");
//! heap.push(2, "two");
//!
//! assert_eq!(heap.pop(), Some((1, "one")));
//! assert_eq!(heap.pop(), Some((2, "two")));
//! assert_eq!(heap.pop(), Some((3, "three")));
//! assert_eq!(heap.pop(), None);
//! ```

use crate::traits::{Heap, MergeableHeap};

/// A simple binary min-heap of (priority, item) pairs
#[derive(Debug, Clone)]
pub struct SimpleBinaryHeap<T, P: Ord> {
    data: Vec<(P, T)>,
}

impl<T, P: Ord> SimpleBinaryHeap<T, P> {
    /// Creates an empty heap with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Builds a heap from arbitrary pairs in O(n)
    pub fn from_vec(data: Vec<(P, T)>) -> Self {
        let mut heap = Self { data };
        heap.heapify();
        heap
    }

    /// Consumes the heap, returning its entries in ascending priority order
    pub fn into_sorted_vec(mut self) -> Vec<(P, T)> {
        let mut sorted = Vec::with_capacity(self.data.len());
        while let Some(entry) = self.pop() {
            sorted.push(entry);
        }
        sorted
    }

    #[inline]
    fn less(&self, a: usize, b: usize) -> bool {
        self.data[a].0 < self.data[b].0
    }

    /// Bottom-up heap construction
    fn heapify(&mut self) {
        for index in (0..self.data.len() / 2).rev() {
            self.sift_down(index);
        }
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if !self.less(index, parent) {
                break;
            }
            self.data.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.data.len();
        loop {
            let left = 2 * index + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let smaller = if right < len && self.less(right, left) {
                right
            } else {
                left
            };
            if !self.less(smaller, index) {
                break;
            }
            self.data.swap(index, smaller);
            index = smaller;
        }
    }
}

impl<T, P: Ord> Heap<T, P> for SimpleBinaryHeap<T, P> {
    fn new() -> Self {
        Self { data: Vec::new() }
    }

    fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn push(&mut self, priority: P, item: T) {
        self.data.push((priority, item));
        self.sift_up(self.data.len() - 1);
    }

    fn peek(&self) -> Option<(&P, &T)> {
        self.data.first().map(|(p, t)| (p, t))
    }

    fn pop(&mut self) -> Option<(P, T)> {
        if self.data.is_empty() {
            return None;
        }
        let last = self.data.len() - 1;
        self.data.swap(0, last);
        let top = self.data.pop();
        self.sift_down(0);
        top
    }
}

impl<T, P: Ord> MergeableHeap<T, P> for SimpleBinaryHeap<T, P> {
    fn merge(&mut self, other: Self) {
        self.data.extend(other.data);
        self.heapify();
    }
}

impl<T, P: Ord> Default for SimpleBinaryHeap<T, P> {
    fn default() -> Self {
        Self::new()
    }
}
