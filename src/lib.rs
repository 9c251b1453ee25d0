//! Fibonacci heap priority queue engine
//!
//! This crate provides a Fibonacci heap with efficient `decrease_key`, a
//! binary-heap baseline, and Dijkstra drivers that run either heap over the
//! same graph so the two can be compared.
//!
//! # Features
//!
//! - **Fibonacci Heap**: O(1) insert and find-min; O(1) amortized decrease_key;
//!   O(log n) amortized extract-min and delete; O(1) ring splice on union
//! - **Arena storage**: nodes live in a generational arena, so handles to
//!   removed elements are reported as stale instead of dangling
//! - **Binary Heap baseline**: O(log n) push and pop, no decrease_key
//! - **Shortest paths**: Dijkstra with decrease_key or with lazy re-insertion,
//!   returning distance and predecessor maps plus heap operation counts
//!
//! # Example
//!
//! ```rust
//! use fib_heap_engine::fibonacci::FibonacciHeap;
//! use fib_heap_engine::HeapError;
//!
//! let mut heap = FibonacciHeap::new();
//! let seven = heap.insert(7, "seven");
//! let three = heap.insert(3, "three");
//! assert_eq!(heap.minimum(), Some((&3, &"three")));
//!
//! heap.decrease_key(&seven, 1).unwrap();
//! assert_eq!(heap.minimum(), Some((&1, &"seven")));
//! assert_eq!(heap.decrease_key(&three, 10), Err(HeapError::InvalidArgument));
//! ```

pub mod degree;
pub mod fibonacci;
pub mod pathfinding;
pub mod simple_binary;
pub mod storage;
pub mod traits;

// Re-export the main traits for convenience
pub use traits::{DecreaseKeyHeap, Handle, Heap, HeapError, MergeableHeap};
