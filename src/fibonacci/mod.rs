//! Fibonacci Heap implementation
//!
//! A Fibonacci heap is a data structure for priority queue operations with:
//! - O(1) insert and find-min
//! - O(1) amortized decrease_key
//! - O(log n) amortized extract_min and delete
//!
//! The structure is a forest of heap-ordered trees. Roots are linked in a
//! circular doubly linked list (the root ring), and the children of every node
//! form a ring of their own. Work is deferred: insert and union only splice
//! rings, and the forest is tidied up by consolidation when the minimum is
//! extracted. Decrease-key cuts a violating node loose and uses per-node marks
//! to cut ancestors that have lost two children, which keeps tree sizes
//! exponential in their degree.
//!
//! # Storage
//!
//! Nodes live in an [`ArenaSet`]. Every structural link is a generational
//! [`NodeRef`], so the rings never own anything and a handle to a removed
//! node is detected as [`HeapError::StaleHandle`] instead of touching freed
//! memory. Union hands the other heap's arenas over without moving a node,
//! so handles from both inputs keep working on the result.
//!
//! # Time Complexity
//!
//! | Operation      | Complexity                              |
//! |----------------|-----------------------------------------|
//! | `insert`       | O(1) worst-case                         |
//! | `minimum`      | O(1) worst-case                         |
//! | `extract_min`  | O(log n) amortized                      |
//! | `decrease_key` | O(1) amortized                          |
//! | `delete`       | O(log n) amortized                      |
//! | `union`        | O(1) splice + arena table merge         |
//!
//! # Example
//!
//! ```rust
//! use fib_heap_engine::fibonacci::FibonacciHeap;
//!
//! let mut heap = FibonacciHeap::new();
//! let a = heap.insert(7, "a");
//! heap.insert(3, "b");
//! let c = heap.insert(17, "c");
//!
//! assert_eq!(heap.minimum(), Some((&3, &"b")));
//! assert_eq!(heap.extract_min().map(|e| e.key), Some(3));
//!
//! heap.decrease_key(&c, 1).unwrap();
//! assert_eq!(heap.minimum(), Some((&1, &"c")));
//!
//! heap.delete(&c).unwrap();
//! assert_eq!(heap.minimum(), Some((&7, &"a")));
//! assert!(heap.contains(&a));
//! ```

mod consolidate;
mod cut;
mod invariants;
mod ring;

pub use invariants::InvariantViolation;

use crate::degree::Degree;
use crate::storage::{ArenaSet, NodeRef};
use crate::traits::{DecreaseKeyHeap, Handle, Heap, HeapError, MergeableHeap};
use std::fmt;
use tracing::trace;

/// Handle to an element in a Fibonacci heap
///
/// Valid until the element is extracted or deleted, including after its heap
/// is merged into another one. A removed element, or a handle presented to a
/// heap that never held it, reports [`HeapError::StaleHandle`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FibHandle {
    node: NodeRef,
}

impl Handle for FibHandle {}

/// An element removed from the heap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<T, K> {
    pub key: K,
    pub payload: T,
}

impl<T, K> Entry<T, K> {
    /// Splits the entry into `(key, payload)`
    pub fn into_pair(self) -> (K, T) {
        (self.key, self.payload)
    }
}

/// Counters for the structural work done by the heap
///
/// `links` is the quantity the amortized analysis of extract_min charges
/// against, so it is the natural thing to measure when checking the bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStats {
    /// Trees linked under another root during consolidation
    pub links: u64,
    /// Nodes cut from their parent (including cascading cuts)
    pub cuts: u64,
    /// Cuts triggered by a marked ancestor
    pub cascading_cuts: u64,
    /// Consolidation passes
    pub consolidations: u64,
    /// Roots walked by consolidation, summed over all passes
    pub roots_scanned: u64,
}

impl LinkStats {
    fn absorb(&mut self, other: LinkStats) {
        self.links += other.links;
        self.cuts += other.cuts;
        self.cascading_cuts += other.cascading_cuts;
        self.consolidations += other.consolidations;
        self.roots_scanned += other.roots_scanned;
    }
}

struct Node<T, K> {
    key: K,
    payload: T,
    degree: Degree,
    mark: bool,
    parent: Option<NodeRef>,
    child: Option<NodeRef>,
    left: NodeRef,
    right: NodeRef,
}

impl<T, K> Node<T, K> {
    fn singleton(me: NodeRef, key: K, payload: T) -> Self {
        Node {
            key,
            payload,
            degree: 0,
            mark: false,
            parent: None,
            child: None,
            left: me,
            right: me,
        }
    }

    fn into_entry(self) -> Entry<T, K> {
        Entry {
            key: self.key,
            payload: self.payload,
        }
    }
}

type Arena<T, K> = ArenaSet<Node<T, K>>;

/// Fibonacci Heap
///
/// `T` is the payload type and `K` the key type.
///
/// # Example
///
/// ```rust
/// use fib_heap_engine::fibonacci::FibonacciHeap;
///
/// let mut heap = FibonacciHeap::new();
/// let handle = heap.insert(5, "item");
/// heap.decrease_key(&handle, 1).unwrap();
/// assert_eq!(heap.minimum(), Some((&1, &"item")));
/// ```
pub struct FibonacciHeap<T, K: Ord> {
    arena: Arena<T, K>,
    min: Option<NodeRef>,
    len: usize,
    stats: LinkStats,
}

impl<T, K: Ord> FibonacciHeap<T, K> {
    /// Creates an empty heap
    pub fn new() -> Self {
        Self::with_arena(ArenaSet::new())
    }

    /// Creates an empty heap with room for `capacity` elements
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_arena(ArenaSet::with_capacity(capacity))
    }

    fn with_arena(arena: Arena<T, K>) -> Self {
        Self {
            arena,
            min: None,
            len: 0,
            stats: LinkStats::default(),
        }
    }

    /// Returns true if the heap holds no elements
    pub fn is_empty(&self) -> bool {
        self.min.is_none()
    }

    /// Number of elements in the heap
    pub fn len(&self) -> usize {
        self.len
    }

    /// Structural work done so far
    pub fn stats(&self) -> LinkStats {
        self.stats
    }

    /// Zeroes the work counters
    pub fn reset_stats(&mut self) {
        self.stats = LinkStats::default();
    }

    /// Inserts an element, returning a handle for decrease_key and delete
    ///
    /// # Time Complexity
    /// O(1) worst-case
    pub fn insert(&mut self, key: K, payload: T) -> FibHandle {
        let node = self
            .arena
            .insert_with_ref(|me| Node::singleton(me, key, payload));
        ring::insert_into_ring(&mut self.arena, self.min, node);

        match self.min {
            Some(min) if self.arena[min].key <= self.arena[node].key => {}
            _ => self.min = Some(node),
        }

        self.len += 1;
        FibHandle { node }
    }

    /// Returns the minimum key and its payload
    pub fn minimum(&self) -> Option<(&K, &T)> {
        self.min.map(|min| {
            let node = &self.arena[min];
            (&node.key, &node.payload)
        })
    }

    /// Returns a handle to the current minimum
    pub fn min_handle(&self) -> Option<FibHandle> {
        self.min.map(|node| FibHandle { node })
    }

    /// True if the handle names a live element of this heap
    pub fn contains(&self, handle: &FibHandle) -> bool {
        self.resolve(handle).is_ok()
    }

    /// Key of the element named by the handle
    pub fn key_of(&self, handle: &FibHandle) -> Result<&K, HeapError> {
        let node = self.resolve(handle)?;
        Ok(&self.arena[node].key)
    }

    /// Payload of the element named by the handle
    pub fn payload_of(&self, handle: &FibHandle) -> Result<&T, HeapError> {
        let node = self.resolve(handle)?;
        Ok(&self.arena[node].payload)
    }

    /// Removes and returns the element with the minimum key
    ///
    /// Children of the removed root are promoted to the root ring and the
    /// ring is consolidated so that no two roots share a degree.
    ///
    /// # Time Complexity
    /// O(log n) amortized
    pub fn extract_min(&mut self) -> Option<Entry<T, K>> {
        let z = self.min?;

        self.promote_children(z);

        let successor = self.arena[z].right;
        ring::remove_from_ring(&mut self.arena, z);
        self.min = (successor != z).then_some(successor);
        self.len -= 1;

        let node = self.arena.remove(z)?;

        if let Some(start) = self.min {
            self.consolidate(start);
        }

        Some(node.into_entry())
    }

    /// Lowers the key of the element named by the handle
    ///
    /// An equal key is accepted and leaves the structure unchanged.
    ///
    /// # Errors
    /// - [`HeapError::StaleHandle`] if the element is gone or the handle is
    ///   from another heap
    /// - [`HeapError::InvalidArgument`] if `new_key` is greater than the
    ///   current key; nothing is modified
    ///
    /// # Time Complexity
    /// O(1) amortized
    pub fn decrease_key(&mut self, handle: &FibHandle, new_key: K) -> Result<(), HeapError> {
        let x = self.resolve(handle)?;
        if new_key > self.arena[x].key {
            return Err(HeapError::InvalidArgument);
        }

        self.arena[x].key = new_key;

        if let Some(y) = self.arena[x].parent {
            if self.arena[x].key < self.arena[y].key {
                self.cut(x, y);
                self.cascading_cut(y);
            }
        }

        match self.min {
            Some(min) if self.arena[min].key <= self.arena[x].key => {}
            _ => self.min = Some(x),
        }

        Ok(())
    }

    /// Removes the element named by the handle and returns it
    ///
    /// The node is cut from its parent exactly as decrease_key would do,
    /// then treated as the minimum and extracted. No key comparison is
    /// involved, so no "minus infinity" key is needed.
    ///
    /// # Time Complexity
    /// O(log n) amortized
    pub fn delete(&mut self, handle: &FibHandle) -> Result<Entry<T, K>, HeapError> {
        let x = self.resolve(handle)?;

        if let Some(y) = self.arena[x].parent {
            self.cut(x, y);
            self.cascading_cut(y);
        }

        self.min = Some(x);
        self.extract_min().ok_or(HeapError::StaleHandle)
    }

    /// Combines two heaps into one, consuming both
    ///
    /// The root rings are spliced together in O(1) and `a` takes over the
    /// arenas of `b` without moving any node. Handles issued by either input
    /// stay valid on the result.
    ///
    /// ```rust
    /// use fib_heap_engine::fibonacci::FibonacciHeap;
    ///
    /// let mut a = FibonacciHeap::new();
    /// let five = a.insert(5, "a");
    /// a.insert(10, "b");
    /// let mut b = FibonacciHeap::new();
    /// let three = b.insert(3, "c");
    ///
    /// let mut heap = FibonacciHeap::union(a, b);
    /// assert_eq!(heap.len(), 3);
    /// assert_eq!(heap.minimum(), Some((&3, &"c")));
    ///
    /// heap.decrease_key(&five, 1).unwrap();
    /// assert!(heap.contains(&three));
    /// assert_eq!(heap.minimum(), Some((&1, &"a")));
    /// ```
    pub fn union(mut a: Self, b: Self) -> Self {
        a.absorb(b);
        a
    }

    /// Removes every element
    ///
    /// Outstanding handles become stale.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.min = None;
        self.len = 0;
    }

    fn resolve(&self, handle: &FibHandle) -> Result<NodeRef, HeapError> {
        if self.arena.contains(handle.node) {
            Ok(handle.node)
        } else {
            Err(HeapError::StaleHandle)
        }
    }

    /// Moves every child of `z` to the root ring
    fn promote_children(&mut self, z: NodeRef) {
        let Some(child) = self.arena[z].child.take() else {
            return;
        };

        for c in ring::ring_members(&self.arena, child) {
            let node = &mut self.arena[c];
            node.parent = None;
            node.mark = false;
            ring::remove_from_ring(&mut self.arena, c);
            ring::insert_into_ring(&mut self.arena, Some(z), c);
        }

        self.arena[z].degree = 0;
    }

    /// Takes over `other`'s arenas and splices the root rings
    fn absorb(&mut self, other: Self) {
        let FibonacciHeap {
            arena,
            min: other_min,
            len,
            stats,
        } = other;

        trace!(
            host_len = self.len,
            guest_len = len,
            guest_arenas = arena.arena_count(),
            "absorbing heap"
        );

        self.stats.absorb(stats);
        self.arena.absorb(arena);
        let Some(other_min) = other_min else {
            return;
        };

        match self.min {
            None => self.min = Some(other_min),
            Some(min) => {
                ring::splice_rings(&mut self.arena, min, other_min);
                if self.arena[other_min].key < self.arena[min].key {
                    self.min = Some(other_min);
                }
            }
        }

        self.len += len;
    }
}

impl<T, K: Ord> Default for FibonacciHeap<T, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, K: Ord + fmt::Debug> fmt::Debug for FibonacciHeap<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let roots = self
            .min
            .map_or(0, |min| ring::ring_members(&self.arena, min).len());
        f.debug_struct("FibonacciHeap")
            .field("len", &self.len)
            .field("roots", &roots)
            .field("min", &self.minimum().map(|(key, _)| key))
            .field("stats", &self.stats)
            .finish()
    }
}

impl<T, K: Ord> Extend<(K, T)> for FibonacciHeap<T, K> {
    fn extend<I: IntoIterator<Item = (K, T)>>(&mut self, iter: I) {
        for (key, payload) in iter {
            self.insert(key, payload);
        }
    }
}

impl<T, K: Ord> FromIterator<(K, T)> for FibonacciHeap<T, K> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut heap = Self::new();
        heap.extend(iter);
        heap
    }
}

impl<T, K: Ord> Heap<T, K> for FibonacciHeap<T, K> {
    fn new() -> Self {
        Self::new()
    }

    fn is_empty(&self) -> bool {
        self.is_empty()
    }

    fn len(&self) -> usize {
        self.len
    }

    fn push(&mut self, priority: K, item: T) {
        self.insert(priority, item);
    }

    fn peek(&self) -> Option<(&K, &T)> {
        self.minimum()
    }

    fn pop(&mut self) -> Option<(K, T)> {
        self.extract_min().map(Entry::into_pair)
    }
}

impl<T, K: Ord> MergeableHeap<T, K> for FibonacciHeap<T, K> {
    fn merge(&mut self, other: Self) {
        self.absorb(other);
    }
}

impl<T, K: Ord> DecreaseKeyHeap<T, K> for FibonacciHeap<T, K> {
    type Handle = FibHandle;

    fn push_with_handle(&mut self, priority: K, item: T) -> FibHandle {
        self.insert(priority, item)
    }

    fn decrease_key(&mut self, handle: &FibHandle, new_priority: K) -> Result<(), HeapError> {
        FibonacciHeap::decrease_key(self, handle, new_priority)
    }

    fn delete(&mut self, handle: &FibHandle) -> Result<(K, T), HeapError> {
        FibonacciHeap::delete(self, handle).map(Entry::into_pair)
    }
}
