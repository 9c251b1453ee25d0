//! Arena storage for heap nodes
//!
//! Nodes live in a [`NodeArena`] backed by `slotmap` and are addressed by
//! generational [`NodeKey`]s. A heap owns an [`ArenaSet`]: its own home arena
//! plus the arenas of every heap merged into it. Structural links
//! (`parent`, `child`, sibling ring pointers) are [`NodeRef`]s naming the
//! arena and the slot, so the set is the only owner of node storage and the
//! ring topology never forms an ownership cycle.
//!
//! # Characteristics
//! - Contiguous memory allocation (better cache locality than boxed nodes)
//! - Generational keys: a key to a removed slot never resolves again, even
//!   after the slot is reused
//! - Merging two sets moves arena table entries, never nodes, so a
//!   [`NodeRef`] stays valid across merges
//! - Requires explicit removal (no automatic cleanup)
//!
//! # Example
//!
//! ```rust
//! use fib_heap_engine::storage::NodeArena;
//!
//! let mut arena: NodeArena<i32> = NodeArena::new();
//! let key = arena.insert(42);
//! assert_eq!(arena.get(key), Some(&42));
//!
//! assert_eq!(arena.remove(key), Some(42));
//! assert!(!arena.contains(key));
//! ```

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use std::ops::{Index, IndexMut};
use std::sync::atomic::{AtomicU64, Ordering};

new_key_type! {
    /// Generational index of a node in a [`NodeArena`]
    pub struct NodeKey;
}

/// SlotMap-based node arena
#[derive(Debug, Clone)]
pub struct NodeArena<N> {
    nodes: SlotMap<NodeKey, N>,
}

impl<N> Default for NodeArena<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> NodeArena<N> {
    /// Creates an empty arena
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
        }
    }

    /// Creates an empty arena with room for `capacity` nodes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: SlotMap::with_capacity_and_key(capacity),
        }
    }

    /// Stores a node, returning its key
    pub fn insert(&mut self, node: N) -> NodeKey {
        self.nodes.insert(node)
    }

    /// Stores a node built from its own key
    ///
    /// Used for nodes that must point at themselves on creation, like a
    /// singleton ring.
    pub fn insert_with_key(&mut self, build: impl FnOnce(NodeKey) -> N) -> NodeKey {
        self.nodes.insert_with_key(build)
    }

    /// Removes a node, returning it if the key was live
    pub fn remove(&mut self, key: NodeKey) -> Option<N> {
        self.nodes.remove(key)
    }

    /// Returns the node if the key is live
    pub fn get(&self, key: NodeKey) -> Option<&N> {
        self.nodes.get(key)
    }

    /// Returns the node mutably if the key is live
    pub fn get_mut(&mut self, key: NodeKey) -> Option<&mut N> {
        self.nodes.get_mut(key)
    }

    /// True if the key refers to a live node
    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if no nodes are stored
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Removes every node
    ///
    /// Outstanding keys stay invalid afterwards because slot generations
    /// are bumped.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}

impl<N> Index<NodeKey> for NodeArena<N> {
    type Output = N;

    #[inline]
    fn index(&self, key: NodeKey) -> &N {
        &self.nodes[key]
    }
}

impl<N> IndexMut<NodeKey> for NodeArena<N> {
    #[inline]
    fn index_mut(&mut self, key: NodeKey) -> &mut N {
        &mut self.nodes[key]
    }
}

/// Process-unique identity of an arena
///
/// Never reused, so a reference into an arena that was dropped, or that
/// belongs to an unrelated set, is always detected.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ArenaId(u64);

impl ArenaId {
    fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        ArenaId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Location of a node: the arena it was created in and its slot there
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeRef {
    arena: ArenaId,
    key: NodeKey,
}

/// A home arena plus the arenas adopted through [`absorb`](Self::absorb)
///
/// New nodes always go to the home arena. Adopted ("guest") arenas only
/// shrink, and are dropped as soon as they are empty.
///
/// ```rust
/// use fib_heap_engine::storage::ArenaSet;
///
/// let mut a = ArenaSet::new();
/// let x = a.insert("x");
/// let mut b = ArenaSet::new();
/// let y = b.insert("y");
///
/// a.absorb(b);
/// assert_eq!(a[x], "x");
/// assert_eq!(a[y], "y");
/// assert_eq!(a.len(), 2);
/// ```
#[derive(Debug)]
pub struct ArenaSet<N> {
    home_id: ArenaId,
    home: NodeArena<N>,
    guests: FxHashMap<ArenaId, NodeArena<N>>,
    live: usize,
}

impl<N> Default for ArenaSet<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> ArenaSet<N> {
    /// Creates a set holding one empty home arena
    pub fn new() -> Self {
        Self::with_home(NodeArena::new())
    }

    /// Creates a set whose home arena has room for `capacity` nodes
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_home(NodeArena::with_capacity(capacity))
    }

    fn with_home(home: NodeArena<N>) -> Self {
        Self {
            home_id: ArenaId::fresh(),
            home,
            guests: FxHashMap::default(),
            live: 0,
        }
    }

    /// Stores a node in the home arena
    pub fn insert(&mut self, node: N) -> NodeRef {
        self.insert_with_ref(|_| node)
    }

    /// Stores a node built from its own reference
    ///
    /// Used for nodes that must point at themselves on creation, like a
    /// singleton ring.
    pub fn insert_with_ref(&mut self, build: impl FnOnce(NodeRef) -> N) -> NodeRef {
        let arena = self.home_id;
        let key = self
            .home
            .insert_with_key(|key| build(NodeRef { arena, key }));
        self.live += 1;
        NodeRef { arena, key }
    }

    /// Removes a node, returning it if the reference was live
    ///
    /// A guest arena left empty is dropped.
    pub fn remove(&mut self, node: NodeRef) -> Option<N> {
        let removed = if node.arena == self.home_id {
            self.home.remove(node.key)
        } else {
            let guest = self.guests.get_mut(&node.arena)?;
            let removed = guest.remove(node.key);
            if guest.is_empty() {
                self.guests.remove(&node.arena);
            }
            removed
        };
        if removed.is_some() {
            self.live -= 1;
        }
        removed
    }

    #[inline]
    fn arena(&self, id: ArenaId) -> Option<&NodeArena<N>> {
        if id == self.home_id {
            Some(&self.home)
        } else {
            self.guests.get(&id)
        }
    }

    #[inline]
    fn arena_mut(&mut self, id: ArenaId) -> Option<&mut NodeArena<N>> {
        if id == self.home_id {
            Some(&mut self.home)
        } else {
            self.guests.get_mut(&id)
        }
    }

    /// Returns the node if the reference is live
    pub fn get(&self, node: NodeRef) -> Option<&N> {
        self.arena(node.arena)?.get(node.key)
    }

    /// Returns the node mutably if the reference is live
    pub fn get_mut(&mut self, node: NodeRef) -> Option<&mut N> {
        self.arena_mut(node.arena)?.get_mut(node.key)
    }

    /// True if the reference names a live node of this set
    pub fn contains(&self, node: NodeRef) -> bool {
        self.arena(node.arena)
            .is_some_and(|arena| arena.contains(node.key))
    }

    /// Number of live nodes across all arenas
    pub fn len(&self) -> usize {
        self.live
    }

    /// True if no nodes are stored
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of arenas held, home included
    pub fn arena_count(&self) -> usize {
        1 + self.guests.len()
    }

    /// Removes every node and drops all guest arenas
    pub fn clear(&mut self) {
        self.home.clear();
        self.guests.clear();
        self.live = 0;
    }

    /// Takes ownership of every arena in `other`
    ///
    /// No node moves and every [`NodeRef`] into either set stays valid.
    /// The smaller guest table is merged into the larger one, so the work is
    /// proportional to the number of arenas on the smaller side and never
    /// to the number of nodes.
    pub fn absorb(&mut self, other: ArenaSet<N>) {
        let ArenaSet {
            home_id,
            home,
            mut guests,
            live,
        } = other;

        if guests.len() > self.guests.len() {
            std::mem::swap(&mut self.guests, &mut guests);
        }
        self.guests.extend(guests);
        if !home.is_empty() {
            self.guests.insert(home_id, home);
        }
        self.live += live;
    }
}

impl<N> Index<NodeRef> for ArenaSet<N> {
    type Output = N;

    #[inline]
    fn index(&self, node: NodeRef) -> &N {
        if node.arena == self.home_id {
            &self.home[node.key]
        } else {
            &self.guests[&node.arena][node.key]
        }
    }
}

impl<N> IndexMut<NodeRef> for ArenaSet<N> {
    #[inline]
    fn index_mut(&mut self, node: NodeRef) -> &mut N {
        match self.arena_mut(node.arena) {
            Some(arena) => &mut arena[node.key],
            None => panic!("node reference into an arena this set does not hold"),
        }
    }
}
