//! Circular doubly linked rings of sibling nodes.
//!
//! The root ring and every child ring share this protocol. These functions
//! are the only code that writes a node's `left`/`right` links; everything
//! else in the heap is expressed in terms of them.

use super::Arena;
use crate::storage::NodeRef;

/// Splices `node` into the ring anchored at `anchor`, just left of the
/// anchor. With no anchor, `node` becomes a singleton ring.
///
/// Returns an anchor for the resulting ring.
pub(super) fn insert_into_ring<T, K>(
    arena: &mut Arena<T, K>,
    anchor: Option<NodeRef>,
    node: NodeRef,
) -> NodeRef {
    let Some(anchor) = anchor else {
        let n = &mut arena[node];
        n.left = node;
        n.right = node;
        return node;
    };

    let left = arena[anchor].left;
    {
        let n = &mut arena[node];
        n.left = left;
        n.right = anchor;
    }
    arena[left].right = node;
    arena[anchor].left = node;
    anchor
}

/// Excises `node` from its ring and leaves it as a singleton.
///
/// Callers must repair any external anchor (a parent's `child`, the heap's
/// `min`) that pointed at `node`.
pub(super) fn remove_from_ring<T, K>(arena: &mut Arena<T, K>, node: NodeRef) {
    let (left, right) = (arena[node].left, arena[node].right);
    if right == node {
        return;
    }

    arena[left].right = right;
    arena[right].left = left;

    let n = &mut arena[node];
    n.left = node;
    n.right = node;
}

/// Concatenates two disjoint rings in O(1).
pub(super) fn splice_rings<T, K>(arena: &mut Arena<T, K>, a: NodeRef, b: NodeRef) {
    debug_assert_ne!(a, b, "cannot splice a ring with itself");

    let a_left = arena[a].left;
    let b_left = arena[b].left;

    arena[a_left].right = b;
    arena[b].left = a_left;
    arena[b_left].right = a;
    arena[a].left = b_left;
}

/// Snapshot of a ring's members, starting at `anchor` and walking right.
///
/// Take this before any walk that relinks the members.
pub(super) fn ring_members<T, K>(arena: &Arena<T, K>, anchor: NodeRef) -> Vec<NodeRef> {
    let mut members = vec![anchor];
    let mut current = arena[anchor].right;
    while current != anchor {
        members.push(current);
        current = arena[current].right;
    }
    members
}

#[cfg(test)]
mod tests {
    use super::super::Node;
    use super::*;

    fn alloc(arena: &mut Arena<(), i32>, key: i32) -> NodeRef {
        arena.insert_with_ref(|me| Node::singleton(me, key, ()))
    }

    fn keys(arena: &Arena<(), i32>, anchor: NodeRef) -> Vec<i32> {
        ring_members(arena, anchor)
            .into_iter()
            .map(|n| arena[n].key)
            .collect()
    }

    #[test]
    fn test_insert_builds_ring_in_order() {
        let mut arena = Arena::new();
        let a = alloc(&mut arena, 1);
        let b = alloc(&mut arena, 2);
        let c = alloc(&mut arena, 3);

        let anchor = insert_into_ring(&mut arena, None, a);
        assert_eq!(anchor, a);
        insert_into_ring(&mut arena, Some(anchor), b);
        insert_into_ring(&mut arena, Some(anchor), c);

        // New members go just left of the anchor, i.e. at the "end"
        assert_eq!(keys(&arena, a), vec![1, 2, 3]);
        assert_eq!(arena[a].left, c);
        assert_eq!(arena[c].right, a);
    }

    #[test]
    fn test_remove_leaves_singleton() {
        let mut arena = Arena::new();
        let a = alloc(&mut arena, 1);
        let b = alloc(&mut arena, 2);
        let c = alloc(&mut arena, 3);
        insert_into_ring(&mut arena, Some(a), b);
        insert_into_ring(&mut arena, Some(a), c);

        remove_from_ring(&mut arena, b);
        assert_eq!(keys(&arena, a), vec![1, 3]);
        assert_eq!(arena[b].left, b);
        assert_eq!(arena[b].right, b);

        // Removing from a singleton is a no-op
        remove_from_ring(&mut arena, b);
        assert_eq!(keys(&arena, b), vec![2]);
    }

    #[test]
    fn test_splice_concatenates() {
        let mut arena = Arena::new();
        let a = alloc(&mut arena, 1);
        let b = alloc(&mut arena, 2);
        let x = alloc(&mut arena, 10);
        let y = alloc(&mut arena, 20);
        insert_into_ring(&mut arena, Some(a), b);
        insert_into_ring(&mut arena, Some(x), y);

        splice_rings(&mut arena, a, x);
        assert_eq!(keys(&arena, a), vec![1, 2, 10, 20]);
        assert_eq!(keys(&arena, y), vec![20, 1, 2, 10]);
    }
}
