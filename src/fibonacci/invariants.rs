//! Full structural check of a Fibonacci heap.
//!
//! Operations only guard local facts with `debug_assert!`; this walks the
//! whole forest and is meant for tests and debugging.

use super::{Arena, FibonacciHeap};
use crate::storage::NodeRef;
use thiserror::Error;

/// The first broken invariant found by [`FibonacciHeap::check_invariants`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("min is {0} but the heap is {1}")]
    MinPresence(&'static str, &'static str),
    #[error("min does not point at a root")]
    MinNotRoot,
    #[error("a root has a smaller key than min")]
    MinNotMinimal,
    #[error("a child has a smaller key than its parent")]
    HeapOrder,
    #[error("node records degree {recorded} but has {actual} children")]
    DegreeMismatch { recorded: usize, actual: usize },
    #[error("a root is marked")]
    MarkedRoot,
    #[error("ring links are not symmetric or point at freed nodes")]
    BrokenRing,
    #[error("a node's parent does not own the ring it sits in")]
    WrongParent,
    #[error("len is {len} but {reachable} nodes are reachable and {stored} are stored")]
    LenMismatch {
        len: usize,
        reachable: usize,
        stored: usize,
    },
}

impl<T, K: Ord> FibonacciHeap<T, K> {
    /// Verifies every structural invariant of the heap
    ///
    /// Checks ring symmetry, parent pointers, degree counts, heap order,
    /// unmarked roots, the position of `min`, and that `len` matches both
    /// the reachable and the stored node counts. O(n).
    ///
    /// ```rust
    /// use fib_heap_engine::fibonacci::FibonacciHeap;
    ///
    /// let mut heap: FibonacciHeap<(), u32> = (0..50).map(|k| (k, ())).collect();
    /// heap.extract_min();
    /// assert!(heap.check_invariants().is_ok());
    /// ```
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let Some(min) = self.min else {
            return match (self.len, self.arena.len()) {
                (0, 0) => Ok(()),
                _ => Err(InvariantViolation::MinPresence("absent", "non-empty")),
            };
        };
        if self.len == 0 {
            return Err(InvariantViolation::MinPresence("present", "empty"));
        }
        if !self.arena.contains(min) {
            return Err(InvariantViolation::BrokenRing);
        }
        if self.arena[min].parent.is_some() {
            return Err(InvariantViolation::MinNotRoot);
        }

        let limit = self.arena.len();
        let mut reachable = 0usize;
        let mut pending: Vec<(NodeRef, Option<NodeRef>)> = vec![(min, None)];

        while let Some((anchor, parent)) = pending.pop() {
            let members = bounded_ring(&self.arena, anchor, limit)?;

            if let Some(p) = parent {
                let recorded = usize::from(self.arena[p].degree);
                if recorded != members.len() {
                    return Err(InvariantViolation::DegreeMismatch {
                        recorded,
                        actual: members.len(),
                    });
                }
            }

            for node_key in members {
                let node = &self.arena[node_key];
                if node.parent != parent {
                    return Err(InvariantViolation::WrongParent);
                }
                match parent {
                    None => {
                        if node.mark {
                            return Err(InvariantViolation::MarkedRoot);
                        }
                        if node.key < self.arena[min].key {
                            return Err(InvariantViolation::MinNotMinimal);
                        }
                    }
                    Some(p) => {
                        if node.key < self.arena[p].key {
                            return Err(InvariantViolation::HeapOrder);
                        }
                    }
                }
                match node.child {
                    Some(child) => pending.push((child, Some(node_key))),
                    None if node.degree != 0 => {
                        return Err(InvariantViolation::DegreeMismatch {
                            recorded: usize::from(node.degree),
                            actual: 0,
                        })
                    }
                    None => {}
                }
                reachable += 1;
            }

            if reachable > limit {
                return Err(InvariantViolation::BrokenRing);
            }
        }

        if reachable != self.len || self.arena.len() != self.len {
            return Err(InvariantViolation::LenMismatch {
                len: self.len,
                reachable,
                stored: self.arena.len(),
            });
        }

        Ok(())
    }
}

/// Ring walk that refuses to loop forever on a corrupted ring.
fn bounded_ring<T, K>(
    arena: &Arena<T, K>,
    anchor: NodeRef,
    limit: usize,
) -> Result<Vec<NodeRef>, InvariantViolation> {
    let mut members = Vec::new();
    let mut current = anchor;
    loop {
        let node = arena.get(current).ok_or(InvariantViolation::BrokenRing)?;
        let right = arena.get(node.right).ok_or(InvariantViolation::BrokenRing)?;
        if right.left != current {
            return Err(InvariantViolation::BrokenRing);
        }
        members.push(current);
        if members.len() > limit {
            return Err(InvariantViolation::BrokenRing);
        }
        current = node.right;
        if current == anchor {
            return Ok(members);
        }
    }
}
