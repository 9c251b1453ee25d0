//! Consolidation: merging roots of equal degree after an extraction.

use super::{ring, FibonacciHeap};
use crate::degree::{self, checked_increment};
use crate::storage::NodeRef;
use smallvec::{smallvec, SmallVec};
use tracing::trace;

/// Degree table. Degrees stay below ~1.44·log₂(n), so 64 inline slots cover
/// any heap that fits in memory without spilling.
type DegreeTable = SmallVec<[Option<NodeRef>; 64]>;

impl<T, K: Ord> FibonacciHeap<T, K> {
    /// Links roots of equal degree until all root degrees are distinct, then
    /// points `min` at the smallest surviving root.
    ///
    /// `start` is any member of the root ring.
    pub(super) fn consolidate(&mut self, start: NodeRef) {
        self.stats.consolidations += 1;
        let links_before = self.stats.links;

        let roots = ring::ring_members(&self.arena, start);
        self.stats.roots_scanned += roots.len() as u64;
        let mut table: DegreeTable = smallvec![None; degree::initial_buckets(self.len)];

        for root in roots.iter().copied() {
            let mut x = root;
            loop {
                let d = degree::bucket_index(self.arena[x].degree);
                if d >= table.len() {
                    let grown = (d + 1).max(table.len() * 2);
                    table.resize(grown, None);
                }

                let Some(y) = table[d].take() else {
                    table[d] = Some(x);
                    break;
                };

                // Ties keep the root currently being walked as the parent
                let (parent, child) = if self.arena[y].key < self.arena[x].key {
                    (y, x)
                } else {
                    (x, y)
                };
                self.link(child, parent);
                x = parent;
            }
        }

        let mut min: Option<NodeRef> = None;
        for root in table.iter().flatten().copied() {
            match min {
                Some(m) if self.arena[m].key <= self.arena[root].key => {}
                _ => min = Some(root),
            }
        }
        self.min = min;

        debug_assert_eq!(
            min.map_or(0, |m| ring::ring_members(&self.arena, m).len()),
            table.iter().flatten().count(),
            "surviving roots must be exactly the degree table occupants"
        );

        trace!(
            roots_before = roots.len(),
            roots_after = table.iter().flatten().count(),
            links = self.stats.links - links_before,
            "consolidated root ring"
        );
    }

    /// Makes root `child` a child of root `parent`.
    pub(super) fn link(&mut self, child: NodeRef, parent: NodeRef) {
        debug_assert!(self.arena[child].parent.is_none());
        debug_assert!(self.arena[parent].parent.is_none());
        debug_assert_eq!(self.arena[child].degree, self.arena[parent].degree);

        ring::remove_from_ring(&mut self.arena, child);
        let siblings = self.arena[parent].child;
        let anchor = ring::insert_into_ring(&mut self.arena, siblings, child);

        let c = &mut self.arena[child];
        c.parent = Some(parent);
        c.mark = false;

        let p = &mut self.arena[parent];
        p.child = Some(anchor);
        p.degree = checked_increment(p.degree);

        self.stats.links += 1;
    }
}
