//! Cut and cascading cut, the structural repair behind decrease_key.

use super::{ring, FibonacciHeap};
use crate::degree::saturating_decrement;
use crate::storage::NodeRef;
use tracing::trace;

impl<T, K: Ord> FibonacciHeap<T, K> {
    /// Detaches `x` from its parent `y` and moves it to the root ring.
    pub(super) fn cut(&mut self, x: NodeRef, y: NodeRef) {
        debug_assert_eq!(self.arena[x].parent, Some(y));

        let sibling = self.arena[x].right;
        let parent = &mut self.arena[y];
        if parent.child == Some(x) {
            parent.child = (sibling != x).then_some(sibling);
        }
        debug_assert!(parent.degree > 0, "cut from a parent with no children");
        parent.degree = saturating_decrement(parent.degree);

        ring::remove_from_ring(&mut self.arena, x);
        let node = &mut self.arena[x];
        node.parent = None;
        node.mark = false;

        let anchor = ring::insert_into_ring(&mut self.arena, self.min, x);
        if self.min.is_none() {
            self.min = Some(anchor);
        }

        self.stats.cuts += 1;
    }

    /// Walks up from `y`, which just lost a child.
    ///
    /// An unmarked non-root gets marked and the walk stops. A marked one has
    /// now lost two children, so it is cut and the walk continues with its
    /// parent. Roots end the walk. Iterative so that long cascades do not
    /// grow the call stack.
    pub(super) fn cascading_cut(&mut self, mut y: NodeRef) {
        let mut cascade = 0u32;

        while let Some(z) = self.arena[y].parent {
            if !self.arena[y].mark {
                self.arena[y].mark = true;
                break;
            }
            self.cut(y, z);
            self.stats.cascading_cuts += 1;
            cascade += 1;
            y = z;
        }

        if cascade > 0 {
            trace!(cascade, "cascading cut");
        }
    }
}
