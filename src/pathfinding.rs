//! Dijkstra's shortest paths driven by the heaps in this crate
//!
//! Two drivers share one result type so that heaps can be compared on the
//! same graph:
//!
//! - [`dijkstra`] needs a [`DecreaseKeyHeap`]. Every vertex is inserted up
//!   front at [`Distance::Infinite`] (the source at zero), and each
//!   successful relaxation lowers the vertex's key in place.
//! - [`dijkstra_lazy`] works with any [`Heap`]. Only the source is inserted;
//!   a relaxation pushes a new entry and outdated entries are skipped when
//!   popped.
//!
//! Both report how many heap operations they used in [`OperationCounts`].
//!
//! # Design
//!
//! Only lightweight vertex indices are stored in the heap. A [`Graph`] maps
//! vertex labels to dense indices with an FxHash map, and the algorithms
//! work on plain vectors indexed by those.
//!
//! Edge weights must be non-negative. A path whose length would overflow the
//! cost type is treated as unreachable rather than wrapping.
//!
//! # Example
//!
//! ```rust
//! use fib_heap_engine::fibonacci::FibonacciHeap;
//! use fib_heap_engine::pathfinding::{dijkstra, Graph};
//!
//! let mut graph = Graph::new();
//! graph.add_edge('a', 'b', 4u32);
//! graph.add_edge('a', 'c', 1);
//! graph.add_edge('c', 'b', 2);
//!
//! let paths = dijkstra::<_, _, FibonacciHeap<_, _>>(&graph, &'a');
//! assert_eq!(paths.distance(&'b'), Some(3));
//! assert_eq!(paths.path_to(&'b'), Some(vec!['a', 'c', 'b']));
//! ```

use crate::traits::{DecreaseKeyHeap, Heap};
use rustc_hash::FxHashMap;
use std::hash::Hash;
use tracing::{debug, trace_span, warn};

/// Trait for types that can be used as edge weights and path lengths.
///
/// `Default` must be the zero of `checked_add`.
pub trait Cost: Ord + Copy + Default {
    /// `self + rhs`, or `None` if the sum does not fit
    fn checked_add(self, rhs: Self) -> Option<Self>;
}

macro_rules! impl_cost {
    ($($t:ty),*) => {
        $(
            impl Cost for $t {
                #[inline]
                fn checked_add(self, rhs: Self) -> Option<Self> {
                    <$t>::checked_add(self, rhs)
                }
            }
        )*
    };
}

impl_cost!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

/// Tentative distance of a vertex
///
/// `Infinite` orders after every finite distance, so "not reached yet" is a
/// real key and no numeric sentinel is needed for cost types like `u32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Distance<C> {
    Finite(C),
    Infinite,
}

impl<C> Distance<C> {
    /// The finite value, if any
    pub fn finite(self) -> Option<C> {
        match self {
            Distance::Finite(c) => Some(c),
            Distance::Infinite => None,
        }
    }
}

/// Dense vertex index used as the heap payload
pub type VertexIndex = usize;

/// Directed weighted graph stored as adjacency lists
///
/// Vertices keep their insertion order, which is also the order in which
/// [`dijkstra`] inserts them into the heap.
#[derive(Debug, Clone)]
pub struct Graph<V, C> {
    index: FxHashMap<V, VertexIndex>,
    labels: Vec<V>,
    adjacency: Vec<Vec<(VertexIndex, C)>>,
    edges: usize,
}

impl<V, C> Graph<V, C>
where
    V: Clone + Eq + Hash,
    C: Cost,
{
    /// Creates an empty graph
    pub fn new() -> Self {
        Graph {
            index: FxHashMap::default(),
            labels: Vec::new(),
            adjacency: Vec::new(),
            edges: 0,
        }
    }

    /// Adds a vertex, returning its index. Existing vertices keep theirs.
    pub fn add_vertex(&mut self, vertex: V) -> VertexIndex {
        if let Some(&index) = self.index.get(&vertex) {
            return index;
        }
        let index = self.labels.len();
        self.index.insert(vertex.clone(), index);
        self.labels.push(vertex);
        self.adjacency.push(Vec::new());
        index
    }

    /// Adds a directed edge, creating missing endpoints
    pub fn add_edge(&mut self, from: V, to: V, weight: C) {
        let from = self.add_vertex(from);
        let to = self.add_vertex(to);
        self.adjacency[from].push((to, weight));
        self.edges += 1;
    }

    /// Adds an edge in both directions
    pub fn add_undirected_edge(&mut self, a: V, b: V, weight: C) {
        self.add_edge(a.clone(), b.clone(), weight);
        self.add_edge(b, a, weight);
    }

    /// True if the vertex is in the graph
    pub fn contains(&self, vertex: &V) -> bool {
        self.index.contains_key(vertex)
    }

    /// Vertices in insertion order
    pub fn vertices(&self) -> impl Iterator<Item = &V> {
        self.labels.iter()
    }

    /// Outgoing edges of `vertex`; empty if the vertex is unknown
    pub fn neighbors<'g>(&'g self, vertex: &V) -> impl Iterator<Item = (&'g V, C)> + 'g {
        let edges: &'g [(VertexIndex, C)] = match self.index.get(vertex) {
            Some(&i) => &self.adjacency[i],
            None => &[],
        };
        edges.iter().map(move |&(to, w)| (&self.labels[to], w))
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.labels.len()
    }

    /// Number of directed edges (an undirected edge counts twice)
    pub fn edge_count(&self) -> usize {
        self.edges
    }
}

impl<V, C> Default for Graph<V, C>
where
    V: Clone + Eq + Hash,
    C: Cost,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Heap operations performed by one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperationCounts {
    /// Entries popped from the heap (stale ones included for the lazy driver)
    pub extract_min: usize,
    /// decrease_key calls (decrease-key driver)
    pub decrease_key: usize,
    /// Pushes made by relaxations (lazy driver)
    pub relax_insert: usize,
    /// Vertices whose distance became final
    pub settled: usize,
}

/// Result of a shortest-path run
#[derive(Debug, Clone)]
pub struct ShortestPaths<V, C> {
    /// Distance of every vertex that was settled; `None` for vertices that
    /// are unreachable or were not settled before an early exit
    pub distances: FxHashMap<V, Option<C>>,
    /// Predecessor on a shortest path; `None` for the source and for every
    /// vertex without a distance
    pub predecessors: FxHashMap<V, Option<V>>,
    pub counts: OperationCounts,
}

impl<V, C> ShortestPaths<V, C>
where
    V: Clone + Eq + Hash,
    C: Copy,
{
    /// Final distance to `vertex`, if it was settled
    pub fn distance(&self, vertex: &V) -> Option<C> {
        self.distances.get(vertex).copied().flatten()
    }

    /// Predecessor of `vertex` on its shortest path
    pub fn predecessor(&self, vertex: &V) -> Option<&V> {
        self.predecessors.get(vertex).and_then(Option::as_ref)
    }

    /// Vertices from the source to `target`, inclusive
    pub fn path_to(&self, target: &V) -> Option<Vec<V>> {
        self.distance(target)?;

        let mut path = vec![target.clone()];
        let mut current = target;
        while let Some(prev) = self.predecessor(current) {
            path.push(prev.clone());
            current = prev;
        }
        path.reverse();
        Some(path)
    }
}

/// Builder for shortest-path queries with early-exit options.
///
/// ```rust
/// use fib_heap_engine::fibonacci::FibonacciHeap;
/// use fib_heap_engine::pathfinding::{Graph, ShortestPathBuilder};
///
/// let mut graph = Graph::new();
/// for i in 0..10u32 {
///     graph.add_edge(i, i + 1, 1u64);
/// }
///
/// let paths = ShortestPathBuilder::new(&graph, 0)
///     .target(3)
///     .run::<FibonacciHeap<_, _>>();
/// assert_eq!(paths.distance(&3), Some(3));
/// assert_eq!(paths.counts.settled, 4);
/// ```
pub struct ShortestPathBuilder<'g, V, C> {
    graph: &'g Graph<V, C>,
    source: V,
    target: Option<V>,
    max_settled: Option<usize>,
}

impl<'g, V, C> ShortestPathBuilder<'g, V, C>
where
    V: Clone + Eq + Hash,
    C: Cost,
{
    /// Starts a query from `source`
    pub fn new(graph: &'g Graph<V, C>, source: V) -> Self {
        ShortestPathBuilder {
            graph,
            source,
            target: None,
            max_settled: None,
        }
    }

    /// Stops once `target`'s distance is final
    pub fn target(mut self, target: V) -> Self {
        self.target = Some(target);
        self
    }

    /// Stops after this many vertices have been settled
    pub fn max_settled(mut self, count: usize) -> Self {
        self.max_settled = Some(count);
        self
    }

    /// Runs with a decrease-key heap
    pub fn run<H>(self) -> ShortestPaths<V, C>
    where
        H: DecreaseKeyHeap<VertexIndex, Distance<C>>,
    {
        let limits = self.limits();
        let span = trace_span!("dijkstra", vertices = self.graph.vertex_count());
        let _enter = span.enter();

        let mut state = SearchState::new(self.graph.vertex_count());
        if let Some(source) = self.graph.index.get(&self.source).copied() {
            state.dist[source] = Distance::Finite(C::default());
            relax_with_decrease_key::<V, C, H>(self.graph, &mut state, limits);
        }

        debug!(
            extract_min = state.counts.extract_min,
            decrease_key = state.counts.decrease_key,
            settled = state.counts.settled,
            "dijkstra finished"
        );
        state.into_paths(self.graph)
    }

    /// Runs with any heap, re-inserting on relaxation
    pub fn run_lazy<H>(self) -> ShortestPaths<V, C>
    where
        H: Heap<VertexIndex, Distance<C>>,
    {
        let limits = self.limits();
        let span = trace_span!("dijkstra_lazy", vertices = self.graph.vertex_count());
        let _enter = span.enter();

        let mut state = SearchState::new(self.graph.vertex_count());
        if let Some(source) = self.graph.index.get(&self.source).copied() {
            state.dist[source] = Distance::Finite(C::default());
            relax_lazily::<V, C, H>(self.graph, &mut state, source, limits);
        }

        debug!(
            extract_min = state.counts.extract_min,
            relax_insert = state.counts.relax_insert,
            settled = state.counts.settled,
            "lazy dijkstra finished"
        );
        state.into_paths(self.graph)
    }

    fn limits(&self) -> Limits {
        Limits {
            target: self
                .target
                .as_ref()
                .and_then(|t| self.graph.index.get(t).copied()),
            max_settled: self.max_settled,
        }
    }
}

/// Single-source shortest paths using decrease_key
pub fn dijkstra<V, C, H>(graph: &Graph<V, C>, source: &V) -> ShortestPaths<V, C>
where
    V: Clone + Eq + Hash,
    C: Cost,
    H: DecreaseKeyHeap<VertexIndex, Distance<C>>,
{
    ShortestPathBuilder::new(graph, source.clone()).run::<H>()
}

/// Single-source shortest paths by re-insertion, for heaps without decrease_key
///
/// ```rust
/// use fib_heap_engine::pathfinding::{dijkstra_lazy, Graph};
/// use fib_heap_engine::simple_binary::SimpleBinaryHeap;
///
/// let mut graph = Graph::new();
/// graph.add_undirected_edge(0, 1, 7u32);
/// graph.add_undirected_edge(1, 2, 1);
/// graph.add_undirected_edge(0, 2, 9);
///
/// let paths = dijkstra_lazy::<_, _, SimpleBinaryHeap<_, _>>(&graph, &0);
/// assert_eq!(paths.distance(&2), Some(8));
/// ```
pub fn dijkstra_lazy<V, C, H>(graph: &Graph<V, C>, source: &V) -> ShortestPaths<V, C>
where
    V: Clone + Eq + Hash,
    C: Cost,
    H: Heap<VertexIndex, Distance<C>>,
{
    ShortestPathBuilder::new(graph, source.clone()).run_lazy::<H>()
}

#[derive(Clone, Copy)]
struct Limits {
    target: Option<VertexIndex>,
    max_settled: Option<usize>,
}

impl Limits {
    fn reached(&self, settled_vertex: VertexIndex, settled: usize) -> bool {
        self.target == Some(settled_vertex) || self.max_settled.is_some_and(|max| settled >= max)
    }
}

struct SearchState<C> {
    dist: Vec<Distance<C>>,
    pred: Vec<Option<VertexIndex>>,
    settled: Vec<bool>,
    counts: OperationCounts,
}

impl<C: Cost> SearchState<C> {
    fn new(vertices: usize) -> Self {
        SearchState {
            dist: vec![Distance::Infinite; vertices],
            pred: vec![None; vertices],
            settled: vec![false; vertices],
            counts: OperationCounts::default(),
        }
    }

    fn settle(&mut self, vertex: VertexIndex) {
        self.settled[vertex] = true;
        self.counts.settled += 1;
    }

    fn into_paths<V: Clone + Eq + Hash>(self, graph: &Graph<V, C>) -> ShortestPaths<V, C> {
        let mut distances = FxHashMap::default();
        let mut predecessors = FxHashMap::default();
        // Tentative distances left behind by an early exit are not reported
        for (i, label) in graph.labels.iter().enumerate() {
            let (dist, pred) = if self.settled[i] {
                (self.dist[i].finite(), self.pred[i].map(|p| graph.labels[p].clone()))
            } else {
                (None, None)
            };
            distances.insert(label.clone(), dist);
            predecessors.insert(label.clone(), pred);
        }
        ShortestPaths {
            distances,
            predecessors,
            counts: self.counts,
        }
    }
}

fn relax_with_decrease_key<V, C, H>(graph: &Graph<V, C>, state: &mut SearchState<C>, limits: Limits)
where
    V: Clone + Eq + Hash,
    C: Cost,
    H: DecreaseKeyHeap<VertexIndex, Distance<C>>,
{
    let mut heap = H::new();
    let mut handles: Vec<H::Handle> = (0..graph.vertex_count())
        .map(|v| heap.push_with_handle(state.dist[v], v))
        .collect();

    while let Some((distance, u)) = heap.pop() {
        state.counts.extract_min += 1;
        if state.settled[u] {
            continue;
        }
        let Distance::Finite(du) = distance else {
            // Everything left is unreachable
            continue;
        };

        state.settle(u);
        if limits.reached(u, state.counts.settled) {
            break;
        }

        for &(v, weight) in &graph.adjacency[u] {
            let candidate = du.checked_add(weight).map_or(Distance::Infinite, Distance::Finite);
            if state.settled[v] || candidate >= state.dist[v] {
                continue;
            }
            state.dist[v] = candidate;
            state.pred[v] = Some(u);
            state.counts.decrease_key += 1;

            if let Err(err) = heap.decrease_key(&handles[v], candidate) {
                // The vertex has no live entry; queue a fresh one instead
                warn!(vertex = v, %err, "decrease_key rejected, re-inserting");
                handles[v] = heap.push_with_handle(candidate, v);
                state.counts.relax_insert += 1;
            }
        }
    }
}

fn relax_lazily<V, C, H>(
    graph: &Graph<V, C>,
    state: &mut SearchState<C>,
    source: VertexIndex,
    limits: Limits,
) where
    V: Clone + Eq + Hash,
    C: Cost,
    H: Heap<VertexIndex, Distance<C>>,
{
    let mut heap = H::new();
    heap.push(state.dist[source], source);

    while let Some((distance, u)) = heap.pop() {
        state.counts.extract_min += 1;
        if state.settled[u] || distance > state.dist[u] {
            continue;
        }
        let Distance::Finite(du) = distance else {
            continue;
        };

        state.settle(u);
        if limits.reached(u, state.counts.settled) {
            break;
        }

        for &(v, weight) in &graph.adjacency[u] {
            let candidate = du.checked_add(weight).map_or(Distance::Infinite, Distance::Finite);
            if candidate < state.dist[v] {
                state.dist[v] = candidate;
                state.pred[v] = Some(u);
                state.counts.relax_insert += 1;
                heap.push(candidate, v);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fibonacci::FibonacciHeap;
    use crate::simple_binary::SimpleBinaryHeap;

    fn diamond() -> Graph<&'static str, u32> {
        let mut graph = Graph::new();
        graph.add_edge("s", "a", 1);
        graph.add_edge("s", "b", 4);
        graph.add_edge("a", "b", 2);
        graph.add_edge("a", "t", 6);
        graph.add_edge("b", "t", 3);
        graph.add_vertex("island");
        graph
    }

    #[test]
    fn test_distance_ordering() {
        assert!(Distance::Finite(u32::MAX) < Distance::Infinite);
        assert!(Distance::Finite(1) < Distance::Finite(2));
    }

    #[test]
    fn test_graph_bookkeeping() {
        let graph = diamond();
        assert_eq!(graph.vertex_count(), 5);
        assert_eq!(graph.edge_count(), 5);
        assert!(graph.contains(&"island"));
        let mut out: Vec<_> = graph.neighbors(&"a").map(|(v, w)| (*v, w)).collect();
        out.sort();
        assert_eq!(out, vec![("b", 2), ("t", 6)]);
        assert_eq!(graph.neighbors(&"missing").count(), 0);
    }

    #[test]
    fn test_decrease_key_driver() {
        let graph = diamond();
        let paths = dijkstra::<_, _, FibonacciHeap<_, _>>(&graph, &"s");

        assert_eq!(paths.distance(&"t"), Some(6));
        assert_eq!(paths.path_to(&"t"), Some(vec!["s", "a", "b", "t"]));
        assert_eq!(paths.distance(&"island"), None);
        assert_eq!(paths.predecessor(&"s"), None);
        // Every vertex is inserted, so every vertex is extracted
        assert_eq!(paths.counts.extract_min, 5);
        assert_eq!(paths.counts.settled, 4);
        assert_eq!(paths.counts.relax_insert, 0);
    }

    #[test]
    fn test_lazy_driver_matches() {
        let graph = diamond();
        let eager = dijkstra::<_, _, FibonacciHeap<_, _>>(&graph, &"s");
        let lazy = dijkstra_lazy::<_, _, SimpleBinaryHeap<_, _>>(&graph, &"s");

        assert_eq!(eager.distances, lazy.distances);
        assert_eq!(lazy.counts.decrease_key, 0);
        assert_eq!(lazy.counts.relax_insert, eager.counts.decrease_key);
    }

    #[test]
    fn test_unknown_source() {
        let graph = diamond();
        let paths = dijkstra::<_, _, FibonacciHeap<_, _>>(&graph, &"nowhere");
        assert!(paths.distances.values().all(Option::is_none));
        assert_eq!(paths.counts.settled, 0);
    }

    #[test]
    fn test_max_settled_limit() {
        let graph = diamond();
        let paths = ShortestPathBuilder::new(&graph, "s")
            .max_settled(2)
            .run_lazy::<SimpleBinaryHeap<_, _>>();
        assert_eq!(paths.counts.settled, 2);
        assert_eq!(paths.distance(&"a"), Some(1));
        // "b" holds a tentative 4 (via s) but was never settled
        assert_eq!(paths.distance(&"b"), None);
        assert_eq!(paths.predecessor(&"b"), None);
        assert_eq!(paths.path_to(&"b"), None);
    }

    #[test]
    fn test_early_exit_reports_only_settled_vertices() {
        let graph = diamond();
        for paths in [
            ShortestPathBuilder::new(&graph, "s").target("a").run::<FibonacciHeap<_, _>>(),
            ShortestPathBuilder::new(&graph, "s").target("a").run_lazy::<SimpleBinaryHeap<_, _>>(),
        ] {
            assert_eq!(paths.counts.settled, 2);
            assert_eq!(paths.distance(&"s"), Some(0));
            assert_eq!(paths.distance(&"a"), Some(1));
            for unsettled in ["b", "t", "island"] {
                assert_eq!(paths.distance(&unsettled), None);
                assert_eq!(paths.predecessor(&unsettled), None);
            }
        }
    }

    #[test]
    fn test_checked_add_cost() {
        assert_eq!(Cost::checked_add(250u8, 5), Some(255));
        assert_eq!(Cost::checked_add(250u8, 6), None);
        assert_eq!(Cost::checked_add(-3i32, 3), Some(0));
    }

    #[test]
    fn test_overflowing_paths_are_unreachable() {
        let mut graph = Graph::new();
        graph.add_edge(0u8, 1, 200u8);
        graph.add_edge(1, 2, 100);
        graph.add_edge(0, 3, 50);
        graph.add_edge(3, 2, 60);

        let eager = dijkstra::<_, _, FibonacciHeap<_, _>>(&graph, &0);
        let lazy = dijkstra_lazy::<_, _, SimpleBinaryHeap<_, _>>(&graph, &0);
        for paths in [&eager, &lazy] {
            // 200 + 100 overflows u8, 50 + 60 fits
            assert_eq!(paths.distance(&2), Some(110));
            assert_eq!(paths.path_to(&2), Some(vec![0, 3, 2]));
        }

        let mut only_overflow = Graph::new();
        only_overflow.add_edge('a', 'b', 255u8);
        only_overflow.add_edge('b', 'c', 1);
        let paths = dijkstra::<_, _, FibonacciHeap<_, _>>(&only_overflow, &'a');
        assert_eq!(paths.distance(&'b'), Some(255));
        assert_eq!(paths.distance(&'c'), None);
        assert_eq!(paths.counts.settled, 2);
        assert_eq!(paths.counts.extract_min, 3);
    }
}
