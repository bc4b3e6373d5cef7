//! A general (non-bipartite) graph plus a symmetric matching over it,
//! backed by [`petgraph`]'s undirected `Graph`. This is the input structure
//! consumed by [`crate::blossom::blossom`].

use std::collections::HashMap;

use petgraph::graph::UnGraph;

/// Opaque node identity. Wraps `petgraph`'s own node index; equality and
/// hashing are defined on the handle, never on the payload it carries.
pub type NodeId = petgraph::graph::NodeIndex<u32>;

/// A set of nodes (each carrying a `T` payload) plus a set of undirected
/// edges between them.
#[derive(Debug, Clone)]
pub struct Graph<T> {
    inner: UnGraph<T, ()>,
}

impl<T> Graph<T> {
    pub fn new() -> Self {
        Graph {
            inner: UnGraph::new_undirected(),
        }
    }

    pub fn add_node(&mut self, payload: T) -> NodeId {
        self.inner.add_node(payload)
    }

    /// Adds an undirected edge. `(a, b)` and `(b, a)` are the same edge;
    /// adding either afterward is a no-op if it already exists.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) {
        if !self.has_edge(a, b) {
            self.inner.add_edge(a, b, ());
        }
    }

    pub fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.inner.find_edge(a, b).is_some()
    }

    /// Whether `a` and `b` are adjacent (an alias for [`Graph::has_edge`]
    /// used by the deque seeding heuristic below).
    pub fn adjacent(&self, a: NodeId, b: NodeId) -> bool {
        self.has_edge(a, b)
    }

    pub fn neighbors(&self, n: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.inner.neighbors(n)
    }

    pub fn degree(&self, n: NodeId) -> usize {
        self.inner.neighbors(n).count()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.inner.node_indices()
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn node_weight(&self, n: NodeId) -> Option<&T> {
        self.inner.node_weight(n)
    }
}

impl<T> Default for Graph<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A symmetric `node -> partner` mapping: every edge it contains has both
/// endpoints pointing at each other, and every node appears in at most one
/// pair.
#[derive(Debug, Clone, Default)]
pub struct Matching {
    partner: HashMap<NodeId, NodeId>,
}

impl Matching {
    pub fn new() -> Self {
        Matching {
            partner: HashMap::new(),
        }
    }

    pub fn has_vertex(&self, n: NodeId) -> bool {
        self.partner.contains_key(&n)
    }

    pub fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.partner.get(&a) == Some(&b)
    }

    pub fn partner(&self, n: NodeId) -> Option<NodeId> {
        self.partner.get(&n).copied()
    }

    /// Adds the pair `(a, b)` to the matching.
    ///
    /// # Panics
    ///
    /// Panics (debug builds) if either endpoint is already matched: the
    /// caller is responsible for ensuring disjointness, since a matching by
    /// definition cannot have a node in two pairs at once.
    pub fn insert(&mut self, a: NodeId, b: NodeId) {
        debug_assert!(!self.has_vertex(a), "node already matched");
        debug_assert!(!self.has_vertex(b), "node already matched");
        self.partner.insert(a, b);
        self.partner.insert(b, a);
    }

    pub fn remove(&mut self, a: NodeId) {
        if let Some(b) = self.partner.remove(&a) {
            self.partner.remove(&b);
        }
    }

    pub fn len(&self) -> usize {
        self.partner.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.partner.is_empty()
    }

    /// Iterates each matched pair exactly once, with `a < b` by `NodeId`
    /// ordering so pairs aren't emitted twice in both directions.
    pub fn pairs(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.partner
            .iter()
            .filter(|(a, b)| a < b)
            .map(|(a, b)| (*a, *b))
    }
}

/// Seeds a matching using a deque heuristic: walk the
/// nodes in `order`, and for each one after the first, prepend it to the
/// deque if it's adjacent to the current front, append if adjacent to the
/// current back, otherwise drop it. Pair up consecutive deque entries.
///
/// This doesn't need to produce a *maximum* matching — it only needs to
/// give [`crate::blossom::blossom`] a reasonable starting point so
/// augmentation has less work to do.
pub fn seed_matching<T>(graph: &Graph<T>, order: &[NodeId]) -> Matching {
    use std::collections::VecDeque;

    let mut deque: VecDeque<NodeId> = VecDeque::new();
    for (i, &node) in order.iter().enumerate() {
        if i == 0 {
            deque.push_back(node);
            continue;
        }
        let front = *deque.front().unwrap();
        let back = *deque.back().unwrap();
        if graph.adjacent(node, front) {
            deque.push_front(node);
        } else if graph.adjacent(node, back) {
            deque.push_back(node);
        }
        // otherwise: drop it from the seed, Blossom will pick it up later.
    }

    let mut matching = Matching::new();
    let items: Vec<NodeId> = deque.into_iter().collect();
    let mut i = 0;
    while i + 1 < items.len() {
        matching.insert(items[i], items[i + 1]);
        i += 2;
    }
    matching
}
