//! Edmonds' Blossom algorithm for maximum matching on a general graph.
//!
//! Repeatedly search for an augmenting path from an unmatched node via BFS
//! along alternating unmatched/matched edges, contracting odd cycles
//! ("blossoms") when found and continuing the search in the contracted
//! graph, until no augmenting path exists from any unmatched node.

use std::collections::VecDeque;

use crate::graph::{Graph, Matching, NodeId};

/// Produces a maximum matching `M' ⊇ M` on `graph`, starting from the
/// initial matching `m`. The returned matching is symmetric and every node
/// appears in at most one pair.
pub fn blossom<T>(graph: &Graph<T>, m: &Matching) -> Matching {
    let nodes: Vec<NodeId> = graph.nodes().collect();
    let n = nodes.len();
    if n == 0 {
        return Matching::new();
    }
    let index_of = |id: NodeId| -> usize { id.index() };

    // match_[i] = index of i's partner, or None.
    let mut match_: Vec<Option<usize>> = vec![None; n];
    for (a, b) in m.pairs() {
        match_[index_of(a)] = Some(index_of(b));
        match_[index_of(b)] = Some(index_of(a));
    }

    // Adjacency by local index, built once up front.
    let adj: Vec<Vec<usize>> = nodes
        .iter()
        .map(|&n| graph.neighbors(n).map(index_of).collect())
        .collect();

    for root in 0..n {
        if match_[root].is_some() {
            continue;
        }
        try_augment(&adj, &mut match_, root);
    }

    let mut out = Matching::new();
    for i in 0..n {
        if let Some(j) = match_[i] {
            if i < j {
                out.insert(nodes[i], nodes[j]);
            }
        }
    }
    out
}

/// BFS from `root` (which must currently be unmatched) looking for an
/// augmenting path, contracting blossoms as they're discovered. If one is
/// found, flips every matched/unmatched edge along it in `match_` and
/// returns `true`.
fn try_augment(adj: &[Vec<usize>], match_: &mut [Option<usize>], root: usize) -> bool {
    let n = adj.len();
    let mut parent: Vec<Option<usize>> = vec![None; n];
    let mut base: Vec<usize> = (0..n).collect();
    let mut used = vec![false; n];
    let mut queue: VecDeque<usize> = VecDeque::new();

    used[root] = true;
    queue.push_back(root);

    while let Some(v) = queue.pop_front() {
        for &to in &adj[v] {
            if base[v] == base[to] || match_[v] == Some(to) {
                continue;
            }
            if to == root || (match_[to].is_some() && parent[match_[to].unwrap()].is_some()) {
                let lca = find_lca(match_, &parent, &base, v, to);
                let mut blossom = vec![false; n];
                mark_blossom_path(match_, &mut parent, &base, &mut blossom, v, lca, to);
                mark_blossom_path(match_, &mut parent, &base, &mut blossom, to, lca, v);
                for i in 0..n {
                    if blossom[base[i]] {
                        base[i] = lca;
                        if !used[i] {
                            used[i] = true;
                            queue.push_back(i);
                        }
                    }
                }
            } else if parent[to].is_none() {
                parent[to] = Some(v);
                match match_[to] {
                    None => {
                        // `to` is unmatched: we found an augmenting path.
                        // Walk it back to `root` one matched/unmatched pair
                        // of edges at a time, flipping each as we go.
                        let mut v = Some(to);
                        while let Some(cur) = v {
                            let pv = parent[cur].expect("augmenting path node has a tree parent");
                            let next = match_[pv];
                            match_[cur] = Some(pv);
                            match_[pv] = Some(cur);
                            v = next;
                        }
                        return true;
                    }
                    Some(partner) => {
                        used[partner] = true;
                        queue.push_back(partner);
                    }
                }
            }
        }
    }
    false
}

fn find_lca(match_: &[Option<usize>], parent: &[Option<usize>], base: &[usize], a: usize, b: usize) -> usize {
    let n = base.len();
    let mut seen = vec![false; n];
    let mut v = a;
    loop {
        v = base[v];
        seen[v] = true;
        match match_[v] {
            Some(partner) => v = parent[partner].expect("matched node on alternating tree has a parent"),
            None => break,
        }
    }
    let mut v = b;
    loop {
        v = base[v];
        if seen[v] {
            return v;
        }
        v = parent[match_[v].expect("non-lca blossom walk hits an unmatched node")].unwrap();
    }
}

/// Marks every node on the blossom between `v` and the base `lca`
/// (discovered via alternating matched/unmatched edges) and rewires
/// `parent` so the contracted blossom can be expanded later if it ends up
/// on the final augmenting path.
fn mark_blossom_path(
    match_: &[Option<usize>],
    parent: &mut [Option<usize>],
    base: &[usize],
    blossom: &mut [bool],
    mut v: usize,
    lca: usize,
    mut child: usize,
) {
    while base[v] != lca {
        blossom[base[v]] = true;
        let m = match_[v].expect("blossom walk hits an unmatched node before reaching lca");
        blossom[base[m]] = true;
        parent[v] = Some(child);
        child = m;
        v = parent[m].expect("matched node on alternating tree has a parent");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{seed_matching, Graph};

    fn complete_graph(n: usize) -> (Graph<usize>, Vec<NodeId>) {
        let mut g = Graph::new();
        let nodes: Vec<NodeId> = (0..n).map(|i| g.add_node(i)).collect();
        for i in 0..n {
            for j in (i + 1)..n {
                g.add_edge(nodes[i], nodes[j]);
            }
        }
        (g, nodes)
    }

    #[test]
    fn matches_all_nodes_in_complete_even_graph() {
        let (g, nodes) = complete_graph(6);
        let m = blossom(&g, &Matching::new());
        assert_eq!(m.len(), 3);
        for n in &nodes {
            assert!(m.has_vertex(*n));
        }
    }

    #[test]
    fn leaves_one_unmatched_in_odd_graph() {
        let (g, nodes) = complete_graph(5);
        let m = blossom(&g, &Matching::new());
        assert_eq!(m.len(), 2);
        let unmatched = nodes.iter().filter(|n| !m.has_vertex(**n)).count();
        assert_eq!(unmatched, 1);
    }

    #[test]
    fn augments_a_seeded_matching() {
        let (g, nodes) = complete_graph(4);
        let seed = seed_matching(&g, &nodes);
        let m = blossom(&g, &seed);
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn idempotent_on_a_maximum_matching() {
        let (g, nodes) = complete_graph(6);
        let first = blossom(&g, &Matching::new());
        let second = blossom(&g, &first);
        assert_eq!(first.len(), second.len());
        for n in &nodes {
            assert_eq!(first.partner(*n), second.partner(*n));
        }
    }

    #[test]
    fn finds_a_matching_requiring_blossom_contraction() {
        // Classic blossom example: a 5-cycle (0-1-2-3-4-0) plus a pendant
        // edge 4-5. A greedy matching can get stuck; Blossom must still
        // find a perfect matching on {0..5} minus one node.
        let mut g: Graph<usize> = Graph::new();
        let nodes: Vec<NodeId> = (0..6).map(|i| g.add_node(i)).collect();
        let edges = [(0, 1), (1, 2), (2, 3), (3, 4), (4, 0), (4, 5)];
        for (a, b) in edges {
            g.add_edge(nodes[a], nodes[b]);
        }
        let m = blossom(&g, &Matching::new());
        // 6 nodes, one odd cycle: max matching size is 3 (perfect).
        assert_eq!(m.len(), 3);
        for (a, b) in m.pairs() {
            assert!(g.adjacent(a, b));
        }
    }
}
