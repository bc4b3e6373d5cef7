//! Swiss-system pairing.
//!
//! Competitors are processed in descending match-point order, bucketed by
//! equal score, and paired within each bucket by exact maximum matching
//! rather than a greedy heuristic. Each bucket
//! (plus whatever couldn't be matched in the bucket above it, carried
//! down) becomes a graph whose edges are "hasn't played this opponent
//! yet", and [`crate::blossom::blossom`] finds a maximum matching on it.
//! Anyone left over after a bucket is processed carries into the next one
//! down; by the time the lowest bucket is processed, at most one
//! competitor overall can remain unpaired (and gets a bye).

use std::collections::HashSet;

use crate::blossom::blossom;
use crate::graph::{seed_matching, Graph, NodeId};
use crate::ids::CompetitorId;

/// Computes pairings for one Swiss round.
///
/// `active` need not be sorted; this function sorts a copy by descending
/// `match_points`. `can_pair(a, b)` should return `false` for any pair
/// that has already played (or any other reason they can't meet again).
///
/// Returns `(pairs, unpaired)`. `unpaired` holds at most one competitor in
/// a well-formed tournament state; the caller is responsible for turning
/// that into a bye (or flagging a bracket/state inconsistency if there's
/// more than one).
pub fn pair_swiss_round(
    active: &[CompetitorId],
    match_points: impl Fn(CompetitorId) -> u32,
    can_pair: impl Fn(CompetitorId, CompetitorId) -> bool,
) -> (Vec<(CompetitorId, CompetitorId)>, Vec<CompetitorId>) {
    let mut sorted = active.to_vec();
    sorted.sort_by_key(|c| std::cmp::Reverse(match_points(*c)));

    let mut pairs = Vec::new();
    let mut carry: Vec<CompetitorId> = Vec::new();
    let mut i = 0;
    while i < sorted.len() {
        let points = match_points(sorted[i]);
        let mut bucket: Vec<CompetitorId> = std::mem::take(&mut carry);
        while i < sorted.len() && match_points(sorted[i]) == points {
            bucket.push(sorted[i]);
            i += 1;
        }

        let mut graph: Graph<CompetitorId> = Graph::new();
        let node_ids: Vec<NodeId> = bucket.iter().map(|&c| graph.add_node(c)).collect();
        for x in 0..bucket.len() {
            for y in (x + 1)..bucket.len() {
                if can_pair(bucket[x], bucket[y]) {
                    graph.add_edge(node_ids[x], node_ids[y]);
                }
            }
        }

        let seed = seed_matching(&graph, &node_ids);
        let matching = blossom(&graph, &seed);

        let mut matched: HashSet<CompetitorId> = HashSet::new();
        for (a, b) in matching.pairs() {
            let ca = *graph.node_weight(a).unwrap();
            let cb = *graph.node_weight(b).unwrap();
            pairs.push((ca, cb));
            matched.insert(ca);
            matched.insert(cb);
        }

        carry = bucket.into_iter().filter(|c| !matched.contains(c)).collect();
    }

    (pairs, carry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_rematches(played: &[(u64, u64)]) -> impl Fn(CompetitorId, CompetitorId) -> bool + '_ {
        move |a, b| !played.contains(&(a.0, b.0)) && !played.contains(&(b.0, a.0))
    }

    #[test]
    fn pairs_everyone_in_a_single_bucket() {
        let ids: Vec<CompetitorId> = (1..=4).map(CompetitorId).collect();
        let points: HashMap<CompetitorId, u32> = ids.iter().map(|&c| (c, 3)).collect();
        let (pairs, unpaired) = pair_swiss_round(&ids, |c| points[&c], no_rematches(&[]));
        assert_eq!(pairs.len(), 2);
        assert!(unpaired.is_empty());
    }

    #[test]
    fn avoids_rematches() {
        let ids: Vec<CompetitorId> = (1..=4).map(CompetitorId).collect();
        let points: HashMap<CompetitorId, u32> = ids.iter().map(|&c| (c, 3)).collect();
        let played = [(1, 2), (3, 4)];
        let (pairs, unpaired) = pair_swiss_round(&ids, |c| points[&c], no_rematches(&played));
        assert!(unpaired.is_empty());
        for (a, b) in &pairs {
            assert!(!played.contains(&(a.0, b.0)));
            assert!(!played.contains(&(b.0, a.0)));
        }
    }

    #[test]
    fn odd_count_leaves_exactly_one_unpaired() {
        let ids: Vec<CompetitorId> = (1..=5).map(CompetitorId).collect();
        let points: HashMap<CompetitorId, u32> = ids.iter().map(|&c| (c, 3)).collect();
        let (pairs, unpaired) = pair_swiss_round(&ids, |c| points[&c], no_rematches(&[]));
        assert_eq!(pairs.len(), 2);
        assert_eq!(unpaired.len(), 1);
    }

    #[test]
    fn carries_an_unmatched_top_bucket_player_down() {
        // three players tied at 6 points, all have played each other; one
        // player at 3 points hasn't played any of them. The 6-point bucket
        // can't fully pair internally, so the odd one out should carry down
        // and pair with the 3-point player.
        let top: Vec<CompetitorId> = (1..=3).map(CompetitorId).collect();
        let low = CompetitorId(4);
        let mut points: HashMap<CompetitorId, u32> = top.iter().map(|&c| (c, 6)).collect();
        points.insert(low, 3);
        let played = [(1, 2), (1, 3), (2, 3)];
        let mut active = top.clone();
        active.push(low);
        let (pairs, unpaired) = pair_swiss_round(&active, |c| points[&c], no_rematches(&played));
        assert_eq!(pairs.len(), 1);
        assert_eq!(unpaired.len(), 2);
        let (a, b) = pairs[0];
        assert!(a == low || b == low);
    }
}
