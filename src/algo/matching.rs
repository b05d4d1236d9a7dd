/*!
# Matching Algorithms

A *matching* is a set of edges without shared endpoints; a **maximum matching** is the largest
possible one. On bipartite graphs it is computed with augmenting paths: a greedy pass
matches cheaply, then every still-free left node searches for an alternating path (BFS) to a
free right node and flips it.

The result is reported as a `mate` table indexed by node, the format the controllability
models consume directly.
*/

use std::collections::VecDeque;

use itertools::Itertools;

use super::*;

/// Matching algorithms on bipartite graphs
pub trait Matching: IncidenceList {
    /// Computes a **maximum matching** on a bipartite graph whose sides are given by
    /// `is_left[u]`.
    ///
    /// - Edge directions are ignored.
    /// - Edges within one side and self-loops are ignored.
    ///
    /// Returns `mate` with `mate[u] = Some(v)` iff `{u, v}` is in the matching (for both
    /// endpoints).
    ///
    /// # Example
    /// ```rust
    /// use netctrl::{prelude::*, algo::*};
    ///
    /// // 0 - 1 - 2 - 3 with left side {0, 2}
    /// let g = Network::from_edges(4, [(0, 1), (2, 1), (2, 3)]);
    /// let mate = g.maximum_bipartite_matching(&[true, false, true, false]);
    /// assert_eq!(mate[0].node(), Some(1));
    /// assert_eq!(mate[3].node(), Some(2));
    /// ```
    fn maximum_bipartite_matching(&self, is_left: &[bool]) -> Vec<Option<OptionalNode>>;
}

impl<G> Matching for G
where
    G: IncidenceList,
{
    fn maximum_bipartite_matching(&self, is_left: &[bool]) -> Vec<Option<OptionalNode>> {
        assert_eq!(is_left.len(), self.len());

        let n = self.len();
        let mut mate: Vec<Option<OptionalNode>> = vec![None; n];
        let partner_candidates = |u: Node| {
            self.neighbors_of(u, Direction::All)
                .filter(move |&v| is_left[u as usize] != is_left[v as usize])
        };

        // greedy start
        for u in self.vertices().filter(|&u| is_left[u as usize]) {
            if let Some(v) = partner_candidates(u).find(|&v| mate[v as usize].is_none()) {
                mate[u as usize] = OptionalNode::new(v);
                mate[v as usize] = OptionalNode::new(u);
            }
        }

        // augmenting paths; `parent[v]` is the left node from which right node `v` was reached
        let mut parent: Vec<Option<OptionalNode>> = vec![None; n];
        let mut seen_in_round = vec![NumNodes::MAX; n];
        let mut queue = VecDeque::new();

        // an augmentation only matches its own root among the free left nodes
        let free_roots = self
            .vertices()
            .filter(|&u| is_left[u as usize] && mate[u as usize].is_none())
            .collect_vec();

        for (round, root) in free_roots.into_iter().enumerate() {
            let round = round as NumNodes;
            queue.clear();
            queue.push_back(root);

            let mut free_right = None;
            'search: while let Some(x) = queue.pop_front() {
                for y in partner_candidates(x) {
                    if seen_in_round[y as usize] == round {
                        continue;
                    }
                    seen_in_round[y as usize] = round;
                    parent[y as usize] = OptionalNode::new(x);

                    match mate[y as usize].node() {
                        None => {
                            free_right = Some(y);
                            break 'search;
                        }
                        Some(z) => queue.push_back(z),
                    }
                }
            }

            // flip the alternating path ending in `y`
            let mut next = free_right;
            while let Some(y) = next {
                let x = parent[y as usize]
                    .node()
                    .expect("every reached right node has a parent");
                next = mate[x as usize].node();
                mate[x as usize] = OptionalNode::new(y);
                mate[y as usize] = OptionalNode::new(x);
            }
        }

        mate
    }
}
