/*!
# Directed Matchings

A directed matching relates nodes along edges of a directed graph: every node is matched
*into* by at most one node, while a node may match *out* to several nodes (the latter only
happens in targeted controllability, the untargeted models produce at most one).

The relation is stored from both ends and kept consistent by every mutator:
`v` is in `match_out(u)` iff `match_in(v) == Some(u)`.
*/

use smallvec::SmallVec;

use super::*;

/// The relation "u matches v" on the nodes `0..n`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectedMatching {
    in_of: Vec<Option<OptionalNode>>,
    out_of: Vec<SmallVec<[Node; 1]>>,
}

impl DirectedMatching {
    /// Creates an empty matching on `n` nodes
    pub fn new(n: NumNodes) -> Self {
        Self {
            in_of: vec![None; n as usize],
            out_of: vec![SmallVec::new(); n as usize],
        }
    }

    /// Creates a matching from a table that records for every node `v` the node matching
    /// into `v` (if any).
    ///
    /// # Example
    /// ```rust
    /// use netctrl::{prelude::*, utils::DirectedMatching};
    ///
    /// let m = DirectedMatching::from_in_mapping(vec![None, OptionalNode::new(0), OptionalNode::new(1)]);
    /// assert_eq!(m.match_out(0), &[1]);
    /// assert_eq!(m.match_in(2), Some(1));
    /// assert!(!m.is_matched(0));
    /// ```
    pub fn from_in_mapping(in_of: Vec<Option<OptionalNode>>) -> Self {
        let mut out_of = vec![SmallVec::new(); in_of.len()];
        for (v, u) in in_of.iter().enumerate() {
            if let Some(u) = u.node() {
                out_of[u as usize].push(v as Node);
            }
        }
        Self { in_of, out_of }
    }

    /// Number of nodes the relation is defined on
    pub fn len(&self) -> usize {
        self.in_of.len()
    }

    /// Returns *true* if the matching is defined on zero nodes
    pub fn is_empty(&self) -> bool {
        self.in_of.is_empty()
    }

    /// Returns *true* if some node matches `v`
    pub fn is_matched(&self, v: Node) -> bool {
        self.in_of[v as usize].is_some()
    }

    /// Returns *true* if `u` matches at least one node
    pub fn is_matching(&self, u: Node) -> bool {
        !self.out_of[u as usize].is_empty()
    }

    /// Returns *true* if `u` matches exactly one node
    pub fn is_matching_exactly_one(&self, u: Node) -> bool {
        self.out_of[u as usize].len() == 1
    }

    /// Returns the node matching `v`
    pub fn match_in(&self, v: Node) -> Option<Node> {
        self.in_of[v as usize].node()
    }

    /// Returns the nodes matched by `u` in the order the matches were made
    pub fn match_out(&self, u: Node) -> &[Node] {
        &self.out_of[u as usize]
    }

    /// Makes `u` match `v`. An existing match into `v` is removed first.
    pub fn set_match(&mut self, u: Node, v: Node) {
        self.unmatch(v);
        self.in_of[v as usize] = OptionalNode::new(u);
        self.out_of[u as usize].push(v);
    }

    /// Removes the match into `v` (if any) and returns the node that matched it
    pub fn unmatch(&mut self, v: Node) -> Option<Node> {
        let u = self.in_of[v as usize].take().node()?;
        let outs = &mut self.out_of[u as usize];
        let pos = outs
            .iter()
            .position(|&w| w == v)
            .expect("in- and out-table of a matching disagree");
        outs.remove(pos);
        Some(u)
    }

    /// Returns an iterator over all matched pairs `(u, v)` ordered by `v`
    pub fn matched_pairs(&self) -> impl Iterator<Item = (Node, Node)> + '_ {
        self.in_of
            .iter()
            .enumerate()
            .filter_map(|(v, u)| u.node().map(|u| (u, v as Node)))
    }

    /// Number of matched pairs
    pub fn number_of_matches(&self) -> usize {
        self.in_of.iter().filter(|u| u.is_some()).count()
    }
}
