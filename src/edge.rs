use std::fmt::{Debug, Display};

use crate::Node;

/// An edge is defined by its two endpoints.
/// Whether `Edge(u, v)` is read as `u -> v` or `{u, v}` depends on the network it lives in.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge(pub Node, pub Node);

/// Stable, 0-based edge index. Edge ids equal insertion order.
pub type EdgeId = u32;

/// We limit the number of edges to `2^32 - 1`.
pub type NumEdges = EdgeId;

/// Which incident edges of a node a query refers to.
///
/// In undirected networks all three variants describe the same set of edges.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Edges leaving the node
    #[default]
    Out,
    /// Edges entering the node
    In,
    /// Edges leaving or entering the node
    All,
}

impl Direction {
    /// Returns the direction with `Out` and `In` swapped
    pub fn reverse(self) -> Self {
        match self {
            Direction::Out => Direction::In,
            Direction::In => Direction::Out,
            Direction::All => Direction::All,
        }
    }
}

impl Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.0, self.1)
    }
}

impl Debug for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as Display>::fmt(self, f)
    }
}

impl Edge {
    /// Normalizes the edge such that the endpoint with smaller value comes first
    pub fn normalized(&self) -> Self {
        Edge(self.0.min(self.1), self.0.max(self.1))
    }

    /// Returns true if both endpoints are equal
    pub fn is_loop(&self) -> bool {
        self.0 == self.1
    }

    /// Reverses the edge by switching the endpoints
    pub fn reverse(&self) -> Self {
        Edge(self.1, self.0)
    }

    /// Source of the edge
    pub fn source(&self) -> Node {
        self.0
    }

    /// Target of the edge
    pub fn target(&self) -> Node {
        self.1
    }
}

impl From<(Node, Node)> for Edge {
    fn from(value: (Node, Node)) -> Self {
        Edge(value.0, value.1)
    }
}

impl From<&(Node, Node)> for Edge {
    fn from(value: &(Node, Node)) -> Self {
        Edge(value.0, value.1)
    }
}

impl From<&Edge> for Edge {
    fn from(value: &Edge) -> Self {
        *value
    }
}
