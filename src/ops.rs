use std::ops::Range;

use crate::*;

/// Provides getters pertaining to the node-size of a graph
pub trait GraphNodeOrder {
    /// Returns the number of nodes of the graph
    fn number_of_nodes(&self) -> NumNodes;

    /// Return the number of nodes as usize
    fn len(&self) -> usize {
        self.number_of_nodes() as usize
    }

    /// Returns an iterator over V.
    fn vertices(&self) -> impl Iterator<Item = Node> + '_ {
        self.vertices_range()
    }

    /// Returns a range of vertices that does not borrow `self`, which is handy while mutating
    /// per-node state of an algorithm in the same loop.
    fn vertices_range(&self) -> Range<Node> {
        0..self.number_of_nodes()
    }

    /// Returns *true* if the graph has no nodes (and thus no edges)
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Provides getters pertaining to the edge-size of a graph
pub trait GraphEdgeOrder {
    /// Returns the number of edges of the graph
    fn number_of_edges(&self) -> NumEdges;

    /// Returns an iterator over all edge ids in insertion order
    fn edge_ids(&self) -> Range<EdgeId> {
        0..self.number_of_edges()
    }
}

/// Whether edges are read as ordered or unordered pairs
pub trait GraphType {
    /// Returns *true* if `Edge(u, v)` means `u -> v`
    fn is_directed(&self) -> bool;

    /// Returns *true* if `Edge(u, v)` means `{u, v}`
    fn is_undirected(&self) -> bool {
        !self.is_directed()
    }
}

/// Edge-centric neighborhood queries. Every incident edge is reported by its [`EdgeId`], so
/// parallel edges and self-loops stay distinguishable.
pub trait IncidenceList: GraphNodeOrder + GraphEdgeOrder + GraphType {
    /// Returns the endpoints of edge `e` in the order they were inserted.
    /// ** Panics if `e >= m` **
    fn endpoints(&self, e: EdgeId) -> Edge;

    /// Returns the ids of the edges incident to `u` in direction `dir` in insertion order.
    /// In undirected graphs, every direction yields all incident edges.
    /// ** Panics if `u >= n` **
    fn incident_edges_of(&self, u: Node, dir: Direction) -> impl Iterator<Item = EdgeId> + '_;

    /// Returns the number of edges incident to `u` in direction `dir`.
    /// A self-loop counts once for `Out` and once for `In`.
    fn degree_of(&self, u: Node, dir: Direction) -> NumNodes;

    /// Returns the endpoint of `e` that is not `u` (or `u` itself for a self-loop).
    /// ** Panics if `u` is not incident to `e` **
    fn opposite(&self, e: EdgeId, u: Node) -> Node {
        let Edge(a, b) = self.endpoints(e);
        if a == u {
            b
        } else {
            assert_eq!(b, u, "node {u} is not incident to edge {e}");
            a
        }
    }

    /// Returns the head of `e` as reached when walking along it from `u`:
    /// the target for directed graphs and the opposite endpoint for undirected graphs.
    fn head_from(&self, e: EdgeId, u: Node) -> Node {
        if self.is_directed() {
            self.endpoints(e).target()
        } else {
            self.opposite(e, u)
        }
    }

    /// Returns an iterator over the neighbors of `u` in direction `dir`, one entry per edge
    fn neighbors_of(&self, u: Node, dir: Direction) -> impl Iterator<Item = Node> + '_ {
        self.incident_edges_of(u, dir)
            .map(move |e| self.opposite(e, u))
    }

    /// Returns an iterator over all edges in insertion order
    fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.edge_ids().map(|e| self.endpoints(e))
    }
}

/// Lookup of edges by their endpoints
pub trait EdgeLookup: IncidenceList {
    /// Returns the smallest id of an edge `u -> v` (or `{u, v}` in undirected graphs)
    fn edge_id_between(&self, u: Node, v: Node) -> Option<EdgeId> {
        self.incident_edges_of(u, Direction::Out)
            .find(|&e| self.opposite(e, u) == v)
    }

    /// Returns *true* if there is an edge `u -> v` (or `{u, v}` in undirected graphs)
    fn has_edge(&self, u: Node, v: Node) -> bool {
        self.edge_id_between(u, v).is_some()
    }

    /// Returns *true* if `u` has a self-loop
    fn has_self_loop(&self, u: Node) -> bool {
        self.has_edge(u, u)
    }
}

/// Trait for creating a new empty graph
pub trait GraphNew {
    /// Creates an empty directed graph with n singleton nodes
    fn new(n: NumNodes) -> Self;

    /// Creates an empty undirected graph with n singleton nodes
    fn new_undirected(n: NumNodes) -> Self;
}

/// Provides functions to insert edges
pub trait GraphEdgeEditing: GraphNew {
    /// Adds the edge `(u, v)` to the graph and returns its id.
    /// Parallel edges and self-loops are allowed.
    /// ** Panics if `u, v >= n` **
    fn add_edge(&mut self, u: Node, v: Node) -> EdgeId;

    /// Adds all edges in the collection
    fn add_edges(&mut self, edges: impl IntoIterator<Item = impl Into<Edge>>) {
        for Edge(u, v) in edges.into_iter().map(|d| d.into()) {
            self.add_edge(u, v);
        }
    }
}

/// Trait for creating a graph from a given list of edges
pub trait GraphFromScratch {
    /// Creates a directed graph from a given list of edges
    fn from_edges(n: NumNodes, edges: impl IntoIterator<Item = impl Into<Edge>>) -> Self;

    /// Creates an undirected graph from a given list of edges
    fn from_undirected_edges(n: NumNodes, edges: impl IntoIterator<Item = impl Into<Edge>>)
    -> Self;
}

impl<G: GraphEdgeEditing> GraphFromScratch for G {
    fn from_edges(n: NumNodes, edges: impl IntoIterator<Item = impl Into<Edge>>) -> Self {
        let mut graph = Self::new(n);
        graph.add_edges(edges);
        graph
    }

    fn from_undirected_edges(
        n: NumNodes,
        edges: impl IntoIterator<Item = impl Into<Edge>>,
    ) -> Self {
        let mut graph = Self::new_undirected(n);
        graph.add_edges(edges);
        graph
    }
}
