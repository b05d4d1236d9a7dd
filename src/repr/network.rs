use smallvec::SmallVec;

use super::*;

/// Incident edges of a single node, stored in insertion order
type Incidence = SmallVec<[EdgeId; 4]>;

/// A directed or undirected multigraph with stable edge ids.
///
/// - Edge ids are `0..m` in insertion order.
/// - Directed: `out_edges[u]` holds all edges `u -> *`, `in_edges[u]` all edges `* -> u`.
/// - Undirected: `out_edges[u]` holds every edge incident to `u` (a self-loop once) and is
///   reported for every [`Direction`]; `in_edges` stays empty.
#[derive(Clone, Debug)]
pub struct Network {
    directed: bool,
    edges: Vec<Edge>,
    out_edges: Vec<Incidence>,
    in_edges: Vec<Incidence>,
}

impl Network {
    fn with_direction(n: NumNodes, directed: bool) -> Self {
        Self {
            directed,
            edges: Vec::new(),
            out_edges: vec![Incidence::new(); n as usize],
            in_edges: if directed {
                vec![Incidence::new(); n as usize]
            } else {
                Vec::new()
            },
        }
    }

    /// Returns a copy of the network with every node identity kept but directedness
    /// replaced. Edge ids are preserved.
    pub fn with_directedness(&self, directed: bool) -> Self {
        let mut result = Self::with_direction(self.number_of_nodes(), directed);
        result.add_edges(self.edges.iter());
        result
    }

    /// Returns the edge list in insertion order
    pub fn edge_list(&self) -> &[Edge] {
        &self.edges
    }
}

impl GraphType for Network {
    fn is_directed(&self) -> bool {
        self.directed
    }
}

impl GraphNodeOrder for Network {
    fn number_of_nodes(&self) -> NumNodes {
        self.out_edges.len() as NumNodes
    }
}

impl GraphEdgeOrder for Network {
    fn number_of_edges(&self) -> NumEdges {
        self.edges.len() as NumEdges
    }
}

impl IncidenceList for Network {
    fn endpoints(&self, e: EdgeId) -> Edge {
        self.edges[e as usize]
    }

    fn incident_edges_of(&self, u: Node, dir: Direction) -> impl Iterator<Item = EdgeId> + '_ {
        let (first, second): (&[EdgeId], &[EdgeId]) = match (self.directed, dir) {
            (false, _) | (true, Direction::Out) => (&self.out_edges[u as usize], &[]),
            (true, Direction::In) => (&self.in_edges[u as usize], &[]),
            (true, Direction::All) => (&self.out_edges[u as usize], &self.in_edges[u as usize]),
        };
        first.iter().chain(second.iter()).copied()
    }

    fn degree_of(&self, u: Node, dir: Direction) -> NumNodes {
        let u = u as usize;
        (match (self.directed, dir) {
            (false, _) | (true, Direction::Out) => self.out_edges[u].len(),
            (true, Direction::In) => self.in_edges[u].len(),
            (true, Direction::All) => self.out_edges[u].len() + self.in_edges[u].len(),
        }) as NumNodes
    }
}

impl EdgeLookup for Network {}

impl GraphNew for Network {
    fn new(n: NumNodes) -> Self {
        Self::with_direction(n, true)
    }

    fn new_undirected(n: NumNodes) -> Self {
        Self::with_direction(n, false)
    }
}

impl GraphEdgeEditing for Network {
    fn add_edge(&mut self, u: Node, v: Node) -> EdgeId {
        let n = self.number_of_nodes();
        assert!(u < n && v < n, "edge ({u},{v}) out of range for {n} nodes");

        let id = self.edges.len() as EdgeId;
        self.edges.push(Edge(u, v));
        self.out_edges[u as usize].push(id);

        if self.directed {
            self.in_edges[v as usize].push(id);
        } else if u != v {
            self.out_edges[v as usize].push(id);
        }

        id
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    use super::*;
    use crate::testing::random_network;

    #[test]
    fn edge_ids_follow_insertion_order() {
        let graph = Network::from_edges(3, [(0, 1), (1, 2), (0, 1), (2, 2)]);
        assert_eq!(graph.number_of_edges(), 4);
        assert_eq!(graph.endpoints(2), Edge(0, 1));
        assert_eq!(graph.edge_id_between(0, 1), Some(0));
        assert_eq!(graph.edge_id_between(1, 0), None);
        assert_eq!(graph.edge_id_between(2, 2), Some(3));
        assert!(graph.has_self_loop(2));
        assert!(!graph.has_self_loop(0));
    }

    #[test]
    fn directed_degrees() {
        let graph = Network::from_edges(3, [(0, 1), (0, 2), (2, 0), (1, 1)]);
        assert_eq!(graph.degree_of(0, Direction::Out), 2);
        assert_eq!(graph.degree_of(0, Direction::In), 1);
        assert_eq!(graph.degree_of(0, Direction::All), 3);
        assert_eq!(graph.degree_of(1, Direction::Out), 1);
        assert_eq!(graph.degree_of(1, Direction::In), 2);
        assert_eq!(
            graph.neighbors_of(0, Direction::All).collect_vec(),
            vec![1, 2, 2]
        );
    }

    #[test]
    fn undirected_incidences_coincide() {
        let graph = Network::from_undirected_edges(3, [(0, 1), (2, 1), (1, 1)]);
        assert!(graph.is_undirected());
        for dir in [Direction::Out, Direction::In, Direction::All] {
            assert_eq!(graph.incident_edges_of(1, dir).collect_vec(), vec![0, 1, 2]);
            assert_eq!(graph.degree_of(1, dir), 3);
        }
        assert_eq!(graph.edge_id_between(1, 2), Some(1));
        assert_eq!(graph.edge_id_between(2, 1), Some(1));
        assert_eq!(graph.head_from(1, 1), 2);
        assert_eq!(graph.head_from(1, 2), 1);
    }

    #[test]
    fn degrees_sum_to_edges() {
        let rng = &mut Pcg64Mcg::seed_from_u64(3);
        for _ in 0..20 {
            let graph = random_network(rng, 30, 90, true);
            let out: NumNodes = graph.vertices().map(|u| graph.degree_of(u, Direction::Out)).sum();
            let inc: NumNodes = graph.vertices().map(|u| graph.degree_of(u, Direction::In)).sum();
            assert_eq!(out, graph.number_of_edges());
            assert_eq!(inc, graph.number_of_edges());

            for e in graph.edge_ids() {
                let Edge(u, v) = graph.endpoints(e);
                assert!(graph.incident_edges_of(u, Direction::Out).contains(&e));
                assert!(graph.incident_edges_of(v, Direction::In).contains(&e));
            }
        }
    }

    #[test]
    fn changing_directedness_keeps_edge_ids() {
        let graph = Network::from_edges(4, [(0, 1), (2, 3), (3, 0)]);
        let undirected = graph.with_directedness(false);
        assert!(undirected.is_undirected());
        assert_eq!(undirected.edge_list(), graph.edge_list());
        assert_eq!(undirected.edge_id_between(0, 3), Some(2));
    }
}
