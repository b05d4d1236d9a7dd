use std::iter::FusedIterator;

use itertools::Itertools;

use super::*;

/// Connected components of a graph, as iterators or as a [`Partition`]
pub trait Connectivity: IncidenceList + Traversal + Sized {
    /// Returns an iterator over the weakly connected components, i.e. the connected
    /// components when edge directions are ignored. Every node, including isolated ones,
    /// lands in exactly one component.
    fn weakly_connected_components(&self) -> WeaklyConnectedComponents<'_, Self> {
        WeaklyConnectedComponents::new(self)
    }

    /// Partition the graph into its weakly connected components
    fn partition_into_weakly_connected_components(&self) -> Partition {
        self.weakly_connected_components()
            .into_partition(self.number_of_nodes())
    }

    /// Returns the strongly connected components of the graph one `Vec<Node>` at a time
    fn strongly_connected_components(&self) -> StronglyConnectedComponents {
        StronglyConnectedComponents::new(self)
    }

    /// Returns a partition of nodes into SCCs (analogously to [`Connectivity::strongly_connected_components`])
    fn partition_into_strongly_connected_components(&self) -> Partition {
        self.strongly_connected_components()
            .into_partition(self.number_of_nodes())
    }
}

impl<G> Connectivity for G where G: IncidenceList + Sized {}

/// Iterator over the weakly connected components of a graph
pub struct WeaklyConnectedComponents<'a, G>
where
    G: IncidenceList,
{
    bfs: Option<BFS<'a, G>>,
}

impl<'a, G> WeaklyConnectedComponents<'a, G>
where
    G: IncidenceList,
{
    pub fn new(graph: &'a G) -> Self {
        Self {
            bfs: (!graph.is_empty()).then(|| graph.bfs(0, Direction::All)),
        }
    }
}

impl<G> Iterator for WeaklyConnectedComponents<'_, G>
where
    G: IncidenceList,
{
    type Item = Vec<Node>;

    fn next(&mut self) -> Option<Self::Item> {
        let bfs = self.bfs.as_mut()?;
        loop {
            let cc = bfs.by_ref().collect_vec();
            if !cc.is_empty() {
                return Some(cc);
            }

            if !bfs.try_restart_at_unvisited() {
                return None;
            }
        }
    }
}

/// Implementation of Tarjan's Algorithm for Strongly Connected Components.
/// It is designed as an iterator that emits the nodes of one strongly connected component at a
/// time. Observe that the order of nodes within a component is non-deterministic; the order of the
/// components themselves are in the reverse topological order of the SCCs (i.e. if each SCC
/// were contracted into a single node).
///
/// The out-neighborhoods are copied into a compact offset array on construction, so the
/// iterator does not borrow the graph.
pub struct StronglyConnectedComponents {
    offsets: Vec<usize>,
    targets: Vec<Node>,
    idx: Node,

    states: Vec<NodeState>,
    potentially_unvisited: usize,

    path_stack: Vec<Node>,

    call_stack: Vec<StackFrame>,
}

impl StronglyConnectedComponents {
    /// Construct the iterator for some graph
    pub fn new<G: IncidenceList>(graph: &G) -> Self {
        let mut offsets = Vec::with_capacity(graph.len() + 1);
        let mut targets = Vec::with_capacity(graph.number_of_edges() as usize);
        offsets.push(0);
        for u in graph.vertices() {
            targets.extend(
                graph
                    .incident_edges_of(u, Direction::Out)
                    .map(|e| graph.head_from(e, u)),
            );
            offsets.push(targets.len());
        }

        Self {
            offsets,
            targets,
            idx: 0,
            states: vec![Default::default(); graph.len()],
            potentially_unvisited: 0,

            path_stack: Vec::with_capacity(32),
            call_stack: Vec::with_capacity(32),
        }
    }

    fn len(&self) -> usize {
        self.states.len()
    }

    /// Just like in a classic DFS where we want to compute a spanning-forest, we will need to
    /// to visit each node at least once. We start we node 0, and cover all nodes reachable from
    /// there in `search`. Then, we search for an untouched node here, and start over.
    fn next_unvisited_node(&mut self) -> Option<Node> {
        while self.potentially_unvisited < self.len() {
            if !self.states[self.potentially_unvisited].visited {
                let v = self.potentially_unvisited as Node;
                self.push_node(v, None);
                return Some(v);
            }

            self.potentially_unvisited += 1;
        }
        None
    }

    /// Put a pristine stack frame on the call stack. Roughly speaking, this is the first step
    /// to a recursive call of search.
    fn push_node(&mut self, node: Node, parent: Option<Node>) {
        self.call_stack.push(StackFrame {
            node,
            parent: parent.unwrap_or(node),
            initial_stack_len: 0,
            first_call: true,
            cursor: self.offsets[node as usize],
        });
    }

    fn search(&mut self) -> Option<Vec<Node>> {
        // Tarjan's algorithm with an explicit call stack: every frame keeps a cursor into the
        // out-neighborhood of its node, so processing can pause on a "recursive call" and
        // resume where it left off. This avoids stack overflows on long paths and lets us
        // hand out one component per call to `next`.
        'recurse: while let Some(frame) = self.call_stack.last_mut() {
            let v = frame.node;

            if frame.first_call {
                frame.first_call = false;
                frame.initial_stack_len = self.path_stack.len() as Node;

                self.states[v as usize].visit(self.idx);
                self.idx += 1;

                self.path_stack.push(v);
            }

            let end = self.offsets[v as usize + 1];
            while frame.cursor < end {
                let w = self.targets[frame.cursor];
                frame.cursor += 1;
                let w_state = self.states[w as usize];

                if !w_state.visited {
                    self.push_node(w, Some(v));
                    continue 'recurse;
                } else if w_state.on_stack {
                    self.states[v as usize].try_lower_link(w_state.index);
                }
            }

            let frame = self.call_stack.pop()?;
            let state = self.states[v as usize];

            self.states[frame.parent as usize].try_lower_link(state.low_link);

            if state.is_root() {
                // this component goes into the result, so produce a descriptor and clean-up stack
                // while doing so
                let component = self.path_stack.split_off(frame.initial_stack_len as usize);

                for &w in &component {
                    self.states[w as usize].on_stack = false;
                }

                debug_assert_eq!(component.first(), Some(&v));

                return Some(component);
            }
        }

        None
    }
}

impl Iterator for StronglyConnectedComponents {
    type Item = Vec<Node>;

    /// Returns either a vector of node ids that form an SCC or None if no further SCC was found
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(x) = self.search() {
                return Some(x);
            }

            self.next_unvisited_node()?;
        }
    }
}

impl FusedIterator for StronglyConnectedComponents {}

#[derive(Debug, Clone)]
struct StackFrame {
    node: Node,
    parent: Node,
    initial_stack_len: Node,
    first_call: bool,
    cursor: usize,
}

#[derive(Debug, Clone, Copy, Default)]
struct NodeState {
    visited: bool,
    on_stack: bool,
    index: Node,
    low_link: Node,
}

impl NodeState {
    fn visit(&mut self, u: Node) {
        debug_assert!(!self.visited);
        self.index = u;
        self.low_link = u;
        self.visited = true;
        self.on_stack = true;
    }

    fn try_lower_link(&mut self, l: Node) {
        self.low_link = self.low_link.min(l);
    }

    fn is_root(&self) -> bool {
        self.index == self.low_link
    }
}

/// Sorts the nodes in each component increasingly and then the components themselves lexicographically.
pub fn sort_components(mut components: Vec<Vec<Node>>) -> Vec<Vec<Node>> {
    components.iter_mut().for_each(|comp| comp.sort_unstable());
    components.sort_by(|a, b| a[0].cmp(&b[0]));
    components
}

#[cfg(test)]
mod test {
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    use super::*;
    use crate::{gens::GeneratorSubstructures, testing::random_network};

    #[test]
    fn partition_into_weakly_connected_components() {
        let mut graph = Network::new(7);
        graph.add_edges([(1, 2), (3, 2), (4, 5)]);

        let part = graph.partition_into_weakly_connected_components();
        assert_eq!(part.number_of_classes(), 4);
        assert!(graph.vertices().all(|u| part.class_of_node(u).is_some()));

        assert_eq!(part.class_of_node(1), part.class_of_node(2));
        assert_eq!(part.class_of_node(1), part.class_of_node(3));
        assert_eq!(part.class_of_node(4), part.class_of_node(5));
        assert_ne!(part.class_of_node(1), part.class_of_node(5));
        assert_ne!(part.class_of_node(0), part.class_of_node(6));
    }

    #[test]
    fn weak_components_of_empty_graph() {
        let graph = Network::new(0);
        assert_eq!(graph.weakly_connected_components().count(), 0);
    }

    #[test]
    pub fn scc() {
        let graph = Network::from_edges(
            8,
            [
                (0, 1),
                (1, 2),
                (1, 4),
                (1, 5),
                (2, 6),
                (2, 3),
                (3, 2),
                (3, 7),
                (4, 0),
                (4, 5),
                (5, 6),
                (6, 5),
                (7, 3),
                (7, 6),
            ],
        );

        let sccs = graph.strongly_connected_components().collect_vec();
        assert_eq!(sccs.len(), 3);

        let sccs = sort_components(sccs);
        assert_eq!(sccs[0], [0, 1, 4]);
        assert_eq!(sccs[1], [2, 3, 7]);
        assert_eq!(sccs[2], [5, 6]);
    }

    #[test]
    pub fn scc_singletons_and_loops() {
        let graph = Network::from_edges(6, [(0, 1), (1, 0), (2, 2), (4, 5), (5, 4)]);

        let sccs = sort_components(graph.strongly_connected_components().collect_vec());
        assert_eq!(sccs.len(), 4);
        assert_eq!(sccs[0], [0, 1]);
        assert_eq!(sccs[1], [2]);
        assert_eq!(sccs[2], [3]);
        assert_eq!(sccs[3], [4, 5]);
    }

    #[test]
    pub fn scc_tree() {
        let graph = Network::from_edges(7, [(0, 1), (1, 2), (1, 3), (1, 4), (3, 5), (3, 6)]);

        let mut sccs = graph.strongly_connected_components().collect_vec();
        // in a directed tree each vertex is a strongly connected component
        assert_eq!(sccs.len(), 7);

        sccs.sort_by(|a, b| a[0].cmp(&b[0]));
        for (i, scc) in sccs.iter().enumerate() {
            assert_eq!(i as Node, scc[0]);
        }
    }

    #[test]
    fn scc_undirected_follows_components() {
        let graph = Network::from_undirected_edges(5, [(0, 1), (1, 2), (3, 4)]);
        let sccs = sort_components(graph.strongly_connected_components().collect_vec());
        assert_eq!(sccs, vec![vec![0, 1, 2], vec![3, 4]]);
    }

    #[test]
    fn scc_random_covers_all_nodes() {
        let rng = &mut Pcg64Mcg::seed_from_u64(1234);

        for i in 0..10 {
            let n = 1000;
            let graph = random_network(rng, n, 100 * i, true);
            let part = graph.partition_into_strongly_connected_components();
            assert!(graph.vertices().all(|u| part.class_of_node(u).is_some()));
            for Edge(u, v) in graph.edges() {
                // a cycle through (u, v) requires a way back
                if part.class_of_edge(u, v).is_some() && u != v {
                    assert!(graph.bfs(v, Direction::Out).any(|w| w == u));
                }
            }
        }
    }

    #[test]
    fn scc_long_cycle() {
        // assert that we can deal with very deep stacks
        let n: Node = 10_000;
        let mut graph = Network::new(n);
        graph.connect_cycle(0..n);
        let sccs = graph.strongly_connected_components().collect_vec();
        assert_eq!(sccs.len(), 1);
        assert_eq!(sccs[0].len(), n as usize);
    }
}
