/*!
# Switchboard Controllability Model

Under switchboard dynamics the signals live on the edges, so controllability depends only on
the balance of every node. A node is *divergent* if it has more outgoing than incoming edges
and *balanced* if both degrees agree and are positive. Every divergent node needs an input
signal, and so does every weakly connected component consisting of balanced nodes only.

Control paths are walks: open walks start at driver nodes and drain their surplus of
outgoing edges, the remaining edges decompose into closed walks that get spliced into
whatever path they touch.
*/

use std::collections::VecDeque;

use itertools::Itertools;
use tracing::{debug, trace, warn};

use super::*;
use crate::{ControlError, algo::*};

/// Controllability model for switchboard dynamics
#[derive(Debug, Clone, Default)]
pub struct SwitchboardControllabilityModel<'a> {
    graph: Option<&'a Network>,
    targets: Option<&'a [Node]>,
    measure: ControllabilityMeasure,
    driver_nodes: Vec<Node>,
    control_paths: Vec<ControlPath>,
}

fn targets_not_supported() -> ControlError {
    ControlError::UnsupportedOperation(
        "switchboard dynamics does not allow restrictions on the set of target nodes".into(),
    )
}

impl<'a> SwitchboardControllabilityModel<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a graph
    pub fn with_graph(mut self, graph: &'a Network) -> Self {
        self.set_graph(Some(graph));
        self
    }

    /// Sets what [`ControllabilityModel::controllability`] reports
    pub fn with_measure(mut self, measure: ControllabilityMeasure) -> Self {
        self.measure = measure;
        self
    }

    pub fn measure(&self) -> ControllabilityMeasure {
        self.measure
    }

    /// Changing the measure keeps computed results, only the reported value changes
    pub fn set_measure(&mut self, measure: ControllabilityMeasure) {
        self.measure = measure;
    }

    fn clear_results(&mut self) {
        self.driver_nodes.clear();
        self.control_paths.clear();
    }

    fn graph_without_targets(&self) -> Result<&'a Network> {
        let graph = self.graph.ok_or(ControlError::NoGraphAttached)?;
        if self.targets.is_some() {
            return Err(targets_not_supported());
        }
        Ok(graph)
    }
}

impl<'a> ControllabilityModel<'a> for SwitchboardControllabilityModel<'a> {
    fn kind(&self) -> ModelKind {
        ModelKind::Switchboard
    }

    fn graph(&self) -> Option<&'a Network> {
        self.graph
    }

    fn set_graph(&mut self, graph: Option<&'a Network>) {
        self.graph = graph;
        self.clear_results();
    }

    fn targets(&self) -> Option<&'a [Node]> {
        self.targets
    }

    fn set_targets(&mut self, targets: Option<&'a [Node]>) {
        self.targets = targets;
        self.clear_results();
    }

    fn calculate(&mut self) -> Result<()> {
        let graph = self.graph_without_targets()?;
        self.clear_results();

        let mut driver_nodes = switchboard_driver_nodes(graph);
        self.control_paths = decompose_into_walks(graph, &driver_nodes);

        if driver_nodes.is_empty() && !graph.is_empty() {
            warn!("no driver node found, using node 0 as input");
            driver_nodes.push(0);
        }
        driver_nodes.sort_unstable();
        self.driver_nodes = driver_nodes;

        debug!(
            model = "switchboard",
            driver_nodes = self.driver_nodes.len(),
            control_paths = self.control_paths.len(),
            "controllability calculated"
        );

        Ok(())
    }

    fn driver_nodes(&self) -> &[Node] {
        &self.driver_nodes
    }

    fn control_paths(&self) -> &[ControlPath] {
        &self.control_paths
    }

    fn controllability(&self) -> f64 {
        let Some(graph) = self.graph else {
            return 0.0;
        };

        match self.measure {
            ControllabilityMeasure::Node => fraction(self.driver_nodes.len(), graph.len()),
            ControllabilityMeasure::Edge => {
                // balanced components are not counted here
                let signals = self
                    .control_paths
                    .iter()
                    .filter(|p| p.needs_input_signal())
                    .count();
                fraction(signals, graph.number_of_edges() as usize)
            }
        }
    }

    fn supports_edge_classes(&self) -> bool {
        self.targets.is_none()
    }

    fn edge_classes(&self) -> Result<Vec<EdgeClass>> {
        Ok(self
            .changes_in_driver_nodes_after_edge_removal()?
            .into_iter()
            .map(|change| match change.signum() {
                -1 => EdgeClass::Distinguished,
                0 => EdgeClass::Redundant,
                _ => EdgeClass::Critical,
            })
            .collect())
    }

    fn changes_in_driver_nodes_after_edge_removal(&self) -> Result<Vec<i64>> {
        let graph = self.graph_without_targets()?;

        // in-degree minus out-degree
        let mut diff = graph
            .vertices()
            .map(|u| {
                graph.degree_of(u, Direction::In) as i64 - graph.degree_of(u, Direction::Out) as i64
            })
            .collect_vec();
        let mut probe = BalanceProbe::new(graph);

        let changes = graph
            .edge_ids()
            .map(|e| {
                let Edge(u, v) = graph.endpoints(e);
                if u == v {
                    // removing a self-loop keeps every balance
                    return 0;
                }

                let (u_idx, v_idx) = (u as usize, v as usize);
                let mut change = 0;

                // u stops being divergent
                if diff[u_idx] == -1 {
                    change -= 1;
                }
                // v becomes divergent
                if diff[v_idx] == 0 {
                    change += 1;
                }
                // both may be part of a balanced component that already has a driver
                if diff[u_idx] == 0
                    && diff[v_idx] == 0
                    && probe.is_balanced_component(u, None, &diff)
                {
                    change -= 1;
                }

                // v or u becomes balanced and may close a balanced component
                for (x, other, trigger) in [(v, u, 1), (u, v, -1)] {
                    if diff[x as usize] != trigger {
                        continue;
                    }
                    diff[v_idx] -= 1;
                    diff[u_idx] += 1;
                    if probe.is_balanced_component(x, Some(other), &diff) {
                        change += 1;
                    }
                    diff[v_idx] += 1;
                    diff[u_idx] -= 1;
                }

                change
            })
            .collect();

        Ok(changes)
    }

    fn clone_model(&self) -> Box<dyn ControllabilityModel<'a> + 'a> {
        let mut model = SwitchboardControllabilityModel::new().with_measure(self.measure);
        model.set_graph(self.graph);
        model.set_targets(self.targets);
        Box::new(model)
    }
}

/// Divergent nodes plus one representative of every weakly connected component whose nodes
/// are all balanced
fn switchboard_driver_nodes(graph: &Network) -> Vec<Node> {
    let out_degree = |u: Node| graph.degree_of(u, Direction::Out);
    let in_degree = |u: Node| graph.degree_of(u, Direction::In);
    let is_balanced = |u: Node| out_degree(u) == in_degree(u) && out_degree(u) > 0;

    let mut driver_nodes = graph
        .vertices()
        .filter(|&u| out_degree(u) > in_degree(u))
        .collect_vec();

    if graph.vertices().any(is_balanced) {
        let components = graph.partition_into_weakly_connected_components();
        let k = components.number_of_classes() as usize;
        let mut representative: Vec<Option<Node>> = vec![None; k];
        let mut all_balanced = vec![true; k];

        for u in graph.vertices() {
            let Some(class) = components.class_of_node(u) else {
                continue;
            };
            representative[class as usize].get_or_insert(u);
            all_balanced[class as usize] &= is_balanced(u);
        }

        let before = driver_nodes.len();
        driver_nodes.extend(
            representative
                .into_iter()
                .zip(all_balanced)
                .filter_map(|(u, balanced)| u.filter(|_| balanced)),
        );
        trace!(
            balanced_components = driver_nodes.len() - before,
            "balanced components need extra drivers"
        );
    }

    driver_nodes
}

/// Per-node bookkeeping of the edges that are not yet covered by a walk
struct WalkState<'g> {
    graph: &'g Network,
    edge_used: Vec<bool>,
    out_degree: Vec<NumNodes>,
    in_degree: Vec<NumNodes>,
    /// Position of the first incident edge of a node that may still be unused
    cursor: Vec<usize>,
}

impl<'g> WalkState<'g> {
    fn new(graph: &'g Network) -> Self {
        Self {
            graph,
            edge_used: vec![false; graph.number_of_edges() as usize],
            out_degree: graph.vertices().map(|u| graph.degree_of(u, Direction::Out)).collect(),
            in_degree: graph.vertices().map(|u| graph.degree_of(u, Direction::In)).collect(),
            cursor: vec![0; graph.len()],
        }
    }

    fn is_divergent(&self, u: Node) -> bool {
        self.out_degree[u as usize] > self.in_degree[u as usize]
    }

    fn has_remaining_out_edges(&self, u: Node) -> bool {
        self.out_degree[u as usize] > 0
    }

    fn next_unused_edge(&mut self, u: Node) -> Option<EdgeId> {
        let cursor = &mut self.cursor[u as usize];
        for e in self.graph.incident_edges_of(u, Direction::Out).skip(*cursor) {
            *cursor += 1;
            if !self.edge_used[e as usize] {
                return Some(e);
            }
        }
        None
    }

    /// Follows unused edges from `start` until it gets stuck. Returns `None` if `start` has no
    /// unused edge left.
    fn walk_from(&mut self, start: Node) -> Option<ControlPath> {
        let mut nodes = vec![start];
        let mut u = start;

        while let Some(e) = self.next_unused_edge(u) {
            self.edge_used[e as usize] = true;
            self.out_degree[u as usize] -= 1;
            u = self.graph.head_from(e, u);
            self.in_degree[u as usize] -= 1;
            nodes.push(u);
        }

        if nodes.len() == 1 {
            None
        } else if u != start {
            Some(ControlPath::open_walk(nodes))
        } else {
            nodes.pop();
            Some(ControlPath::closed_walk(nodes))
        }
    }
}

/// Paths indexed by insertion order together with the path that first covered each node.
/// Slots of paths that were spliced into another path are emptied.
struct PathArena {
    paths: Vec<Option<ControlPath>>,
    owner: Vec<Option<usize>>,
}

impl PathArena {
    fn new(n: usize) -> Self {
        Self {
            paths: Vec::new(),
            owner: vec![None; n],
        }
    }

    fn insert(&mut self, path: ControlPath) -> usize {
        let idx = self.paths.len();
        for &u in path.nodes() {
            self.owner[u as usize].get_or_insert(idx);
        }
        self.paths.push(Some(path));
        idx
    }

    /// Path other than `except` that covers a node of `walk`
    fn neighbor_of(&self, walk: &ControlPath, except: Option<usize>) -> Option<usize> {
        walk.nodes()
            .iter()
            .filter_map(|&u| self.owner[u as usize])
            .find(|&idx| Some(idx) != except)
    }

    fn splice(&mut self, target: usize, walk: &ControlPath, from: Option<usize>) {
        let path = self.paths[target]
            .as_mut()
            .expect("owners only refer to live paths");
        let shared = path.extend_with(walk);
        debug_assert!(shared);

        for &u in walk.nodes() {
            let owner = &mut self.owner[u as usize];
            if owner.is_none() || *owner == from {
                *owner = Some(target);
            }
        }
    }

    /// Splices a walk that is not part of the arena into a path it touches
    fn absorb(&mut self, walk: &ControlPath) -> bool {
        match self.neighbor_of(walk, None) {
            Some(target) => {
                self.splice(target, walk, None);
                true
            }
            None => false,
        }
    }

    /// Moves the path at `idx` into another path it touches
    fn merge_away(&mut self, idx: usize) -> bool {
        let Some(walk) = self.paths[idx].take() else {
            return false;
        };
        match self.neighbor_of(&walk, Some(idx)) {
            Some(target) => {
                self.splice(target, &walk, Some(idx));
                true
            }
            None => {
                self.paths[idx] = Some(walk);
                false
            }
        }
    }

    fn into_paths(self) -> Vec<ControlPath> {
        self.paths.into_iter().flatten().collect()
    }
}

/// Covers every edge by exactly one walk. Driver nodes first drain their surplus of outgoing
/// edges into open walks, the remaining edges form closed walks which are merged into the
/// paths they touch.
fn decompose_into_walks(graph: &Network, driver_nodes: &[Node]) -> Vec<ControlPath> {
    let mut state = WalkState::new(graph);
    let mut arena = PathArena::new(graph.len());
    let mut pending = VecDeque::new();

    for &driver in driver_nodes {
        while state.is_divergent(driver) {
            let Some(walk) = state.walk_from(driver) else {
                break;
            };
            arena.insert(walk);
        }
    }

    for u in graph.vertices_range() {
        while state.has_remaining_out_edges(u) {
            match state.walk_from(u) {
                Some(walk) if walk.is_cyclic() => pending.push_back(walk),
                Some(walk) => {
                    arena.insert(walk);
                }
                None => break,
            }
        }
    }

    // merge closed walks into settled paths until nothing changes
    let mut pass = 0;
    loop {
        pass += 1;
        let before = pending.len();
        for _ in 0..before {
            let Some(walk) = pending.pop_front() else {
                break;
            };
            if !arena.absorb(&walk) {
                pending.push_back(walk);
            }
        }
        trace!(
            pass,
            merged = before - pending.len(),
            remaining = pending.len(),
            "merged closed walks"
        );
        if pending.len() == before {
            break;
        }
    }

    // merge the remaining closed walks among each other
    let leftover = pending.into_iter().map(|walk| arena.insert(walk)).collect_vec();
    loop {
        let mut merged = false;
        for &idx in &leftover {
            merged |= arena.merge_away(idx);
        }
        if !merged {
            break;
        }
    }

    arena.into_paths()
}

/// Checks whether a node lies in a non-trivial weakly connected component of balanced
/// nodes, treating one node as if it were removed
struct BalanceProbe<'g> {
    graph: &'g Network,
    visited: Vec<u32>,
    stamp: u32,
    queue: VecDeque<Node>,
}

impl<'g> BalanceProbe<'g> {
    fn new(graph: &'g Network) -> Self {
        Self {
            graph,
            visited: vec![0; graph.len()],
            stamp: 0,
            queue: VecDeque::new(),
        }
    }

    fn is_balanced_component(&mut self, v: Node, except: Option<Node>, diff: &[i64]) -> bool {
        if diff[v as usize] != 0 {
            return false;
        }

        let graph = self.graph;
        let mut neighbors = graph.neighbors_of(v, Direction::All);
        match (neighbors.next(), neighbors.next()) {
            (None, _) => return false,
            (Some(w), None) if Some(w) == except => return false,
            _ => {}
        }

        self.stamp += 1;
        let stamp = self.stamp;
        self.visited[v as usize] = stamp;
        if let Some(x) = except {
            self.visited[x as usize] = stamp;
        }

        self.queue.clear();
        self.queue.push_back(v);
        while let Some(x) = self.queue.pop_front() {
            for y in graph.neighbors_of(x, Direction::All) {
                if self.visited[y as usize] == stamp {
                    continue;
                }
                if diff[y as usize] != 0 {
                    return false;
                }
                self.visited[y as usize] = stamp;
                self.queue.push_back(y);
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    use super::*;
    use crate::{
        gens::GeneratorSubstructures,
        testing::{random_network, random_simple_network},
    };

    fn calculated(graph: &Network) -> SwitchboardControllabilityModel<'_> {
        let mut model = SwitchboardControllabilityModel::new().with_graph(graph);
        model.calculate().unwrap();
        model
    }

    /// Every edge is covered by exactly one step of exactly one path
    fn assert_paths_partition_edges(model: &SwitchboardControllabilityModel, graph: &Network) {
        let mut covered = vec![0; graph.number_of_edges() as usize];
        for path in model.control_paths() {
            for e in path.edges(graph) {
                covered[e as usize] += 1;
            }
        }
        assert!(covered.iter().all(|&c| c == 1), "{covered:?}");
    }

    #[test]
    fn directed_path() {
        let mut graph = Network::new(4);
        graph.connect_path([0, 1, 2, 3]);

        let model = calculated(&graph);
        assert_eq!(model.driver_nodes(), &[0]);
        assert_eq!(model.control_paths(), &[ControlPath::open_walk(vec![0, 1, 2, 3])]);
        assert_eq!(model.controllability(), 0.25);
    }

    #[test]
    fn directed_cycle_is_balanced_component() {
        let mut graph = Network::new(3);
        graph.connect_cycle([0, 1, 2]);

        let model = calculated(&graph);
        assert_eq!(model.driver_nodes(), &[0]);
        assert_eq!(model.control_paths(), &[ControlPath::closed_walk(vec![0, 1, 2])]);
        assert_paths_partition_edges(&model, &graph);
    }

    #[test]
    fn closed_walk_is_spliced_into_open_walk() {
        // path 0 -> 1 -> 2 with cycle 1 -> 3 -> 1 attached
        let graph = Network::from_edges(4, [(0, 1), (1, 2), (1, 3), (3, 1)]);

        let model = calculated(&graph);
        assert_eq!(model.driver_nodes(), &[0]);
        assert_eq!(model.control_paths().len(), 1);

        let path = &model.control_paths()[0];
        assert_eq!(path.kind(), PathKind::OpenWalk);
        assert_eq!(path.root(), Some(0));
        assert_eq!(path.tip(), Some(2));
        assert_eq!(path.len(), 5);
        assert_paths_partition_edges(&model, &graph);
    }

    #[test]
    fn divergent_node_feeding_two_cycles() {
        let graph = Network::from_edges(5, [(0, 1), (1, 2), (2, 1), (0, 3), (3, 4), (4, 3)]);

        let model = calculated(&graph);
        assert_eq!(model.driver_nodes(), &[0]);
        assert_eq!(
            model.control_paths(),
            &[
                ControlPath::open_walk(vec![0, 1, 2, 1]),
                ControlPath::open_walk(vec![0, 3, 4, 3])
            ]
        );
        assert_paths_partition_edges(&model, &graph);
    }

    #[test]
    fn out_star_drives_center() {
        let mut graph = Network::new(4);
        graph.connect_out_star(0, [1, 2, 3]);

        let model = calculated(&graph);
        assert_eq!(model.driver_nodes(), &[0]);
        assert_eq!(model.control_paths().len(), 3);
        assert!(model.control_paths().iter().all(|p| p.kind() == PathKind::OpenWalk));
    }

    #[test]
    fn edgeless_graph_uses_fallback_driver() {
        let graph = Network::new(3);
        let model = calculated(&graph);
        assert_eq!(model.driver_nodes(), &[0]);
        assert!(model.control_paths().is_empty());
        assert!(model.edge_classes().unwrap().is_empty());
    }

    #[test]
    fn edge_measure() {
        let graph = Network::from_edges(5, [(0, 1), (1, 2), (3, 4), (4, 3)]);
        let mut model = SwitchboardControllabilityModel::new()
            .with_graph(&graph)
            .with_measure(ControllabilityMeasure::Edge);
        model.calculate().unwrap();

        // driver 0 and the balanced component {3, 4}
        assert_eq!(model.driver_nodes(), &[0, 3]);
        assert_eq!(model.controllability(), 0.25);

        model.set_measure(ControllabilityMeasure::Node);
        assert_eq!(model.controllability(), 0.4);
    }

    #[test]
    fn targets_are_rejected() {
        let graph = Network::from_edges(2, [(0, 1)]);
        let targets = [1];
        let mut model = SwitchboardControllabilityModel::new().with_graph(&graph);
        model.set_targets(Some(&targets));

        assert!(!model.supports_edge_classes());
        assert!(matches!(model.calculate(), Err(ControlError::UnsupportedOperation(_))));
        assert!(model.edge_classes().is_err());
        assert!(model.changes_in_driver_nodes_after_edge_removal().is_err());
    }

    #[test]
    fn changes_after_edge_removal() {
        // 0 -> 1 -> 2: removing 0 -> 1 makes 1 divergent instead of 0
        let mut graph = Network::new(3);
        graph.connect_path([0, 1, 2]);
        let model = calculated(&graph);
        assert_eq!(model.changes_in_driver_nodes_after_edge_removal().unwrap(), vec![0, 0]);
        assert_eq!(model.edge_classes().unwrap(), vec![EdgeClass::Redundant; 2]);

        // removing any edge of a cycle leaves a path: one driver either way
        let mut graph = Network::new(3);
        graph.connect_cycle([0, 1, 2]);
        let model = calculated(&graph);
        assert_eq!(model.changes_in_driver_nodes_after_edge_removal().unwrap(), vec![0, 0, 0]);

        // 0 -> 1 <- 2: removing an edge turns a divergent node isolated
        let graph = Network::from_edges(3, [(0, 1), (2, 1)]);
        let model = calculated(&graph);
        assert_eq!(model.driver_nodes(), &[0, 2]);
        assert_eq!(model.changes_in_driver_nodes_after_edge_removal().unwrap(), vec![-1, -1]);
        assert_eq!(model.edge_classes().unwrap(), vec![EdgeClass::Distinguished; 2]);

        // removing the middle edge of 0 -> 1 -> 2 -> 3 splits the path in two
        let mut graph = Network::new(4);
        graph.connect_path([0, 1, 2, 3]);
        let model = calculated(&graph);
        assert_eq!(model.changes_in_driver_nodes_after_edge_removal().unwrap(), vec![0, 1, 0]);
        assert_eq!(
            model.edge_classes().unwrap(),
            vec![EdgeClass::Redundant, EdgeClass::Critical, EdgeClass::Redundant]
        );
    }

    #[test]
    fn self_loops_never_change_drivers() {
        // removing 0 -> 1 isolates 0 and leaves the self-loop as a balanced component
        let graph = Network::from_edges(2, [(0, 1), (1, 1)]);
        let model = calculated(&graph);
        assert_eq!(model.changes_in_driver_nodes_after_edge_removal().unwrap(), vec![0, 0]);
        assert_paths_partition_edges(&model, &graph);
    }

    #[test]
    fn removal_closing_balanced_component_adds_driver() {
        // 3 -> 0 -> 1 feeding the cycle 1 -> 2 -> 1
        let graph = Network::from_edges(4, [(3, 0), (0, 1), (1, 2), (2, 1)]);
        let model = calculated(&graph);
        assert_eq!(model.driver_nodes(), &[3]);

        let changes = model.changes_in_driver_nodes_after_edge_removal().unwrap();
        // 3 becomes isolated while 0 turns divergent
        assert_eq!(changes[0], 0);
        // the cycle is cut off and needs its own driver
        assert_eq!(changes[1], 1);
        // 2 turns divergent next to 3
        assert_eq!(changes[2], 1);
        // 3 -> 0 -> 1 -> 2 is a single path
        assert_eq!(changes[3], 0);
        assert_eq!(changes.len(), 4);

        assert_eq!(
            model.edge_classes().unwrap(),
            vec![
                EdgeClass::Redundant,
                EdgeClass::Critical,
                EdgeClass::Critical,
                EdgeClass::Redundant
            ]
        );
    }

    #[test]
    fn undirected_components_get_one_driver_each() {
        let graph = Network::from_undirected_edges(5, [(0, 1), (1, 2), (3, 4)]);
        let model = calculated(&graph);
        assert_eq!(model.driver_nodes(), &[0, 3]);
        assert_paths_partition_edges(&model, &graph);
    }

    #[test]
    fn random_graphs_satisfy_invariants() {
        let rng = &mut Pcg64Mcg::seed_from_u64(5);
        for directed in [true, false] {
            for _ in 0..50 {
                let graph = random_simple_network(rng, 25, 50, directed);
                let model = calculated(&graph);

                assert!(!model.driver_nodes().is_empty());
                assert!(model.driver_nodes().is_sorted());
                assert_paths_partition_edges(&model, &graph);

                // directed leftovers are Eulerian, so only drivers start open walks
                for path in model.control_paths() {
                    if directed && path.kind() == PathKind::OpenWalk {
                        assert!(model.driver_nodes().contains(&path.root().unwrap()));
                    }
                }

                let divergent = graph
                    .vertices()
                    .filter(|&u| {
                        graph.degree_of(u, Direction::Out) > graph.degree_of(u, Direction::In)
                    })
                    .count();
                assert!(model.driver_nodes().len() >= divergent);
            }
        }
    }

    #[test]
    fn multigraphs_are_decomposed() {
        let rng = &mut Pcg64Mcg::seed_from_u64(6);
        for _ in 0..50 {
            let graph = random_network(rng, 15, 40, true);
            let model = calculated(&graph);
            let steps: usize = model
                .control_paths()
                .iter()
                .map(|p| if p.is_cyclic() { p.len() } else { p.len() - 1 })
                .sum();
            assert_eq!(steps, graph.number_of_edges() as usize);
            assert_eq!(model.edge_classes().unwrap().len(), steps);
        }
    }
}
