/*!
# Liu Controllability Model

Structural controllability of linear dynamics after Liu, Slotine and Barabási: a node is
controlled "for free" if it is matched by a predecessor in a maximum matching of the
bipartite out-copy/in-copy reduction; every unmatched node needs its own input signal.

With a target set, matching is restricted round by round to the predecessors of the
current frontier of nodes that still have to be reached, so only what is necessary to
control the targets is matched.

Edge classification follows the residual graph filtering of Régin (AAAI '94): an edge is
*ordinary* if it lies on an even alternating path from a free node or on an alternating
cycle, *critical* if it is matched but not ordinary, and *redundant* otherwise.
*/

use std::collections::VecDeque;

use fxhash::FxHashMap;
use itertools::Itertools;
use tracing::{debug, trace, warn};

use super::*;
use crate::{ControlError, algo::*, utils::DirectedMatching};

/// Controllability model for linear dynamics based on maximum matchings
#[derive(Debug, Clone, Default)]
pub struct LiuControllabilityModel<'a> {
    graph: Option<&'a Network>,
    targets: Option<&'a [Node]>,
    matching: DirectedMatching,
    driver_nodes: Vec<Node>,
    control_paths: Vec<ControlPath>,
}

impl<'a> LiuControllabilityModel<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a graph
    pub fn with_graph(mut self, graph: &'a Network) -> Self {
        self.set_graph(Some(graph));
        self
    }

    /// Restricts control to `targets`
    pub fn with_targets(mut self, targets: &'a [Node]) -> Self {
        self.set_targets(Some(targets));
        self
    }

    /// The matching computed by the last call to `calculate`
    pub fn matching(&self) -> &DirectedMatching {
        &self.matching
    }

    fn clear_results(&mut self) {
        self.matching = DirectedMatching::new(self.graph.map_or(0, |g| g.number_of_nodes()));
        self.driver_nodes.clear();
        self.control_paths.clear();
    }
}

impl<'a> ControllabilityModel<'a> for LiuControllabilityModel<'a> {
    fn kind(&self) -> ModelKind {
        ModelKind::Liu
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
        let graph = self.graph.ok_or(ControlError::NoGraphAttached)?;
        self.clear_results();

        let mut driver_nodes = match self.targets {
            None => {
                self.matching = untargeted_matching(graph);
                graph
                    .vertices()
                    .filter(|&u| !self.matching.is_matched(u))
                    .collect_vec()
            }
            Some(targets) => {
                let targets = targets
                    .iter()
                    .copied()
                    .filter(|&t| t < graph.number_of_nodes())
                    .sorted_unstable()
                    .dedup()
                    .collect_vec();

                let n = graph.number_of_nodes();
                self.matching = targeted_matching(graph, &targets);
                cleanup_targeted_matching(&mut self.matching, n, &targets);

                // cutting a cycle leaves its remainder dangling behind the cut node
                targeted_driver_nodes(&mut self.matching, &targets);
                cleanup_targeted_matching(&mut self.matching, n, &targets);
                targeted_driver_nodes(&mut self.matching, &targets)
            }
        };

        self.control_paths = decompose_into_control_paths(graph, &self.matching, &driver_nodes);

        if driver_nodes.is_empty() && !graph.is_empty() {
            warn!("no driver node found, using node 0 as input");
            driver_nodes.push(0);
        }

        self.driver_nodes = driver_nodes;

        debug!(
            model = "liu",
            targeted = self.targets.is_some(),
            driver_nodes = self.driver_nodes.len(),
            control_paths = self.control_paths.len(),
            matched = self.matching.number_of_matches(),
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
        fraction(
            self.driver_nodes.len(),
            self.graph.map_or(0, |g| g.len()),
        )
    }

    fn supports_edge_classes(&self) -> bool {
        self.targets.is_none()
    }

    fn edge_classes(&self) -> Result<Vec<EdgeClass>> {
        let graph = self.graph.ok_or(ControlError::NoGraphAttached)?;
        if !self.supports_edge_classes() {
            return Err(ControlError::UnsupportedOperation(
                "edge classification is not supported for targeted controllability".into(),
            ));
        }

        Ok(classify_edges(graph, &self.matching))
    }

    fn clone_model(&self) -> Box<dyn ControllabilityModel<'a> + 'a> {
        let mut model = LiuControllabilityModel::new();
        model.set_graph(self.graph);
        model.set_targets(self.targets);
        Box::new(model)
    }
}

/// Nodes `0..n` are the out-copies, nodes `n..2n` the in-copies of the bipartite reduction
fn untargeted_matching(graph: &Network) -> DirectedMatching {
    let n = graph.number_of_nodes();
    let mut bipartite = Network::new(2 * n);

    for Edge(u, v) in graph.edges() {
        bipartite.add_edge(u, n + v);
        if graph.is_undirected() {
            bipartite.add_edge(v, n + u);
        }
    }

    let is_left = (0..2 * n).map(|u| u < n).collect_vec();
    let mut mate = bipartite.maximum_bipartite_matching(&is_left);

    // the mate of an in-copy is an out-copy, whose id is already the original node
    DirectedMatching::from_in_mapping(mate.split_off(n as usize))
}

/// Matches the targets to their predecessors, then those predecessors to theirs, and so on.
/// Frontier nodes that stay unmatched in a round are matched to themselves so that they
/// never re-enter a frontier; these placeholders are removed at the end.
fn targeted_matching(graph: &Network, targets: &[Node]) -> DirectedMatching {
    let mut matching = DirectedMatching::new(graph.number_of_nodes());
    let mut placeholders = Vec::new();
    let mut frontier = targets.to_vec();
    let mut round = 0;

    while !frontier.is_empty() {
        round += 1;

        // left side: predecessors (ids 0..l), right side: frontier (ids l..l+r)
        let mut left_ids: FxHashMap<Node, Node> = FxHashMap::default();
        let mut left_nodes = Vec::new();
        for &v in &frontier {
            for u in graph.neighbors_of(v, Direction::In) {
                left_ids.entry(u).or_insert_with(|| {
                    left_nodes.push(u);
                    (left_nodes.len() - 1) as Node
                });
            }
        }

        if left_nodes.is_empty() {
            trace!(round, frontier = frontier.len(), "frontier has no predecessors");
            break;
        }

        let l = left_nodes.len() as Node;
        let mut bipartite = Network::new(l + frontier.len() as Node);
        for (r, &v) in frontier.iter().enumerate() {
            for u in graph.neighbors_of(v, Direction::In) {
                bipartite.add_edge(left_ids[&u], l + r as Node);
            }
        }

        let is_left = bipartite.vertices().map(|x| x < l).collect_vec();
        let mate = bipartite.maximum_bipartite_matching(&is_left);

        let mut next_frontier = Vec::new();
        for (r, &v) in frontier.iter().enumerate() {
            match mate[(l + r as Node) as usize].node() {
                Some(x) => {
                    let u = left_nodes[x as usize];
                    matching.set_match(u, v);
                    next_frontier.push(u);
                }
                None => {
                    matching.set_match(v, v);
                    placeholders.push(v);
                }
            }
        }

        trace!(
            round,
            frontier = frontier.len(),
            predecessors = left_nodes.len(),
            unmatched = frontier.len() - next_frontier.len(),
            "targeted matching round"
        );

        next_frontier.retain(|&u| !matching.is_matched(u));
        next_frontier.sort_unstable();
        next_frontier.dedup();
        frontier = next_frontier;
    }

    for v in placeholders {
        if matching.match_in(v) == Some(v) {
            matching.unmatch(v);
        }
    }

    matching
}

/// Removes matches that do not contribute to reaching a target, so that every stem ends
/// in a target node:
/// - a non-target that is matched but matches nothing loses its incoming match,
/// - a non-target that is unmatched and matches exactly one node loses that match.
fn cleanup_targeted_matching(matching: &mut DirectedMatching, n: NumNodes, targets: &[Node]) {
    let mut is_target = vec![false; n as usize];
    for &t in targets {
        is_target[t as usize] = true;
    }

    let mut queue: VecDeque<Node> = (0..n).collect();
    while let Some(v) = queue.pop_front() {
        if is_target[v as usize] {
            continue;
        }

        if matching.is_matched(v) && !matching.is_matching(v) {
            if let Some(u) = matching.unmatch(v) {
                queue.push_back(u);
            }
        } else if !matching.is_matched(v) && matching.is_matching_exactly_one(v) {
            let w = matching.match_out(v)[0];
            matching.unmatch(w);
            queue.push_back(w);
        }
    }
}

/// Walks back from every target along incoming matches. The walk ends in an unmatched node,
/// which becomes a driver node, or closes a cycle, which is cut at the revisited node.
fn targeted_driver_nodes(matching: &mut DirectedMatching, targets: &[Node]) -> Vec<Node> {
    let mut walk_of = vec![0u32; matching.len()];
    let mut driver_nodes = Vec::new();

    for (walk, &target) in (1u32..).zip(targets) {
        let mut u = target;
        loop {
            let seen = walk_of[u as usize];
            if seen == walk {
                matching.unmatch(u);
                driver_nodes.push(u);
                break;
            }
            if seen != 0 {
                break;
            }
            walk_of[u as usize] = walk;

            match matching.match_in(u) {
                Some(p) => u = p,
                None => {
                    driver_nodes.push(u);
                    break;
                }
            }
        }
    }

    driver_nodes.sort_unstable();
    driver_nodes.dedup();
    driver_nodes
}

/// Grows a stem from every driver node along outgoing matches (a stem forks into copies
/// where a node matches several nodes), then turns the remaining matched nodes into buds.
fn decompose_into_control_paths(
    graph: &Network,
    matching: &DirectedMatching,
    driver_nodes: &[Node],
) -> Vec<ControlPath> {
    let n = graph.len();
    let mut paths = Vec::new();
    let mut stem_of: Vec<Option<usize>> = vec![None; n];
    let mut used = vec![false; n];

    for &driver in driver_nodes {
        used[driver as usize] = true;
        stem_of[driver as usize] = Some(paths.len());
        paths.push(ControlPath::stem(vec![driver]));

        let mut queue = VecDeque::from([paths.len() - 1]);
        while let Some(idx) = queue.pop_front() {
            let Some(tip) = paths[idx].tip() else {
                continue;
            };

            let successors = matching
                .match_out(tip)
                .iter()
                .copied()
                .filter(|&v| !used[v as usize])
                .collect_vec();

            let Some((&first, rest)) = successors.split_first() else {
                continue;
            };

            for &v in rest {
                let mut fork = paths[idx].clone();
                fork.push(v);
                used[v as usize] = true;
                stem_of[v as usize] = Some(paths.len());
                queue.push_back(paths.len());
                paths.push(fork);
            }

            paths[idx].push(first);
            used[first as usize] = true;
            stem_of[first as usize] = Some(idx);
            queue.push_back(idx);
        }
    }

    for u in graph.vertices() {
        if used[u as usize] || !matching.is_matched(u) {
            continue;
        }

        let mut nodes = Vec::new();
        let mut v = u;
        while !used[v as usize] {
            used[v as usize] = true;
            nodes.push(v);
            v = matching
                .match_in(v)
                .expect("a node on a bud is matched by its predecessor");
        }
        nodes.reverse();

        let mut bud = ControlPath::bud(nodes);
        let stem = bud.nodes().iter().find_map(|&v| {
            graph
                .neighbors_of(v, Direction::In)
                .find_map(|w| stem_of[w as usize])
        });
        if let Some(stem) = stem {
            bud.attach_to_stem(stem);
        }

        paths.push(bud);
    }

    paths
}

/// Classifies edges via the residual graph of the bipartite reduction: matched edges point
/// from out-copy `u` to in-copy `n + v`, unmatched edges the other way round. Mirrored
/// copies of undirected edges get the ids `m..2m`.
fn classify_edges(graph: &Network, matching: &DirectedMatching) -> Vec<EdgeClass> {
    let n = graph.number_of_nodes();
    let m = graph.number_of_edges();
    let mut result = vec![EdgeClass::Redundant; m as usize];

    if m == 0 {
        return result;
    }

    // the matching relates nodes, so among parallel edges only the first one counts as matched
    let is_matched_edge = |e: EdgeId, u: Node, v: Node| {
        matching.match_in(v) == Some(u) && graph.edge_id_between(u, v) == Some(e)
    };

    let mut residual = Network::new(2 * n);
    let orientations = if graph.is_directed() { 1 } else { 2 };
    for mirrored in 0..orientations {
        for e in graph.edge_ids() {
            let Edge(mut u, mut v) = graph.endpoints(e);
            if mirrored == 1 {
                std::mem::swap(&mut u, &mut v);
            }

            if is_matched_edge(e, u, v) {
                residual.add_edge(u, n + v);
            } else {
                residual.add_edge(n + v, u);
            }
        }
    }
    let original_edge = |r: EdgeId| r % m;

    let seeds = graph
        .vertices()
        .filter(|&u| !matching.is_matched(u))
        .map(|u| n + u)
        .chain(graph.vertices().filter(|&u| !matching.is_matching(u)))
        .collect_vec();

    for dir in [Direction::In, Direction::Out] {
        let mut seen = vec![false; residual.len()];
        let mut queue = VecDeque::new();
        for &s in &seeds {
            seen[s as usize] = true;
            queue.push_back(s);
        }

        while let Some(x) = queue.pop_front() {
            for r in residual.incident_edges_of(x, dir) {
                result[original_edge(r) as usize] = EdgeClass::Ordinary;
                let y = residual.opposite(r, x);
                if !seen[y as usize] {
                    seen[y as usize] = true;
                    queue.push_back(y);
                }
            }
        }
    }

    let sccs = residual.partition_into_strongly_connected_components();
    for r in residual.edge_ids() {
        let Edge(x, y) = residual.endpoints(r);
        if sccs.class_of_edge(x, y).is_some() {
            result[original_edge(r) as usize] = EdgeClass::Ordinary;
        }
    }

    for (u, v) in matching.matched_pairs() {
        let e = graph
            .edge_id_between(u, v)
            .expect("matched nodes are adjacent");
        if result[e as usize] == EdgeClass::Redundant {
            result[e as usize] = EdgeClass::Critical;
        }
    }

    result
}
