/*!
# Control Paths

A control path is the route along which one input signal propagates. Matching-based models
produce **stems** (open paths starting at a driver node) and **buds** (cycles that may ride
on the signal of a stem), degree-based models produce **open walks** and **closed walks**.

All four share a node sequence; they differ in whether the sequence is read as cyclic and
whether it needs an input signal of its own.
*/

use std::fmt::{self, Display};

use itertools::Itertools;
use serde::Serialize;

use crate::prelude::*;

/// The variant of a [`ControlPath`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PathKind {
    /// Open path whose first node is a driver node
    Stem,
    /// Cycle, optionally attached to the stem with the given index in the model's path list
    Bud { stem: Option<usize> },
    /// Open walk of the switchboard model
    OpenWalk,
    /// Closed walk of the switchboard model
    ClosedWalk,
}

impl PathKind {
    /// Human readable name of the variant
    pub fn name(&self) -> &'static str {
        match self {
            PathKind::Stem => "Stem",
            PathKind::Bud { .. } => "Bud",
            PathKind::OpenWalk => "Open walk",
            PathKind::ClosedWalk => "Closed walk",
        }
    }

    /// Identifier used in machine readable output
    pub fn as_str(&self) -> &'static str {
        match self {
            PathKind::Stem => "stem",
            PathKind::Bud { .. } => "bud",
            PathKind::OpenWalk => "open_walk",
            PathKind::ClosedWalk => "closed_walk",
        }
    }
}

/// An ordered node sequence together with its [`PathKind`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlPath {
    nodes: Vec<Node>,
    kind: PathKind,
}

impl ControlPath {
    /// Creates a path of the given kind from its nodes
    pub fn new(kind: PathKind, nodes: Vec<Node>) -> Self {
        Self { nodes, kind }
    }

    pub fn stem(nodes: Vec<Node>) -> Self {
        Self::new(PathKind::Stem, nodes)
    }

    pub fn bud(nodes: Vec<Node>) -> Self {
        Self::new(PathKind::Bud { stem: None }, nodes)
    }

    pub fn open_walk(nodes: Vec<Node>) -> Self {
        Self::new(PathKind::OpenWalk, nodes)
    }

    pub fn closed_walk(nodes: Vec<Node>) -> Self {
        Self::new(PathKind::ClosedWalk, nodes)
    }

    pub fn kind(&self) -> PathKind {
        self.kind
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Human readable name of the path variant
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// First node of the path. For a stem this is its driver node.
    pub fn root(&self) -> Option<Node> {
        self.nodes.first().copied()
    }

    /// Last node of the path
    pub fn tip(&self) -> Option<Node> {
        self.nodes.last().copied()
    }

    /// Returns *true* for buds and closed walks, whose last node connects back to the first
    pub fn is_cyclic(&self) -> bool {
        matches!(self.kind, PathKind::Bud { .. } | PathKind::ClosedWalk)
    }

    /// Returns *true* if the path requires an independent input signal
    pub fn needs_input_signal(&self) -> bool {
        !self.is_cyclic()
    }

    /// Index of the stem a bud is attached to
    pub fn attached_stem(&self) -> Option<usize> {
        match self.kind {
            PathKind::Bud { stem } => stem,
            _ => None,
        }
    }

    /// Attaches a bud to the stem with index `stem`.
    /// ** Panics if the path is not a bud **
    pub fn attach_to_stem(&mut self, stem: usize) {
        match &mut self.kind {
            PathKind::Bud { stem: slot } => *slot = Some(stem),
            kind => panic!("only buds can be attached to a stem, not {}", kind.name()),
        }
    }

    /// Appends a node to the end of the path
    pub fn push(&mut self, u: Node) {
        self.nodes.push(u);
    }

    /// Inserts a node in front of the path
    pub fn prepend(&mut self, u: Node) {
        self.nodes.insert(0, u);
    }

    /// Maps the path to the ids of the edges it travels, using the first edge between
    /// consecutive nodes. Cyclic paths include the closing edge; a cyclic path on a single
    /// node contributes its self-loop only if it exists.
    ///
    /// ** Panics if two consecutive nodes are not connected **
    pub fn edges<G: EdgeLookup>(&self, graph: &G) -> Vec<EdgeId> {
        let lookup = |u: Node, v: Node| {
            graph
                .edge_id_between(u, v)
                .unwrap_or_else(|| panic!("control path uses the non-existent edge ({u},{v})"))
        };

        let mut result = self
            .nodes
            .iter()
            .tuple_windows()
            .map(|(&u, &v)| lookup(u, v))
            .collect_vec();

        if self.is_cyclic() {
            match self.nodes.as_slice() {
                [] => {}
                [u] => result.extend(graph.edge_id_between(*u, *u)),
                [first, .., last] => result.push(lookup(*last, *first)),
            }
        }

        result
    }

    /// Splices the closed walk `walk` into this path at the first node they share.
    /// The walk is rotated to start at that node, so the result is again a valid walk:
    /// `prefix, shared, walk..., shared, suffix`.
    ///
    /// Returns *false* (and leaves `self` untouched) if there is no shared node.
    pub fn extend_with(&mut self, walk: &ControlPath) -> bool {
        debug_assert!(walk.is_cyclic());

        let Some((pos, offset)) = self.nodes.iter().enumerate().find_map(|(pos, u)| {
            walk.nodes
                .iter()
                .position(|w| w == u)
                .map(|offset| (pos, offset))
        }) else {
            return false;
        };

        let rotated = walk.nodes[offset..]
            .iter()
            .chain(&walk.nodes[..offset])
            .copied();
        self.nodes.splice(pos..pos, rotated);
        true
    }

    /// Returns a displayable view that also renders the stem a bud is attached to, using
    /// `paths` to resolve the stem index.
    pub fn display_with<'a>(&'a self, paths: &'a [ControlPath]) -> impl Display + 'a {
        AttachedDisplay { path: self, paths }
    }
}

impl Display for ControlPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.name())?;
        for u in &self.nodes {
            write!(f, " {u}")?;
        }
        Ok(())
    }
}

struct AttachedDisplay<'a> {
    path: &'a ControlPath,
    paths: &'a [ControlPath],
}

impl Display for AttachedDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)?;
        if let Some(stem) = self.path.attached_stem().and_then(|i| self.paths.get(i)) {
            write!(f, " (assigned to {stem})")?;
        }
        Ok(())
    }
}
