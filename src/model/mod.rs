/*!
# Controllability Models

A controllability model answers which nodes of a network need an independent input signal
("driver nodes") so that the whole network (or a chosen set of target nodes) becomes
structurally controllable, and how the control signals travel ([`ControlPath`]s).

Two models are provided:
- [`LiuControllabilityModel`]: linear dynamics, driver nodes from a maximum matching.
  Supports restricting control to a set of target nodes.
- [`SwitchboardControllabilityModel`]: switchboard dynamics, driver nodes from the balance
  of in- and out-degrees.

Both are configured with the builder pattern and implement [`ControllabilityModel`], so they
can be used interchangeably behind a `Box<dyn ControllabilityModel>`:

```rust
use netctrl::{prelude::*, model::*};

let graph = Network::from_edges(4, [(0, 1), (1, 2), (2, 3)]);
let mut model = LiuControllabilityModel::new().with_graph(&graph);
model.calculate().unwrap();

assert_eq!(model.driver_nodes(), &[0]);
assert_eq!(model.control_paths()[0].to_string(), "Stem: 0 1 2 3");
assert_eq!(model.controllability(), 0.25);
```
*/

use std::{fmt, str::FromStr};

use serde::Serialize;
use thiserror::Error;

use crate::{Result, prelude::*};

mod liu;
mod path;
mod stats;
mod switchboard;

pub use liu::*;
pub use path::*;
pub use stats::*;
pub use switchboard::*;

/// Sensitivity of a single edge with respect to the driver nodes of a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeClass {
    /// The edge is part of some but not all optimal control configurations
    Ordinary,
    /// The edge can be removed without affecting the number of driver nodes
    Redundant,
    /// Removing the edge increases the number of driver nodes
    Critical,
    /// Removing the edge decreases the number of driver nodes
    Distinguished,
}

impl EdgeClass {
    pub const ALL: [EdgeClass; 4] = [
        EdgeClass::Distinguished,
        EdgeClass::Redundant,
        EdgeClass::Ordinary,
        EdgeClass::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeClass::Ordinary => "ordinary",
            EdgeClass::Redundant => "redundant",
            EdgeClass::Critical => "critical",
            EdgeClass::Distinguished => "distinguished",
        }
    }
}

/// Error returned when parsing one of the model enums from a string fails
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for EdgeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EdgeClass {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        EdgeClass::ALL
            .into_iter()
            .find(|class| class.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVariant::new("edge class", s))
    }
}

/// What [`ControllabilityModel::controllability`] measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ControllabilityMeasure {
    /// Fraction of nodes that are driver nodes
    #[default]
    Node,
    /// Number of control paths needing an input signal relative to the number of edges
    Edge,
}

impl fmt::Display for ControllabilityMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ControllabilityMeasure::Node => "node",
            ControllabilityMeasure::Edge => "edge",
        })
    }
}

impl FromStr for ControllabilityMeasure {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "node" | "nodes" => Ok(ControllabilityMeasure::Node),
            "edge" | "edges" => Ok(ControllabilityMeasure::Edge),
            _ => Err(UnknownVariant::new("controllability measure", s)),
        }
    }
}

/// Selects a controllability model at runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    #[default]
    Liu,
    Switchboard,
}

impl ModelKind {
    /// Creates an unconfigured model of this kind
    pub fn build<'a>(self) -> Box<dyn ControllabilityModel<'a> + 'a> {
        match self {
            ModelKind::Liu => Box::new(LiuControllabilityModel::new()),
            ModelKind::Switchboard => Box::new(SwitchboardControllabilityModel::new()),
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ModelKind::Liu => "liu",
            ModelKind::Switchboard => "switchboard",
        })
    }
}

impl FromStr for ModelKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "liu" => Ok(ModelKind::Liu),
            "switchboard" | "sb" => Ok(ModelKind::Switchboard),
            _ => Err(UnknownVariant::new("model", s)),
        }
    }
}

/// Common interface of all controllability models.
///
/// A model borrows its graph (and optional target set) for `'a` and owns everything it
/// computes. Results are discarded whenever the graph or the targets are replaced and are
/// rebuilt from scratch by every call to [`ControllabilityModel::calculate`].
pub trait ControllabilityModel<'a>: fmt::Debug {
    /// Name of the model as accepted by [`ModelKind::from_str`]
    fn kind(&self) -> ModelKind;

    /// The attached graph
    fn graph(&self) -> Option<&'a Network>;

    /// Attaches a graph and clears all previous results
    fn set_graph(&mut self, graph: Option<&'a Network>);

    /// The nodes that must be controlled, `None` meaning all nodes
    fn targets(&self) -> Option<&'a [Node]>;

    /// Restricts control to a subset of nodes and clears all previous results
    fn set_targets(&mut self, targets: Option<&'a [Node]>);

    /// Computes driver nodes and control paths of the attached graph
    fn calculate(&mut self) -> Result<()>;

    /// The driver nodes found by the last [`ControllabilityModel::calculate`], in increasing order
    fn driver_nodes(&self) -> &[Node];

    /// The control paths found by the last [`ControllabilityModel::calculate`]
    fn control_paths(&self) -> &[ControlPath];

    /// The controllability measure of the last computation, `0.0` on an empty graph
    fn controllability(&self) -> f64;

    /// Returns *true* if [`ControllabilityModel::edge_classes`] can be computed in the
    /// current configuration
    fn supports_edge_classes(&self) -> bool;

    /// Classifies every edge of the graph; the result is indexed by [`EdgeId`]
    fn edge_classes(&self) -> Result<Vec<EdgeClass>>;

    /// Estimates for every edge how the number of driver nodes changes if the edge is
    /// removed. Models without such an estimator return an empty vector.
    fn changes_in_driver_nodes_after_edge_removal(&self) -> Result<Vec<i64>> {
        Ok(Vec::new())
    }

    /// Returns an uncalculated model of the same kind and configuration
    fn clone_model(&self) -> Box<dyn ControllabilityModel<'a> + 'a>;
}

/// Ratio helper that maps an empty denominator to `0.0`
pub(crate) fn fraction(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
