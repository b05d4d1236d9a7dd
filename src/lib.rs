/*!
`netctrl` computes the **structural controllability** of complex networks: which nodes need an
independent input signal ("driver nodes") so that the state of every node (or of a chosen set
of target nodes) can be steered, and along which paths these signals travel.

# Models

Two dynamics are supported, see the [`model`] module:

- **Linear dynamics** ([`LiuControllabilityModel`](crate::model::LiuControllabilityModel)):
  driver nodes are the nodes left unmatched by a maximum matching, control paths are *stems*
  (rooted at driver nodes) and *buds* (cycles hanging off stems). Control can be restricted
  to a set of target nodes, and edges can be classified as ordinary, redundant or critical.
- **Switchboard dynamics**
  ([`SwitchboardControllabilityModel`](crate::model::SwitchboardControllabilityModel)):
  driver nodes follow from the balance of in- and out-degrees, control paths are open and
  closed walks covering every edge exactly once.

# Representation

We represent **nodes** as `u32` in the range `0..n` where `n` is the number of nodes in the graph.
**Edges** are tuple-structs `Edge(Node, Node)` and carry a stable [`EdgeId`] in `0..m`, their
insertion order in the [`Network`](crate::repr::Network). Edge ids matter: edge classes are
reported per id, and parallel edges as well as self-loops are kept.

In an **undirected** network, `Edge(u, v)` and `Edge(v, u)` are the same edge and every
direction of incidence yields all incident edges.

# Design

Models are configured with the *Builder* / *Setter* pattern, borrow the network they work on,
and implement the common [`ControllabilityModel`](crate::model::ControllabilityModel) trait.
Graph algorithms (BFS, connected components, bipartite matching) are implemented as traits on
the graph itself.

# Usage

There are *4* core submodules you probably want to interact with:
- [`prelude`] includes definitions for nodes, edges, basic graph operations, and the [`Network`](crate::repr::Network),
- [`model`] includes the controllability models, control paths, edge classes and statistics,
- [`io`] includes readers for edge lists,
- [`algo`] includes the graph algorithms the models are built from.

In most use-cases, `use netctrl::{prelude::*, model::*};` suffices for your needs.

```rust
use netctrl::{prelude::*, model::*};

let graph = Network::from_edges(5, [(0, 1), (1, 2), (2, 3), (3, 1), (0, 4)]);
let mut model = SwitchboardControllabilityModel::new().with_graph(&graph);
model.calculate().unwrap();

assert_eq!(model.driver_nodes(), &[0]);
assert_eq!(model.control_paths().len(), 2);
```
*/

pub mod algo;
pub mod edge;
pub mod error;
pub mod gens;
pub mod io;
pub mod model;
pub mod node;
pub mod ops;
pub mod repr;
#[cfg(test)]
pub(crate) mod testing;
pub mod utils;

pub use edge::*;
pub use error::{ControlError, Result};
pub use node::*;

/// `netctrl::prelude` includes definitions for nodes and edges, all basic graph operation traits as well as the network representation.
pub mod prelude {
    pub use super::{edge::*, node::*, ops::*, repr::*};
}
