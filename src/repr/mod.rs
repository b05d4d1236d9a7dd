/*!
# Network Representation

Controllability models need more than plain adjacency: control paths are reported edge by
edge, classifications are produced per edge id, and multigraphs (parallel edges,
self-loops) must stay intact. [`Network`] therefore stores an explicit edge list and
per-node incidence lists of [`EdgeId`]s for both directions.
*/

use crate::{ops::*, *};

mod network;

pub use network::*;
