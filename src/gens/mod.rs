/*!
# Graph Builders

Deterministic helpers to grow well-known motifs (paths, cycles, stars) inside an existing
[`Network`](crate::repr::Network). They are the vocabulary used to describe fixtures for the
controllability models, e.g. "a stem feeding a cycle" becomes
`g.connect_path([0, 1, 2]); g.connect_cycle([2, 3, 4]);`.
*/

use crate::prelude::*;

mod substructures;

pub use substructures::*;
