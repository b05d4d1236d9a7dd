//! Fixtures shared by the unit tests of this crate.

use rand::Rng;

use crate::prelude::*;

/// Creates a uniformly random multigraph with `n` nodes and `m` edges. Self-loops and
/// parallel edges are kept, since the models have to cope with both.
pub fn random_network<R: Rng>(rng: &mut R, n: NumNodes, m: NumEdges, directed: bool) -> Network {
    let mut graph = if directed {
        Network::new(n)
    } else {
        Network::new_undirected(n)
    };

    for _ in 0..m {
        let u = rng.random_range(0..n);
        let v = rng.random_range(0..n);
        graph.add_edge(u, v);
    }

    graph
}

/// Like [`random_network`] but without self-loops and parallel edges
pub fn random_simple_network<R: Rng>(
    rng: &mut R,
    n: NumNodes,
    m: NumEdges,
    directed: bool,
) -> Network {
    let mut graph = if directed {
        Network::new(n)
    } else {
        Network::new_undirected(n)
    };

    let max_edges = if directed {
        n as u64 * (n as u64 - 1)
    } else {
        n as u64 * (n as u64 - 1) / 2
    };
    let m = (m as u64).min(max_edges);

    while (graph.number_of_edges() as u64) < m {
        let u = rng.random_range(0..n);
        let v = rng.random_range(0..n);
        if u != v && !graph.has_edge(u, v) {
            graph.add_edge(u, v);
        }
    }

    graph
}
