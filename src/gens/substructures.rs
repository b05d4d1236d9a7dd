/*!
# Substructure Generators

Adds common motifs to an already existing graph:

- **Paths**
- **Cycles**
- **Out-Stars**

# Example

```rust
use netctrl::{prelude::*, gens::*};

let mut g = Network::new(5);
g.connect_path([0, 1, 2]);
g.connect_cycle([2, 3, 4]);

assert_eq!(
    g.edges().collect::<Vec<Edge>>(),
    vec![Edge(0, 1), Edge(1, 2), Edge(2, 3), Edge(3, 4), Edge(4, 2)]
);
```
*/

use itertools::Itertools;

use super::*;

/// Trait for creating additional **substructures** inside an already existing graph.
pub trait GeneratorSubstructures {
    /// Connects the given nodes in order with a **simple path** and returns the new edge ids.
    ///
    /// # Example
    /// ```rust
    /// use netctrl::{prelude::*, gens::*};
    ///
    /// let mut g = Network::new(4);
    /// g.connect_path([0, 1, 2, 3]);
    ///
    /// assert!(g.has_edge(0, 1));
    /// assert!(g.has_edge(1, 2));
    /// assert!(g.has_edge(2, 3));
    /// ```
    fn connect_path<P>(&mut self, nodes_on_path: P) -> Vec<EdgeId>
    where
        P: IntoIterator<Item = Node>;

    /// Connects the given nodes with a **cycle** and returns the new edge ids.
    /// A single node receives a self-loop.
    ///
    /// # Example
    /// ```rust
    /// use netctrl::{prelude::*, gens::*};
    ///
    /// let mut g = Network::new(3);
    /// g.connect_cycle([0, 1, 2]);
    ///
    /// assert!(g.has_edge(0, 1));
    /// assert!(g.has_edge(1, 2));
    /// assert!(g.has_edge(2, 0));
    /// ```
    fn connect_cycle<C>(&mut self, nodes_in_cycle: C) -> Vec<EdgeId>
    where
        C: IntoIterator<Item = Node>;

    /// Connects `center` to each of `leaves` and returns the new edge ids
    fn connect_out_star<L>(&mut self, center: Node, leaves: L) -> Vec<EdgeId>
    where
        L: IntoIterator<Item = Node>;
}

impl<G> GeneratorSubstructures for G
where
    G: GraphEdgeEditing,
{
    fn connect_path<P>(&mut self, nodes_on_path: P) -> Vec<EdgeId>
    where
        P: IntoIterator<Item = Node>,
    {
        nodes_on_path
            .into_iter()
            .tuple_windows()
            .map(|(u, v)| self.add_edge(u, v))
            .collect()
    }

    fn connect_cycle<C>(&mut self, nodes_in_cycle: C) -> Vec<EdgeId>
    where
        C: IntoIterator<Item = Node>,
    {
        let mut iter = nodes_in_cycle.into_iter();
        let mut ids = Vec::new();

        // we use a rather tedious implementation to avoid needing to clone the iterator
        if let Some(first) = iter.next() {
            let mut prev = first;
            for cur in iter {
                ids.push(self.add_edge(prev, cur));
                prev = cur;
            }

            ids.push(self.add_edge(prev, first));
        }

        ids
    }

    fn connect_out_star<L>(&mut self, center: Node, leaves: L) -> Vec<EdgeId>
    where
        L: IntoIterator<Item = Node>,
    {
        leaves
            .into_iter()
            .map(|leaf| self.add_edge(center, leaf))
            .collect()
    }
}
