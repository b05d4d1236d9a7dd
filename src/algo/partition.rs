/*!
# Partitioning of Nodes

A [`Partition`] assigns every node to at most one **class**. Weakly connected components
are returned this way, which lets the switchboard model ask "does every member of the
component of `u` satisfy P?" by scanning nodes once and flagging classes.

# Example

```rust
use netctrl::algo::Partition;

let mut part = Partition::new(5);
let c0 = part.add_class([0, 1]);
let c1 = part.add_class([2, 3]);

assert_eq!(part.number_of_classes(), 2);
assert_eq!(part.class_of_edge(0, 1), Some(c0));
assert_eq!(part.class_of_edge(1, 2), None);
assert_eq!(part.class_of_node(3), Some(c1));
assert_eq!(part.class_of_node(4), None);
```
*/

use super::*;

/// Classes are exposed as plain indices `0..number_of_classes()`
pub type PartitionClass = NumNodes;

/// Represents a **partition** of the node set into disjoint classes.
///
/// Each node can belong to at most one class, or remain **unassigned**.
#[derive(Debug, Clone)]
pub struct Partition {
    classes: Vec<Option<OptionalNode>>,
    number_of_classes: NumNodes,
}

impl Partition {
    /// Creates a new partition over `nodes` nodes, all initially unassigned.
    pub fn new(nodes: NumNodes) -> Self {
        Self {
            classes: vec![None; nodes as usize],
            number_of_classes: 0,
        }
    }

    /// Creates a new class and assigns the given nodes to it.
    /// Returns the new class identifier.
    ///
    /// # Panics
    /// If any provided node was already assigned to another class.
    pub fn add_class<I>(&mut self, nodes: I) -> PartitionClass
    where
        I: IntoIterator<Item = Node>,
    {
        let raw_class_id = self.number_of_classes;
        let class_id = OptionalNode::new(raw_class_id);
        self.number_of_classes += 1;

        for u in nodes {
            assert_eq!(self.classes[u as usize], None, "node {u} is already assigned");
            self.classes[u as usize] = class_id;
        }

        raw_class_id
    }

    /// Returns the class identifier of a node, or `None` if the node is unassigned.
    pub fn class_of_node(&self, node: Node) -> Option<PartitionClass> {
        self.classes[node as usize].map(|class| class.get())
    }

    /// Returns the class identifier if both endpoints of an edge belong
    /// to the same class, or `None` otherwise.
    pub fn class_of_edge(&self, u: Node, v: Node) -> Option<PartitionClass> {
        let cu = self.class_of_node(u)?;
        let cv = self.class_of_node(v)?;
        if cu == cv { Some(cu) } else { None }
    }

    /// Returns the number of partition classes (0 if all nodes are unassigned)
    pub fn number_of_classes(&self) -> NumNodes {
        self.number_of_classes
    }
}

/// Convenience trait for converting a collection of classes into a [`Partition`].
///
/// Each inner collection is interpreted as one partition class.
pub trait IntoPartition {
    /// Consumes the collection and builds a [`Partition`] with `n` total nodes.
    fn into_partition(self, n: NumNodes) -> Partition;
}

impl<N, I> IntoPartition for I
where
    N: IntoIterator<Item = Node>,
    I: IntoIterator<Item = N>,
{
    fn into_partition(self, n: NumNodes) -> Partition {
        let mut partition = Partition::new(n);
        for class in self {
            partition.add_class(class);
        }
        partition
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn into_partition() {
        let part = vec![vec![0, 1], vec![3]].into_partition(4);
        assert_eq!(part.number_of_classes(), 2);
        assert_eq!(part.class_of_node(2), None);
        assert_eq!(part.class_of_node(3), Some(1));
        assert_eq!(part.class_of_edge(0, 1), Some(0));
        assert_eq!(part.class_of_edge(1, 3), None);
    }

    #[test]
    #[should_panic]
    fn double_assignment() {
        let mut part = Partition::new(3);
        part.add_class([0, 1]);
        part.add_class([1, 2]);
    }
}
