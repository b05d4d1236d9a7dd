/*!
# Node Representation

Nodes are plain `u32` indices `0..n`. Controllability models keep several per-node tables
(degrees, "who matches me", path ownership), so the compact [`OptionalNode`] is used for
tables of optional nodes instead of `Option<u32>`, which would double their size.
*/

use std::num::NonZero;

/// Nodes can be any unsigned integer from `0` to `Node::MAX - 1`
pub type Node = u32;

/// Node-Value that is considered invalid
pub const INVALID_NODE: Node = Node::MAX;

/// There can be at most `2^32 - 1` nodes in a network
pub type NumNodes = Node;

/// `Option<Node>` with the same size as `Node`: the value `N` plays the role of `None`.
///
/// Stored as `n ^ N` inside a `NonZero`, so `Option<OptionalNodeImpl<N>>` takes the niche.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct OptionalNodeImpl<const N: Node>(NonZero<Node>);

/// `INVALID_NODE` never names a real node and is therefore the `None`-Value
pub type OptionalNode = OptionalNodeImpl<INVALID_NODE>;

impl<const N: Node> OptionalNodeImpl<N> {
    /// Returns `Some(OptionalNodeImpl)` if `n != N` and `None` otherwise
    pub const fn new(n: Node) -> Option<Self> {
        match NonZero::new(n ^ N) {
            Some(inner) => Some(OptionalNodeImpl(inner)),
            None => None,
        }
    }

    /// Gets the underlying Node-Value
    pub const fn get(&self) -> Node {
        self.0.get() ^ N
    }
}

/// Convenience conversions between `Option<OptionalNode>` slots and `Option<Node>`.
pub trait OptionalNodeExt {
    /// Unpacks the slot into a plain `Option<Node>`
    fn node(&self) -> Option<Node>;
}

impl OptionalNodeExt for Option<OptionalNode> {
    #[inline]
    fn node(&self) -> Option<Node> {
        self.map(|x| x.get())
    }
}
