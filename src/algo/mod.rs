/*!
# Graph Algorithms

The classical graph routines the controllability models are built from. All algorithms are
re-exported at the top level of this module, so you can simply do:
```rust
use netctrl::algo::*;
```
and gain access to traversal, connectivity and matching. If possible, algorithms are
provided as **iterators** or as traits implemented on the graph itself.
*/

mod connectivity;
mod matching;
mod partition;
mod traversal;

use crate::prelude::*;

pub use connectivity::*;
pub use matching::*;
pub use partition::*;
pub use traversal::*;
