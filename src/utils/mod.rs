/*!
# Utilities

Helper structures shared by the controllability models. Currently this is the
[`DirectedMatching`], the relation "who drives whom" that matching-based models compute
and decompose into control paths.
*/

use crate::prelude::*;

pub mod directed_matching;

pub use directed_matching::DirectedMatching;
