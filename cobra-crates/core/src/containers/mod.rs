//! Containers shared by the formula arena, the solvers and the symmetry code.
mod keyed_vec;
mod trail;
mod union_find;

use fnv::FnvBuildHasher;
pub use keyed_vec::*;
pub(crate) use trail::*;
pub use union_find::*;

/// [`std::collections::HashMap`] that defaults to a deterministic hasher.
#[allow(clippy::disallowed_types, reason = "this is how we define our HashMap")]
pub type HashMap<K, V, Hasher = FnvBuildHasher> = std::collections::HashMap<K, V, Hasher>;
/// [`std::collections::HashSet`] that defaults to a deterministic hasher.
#[allow(clippy::disallowed_types, reason = "this is how we define our HashSet")]
pub type HashSet<K, Hasher = FnvBuildHasher> = std::collections::HashSet<K, Hasher>;
