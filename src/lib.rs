// Allow this crate to reference itself as ::groupset_ecs::
// This enables proc macros to use absolute paths that work both internally and externally
extern crate self as groupset_ecs;

pub mod bitindex;
pub mod component;
pub mod context;
pub mod entity;
pub mod group;
pub mod iter;
pub mod prelude;
pub mod safety;
pub mod store;
