use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Upper bound on distinct component types; the group registry tracks
/// registration in a u128 mask.
pub const MAX_COMPONENT_TYPES: usize = 128;

/// Hands out process-wide component type indices, in first-touch order.
pub fn next_type_index() -> usize {
    static NEXT_INDEX: AtomicUsize = AtomicUsize::new(0);

    NEXT_INDEX.fetch_add(1, Ordering::Relaxed)
}

/// A type with a stable index into the group store registry.
///
/// Implemented by `#[derive(Component)]` / `#[derive(Tag)]`, which cache the
/// index in a `OnceLock` so repeat lookups are a single load.
pub trait Registered: Any
where
    Self: Sized,
{
    fn type_index() -> usize;
}

/// A component payload. `Default` is the "on add" initializer: stores built
/// through `add_default` construct the payload with it at the computed dense
/// offset.
pub trait Component: Registered + Default {
    /// Removal finalizer, invoked with the payload still in place, before
    /// the bitset and dense array are touched.
    ///
    /// Hierarchical components override this to assert that collaborator
    /// held back-references (parent/child/sibling links) were already
    /// cleared; the store itself never fixes up cross-entity links.
    fn on_removed(&self) {}
}

pub use groupset_macros::Component;
pub use groupset_macros::Tag;

#[cfg(test)]
#[path = "component.tests.rs"]
mod tests;
