use std::mem::MaybeUninit;

use crate::bitindex::BLOCK_BITS;
use crate::component::{Component, MAX_COMPONENT_TYPES};
use crate::store::{AnyStore, Store};

/// Highest issuable slot count per group; slot value 0xFFFF is reserved for
/// the sentinel handle.
pub const MAX_SLOTS: u32 = u16::MAX as u32;

/// An independent population of entity slots and the component stores
/// registered over them. The unit of bulk creation and destruction: dropping
/// a group drops every store and all payload with it.
///
/// Stores are kept in a type-indexed table behind a u128 registration mask,
/// one slot per component type index. Registration is fixed before the first
/// entity is created; from then on every registered store grows its bitset
/// in lockstep with the group's high-water mark, so block indices agree
/// across component types.
pub struct Group {
    stores: [MaybeUninit<Box<dyn AnyStore>>; MAX_COMPONENT_TYPES],
    mask: u128,
    /// One past the highest slot ever issued.
    high_water: u32,
    /// Recycled slots, sorted descending so the smallest is popped first.
    free: Vec<u16>,
    blocks: u32,
}

impl Group {
    pub fn new() -> Self {
        Group {
            stores: std::array::from_fn(|_| MaybeUninit::uninit()),
            mask: 0,
            high_water: 0,
            free: Vec::new(),
            blocks: 0,
        }
    }

    /// Registers a component store. Only legal while the group is empty; the
    /// registration list is fixed for the group's lifetime afterwards.
    pub fn register<T: Component>(&mut self) {
        assert_eq!(
            self.high_water, 0,
            "stores must be registered before any entity is created"
        );

        let id = T::type_index();
        assert!(id < MAX_COMPONENT_TYPES, "invalid component type index");

        let bit = 1u128 << id;
        assert!(self.mask & bit == 0, "component type registered twice");

        self.stores[id] = MaybeUninit::new(Box::new(Store::<T>::new()));
        self.mask |= bit;
    }

    pub fn is_registered<T: Component>(&self) -> bool {
        let id = T::type_index();
        id < MAX_COMPONENT_TYPES && (self.mask >> id) & 1 != 0
    }

    pub fn try_store<T: Component>(&self) -> Option<&Store<T>> {
        let id = T::type_index();

        if id >= MAX_COMPONENT_TYPES || (self.mask >> id) & 1 == 0 {
            return None;
        }

        let store = unsafe { self.stores[id].assume_init_ref() };

        match store.as_any().downcast_ref::<Store<T>>() {
            Some(store) => Some(store),
            None => panic!("store registry holds a different type at index {}", id),
        }
    }

    pub fn store<T: Component>(&self) -> &Store<T> {
        match self.try_store::<T>() {
            Some(store) => store,
            None => panic!("component type not registered in this group"),
        }
    }

    pub fn store_mut<T: Component>(&mut self) -> &mut Store<T> {
        let id = T::type_index();

        if id >= MAX_COMPONENT_TYPES || (self.mask >> id) & 1 == 0 {
            panic!("component type not registered in this group");
        }

        let store = unsafe { self.stores[id].assume_init_mut() };

        match store.as_any_mut().downcast_mut::<Store<T>>() {
            Some(store) => store,
            None => panic!("store registry holds a different type at index {}", id),
        }
    }

    /// Issues a slot: the smallest recycled one if any, else the high-water
    /// mark. Crossing a 64-slot boundary grows every registered store's
    /// bitset by one block, flag stores included.
    pub fn create_entity(&mut self) -> u16 {
        if let Some(slot) = self.free.pop() {
            return slot;
        }

        assert!(
            self.high_water < MAX_SLOTS,
            "entity slot space exhausted ({} slots)",
            MAX_SLOTS
        );

        let slot = self.high_water as u16;
        self.high_water += 1;

        while self.blocks * BLOCK_BITS < self.high_water {
            self.blocks += 1;

            let mut mask = self.mask;
            while mask != 0 {
                let id = mask.trailing_zeros() as usize;
                mask &= mask - 1;

                unsafe { self.stores[id].assume_init_mut() }.grow();
            }
        }

        slot
    }

    /// Destroys a slot: clears it from every store that holds it (running
    /// removal hooks), then returns it to the free-list at its descending
    /// sort position. Destroying an already-free slot is a no-op, so a
    /// double delete never produces a duplicate free-list entry.
    pub fn destroy_entity(&mut self, slot: u16) {
        assert!(
            (slot as u32) < self.high_water,
            "slot {} was never created",
            slot
        );

        let at = self.free.partition_point(|&s| s > slot);
        if self.free.get(at) == Some(&slot) {
            return;
        }

        let mut mask = self.mask;
        while mask != 0 {
            let id = mask.trailing_zeros() as usize;
            mask &= mask - 1;

            let store = unsafe { self.stores[id].assume_init_mut() };
            if store.has(slot) {
                store.remove(slot);
            }
        }

        self.free.insert(at, slot);
    }

    /// Pre-extends every registered store for `count` slots without moving
    /// the high-water mark.
    pub fn reserve_entities(&mut self, count: u32) {
        let mut mask = self.mask;
        while mask != 0 {
            let id = mask.trailing_zeros() as usize;
            mask &= mask - 1;

            unsafe { self.stores[id].assume_init_mut() }.reserve(count);
        }
    }

    /// Whether `slot` was issued and has not been recycled.
    pub fn is_alive(&self, slot: u16) -> bool {
        if (slot as u32) >= self.high_water {
            return false;
        }

        let at = self.free.partition_point(|&s| s > slot);
        self.free.get(at) != Some(&slot)
    }

    pub fn live_count(&self) -> usize {
        self.high_water as usize - self.free.len()
    }

    pub fn high_water(&self) -> u32 {
        self.high_water
    }

    pub fn block_count(&self) -> usize {
        self.blocks as usize
    }

    pub(crate) fn free_list(&self) -> &[u16] {
        &self.free
    }

    pub(crate) fn store_mask(&self) -> u128 {
        self.mask
    }

    pub(crate) fn raw_store(&self, id: usize) -> &dyn AnyStore {
        debug_assert!((self.mask >> id) & 1 != 0);
        unsafe { self.stores[id].assume_init_ref() }.as_ref()
    }

    /// Mutable walk over one store's present slots, gated by a second
    /// store's bits. The two stores live in the same registry table, so the
    /// primary is taken out through a raw pointer while the filter is read
    /// shared; distinct type indices guarantee they never alias.
    pub fn for_each_filtered_mut<T: Component, F: Component>(
        &mut self,
        f: impl FnMut(u16, &mut T),
    ) {
        assert_ne!(
            T::type_index(),
            F::type_index(),
            "primary and filter component must differ"
        );

        let primary: *mut Store<T> = self.store_mut::<T>();
        let filter = self.store::<F>().index();

        unsafe { (*primary).for_each_filtered_mut(filter, f) }
    }
}

impl Default for Group {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Group {
    fn drop(&mut self) {
        let mut mask = self.mask;

        unsafe {
            let ptr = self.stores.as_mut_ptr();

            while mask != 0 {
                let id = mask.trailing_zeros() as usize;
                mask &= mask - 1;

                ptr.add(id).read().assume_init_drop();
            }
        }
    }
}

#[cfg(test)]
#[path = "group.tests.rs"]
mod tests;
