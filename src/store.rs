use std::any::Any;

use crate::bitindex::{BLOCK_BITS, BitIndex};
use crate::component::Component;

/// Type-erased store capability, the shape the group registry works with:
/// lockstep growth, presence, and removal. Everything payload-typed goes
/// through a downcast to the concrete [`Store<T>`].
pub trait AnyStore: Any {
    fn grow(&mut self);
    fn reserve(&mut self, slots: u32);
    fn has(&self, slot: u16) -> bool;
    fn remove(&mut self, slot: u16);
    fn block_count(&self) -> usize;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// One component type's storage within one group: a presence [`BitIndex`]
/// plus a dense payload vector kept in lockstep with it. Element `i` of the
/// payload belongs to the i-th set bit in slot order.
///
/// Flag components are ordinary stores over a zero-sized payload type; the
/// vector of a ZST never allocates, so the contract does not special-case
/// them.
pub struct Store<T: Component> {
    index: BitIndex,
    data: Vec<T>,
}

impl<T: Component> Store<T> {
    pub fn new() -> Self {
        Store {
            index: BitIndex::new(),
            data: Vec::new(),
        }
    }

    pub fn has(&self, slot: u16) -> bool {
        self.index.test(slot)
    }

    pub fn count(&self) -> usize {
        debug_assert_eq!(self.index.count(), self.data.len());
        self.data.len()
    }

    /// Attaches `value` to `slot`. The slot must not already hold this
    /// component; the bitset computes the dense offset and the payload is
    /// inserted at exactly that offset, shifting later elements up.
    ///
    /// The returned reference is valid until the next structural mutation of
    /// this store.
    pub fn add(&mut self, slot: u16, value: T) -> &mut T {
        let offset = self.index.set_bit(slot);
        self.data.insert(offset, value);

        &mut self.data[offset]
    }

    /// Attaches a default-constructed payload to `slot`.
    pub fn add_default(&mut self, slot: u16) -> &mut T {
        self.add(slot, T::default())
    }

    /// Detaches the component from `slot`. Runs the type's `on_removed`
    /// finalizer with the payload still in place, then erases bit and
    /// payload in lockstep.
    pub fn remove(&mut self, slot: u16) {
        assert!(self.index.test(slot), "slot {} has no component", slot);

        let offset = self.index.offset_of(slot);
        self.data[offset].on_removed();

        let cleared = self.index.clear_bit(slot);
        debug_assert_eq!(offset, cleared);

        self.data.remove(cleared);
    }

    pub fn get(&self, slot: u16) -> Option<&T> {
        if !self.index.test(slot) {
            return None;
        }

        Some(&self.data[self.index.offset_of(slot)])
    }

    pub fn get_mut(&mut self, slot: u16) -> &mut T {
        assert!(self.index.test(slot), "slot {} has no component", slot);

        let offset = self.index.offset_of(slot);
        &mut self.data[offset]
    }

    /// Pre-extends payload and index capacity for `slots`. Does not change
    /// the block count; that stays driven by the group's high-water mark.
    pub fn reserve(&mut self, slots: u32) {
        self.index.reserve(slots);

        let slots = slots as usize;
        if slots > self.data.capacity() {
            self.data.reserve(slots - self.data.capacity());
        }
    }

    pub fn index(&self) -> &BitIndex {
        &self.index
    }

    /// Dense payload in slot order; position i is the i-th set bit.
    pub fn payload(&self) -> &[T] {
        &self.data
    }

    /// Walks every present slot in ascending order with mutable payload
    /// access. Exclusive borrow of the store, so no structural mutation can
    /// race the walk.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(u16, &mut T)) {
        let (index, data) = (&self.index, &mut self.data);
        let mut dense = 0;

        for (block, &first) in index.words().iter().enumerate() {
            let mut word = first;

            while word != 0 {
                let bit = word.trailing_zeros();
                word &= word - 1;

                let slot = block as u16 * BLOCK_BITS as u16 + bit as u16;
                f(slot, &mut data[dense]);
                dense += 1;
            }
        }
    }

    /// As `for_each_mut`, but the visit decision is gated by the
    /// intersection with `filter`. The dense cursor still advances on every
    /// primary bit, because the payload is indexed by primary presence
    /// alone.
    pub fn for_each_filtered_mut(&mut self, filter: &BitIndex, mut f: impl FnMut(u16, &mut T)) {
        debug_assert_eq!(
            self.index.block_count(),
            filter.block_count(),
            "filter index grew out of lockstep"
        );

        let (index, data) = (&self.index, &mut self.data);
        let mut dense = 0;

        for (block, &first) in index.words().iter().enumerate() {
            let pass = filter.word(block);
            let mut word = first;

            while word != 0 {
                let bit = word.trailing_zeros();
                word &= word - 1;

                let offset = dense;
                dense += 1;

                if (pass >> bit) & 1 != 0 {
                    let slot = block as u16 * BLOCK_BITS as u16 + bit as u16;
                    f(slot, &mut data[offset]);
                }
            }
        }
    }
}

impl<T: Component> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Component> AnyStore for Store<T> {
    fn grow(&mut self) {
        self.index.grow();
    }

    fn reserve(&mut self, slots: u32) {
        Store::reserve(self, slots);
    }

    fn has(&self, slot: u16) -> bool {
        Store::has(self, slot)
    }

    fn remove(&mut self, slot: u16) {
        Store::remove(self, slot);
    }

    fn block_count(&self) -> usize {
        self.index.block_count()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
#[path = "store.tests.rs"]
mod tests;
