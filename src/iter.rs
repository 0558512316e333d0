//! Forward-only cursors over a context's component streams.
//!
//! All three cursor shapes walk groups in handle order and skip absent
//! groups, groups without the requested store, and empty stores. None of
//! them survives a structural mutation of the stores they read; the shared
//! borrow of the context they hold rules that out at compile time.

use crate::bitindex::{BLOCK_BITS, BitIndex};
use crate::component::Component;
use crate::context::Context;
use crate::entity::{EntityHandle, GroupHandle};
use crate::group::Group;
use crate::store::Store;

/// Streams `&T` in dense payload order, never consulting the bitset:
/// payload order already matches bit order by construction.
pub struct DenseIter<'a, T: Component> {
    groups: &'a [Option<Box<Group>>],
    group: usize,
    inner: std::slice::Iter<'a, T>,
}

impl<'a, T: Component> DenseIter<'a, T> {
    pub(crate) fn new(context: &'a Context) -> Self {
        DenseIter {
            groups: context.group_table(),
            group: 0,
            inner: [].iter(),
        }
    }
}

impl<'a, T: Component> Iterator for DenseIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        loop {
            if let Some(value) = self.inner.next() {
                return Some(value);
            }

            loop {
                if self.group == self.groups.len() {
                    return None;
                }

                let at = self.group;
                self.group += 1;

                if let Some(group) = self.groups[at].as_deref()
                    && let Some(store) = group.try_store::<T>()
                    && store.count() != 0
                {
                    self.inner = store.payload().iter();
                    break;
                }
            }
        }
    }
}

/// Streams `(EntityHandle, &T)` pairs, recovering each dense element's
/// originating slot by walking the store's bit words: lowest set bit first,
/// one fresh word per 64-slot block.
pub struct EntityIter<'a, T: Component> {
    groups: &'a [Option<Box<Group>>],
    group: usize,
    current: Option<(GroupHandle, &'a Store<T>)>,
    block: usize,
    word: u64,
    dense: usize,
}

impl<'a, T: Component> EntityIter<'a, T> {
    pub(crate) fn new(context: &'a Context) -> Self {
        EntityIter {
            groups: context.group_table(),
            group: 0,
            current: None,
            block: 0,
            word: 0,
            dense: 0,
        }
    }
}

impl<'a, T: Component> Iterator for EntityIter<'a, T> {
    type Item = (EntityHandle, &'a T);

    fn next(&mut self) -> Option<(EntityHandle, &'a T)> {
        loop {
            let Some((handle, store)) = self.current else {
                if self.group == self.groups.len() {
                    return None;
                }

                let at = self.group;
                self.group += 1;

                if let Some(group) = self.groups[at].as_deref()
                    && let Some(store) = group.try_store::<T>()
                    && store.count() != 0
                {
                    self.current = Some((GroupHandle::new(at as u16), store));
                    self.block = 0;
                    self.word = store.index().word(0);
                    self.dense = 0;
                }

                continue;
            };

            while self.word == 0 {
                self.block += 1;
                if self.block == store.index().block_count() {
                    break;
                }
                self.word = store.index().word(self.block);
            }

            if self.word == 0 {
                self.current = None;
                continue;
            }

            let bit = self.word.trailing_zeros();
            self.word &= self.word - 1;

            let slot = self.block as u16 * BLOCK_BITS as u16 + bit as u16;
            let offset = self.dense;
            self.dense += 1;

            return Some((EntityHandle::new(handle, slot), &store.payload()[offset]));
        }
    }
}

/// Two-store intersection: streams `T` payloads only for slots that also
/// hold `F`. The dense cursor advances on every primary bit (the payload is
/// indexed by primary presence alone); the yield decision is the AND of the
/// two current words. Groups lacking either store contribute nothing.
pub struct FilteredEntityIter<'a, T: Component, F: Component> {
    groups: &'a [Option<Box<Group>>],
    group: usize,
    current: Option<(GroupHandle, &'a Store<T>, &'a BitIndex)>,
    block: usize,
    word: u64,
    pass: u64,
    dense: usize,
    _filter: std::marker::PhantomData<F>,
}

impl<'a, T: Component, F: Component> FilteredEntityIter<'a, T, F> {
    pub(crate) fn new(context: &'a Context) -> Self {
        FilteredEntityIter {
            groups: context.group_table(),
            group: 0,
            current: None,
            block: 0,
            word: 0,
            pass: 0,
            dense: 0,
            _filter: std::marker::PhantomData,
        }
    }
}

impl<'a, T: Component, F: Component> Iterator for FilteredEntityIter<'a, T, F> {
    type Item = (EntityHandle, &'a T);

    fn next(&mut self) -> Option<(EntityHandle, &'a T)> {
        loop {
            let Some((handle, store, filter)) = self.current else {
                if self.group == self.groups.len() {
                    return None;
                }

                let at = self.group;
                self.group += 1;

                if let Some(group) = self.groups[at].as_deref()
                    && let Some(store) = group.try_store::<T>()
                    && let Some(filter) = group.try_store::<F>()
                    && store.count() != 0
                {
                    let filter = filter.index();
                    debug_assert_eq!(
                        store.index().block_count(),
                        filter.block_count(),
                        "filter index grew out of lockstep"
                    );

                    self.current = Some((GroupHandle::new(at as u16), store, filter));
                    self.block = 0;
                    self.word = store.index().word(0);
                    self.pass = filter.word(0);
                    self.dense = 0;
                }

                continue;
            };

            while self.word == 0 {
                self.block += 1;
                if self.block == store.index().block_count() {
                    break;
                }
                self.word = store.index().word(self.block);
                self.pass = filter.word(self.block);
            }

            if self.word == 0 {
                self.current = None;
                continue;
            }

            let bit = self.word.trailing_zeros();
            self.word &= self.word - 1;

            let offset = self.dense;
            self.dense += 1;

            if (self.pass >> bit) & 1 != 0 {
                let slot = self.block as u16 * BLOCK_BITS as u16 + bit as u16;
                return Some((EntityHandle::new(handle, slot), &store.payload()[offset]));
            }
        }
    }
}

#[cfg(test)]
#[path = "iter.tests.rs"]
mod tests;
