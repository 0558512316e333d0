use log::trace;

use crate::component::Component;
use crate::entity::{EntityHandle, GroupHandle};
use crate::group::Group;
use crate::iter::{DenseIter, EntityIter, FilteredEntityIter};

/// Owner of a sparse table of groups, addressed by [`GroupHandle`].
/// Each group is exclusively owned; handle allocation reuses vacant table
/// indices before appending, the same policy entity slots follow.
///
/// Destruction that can cascade (collaborator links discovered mid
/// traversal) goes through the staging lists: `stage_destroy` /
/// `stage_destroy_group` only record the work, and `flush_destroyed`
/// performs it once no traversal is in progress.
pub struct Context {
    groups: Vec<Option<Box<Group>>>,
    staged_entities: Vec<EntityHandle>,
    staged_groups: Vec<GroupHandle>,
}

impl Context {
    pub fn new() -> Self {
        Context {
            groups: Vec::new(),
            staged_entities: Vec::new(),
            staged_groups: Vec::new(),
        }
    }

    /// Creates a group, reusing a vacant table index if any. `setup`
    /// registers the group's component stores; the registration list is
    /// fixed once the closure returns.
    pub fn create_group(&mut self, setup: impl FnOnce(&mut Group)) -> GroupHandle {
        let mut group = Box::new(Group::new());
        setup(&mut group);

        let index = match self.groups.iter().position(|slot| slot.is_none()) {
            Some(vacant) => {
                self.groups[vacant] = Some(group);
                vacant
            }
            None => {
                assert!(
                    self.groups.len() <= GroupHandle::MAX as usize,
                    "group table exhausted ({} groups)",
                    GroupHandle::MAX as u32 + 1
                );
                self.groups.push(Some(group));
                self.groups.len() - 1
            }
        };

        trace!("created group {}", index);

        GroupHandle::new(index as u16)
    }

    /// Releases a group and every component payload it owns. Entity handles
    /// into the group are not tracked and must not be used afterwards.
    pub fn destroy_group(&mut self, handle: GroupHandle) {
        let slot = match self.groups.get_mut(handle.index()) {
            Some(slot) if slot.is_some() => slot,
            _ => panic!("{:?} is not alive", handle),
        };

        *slot = None;
        trace!("destroyed group {}", handle.index());
    }

    pub fn is_valid_group(&self, handle: GroupHandle) -> bool {
        matches!(self.groups.get(handle.index()), Some(Some(_)))
    }

    /// Bounds plus liveness: the group is present and the slot was issued
    /// and not recycled.
    pub fn is_valid(&self, handle: EntityHandle) -> bool {
        if handle.is_none() {
            return false;
        }

        match self.groups.get(handle.group().index()) {
            Some(Some(group)) => group.is_alive(handle.slot()),
            _ => false,
        }
    }

    pub fn group(&self, handle: GroupHandle) -> &Group {
        match self.groups.get(handle.index()) {
            Some(Some(group)) => group,
            _ => panic!("{:?} is not alive", handle),
        }
    }

    pub fn group_mut(&mut self, handle: GroupHandle) -> &mut Group {
        match self.groups.get_mut(handle.index()) {
            Some(Some(group)) => group,
            _ => panic!("{:?} is not alive", handle),
        }
    }

    pub fn create_entity(&mut self, handle: GroupHandle) -> EntityHandle {
        let slot = self.group_mut(handle).create_entity();

        EntityHandle::new(handle, slot)
    }

    pub fn destroy_entity(&mut self, handle: EntityHandle) {
        self.group_mut(handle.group()).destroy_entity(handle.slot());
    }

    /// Records an entity for destruction at the next flush. Staging the same
    /// handle twice is a no-op.
    pub fn stage_destroy(&mut self, handle: EntityHandle) {
        if !self.staged_entities.contains(&handle) {
            self.staged_entities.push(handle);
        }
    }

    /// Records a whole group for destruction at the next flush.
    pub fn stage_destroy_group(&mut self, handle: GroupHandle) {
        if !self.staged_groups.contains(&handle) {
            self.staged_groups.push(handle);
        }
    }

    pub fn has_staged(&self) -> bool {
        !self.staged_entities.is_empty() || !self.staged_groups.is_empty()
    }

    /// Performs all staged destruction: entities first, then groups. An
    /// entity staged into a group that is itself staged (or already gone) is
    /// skipped; the group teardown drops its payload wholesale.
    pub fn flush_destroyed(&mut self) {
        let entities = std::mem::take(&mut self.staged_entities);
        let groups = std::mem::take(&mut self.staged_groups);

        for handle in entities {
            let group = handle.group();

            if groups.contains(&group) || !self.is_valid_group(group) {
                continue;
            }

            self.group_mut(group).destroy_entity(handle.slot());
        }

        for handle in groups {
            if self.is_valid_group(handle) {
                self.destroy_group(handle);
            }
        }

        trace!("flushed staged destruction");
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub(crate) fn group_table(&self) -> &[Option<Box<Group>>] {
        &self.groups
    }

    /// Streams every payload of `T` across all groups in handle order,
    /// without reconstructing entity handles.
    pub fn iter<T: Component>(&self) -> DenseIter<'_, T> {
        DenseIter::new(self)
    }

    /// Streams `(handle, payload)` pairs in ascending slot order per group.
    pub fn iter_entities<T: Component>(&self) -> EntityIter<'_, T> {
        EntityIter::new(self)
    }

    /// Streams `(handle, payload)` pairs of `T` restricted to slots that
    /// also hold `F`.
    pub fn iter_filtered<T: Component, F: Component>(&self) -> FilteredEntityIter<'_, T, F> {
        FilteredEntityIter::new(self)
    }

    /// Mutable traversal of every `T` payload; exclusive access for the
    /// whole walk, so no structural mutation can invalidate the cursor.
    pub fn for_each_mut<T: Component>(&mut self, mut f: impl FnMut(EntityHandle, &mut T)) {
        for index in 0..self.groups.len() {
            let handle = GroupHandle::new(index as u16);

            let Some(group) = self.groups[index].as_deref_mut() else {
                continue;
            };

            if !group.is_registered::<T>() {
                continue;
            }

            group
                .store_mut::<T>()
                .for_each_mut(|slot, value| f(EntityHandle::new(handle, slot), value));
        }
    }

    /// Mutable traversal of `T` payloads on slots that also hold `F`.
    pub fn for_each_filtered_mut<T: Component, F: Component>(
        &mut self,
        mut f: impl FnMut(EntityHandle, &mut T),
    ) {
        for index in 0..self.groups.len() {
            let handle = GroupHandle::new(index as u16);

            let Some(group) = self.groups[index].as_deref_mut() else {
                continue;
            };

            if !group.is_registered::<T>() || !group.is_registered::<F>() {
                continue;
            }

            group.for_each_filtered_mut::<T, F>(|slot, value| {
                f(EntityHandle::new(handle, slot), value)
            });
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "context.tests.rs"]
mod tests;
