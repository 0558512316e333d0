/// Index of a group within a context. Only `(GroupHandle, slot)` pairs are
/// unique; slots alone are recycled per group.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupHandle(u16);

impl GroupHandle {
    /// Highest issuable group index; 0xFFFF is reserved for the sentinel.
    pub const MAX: u16 = u16::MAX - 1;

    #[inline(always)]
    pub fn new(index: u16) -> Self {
        GroupHandle(index)
    }

    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline(always)]
    pub fn value(self) -> u16 {
        self.0
    }
}

impl std::fmt::Debug for GroupHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Group({})", self.0)
    }
}

/// A `(group, slot)` pair packed into 4 bytes: group in the high 16 bits,
/// slot in the low 16. No entity object exists anywhere; an entity is purely
/// this index convention shared by a group's component stores.
///
/// Ordering is derived from the packed value (group first, then slot) for
/// client-side deterministic insertion; the core itself only relies on
/// equality.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityHandle(u32);

impl EntityHandle {
    const SLOT_BITS: u32 = 16;
    const SLOT_MASK: u32 = (1 << Self::SLOT_BITS) - 1;

    #[inline(always)]
    pub fn new(group: GroupHandle, slot: u16) -> Self {
        EntityHandle(((group.value() as u32) << Self::SLOT_BITS) | slot as u32)
    }

    /// The sentinel handle. Group and slot value 0xFFFF are both outside the
    /// issuable range, so this can never alias a live handle.
    #[inline(always)]
    pub fn none() -> Self {
        EntityHandle(u32::MAX)
    }

    #[inline(always)]
    pub fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline(always)]
    pub fn group(self) -> GroupHandle {
        GroupHandle::new((self.0 >> Self::SLOT_BITS) as u16)
    }

    #[inline(always)]
    pub fn slot(self) -> u16 {
        (self.0 & Self::SLOT_MASK) as u16
    }
}

impl Default for EntityHandle {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for EntityHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "EntityHandle(none)")
        } else {
            write!(
                f,
                "EntityHandle(group = {}, slot = {})",
                self.group().value(),
                self.slot()
            )
        }
    }
}

#[cfg(test)]
#[path = "entity.tests.rs"]
mod tests;
