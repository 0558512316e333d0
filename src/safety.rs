//! Invariant verification utilities
//!
//! Brute-force checks of the index and group invariants, for debugging and
//! randomized tests.

use crate::bitindex::BitIndex;
use crate::group::Group;

/// Verifies the prefix-sum invariant of a [`BitIndex`] by recounting from
/// scratch: `prefix[0] == 0` and every later entry equals the total set-bit
/// count of all blocks before it.
///
/// Returns `Ok(())` if the invariant holds, or `Err(String)` describing the
/// first violation found.
pub fn verify_index_invariants(index: &BitIndex) -> Result<(), String> {
    let words = index.words();
    let prefix = index.prefix();

    if words.len() != prefix.len() {
        return Err(format!(
            "bit blocks and prefix cache have different lengths ({} vs {})",
            words.len(),
            prefix.len()
        ));
    }

    let mut total = 0u32;

    for (block, (&word, &cached)) in words.iter().zip(prefix.iter()).enumerate() {
        if cached != total {
            return Err(format!(
                "prefix[{}] is {} but {} bits are set before block {}",
                block, cached, total, block
            ));
        }

        total += word.count_ones();
    }

    Ok(())
}

/// Verifies a group's structural invariants:
/// - every registered store has the group's block count (growth lockstep)
/// - the free-list is sorted descending, has no duplicates, and only holds
///   slots below the high-water mark
pub fn verify_group_invariants(group: &Group) -> Result<(), String> {
    let mut mask = group.store_mask();

    while mask != 0 {
        let id = mask.trailing_zeros() as usize;
        mask &= mask - 1;

        let blocks = group.raw_store(id).block_count();
        if blocks != group.block_count() {
            return Err(format!(
                "store {} has {} blocks, group has {}",
                id,
                blocks,
                group.block_count()
            ));
        }
    }

    let free = group.free_list();

    for pair in free.windows(2) {
        if pair[0] <= pair[1] {
            return Err(format!(
                "free-list not strictly descending at {:?}",
                pair
            ));
        }
    }

    if let Some(&slot) = free.first()
        && slot as u32 >= group.high_water()
    {
        return Err(format!(
            "free-list holds slot {} beyond high-water mark {}",
            slot,
            group.high_water()
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitindex::BitIndex;
    use crate::component::Component;
    use crate::group::Group;

    #[derive(Component, Default, Clone)]
    struct Probe {
        _value: u32,
    }

    #[test]
    fn test_verify_empty_index() {
        let index = BitIndex::new();
        assert!(verify_index_invariants(&index).is_ok());
    }

    #[test]
    fn test_verify_populated_index() {
        let mut index = BitIndex::new();

        for _ in 0..3 {
            index.grow();
        }

        for slot in [0u16, 5, 63, 64, 70, 130] {
            index.set_bit(slot);
        }

        assert!(verify_index_invariants(&index).is_ok());
    }

    #[test]
    fn test_verify_group_after_churn() {
        let mut group = Group::new();
        group.register::<Probe>();

        for _ in 0..100 {
            group.create_entity();
        }
        for slot in [3u16, 97, 40] {
            group.destroy_entity(slot);
        }

        assert!(verify_group_invariants(&group).is_ok());
        assert!(verify_index_invariants(group.store::<Probe>().index()).is_ok());
    }
}
