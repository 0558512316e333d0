use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bitindex::BitIndex;
use crate::safety::verify_index_invariants;

#[test]
fn test_grow_appends_aligned_blocks() {
    let mut index = BitIndex::new();
    assert_eq!(index.block_count(), 0);
    assert_eq!(index.count(), 0);

    index.grow();
    assert_eq!(index.block_count(), 1);
    assert_eq!(index.word(0), 0);

    index.grow();
    assert_eq!(index.block_count(), 2);

    verify_index_invariants(&index).unwrap();
}

#[test]
fn test_grow_after_set_records_total() {
    let mut index = BitIndex::new();
    index.grow();

    index.set_bit(0);
    index.set_bit(5);
    index.set_bit(63);

    // The new block's prefix entry must equal the total set so far, or
    // offsets in the new block would be wrong.
    index.grow();
    verify_index_invariants(&index).unwrap();

    assert_eq!(index.set_bit(64), 3);
}

#[test]
fn test_set_bit_offsets_within_block() {
    let mut index = BitIndex::new();
    index.grow();

    assert_eq!(index.set_bit(10), 0);
    assert_eq!(index.set_bit(3), 0); // before slot 10, takes offset 0
    assert_eq!(index.set_bit(20), 2);
    assert_eq!(index.set_bit(15), 2); // between 10 and 20

    assert!(index.test(3));
    assert!(index.test(10));
    assert!(index.test(15));
    assert!(index.test(20));
    assert!(!index.test(4));

    assert_eq!(index.offset_of(3), 0);
    assert_eq!(index.offset_of(10), 1);
    assert_eq!(index.offset_of(15), 2);
    assert_eq!(index.offset_of(20), 3);
}

#[test]
fn test_set_bit_offsets_across_blocks() {
    let mut index = BitIndex::new();
    for _ in 0..3 {
        index.grow();
    }

    index.set_bit(0);
    index.set_bit(63);
    index.set_bit(64);
    index.set_bit(128);
    index.set_bit(190);

    assert_eq!(index.offset_of(0), 0);
    assert_eq!(index.offset_of(63), 1);
    assert_eq!(index.offset_of(64), 2);
    assert_eq!(index.offset_of(128), 3);
    assert_eq!(index.offset_of(190), 4);

    verify_index_invariants(&index).unwrap();
}

#[test]
fn test_clear_bit_shifts_later_offsets() {
    let mut index = BitIndex::new();
    index.grow();
    index.grow();

    for slot in [2u16, 5, 9, 70] {
        index.set_bit(slot);
    }

    assert_eq!(index.clear_bit(5), 1);
    assert!(!index.test(5));

    // Later slots move down by one
    assert_eq!(index.offset_of(9), 1);
    assert_eq!(index.offset_of(70), 2);
    assert_eq!(index.count(), 3);

    verify_index_invariants(&index).unwrap();
}

#[test]
#[should_panic(expected = "already set")]
fn test_set_bit_twice_panics() {
    let mut index = BitIndex::new();
    index.grow();

    index.set_bit(7);
    index.set_bit(7);
}

#[test]
#[should_panic(expected = "is not set")]
fn test_clear_unset_bit_panics() {
    let mut index = BitIndex::new();
    index.grow();

    index.clear_bit(7);
}

#[test]
fn test_test_beyond_grown_range_reads_unset() {
    let mut index = BitIndex::new();
    index.grow();

    assert!(!index.test(64));
    assert!(!index.test(1000));
}

#[test]
fn test_reserve_keeps_block_count() {
    let mut index = BitIndex::new();
    index.grow();

    index.reserve(1000);
    assert_eq!(index.block_count(), 1);
}

#[test]
fn test_randomized_mutations_keep_prefix_invariant() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    let mut index = BitIndex::new();
    for _ in 0..8 {
        index.grow();
    }

    let mut set: Vec<u16> = Vec::new();

    for _ in 0..4000 {
        let slot = rng.gen_range(0u16..512);
        let present = index.test(slot);

        if present && rng.gen_bool(0.5) {
            index.clear_bit(slot);
            set.retain(|&s| s != slot);
        } else if !present {
            index.set_bit(slot);
            set.push(slot);
        }

        verify_index_invariants(&index).unwrap();
    }

    // Offsets must equal the rank of each slot among all set slots
    set.sort_unstable();
    for (rank, &slot) in set.iter().enumerate() {
        assert_eq!(index.offset_of(slot), rank);
    }
    assert_eq!(index.count(), set.len());
}
