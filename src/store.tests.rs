use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::component::{Component, Tag};
use crate::safety::verify_index_invariants;
use crate::store::{AnyStore, Store};

#[derive(Component, Default, Clone, Debug, PartialEq)]
struct Value {
    value: u32,
}

#[derive(Tag, Default, Clone)]
struct Flag;

fn grown<T: Component>(blocks: usize) -> Store<T> {
    let mut store = Store::new();
    for _ in 0..blocks {
        AnyStore::grow(&mut store);
    }
    store
}

#[test]
fn test_round_trip() {
    let mut store = grown::<Value>(1);

    store.add(4, Value { value: 40 });
    assert!(store.has(4));
    assert_eq!(store.get(4), Some(&Value { value: 40 }));

    store.remove(4);
    assert!(!store.has(4));
    assert_eq!(store.get(4), None);
    assert_eq!(store.count(), 0);
}

#[test]
fn test_payload_tracks_bit_order() {
    let mut store = grown::<Value>(1);

    store.add(9, Value { value: 9 });
    store.add(2, Value { value: 2 });
    store.add(5, Value { value: 5 });

    // Dense order is slot order, not insertion order
    assert_eq!(
        store.payload(),
        &[
            Value { value: 2 },
            Value { value: 5 },
            Value { value: 9 }
        ]
    );
}

#[test]
fn test_values_survive_neighbor_churn() {
    let mut store = grown::<Value>(2);

    for slot in 0..100u16 {
        store.add(slot, Value { value: slot as u32 });
    }

    // Remove every third slot, then re-check every survivor
    for slot in (0..100u16).step_by(3) {
        store.remove(slot);
    }

    for slot in 0..100u16 {
        if slot % 3 == 0 {
            assert_eq!(store.get(slot), None);
        } else {
            assert_eq!(store.get(slot), Some(&Value { value: slot as u32 }));
        }
    }
}

#[test]
fn test_get_mut_writes_through() {
    let mut store = grown::<Value>(1);
    store.add(7, Value { value: 1 });

    store.get_mut(7).value = 99;
    assert_eq!(store.get(7), Some(&Value { value: 99 }));
}

#[test]
#[should_panic(expected = "already set")]
fn test_add_present_slot_panics() {
    let mut store = grown::<Value>(1);
    store.add(1, Value { value: 1 });
    store.add(1, Value { value: 2 });
}

#[test]
#[should_panic(expected = "has no component")]
fn test_remove_absent_slot_panics() {
    let mut store = grown::<Value>(1);
    store.remove(1);
}

#[test]
fn test_add_default_uses_on_add_initializer() {
    let mut store = grown::<Value>(1);

    let value = store.add_default(12);
    assert_eq!(*value, Value::default());
    assert!(store.has(12));
}

#[test]
fn test_flag_store_holds_no_payload_bytes() {
    let mut store = grown::<Flag>(1);

    store.add_default(0);
    store.add_default(63);

    assert_eq!(store.count(), 2);
    assert_eq!(std::mem::size_of_val(store.payload()), 0);
}

#[test]
fn test_for_each_mut_ascending_slots() {
    let mut store = grown::<Value>(2);

    for slot in [2u16, 5, 9, 70] {
        store.add(slot, Value { value: 0 });
    }

    let mut visited = Vec::new();
    store.for_each_mut(|slot, value| {
        value.value = slot as u32;
        visited.push(slot);
    });

    assert_eq!(visited, vec![2, 5, 9, 70]);
    assert_eq!(store.get(70), Some(&Value { value: 70 }));
}

#[test]
fn test_for_each_filtered_mut_intersects() {
    let mut primary = grown::<Value>(1);
    let mut flags = grown::<Flag>(1);

    for slot in [1u16, 2, 3, 4] {
        primary.add(slot, Value { value: 0 });
    }
    for slot in [2u16, 4] {
        flags.add_default(slot);
    }

    let mut visited = Vec::new();
    primary.for_each_filtered_mut(flags.index(), |slot, _| visited.push(slot));

    assert_eq!(visited, vec![2, 4]);
}

#[test]
fn test_randomized_offset_correctness() {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    let mut store = grown::<Value>(4);
    let mut expected: Vec<(u16, u32)> = Vec::new();

    for step in 0..3000u32 {
        let slot = rng.gen_range(0u16..256);

        if store.has(slot) {
            if rng.gen_bool(0.5) {
                store.remove(slot);
                expected.retain(|&(s, _)| s != slot);
            } else {
                store.get_mut(slot).value = step;
                for entry in expected.iter_mut().filter(|(s, _)| *s == slot) {
                    entry.1 = step;
                }
            }
        } else {
            store.add(slot, Value { value: step });
            expected.push((slot, step));
        }

        if step % 100 == 0 {
            verify_index_invariants(store.index()).unwrap();
        }
    }

    for &(slot, value) in &expected {
        assert_eq!(store.get(slot), Some(&Value { value }));
    }
    assert_eq!(store.count(), expected.len());
}
