use crate::component::{Component, Tag};
use crate::group::Group;
use crate::safety::verify_group_invariants;

#[derive(Component, Default, Clone, Debug, PartialEq)]
struct Health {
    value: u32,
}

#[derive(Component, Default, Clone, Debug, PartialEq)]
struct Name {
    value: &'static str,
}

#[derive(Tag, Default, Clone)]
struct Active;

fn scene() -> Group {
    let mut group = Group::new();
    group.register::<Health>();
    group.register::<Name>();
    group.register::<Active>();
    group
}

#[test]
fn test_create_issues_sequential_slots() {
    let mut group = scene();

    for expected in 0..10u16 {
        assert_eq!(group.create_entity(), expected);
    }

    assert_eq!(group.live_count(), 10);
    assert_eq!(group.high_water(), 10);
}

#[test]
fn test_growth_lockstep_at_block_boundary() {
    let mut group = scene();

    for _ in 0..64 {
        group.create_entity();
    }
    assert_eq!(group.block_count(), 1);
    assert_eq!(group.store::<Health>().index().block_count(), 1);
    assert_eq!(group.store::<Active>().index().block_count(), 1);

    // The 65th entity grows every store by exactly one block, the
    // zero-payload flag store included.
    group.create_entity();
    assert_eq!(group.block_count(), 2);
    assert_eq!(group.store::<Health>().index().block_count(), 2);
    assert_eq!(group.store::<Name>().index().block_count(), 2);
    assert_eq!(group.store::<Active>().index().block_count(), 2);

    verify_group_invariants(&group).unwrap();
}

#[test]
fn test_destroy_clears_every_store() {
    let mut group = scene();
    let slot = group.create_entity();

    group.store_mut::<Health>().add(slot, Health { value: 5 });
    group.store_mut::<Name>().add(slot, Name { value: "a" });
    group.store_mut::<Active>().add_default(slot);

    group.destroy_entity(slot);

    assert!(!group.store::<Health>().has(slot));
    assert!(!group.store::<Name>().has(slot));
    assert!(!group.store::<Active>().has(slot));
    assert!(!group.is_alive(slot));
}

#[test]
fn test_smallest_free_slot_is_reused_first() {
    let mut group = scene();

    for _ in 0..10 {
        group.create_entity();
    }

    group.destroy_entity(7);
    group.destroy_entity(2);
    group.destroy_entity(5);

    assert_eq!(group.create_entity(), 2);
    assert_eq!(group.create_entity(), 5);
    assert_eq!(group.create_entity(), 7);
    assert_eq!(group.create_entity(), 10);
}

#[test]
fn test_destroy_all_then_reissue_from_smallest() {
    let mut group = scene();

    for _ in 0..5 {
        group.create_entity();
    }
    for slot in 0..5u16 {
        group.destroy_entity(slot);
    }

    assert_eq!(group.live_count(), 0);
    for expected in 0..5u16 {
        assert_eq!(group.create_entity(), expected);
    }
}

#[test]
fn test_double_destroy_is_noop() {
    let mut group = scene();

    for _ in 0..4 {
        group.create_entity();
    }

    group.destroy_entity(1);
    group.destroy_entity(1);
    group.destroy_entity(1);

    assert_eq!(group.free_list(), &[1]);
    verify_group_invariants(&group).unwrap();
}

#[test]
#[should_panic(expected = "never created")]
fn test_destroy_unissued_slot_panics() {
    let mut group = scene();
    group.create_entity();
    group.destroy_entity(9);
}

#[test]
#[should_panic(expected = "before any entity is created")]
fn test_register_after_create_panics() {
    #[derive(Component, Default, Clone)]
    struct Late;

    let mut group = scene();
    group.create_entity();
    group.register::<Late>();
}

#[test]
#[should_panic(expected = "registered twice")]
fn test_double_register_panics() {
    let mut group = scene();
    group.register::<Health>();
}

#[test]
#[should_panic(expected = "not registered")]
fn test_unregistered_store_access_panics() {
    #[derive(Component, Default, Clone)]
    struct Missing;

    let group = scene();
    group.store::<Missing>();
}

#[test]
#[should_panic(expected = "slot space exhausted")]
fn test_slot_space_is_capped() {
    let mut group = Group::new();

    for _ in 0..u16::MAX {
        group.create_entity();
    }

    group.create_entity();
}

#[test]
fn test_reserve_entities_keeps_high_water() {
    let mut group = scene();

    group.reserve_entities(1000);
    assert_eq!(group.high_water(), 0);
    assert_eq!(group.block_count(), 0);

    assert_eq!(group.create_entity(), 0);
}

#[test]
fn test_destroyed_payload_is_dropped() {
    use std::rc::Rc;

    #[derive(Component, Default, Clone)]
    struct Shared {
        data: Option<Rc<u32>>,
    }

    let probe = Rc::new(1u32);

    let mut group = Group::new();
    group.register::<Shared>();

    let slot = group.create_entity();
    group
        .store_mut::<Shared>()
        .add(slot, Shared { data: Some(probe.clone()) });
    assert_eq!(Rc::strong_count(&probe), 2);

    group.destroy_entity(slot);
    assert_eq!(Rc::strong_count(&probe), 1);
}

#[test]
fn test_group_drop_releases_all_payload() {
    use std::rc::Rc;

    #[derive(Component, Default, Clone)]
    struct Shared {
        data: Option<Rc<u32>>,
    }

    let probe = Rc::new(1u32);

    {
        let mut group = Group::new();
        group.register::<Shared>();

        for _ in 0..3 {
            let slot = group.create_entity();
            group
                .store_mut::<Shared>()
                .add(slot, Shared { data: Some(probe.clone()) });
        }
        assert_eq!(Rc::strong_count(&probe), 4);
    }

    assert_eq!(Rc::strong_count(&probe), 1);
}

#[test]
fn test_filtered_mut_walk() {
    let mut group = scene();

    for _ in 0..8 {
        group.create_entity();
    }
    for slot in 0..8u16 {
        group.store_mut::<Health>().add(slot, Health { value: 1 });
    }
    for slot in [1u16, 4, 6] {
        group.store_mut::<Active>().add_default(slot);
    }

    let mut visited = Vec::new();
    group.for_each_filtered_mut::<Health, Active>(|slot, health| {
        health.value += 1;
        visited.push(slot);
    });

    assert_eq!(visited, vec![1, 4, 6]);
    assert_eq!(group.store::<Health>().get(4), Some(&Health { value: 2 }));
    assert_eq!(group.store::<Health>().get(3), Some(&Health { value: 1 }));
}
