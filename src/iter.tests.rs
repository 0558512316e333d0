use crate::component::{Component, Tag};
use crate::context::Context;
use crate::entity::GroupHandle;

#[derive(Component, Default, Clone, Debug, PartialEq)]
struct Payload {
    value: u32,
}

#[derive(Tag, Default, Clone)]
struct Chosen;

fn populated(context: &mut Context, slots: &[u16]) -> GroupHandle {
    let group = context.create_group(|group| {
        group.register::<Payload>();
        group.register::<Chosen>();
    });

    let top = slots.iter().copied().max().map_or(0, |s| s + 1);
    for _ in 0..top {
        context.create_entity(group);
    }

    for &slot in slots {
        context
            .group_mut(group)
            .store_mut::<Payload>()
            .add(slot, Payload { value: slot as u32 });
    }

    group
}

#[test]
fn test_entity_iter_yields_ascending_slots() {
    let mut context = Context::new();
    let group = populated(&mut context, &[9, 2, 5]);

    let slots: Vec<u16> = context
        .iter_entities::<Payload>()
        .map(|(handle, _)| handle.slot())
        .collect();
    assert_eq!(slots, vec![2, 5, 9]);

    // Adding a slot in the middle shows up in order on the next pass
    context
        .group_mut(group)
        .store_mut::<Payload>()
        .add(7, Payload { value: 7 });

    let slots: Vec<u16> = context
        .iter_entities::<Payload>()
        .map(|(handle, _)| handle.slot())
        .collect();
    assert_eq!(slots, vec![2, 5, 7, 9]);
}

#[test]
fn test_entity_iter_reconstructs_handles() {
    let mut context = Context::new();
    let group = populated(&mut context, &[2, 5]);

    for (handle, payload) in context.iter_entities::<Payload>() {
        assert_eq!(handle.group(), group);
        assert_eq!(handle.slot() as u32, payload.value);
        assert!(context.is_valid(handle));
    }
}

#[test]
fn test_dense_iter_matches_entity_iter_order() {
    let mut context = Context::new();
    populated(&mut context, &[9, 2, 70, 5]);

    let dense: Vec<u32> = context.iter::<Payload>().map(|p| p.value).collect();
    let via_bits: Vec<u32> = context
        .iter_entities::<Payload>()
        .map(|(_, p)| p.value)
        .collect();

    assert_eq!(dense, vec![2, 5, 9, 70]);
    assert_eq!(dense, via_bits);
}

#[test]
fn test_iteration_crosses_group_boundaries() {
    let mut context = Context::new();

    let a = populated(&mut context, &[1, 3]);
    let empty = context.create_group(|group| {
        group.register::<Payload>();
    });
    let without_store = context.create_group(|_| {});
    let b = populated(&mut context, &[0, 2]);

    let handles: Vec<(GroupHandle, u16)> = context
        .iter_entities::<Payload>()
        .map(|(handle, _)| (handle.group(), handle.slot()))
        .collect();

    // Groups walk in handle order; empty and store-less groups are skipped
    assert_eq!(handles, vec![(a, 1), (a, 3), (b, 0), (b, 2)]);

    let _ = (empty, without_store);
}

#[test]
fn test_iteration_skips_destroyed_group() {
    let mut context = Context::new();

    let a = populated(&mut context, &[0]);
    let b = populated(&mut context, &[1]);
    let c = populated(&mut context, &[2]);

    context.destroy_group(b);

    let groups: Vec<GroupHandle> = context
        .iter_entities::<Payload>()
        .map(|(handle, _)| handle.group())
        .collect();
    assert_eq!(groups, vec![a, c]);
}

#[test]
fn test_empty_context_iterates_nothing() {
    let context = Context::new();
    assert_eq!(context.iter::<Payload>().count(), 0);
    assert_eq!(context.iter_entities::<Payload>().count(), 0);
    assert_eq!(context.iter_filtered::<Payload, Chosen>().count(), 0);
}

#[test]
fn test_filtered_iter_intersects_two_stores() {
    let mut context = Context::new();
    let group = populated(&mut context, &[1, 2, 3, 4]);

    for slot in [2u16, 4] {
        context
            .group_mut(group)
            .store_mut::<Chosen>()
            .add_default(slot);
    }

    let slots: Vec<u16> = context
        .iter_filtered::<Payload, Chosen>()
        .map(|(handle, _)| handle.slot())
        .collect();
    assert_eq!(slots, vec![2, 4]);
}

#[test]
fn test_filtered_iter_dense_offsets_follow_primary() {
    let mut context = Context::new();
    let group = populated(&mut context, &[10, 20, 30]);

    // Tag only the last primary element; its payload offset is 2, which the
    // cursor must reach by advancing on the untagged bits it skips.
    context
        .group_mut(group)
        .store_mut::<Chosen>()
        .add_default(30);

    let yielded: Vec<u32> = context
        .iter_filtered::<Payload, Chosen>()
        .map(|(_, p)| p.value)
        .collect();
    assert_eq!(yielded, vec![30]);
}

#[test]
fn test_filtered_iter_across_blocks() {
    let mut context = Context::new();
    let group = populated(&mut context, &[0, 63, 64, 127, 128]);

    for slot in [63u16, 64, 128] {
        context
            .group_mut(group)
            .store_mut::<Chosen>()
            .add_default(slot);
    }

    let slots: Vec<u16> = context
        .iter_filtered::<Payload, Chosen>()
        .map(|(handle, _)| handle.slot())
        .collect();
    assert_eq!(slots, vec![63, 64, 128]);
}

#[test]
fn test_filtered_iter_skips_group_without_filter_store() {
    let mut context = Context::new();

    let plain = context.create_group(|group| {
        group.register::<Payload>();
    });
    context.create_entity(plain);
    context
        .group_mut(plain)
        .store_mut::<Payload>()
        .add(0, Payload { value: 0 });

    let tagged = populated(&mut context, &[5]);
    context
        .group_mut(tagged)
        .store_mut::<Chosen>()
        .add_default(5);

    let groups: Vec<GroupHandle> = context
        .iter_filtered::<Payload, Chosen>()
        .map(|(handle, _)| handle.group())
        .collect();
    assert_eq!(groups, vec![tagged]);
}

#[test]
fn test_fresh_cursor_restarts_from_first_group() {
    let mut context = Context::new();
    populated(&mut context, &[0, 1]);
    populated(&mut context, &[2]);

    let first: Vec<u32> = context.iter::<Payload>().map(|p| p.value).collect();
    let second: Vec<u32> = context.iter::<Payload>().map(|p| p.value).collect();
    assert_eq!(first, second);
}
