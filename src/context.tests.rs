use crate::component::Component;
use crate::context::Context;
use crate::entity::{EntityHandle, GroupHandle};

#[derive(Component, Default, Clone, Debug, PartialEq)]
struct Marker {
    value: u32,
}

#[test]
fn test_group_handles_reuse_vacant_indices() {
    let mut context = Context::new();

    let a = context.create_group(|_| {});
    let b = context.create_group(|_| {});
    let c = context.create_group(|_| {});
    assert_eq!((a.index(), b.index(), c.index()), (0, 1, 2));

    context.destroy_group(b);
    assert!(!context.is_valid_group(b));

    // The vacant middle index comes back before the table grows
    let reused = context.create_group(|_| {});
    assert_eq!(reused.index(), 1);
    assert_eq!(context.group_count(), 3);
}

#[test]
fn test_entity_handles_compose_group_and_slot() {
    let mut context = Context::new();

    let a = context.create_group(|group| group.register::<Marker>());
    let b = context.create_group(|group| group.register::<Marker>());

    let ea = context.create_entity(a);
    let eb = context.create_entity(b);

    // Same slot, different groups: distinct handles
    assert_eq!(ea.slot(), 0);
    assert_eq!(eb.slot(), 0);
    assert_ne!(ea, eb);

    assert!(context.is_valid(ea));
    assert!(context.is_valid(eb));
}

#[test]
fn test_validity_tracks_liveness() {
    let mut context = Context::new();
    let group = context.create_group(|group| group.register::<Marker>());

    let entity = context.create_entity(group);
    assert!(context.is_valid(entity));

    context.destroy_entity(entity);
    assert!(!context.is_valid(entity));

    // A never-issued slot in a live group is invalid too
    assert!(!context.is_valid(EntityHandle::new(group, 40)));
    assert!(!context.is_valid(EntityHandle::none()));
}

#[test]
fn test_validity_after_group_destruction() {
    let mut context = Context::new();
    let group = context.create_group(|group| group.register::<Marker>());
    let entity = context.create_entity(group);

    context.destroy_group(group);

    assert!(!context.is_valid_group(group));
    assert!(!context.is_valid(entity));
    assert!(!context.is_valid(EntityHandle::new(GroupHandle::new(9), 0)));
}

#[test]
#[should_panic(expected = "is not alive")]
fn test_dead_group_access_panics() {
    let mut context = Context::new();
    let group = context.create_group(|_| {});
    context.destroy_group(group);

    context.group(group);
}

#[test]
fn test_staged_destruction_defers_until_flush() {
    let mut context = Context::new();
    let group = context.create_group(|group| group.register::<Marker>());

    let a = context.create_entity(group);
    let b = context.create_entity(group);
    context.group_mut(group).store_mut::<Marker>().add(a.slot(), Marker { value: 1 });
    context.group_mut(group).store_mut::<Marker>().add(b.slot(), Marker { value: 2 });

    context.stage_destroy(a);
    context.stage_destroy(a); // duplicate staging is a no-op
    assert!(context.has_staged());

    // Nothing happens until the flush point
    assert!(context.is_valid(a));

    context.flush_destroyed();
    assert!(!context.is_valid(a));
    assert!(context.is_valid(b));
    assert!(!context.has_staged());
    assert_eq!(context.group(group).free_list(), &[a.slot()]);
}

#[test]
fn test_flush_destroys_entities_before_groups() {
    let mut context = Context::new();

    let keep = context.create_group(|group| group.register::<Marker>());
    let gone = context.create_group(|group| group.register::<Marker>());

    let in_keep = context.create_entity(keep);
    let in_gone = context.create_entity(gone);

    context.stage_destroy(in_keep);
    context.stage_destroy(in_gone); // group goes away in the same flush
    context.stage_destroy_group(gone);

    context.flush_destroyed();

    assert!(!context.is_valid(in_keep));
    assert!(context.is_valid_group(keep));
    assert!(!context.is_valid_group(gone));
}

#[test]
fn test_cascading_staging_during_traversal() {
    // A traversal discovers follow-up deletions; staging keeps the cursor
    // valid and the flush point applies everything at once.
    let mut context = Context::new();
    let group = context.create_group(|group| group.register::<Marker>());

    let mut handles = Vec::new();
    for value in 0..6u32 {
        let entity = context.create_entity(group);
        context
            .group_mut(group)
            .store_mut::<Marker>()
            .add(entity.slot(), Marker { value });
        handles.push(entity);
    }

    let doomed: Vec<EntityHandle> = context
        .iter_entities::<Marker>()
        .filter(|(_, marker)| marker.value % 2 == 0)
        .map(|(handle, _)| handle)
        .collect();

    for handle in doomed {
        context.stage_destroy(handle);
    }
    context.flush_destroyed();

    let survivors: Vec<u32> = context.iter::<Marker>().map(|m| m.value).collect();
    assert_eq!(survivors, vec![1, 3, 5]);
}

#[test]
fn test_for_each_mut_spans_groups() {
    let mut context = Context::new();

    let a = context.create_group(|group| group.register::<Marker>());
    let b = context.create_group(|group| group.register::<Marker>());

    for group in [a, b] {
        for value in 0..3u32 {
            let entity = context.create_entity(group);
            context
                .group_mut(group)
                .store_mut::<Marker>()
                .add(entity.slot(), Marker { value });
        }
    }

    context.for_each_mut::<Marker>(|_, marker| marker.value += 10);

    let values: Vec<u32> = context.iter::<Marker>().map(|m| m.value).collect();
    assert_eq!(values, vec![10, 11, 12, 10, 11, 12]);
}
