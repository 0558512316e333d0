use criterion::{Criterion, criterion_group, criterion_main};

use groupset_ecs::component::{Component, Tag};
use groupset_ecs::context::Context;
use groupset_ecs::group::Group;

#[derive(Component, Default, Clone)]
struct Position {
    _x: f32,
    _y: f32,
}

#[derive(Tag, Default, Clone)]
struct Visible;

fn benchmark_group_create_destroy_1000(c: &mut Criterion) {
    let mut group = Group::new();
    group.register::<Position>();
    group.register::<Visible>();

    // Prewarm so the steady state measures free-list churn, not growth
    {
        let mut slots = Vec::with_capacity(1000);
        for _ in 0..1000 {
            slots.push(group.create_entity());
        }
        for slot in slots {
            group.destroy_entity(slot);
        }
    }

    c.bench_function("group_create_destroy_1000", |b| {
        b.iter(|| {
            let mut slots = Vec::with_capacity(1000);
            for _ in 0..1000 {
                slots.push(group.create_entity());
            }
            for slot in slots {
                group.destroy_entity(slot);
            }
        })
    });
}

fn benchmark_add_remove_1000(c: &mut Criterion) {
    let mut group = Group::new();
    group.register::<Position>();

    let mut slots = Vec::with_capacity(1000);
    for _ in 0..1000 {
        slots.push(group.create_entity());
    }

    c.bench_function("component_add_remove_1000", |b| {
        b.iter(|| {
            let store = group.store_mut::<Position>();
            for &slot in &slots {
                store.add_default(slot);
            }
            for &slot in &slots {
                store.remove(slot);
            }
        })
    });
}

fn benchmark_context_staged_flush(c: &mut Criterion) {
    c.bench_function("context_staged_flush_256", |b| {
        b.iter(|| {
            let mut context = Context::new();
            let scene = context.create_group(|group| {
                group.register::<Position>();
            });

            let mut handles = Vec::with_capacity(256);
            for _ in 0..256 {
                let entity = context.create_entity(scene);
                context
                    .group_mut(scene)
                    .store_mut::<Position>()
                    .add_default(entity.slot());
                handles.push(entity);
            }

            for handle in handles {
                context.stage_destroy(handle);
            }
            context.flush_destroyed();
        })
    });
}

criterion_group!(
    benches,
    benchmark_group_create_destroy_1000,
    benchmark_add_remove_1000,
    benchmark_context_staged_flush,
);
criterion_main!(benches);
