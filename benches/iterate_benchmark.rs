use criterion::{Criterion, black_box, criterion_group, criterion_main};

use groupset_ecs::component::{Component, Tag};
use groupset_ecs::context::Context;

#[derive(Component, Default, Clone)]
struct Position {
    x: f32,
    y: f32,
}

#[derive(Tag, Default, Clone)]
struct Visible;

fn populated_context(groups: usize, per_group: usize, tag_every: usize) -> Context {
    let mut context = Context::new();

    for _ in 0..groups {
        let scene = context.create_group(|group| {
            group.register::<Position>();
            group.register::<Visible>();
        });

        for i in 0..per_group {
            let entity = context.create_entity(scene);
            let group = context.group_mut(scene);

            group.store_mut::<Position>().add(
                entity.slot(),
                Position {
                    x: i as f32,
                    y: 0.0,
                },
            );

            if i % tag_every == 0 {
                group.store_mut::<Visible>().add_default(entity.slot());
            }
        }
    }

    context
}

fn benchmark_dense_iterate_10000(c: &mut Criterion) {
    let context = populated_context(4, 2500, 4);

    c.bench_function("dense_iterate_10000", |b| {
        b.iter(|| {
            let mut sum = 0.0f32;
            for position in context.iter::<Position>() {
                sum += position.x;
            }
            black_box(sum)
        })
    });
}

fn benchmark_entity_iterate_10000(c: &mut Criterion) {
    let context = populated_context(4, 2500, 4);

    c.bench_function("entity_iterate_10000", |b| {
        b.iter(|| {
            let mut sum = 0u32;
            for (handle, _) in context.iter_entities::<Position>() {
                sum = sum.wrapping_add(handle.slot() as u32);
            }
            black_box(sum)
        })
    });
}

fn benchmark_filtered_iterate_10000(c: &mut Criterion) {
    let context = populated_context(4, 2500, 4);

    c.bench_function("filtered_iterate_10000", |b| {
        b.iter(|| {
            let mut sum = 0.0f32;
            for (_, position) in context.iter_filtered::<Position, Visible>() {
                sum += position.x;
            }
            black_box(sum)
        })
    });
}

fn benchmark_for_each_mut_10000(c: &mut Criterion) {
    let mut context = populated_context(4, 2500, 4);

    c.bench_function("for_each_mut_10000", |b| {
        b.iter(|| {
            context.for_each_mut::<Position>(|_, position| {
                position.y += 1.0;
            });
        })
    });
}

criterion_group!(
    benches,
    benchmark_dense_iterate_10000,
    benchmark_entity_iterate_10000,
    benchmark_filtered_iterate_10000,
    benchmark_for_each_mut_10000,
);
criterion_main!(benches);
