use groupset_ecs::prelude::*;

// 1. Define components
#[derive(Component, Default, Clone, Debug, PartialEq)]
struct Position {
    x: f32,
    y: f32,
}

#[derive(Component, Default, Clone, Debug, PartialEq)]
struct Velocity {
    x: f32,
    y: f32,
}

// Zero-payload flag, used only to gate filtered iteration
#[derive(Tag, Default, Clone)]
struct Frozen;

fn main() {
    let mut context = Context::new();

    // 2. Create a group and register its stores up front
    let scene = context.create_group(|group| {
        group.register::<Position>();
        group.register::<Velocity>();
        group.register::<Frozen>();
    });

    // 3. Spawn entities and attach components
    let mut movers = Vec::new();

    for i in 0..8 {
        let entity = context.create_entity(scene);
        let group = context.group_mut(scene);

        group
            .store_mut::<Position>()
            .add(entity.slot(), Position { x: i as f32, y: 0.0 });
        group
            .store_mut::<Velocity>()
            .add(entity.slot(), Velocity { x: 1.0, y: 0.5 });

        if i % 2 == 0 {
            group.store_mut::<Frozen>().add_default(entity.slot());
        }

        movers.push(entity);
    }

    // 4. Integrate: mutate positions of every non-frozen mover. Velocities
    // are read through random access while positions stream mutably.
    let velocities: Vec<(u16, Velocity)> = context
        .iter_entities::<Velocity>()
        .map(|(handle, v)| (handle.slot(), v.clone()))
        .collect();

    context.for_each_mut::<Position>(|handle, position| {
        if let Some((_, velocity)) = velocities.iter().find(|(slot, _)| *slot == handle.slot()) {
            position.x += velocity.x;
            position.y += velocity.y;
        }
    });

    // 5. Stream the frozen subset only
    for (handle, position) in context.iter_filtered::<Position, Frozen>() {
        println!("frozen {:?} at {:?}", handle, position);
    }

    // 6. Stage and flush destruction
    context.stage_destroy(movers[1]);
    context.stage_destroy(movers[3]);
    context.flush_destroyed();

    println!(
        "{} movers left",
        context.group(scene).store::<Position>().count()
    );
}
