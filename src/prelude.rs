pub use crate::{bitindex, component, context, entity, group, iter, store};

pub use crate::{
    bitindex::BitIndex, component::Component, component::Tag, context::Context,
    entity::EntityHandle, entity::GroupHandle, group::Group, store::Store,
};
