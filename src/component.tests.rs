use crate::component::{Component, Registered, Tag};

#[derive(Component, Default, Clone)]
struct First {
    _value: u32,
}

#[derive(Component, Default, Clone)]
struct Second {
    _value: u32,
}

#[derive(Tag, Default, Clone)]
struct Marker;

#[test]
fn test_type_indices_are_distinct() {
    let a = First::type_index();
    let b = Second::type_index();
    let c = Marker::type_index();

    assert_ne!(a, b);
    assert_ne!(a, c);
    assert_ne!(b, c);
}

#[test]
fn test_type_index_is_stable() {
    assert_eq!(First::type_index(), First::type_index());
}

// A manual impl is the seam for custom removal finalizers; the derive only
// covers the default hook.
#[derive(Default, Clone)]
struct Linked {
    parent_cleared: bool,
}

impl Registered for Linked {
    fn type_index() -> usize {
        static TYPE_INDEX: std::sync::OnceLock<usize> = std::sync::OnceLock::new();
        *TYPE_INDEX.get_or_init(crate::component::next_type_index)
    }
}

impl Component for Linked {
    fn on_removed(&self) {
        assert!(
            self.parent_cleared,
            "removed a linked component with its parent reference still set"
        );
    }
}

#[test]
fn test_manual_impl_hook_runs_on_remove() {
    use crate::store::Store;

    let mut store = Store::<Linked>::new();
    crate::store::AnyStore::grow(&mut store);
    store.add(0, Linked { parent_cleared: true });
    store.remove(0); // hook asserts, passing here
}

#[test]
#[should_panic(expected = "parent reference still set")]
fn test_manual_impl_hook_rejects_dangling_link() {
    use crate::store::Store;

    let mut store = Store::<Linked>::new();
    crate::store::AnyStore::grow(&mut store);

    store.add(3, Linked { parent_cleared: false });
    store.remove(3);
}
