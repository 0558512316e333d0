use crate::entity::{EntityHandle, GroupHandle};

#[test]
fn test_pack_unpack() {
    let handle = EntityHandle::new(GroupHandle::new(7), 513);

    assert_eq!(handle.group(), GroupHandle::new(7));
    assert_eq!(handle.slot(), 513);
    assert_eq!(std::mem::size_of::<EntityHandle>(), 4);
}

#[test]
fn test_none_sentinel_never_aliases() {
    let none = EntityHandle::none();
    assert!(none.is_none());
    assert_eq!(EntityHandle::default(), none);

    // Highest issuable group and slot are both 0xFFFE
    let extreme = EntityHandle::new(GroupHandle::new(GroupHandle::MAX), u16::MAX - 1);
    assert_ne!(extreme, none);
    assert!(!extreme.is_none());
}

#[test]
fn test_ordering_groups_then_slots() {
    let a = EntityHandle::new(GroupHandle::new(0), 9);
    let b = EntityHandle::new(GroupHandle::new(0), 10);
    let c = EntityHandle::new(GroupHandle::new(1), 0);

    assert!(a < b);
    assert!(b < c);
}

#[test]
fn test_equality_is_on_both_fields() {
    let a = EntityHandle::new(GroupHandle::new(1), 5);
    let b = EntityHandle::new(GroupHandle::new(2), 5);
    let c = EntityHandle::new(GroupHandle::new(1), 5);

    assert_ne!(a, b);
    assert_eq!(a, c);
}
