/*
    Registry tests - pair dedup, membership rows, read cursors
*/

use super::{seed_user, t};
use crate::chat_store::model::PairKey;
use crate::chat_store::store::StoreError;
use crate::chat_store::ChatStore;
use proptest::prelude::*;

#[test]
fn test_find_or_create_dedups_regardless_of_argument_order() {
    let store = ChatStore::new();
    let alice = seed_user(&store, "Alice", t(100));
    let bob = seed_user(&store, "Bob", t(100));

    let first = store
        .registry
        .find_or_create_direct_at(&alice, &bob, t(200))
        .unwrap();
    let second = store
        .registry
        .find_or_create_direct_at(&bob, &alice, t(300))
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(store.registry.members_of(&first).unwrap().len(), 2);
    assert_eq!(store.registry.conversations_for_user(&alice).unwrap(), vec![first.clone()]);
    assert_eq!(store.registry.conversations_for_user(&bob).unwrap(), vec![first]);
}

#[test]
fn test_finding_an_existing_conversation_touches_nothing() {
    let store = ChatStore::new();
    let alice = seed_user(&store, "Alice", t(100));
    let bob = seed_user(&store, "Bob", t(100));

    let id = store
        .registry
        .find_or_create_direct_at(&alice, &bob, t(200))
        .unwrap();
    store
        .registry
        .find_or_create_direct_at(&alice, &bob, t(900))
        .unwrap();

    let conversation = store.registry.get_conversation(&id).unwrap().unwrap();
    assert_eq!(conversation.updated_at, t(200));
    let member = store.registry.member(&id, &alice).unwrap().unwrap();
    assert_eq!(member.last_read_at, t(200));
}

#[test]
fn test_member_rows_start_read_and_idle() {
    let store = ChatStore::new();
    let alice = seed_user(&store, "Alice", t(100));
    let bob = seed_user(&store, "Bob", t(100));

    let id = store
        .registry
        .find_or_create_direct_at(&alice, &bob, t(200))
        .unwrap();

    for user in [&alice, &bob] {
        let member = store.registry.member(&id, user).unwrap().unwrap();
        assert_eq!(member.last_read_at, t(200));
        assert!(!member.is_typing);
    }
}

#[test]
fn test_self_pair_is_rejected() {
    let store = ChatStore::new();
    let alice = seed_user(&store, "Alice", t(100));

    let err = store
        .registry
        .find_or_create_direct(&alice, &alice)
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
}

#[test]
fn test_unknown_participant_is_rejected() {
    let store = ChatStore::new();
    let alice = seed_user(&store, "Alice", t(100));
    let ghost = crate::chat_store::model::UserId::generate();

    let err = store
        .registry
        .find_or_create_direct(&alice, &ghost)
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[test]
fn test_mark_read_moves_the_cursor() {
    let store = ChatStore::new();
    let alice = seed_user(&store, "Alice", t(100));
    let bob = seed_user(&store, "Bob", t(100));
    let id = store
        .registry
        .find_or_create_direct_at(&alice, &bob, t(200))
        .unwrap();

    store.registry.mark_read_at(&id, &alice, t(500)).unwrap();

    let member = store.registry.member(&id, &alice).unwrap().unwrap();
    assert_eq!(member.last_read_at, t(500));
    // Bob's cursor is his own; untouched.
    let member = store.registry.member(&id, &bob).unwrap().unwrap();
    assert_eq!(member.last_read_at, t(200));
}

#[test]
fn test_mark_read_on_missing_membership_is_a_no_op() {
    let store = ChatStore::new();
    let alice = seed_user(&store, "Alice", t(100));
    let id = crate::chat_store::model::ConversationId::generate();
    store.registry.mark_read(&id, &alice).unwrap();
}

proptest! {
    #[test]
    fn prop_pair_key_is_order_independent(a in "[a-z0-9]{1,12}", b in "[a-z0-9]{1,12}") {
        let ua = crate::chat_store::model::UserId::new(a);
        let ub = crate::chat_store::model::UserId::new(b);
        prop_assert_eq!(
            PairKey::new(ua.clone(), ub.clone()),
            PairKey::new(ub, ua)
        );
    }
}
