/*
    Directory tests - upsert idempotence, presence, sidebar ordering
*/

use super::{seed_user, t};
use crate::chat_store::model::ExternalUserId;
use crate::chat_store::ChatStore;

#[test]
fn test_upsert_is_idempotent_and_keeps_the_id() {
    let store = ChatStore::new();
    let ext = ExternalUserId::new("ext-1");

    let first = store
        .directory
        .upsert_user_at(
            ext.clone(),
            "Alice".to_string(),
            "alice@example.com".to_string(),
            "a.png".to_string(),
            t(100),
        )
        .unwrap();
    let second = store
        .directory
        .upsert_user_at(
            ext.clone(),
            "Alice".to_string(),
            "alice@example.com".to_string(),
            "a.png".to_string(),
            t(200),
        )
        .unwrap();

    assert_eq!(first, second);
    let user = store.directory.get_by_external_id(&ext).unwrap().unwrap();
    assert_eq!(user.name, "Alice");
    assert_eq!(user.last_seen, t(200));
    assert!(user.is_online);
}

#[test]
fn test_upsert_refreshes_profile_fields() {
    let store = ChatStore::new();
    let ext = ExternalUserId::new("ext-1");

    store
        .directory
        .upsert_user_at(
            ext.clone(),
            "Alice".to_string(),
            "alice@example.com".to_string(),
            "old.png".to_string(),
            t(100),
        )
        .unwrap();
    store
        .directory
        .upsert_user_at(
            ext.clone(),
            "Alicia".to_string(),
            "alicia@example.com".to_string(),
            "new.png".to_string(),
            t(200),
        )
        .unwrap();

    let user = store.directory.get_by_external_id(&ext).unwrap().unwrap();
    assert_eq!(user.name, "Alicia");
    assert_eq!(user.email, "alicia@example.com");
    assert_eq!(user.avatar_url, "new.png");
}

#[test]
fn test_set_online_status_flips_presence() {
    let store = ChatStore::new();
    let alice = seed_user(&store, "Alice", t(100));

    let ext = ExternalUserId::new("ext-alice");
    store
        .directory
        .set_online_status_at(&ext, false, t(300))
        .unwrap();

    let user = store.directory.get(&alice).unwrap().unwrap();
    assert!(!user.is_online);
    assert_eq!(user.last_seen, t(300));
    assert!(store.directory.list_online_users().unwrap().is_empty());
}

#[test]
fn test_set_online_status_on_unknown_user_is_a_no_op() {
    let store = ChatStore::new();
    // Disconnect events can race with the first upsert; no error.
    store
        .directory
        .set_online_status(&ExternalUserId::new("ext-ghost"), false)
        .unwrap();
}

#[test]
fn test_list_other_users_excludes_caller_and_sorts_by_name() {
    let store = ChatStore::new();
    seed_user(&store, "Carol", t(100));
    seed_user(&store, "Alice", t(100));
    seed_user(&store, "Bob", t(100));

    let others = store
        .directory
        .list_other_users(&ExternalUserId::new("ext-bob"))
        .unwrap();
    let names: Vec<&str> = others.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["Alice", "Carol"]);
}
