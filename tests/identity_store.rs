use opengpts_client::identity::UserIdStore;
use std::fs;
use tempfile::TempDir;
use uuid::Uuid;

#[test]
fn test_load_or_create_persists_new_id() {
    let temp_dir = TempDir::new().unwrap();
    let store = UserIdStore::new(temp_dir.path().join("opengpts").join("user_id"));

    assert!(store.load().is_none());
    let created = store.load_or_create().unwrap();
    assert!(Uuid::parse_str(&created).is_ok());

    let again = store.load_or_create().unwrap();
    assert_eq!(created, again);
}

#[test]
fn test_existing_id_is_trimmed() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("user_id");
    fs::write(&path, "  user-42\n").unwrap();

    let store = UserIdStore::new(&path);
    assert_eq!(store.load_or_create().unwrap(), "user-42");
}

#[test]
fn test_blank_file_is_replaced() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("user_id");
    fs::write(&path, "\n").unwrap();

    let store = UserIdStore::new(&path);
    let id = store.load_or_create().unwrap();
    assert!(!id.is_empty());
    assert_eq!(fs::read_to_string(&path).unwrap(), id);
}
