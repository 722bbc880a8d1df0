use std::fs;

use sporlstats::storage::{FileStorage, KeyValueStorage, MemoryStorage, TOKEN_KEY, TokenStore};
use tempfile::TempDir;

#[test]
fn test_token_store_reads_storage_once() {
    let storage = MemoryStorage::with_entry(TOKEN_KEY, "abc123");
    let mut store = TokenStore::new(storage.clone());

    assert_eq!(store.load().as_deref(), Some("abc123"));

    // later writes behind the store's back are not picked up
    let mut raw = storage.clone();
    raw.set(TOKEN_KEY, "other").unwrap();
    assert_eq!(store.load().as_deref(), Some("abc123"));
}

#[test]
fn test_token_store_save_and_clear() {
    let storage = MemoryStorage::new();
    let mut store = TokenStore::new(storage.clone());

    assert_eq!(store.load(), None);

    store.save("tok1").unwrap();
    assert_eq!(store.load().as_deref(), Some("tok1"));
    assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("tok1"));

    store.clear().unwrap();
    assert_eq!(store.load(), None);
    assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
}

#[test]
fn test_token_store_ignores_empty_token() {
    let mut store = TokenStore::new(MemoryStorage::with_entry(TOKEN_KEY, ""));

    assert_eq!(store.load(), None);
}

#[test]
fn test_file_storage_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("storage.json");
    let mut storage = FileStorage::new(path.clone());

    assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);

    storage.set(TOKEN_KEY, "tok1").unwrap();
    storage.set("other", "value").unwrap();
    assert!(path.is_file());

    let reopened = FileStorage::new(path.clone());
    assert_eq!(reopened.get(TOKEN_KEY).unwrap().as_deref(), Some("tok1"));

    storage.remove(TOKEN_KEY).unwrap();
    assert_eq!(reopened.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(reopened.get("other").unwrap().as_deref(), Some("value"));
}

#[test]
fn test_file_storage_rejects_corrupt_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("storage.json");
    fs::write(&path, "not json").unwrap();

    let storage = FileStorage::new(path.clone());
    assert!(storage.get(TOKEN_KEY).is_err());

    // a corrupt file reads as logged out
    let mut store = TokenStore::new(FileStorage::new(path.clone()));
    assert_eq!(store.load(), None);
}

#[test]
fn test_token_store_persists_across_instances() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("storage.json");

    let mut first = TokenStore::new(FileStorage::new(path.clone()));
    first.save("tok1").unwrap();

    let mut second = TokenStore::new(FileStorage::new(path.clone()));
    assert_eq!(second.load().as_deref(), Some("tok1"));

    second.clear().unwrap();
    let mut third = TokenStore::new(FileStorage::new(path.clone()));
    assert_eq!(third.load(), None);
}
