use std::fs;

use bookshelf::{
    Book, BookStore, Format, JsonFileStorage, NewBook, Storage, StoreConfig, StoreError,
};

use crate::support::TempStore;

#[test]
fn reopened_store_sees_persisted_books_and_continues_ids() {
    let t = TempStore::new();
    t.store.create(NewBook::new("Dune", "Herbert", true)).unwrap();
    t.store.create(NewBook::new("Foo", "Bar", false)).unwrap();
    t.store.delete(1).unwrap();

    let reopened = t.reopen();
    assert_eq!(reopened.list().unwrap(), t.store.list().unwrap());
    assert_eq!(reopened.next_id().unwrap(), 3);
}

#[test]
fn file_layout_matches_legacy_data_files() {
    let t = TempStore::new();
    t.store.create(NewBook::new("Dune", "Herbert", true)).unwrap();

    let expected = r#"[
  {
    "id": 1,
    "title": "Dune",
    "author": "Herbert",
    "available": true
  }
]"#;
    assert_eq!(fs::read_to_string(t.path()).unwrap(), expected);
}

#[test]
fn legacy_file_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("books.json");
    fs::write(
        &path,
        r#"[
  { "id": 1, "title": "The Hobbit", "author": "J.R.R. Tolkien", "available": true },
  { "id": 2, "title": "1984", "author": "George Orwell", "available": false }
]"#,
    )
    .unwrap();

    let store = BookStore::open(StoreConfig::new(&path)).unwrap();
    assert_eq!(store.len().unwrap(), 2);
    assert_eq!(store.list_available().unwrap()[0].title, "The Hobbit");
    assert_eq!(store.create(NewBook::new("Dune", "Herbert", true)).unwrap().id, 3);
}

#[test]
fn corrupt_file_fails_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("books.json");
    fs::write(&path, r#"[{"id": 1, "title": "Dune"}]"#).unwrap();

    match BookStore::open(StoreConfig::new(&path)) {
        Err(StoreError::CorruptState { path: reported, .. }) => assert_eq!(reported, path),
        Err(other) => panic!("expected corrupt state, got {other}"),
        Ok(_) => panic!("expected corrupt state, store opened"),
    }
    // The corrupt file is left for inspection.
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        r#"[{"id": 1, "title": "Dune"}]"#
    );
}

#[test]
fn truncated_file_fails_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("books.json");
    fs::write(&path, "").unwrap();

    assert!(matches!(
        BookStore::open(StoreConfig::new(&path)),
        Err(StoreError::CorruptState { .. })
    ));
    assert!(fs::read(&path).unwrap().is_empty());
}

#[test]
fn save_of_load_is_byte_stable() {
    let t = TempStore::new();
    t.store.create(NewBook::new("Dune", "Herbert", true)).unwrap();
    t.store.create(NewBook::new("Foo", "Bar", false)).unwrap();
    let before = fs::read(t.path()).unwrap();

    let storage = JsonFileStorage::new(t.path());
    storage.save(&storage.load().unwrap()).unwrap();
    assert_eq!(fs::read(t.path()).unwrap(), before);
}

#[test]
fn compact_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("books.json");
    let store =
        BookStore::open(StoreConfig::new(&path).with_format(Format::Compact)).unwrap();
    store.create(NewBook::new("Dune", "Herbert", true)).unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        r#"[{"id":1,"title":"Dune","author":"Herbert","available":true}]"#
    );
}

#[test]
fn unwritable_location_rolls_back() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("data");
    let store = BookStore::open(StoreConfig::new(data_dir.join("books.json"))).unwrap();

    // A regular file where the data directory should be, so no save can succeed.
    fs::write(&data_dir, "x").unwrap();

    let err = store.create(NewBook::new("Dune", "Herbert", true)).unwrap_err();
    assert!(matches!(err, StoreError::Persistence { .. }));
    assert_eq!(store.list().unwrap(), Vec::<Book>::new());
    assert_eq!(store.next_id().unwrap(), 1);
}
