use bookshelf::{BookPatch, NewBook, StoreError, ValidationError};

use crate::support::TempStore;

#[test]
fn create_delete_create_never_reuses_ids() {
    let t = TempStore::new();

    let dune = t.store.create(NewBook::new("Dune", "Herbert", true)).unwrap();
    assert_eq!(dune.id, 1);
    assert_eq!(dune.title, "Dune");

    let foo = t.store.create(NewBook::new("Foo", "Bar", false)).unwrap();
    assert_eq!(foo.id, 2);

    t.store.delete(1).unwrap();

    let baz = t.store.create(NewBook::new("Baz", "Qux", true)).unwrap();
    assert_eq!(baz.id, 3);

    let ids: Vec<u64> = t.store.list().unwrap().iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![2, 3]);
}

#[test]
fn empty_title_is_rejected_without_side_effects() {
    let t = TempStore::new();

    let err = t.store.create(NewBook::new("", "A", true)).unwrap_err();
    assert_eq!(err, StoreError::Validation(ValidationError::EmptyField("title")));
    assert!(t.store.list().unwrap().is_empty());
    assert!(!t.path().exists());

    let book = t.store.create(NewBook::new("T", "A", true)).unwrap();
    assert_eq!(book.id, 1);
}

#[test]
fn partial_update_keeps_other_fields() {
    let t = TempStore::new();
    let book = t.store.create(NewBook::new("Dune", "Herbert", false)).unwrap();

    let updated = t.store.update(book.id, BookPatch::new().title("X")).unwrap();
    assert_eq!(updated.id, book.id);
    assert_eq!(updated.title, "X");
    assert_eq!(updated.author, "Herbert");
    assert!(!updated.available);

    assert_eq!(t.reopen().get(book.id).unwrap(), updated);
}

#[test]
fn missing_ids_are_not_found() {
    let t = TempStore::new();
    t.store.create(NewBook::new("Dune", "Herbert", true)).unwrap();
    let before = std::fs::read(t.path()).unwrap();

    assert_eq!(t.store.get(5).unwrap_err(), StoreError::NotFound(5));
    assert_eq!(t.store.delete(5).unwrap_err(), StoreError::NotFound(5));
    assert_eq!(
        t.store.update(5, BookPatch::new().available(false)).unwrap_err(),
        StoreError::NotFound(5)
    );

    assert_eq!(t.store.len().unwrap(), 1);
    assert_eq!(std::fs::read(t.path()).unwrap(), before);
}

#[test]
fn available_filter() {
    let t = TempStore::new();
    for (title, available) in [("A", false), ("B", true), ("C", true), ("D", false)] {
        t.store.create(NewBook::new(title, "someone", available)).unwrap();
    }
    t.store.update(1, BookPatch::new().available(true)).unwrap();
    t.store.update(3, BookPatch::new().available(false)).unwrap();

    let titles: Vec<String> = t
        .store
        .list_available()
        .unwrap()
        .into_iter()
        .map(|b| b.title)
        .collect();
    assert_eq!(titles, vec!["A", "B"]);
}
