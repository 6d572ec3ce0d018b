use serde_json::{json, Value};
use verdict_core::db::open_db_in_memory;
use verdict_core::{DocumentBody, DocumentStore, SqliteDocumentStore, StoreError};

fn body(value: Value) -> DocumentBody {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDocumentStore::new(&conn);

    let id = store
        .create("verdicts", &body(json!({"caseNumber": "CV-1"})))
        .unwrap();
    let loaded = store.get("verdicts", &id).unwrap().unwrap();
    assert_eq!(loaded.id, id);
    assert_eq!(loaded.body["caseNumber"], "CV-1");
}

#[test]
fn collections_are_isolated() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDocumentStore::new(&conn);

    let id = store.create("verdicts", &body(json!({"a": 1}))).unwrap();
    store.create("archive", &body(json!({"b": 2}))).unwrap();

    assert!(store.get("archive", &id).unwrap().is_none());
    assert_eq!(store.list_all("verdicts").unwrap().len(), 1);
    assert_eq!(store.list_all("archive").unwrap().len(), 1);
    assert!(store.list_all("missing").unwrap().is_empty());
}

#[test]
fn list_all_keeps_creation_order() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDocumentStore::new(&conn);

    let ids: Vec<String> = (0..4)
        .map(|n| store.create("verdicts", &body(json!({"n": n}))).unwrap())
        .collect();
    let listed: Vec<String> = store
        .list_all("verdicts")
        .unwrap()
        .into_iter()
        .map(|doc| doc.id)
        .collect();
    assert_eq!(listed, ids);
}

#[test]
fn update_merges_top_level_keys() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDocumentStore::new(&conn);

    let id = store
        .create("verdicts", &body(json!({"keep": "x", "change": "old"})))
        .unwrap();
    store
        .update("verdicts", &id, &body(json!({"change": "new", "added": true})))
        .unwrap();

    let loaded = store.get("verdicts", &id).unwrap().unwrap();
    assert_eq!(loaded.body["keep"], "x");
    assert_eq!(loaded.body["change"], "new");
    assert_eq!(loaded.body["added"], true);
}

#[test]
fn update_and_delete_missing_return_not_found() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDocumentStore::new(&conn);

    let err = store
        .update("verdicts", "nope", &body(json!({"a": 1})))
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(id) if id == "nope"));

    let err = store.delete("verdicts", "nope").unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[test]
fn delete_removes_document_and_id_is_not_reissued() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDocumentStore::new(&conn);

    let first = store.create("verdicts", &body(json!({}))).unwrap();
    store.delete("verdicts", &first).unwrap();
    assert!(store.get("verdicts", &first).unwrap().is_none());

    let second = store.create("verdicts", &body(json!({}))).unwrap();
    assert_ne!(first, second);
}

#[test]
fn set_upserts_under_caller_id() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDocumentStore::new(&conn);

    store.set("users", "uid-1", &body(json!({"name": "Ana"}))).unwrap();
    store.set("users", "uid-1", &body(json!({"name": "Bea"}))).unwrap();

    let docs = store.list_all("users").unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].id, "uid-1");
    assert_eq!(docs[0].body["name"], "Bea");
}

#[test]
fn non_object_body_is_reported_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO documents (collection, doc_id, body) VALUES ('verdicts', 'bad', '[1,2]');",
        [],
    )
    .unwrap();
    let store = SqliteDocumentStore::new(&conn);

    let err = store.get("verdicts", "bad").unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
}
