use serde_json::{json, Map, Value};
use std::fs;
use task_store::{Document, DocumentStore, StoreError};

fn open_temp_store() -> (tempfile::TempDir, DocumentStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = DocumentStore::open(dir.path().join("data")).unwrap();
    (dir, store)
}

fn mapping(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

#[test]
fn saved_tasks_come_back_from_load_all() {
    let (_dir, store) = open_temp_store();

    let report = store.save_all(&mapping(json!({"tasks": [{"id": 1}]})));
    assert!(report.is_complete());
    assert_eq!(report.saved, vec!["tasks".to_string()]);

    let data = store.load_all();
    assert_eq!(data.get("tasks"), Some(&json!([{"id": 1}])));
}

#[test]
fn missing_documents_are_absent_not_null() {
    let (_dir, store) = open_temp_store();

    store.save("emails", &json!([])).unwrap();
    let data = store.load_all();

    assert_eq!(data.len(), 1);
    assert!(data.contains_key("emails"));
    for doc in Document::ALL {
        if doc != Document::Emails {
            assert!(!data.contains_key(doc.as_str()), "{} should be absent", doc);
        }
    }
}

#[test]
fn corrupt_document_loads_as_empty_array() {
    let (_dir, store) = open_temp_store();

    fs::write(store.data_dir().join("projects.json"), "{not json").unwrap();
    store.save("meetings", &json!([{"title": "standup"}])).unwrap();

    let data = store.load_all();
    assert_eq!(data.get("projects"), Some(&json!([])));
    assert_eq!(data.get("meetings"), Some(&json!([{"title": "standup"}])));

    assert!(matches!(store.load("projects"), Err(StoreError::Json(_))));
}

#[test]
fn save_overwrites_previous_content() {
    let (_dir, store) = open_temp_store();

    store.save("settings", &json!({"syncInterval": 15})).unwrap();
    store.save("settings", &json!({"syncInterval": 5})).unwrap();

    assert_eq!(
        store.load("settings").unwrap(),
        Some(json!({"syncInterval": 5}))
    );
}

#[test]
fn unknown_keys_are_persisted_but_not_loaded_wholesale() {
    let (_dir, store) = open_temp_store();

    let report = store.save_all(&mapping(json!({"drafts": ["a", "b"]})));
    assert!(report.is_complete());
    assert!(store.data_dir().join("drafts.json").exists());

    assert_eq!(store.load("drafts").unwrap(), Some(json!(["a", "b"])));
    assert!(!store.load_all().contains_key("drafts"));
}

#[test]
fn one_bad_key_does_not_stop_the_rest() {
    let (dir, store) = open_temp_store();

    let report = store.save_all(&mapping(json!({
        "../outside": {"x": 1},
        "tasks": [1, 2, 3],
    })));

    assert_eq!(report.saved, vec!["tasks".to_string()]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, "../outside");
    assert!(matches!(report.failed[0].1, StoreError::InvalidName(_)));
    assert!(!dir.path().join("outside.json").exists());
    assert_eq!(store.load("tasks").unwrap(), Some(json!([1, 2, 3])));
}

#[test]
fn arbitrary_values_survive_a_reload() {
    let (_dir, store) = open_temp_store();

    let values = [
        json!(null),
        json!(true),
        json!(42),
        json!(-3.5),
        json!("plain text"),
        json!({"nested": {"list": [1, {"deep": "ü"}], "empty": {}}}),
    ];

    for value in &values {
        store.save("settings", value).unwrap();
        assert_eq!(store.load("settings").unwrap().as_ref(), Some(value));
    }
}
