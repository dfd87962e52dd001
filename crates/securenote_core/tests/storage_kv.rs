use rusqlite::Connection;
use securenote_core::storage::migrations::{apply_migrations, latest_version};
use securenote_core::storage::StorageError;
use securenote_core::{open_store, KvStore, MemoryMedium, Note, StorageMedium, NOTES_KEY};

#[test]
fn corrupted_collection_blob_falls_back_to_empty() {
    let mut medium = MemoryMedium::new();
    medium.set_item(NOTES_KEY, "{definitely not json").unwrap();

    let store = KvStore::new(Box::new(medium));
    assert!(store.read::<Vec<Note>>(NOTES_KEY, Vec::new()).is_empty());
}

#[test]
fn values_roundtrip_through_a_sqlite_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kv.db");

    {
        let store = KvStore::new(Box::new(open_store(&path).unwrap()));
        store.write("greeting", &"hello".to_string()).unwrap();
    }

    let store = KvStore::new(Box::new(open_store(&path).unwrap()));
    assert_eq!(
        store.read::<String>("greeting", String::new()),
        "hello".to_string()
    );
}

#[test]
fn migrations_mirror_version_to_user_version_and_are_idempotent() {
    let mut conn = Connection::open_in_memory().unwrap();
    apply_migrations(&mut conn).unwrap();

    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, latest_version());
    assert!(latest_version() > 0);

    apply_migrations(&mut conn).unwrap();
}

#[test]
fn newer_database_than_binary_is_refused() {
    let mut conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version() + 1))
        .unwrap();

    match apply_migrations(&mut conn) {
        Err(StorageError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        }) => {
            assert_eq!(db_version, latest_version() + 1);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("expected UnsupportedSchemaVersion, got {other:?}"),
    }
}
