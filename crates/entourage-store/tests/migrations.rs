use entourage_store::Store;
use tempfile::TempDir;

#[test]
fn migrations_apply_once() {
    let store = Store::open_in_memory().expect("open in memory");
    assert_eq!(store.schema_version().expect("version"), 0);
    store.migrate().expect("migrate");
    store.migrate().expect("migrate again");

    let version: i64 = store
        .connection()
        .query_row("SELECT version FROM entourage_schema LIMIT 1;", [], |row| {
            row.get(0)
        })
        .expect("schema version");
    assert_eq!(version, 1);
    assert_eq!(store.schema_version().expect("version"), 1);
}

#[test]
fn open_creates_missing_parent_directories() {
    let temp = TempDir::new().expect("temp dir");
    let path = temp.path().join("nested").join("entourage.sqlite3");
    let store = Store::open(&path).expect("open");
    store.migrate().expect("migrate");
    assert!(path.exists());
}

#[cfg(unix)]
#[test]
fn database_file_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().expect("temp dir");
    let path = temp.path().join("entourage.sqlite3");
    let store = Store::open(&path).expect("open");
    store.migrate().expect("migrate");
    drop(store);
    let reopened = Store::open(&path).expect("reopen");
    drop(reopened);

    let mode = std::fs::metadata(&path).expect("metadata").permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}
