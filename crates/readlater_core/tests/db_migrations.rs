use readlater_core::db::migrations::latest_version;
use readlater_core::db::{
    open_db, open_db_in_memory, table_exists, DbError, ARTICLES_TABLE, REQUIRED_TABLES,
    RULES_TABLE,
};
use readlater_core::{RepoError, SqliteArticleRepository, SqliteRuleRepository};
use rusqlite::Connection;

fn user_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn in_memory_db_is_fully_migrated() {
    let conn = open_db_in_memory().unwrap();
    assert_eq!(user_version(&conn), latest_version());
    for table in REQUIRED_TABLES {
        assert!(table_exists(&conn, table).unwrap(), "table: {table}");
    }
    assert!(SqliteArticleRepository::try_new(&conn).is_ok());
    assert!(SqliteRuleRepository::try_new(&conn).is_ok());
}

#[test]
fn reopening_a_file_db_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("readlater.sqlite3");

    drop(open_db(&path).unwrap());
    let conn = open_db(&path).unwrap();

    assert_eq!(user_version(&conn), latest_version());
}

#[test]
fn newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch("PRAGMA user_version = 99;").unwrap();
    }

    let err = open_db(&path).unwrap_err();
    assert!(matches!(
        err,
        DbError::UnsupportedSchemaVersion {
            db_version: 99,
            ..
        }
    ));
}

#[test]
fn repositories_refuse_unmigrated_connections() {
    let conn = Connection::open_in_memory().unwrap();
    assert!(!table_exists(&conn, ARTICLES_TABLE).unwrap());

    let err = SqliteArticleRepository::try_new(&conn).err().unwrap();
    assert!(matches!(err, RepoError::MissingRequiredTable(ARTICLES_TABLE)));
    let err = SqliteRuleRepository::try_new(&conn).err().unwrap();
    assert!(matches!(err, RepoError::MissingRequiredTable(RULES_TABLE)));
}
