//! Integration tests for the sqlite-viewer-sqlite crate.

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use sqlite_viewer_core::{QueryParam, RowLimit, SortState, Value, search_rows, select_rows};
use sqlite_viewer_sqlite::{Database, GridMode, Session, SqlOutcome, SqliteError};

/// Creates a database file with a reserved-word table `Order`.
fn order_db(dir: &Path) -> PathBuf {
    let path = dir.join("shop.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        r#"
CREATE TABLE "Order" (id INTEGER PRIMARY KEY, "Group" TEXT, value REAL);
INSERT INTO "Order" VALUES (1, 'b', 1.5), (2, 'a', 2.5), (3, 'c', NULL);
"#,
    )
    .unwrap();
    path
}

/// Creates a database with indexes and foreign keys.
fn library_db(dir: &Path) -> PathBuf {
    let path = dir.join("library.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        r#"
CREATE TABLE authors (id INTEGER PRIMARY KEY, name TEXT NOT NULL UNIQUE);
CREATE TABLE books (
    id INTEGER PRIMARY KEY,
    author_id INTEGER REFERENCES authors(id) ON DELETE CASCADE,
    title TEXT,
    note TEXT,
    cover BLOB
);
CREATE INDEX books_title ON books(title);
INSERT INTO authors VALUES (1, 'Le Guin'), (2, 'Lem');
INSERT INTO books VALUES
    (1, 1, 'The Dispossessed', 'abc first', x'00ff'),
    (2, 2, 'Solaris', NULL, NULL),
    (3, 2, 'Fiasco', 'has ABC inside', NULL);
"#,
    )
    .unwrap();
    path
}

#[test]
fn order_table_fetch_returns_all_rows_with_quoted_identifiers() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(order_db(dir.path())).unwrap();

    assert_eq!(db.list_tables().unwrap(), ["Order"]);

    let sort = SortState::ascending("Group");
    let query = select_rows("Order", Some(&sort), RowLimit::new(1000)).unwrap();
    assert_eq!(
        query.sql,
        r#"SELECT * FROM "Order" ORDER BY "Group" ASC LIMIT ?"#
    );
    assert_eq!(query.params, vec![QueryParam::Integer(1000)]);

    let set = db.run(&query).unwrap();
    assert_eq!(set.columns, ["id", "Group", "value"]);
    assert_eq!(set.len(), 3);
    let groups: Vec<String> = set
        .rows
        .iter()
        .map(|r| r.get_by_name("Group").unwrap().display())
        .collect();
    assert_eq!(groups, ["a", "b", "c"]);
    assert_eq!(set.rows[2].get_by_name("value"), Some(&Value::Null));
}

#[test]
fn session_loads_order_table_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = Session::new(RowLimit::new(1000));
    session.open(order_db(dir.path())).unwrap();

    assert_eq!(session.selected_table(), Some("Order"));
    assert_eq!(session.columns(), ["id", "Group", "value"]);

    let page = session.load().unwrap();
    assert_eq!(page.mode, GridMode::Browse);
    assert_eq!(page.result.columns, ["id", "Group", "value"]);
    assert_eq!(page.result.len(), 3);
    assert_eq!(page.total, Some(3));
}

#[test]
fn search_binds_patterns_and_limit_in_order() {
    let query = search_rows("books", &["name", "note"], "abc", RowLimit::new(50)).unwrap();
    assert_eq!(
        query.params,
        vec![
            QueryParam::Text("%abc%".to_string()),
            QueryParam::Text("%abc%".to_string()),
            QueryParam::Integer(50),
        ]
    );
}

#[test]
fn search_runs_against_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(library_db(dir.path())).unwrap();
    let set = db
        .search("books", &["title", "note"], "abc", RowLimit::new(50))
        .unwrap();
    let ids: Vec<_> = set.rows.iter().map(|r| r.get(0).cloned()).collect();
    assert_eq!(ids, [Some(Value::Integer(1)), Some(Value::Integer(3))]);
}

#[test]
fn introspection_reports_columns_indexes_and_foreign_keys() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(library_db(dir.path())).unwrap();

    let columns = db.columns("books").unwrap();
    let names: Vec<_> = columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["id", "author_id", "title", "note", "cover"]);
    assert_eq!(columns[0].primary_key, 1);
    assert_eq!(columns[4].decl_type, "BLOB");

    let indexes = db.indexes("books").unwrap();
    assert_eq!(indexes.len(), 1);
    assert_eq!(indexes[0].name, "books_title");
    assert!(!indexes[0].unique);
    assert_eq!(indexes[0].origin, "c");

    let author_indexes = db.indexes("authors").unwrap();
    assert!(author_indexes.iter().any(|i| i.unique && i.origin == "u"));

    let keys = db.foreign_keys("books").unwrap();
    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0].table, "authors");
    assert_eq!(keys[0].from, "author_id");
    assert_eq!(keys[0].to.as_deref(), Some("id"));
    assert_eq!(keys[0].on_delete, "CASCADE");

    let summary = db.table_summary("books").unwrap();
    assert_eq!(summary.columns, 5);
    assert_eq!(summary.rows, 3);
    assert_eq!(summary.indexes, 1);
    assert_eq!(summary.foreign_keys, 1);
}

#[test]
fn schema_view_appends_summary_to_create_statement() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = Session::default();
    session.open(library_db(dir.path())).unwrap();

    let view = session.schema(Some("books")).unwrap();
    let text = view.to_text();
    assert!(text.starts_with("CREATE TABLE books ("));
    assert!(text.ends_with(
        "-- Table info --\nColumns: 5\nRows: 3\nIndexes: 1\nForeign keys: 1"
    ));

    let all = session.all_schemas().unwrap();
    assert!(all.starts_with("-- authors --\nCREATE TABLE authors"));
    assert!(all.contains("-- books --\nCREATE TABLE books"));

    assert!(matches!(
        session.schema(Some("missing")),
        Err(SqliteError::UnknownTable(_))
    ));
}

#[test]
fn blob_and_null_cells_render_as_placeholders() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(library_db(dir.path())).unwrap();
    let set = db.fetch_rows("books", None, RowLimit::new(10)).unwrap();
    assert_eq!(set.rows[0].get_by_name("cover").unwrap().display(), "[BLOB 2 bytes]");
    assert_eq!(set.rows[1].get_by_name("note").unwrap().display(), "NULL");
}

#[test]
fn session_switches_files_and_closes() {
    let dir = tempfile::tempdir().unwrap();
    let shop = order_db(dir.path());
    let library = library_db(dir.path());

    let mut session = Session::default();
    session.open(&shop).unwrap();
    assert_eq!(session.path(), Some(shop.as_path()));

    session.open(&library).unwrap();
    assert_eq!(session.path(), Some(library.as_path()));
    assert_eq!(session.tables(), ["authors", "books"]);

    session.close();
    assert!(!session.is_open());
    assert!(matches!(session.all_schemas(), Err(SqliteError::NotConnected)));
}

#[test]
fn failed_open_leaves_session_closed_and_usable() {
    let dir = tempfile::tempdir().unwrap();
    let shop = order_db(dir.path());
    let mut session = Session::default();
    session.open(&shop).unwrap();

    let err = session.open(dir.path().join("missing.db")).unwrap_err();
    assert!(matches!(err, SqliteError::EngineError { .. }));
    assert!(!session.is_open());

    session.open(&shop).unwrap();
    assert!(session.is_open());
}

#[test]
fn user_sql_errors_do_not_break_the_session() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = Session::default();
    session.open(library_db(dir.path())).unwrap();

    let err = session.execute_sql("SELEC * FROM books").unwrap_err();
    assert!(matches!(err, SqliteError::QueryError(_)));

    let exec = session
        .execute_sql("UPDATE books SET note = 'x' WHERE author_id = 2")
        .unwrap();
    assert_eq!(exec.outcome, SqlOutcome::Affected { rows: 2 });

    let exec = session.execute_sql("SELECT COUNT(*) AS n FROM books").unwrap();
    let SqlOutcome::Rows(set) = exec.outcome else {
        panic!("expected a result set");
    };
    assert_eq!(set.columns, ["n"]);
    assert_eq!(set.rows[0].get(0), Some(&Value::Integer(3)));
}

#[test]
fn changes_persist_to_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = order_db(dir.path());

    let mut session = Session::default();
    session.open(&path).unwrap();
    session
        .execute_sql(r#"INSERT INTO "Order" ("Group", value) VALUES ('d', 4.0)"#)
        .unwrap();
    session.close();

    let db = Database::open(&path).unwrap();
    assert_eq!(db.count_rows("Order").unwrap(), 4);
}
