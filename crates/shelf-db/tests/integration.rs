use shelf_db::{create_pool, run_migrations, DbRuntimeSettings};

#[test]
fn db_initialization_works() {
    let pool = create_pool(":memory:", DbRuntimeSettings::default()).expect("failed to create pool");
    let conn = pool.get().expect("failed to get connection");
    let applied = run_migrations(&conn).expect("failed to run migrations");
    assert_eq!(applied, 1);

    // Verify the catalog tables landed (excluding sqlite internals)
    let mut stmt = conn
        .prepare(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .expect("failed to prepare table listing query");
    let tables: Vec<String> = stmt
        .query_map([], |row| row.get(0))
        .expect("failed to execute table listing query")
        .map(|r| r.expect("failed to read table name"))
        .collect();

    assert_eq!(
        tables,
        vec![
            "_shelf_migrations",
            "authors",
            "books",
            "books_authors",
            "books_clients",
            "clients",
        ],
    );
}

#[test]
fn db_initialization_persists_across_reopen() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("shelf.db");
    let path = path.to_str().unwrap();

    {
        let pool = create_pool(path, DbRuntimeSettings::default()).expect("failed to create pool");
        let conn = pool.get().expect("failed to get connection");
        assert_eq!(run_migrations(&conn).expect("migrations failed"), 1);
        conn.execute("INSERT INTO books (title) VALUES ('Dune')", [])
            .expect("insert failed");
    }

    let pool = create_pool(path, DbRuntimeSettings::default()).expect("failed to reopen pool");
    let conn = pool.get().expect("failed to get connection");
    assert_eq!(
        run_migrations(&conn).expect("rerun migrations failed"),
        0,
        "migrations already applied"
    );

    let title: String = conn
        .query_row("SELECT title FROM books WHERE id = 1", [], |row| row.get(0))
        .expect("failed to read book back");
    assert_eq!(title, "Dune");
}
