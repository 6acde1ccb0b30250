//! Catalog model for the shelf service.
//!
//! Implements book, author, and client persistence plus the two many-to-many
//! association tables (`books_authors`, `books_clients`). Multi-statement
//! writes (book create/update) run inside a single transaction so a failure
//! partway through never leaves a book without its author set.
//!
//! The association tables carry no uniqueness constraint: duplicate rows
//! are allowed and referenced ids are not checked for existence.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// A book together with its current author id set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Book {
    /// Internal database ID.
    pub id: i64,
    /// Display title.
    pub title: String,
    /// Ids of the book's authors, in insertion order.
    pub author_ids: Vec<i64>,
}

/// A bare book row, as returned by listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookRow {
    pub id: i64,
    pub title: String,
}

/// An author.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Author {
    pub id: i64,
    pub name: String,
}

/// A client of the library.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Client {
    pub id: i64,
    pub name: String,
}

/// A single client↔book association row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookClientLink {
    pub book_id: i64,
    pub client_id: i64,
}

/// Filters for listing books. Both filters are optional and combine with AND.
#[derive(Debug, Clone, Default)]
pub struct BookFilter {
    /// Literal title prefix. An empty string applies no filter.
    pub title_startswith: Option<String>,
    /// Restrict to books with at least one association to this author.
    pub author_id: Option<i64>,
}

/// Creates a book and its author associations in one transaction.
///
/// The author ids are not checked for existence; duplicates in the input
/// produce duplicate association rows.
pub fn create_book(
    conn: &Connection,
    title: &str,
    author_ids: &[i64],
) -> Result<Book, CatalogError> {
    let tx = conn.unchecked_transaction()?;

    tx.execute("INSERT INTO books (title) VALUES (?1)", [title])?;
    let book_id = tx.last_insert_rowid();

    for author_id in author_ids {
        tx.execute(
            "INSERT INTO books_authors (book_id, author_id) VALUES (?1, ?2)",
            params![book_id, author_id],
        )?;
    }

    tx.commit()?;

    Ok(Book {
        id: book_id,
        title: title.to_string(),
        author_ids: author_ids.to_vec(),
    })
}

/// Updates a book's title and replaces its author set, in one transaction.
///
/// The title update is unconditional: if no book with `book_id` exists the
/// operation still succeeds, only touching the association table. The old
/// association rows are deleted wholesale and the new set reinserted.
pub fn update_book(
    conn: &Connection,
    book_id: i64,
    title: &str,
    author_ids: &[i64],
) -> Result<Book, CatalogError> {
    let tx = conn.unchecked_transaction()?;

    tx.execute(
        "UPDATE books SET title = ?1 WHERE id = ?2",
        params![title, book_id],
    )?;
    tx.execute(
        "DELETE FROM books_authors WHERE book_id = ?1",
        [book_id],
    )?;
    for author_id in author_ids {
        tx.execute(
            "INSERT INTO books_authors (book_id, author_id) VALUES (?1, ?2)",
            params![book_id, author_id],
        )?;
    }

    tx.commit()?;

    Ok(Book {
        id: book_id,
        title: title.to_string(),
        author_ids: author_ids.to_vec(),
    })
}

/// Lists book rows matching the given filters.
///
/// `title_startswith` is a literal prefix match: LIKE metacharacters in the
/// prefix are escaped so they cannot act as wildcards. The `author_id`
/// filter uses EXISTS, so books with duplicate association rows still
/// appear once.
pub fn list_books(conn: &Connection, filter: &BookFilter) -> Result<Vec<BookRow>, CatalogError> {
    let mut sql = String::from("SELECT id, title FROM books");
    let mut clauses: Vec<String> = Vec::new();
    let mut values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();
    let mut idx = 1usize;

    if let Some(prefix) = filter
        .title_startswith
        .as_deref()
        .filter(|p| !p.is_empty())
    {
        clauses.push(format!("title LIKE ?{} ESCAPE '\\'", idx));
        values.push(Box::new(format!("{}%", escape_like(prefix))));
        idx += 1;
    }
    if let Some(author_id) = filter.author_id {
        clauses.push(format!(
            "EXISTS (SELECT 1 FROM books_authors ba
                     WHERE ba.book_id = books.id AND ba.author_id = ?{})",
            idx
        ));
        values.push(Box::new(author_id));
    }

    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY id ASC");

    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn rusqlite::types::ToSql> = values.iter().map(|v| v.as_ref()).collect();
    let rows = stmt.query_map(params.as_slice(), map_row_to_book_row)?;

    let mut books = Vec::new();
    for row in rows {
        books.push(row?);
    }
    Ok(books)
}

/// Returns a book's author ids, in association-row order.
pub fn book_author_ids(conn: &Connection, book_id: i64) -> Result<Vec<i64>, CatalogError> {
    let mut stmt =
        conn.prepare("SELECT author_id FROM books_authors WHERE book_id = ?1 ORDER BY rowid ASC")?;
    let rows = stmt.query_map([book_id], |row| row.get(0))?;

    let mut ids = Vec::new();
    for row in rows {
        ids.push(row?);
    }
    Ok(ids)
}

/// Creates an author.
pub fn create_author(conn: &Connection, name: &str) -> Result<Author, CatalogError> {
    conn.execute("INSERT INTO authors (name) VALUES (?1)", [name])?;
    Ok(Author {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
    })
}

/// Creates a client.
pub fn create_client(conn: &Connection, name: &str) -> Result<Client, CatalogError> {
    conn.execute("INSERT INTO clients (name) VALUES (?1)", [name])?;
    Ok(Client {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
    })
}

/// Lists the raw association rows for a client.
///
/// Returns `(book_id, client_id)` pairs rather than hydrated book records;
/// duplicates appear once per association row.
pub fn list_client_books(
    conn: &Connection,
    client_id: i64,
) -> Result<Vec<BookClientLink>, CatalogError> {
    let mut stmt = conn.prepare(
        "SELECT book_id, client_id FROM books_clients WHERE client_id = ?1 ORDER BY rowid ASC",
    )?;
    let rows = stmt.query_map([client_id], map_row_to_link)?;

    let mut links = Vec::new();
    for row in rows {
        links.push(row?);
    }
    Ok(links)
}

/// Associates a client with a book.
///
/// Inserts unconditionally: linking the same pair twice produces two rows,
/// and neither id is checked for existence.
pub fn link_client_book(
    conn: &Connection,
    client_id: i64,
    book_id: i64,
) -> Result<BookClientLink, CatalogError> {
    conn.execute(
        "INSERT INTO books_clients (book_id, client_id) VALUES (?1, ?2)",
        params![book_id, client_id],
    )?;
    Ok(BookClientLink { book_id, client_id })
}

/// Removes every association row matching the exact `(client_id, book_id)`
/// pair. Returns the number of rows deleted (zero when no link existed).
pub fn unlink_client_book(
    conn: &Connection,
    client_id: i64,
    book_id: i64,
) -> Result<usize, CatalogError> {
    let count = conn.execute(
        "DELETE FROM books_clients WHERE client_id = ?1 AND book_id = ?2",
        params![client_id, book_id],
    )?;
    Ok(count)
}

/// Escapes LIKE metacharacters (`%`, `_`, and the escape char itself) so a
/// user-supplied prefix matches literally.
fn escape_like(prefix: &str) -> String {
    let mut escaped = String::with_capacity(prefix.len());
    for c in prefix.chars() {
        if c == '%' || c == '_' || c == '\\' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn map_row_to_book_row(row: &Row) -> rusqlite::Result<BookRow> {
    Ok(BookRow {
        id: row.get(0)?,
        title: row.get(1)?,
    })
}

fn map_row_to_link(row: &Row) -> rusqlite::Result<BookClientLink> {
    Ok(BookClientLink {
        book_id: row.get(0)?,
        client_id: row.get(1)?,
    })
}
