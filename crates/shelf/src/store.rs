//! SQLite backed storage for [`Book`] records.
//!
//! The store owns a single connection for the lifetime of the session. Statements and row
//! cursors only live for the duration of the operation that created them.

use std::path::Path;

use log::{info, trace};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::{Book, Error, ErrorKind};

const CREATE_BOOKS_SQL: &str = "CREATE TABLE IF NOT EXISTS books (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    isbn TEXT,
    area TEXT
);";

const BOOK_SELECT_SQL: &str = "SELECT id, name, isbn, area FROM books";

/// Persistent table of books.
pub struct BookStore {
    conn: Connection,
}

impl BookStore {
    /// Open (or create) the book store at `path` and make sure the schema exists.
    ///
    /// # Errors
    ///
    /// An [`ErrorKind::Storage`] error when the file cannot be opened or the schema cannot be
    /// created. The store is not usable in that case.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        info!("Opening book store at '{}'", path.display());
        let conn = Connection::open(path).map_err(|e| {
            Error::from(e).with_message(format!("cannot open '{}'", path.display()))
        })?;
        Self::with_connection(conn)
    }

    /// Open a book store that only lives in memory.
    ///
    /// # Errors
    ///
    /// An [`ErrorKind::Storage`] error when SQLite cannot set up the database.
    pub fn open_in_memory() -> Result<Self, Error> {
        trace!("Opening in-memory book store");
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, Error> {
        let store = Self { conn };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Create the `books` table when it does not exist yet.
    ///
    /// # Errors
    ///
    /// An [`ErrorKind::Storage`] error when the statement fails.
    pub fn ensure_schema(&self) -> Result<(), Error> {
        self.conn
            .execute_batch(CREATE_BOOKS_SQL)
            .map_err(|e| Error::from(e).with_message("cannot set up the books table"))
    }

    /// Store a new book and return the id assigned to it.
    ///
    /// # Errors
    ///
    /// An [`ErrorKind::Validation`] error for an empty `name`, an [`ErrorKind::Storage`] error
    /// when the write fails.
    pub fn insert(
        &self,
        name: &str,
        isbn: Option<&str>,
        area: Option<&str>,
    ) -> Result<i64, Error> {
        validate_name(name)?;

        self.conn.execute(
            "INSERT INTO books (name, isbn, area) VALUES (?1, ?2, ?3);",
            params![name, isbn, area],
        )?;

        let id = self.conn.last_insert_rowid();
        trace!("Inserted book '{name}' with id {id}");
        Ok(id)
    }

    /// All books in insertion order.
    ///
    /// # Errors
    ///
    /// An [`ErrorKind::Storage`] error when the query fails.
    pub fn get_all(&self) -> Result<Vec<Book>, Error> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOK_SELECT_SQL} ORDER BY id;"))?;
        let books = stmt
            .query_map([], book_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(books)
    }

    /// The first book, by id, stored with exactly this `isbn`.
    ///
    /// # Errors
    ///
    /// An [`ErrorKind::Storage`] error when the query fails.
    pub fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>, Error> {
        trace!("Looking up book by ISBN '{isbn}'");
        self.conn
            .query_row(
                &format!("{BOOK_SELECT_SQL} WHERE isbn = ?1 ORDER BY id LIMIT 1;"),
                params![isbn],
                book_from_row,
            )
            .optional()
            .map_err(Error::from)
    }

    /// The book with this `id`.
    ///
    /// # Errors
    ///
    /// An [`ErrorKind::Storage`] error when the query fails.
    pub fn find_by_id(&self, id: i64) -> Result<Option<Book>, Error> {
        trace!("Looking up book by id {id}");
        self.conn
            .query_row(
                &format!("{BOOK_SELECT_SQL} WHERE id = ?1;"),
                params![id],
                book_from_row,
            )
            .optional()
            .map_err(Error::from)
    }

    /// Overwrite the name, isbn and area of the book with this `id`.
    ///
    /// Returns the number of rows changed, `0` when no book has this `id`.
    ///
    /// # Errors
    ///
    /// An [`ErrorKind::Validation`] error for an empty `name`, an [`ErrorKind::Storage`] error
    /// when the write fails.
    pub fn update(
        &self,
        id: i64,
        name: &str,
        isbn: Option<&str>,
        area: Option<&str>,
    ) -> Result<usize, Error> {
        validate_name(name)?;

        let changed = self.conn.execute(
            "UPDATE books SET name = ?1, isbn = ?2, area = ?3 WHERE id = ?4;",
            params![name, isbn, area, id],
        )?;
        trace!("Update of book {id} changed {changed} row(s)");
        Ok(changed)
    }

    /// Remove the book with this `id`.
    ///
    /// Returns the number of rows removed, `0` when no book has this `id`.
    ///
    /// # Errors
    ///
    /// An [`ErrorKind::Storage`] error when the write fails.
    pub fn delete_by_id(&self, id: i64) -> Result<usize, Error> {
        let removed = self
            .conn
            .execute("DELETE FROM books WHERE id = ?1;", params![id])?;
        trace!("Delete of book {id} removed {removed} row(s)");
        Ok(removed)
    }
}

fn validate_name(name: &str) -> Result<(), Error> {
    if name.trim().is_empty() {
        Err(Error::new(ErrorKind::Validation, "book name cannot be empty"))
    } else {
        Ok(())
    }
}

fn book_from_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get(0)?,
        name: row.get(1)?,
        isbn: row.get(2)?,
        area: row.get(3)?,
    })
}
