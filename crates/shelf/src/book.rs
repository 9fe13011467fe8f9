use std::fmt;

/// A single record in the catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Book {
    /// Identifier assigned by the store, never reused.
    pub id: i64,
    /// Title of the book, never empty once stored.
    pub name: String,
    /// ISBN-10 or ISBN-13 resolved for the book, if any.
    pub isbn: Option<String>,
    /// Free-form shelf or location label.
    pub area: Option<String>,
}

const NOT_SET: &str = "not set";

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Name: {}, ISBN: {}, Area: {}",
            self.id,
            self.name,
            self.isbn.as_deref().unwrap_or(NOT_SET),
            self.area.as_deref().unwrap_or(NOT_SET)
        )
    }
}

#[test]
fn display_marks_missing_fields() {
    let book = Book {
        id: 3,
        name: "Dune".to_owned(),
        isbn: None,
        area: Some("Shelf A".to_owned()),
    };

    assert_eq!(
        "ID: 3, Name: Dune, ISBN: not set, Area: Shelf A",
        book.to_string()
    );
}
