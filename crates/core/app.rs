use std::{io::Write, path::PathBuf, str::FromStr};

use eyre::Result;
use log::trace;
use shelf::{api::Client, is_isbn, BookStore, ErrorKind, MetadataClient};

use crate::interact::Prompt;

const MENU: &str = "
Options:
1. Add a book
2. View all books
3. Get a book by ISBN or name
4. Edit a book by id
5. Remove a book by id
6. Exit";

const NOT_SET: &str = "not set";

/// Settings that live for the whole session.
#[derive(Debug)]
pub struct Config {
    /// Path of the SQLite file holding the catalog.
    pub database: PathBuf,
    /// Print full error detail, including causes, when an operation fails.
    pub debug: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MenuChoice {
    Add,
    ViewAll,
    Get,
    Edit,
    Remove,
    Exit,
}

impl FromStr for MenuChoice {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Self::Add),
            "2" => Ok(Self::ViewAll),
            "3" => Ok(Self::Get),
            "4" => Ok(Self::Edit),
            "5" => Ok(Self::Remove),
            "6" => Ok(Self::Exit),
            _ => Err(()),
        }
    }
}

/// The interactive menu loop over the book store.
///
/// Only failures of the input stream or of the output writers end the loop, every other failure
/// is reported on the error writer and the menu is shown again. A store that failed to open is
/// reported once when the loop starts, after which every store operation fails as unavailable.
pub struct Shell<P, C: Client, O, E> {
    prompt: P,
    store: Option<BookStore>,
    setup_error: Option<shelf::Error>,
    metadata: MetadataClient<C>,
    out: O,
    err: E,
    debug: bool,
}

impl<P, C, O, E> Shell<P, C, O, E>
where
    P: Prompt,
    C: Client,
    O: Write,
    E: Write,
{
    pub fn new(
        prompt: P,
        store: Result<BookStore, shelf::Error>,
        metadata: MetadataClient<C>,
        out: O,
        err: E,
        config: &Config,
    ) -> Self {
        let (store, setup_error) = match store {
            Ok(store) => (Some(store), None),
            Err(err) => (None, Some(err)),
        };
        Self {
            prompt,
            store,
            setup_error,
            metadata,
            out,
            err,
            debug: config.debug,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        if let Some(err) = self.setup_error.take() {
            self.report("Error setting up the database", err)?;
        }

        loop {
            writeln!(self.out, "{MENU}")?;
            let input = self.prompt.read_line("Choose an option")?;

            match input.parse::<MenuChoice>() {
                Ok(MenuChoice::Exit) => {
                    writeln!(self.out, "Exiting...")?;
                    return Ok(());
                }
                Ok(choice) => {
                    trace!("Menu choice: {choice:?}");
                    self.dispatch(choice)?;
                }
                Err(()) => writeln!(self.out, "Invalid choice. Please try again.")?,
            }
        }
    }

    fn dispatch(&mut self, choice: MenuChoice) -> Result<()> {
        match choice {
            MenuChoice::Add => self.add_book(),
            MenuChoice::ViewAll => self.view_books(),
            MenuChoice::Get => self.get_book(),
            MenuChoice::Edit => self.edit_book(),
            MenuChoice::Remove => self.remove_book(),
            MenuChoice::Exit => Ok(()),
        }
    }

    fn add_book(&mut self) -> Result<()> {
        let name = self.prompt.read_line("Enter the name of the book")?;
        let name = name.trim();
        if name.is_empty() {
            writeln!(self.out, "A book needs a name.")?;
            return Ok(());
        }

        let isbn = self.resolve_isbn(name)?;

        let area = self.prompt.read_line("Enter the area for the book")?;

        match self
            .store()
            .and_then(|store| store.insert(name, isbn.as_deref(), non_blank(&area)))
        {
            Ok(id) => writeln!(self.out, "Book added successfully with ID {id}.")?,
            Err(err) => self.report("Error adding the book", err)?,
        }
        Ok(())
    }

    fn view_books(&mut self) -> Result<()> {
        match self.store().and_then(BookStore::get_all) {
            Ok(books) if books.is_empty() => writeln!(self.out, "No books stored yet.")?,
            Ok(books) => {
                for book in books {
                    writeln!(self.out, "{book}")?;
                }
            }
            Err(err) => self.report("Error fetching books", err)?,
        }
        Ok(())
    }

    fn get_book(&mut self) -> Result<()> {
        let input = self.prompt.read_line("Enter the ISBN or name of the book")?;
        let input = input.trim();

        let isbn = if is_isbn(input) {
            input.to_owned()
        } else if let Some(isbn) = self.metadata.fetch_isbn(input) {
            isbn
        } else {
            writeln!(self.out, "No ISBN found for the book name provided.")?;
            return Ok(());
        };

        match self.store().and_then(|store| store.find_by_isbn(&isbn)) {
            Ok(Some(book)) => writeln!(self.out, "{book}")?,
            Ok(None) => writeln!(self.out, "No book found with the given ISBN.")?,
            Err(err) => self.report("Error retrieving book details", err)?,
        }
        Ok(())
    }

    fn edit_book(&mut self) -> Result<()> {
        let id = match self.read_id("Enter the ID of the book to edit")? {
            Some(id) => id,
            None => return Ok(()),
        };

        let book = match self.store().and_then(|store| store.find_by_id(id)) {
            Ok(Some(book)) => book,
            Ok(None) => {
                writeln!(self.out, "No book found with the given ID.")?;
                return Ok(());
            }
            Err(err) => return self.report("Error editing book", err),
        };

        writeln!(self.out, "Editing book:")?;
        writeln!(self.out, "Current Name: {}", book.name)?;
        writeln!(
            self.out,
            "Current ISBN: {}",
            book.isbn.as_deref().unwrap_or(NOT_SET)
        )?;
        writeln!(
            self.out,
            "Current Area: {}",
            book.area.as_deref().unwrap_or(NOT_SET)
        )?;

        let name = self
            .prompt
            .read_line("Enter new name (leave empty to keep current)")?;
        let name = non_blank(&name).map_or(book.name, str::to_owned);

        // the ISBN always follows the name, even when the name is kept
        let isbn = self.resolve_isbn(&name)?;

        let area = self
            .prompt
            .read_line("Enter new area (leave empty to keep current)")?;
        let area = non_blank(&area).map(str::to_owned).or(book.area);

        match self
            .store()
            .and_then(|store| store.update(id, &name, isbn.as_deref(), area.as_deref()))
        {
            Ok(0) => writeln!(self.out, "No book found with the given ID.")?,
            Ok(_) => writeln!(self.out, "Book information updated successfully.")?,
            Err(err) => self.report("Error editing book", err)?,
        }
        Ok(())
    }

    fn remove_book(&mut self) -> Result<()> {
        let id = match self.read_id("Enter the ID of the book to remove")? {
            Some(id) => id,
            None => return Ok(()),
        };

        match self.store().and_then(|store| store.delete_by_id(id)) {
            Ok(0) => writeln!(self.out, "No book found with the given ID.")?,
            Ok(_) => writeln!(self.out, "Book removed successfully.")?,
            Err(err) => self.report("Error removing book", err)?,
        }
        Ok(())
    }

    fn store(&self) -> Result<&BookStore, shelf::Error> {
        self.store.as_ref().ok_or_else(|| {
            shelf::Error::new(
                ErrorKind::Storage,
                "book store is unavailable for this session",
            )
        })
    }

    fn resolve_isbn(&mut self, name: &str) -> Result<Option<String>> {
        let isbn = self.metadata.fetch_isbn(name);
        match &isbn {
            Some(isbn) => writeln!(self.out, "Found ISBN: {isbn}")?,
            None => writeln!(self.out, "ISBN not found for this book.")?,
        }
        Ok(isbn)
    }

    /// `None` when the input is not a number, which has already been reported.
    fn read_id(&mut self, prompt: &str) -> Result<Option<i64>> {
        let input = self.prompt.read_line(prompt)?;
        match input.trim().parse::<i64>() {
            Ok(id) => Ok(Some(id)),
            Err(err) => {
                writeln!(self.out, "Invalid ID. Please enter a valid number.")?;
                if self.debug {
                    writeln!(self.err, "{:?}", eyre::Report::new(err))?;
                }
                Ok(None)
            }
        }
    }

    fn report(&mut self, context: &str, err: shelf::Error) -> Result<()> {
        if self.debug {
            let report = eyre::Report::new(err).wrap_err(context.to_owned());
            writeln!(self.err, "{report:?}")?;
        } else {
            writeln!(self.err, "{context}: {err}")?;
        }
        Ok(())
    }

    #[cfg(test)]
    fn into_parts(self) -> (Option<BookStore>, O, E) {
        (self.store, self.out, self.err)
    }
}

fn non_blank(input: &str) -> Option<&str> {
    let input = input.trim();
    if input.is_empty() {
        None
    } else {
        Some(input)
    }
}
