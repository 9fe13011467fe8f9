pub(crate) type DynError = Box<dyn std::error::Error + Send + Sync>;

/// The Errors that may occur when calling the shelf functions.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    source: Option<DynError>,
}

/// Types of errors that make up an [`Error`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The error is associated with an underlying IO or network error.
    IO,
    /// The remote API answered with a non-success status code.
    Status,
    /// An error caused when parsing/deserialization fails.
    Deserialize,
    /// The local book store failed to open, prepare or run a statement.
    Storage,
    /// A value was rejected before it reached the book store.
    Validation,
}

impl Error {
    /// Creates a new [`Error`] based on the [`ErrorKind`] and message to describe the error.
    pub fn new<S: Into<String>>(kind: ErrorKind, message: S) -> Self {
        Self {
            kind,
            message: Some(message.into()),
            source: None,
        }
    }

    /// Wraps an existing error as the source of [`Error`].
    pub fn wrap<E>(kind: ErrorKind, source: E) -> Self
    where
        E: Into<DynError>,
    {
        Self {
            kind,
            message: None,
            source: Some(source.into()),
        }
    }

    /// Attaches a message to an existing [`Error`], keeping any wrapped source.
    #[must_use]
    pub fn with_message<S: Into<String>>(mut self, message: S) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Returns the kind of error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ErrorKind::IO => f.write_str("IO error")?,
            ErrorKind::Status => f.write_str("Status error")?,
            ErrorKind::Deserialize => f.write_str("Deserialize error")?,
            ErrorKind::Storage => f.write_str("Storage error")?,
            ErrorKind::Validation => f.write_str("Validation error")?,
        };

        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| &**e as _)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Self::wrap(ErrorKind::Storage, err)
    }
}
