use std::convert::From;

use thiserror::Error;

use crate::DbError;

/// Error type surfaced to callers of the bridge operations.
///
/// The display text of each variant is exactly the message placed in the
/// `error` field of the response envelope.
#[derive(Clone, Error, Debug, PartialEq)]
pub enum Error {
    #[error("Invalid arguments: Requires {}", expected)]
    Argument { expected: &'static str },

    #[error("Unknown operation: {}", operation)]
    UnknownOperation { operation: String },

    #[error("Invalid chapter reference format. Expected format: 'BookName ChapterNumber'")]
    ChapterReferenceFormat { reference: String },

    #[error("Invalid chapter number: '{}'", chapter)]
    InvalidChapter { chapter: String },

    #[error("Invalid verse number: '{}'", verse)]
    InvalidVerse { verse: String },

    #[error("version not found: {}", version)]
    VersionNotFound { version: String },

    #[error("Version key not found")]
    VersionKeyNotFound { version: String },

    #[error("Book not found")]
    BookNotFound { book: String },

    #[error("no verse found for the given reference")]
    VerseNotFound,

    #[error("Failed to fetch {}: {}", what, cause)]
    Count { what: &'static str, cause: DbError },

    #[error("{0}")]
    Db(DbError),
}

impl Error {
    /// Whether the error came from the store rather than from the input.
    pub fn is_store_error(&self) -> bool {
        matches!(self, Error::Db(_) | Error::Count { .. })
    }
}

impl From<DbError> for Error {
    fn from(e: DbError) -> Self {
        Error::Db(e)
    }
}
