//! Scripture reference resolution over a multi-translation SQLite store.
//!
//! The store holds one verse table per translation plus two metadata
//! tables. At startup the metadata is loaded into an immutable
//! [MetadataCache](crate::cache::MetadataCache), and every request is then
//! resolved against it by a [Bible](crate::bible::Bible).

#[macro_use]
extern crate diesel;

use diesel::prelude::*;
use thiserror::Error;

/// Connection type used to talk to the store.
pub type DbConnection = SqliteConnection;

/// Errors raised while talking to the store.
#[derive(Clone, Error, Debug, PartialEq)]
pub enum DbError {
    #[error("Error connecting to {}. Cause: {}", url, cause)]
    Connection { url: String, cause: String },

    #[error("Could not preload {} from database. Cause: {}", what, cause)]
    CacheLoad { what: &'static str, cause: String },

    #[error(
        "'{}' is not a valid table name for translation '{}'.",
        table,
        abbreviation
    )]
    UnsafeTableName { abbreviation: String, table: String },

    #[error("database query error: {}", cause)]
    Query { cause: String },

    #[error("error scanning verse text: {}", cause)]
    Scan { cause: String },
}

/// Establishes a non-pooled SQLite connection.
pub fn establish_connection(db_url: &str) -> Result<DbConnection, DbError> {
    SqliteConnection::establish(db_url).map_err(|e| DbError::Connection {
        url: db_url.to_string(),
        cause: e.to_string(),
    })
}

pub mod bible;
pub mod cache;
pub mod error;
pub mod models;
pub mod responder;
mod schema;
pub mod sword_drill;

pub use bible::{Bible, Bridge, Operation};
pub use cache::MetadataCache;
pub use error::Error;
pub use sword_drill::{SwordDrill, SwordDrillable};
