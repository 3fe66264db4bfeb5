//! Translation and book metadata, loaded once when the store is opened.
//!
//! The cache is the only source of verse table names. Those names are
//! interpolated into query text, so each one is checked against a plain
//! identifier pattern before it is accepted.

use std::collections::{BTreeMap, HashMap};

use diesel::prelude::*;
use lazy_static::lazy_static;
use log::info;
use regex::Regex;

use crate::models::{Book, Translation};
use crate::{DbConnection, DbError};

/// Immutable snapshot of the store's metadata tables.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetadataCache {
    translations: BTreeMap<String, Translation>,
    books: HashMap<String, Book>,
}

impl MetadataCache {
    /// Builds a cache from already loaded translations and books.
    pub fn new<T, B>(translations: T, books: B) -> Result<Self, DbError>
    where
        T: IntoIterator<Item = Translation>,
        B: IntoIterator<Item = Book>,
    {
        let translations = translations
            .into_iter()
            .map(|t| check_table_name(&t).map(|_| (t.abbreviation.to_owned(), t)))
            .collect::<Result<_, _>>()?;
        let books = books.into_iter().map(|b| (b.name.to_owned(), b)).collect();

        Ok(Self {
            translations,
            books,
        })
    }

    /// Loads translations, then books. Either failure is fatal.
    pub fn load(conn: &mut DbConnection) -> Result<Self, DbError> {
        let translations = load_translations(conn)?;
        let books = load_books(conn)?;
        info!(
            "Cached {} translations and {} books",
            translations.len(),
            books.len()
        );

        Ok(Self {
            translations,
            books,
        })
    }

    /// Looks up a translation by its exact abbreviation.
    pub fn translation(&self, abbreviation: &str) -> Option<&Translation> {
        self.translations.get(abbreviation)
    }

    /// Looks up a book by its exact name. No case folding or aliases.
    pub fn book(&self, name: &str) -> Option<&Book> {
        self.books.get(name)
    }

    /// All translations, keyed by abbreviation.
    pub fn translations(&self) -> &BTreeMap<String, Translation> {
        &self.translations
    }

    /// All books, in canonical (id) order.
    pub fn books(&self) -> Vec<&Book> {
        let mut books: Vec<&Book> = self.books.values().collect();
        books.sort_by_key(|b| b.id);
        books
    }
}

/// Loads every translation from `bible_version_key`, keyed by abbreviation.
pub fn load_translations(
    conn: &mut DbConnection,
) -> Result<BTreeMap<String, Translation>, DbError> {
    use crate::schema::bible_version_key::dsl::*;

    let rows = bible_version_key
        .select((abbreviation, version, table_name))
        .load::<Translation>(conn)
        .map_err(|e| DbError::CacheLoad {
            what: "translations",
            cause: e.to_string(),
        })?;

    rows.into_iter()
        .map(|t| check_table_name(&t).map(|_| (t.abbreviation.to_owned(), t)))
        .collect()
}

/// Loads every book from `key_english`, keyed by name.
pub fn load_books(conn: &mut DbConnection) -> Result<HashMap<String, Book>, DbError> {
    use crate::schema::key_english::dsl::*;

    key_english
        .select((b, n))
        .load::<(i32, String)>(conn)
        .map(|rows| {
            rows.into_iter()
                .map(|(id, name)| (name.to_owned(), Book::new(id, &name)))
                .collect()
        })
        .map_err(|e| DbError::CacheLoad {
            what: "books",
            cause: e.to_string(),
        })
}

fn check_table_name(translation: &Translation) -> Result<(), DbError> {
    lazy_static! {
        static ref TABLE_NAME_RE: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
    }

    if TABLE_NAME_RE.is_match(&translation.table_name) {
        Ok(())
    } else {
        Err(DbError::UnsafeTableName {
            abbreviation: translation.abbreviation.to_owned(),
            table: translation.table_name.to_owned(),
        })
    }
}
