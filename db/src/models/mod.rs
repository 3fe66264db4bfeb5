use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer, Text};
use serde_derive::{Deserialize, Serialize};

/// Model representing a translation of the Bible, stored in its own
/// verse table.
#[derive(Clone, Debug, PartialEq, Eq, Queryable, Serialize, Deserialize)]
pub struct Translation {
    pub abbreviation: String,
    pub version: String,
    #[serde(rename = "tableName")]
    pub table_name: String,
}

/// Model representing a book in the Bible.
///
/// The `id` is the join key into every translation's verse table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: i32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub testament: Option<String>,
}

impl Book {
    pub fn new(id: i32, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            testament: None,
        }
    }
}

/// Model representing a Bible verse of a single translation.
#[derive(Clone, Debug, PartialEq, Eq, QueryableByName)]
pub struct Verse {
    #[diesel(sql_type = Integer, column_name = v)]
    pub verse: i32,
    #[diesel(sql_type = Text, column_name = t)]
    pub words: String,
}

/// Row returned by the counting queries.
#[derive(Clone, Copy, Debug, QueryableByName)]
pub struct Count {
    #[diesel(sql_type = BigInt)]
    pub count: i64,
}

/// Rows found for a reference: a whole chapter, or at most one verse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Passage {
    Chapter(Vec<Verse>),
    Verse(Option<Verse>),
}

mod reference;
pub use self::reference::{ChapterReference, ChapterVerse, ScriptureReference};
