//! Wire format for bridge responses.
//!
//! Text lookups answer with a [TextData] object whose unused fields are
//! omitted. Counts are written as a bare JSON number.

use log::error;
use serde_derive::{Deserialize, Serialize};
use serde_json::json;

use crate::error::Error;
use crate::models::Verse;

/// Response envelope for text lookups (and for every error).
///
/// Exactly one shape is populated: a chapter (`chapter` + `verses`), a
/// verse (`chapter` + `verse` + `text`), or an `error`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verse: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verses: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TextData {
    /// Creates data for a whole chapter. An empty chapter keeps an empty
    /// `verses` list.
    pub fn chapter(chapter: i32, verses: Vec<Verse>) -> Self {
        Self {
            chapter: Some(chapter.to_string()),
            verses: Some(verses.into_iter().map(|v| v.words).collect()),
            ..Self::default()
        }
    }

    /// Creates data for a single verse.
    pub fn verse(chapter: i32, verse: Verse) -> Self {
        Self {
            chapter: Some(chapter.to_string()),
            verse: Some(verse.verse.to_string()),
            text: Some(verse.words),
            ..Self::default()
        }
    }

    /// Creates error data carrying only the human readable message.
    pub fn from_error(e: &Error) -> Self {
        if e.is_store_error() {
            error!("{}", e);
        }

        Self {
            error: Some(e.to_string()),
            ..Self::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn to_json(&self) -> String {
        to_json(self)
    }
}

impl From<Error> for TextData {
    fn from(e: Error) -> Self {
        TextData::from_error(&e)
    }
}

/// Writes a count result: the bare number on success, error data otherwise.
pub fn count_json(result: Result<i64, Error>) -> String {
    match result {
        Ok(count) => to_json(&count),
        Err(e) => TextData::from_error(&e).to_json(),
    }
}

/// Writes a text result, success or failure, as [TextData].
pub fn text_json(result: Result<TextData, Error>) -> String {
    result.unwrap_or_else(TextData::from).to_json()
}

/// Serializes a response value to compact JSON.
pub fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        error!("Could not serialize response: {}", e);
        json!({ "error": e.to_string() }).to_string()
    })
}
