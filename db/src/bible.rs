//! The operations exposed to the host.
//!
//! [Bible] owns the metadata cache and the store connection and answers
//! the five host calls. Each call is a pure function of the cache and its
//! arguments; the host invokes them one at a time.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use log::debug;

use crate::cache::MetadataCache;
use crate::error::Error;
use crate::models::{ChapterReference, ChapterVerse, Passage, ScriptureReference};
use crate::responder::{count_json, text_json, to_json, TextData};
use crate::sword_drill::{SwordDrill, SwordDrillable};
use crate::{establish_connection, DbConnection, DbError};

/// Call surface used by the host. Every method answers with a JSON string.
pub trait Bridge {
    /// Translations keyed by abbreviation.
    fn versions(&self) -> String;

    /// Books as `{id, name}` objects.
    fn books(&self) -> String;

    /// A chapter (`"3"`) or a single verse (`"3:16"`) of a book.
    fn text(&mut self, version: &str, book: &str, chapter_verse: &str) -> String;

    /// Number of verses in a `"<Book> <chapter>"` reference.
    fn chapter_info(&mut self, version_key: &str, chapter_reference: &str) -> String;

    /// Number of chapters in a book.
    fn book_info(&mut self, version_key: &str, book: &str) -> String;

    /// Dispatches a host call by operation name with positional arguments.
    fn call(&mut self, operation: &str, args: &[&str]) -> String {
        let operation = match operation.parse::<Operation>() {
            Ok(op) => op,
            Err(e) => return TextData::from_error(&e).to_json(),
        };
        if args.len() < operation.arity() {
            return TextData::from_error(&operation.argument_error()).to_json();
        }

        match operation {
            Operation::ListTranslations => self.versions(),
            Operation::ListBooks => self.books(),
            Operation::GetText => self.text(args[0], args[1], args[2]),
            Operation::GetChapterVerseCount => self.chapter_info(args[0], args[1]),
            Operation::GetBookChapterCount => self.book_info(args[0], args[1]),
        }
    }
}

/// Host operations, by the names they are registered under.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    ListTranslations,
    ListBooks,
    GetText,
    GetChapterVerseCount,
    GetBookChapterCount,
}

impl Operation {
    /// Number of arguments the operation reads.
    pub fn arity(self) -> usize {
        match self {
            Operation::ListTranslations | Operation::ListBooks => 0,
            Operation::GetText => 3,
            Operation::GetChapterVerseCount | Operation::GetBookChapterCount => 2,
        }
    }

    fn argument_error(self) -> Error {
        Error::Argument {
            expected: match self {
                Operation::ListTranslations | Operation::ListBooks => "no arguments",
                Operation::GetText => "version, book, and chapter",
                Operation::GetChapterVerseCount => {
                    "version abbreviation and chapter reference (e.g., 'Acts 1')"
                }
                Operation::GetBookChapterCount => "version abbreviation and book name",
            },
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Operation::ListTranslations => "listTranslations",
            Operation::ListBooks => "listBooks",
            Operation::GetText => "getText",
            Operation::GetChapterVerseCount => "getChapterVerseCount",
            Operation::GetBookChapterCount => "getBookChapterCount",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Operation {
    type Err = Error;

    /// Accepts both the operation names and the names the host registers
    /// its globals under.
    fn from_str(s: &str) -> Result<Operation, Self::Err> {
        match s {
            "listTranslations" | "_getVersions" => Ok(Operation::ListTranslations),
            "listBooks" | "_getBooks" => Ok(Operation::ListBooks),
            "getText" | "_getText" => Ok(Operation::GetText),
            "getChapterVerseCount" | "_getChapterInfo" => Ok(Operation::GetChapterVerseCount),
            "getBookChapterCount" | "_getBookInfo" => Ok(Operation::GetBookChapterCount),
            _ => Err(Error::UnknownOperation {
                operation: s.to_string(),
            }),
        }
    }
}

/// A multi-translation Bible backed by a SQLite store.
pub struct Bible<D = SwordDrill> {
    cache: MetadataCache,
    conn: DbConnection,
    drill: PhantomData<D>,
}

impl Bible<SwordDrill> {
    /// Opens the store at the given URL and loads its metadata.
    pub fn open(db_url: &str) -> Result<Self, DbError> {
        let mut conn = establish_connection(db_url)?;
        let cache = MetadataCache::load(&mut conn)?;

        Ok(Bible::new(cache, conn))
    }
}

impl<D: SwordDrillable> Bible<D> {
    pub fn new(cache: MetadataCache, conn: DbConnection) -> Self {
        Self {
            cache,
            conn,
            drill: PhantomData,
        }
    }

    pub fn cache(&self) -> &MetadataCache {
        &self.cache
    }

    /// Looks up a chapter or a verse.
    ///
    /// The book is resolved before anything else, so an unknown book is
    /// reported whatever the translation or token. An empty chapter is a
    /// result; a missing verse is an error.
    pub fn get_text(
        &mut self,
        version: &str,
        book: &str,
        chapter_verse: &str,
    ) -> Result<TextData, Error> {
        let book = self.cache.book(book).ok_or_else(|| Error::BookNotFound {
            book: book.to_string(),
        })?;
        let translation = self
            .cache
            .translation(version)
            .ok_or_else(|| Error::VersionNotFound {
                version: version.to_string(),
            })?;
        let chapter_verse: ChapterVerse = chapter_verse.parse()?;
        let reference = ScriptureReference::new(book.id, chapter_verse);
        debug!(
            "{} {} {} -> {:?}",
            translation.abbreviation, book.name, chapter_verse, reference
        );

        match D::passage(translation, &reference, &mut self.conn)? {
            Passage::Chapter(verses) => Ok(TextData::chapter(reference.chapter, verses)),
            Passage::Verse(Some(verse)) => Ok(TextData::verse(reference.chapter, verse)),
            Passage::Verse(None) => Err(Error::VerseNotFound),
        }
    }

    /// Counts the verses of a chapter written as `"<Book> <chapter>"`.
    pub fn chapter_verse_count(
        &mut self,
        version_key: &str,
        chapter_reference: &str,
    ) -> Result<i64, Error> {
        let reference: ChapterReference = chapter_reference.parse()?;
        let translation =
            self.cache
                .translation(version_key)
                .ok_or_else(|| Error::VersionKeyNotFound {
                    version: version_key.to_string(),
                })?;
        let book = self
            .cache
            .book(&reference.book)
            .ok_or_else(|| Error::BookNotFound {
                book: reference.book.to_owned(),
            })?;

        D::verse_count(translation, book.id, reference.chapter, &mut self.conn).map_err(|cause| {
            Error::Count {
                what: "verse count",
                cause,
            }
        })
    }

    /// Counts the chapters of a book.
    pub fn book_chapter_count(&mut self, version_key: &str, book: &str) -> Result<i64, Error> {
        let translation =
            self.cache
                .translation(version_key)
                .ok_or_else(|| Error::VersionKeyNotFound {
                    version: version_key.to_string(),
                })?;
        let book = self.cache.book(book).ok_or_else(|| Error::BookNotFound {
            book: book.to_string(),
        })?;

        D::chapter_count(translation, book.id, &mut self.conn).map_err(|cause| Error::Count {
            what: "chapter count",
            cause,
        })
    }
}

impl<D: SwordDrillable> Bridge for Bible<D> {
    fn versions(&self) -> String {
        to_json(self.cache.translations())
    }

    fn books(&self) -> String {
        to_json(&self.cache.books())
    }

    fn text(&mut self, version: &str, book: &str, chapter_verse: &str) -> String {
        text_json(self.get_text(version, book, chapter_verse))
    }

    fn chapter_info(&mut self, version_key: &str, chapter_reference: &str) -> String {
        count_json(self.chapter_verse_count(version_key, chapter_reference))
    }

    fn book_info(&mut self, version_key: &str, book: &str) -> String {
        count_json(self.book_chapter_count(version_key, book))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::test::*;
    use crate::DbError;

    fn stub_bible() -> Bible<TestSwordDrill> {
        Bible::new(test_cache(), establish_connection(":memory:").unwrap())
    }

    #[test]
    fn text() {
        let mut bible = stub_bible();

        let verse = bible.get_text("KJV", "Psalms", "119:105").unwrap();
        assert_eq!(verse.chapter.as_deref(), Some("119"));
        assert_eq!(verse.verse.as_deref(), Some("105"));
        assert_eq!(
            verse.text.as_deref(),
            Some("NUN. Thy word is a lamp unto my feet, and a light unto my path.")
        );

        let chapter = bible.get_text("KJV", "Psalms", "119").unwrap();
        assert_eq!(chapter.chapter.as_deref(), Some("119"));
        assert_eq!(chapter.verses.unwrap().len(), 2);

        let chapter = bible.get_text("KJV", "Psalms", "119:").unwrap();
        assert_eq!(chapter.verse, None);
        assert_eq!(chapter.verses.unwrap().len(), 2);
    }

    #[test]
    fn text_errors() {
        let mut bible = stub_bible();

        vec![
            (
                ("KJV", "Hezekiah", "1:1"),
                Error::BookNotFound {
                    book: "Hezekiah".to_string(),
                },
            ),
            (
                ("XYZ", "Hezekiah", "nonsense"),
                Error::BookNotFound {
                    book: "Hezekiah".to_string(),
                },
            ),
            (
                ("XYZ", "Psalms", "nonsense"),
                Error::VersionNotFound {
                    version: "XYZ".to_string(),
                },
            ),
            (
                ("KJV", "Psalms", ""),
                Error::InvalidChapter {
                    chapter: "".to_string(),
                },
            ),
            (
                ("KJV", "Psalms", "119:105:1"),
                Error::InvalidVerse {
                    verse: "105:1".to_string(),
                },
            ),
            (("KJV", "Psalms", "119:177"), Error::VerseNotFound),
        ]
        .into_iter()
        .for_each(|((version, book, token), expected)| {
            assert_eq!(bible.get_text(version, book, token).unwrap_err(), expected);
        });
    }

    #[test]
    fn counts() {
        let mut bible = stub_bible();

        assert_eq!(bible.chapter_verse_count("KJV", "Psalms 119").unwrap(), 176);
        assert_eq!(bible.book_chapter_count("KJV", "Psalms").unwrap(), 150);
        assert_eq!(bible.chapter_info("KJV", "Psalms 119"), "176");
        assert_eq!(bible.book_info("KJV", "Psalms"), "150");
    }

    #[test]
    fn count_errors() {
        let mut bible = stub_bible();

        vec![
            (
                ("XYZ", "Psalms"),
                Error::ChapterReferenceFormat {
                    reference: "Psalms".to_string(),
                },
            ),
            (
                ("XYZ", "Psalms one"),
                Error::InvalidChapter {
                    chapter: "one".to_string(),
                },
            ),
            (
                ("XYZ", "Hezekiah 1"),
                Error::VersionKeyNotFound {
                    version: "XYZ".to_string(),
                },
            ),
            (
                ("KJV", "Hezekiah 1"),
                Error::BookNotFound {
                    book: "Hezekiah".to_string(),
                },
            ),
        ]
        .into_iter()
        .for_each(|((version, reference), expected)| {
            assert_eq!(
                bible.chapter_verse_count(version, reference).unwrap_err(),
                expected
            );
        });

        assert_eq!(
            bible.book_chapter_count("XYZ", "Hezekiah").unwrap_err(),
            Error::VersionKeyNotFound {
                version: "XYZ".to_string()
            }
        );
        assert_eq!(
            bible.book_info("KJV", "Hezekiah"),
            r#"{"error":"Book not found"}"#
        );
    }

    #[test]
    fn store_errors() {
        let mut bible: Bible<BrokenSwordDrill> =
            Bible::new(test_cache(), establish_connection(":memory:").unwrap());

        assert_eq!(
            bible.text("KJV", "Psalms", "119"),
            r#"{"error":"error scanning verse text: unexpected null"}"#
        );
        assert_eq!(
            bible.get_text("KJV", "Psalms", "119:105").unwrap_err(),
            Error::Db(DbError::Query {
                cause: "disk I/O error".to_string()
            })
        );
        assert_eq!(
            bible.chapter_info("KJV", "Psalms 119"),
            r#"{"error":"Failed to fetch verse count: database query error: disk I/O error"}"#
        );
        assert_eq!(
            bible.book_info("KJV", "Psalms"),
            r#"{"error":"Failed to fetch chapter count: database query error: disk I/O error"}"#
        );
    }

    #[test]
    fn listings() {
        let bible = stub_bible();

        let versions: Value = serde_json::from_str(&bible.versions()).unwrap();
        assert_eq!(versions["KJV"]["version"], "King James Version");
        assert_eq!(versions["KJV"]["tableName"], "t_kjv");
        assert_eq!(versions["ASV"]["abbreviation"], "ASV");

        let books: Value = serde_json::from_str(&bible.books()).unwrap();
        let books = books.as_array().unwrap();
        assert_eq!(books.len(), 7);
        assert_eq!(books[0]["id"], 1);
        assert_eq!(books[0]["name"], "Genesis");
        assert!(books[0].get("testament").is_none());
    }

    #[test]
    fn call() {
        let mut bible = stub_bible();

        assert_eq!(bible.call("listBooks", &[]), bible.books());
        assert_eq!(bible.call("_getVersions", &[]), bible.versions());
        assert_eq!(
            bible.call("getText", &["KJV", "Psalms", "119:105"]),
            bible.text("KJV", "Psalms", "119:105")
        );
        assert_eq!(
            bible.call("getChapterVerseCount", &["KJV", "Psalms 119", "extra"]),
            "176"
        );
        assert_eq!(bible.call("_getBookInfo", &["KJV", "Psalms"]), "150");

        vec![
            (
                "getText",
                vec!["KJV", "Psalms"],
                r#"{"error":"Invalid arguments: Requires version, book, and chapter"}"#,
            ),
            (
                "getChapterVerseCount",
                vec!["KJV"],
                r#"{"error":"Invalid arguments: Requires version abbreviation and chapter reference (e.g., 'Acts 1')"}"#,
            ),
            (
                "getBookChapterCount",
                vec![],
                r#"{"error":"Invalid arguments: Requires version abbreviation and book name"}"#,
            ),
            (
                "search",
                vec!["light"],
                r#"{"error":"Unknown operation: search"}"#,
            ),
        ]
        .into_iter()
        .for_each(|(operation, args, expected)| {
            assert_eq!(bible.call(operation, &args), expected);
        });
    }

    #[test]
    fn operation_names() {
        vec![
            Operation::ListTranslations,
            Operation::ListBooks,
            Operation::GetText,
            Operation::GetChapterVerseCount,
            Operation::GetBookChapterCount,
        ]
        .into_iter()
        .for_each(|op| assert_eq!(op.to_string().parse::<Operation>().unwrap(), op));
    }
}
