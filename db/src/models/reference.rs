use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde_derive::Serialize;

use crate::error::Error;

/// A chapter with an optional verse, as written in a `"3"` or `"3:16"`
/// token. The book is supplied separately.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ChapterVerse {
    pub chapter: i32,
    pub verse: Option<i32>,
}

impl fmt::Display for ChapterVerse {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.verse {
            None => write!(f, "{}", self.chapter),
            Some(verse) => write!(f, "{}:{}", self.chapter, verse),
        }
    }
}

impl FromStr for ChapterVerse {
    type Err = Error;

    fn from_str(s: &str) -> Result<ChapterVerse, Self::Err> {
        // Only the first colon separates chapter from verse
        let (chapter, verse) = s.split_once(':').unwrap_or((s, ""));

        let chapter = parse_number(chapter).ok_or_else(|| Error::InvalidChapter {
            chapter: chapter.to_string(),
        })?;

        // A trailing colon still means the whole chapter
        let verse = match verse {
            "" => None,
            v => Some(parse_number(v).ok_or_else(|| Error::InvalidVerse {
                verse: v.to_string(),
            })?),
        };

        Ok(ChapterVerse { chapter, verse })
    }
}

/// A book and chapter written as `"<Book> <chapter>"`, used when asking
/// for the verse count of a chapter.
///
/// The book name ends at the first space, so multi-word names cannot be
/// expressed in this form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChapterReference {
    pub book: String,
    pub chapter: i32,
}

impl fmt::Display for ChapterReference {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.book, self.chapter)
    }
}

impl FromStr for ChapterReference {
    type Err = Error;

    fn from_str(s: &str) -> Result<ChapterReference, Self::Err> {
        match s.split_once(' ') {
            Some((book, chapter)) if !book.is_empty() && !chapter.is_empty() => {
                Ok(ChapterReference {
                    book: book.to_string(),
                    chapter: parse_number(chapter).ok_or_else(|| Error::InvalidChapter {
                        chapter: chapter.to_string(),
                    })?,
                })
            }
            _ => Err(Error::ChapterReferenceFormat {
                reference: s.to_string(),
            }),
        }
    }
}

/// A reference resolved against the metadata cache, ready to be queried.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ScriptureReference {
    pub book_id: i32,
    pub chapter: i32,
    pub verse: Option<i32>,
}

impl ScriptureReference {
    pub fn new(book_id: i32, chapter_verse: ChapterVerse) -> Self {
        Self {
            book_id,
            chapter: chapter_verse.chapter,
            verse: chapter_verse.verse,
        }
    }
}

/// Parse a 1-based chapter or verse number. Signs, whitespace and zero are
/// rejected.
fn parse_number(s: &str) -> Option<i32> {
    lazy_static! {
        static ref NUM_RE: Regex = Regex::new(r"^[0-9]+$").unwrap();
    }

    if !NUM_RE.is_match(s) {
        return None;
    }
    s.parse().ok().filter(|n| *n > 0)
}
