use diesel::prelude::*;
use diesel::result::Error;
use diesel::sql_query;
use diesel::sql_types::Integer;
use log::debug;

use crate::models::*;
use crate::{DbConnection, DbError};

/// Trait implemented by types that can query a translation's verse table.
///
/// Every method receives a [Translation](crate::models::Translation) taken
/// from the metadata cache. Its table name is the only part of a query that
/// is not bound as a parameter.
pub trait SwordDrillable {
    /// Looks up every verse of a chapter, ordered by verse number.
    ///
    /// A chapter with no rows is not an error.
    fn chapter(
        translation: &Translation,
        book_id: i32,
        chapter: i32,
        conn: &mut DbConnection,
    ) -> Result<Vec<Verse>, DbError>;

    /// Looks up a single verse, returning `None` if it does not exist.
    fn verse(
        translation: &Translation,
        book_id: i32,
        chapter: i32,
        verse: i32,
        conn: &mut DbConnection,
    ) -> Result<Option<Verse>, DbError>;

    /// Counts the distinct chapters of a book.
    fn chapter_count(
        translation: &Translation,
        book_id: i32,
        conn: &mut DbConnection,
    ) -> Result<i64, DbError>;

    /// Counts the verses of a chapter.
    fn verse_count(
        translation: &Translation,
        book_id: i32,
        chapter: i32,
        conn: &mut DbConnection,
    ) -> Result<i64, DbError>;

    /// Looks up the passage for a resolved reference: the single verse if
    /// one was given, otherwise the whole chapter.
    fn passage(
        translation: &Translation,
        reference: &ScriptureReference,
        conn: &mut DbConnection,
    ) -> Result<Passage, DbError> {
        match reference.verse {
            Some(verse) => Self::verse(
                translation,
                reference.book_id,
                reference.chapter,
                verse,
                conn,
            )
            .map(Passage::Verse),
            None => Self::chapter(translation, reference.book_id, reference.chapter, conn)
                .map(Passage::Chapter),
        }
    }
}

/// Main implementation for the [SwordDrillable](crate::sword_drill::SwordDrillable) trait.
pub struct SwordDrill;

impl SwordDrillable for SwordDrill {
    fn chapter(
        translation: &Translation,
        book_id: i32,
        chapter: i32,
        conn: &mut DbConnection,
    ) -> Result<Vec<Verse>, DbError> {
        let query = format!(
            "SELECT v, t FROM {} WHERE b = ? AND c = ? ORDER BY v",
            translation.table_name
        );
        debug!("{} [{}, {}]", query, book_id, chapter);

        sql_query(query)
            .bind::<Integer, _>(book_id)
            .bind::<Integer, _>(chapter)
            .load::<Verse>(conn)
            .map_err(map_query_err)
    }

    fn verse(
        translation: &Translation,
        book_id: i32,
        chapter: i32,
        verse: i32,
        conn: &mut DbConnection,
    ) -> Result<Option<Verse>, DbError> {
        let query = format!(
            "SELECT v, t FROM {} WHERE b = ? AND c = ? AND v = ? LIMIT 1",
            translation.table_name
        );
        debug!("{} [{}, {}, {}]", query, book_id, chapter, verse);

        sql_query(query)
            .bind::<Integer, _>(book_id)
            .bind::<Integer, _>(chapter)
            .bind::<Integer, _>(verse)
            .load::<Verse>(conn)
            .map(|verses| verses.into_iter().next())
            .map_err(map_query_err)
    }

    fn chapter_count(
        translation: &Translation,
        book_id: i32,
        conn: &mut DbConnection,
    ) -> Result<i64, DbError> {
        let query = format!(
            "SELECT COUNT(DISTINCT c) AS count FROM {} WHERE b = ?",
            translation.table_name
        );
        debug!("{} [{}]", query, book_id);

        sql_query(query)
            .bind::<Integer, _>(book_id)
            .get_result::<Count>(conn)
            .map(|c| c.count)
            .map_err(map_query_err)
    }

    fn verse_count(
        translation: &Translation,
        book_id: i32,
        chapter: i32,
        conn: &mut DbConnection,
    ) -> Result<i64, DbError> {
        let query = format!(
            "SELECT COUNT(v) AS count FROM {} WHERE b = ? AND c = ?",
            translation.table_name
        );
        debug!("{} [{}, {}]", query, book_id, chapter);

        sql_query(query)
            .bind::<Integer, _>(book_id)
            .bind::<Integer, _>(chapter)
            .get_result::<Count>(conn)
            .map(|c| c.count)
            .map_err(map_query_err)
    }
}

/// Separates rows that could not be decoded from statements that failed.
fn map_query_err(e: Error) -> DbError {
    match e {
        Error::DeserializationError(cause) => DbError::Scan {
            cause: cause.to_string(),
        },
        e => DbError::Query {
            cause: e.to_string(),
        },
    }
}
