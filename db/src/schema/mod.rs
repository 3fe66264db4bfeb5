//! Metadata tables of the store.
//!
//! Verse tables are not declared here: there is one per translation, named
//! by `bible_version_key.table`, each with the columns `b` (book id), `c`
//! (chapter), `v` (verse) and `t` (text). They are queried through
//! [sword_drill](crate::sword_drill).

table! {
    bible_version_key (abbreviation) {
        abbreviation -> Text,
        version -> Text,
        #[sql_name = "table"]
        table_name -> Text,
    }
}

table! {
    key_english (b) {
        b -> Integer,
        n -> Text,
    }
}
