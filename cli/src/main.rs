use std::error::Error;
use std::io::{self, Write};

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use log::error;

use lectio_db::{Bible, Bridge};

/// CLI for looking up Bible verses
#[derive(Parser)]
#[command(name = "lectio", version, author)]
struct Cli {
    /// The SQLite database holding the translations
    #[arg(long, env = "DATABASE_URL", default_value = "bible-sqlite.db")]
    database: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the available translations
    Versions,

    /// List the books of the Bible
    Books,

    /// Look up a chapter ("3") or a verse ("3:16")
    Text {
        version: String,
        book: String,
        reference: String,
    },

    /// Count the verses of a chapter, e.g. "Acts 1"
    ChapterInfo { version: String, reference: String },

    /// Count the chapters of a book
    BookInfo { version: String, book: String },

    /// Invoke an operation by name with positional arguments
    Call {
        operation: String,
        args: Vec<String>,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();

    // Set up logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut bible = Bible::open(&cli.database).map_err(|e| {
        error!("{}", e);
        e
    })?;

    let output = match cli.command {
        Command::Versions => bible.versions(),
        Command::Books => bible.books(),
        Command::Text {
            version,
            book,
            reference,
        } => bible.text(&version, &book, &reference),
        Command::ChapterInfo { version, reference } => bible.chapter_info(&version, &reference),
        Command::BookInfo { version, book } => bible.book_info(&version, &book),
        Command::Call { operation, args } => {
            let args: Vec<&str> = args.iter().map(String::as_str).collect();
            bible.call(&operation, &args)
        }
    };

    io::stdout().write_fmt(format_args!("{}\n", output))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_text() {
        let cli = Cli::try_parse_from([
            "lectio",
            "--database",
            ":memory:",
            "text",
            "KJV",
            "Song of Solomon",
            "2:1",
        ])
        .unwrap();

        assert_eq!(cli.database, ":memory:");
        match cli.command {
            Command::Text {
                version,
                book,
                reference,
            } => {
                assert_eq!(version, "KJV");
                assert_eq!(book, "Song of Solomon");
                assert_eq!(reference, "2:1");
            }
            _ => panic!("expected the text command"),
        }
    }

    #[test]
    fn parse_call() {
        let cli = Cli::try_parse_from([
            "lectio",
            "--database",
            "x.db",
            "call",
            "getChapterVerseCount",
            "KJV",
            "Acts 1",
        ])
        .unwrap();

        match cli.command {
            Command::Call { operation, args } => {
                assert_eq!(operation, "getChapterVerseCount");
                assert_eq!(args, vec!["KJV", "Acts 1"]);
            }
            _ => panic!("expected the call command"),
        }
    }
}
