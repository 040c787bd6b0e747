//! `pocketbook` interactive entry point.
//!
//! # Responsibility
//! - Resolve configuration, start logging and open the database.
//! - Run the line-oriented command loop over stdin.
//! - Persist the book on `exit`/`close`, on end of input and on Ctrl-C.

mod command;
mod config;
mod handlers;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use command::{parse_line, ParseError};
use config::{AppConfig, Cli};
use handlers::{execute, Book};
use log::{info, warn};
use pocketbook_core::db::open_db;
use pocketbook_core::{BookRepository, SqliteBookRepository};
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Sender};
use std::thread;

const PROMPT: &str = "> ";

/// Event consumed by the command loop.
#[derive(Debug)]
enum Input {
    Line(String),
    /// Stdin reached end of file or failed.
    Closed,
    /// Ctrl-C.
    Interrupted,
}

/// Why the command loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionEnd {
    Exit,
    Closed,
    Interrupted,
}

impl SessionEnd {
    fn label(self) -> &'static str {
        match self {
            Self::Exit => "exit",
            Self::Closed => "eof",
            Self::Interrupted => "interrupt",
        }
    }
}

fn main() -> Result<()> {
    let config = AppConfig::resolve(Cli::parse())?;
    pocketbook_core::init_logging(&config.log_level, &config.log_dir)
        .context("failed to start logging")?;

    let mut conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open `{}`", config.db_path.display()))?;
    let mut repo = SqliteBookRepository::try_new(&mut conn)?;
    let (contacts, notes) = repo.load().context("failed to load saved book")?;
    let mut book = Book { contacts, notes };

    let (sender, inputs) = mpsc::channel();
    let interrupt = sender.clone();
    ctrlc::set_handler(move || {
        // Receiver is gone only after the loop ended; nothing left to stop.
        let _ = interrupt.send(Input::Interrupted);
    })
    .context("failed to install Ctrl-C handler")?;
    spawn_stdin_reader(sender);

    let stdout = io::stdout();
    let session = run_session(&mut book, inputs, stdout.lock());

    // Save whatever the loop produced, even when it failed mid-way.
    persist(&mut repo, &book)?;
    println!("Saved to {}", config.db_path.display());
    let end = session?;
    info!("event=app_exit module=cli status=ok reason={}", end.label());
    Ok(())
}

/// Forwards stdin lines until end of input; the thread is detached.
fn spawn_stdin_reader(sender: Sender<Input>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if sender.send(Input::Line(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    warn!("event=stdin_read module=cli status=error error={err}");
                    break;
                }
            }
        }
        let _ = sender.send(Input::Closed);
    });
}

fn persist(repo: &mut impl BookRepository, book: &Book) -> Result<()> {
    repo.save(&book.contacts, &book.notes)
        .context("failed to save book")
}

/// Runs commands until `exit`/`close`, end of input or an interrupt.
fn run_session(
    book: &mut Book,
    inputs: impl IntoIterator<Item = Input>,
    mut output: impl Write,
) -> Result<SessionEnd> {
    writeln!(
        output,
        "Welcome to the assistant bot! Type 'help' to see available commands."
    )?;
    write!(output, "{PROMPT}")?;
    output.flush()?;

    for input in inputs {
        let line = match input {
            Input::Line(line) => line,
            Input::Closed => {
                writeln!(output)?;
                return Ok(SessionEnd::Closed);
            }
            Input::Interrupted => {
                writeln!(output, "\nInterrupted by user.")?;
                return Ok(SessionEnd::Interrupted);
            }
        };
        match parse_line(&line) {
            Ok(command) => {
                let reply = execute(book, command, Local::now().date_naive());
                writeln!(output, "{}", reply.text)?;
                if reply.exit {
                    return Ok(SessionEnd::Exit);
                }
            }
            Err(ParseError::Empty) => writeln!(output, "Enter a command.")?,
            Err(err) => writeln!(output, "{err}")?,
        }
        write!(output, "{PROMPT}")?;
        output.flush()?;
    }
    Ok(SessionEnd::Closed)
}

#[cfg(test)]
mod tests {
    use super::{persist, run_session, Input, SessionEnd};
    use crate::handlers::Book;
    use pocketbook_core::db::open_db;
    use pocketbook_core::{BookRepository, SqliteBookRepository};

    fn lines(script: &str) -> Vec<Input> {
        script
            .lines()
            .map(|line| Input::Line(line.to_string()))
            .chain(std::iter::once(Input::Closed))
            .collect()
    }

    fn session(book: &mut Book, inputs: Vec<Input>) -> (SessionEnd, String) {
        let mut output = Vec::new();
        let end = run_session(book, inputs, &mut output).unwrap();
        (end, String::from_utf8(output).unwrap())
    }

    #[test]
    fn session_stops_at_exit() {
        let mut book = Book::default();
        let (end, output) = session(
            &mut book,
            lines("contact set John\nexit\ncontact set Jane"),
        );
        assert_eq!(end, SessionEnd::Exit);
        assert!(book.contacts.contains("John"));
        assert!(!book.contacts.contains("Jane"));
        assert!(output.contains("Contact 'John' created"));
        assert!(output.contains("Good bye!"));
    }

    #[test]
    fn session_ends_on_eof_and_reports_bad_input() {
        let mut book = Book::default();
        let (end, output) = session(&mut book, lines("\nfly away\nnote set Todo call mom"));
        assert_eq!(end, SessionEnd::Closed);
        assert_eq!(book.notes.find("Todo").unwrap().content(), "call mom");
        assert!(output.contains("Enter a command."));
        assert!(output.contains("Unknown command 'fly'"));
    }

    #[test]
    fn validation_errors_do_not_end_the_session() {
        let mut book = Book::default();
        let (_, output) = session(
            &mut book,
            lines("contact set John birthday 31.02.2000\ncontact set John"),
        );
        assert!(output.contains("Error: Invalid date format. Use DD.MM.YYYY"));
        assert!(output.contains("Contact 'John' created"));
        assert!(book.contacts.contains("John"));
    }

    #[test]
    fn interrupt_stops_the_loop_and_keeps_earlier_changes() {
        let mut book = Book::default();
        let inputs = vec![
            Input::Line("contact set John phone 1234567890".to_string()),
            Input::Interrupted,
            Input::Line("contact set Jane".to_string()),
        ];
        let (end, output) = session(&mut book, inputs);
        assert_eq!(end, SessionEnd::Interrupted);
        assert!(output.contains("Interrupted by user."));
        assert!(book.contacts.contains("John"));
        assert!(!book.contacts.contains("Jane"));
    }

    #[test]
    fn interrupted_session_is_saved_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pocketbook.db");

        let mut conn = open_db(&path).unwrap();
        let mut repo = SqliteBookRepository::try_new(&mut conn).unwrap();
        let mut book = Book::default();
        let inputs = vec![
            Input::Line("contact set John phone 1234567890".to_string()),
            Input::Line(r#"note set "Todo" "call mom""#.to_string()),
            Input::Interrupted,
        ];
        session(&mut book, inputs);
        persist(&mut repo, &book).unwrap();
        drop(conn);

        let mut reopened = open_db(&path).unwrap();
        let repo = SqliteBookRepository::try_new(&mut reopened).unwrap();
        let (contacts, notes) = repo.load().unwrap();
        assert_eq!(contacts.find("John").unwrap().phones()[0].as_str(), "1234567890");
        assert_eq!(notes.find("Todo").unwrap().content(), "call mom");
    }
}
