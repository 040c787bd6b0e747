//! Parsing of one input line into a typed command.
//!
//! # Invariants
//! - Keywords (`contact`, `set`, `phone`, ...) are case-insensitive; names,
//!   titles and values are kept verbatim.
//! - Double quotes group words into one argument.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Contact attribute addressed by `set`/`delete` commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Phone,
    Email,
    Address,
    Birthday,
}

impl FromStr for ContactField {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "phone" => Ok(Self::Phone),
            "email" => Ok(Self::Email),
            "address" => Ok(Self::Address),
            "birthday" => Ok(Self::Birthday),
            other => Err(ParseError::UnknownField(other.to_string())),
        }
    }
}

impl Display for ContactField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Phone => "phone",
            Self::Email => "email",
            Self::Address => "address",
            Self::Birthday => "birthday",
        };
        f.write_str(label)
    }
}

/// Part of a contact removed by `contact delete <name> ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactPart {
    Phone(String),
    Email,
    Address,
    Birthday,
}

/// Change applied to an existing note by `note set`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteUpdate {
    AddTag(String),
    ReplaceContent(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Exit,
    Export,
    ContactCreate { name: String },
    ContactSet { name: String, field: ContactField, value: String },
    ContactEditPhone { name: String, old: String, new: String },
    ContactAll,
    ContactBirthdays { days: Option<u32> },
    ContactLookup { query: String },
    /// `part: None` deletes the whole record.
    ContactDelete { name: String, part: Option<ContactPart> },
    NoteCreate { title: String, content: String },
    NoteUpdate { title: String, update: NoteUpdate },
    NoteAll,
    NoteSorted,
    NoteSearch { query: String },
    NoteTag { tag: String },
    NoteLookup { title: String },
    NoteDelete { title: String, tag: Option<String> },
}

impl Command {
    /// Stable command label used in log events.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::Exit => "exit",
            Self::Export => "export",
            Self::ContactCreate { .. } => "contact_create",
            Self::ContactSet { .. } => "contact_set",
            Self::ContactEditPhone { .. } => "contact_edit_phone",
            Self::ContactAll => "contact_all",
            Self::ContactBirthdays { .. } => "contact_birthdays",
            Self::ContactLookup { .. } => "contact_lookup",
            Self::ContactDelete { .. } => "contact_delete",
            Self::NoteCreate { .. } => "note_create",
            Self::NoteUpdate { .. } => "note_update",
            Self::NoteAll => "note_all",
            Self::NoteSorted => "note_sorted",
            Self::NoteSearch { .. } => "note_search",
            Self::NoteTag { .. } => "note_tag",
            Self::NoteLookup { .. } => "note_lookup",
            Self::NoteDelete { .. } => "note_delete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Empty,
    UnknownCommand(String),
    UnknownField(String),
    Usage(&'static str),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty input"),
            Self::UnknownCommand(command) => {
                write!(f, "Unknown command '{command}'. Type 'help' to see available commands.")
            }
            Self::UnknownField(field) => {
                write!(f, "Unknown field '{field}'. Use: phone, email, address, birthday")
            }
            Self::Usage(usage) => write!(f, "Usage: {usage}"),
        }
    }
}

impl std::error::Error for ParseError {}

const CONTACT_SET_USAGE: &str = "contact set <name> [phone|email|address|birthday <value>]";
const CONTACT_EDIT_USAGE: &str = "contact edit <name> phone <old> <new>";
const CONTACT_GET_USAGE: &str = "contact get <all|birthdays [days]|name>";
const CONTACT_DELETE_USAGE: &str =
    "contact delete <name> [email|address|birthday|phone <number>]";
const NOTE_SET_USAGE: &str = "note set \"title\" \"content\" | note set \"title\" <tag|content> <value>";
const NOTE_GET_USAGE: &str = "note get <all|sorted|search <query>|tag <tag>|title>";
const NOTE_DELETE_USAGE: &str = "note delete \"title\" [tag \"tag\"]";

/// Parses one line of user input.
pub fn parse_line(line: &str) -> Result<Command, ParseError> {
    let tokens = tokenize(line);
    let Some((head, rest)) = tokens.split_first() else {
        return Err(ParseError::Empty);
    };

    match head.to_lowercase().as_str() {
        "help" => Ok(Command::Help),
        "exit" | "close" => Ok(Command::Exit),
        "export" => Ok(Command::Export),
        "contact" => parse_contact(rest),
        "note" => parse_note(rest),
        other => Err(ParseError::UnknownCommand(other.to_string())),
    }
}

fn parse_contact(tokens: &[String]) -> Result<Command, ParseError> {
    let Some((sub, args)) = tokens.split_first() else {
        return Err(ParseError::Usage(CONTACT_GET_USAGE));
    };

    match sub.to_lowercase().as_str() {
        "set" => match args {
            [name] => Ok(Command::ContactCreate { name: name.clone() }),
            [name, field, value] => Ok(Command::ContactSet {
                name: name.clone(),
                field: field.parse()?,
                value: value.clone(),
            }),
            _ => Err(ParseError::Usage(CONTACT_SET_USAGE)),
        },
        "edit" => match args {
            [name, field, old, new] if field.eq_ignore_ascii_case("phone") => {
                Ok(Command::ContactEditPhone {
                    name: name.clone(),
                    old: old.clone(),
                    new: new.clone(),
                })
            }
            _ => Err(ParseError::Usage(CONTACT_EDIT_USAGE)),
        },
        "get" => match args {
            [first, ..] if first.eq_ignore_ascii_case("all") => Ok(Command::ContactAll),
            [first] if first.eq_ignore_ascii_case("birthdays") => {
                Ok(Command::ContactBirthdays { days: None })
            }
            [first, days] if first.eq_ignore_ascii_case("birthdays") => match days.parse() {
                Ok(days) => Ok(Command::ContactBirthdays { days: Some(days) }),
                Err(_) => Err(ParseError::Usage(CONTACT_GET_USAGE)),
            },
            [query, ..] => Ok(Command::ContactLookup {
                query: query.clone(),
            }),
            [] => Err(ParseError::Usage(CONTACT_GET_USAGE)),
        },
        "delete" => {
            let (name, part) = match args {
                [name] => (name, None),
                [name, field] => {
                    let part = match field.parse::<ContactField>()? {
                        ContactField::Email => ContactPart::Email,
                        ContactField::Address => ContactPart::Address,
                        ContactField::Birthday => ContactPart::Birthday,
                        ContactField::Phone => {
                            return Err(ParseError::Usage(CONTACT_DELETE_USAGE))
                        }
                    };
                    (name, Some(part))
                }
                [name, field, number] if field.eq_ignore_ascii_case("phone") => {
                    (name, Some(ContactPart::Phone(number.clone())))
                }
                _ => return Err(ParseError::Usage(CONTACT_DELETE_USAGE)),
            };
            Ok(Command::ContactDelete {
                name: name.clone(),
                part,
            })
        }
        other => Err(ParseError::UnknownCommand(format!("contact {other}"))),
    }
}

fn parse_note(tokens: &[String]) -> Result<Command, ParseError> {
    let Some((sub, args)) = tokens.split_first() else {
        return Err(ParseError::Usage(NOTE_GET_USAGE));
    };

    match sub.to_lowercase().as_str() {
        "set" => match args {
            [title, action, value] if action.eq_ignore_ascii_case("tag") => {
                Ok(Command::NoteUpdate {
                    title: title.clone(),
                    update: NoteUpdate::AddTag(value.clone()),
                })
            }
            [title, action, value] if action.eq_ignore_ascii_case("content") => {
                Ok(Command::NoteUpdate {
                    title: title.clone(),
                    update: NoteUpdate::ReplaceContent(value.clone()),
                })
            }
            [title, content @ ..] if !content.is_empty() => Ok(Command::NoteCreate {
                title: title.clone(),
                content: content.join(" "),
            }),
            _ => Err(ParseError::Usage(NOTE_SET_USAGE)),
        },
        "get" => match args {
            [first] if first.eq_ignore_ascii_case("all") => Ok(Command::NoteAll),
            [first] if first.eq_ignore_ascii_case("sorted") => Ok(Command::NoteSorted),
            [first, query] if first.eq_ignore_ascii_case("search") => Ok(Command::NoteSearch {
                query: query.clone(),
            }),
            [first, tag] if first.eq_ignore_ascii_case("tag") => {
                Ok(Command::NoteTag { tag: tag.clone() })
            }
            [title] => Ok(Command::NoteLookup {
                title: title.clone(),
            }),
            _ => Err(ParseError::Usage(NOTE_GET_USAGE)),
        },
        "delete" => match args {
            [title] => Ok(Command::NoteDelete {
                title: title.clone(),
                tag: None,
            }),
            [title, keyword, tag] if keyword.eq_ignore_ascii_case("tag") => {
                Ok(Command::NoteDelete {
                    title: title.clone(),
                    tag: Some(tag.clone()),
                })
            }
            _ => Err(ParseError::Usage(NOTE_DELETE_USAGE)),
        },
        other => Err(ParseError::UnknownCommand(format!("note {other}"))),
    }
}

/// Splits on whitespace, keeping double-quoted runs together.
///
/// An unterminated quote extends to the end of the line.
fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            ch if ch.is_whitespace() && !in_quotes => {
                if has_token {
                    tokens.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            ch => {
                current.push(ch);
                has_token = true;
            }
        }
    }
    if has_token {
        tokens.push(current);
    }
    tokens
}
