//! Command execution against the in-memory book.
//!
//! Handlers never log record content; only the command kind and outcome.

use crate::command::{Command, ContactField, ContactPart, NoteUpdate};
use chrono::NaiveDate;
use log::{debug, warn};
use pocketbook_core::{
    Contact, ContactDirectory, Note, NoteDirectory, ValidationError, DEFAULT_BIRTHDAY_WINDOW_DAYS,
};
use serde::Serialize;

/// Session state: both directories, loaded at start and saved on exit.
#[derive(Debug, Default, Serialize)]
pub struct Book {
    pub contacts: ContactDirectory,
    pub notes: NoteDirectory,
}

/// Text shown to the user after one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub exit: bool,
}

impl Reply {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            exit: false,
        }
    }
}

/// Runs `command`; `today` anchors the birthday window.
///
/// Validation failures become a reply and never abort the session.
pub fn execute(book: &mut Book, command: Command, today: NaiveDate) -> Reply {
    let kind = command.kind();
    let result = match command {
        Command::Help => Ok(HELP_TEXT.to_string()),
        Command::Exit => {
            return Reply {
                text: "Good bye!".to_string(),
                exit: true,
            }
        }
        Command::Export => Ok(export(book)),
        Command::ContactCreate { name } => create_contact(&mut book.contacts, &name),
        Command::ContactSet { name, field, value } => {
            set_contact_field(&mut book.contacts, &name, field, &value)
        }
        Command::ContactEditPhone { name, old, new } => {
            edit_phone(&mut book.contacts, &name, &old, &new)
        }
        Command::ContactAll => Ok(show_contacts(&book.contacts)),
        Command::ContactBirthdays { days } => Ok(show_birthdays(&book.contacts, days, today)),
        Command::ContactLookup { query } => Ok(lookup_contact(&book.contacts, &query)),
        Command::ContactDelete { name, part: None } => Ok(if book.contacts.delete(&name) {
            format!("Contact '{name}' deleted")
        } else {
            format!("Contact '{name}' not found")
        }),
        Command::ContactDelete {
            name,
            part: Some(part),
        } => Ok(match book.contacts.find_mut(&name) {
            Some(contact) => remove_contact_part(contact, &name, part),
            None => format!("Contact '{name}' not found"),
        }),
        Command::NoteCreate { title, content } => create_note(&mut book.notes, &title, content),
        Command::NoteUpdate { title, update } => match book.notes.find_mut(&title) {
            Some(note) => update_note(note, &title, update),
            None => Ok(format!("Note '{title}' not found")),
        },
        Command::NoteAll => Ok(show_notes(book.notes.iter(), "No notes found".to_string())),
        Command::NoteSorted => Ok(show_notes(
            book.notes.sort_by_tags().into_iter(),
            "No notes found".to_string(),
        )),
        Command::NoteSearch { query } => {
            let results = book.notes.search_by_content(&query);
            Ok(if results.is_empty() {
                format!("No notes found for query '{query}'")
            } else {
                with_header(
                    &format!("Found {} note(s):", results.len()),
                    results.into_iter(),
                )
            })
        }
        Command::NoteTag { tag } => {
            let results = book.notes.search_by_tags(&tag);
            Ok(if results.is_empty() {
                format!("No notes found with tag '#{tag}'")
            } else {
                with_header(&format!("Notes with tag '#{tag}':"), results.into_iter())
            })
        }
        Command::NoteLookup { title } => Ok(match book.notes.find(&title) {
            Some(note) => note.to_string(),
            None => format!("Note '{title}' not found"),
        }),
        Command::NoteDelete { title, tag } => Ok(delete_from_note(&mut book.notes, &title, tag)),
    };

    match result {
        Ok(text) => {
            debug!("event=command module=cli status=ok kind={kind}");
            Reply::text(text)
        }
        Err(err) => {
            debug!(
                "event=command module=cli status=rejected kind={kind} field={}",
                err.field()
            );
            Reply::text(format!("Error: {err}"))
        }
    }
}

fn export(book: &Book) -> String {
    serde_json::to_string_pretty(book).unwrap_or_else(|err| {
        warn!("event=export module=cli status=error error={err}");
        format!("Export failed: {err}")
    })
}

fn create_contact(contacts: &mut ContactDirectory, name: &str) -> Result<String, ValidationError> {
    if contacts.contains(name) {
        return Ok(format!("Contact '{name}' already exists"));
    }
    contacts.add(Contact::new(name)?);
    Ok(format!("Contact '{name}' created"))
}

fn set_contact_field(
    contacts: &mut ContactDirectory,
    name: &str,
    field: ContactField,
    value: &str,
) -> Result<String, ValidationError> {
    // Work on a copy so a rejected value leaves the directory untouched.
    let mut contact = match contacts.find(name) {
        Some(existing) => existing.clone(),
        None => Contact::new(name)?,
    };
    match field {
        ContactField::Phone => contact.add_phone(value)?,
        ContactField::Email => contact.set_email(value)?,
        ContactField::Address => contact.set_address(value)?,
        ContactField::Birthday => contact.set_birthday(value)?,
    }
    contacts.add(contact);
    Ok(format!("{field} set for '{name}'"))
}

fn edit_phone(
    contacts: &mut ContactDirectory,
    name: &str,
    old: &str,
    new: &str,
) -> Result<String, ValidationError> {
    let Some(contact) = contacts.find_mut(name) else {
        return Ok(format!("Contact '{name}' not found"));
    };
    if contact.find_phone(old).is_none() {
        return Ok(format!("Phone '{old}' not found for '{name}'"));
    }
    contact.edit_phone(old, new)?;
    Ok(format!("Phone for '{name}' updated from {old} to {new}"))
}

fn show_contacts(contacts: &ContactDirectory) -> String {
    if contacts.is_empty() {
        return "Address book is empty".to_string();
    }
    join_lines(contacts.iter())
}

fn show_birthdays(contacts: &ContactDirectory, days: Option<u32>, today: NaiveDate) -> String {
    let days = days.unwrap_or(DEFAULT_BIRTHDAY_WINDOW_DAYS);
    let upcoming = contacts.upcoming_birthdays(days, today);
    if upcoming.is_empty() {
        return format!("No birthdays in the next {days} days");
    }
    with_header(&format!("Birthdays in {days} days:"), upcoming.iter())
}

fn lookup_contact(contacts: &ContactDirectory, query: &str) -> String {
    if let Some(contact) = contacts.find(query) {
        return contact.to_string();
    }
    let results = contacts.search(query);
    if results.is_empty() {
        return format!("Contact '{query}' not found");
    }
    with_header("Found contacts:", results.into_iter())
}

fn remove_contact_part(contact: &mut Contact, name: &str, part: ContactPart) -> String {
    match part {
        ContactPart::Phone(number) => {
            if contact.find_phone(&number).is_none() {
                return format!("Phone '{number}' not found for '{name}'");
            }
            contact.remove_phone(&number);
            format!("Phone '{number}' deleted for '{name}'")
        }
        ContactPart::Email => {
            if contact.email().is_none() {
                return format!("'{name}' has no email to delete");
            }
            contact.remove_email();
            format!("Email deleted for '{name}'")
        }
        ContactPart::Address => {
            if contact.address().is_none() {
                return format!("'{name}' has no address to delete");
            }
            contact.remove_address();
            format!("Address deleted for '{name}'")
        }
        ContactPart::Birthday => {
            if contact.birthday().is_none() {
                return format!("'{name}' has no birthday to delete");
            }
            contact.remove_birthday();
            format!("Birthday deleted for '{name}'")
        }
    }
}

fn create_note(
    notes: &mut NoteDirectory,
    title: &str,
    content: String,
) -> Result<String, ValidationError> {
    if notes.contains(title) {
        return Ok(format!("Note '{title}' already exists"));
    }
    notes.add(Note::new(title, content)?);
    Ok(format!("Note '{title}' created"))
}

fn update_note(note: &mut Note, title: &str, update: NoteUpdate) -> Result<String, ValidationError> {
    match update {
        NoteUpdate::AddTag(tag) => Ok(if note.add_tag(&tag)? {
            format!("Tag '#{tag}' added to note '{title}'")
        } else {
            format!("Note '{title}' already has tag '#{tag}'")
        }),
        NoteUpdate::ReplaceContent(text) => {
            note.update_content(text);
            Ok(format!("Content updated for note '{title}'"))
        }
    }
}

fn delete_from_note(notes: &mut NoteDirectory, title: &str, tag: Option<String>) -> String {
    match tag {
        None => {
            if notes.delete(title) {
                format!("Note '{title}' deleted")
            } else {
                format!("Note '{title}' not found")
            }
        }
        Some(tag) => match notes.find_mut(title) {
            Some(note) => {
                note.remove_tag(&tag);
                format!("Tag '#{tag}' removed from note '{title}'")
            }
            None => format!("Note '{title}' not found"),
        },
    }
}

fn show_notes<'a>(notes: impl Iterator<Item = &'a Note>, empty: String) -> String {
    let text = join_lines(notes);
    if text.is_empty() {
        empty
    } else {
        text
    }
}

fn with_header<T: ToString>(header: &str, items: impl Iterator<Item = T>) -> String {
    let body = join_lines(items);
    format!("{header}\n{body}")
}

fn join_lines<T: ToString>(items: impl Iterator<Item = T>) -> String {
    items
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

const HELP_TEXT: &str = "\
Available commands:
  contact set <name>                      Create a contact
  contact set <name> <field> <value>      Set a field (phone, email, address, birthday)
  contact edit <name> phone <old> <new>   Replace a phone number
  contact get all                         Show all contacts
  contact get birthdays [days]            Birthdays in the next 7 (or <days>) days
  contact get <name|query>                Show a contact or search contacts
  contact delete <name>                   Delete a contact
  contact delete <name> <field>           Delete email, address or birthday
  contact delete <name> phone <number>    Delete one phone number

  note set \"title\" \"content\"              Create a note
  note set \"title\" tag \"tag\"              Add a tag
  note set \"title\" content \"text\"         Replace the content
  note get all                            Show all notes
  note get sorted                         Show notes sorted by tags
  note get search \"query\"                 Search notes by title or content
  note get tag \"tag\"                      Notes carrying a tag
  note get \"title\"                        Show one note
  note delete \"title\"                     Delete a note
  note delete \"title\" tag \"tag\"           Remove a tag

  export                                  Print contacts and notes as JSON
  help                                    Show this help
  exit | close                            Save and quit";

#[cfg(test)]
mod tests {
    use super::{execute, Book, Reply};
    use crate::command::parse_line;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    fn run(book: &mut Book, line: &str) -> String {
        let command = parse_line(line).unwrap();
        execute(book, command, today()).text
    }

    #[test]
    fn contact_set_creates_missing_contact_and_validates() {
        let mut book = Book::default();
        assert_eq!(
            run(&mut book, "contact set John phone 1234567890"),
            "phone set for 'John'"
        );
        assert_eq!(
            run(&mut book, "contact set John phone 12345"),
            "Error: Phone number must have exactly 10 digits."
        );
        assert_eq!(
            run(&mut book, "contact set Jane email not-an-email"),
            "Error: Invalid email format"
        );
        assert!(!book.contacts.contains("Jane"));
        assert_eq!(book.contacts.find("John").unwrap().phones().len(), 1);
        assert_eq!(run(&mut book, "contact set John"), "Contact 'John' already exists");
    }

    #[test]
    fn contact_get_falls_back_to_search() {
        let mut book = Book::default();
        run(&mut book, "contact set John phone 1234567890");
        run(&mut book, "contact set Johnny phone 5555555555");

        assert_eq!(
            run(&mut book, "contact get John"),
            "Contact name: John, phones: 1234567890"
        );
        assert_eq!(
            run(&mut book, "contact get 5555"),
            "Found contacts:\nContact name: Johnny, phones: 5555555555"
        );
        assert_eq!(run(&mut book, "contact get Zed"), "Contact 'Zed' not found");
    }

    #[test]
    fn birthdays_use_window_and_reference_date() {
        let mut book = Book::default();
        run(&mut book, "contact set Ann birthday 12.03.1990");
        run(&mut book, "contact set Bob birthday 25.03.1985");

        assert_eq!(
            run(&mut book, "contact get birthdays"),
            "Birthdays in 7 days:\nAnn (12.03)"
        );
        assert_eq!(
            run(&mut book, "contact get birthdays 20"),
            "Birthdays in 20 days:\nAnn (12.03)\nBob (25.03)"
        );
        assert_eq!(
            run(&mut book, "contact get birthdays 1"),
            "No birthdays in the next 1 days"
        );
    }

    #[test]
    fn contact_delete_reports_missing_parts() {
        let mut book = Book::default();
        run(&mut book, "contact set John phone 1234567890");

        assert_eq!(
            run(&mut book, "contact delete John email"),
            "'John' has no email to delete"
        );
        assert_eq!(
            run(&mut book, "contact delete John phone 0000000000"),
            "Phone '0000000000' not found for 'John'"
        );
        assert_eq!(
            run(&mut book, "contact delete John phone 1234567890"),
            "Phone '1234567890' deleted for 'John'"
        );
        assert_eq!(run(&mut book, "contact delete John"), "Contact 'John' deleted");
        assert_eq!(run(&mut book, "contact delete John"), "Contact 'John' not found");
    }

    #[test]
    fn contact_edit_phone_keeps_old_number_on_invalid_input() {
        let mut book = Book::default();
        run(&mut book, "contact set John phone 1111111111");

        assert_eq!(
            run(&mut book, "contact edit John phone 1111111111 12"),
            "Error: Phone number must have exactly 10 digits."
        );
        assert_eq!(
            run(&mut book, "contact edit John phone 1111111111 2222222222"),
            "Phone for 'John' updated from 1111111111 to 2222222222"
        );
        let phones = book.contacts.find("John").unwrap().phones();
        assert_eq!(phones[0].as_str(), "2222222222");
    }

    #[test]
    fn note_lifecycle() {
        let mut book = Book::default();
        assert_eq!(
            run(&mut book, r#"note set "Shopping" "Buy milk""#),
            "Note 'Shopping' created"
        );
        assert_eq!(
            run(&mut book, r#"note set "Shopping" "again""#),
            "Note 'Shopping' already exists"
        );
        assert_eq!(
            run(&mut book, "note set Shopping tag Urgent"),
            "Tag '#Urgent' added to note 'Shopping'"
        );
        assert_eq!(
            run(&mut book, "note set Shopping tag urgent"),
            "Note 'Shopping' already has tag '#urgent'"
        );
        assert_eq!(
            run(&mut book, "note get tag URGENT"),
            "Notes with tag '#URGENT':\nShopping: Buy milk | Tags: #urgent"
        );
        assert_eq!(
            run(&mut book, "note get search milk"),
            "Found 1 note(s):\nShopping: Buy milk | Tags: #urgent"
        );
        assert_eq!(
            run(&mut book, "note set Missing tag x"),
            "Note 'Missing' not found"
        );
        assert_eq!(
            run(&mut book, "note delete Shopping tag urgent"),
            "Tag '#urgent' removed from note 'Shopping'"
        );
        assert_eq!(run(&mut book, "note delete Shopping"), "Note 'Shopping' deleted");
        assert_eq!(run(&mut book, "note get all"), "No notes found");
    }

    #[test]
    fn empty_note_title_is_rejected() {
        let mut book = Book::default();
        assert_eq!(
            run(&mut book, r#"note set "" "text""#),
            "Error: Title cannot be empty"
        );
        assert!(book.notes.is_empty());
    }

    #[test]
    fn export_emits_json_for_both_directories() {
        let mut book = Book::default();
        run(&mut book, "contact set John phone 1234567890");
        run(&mut book, "note set Todo call");

        let json: serde_json::Value = serde_json::from_str(&run(&mut book, "export")).unwrap();
        assert_eq!(json["contacts"][0]["name"], "John");
        assert_eq!(json["notes"][0]["title"], "Todo");
    }

    #[test]
    fn exit_requests_shutdown() {
        let mut book = Book::default();
        let reply = execute(&mut book, parse_line("close").unwrap(), today());
        assert_eq!(
            reply,
            Reply {
                text: "Good bye!".to_string(),
                exit: true
            }
        );
    }
}
