//! Contact directory keyed by contact name.
//!
//! # Responsibility
//! - Own all contact records and expose key lookup and removal.
//! - Answer the upcoming-birthday and free-text search queries.
//!
//! # Invariants
//! - Keys are unique; `add` with an existing name replaces the record silently.
//! - Iteration is in ascending name order, so query results are stable for a
//!   given directory state.

use crate::model::contact::Contact;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Window used by callers that do not specify one.
pub const DEFAULT_BIRTHDAY_WINDOW_DAYS: u32 = 7;

/// One entry of the upcoming-birthdays report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpcomingBirthday {
    /// Contact name.
    pub name: String,
    /// Next occurrence of the birthday on or after the reference date.
    pub date: NaiveDate,
    /// Days between the reference date and `date`.
    pub days_until: u32,
}

impl Display for UpcomingBirthday {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.date.format("%d.%m"))
    }
}

/// In-memory address book.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Contact>", into = "Vec<Contact>")]
pub struct ContactDirectory {
    records: BTreeMap<String, Contact>,
}

impl From<Vec<Contact>> for ContactDirectory {
    fn from(value: Vec<Contact>) -> Self {
        let mut directory = Self::new();
        for contact in value {
            directory.add(contact);
        }
        directory
    }
}

impl From<ContactDirectory> for Vec<Contact> {
    fn from(value: ContactDirectory) -> Self {
        value.records.into_values().collect()
    }
}

impl ContactDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `contact`, replacing any record with the same name.
    pub fn add(&mut self, contact: Contact) {
        self.records
            .insert(contact.name().as_str().to_string(), contact);
    }

    pub fn find(&self, name: &str) -> Option<&Contact> {
        self.records.get(name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Contact> {
        self.records.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    /// Removes the record keyed by `name`. Returns whether one was removed.
    pub fn delete(&mut self, name: &str) -> bool {
        self.records.remove(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Contact> {
        self.records.values()
    }

    /// Lists contacts whose next birthday falls within `window_days` of
    /// `reference`, inclusive on both ends.
    ///
    /// The birthday's month/day is projected onto the reference year and
    /// rolled into the next year when it already passed. Feb 29 lands on
    /// Feb 28 in non-leap years. Output follows directory order.
    pub fn upcoming_birthdays(
        &self,
        window_days: u32,
        reference: NaiveDate,
    ) -> Vec<UpcomingBirthday> {
        self.iter()
            .filter_map(|contact| {
                let birthday = contact.birthday()?.date();
                let mut next = project_onto_year(birthday, reference.year())?;
                if next < reference {
                    next = project_onto_year(birthday, reference.year() + 1)?;
                }
                let delta = (next - reference).num_days();
                let days_until = u32::try_from(delta).ok()?;
                (days_until <= window_days).then(|| UpcomingBirthday {
                    name: contact.name().as_str().to_string(),
                    date: next,
                    days_until,
                })
            })
            .collect()
    }

    /// Case-insensitive substring search over name, phones, address, email
    /// and `DD.MM.YYYY` birthday. Each matching contact appears once.
    pub fn search(&self, query: &str) -> Vec<&Contact> {
        let needle = query.to_lowercase();
        self.iter()
            .filter(|contact| contact.matches(&needle))
            .collect()
    }
}

fn project_onto_year(date: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, date.month(), date.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 2, 28))
}

#[cfg(test)]
mod tests {
    use super::{ContactDirectory, DEFAULT_BIRTHDAY_WINDOW_DAYS};
    use crate::model::contact::Contact;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn with_birthday(name: &str, birthday: &str) -> Contact {
        let mut contact = Contact::new(name).unwrap();
        contact.set_birthday(birthday).unwrap();
        contact
    }

    #[test]
    fn add_find_delete_by_key() {
        let mut book = ContactDirectory::new();
        let mut contact = Contact::new("Alice").unwrap();
        contact.add_phone("1234567890").unwrap();
        book.add(contact.clone());

        assert_eq!(book.find("Alice"), Some(&contact));
        assert!(book.find("alice").is_none());
        assert!(book.delete("Alice"));
        assert!(book.is_empty());
    }

    #[test]
    fn add_overwrites_existing_key() {
        let mut book = ContactDirectory::new();
        let mut first = Contact::new("Alice").unwrap();
        first.add_phone("1111111111").unwrap();
        book.add(first);
        book.add(Contact::new("Alice").unwrap());

        assert_eq!(book.len(), 1);
        assert!(book.find("Alice").unwrap().phones().is_empty());
    }

    #[test]
    fn delete_missing_key_is_noop() {
        let mut book = ContactDirectory::new();
        book.add(Contact::new("Alice").unwrap());
        let before = book.clone();

        assert!(!book.delete("Ghost"));
        assert_eq!(book, before);
    }

    #[test]
    fn upcoming_birthdays_window_is_inclusive() {
        let mut book = ContactDirectory::new();
        book.add(with_birthday("Six days", "07.06.1990"));
        book.add(with_birthday("Seven days", "08.06.1985"));
        book.add(with_birthday("Eight days", "09.06.2000"));
        book.add(with_birthday("Today", "01.06.1970"));
        book.add(Contact::new("No birthday").unwrap());

        let upcoming = book.upcoming_birthdays(DEFAULT_BIRTHDAY_WINDOW_DAYS, date(2024, 6, 1));
        let rendered: Vec<String> = upcoming.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            ["Seven days (08.06)", "Six days (07.06)", "Today (01.06)"]
        );
        assert_eq!(upcoming[2].days_until, 0);
    }

    #[test]
    fn passed_birthday_rolls_into_next_year() {
        let mut book = ContactDirectory::new();
        book.add(with_birthday("New year", "02.01.1999"));
        book.add(with_birthday("Yesterday", "30.12.1999"));

        let upcoming = book.upcoming_birthdays(7, date(2024, 12, 31));
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].name, "New year");
        assert_eq!(upcoming[0].date, date(2025, 1, 2));
        assert_eq!(upcoming[0].days_until, 2);
    }

    #[test]
    fn leap_day_birthday_lands_on_feb_28_in_common_years() {
        let mut book = ContactDirectory::new();
        book.add(with_birthday("Leapling", "29.02.2000"));

        let upcoming = book.upcoming_birthdays(3, date(2025, 2, 26));
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].date, date(2025, 2, 28));

        let leap_year = book.upcoming_birthdays(3, date(2024, 2, 27));
        assert_eq!(leap_year[0].date, date(2024, 2, 29));
    }

    #[test]
    fn zero_window_only_matches_today() {
        let mut book = ContactDirectory::new();
        book.add(with_birthday("Today", "15.03.1990"));
        book.add(with_birthday("Tomorrow", "16.03.1990"));

        let upcoming = book.upcoming_birthdays(0, date(2024, 3, 15));
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].name, "Today");
    }

    #[test]
    fn search_matches_any_field_once() {
        let mut book = ContactDirectory::new();
        let mut john = Contact::new("John Smith").unwrap();
        john.add_phone("1234567890").unwrap();
        john.add_phone("1234567891").unwrap();
        book.add(john);
        book.add(Contact::new("Jane Doe").unwrap());

        for query in ["smith", "SMITH", "1234567890", "123456789"] {
            let found = book.search(query);
            assert_eq!(found.len(), 1, "query `{query}`");
            assert_eq!(found[0].name().as_str(), "John Smith");
        }
    }

    #[test]
    fn search_covers_optional_fields() {
        let mut book = ContactDirectory::new();
        let mut contact = Contact::new("Olena").unwrap();
        contact.set_email("Olena@Example.com").unwrap();
        contact.set_address("Lviv, Rynok sq.").unwrap();
        contact.set_birthday("24.08.1991").unwrap();
        book.add(contact);

        assert_eq!(book.search("example.COM").len(), 1);
        assert_eq!(book.search("rynok").len(), 1);
        assert_eq!(book.search("24.08").len(), 1);
        assert_eq!(book.search("1991").len(), 1);
        assert!(book.search("kharkiv").is_empty());
    }

    #[test]
    fn search_order_follows_directory_order() {
        let mut book = ContactDirectory::new();
        book.add(Contact::new("Zoe Ann").unwrap());
        book.add(Contact::new("Ann Lee").unwrap());

        let names: Vec<&str> = book
            .search("ann")
            .into_iter()
            .map(|c| c.name().as_str())
            .collect();
        assert_eq!(names, ["Ann Lee", "Zoe Ann"]);
    }
}
