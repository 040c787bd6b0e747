//! Contact record model.
//!
//! # Responsibility
//! - Aggregate one person's name, phone list and optional email/address/birthday.
//! - Render the deterministic textual summary used by display and search.
//!
//! # Invariants
//! - `name` is validated at construction and never changes afterwards.
//! - Every mutation validates first; a failed setter leaves the record untouched.
//! - Phone order is insertion order; duplicates are allowed.

use crate::model::field::{Address, Birthday, Email, Field, Name, Phone, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// One address-book entry keyed by its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    name: Name,
    phones: Vec<Phone>,
    email: Option<Email>,
    address: Option<Address>,
    birthday: Option<Birthday>,
}

impl Contact {
    /// Creates a contact with only a name.
    ///
    /// # Errors
    /// - Returns `ValidationError::Empty` when `name` is empty.
    pub fn new(name: impl AsRef<str>) -> Result<Self, ValidationError> {
        Ok(Self::with_name(Name::parse(name.as_ref())?))
    }

    /// Creates a contact from an already validated name.
    pub fn with_name(name: Name) -> Self {
        Self {
            name,
            phones: Vec::new(),
            email: None,
            address: None,
            birthday: None,
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn phones(&self) -> &[Phone] {
        &self.phones
    }

    pub fn email(&self) -> Option<&Email> {
        self.email.as_ref()
    }

    pub fn address(&self) -> Option<&Address> {
        self.address.as_ref()
    }

    pub fn birthday(&self) -> Option<&Birthday> {
        self.birthday.as_ref()
    }

    /// Validates and appends one phone number.
    pub fn add_phone(&mut self, raw: &str) -> Result<(), ValidationError> {
        let phone = Phone::parse(raw)?;
        self.phones.push(phone);
        Ok(())
    }

    /// Removes the first phone equal to `value`. No-op when absent.
    pub fn remove_phone(&mut self, value: &str) {
        if let Some(index) = self.phone_index(value) {
            self.phones.remove(index);
        }
    }

    /// Replaces the first phone equal to `old` with validated `new`, in place.
    ///
    /// `new` is validated even when `old` is absent, so a malformed
    /// replacement is always reported.
    pub fn edit_phone(&mut self, old: &str, new: &str) -> Result<(), ValidationError> {
        let replacement = Phone::parse(new)?;
        if let Some(index) = self.phone_index(old) {
            self.phones[index] = replacement;
        }
        Ok(())
    }

    /// Returns the first phone equal to `value`.
    pub fn find_phone(&self, value: &str) -> Option<&Phone> {
        self.phones.iter().find(|phone| phone.as_str() == value)
    }

    pub fn set_birthday(&mut self, raw: &str) -> Result<(), ValidationError> {
        self.birthday = Some(Birthday::parse(raw)?);
        Ok(())
    }

    pub fn remove_birthday(&mut self) {
        self.birthday = None;
    }

    pub fn set_address(&mut self, raw: &str) -> Result<(), ValidationError> {
        self.address = Some(Address::parse(raw)?);
        Ok(())
    }

    pub fn remove_address(&mut self) {
        self.address = None;
    }

    pub fn set_email(&mut self, raw: &str) -> Result<(), ValidationError> {
        self.email = Some(Email::parse(raw)?);
        Ok(())
    }

    pub fn remove_email(&mut self) {
        self.email = None;
    }

    /// Case-insensitive substring match over every populated field.
    ///
    /// `needle` must already be lower-cased.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        self.name.as_str().to_lowercase().contains(needle)
            || self
                .phones
                .iter()
                .any(|phone| phone.as_str().contains(needle))
            || self
                .address
                .as_ref()
                .is_some_and(|address| address.as_str().to_lowercase().contains(needle))
            || self
                .email
                .as_ref()
                .is_some_and(|email| email.as_str().to_lowercase().contains(needle))
            || self
                .birthday
                .as_ref()
                .is_some_and(|birthday| birthday.to_string().contains(needle))
    }

    fn phone_index(&self, value: &str) -> Option<usize> {
        self.phones.iter().position(|phone| phone.as_str() == value)
    }
}

impl Display for Contact {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let phones = self
            .phones
            .iter()
            .map(Phone::as_str)
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "Contact name: {}, phones: {phones}", self.name)?;
        if let Some(birthday) = &self.birthday {
            write!(f, ", Birthday: {birthday}")?;
        }
        if let Some(address) = &self.address {
            write!(f, ", Address: {address}")?;
        }
        if let Some(email) = &self.email {
            write!(f, ", Email: {email}")?;
        }
        Ok(())
    }
}
