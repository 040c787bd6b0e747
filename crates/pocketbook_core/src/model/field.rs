//! Validated primitive field values.
//!
//! # Responsibility
//! - Enforce format and non-emptiness rules on raw user input.
//! - Provide one value type per field kind so record fields are statically typed.
//!
//! # Invariants
//! - A field value can only be constructed through `Field::parse`.
//! - Validation is pure: no I/O, no global state, no partial results.
//! - Serialized form equals the canonical string; deserialization re-validates.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});
static BIRTHDAY_SHAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{2}\.[0-9]{2}\.[0-9]{4}$").expect("valid birthday regex"));

const PHONE_DIGITS: usize = 10;
/// Input and display format for birthdays.
pub const BIRTHDAY_FORMAT: &str = "%d.%m.%Y";

/// Field kind selector used in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Name,
    Phone,
    Email,
    Birthday,
    Address,
    Tag,
    Title,
}

impl Display for FieldKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Name => "Name",
            Self::Phone => "Phone",
            Self::Email => "Email",
            Self::Birthday => "Birthday",
            Self::Address => "Address",
            Self::Tag => "Tag",
            Self::Title => "Title",
        };
        f.write_str(label)
    }
}

/// Rejection reason for a raw field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Value is empty (or blank, for kinds that trim).
    Empty { field: FieldKind },
    /// Phone is not exactly ten ASCII digits.
    InvalidPhone { value: String },
    /// Email does not match `local@domain.tld`.
    InvalidEmail { value: String },
    /// Birthday is not a real `DD.MM.YYYY` calendar date.
    InvalidBirthday { value: String },
}

impl ValidationError {
    /// Returns the field kind this error refers to.
    pub fn field(&self) -> FieldKind {
        match self {
            Self::Empty { field } => *field,
            Self::InvalidPhone { .. } => FieldKind::Phone,
            Self::InvalidEmail { .. } => FieldKind::Email,
            Self::InvalidBirthday { .. } => FieldKind::Birthday,
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} cannot be empty"),
            Self::InvalidPhone { .. } => write!(f, "Phone number must have exactly 10 digits."),
            Self::InvalidEmail { .. } => write!(f, "Invalid email format"),
            Self::InvalidBirthday { .. } => write!(f, "Invalid date format. Use DD.MM.YYYY"),
        }
    }
}

impl Error for ValidationError {}

/// Shared validation contract for all field value types.
pub trait Field: Sized {
    /// Kind reported in validation errors.
    const KIND: FieldKind;

    /// Validates `raw` and returns the typed value.
    ///
    /// # Errors
    /// - Returns `ValidationError` when `raw` violates the kind's rules.
    fn parse(raw: &str) -> Result<Self, ValidationError>;
}

/// Implements the string conversions shared by every string-backed field.
macro_rules! string_field {
    ($ty:ident) => {
        impl $ty {
            /// Returns the stored value.
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl Display for $ty {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $ty {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                <$ty as Field>::parse(&value)
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.0
            }
        }
    };
}

/// Contact name. Any non-empty string, stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Name(String);

impl Field for Name {
    const KIND: FieldKind = FieldKind::Name;

    fn parse(raw: &str) -> Result<Self, ValidationError> {
        if raw.is_empty() {
            return Err(ValidationError::Empty { field: Self::KIND });
        }
        Ok(Self(raw.to_string()))
    }
}

string_field!(Name);

/// Phone number. Exactly ten ASCII digits, stored as the digit string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Phone(String);

impl Field for Phone {
    const KIND: FieldKind = FieldKind::Phone;

    fn parse(raw: &str) -> Result<Self, ValidationError> {
        if raw.len() != PHONE_DIGITS || !raw.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(ValidationError::InvalidPhone {
                value: raw.to_string(),
            });
        }
        Ok(Self(raw.to_string()))
    }
}

string_field!(Phone);

/// Email address, stored as given.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Field for Email {
    const KIND: FieldKind = FieldKind::Email;

    fn parse(raw: &str) -> Result<Self, ValidationError> {
        if !EMAIL_RE.is_match(raw) {
            return Err(ValidationError::InvalidEmail {
                value: raw.to_string(),
            });
        }
        Ok(Self(raw.to_string()))
    }
}

string_field!(Email);

/// Postal address. Any non-empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Field for Address {
    const KIND: FieldKind = FieldKind::Address;

    fn parse(raw: &str) -> Result<Self, ValidationError> {
        if raw.is_empty() {
            return Err(ValidationError::Empty { field: Self::KIND });
        }
        Ok(Self(raw.to_string()))
    }
}

string_field!(Address);

/// Note tag, trimmed and lower-cased. Equality is therefore case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tag(String);

impl Field for Tag {
    const KIND: FieldKind = FieldKind::Tag;

    fn parse(raw: &str) -> Result<Self, ValidationError> {
        normalize_tag(raw)
            .map(Self)
            .ok_or(ValidationError::Empty { field: Self::KIND })
    }
}

string_field!(Tag);

/// Calendar birthday parsed from `DD.MM.YYYY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Birthday(NaiveDate);

impl Birthday {
    /// Returns the stored calendar date.
    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl Field for Birthday {
    const KIND: FieldKind = FieldKind::Birthday;

    fn parse(raw: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidBirthday {
            value: raw.to_string(),
        };
        if !BIRTHDAY_SHAPE_RE.is_match(raw) {
            return Err(invalid());
        }
        NaiveDate::parse_from_str(raw, BIRTHDAY_FORMAT)
            .map(Self)
            .map_err(|_| invalid())
    }
}

impl Display for Birthday {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(BIRTHDAY_FORMAT))
    }
}

impl TryFrom<String> for Birthday {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Birthday> for String {
    fn from(value: Birthday) -> Self {
        value.to_string()
    }
}

/// Normalizes one tag value: trimmed and lower-cased, `None` when blank.
pub fn normalize_tag(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Validates a note title. Titles are free text but never empty.
pub fn validate_title(raw: &str) -> Result<(), ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::Empty {
            field: FieldKind::Title,
        });
    }
    Ok(())
}
