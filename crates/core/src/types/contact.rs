//! Customer contact fields captured at checkout.
//!
//! Each type only exists in a validated form, so an order can never be built
//! from a blank phone number or a malformed pincode.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing contact fields.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ContactError {
    /// Email is empty, too long, or lacks a local part / domain.
    #[error("invalid email address")]
    InvalidEmail,
    /// Phone does not reduce to a 10-digit mobile number.
    #[error("phone number must be 10 digits")]
    InvalidPhone,
    /// Pincode is not six digits.
    #[error("pincode must be 6 digits")]
    InvalidPincode,
}

/// An email address.
///
/// ## Constraints
///
/// - Length: 3-254 characters (RFC 5321 limit)
/// - Exactly one `@`, with a non-empty local part and a dotted domain
/// - Stored lowercased and trimmed
///
/// ```
/// use frameshop_core::Email;
///
/// assert!(Email::parse("Asha@Example.in").is_ok());
/// assert!(Email::parse("asha@localhost").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse and normalize an email address.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError::InvalidEmail`] if the input is not a plausible
    /// address.
    pub fn parse(s: &str) -> Result<Self, ContactError> {
        let s = s.trim().to_lowercase();
        if s.is_empty() || s.len() > Self::MAX_LENGTH || s.chars().any(char::is_whitespace) {
            return Err(ContactError::InvalidEmail);
        }

        let (local, domain) = s.split_once('@').ok_or(ContactError::InvalidEmail)?;
        if local.is_empty() || domain.contains('@') {
            return Err(ContactError::InvalidEmail);
        }
        let dotted: Vec<&str> = domain.split('.').collect();
        if dotted.len() < 2 || dotted.iter().any(|label| label.is_empty()) {
            return Err(ContactError::InvalidEmail);
        }

        Ok(Self(s))
    }

    /// The normalized address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = ContactError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

/// An Indian mobile number, stored as its 10 significant digits.
///
/// Accepts spaces, dashes and a `+91`/`91`/`0` prefix.
///
/// ```
/// use frameshop_core::Phone;
///
/// let phone = Phone::parse("+91 98765-43210").unwrap();
/// assert_eq!(phone.as_str(), "9876543210");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Phone(String);

impl Phone {
    /// Parse a phone number.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError::InvalidPhone`] unless exactly ten digits remain
    /// after stripping separators and the country/trunk prefix.
    pub fn parse(s: &str) -> Result<Self, ContactError> {
        let trimmed = s.trim();
        if trimmed
            .chars()
            .any(|c| !(c.is_ascii_digit() || matches!(c, ' ' | '-' | '+' | '(' | ')')))
        {
            return Err(ContactError::InvalidPhone);
        }

        let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
        let national = match digits.len() {
            10 => Some(digits.as_str()),
            11 => digits.strip_prefix('0'),
            12 => digits.strip_prefix("91"),
            _ => None,
        }
        .ok_or(ContactError::InvalidPhone)?;

        if national.starts_with('0') {
            return Err(ContactError::InvalidPhone);
        }

        Ok(Self(national.to_owned()))
    }

    /// The ten national digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Phone {
    type Error = ContactError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Phone> for String {
    fn from(phone: Phone) -> Self {
        phone.0
    }
}

/// A six-digit Indian postal code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Pincode(String);

impl Pincode {
    /// Parse a pincode. Internal spaces are ignored (`"560 001"`).
    ///
    /// # Errors
    ///
    /// Returns [`ContactError::InvalidPincode`] unless the input is six digits
    /// not starting with zero.
    pub fn parse(s: &str) -> Result<Self, ContactError> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.len() != 6
            || !compact.chars().all(|c| c.is_ascii_digit())
            || compact.starts_with('0')
        {
            return Err(ContactError::InvalidPincode);
        }
        Ok(Self(compact))
    }

    /// The six digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Pincode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Pincode {
    type Error = ContactError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Pincode> for String {
    fn from(pincode: Pincode) -> Self {
        pincode.0
    }
}
