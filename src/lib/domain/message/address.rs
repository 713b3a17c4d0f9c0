//! Email addresses with an optional display name

use std::{fmt, str::FromStr};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

/// An error that can occur when parsing an address
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressParseError {
    /// The address is empty
    #[error("address is empty")]
    EmptyAddress,

    /// `Name <email>` form without the closing bracket
    #[error("address \"{0}\" is missing a closing '>'")]
    UnterminatedAddress(String),
}

/// A sender or recipient.
///
/// Envelope rendering always gives the bare email; header rendering keeps the
/// display name, RFC 2047 encoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Address {
    /// Only an email
    Bare(String),

    /// An email with a display name
    Named {
        /// Display name
        name: String,

        /// Email
        email: String,
    },
}

impl Address {
    /// Creates an address, which is bare when `name` is absent or empty
    pub fn new(name: Option<impl Into<String>>, email: impl Into<String>) -> Self {
        let email = email.into();

        match name.map(Into::into) {
            Some(name) if !name.is_empty() => Self::Named { name, email },
            _ => Self::Bare(email),
        }
    }

    /// The email, without display name
    pub fn email(&self) -> &str {
        match self {
            Self::Bare(email) | Self::Named { email, .. } => email,
        }
    }

    /// The display name, if any
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Bare(_) => None,
            Self::Named { name, .. } => Some(name),
        }
    }

    /// The address as used in the SMTP envelope.
    ///
    /// CR and LF are removed so the email can never end a header line.
    pub fn envelope(&self) -> String {
        self.email()
            .chars()
            .filter(|c| !matches!(c, '\r' | '\n'))
            .collect()
    }

    /// The address as written in a message header: `=?UTF-8?B?...?= <email>`
    /// when named, the bare email otherwise
    pub fn header(&self) -> String {
        match self {
            Self::Bare(_) => self.envelope(),
            Self::Named { name, .. } => format!("{} <{}>", encode_word(name), self.envelope()),
        }
    }

    /// Renders a header list, separated by `", "`
    pub fn header_list(addresses: &[Address]) -> String {
        Self::join(addresses, ", ")
    }

    /// Renders a header list folded after every comma, so each address sits
    /// on its own continuation line
    pub fn folded_header_list(addresses: &[Address]) -> String {
        Self::join(addresses, ",\r\n ")
    }

    fn join(addresses: &[Address], separator: &str) -> String {
        addresses
            .iter()
            .map(Address::header)
            .collect::<Vec<_>>()
            .join(separator)
    }
}

/// RFC 2047 "B" encoded word
fn encode_word(text: &str) -> String {
    format!("=?UTF-8?B?{}?=", STANDARD.encode(text.as_bytes()))
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bare(email) => write!(f, "{}", email),
            Self::Named { name, email } => write!(f, "{} <{}>", name, email),
        }
    }
}

impl From<&str> for Address {
    fn from(email: &str) -> Self {
        Self::Bare(email.to_string())
    }
}

impl From<String> for Address {
    fn from(email: String) -> Self {
        Self::Bare(email)
    }
}

impl<N, E> From<(Option<N>, E)> for Address
where
    N: Into<String>,
    E: Into<String>,
{
    fn from((name, email): (Option<N>, E)) -> Self {
        Self::new(name, email)
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    /// Parses `email` or `Name <email>`; surrounding quotes around the name
    /// are removed
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(AddressParseError::EmptyAddress);
        }

        let Some((name, rest)) = trimmed.split_once('<') else {
            return Ok(Self::Bare(trimmed.to_string()));
        };

        let email = rest
            .strip_suffix('>')
            .ok_or_else(|| AddressParseError::UnterminatedAddress(trimmed.to_string()))?
            .trim();

        if email.is_empty() {
            return Err(AddressParseError::EmptyAddress);
        }

        let name = name.trim().trim_matches('"').trim();

        Ok(Self::new(Some(name), email))
    }
}
