//! Comma-separated email address lists.

use std::sync::LazyLock;

use regex::Regex;
use snafu::ensure;

use crate::{error, Result};

static ADDRESS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("address pattern is a valid regex")
});

#[must_use]
pub fn is_valid_address(address: &str) -> bool { ADDRESS_PATTERN.is_match(address) }

/// A parsed, validated list of addresses.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AddressList(Vec<String>);

impl AddressList {
    /// Splits `input` on `,` and validates each trimmed entry.
    ///
    /// A blank input is an empty list. An empty entry, as in `"a@b.co,"`,
    /// is invalid.
    ///
    /// # Errors
    ///
    /// Returns every entry that is not an address.
    pub fn parse(input: &str) -> std::result::Result<Self, Vec<String>> {
        if input.trim().is_empty() {
            return Ok(Self::default());
        }

        let entries: Vec<String> = input.split(',').map(|entry| entry.trim().to_string()).collect();
        let invalid: Vec<String> =
            entries.iter().filter(|entry| !is_valid_address(entry)).cloned().collect();

        if invalid.is_empty() {
            Ok(Self(entries))
        } else {
            Err(invalid)
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    #[must_use]
    pub fn as_slice(&self) -> &[String] { &self.0 }

    #[must_use]
    pub fn into_inner(self) -> Vec<String> { self.0 }
}

/// Validated To, Cc and Bcc lists of one email.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Recipients {
    pub to: AddressList,
    pub cc: AddressList,
    pub bcc: AddressList,
}

impl Recipients {
    /// Parses all three lists, collecting the offending entries of each.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddresses`](crate::Error::InvalidAddresses)
    /// listing every malformed entry, or
    /// [`Error::MissingRecipient`](crate::Error::MissingRecipient) when `to`
    /// is blank.
    pub fn parse(to: &str, cc: Option<&str>, bcc: Option<&str>) -> Result<Self> {
        let mut invalid = Vec::new();
        let mut parse = |input: Option<&str>| {
            AddressList::parse(input.unwrap_or_default()).unwrap_or_else(|mut entries| {
                invalid.append(&mut entries);
                AddressList::default()
            })
        };

        let recipients = Self { to: parse(Some(to)), cc: parse(cc), bcc: parse(bcc) };

        ensure!(invalid.is_empty(), error::InvalidAddressesSnafu { addresses: invalid });
        ensure!(!recipients.to.is_empty(), error::MissingRecipientSnafu);
        Ok(recipients)
    }
}
