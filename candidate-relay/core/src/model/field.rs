use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{content::humanize, error, Error};

/// A candidate attribute that can be shared with a recipient.
///
/// The declaration order is the order fields appear in a freshly built
/// visibility matrix and, therefore, in generated emails.
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, ToSchema,
)]
#[serde(rename_all = "camelCase")]
pub enum CandidateField {
    Name,
    PhoneNumber,
    Email,
    ResumeLink,
    CurrentCompany,
    Experience,
    Skills,
    ExpectedSalary,
    Location,
    Notes,
    CustomFields,
}

/// Shape of the value stored under a [`CandidateField`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldKind {
    Text,
    List,
    Map,
}

impl CandidateField {
    pub const ALL: [Self; 11] = [
        Self::Name,
        Self::PhoneNumber,
        Self::Email,
        Self::ResumeLink,
        Self::CurrentCompany,
        Self::Experience,
        Self::Skills,
        Self::ExpectedSalary,
        Self::Location,
        Self::Notes,
        Self::CustomFields,
    ];

    /// Key used in JSON documents.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::PhoneNumber => "phoneNumber",
            Self::Email => "email",
            Self::ResumeLink => "resumeLink",
            Self::CurrentCompany => "currentCompany",
            Self::Experience => "experience",
            Self::Skills => "skills",
            Self::ExpectedSalary => "expectedSalary",
            Self::Location => "location",
            Self::Notes => "notes",
            Self::CustomFields => "customFields",
        }
    }

    #[must_use]
    pub const fn kind(self) -> FieldKind {
        match self {
            Self::Skills => FieldKind::List,
            Self::CustomFields => FieldKind::Map,
            _ => FieldKind::Text,
        }
    }

    /// Human readable label, `phoneNumber` becomes `Phone Number`.
    #[must_use]
    pub fn label(self) -> String { humanize(self.key()) }
}

impl fmt::Display for CandidateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.key()) }
}

impl FromStr for CandidateField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.key() == key)
            .ok_or_else(|| error::UnknownFieldSnafu { field: key }.build())
    }
}
