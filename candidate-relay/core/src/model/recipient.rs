use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{error, Error};

/// Audience of a generated email.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RecipientClass {
    /// The hiring client.
    Client,
    /// The recruiter's own team.
    Internal,
    /// Management.
    Superiors,
}

impl RecipientClass {
    pub const ALL: [Self; 3] = [Self::Client, Self::Internal, Self::Superiors];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Internal => "internal",
            Self::Superiors => "superiors",
        }
    }
}

impl fmt::Display for RecipientClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for RecipientClass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "client" => Ok(Self::Client),
            "internal" => Ok(Self::Internal),
            "superiors" => Ok(Self::Superiors),
            _ => error::InvalidRecipientClassSnafu { value: s }.fail(),
        }
    }
}
