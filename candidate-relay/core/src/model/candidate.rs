use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use snafu::ensure;
use utoipa::ToSchema;

use crate::{address, error, model::CandidateField, Result};

/// A captured candidate.
///
/// Optional text fields serialize as `null` rather than being omitted, so
/// every field except `customFields` is always a key of the stored record.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub phone_number: Option<String>,

    pub email: String,

    #[serde(default)]
    pub resume_link: Option<String>,

    #[serde(default)]
    pub current_company: Option<String>,

    #[serde(default)]
    pub experience: Option<String>,

    #[serde(default)]
    pub skills: Vec<String>,

    #[serde(default)]
    pub expected_salary: Option<String>,

    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    #[schema(value_type = Object)]
    pub custom_fields: IndexMap<String, String>,

    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

/// Borrowed value of one [`CandidateField`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldValue<'a> {
    Text(Option<&'a str>),
    List(&'a [String]),
    Map(&'a IndexMap<String, String>),
}

impl FieldValue<'_> {
    /// Text shown in an email table cell; lists are joined with `", "`.
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Text(text) => text.unwrap_or_default().to_string(),
            Self::List(items) => items.join(", "),
            Self::Map(map) => {
                map.iter().map(|(key, value)| format!("{key}: {value}")).collect::<Vec<_>>().join(", ")
            }
        }
    }
}

impl Candidate {
    #[must_use]
    pub fn field_value(&self, field: CandidateField) -> FieldValue<'_> {
        match field {
            CandidateField::Name => FieldValue::Text(Some(self.name.as_str())),
            CandidateField::PhoneNumber => FieldValue::Text(self.phone_number.as_deref()),
            CandidateField::Email => FieldValue::Text(Some(self.email.as_str())),
            CandidateField::ResumeLink => FieldValue::Text(self.resume_link.as_deref()),
            CandidateField::CurrentCompany => FieldValue::Text(self.current_company.as_deref()),
            CandidateField::Experience => FieldValue::Text(self.experience.as_deref()),
            CandidateField::Skills => FieldValue::List(&self.skills),
            CandidateField::ExpectedSalary => FieldValue::Text(self.expected_salary.as_deref()),
            CandidateField::Location => FieldValue::Text(self.location.as_deref()),
            CandidateField::Notes => FieldValue::Text(self.notes.as_deref()),
            CandidateField::CustomFields => FieldValue::Map(&self.custom_fields),
        }
    }

    /// Fields this candidate carries, in schema order.
    ///
    /// `customFields` is included only when at least one custom field exists.
    pub fn shareable_fields(&self) -> impl Iterator<Item = CandidateField> + '_ {
        CandidateField::ALL.into_iter().filter(|field| {
            *field != CandidateField::CustomFields || !self.custom_fields.is_empty()
        })
    }

    /// Case-insensitive substring match over name, email, company, location
    /// and skills. A blank term matches every candidate.
    #[must_use]
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        let contains = |value: &str| value.to_lowercase().contains(&term);

        contains(&self.name)
            || contains(&self.email)
            || self.current_company.as_deref().is_some_and(contains)
            || self.location.as_deref().is_some_and(contains)
            || self.skills.iter().any(|skill| contains(skill))
    }
}

/// Input accepted when a candidate is captured.
#[derive(Clone, Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewCandidate {
    pub name: String,

    pub email: String,

    #[serde(default)]
    pub phone_number: Option<String>,

    #[serde(default)]
    pub resume_link: Option<String>,

    #[serde(default)]
    pub current_company: Option<String>,

    #[serde(default)]
    pub experience: Option<String>,

    #[serde(default)]
    pub skills: Vec<String>,

    #[serde(default)]
    pub expected_salary: Option<String>,

    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default)]
    #[schema(value_type = Object)]
    pub custom_fields: IndexMap<String, String>,
}

impl NewCandidate {
    /// Validates and normalizes the input into a [`Candidate`].
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is blank or `email` is missing or malformed.
    pub fn into_candidate(self, id: String, created_at: DateTime<Utc>) -> Result<Candidate> {
        let Self {
            name,
            email,
            phone_number,
            resume_link,
            current_company,
            experience,
            skills,
            expected_salary,
            location,
            notes,
            custom_fields,
        } = self;

        Ok(Candidate {
            id,
            name: validate_name(&name)?,
            email: validate_email(&email)?,
            phone_number: normalize_text(phone_number),
            resume_link: normalize_text(resume_link),
            current_company: normalize_text(current_company),
            experience: normalize_text(experience),
            skills: normalize_skills(skills),
            expected_salary: normalize_text(expected_salary),
            location: normalize_text(location),
            notes: normalize_text(notes),
            custom_fields: normalize_custom_fields(custom_fields),
            created_at,
        })
    }
}

/// Partial edit of a candidate. Absent members are left unchanged; an empty
/// string clears an optional text field.
#[derive(Clone, Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CandidateUpdate {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub phone_number: Option<String>,

    #[serde(default)]
    pub resume_link: Option<String>,

    #[serde(default)]
    pub current_company: Option<String>,

    #[serde(default)]
    pub experience: Option<String>,

    #[serde(default)]
    pub skills: Option<Vec<String>>,

    #[serde(default)]
    pub expected_salary: Option<String>,

    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub custom_fields: Option<IndexMap<String, String>>,
}

impl CandidateUpdate {
    /// Applies the edit. `candidate` is left untouched when validation fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the new `name` is blank or the new `email` is
    /// missing or malformed.
    pub fn apply(self, candidate: &mut Candidate) -> Result<()> {
        let mut edited = candidate.clone();

        if let Some(name) = self.name {
            edited.name = validate_name(&name)?;
        }
        if let Some(email) = self.email {
            edited.email = validate_email(&email)?;
        }

        for (target, value) in [
            (&mut edited.phone_number, self.phone_number),
            (&mut edited.resume_link, self.resume_link),
            (&mut edited.current_company, self.current_company),
            (&mut edited.experience, self.experience),
            (&mut edited.expected_salary, self.expected_salary),
            (&mut edited.location, self.location),
            (&mut edited.notes, self.notes),
        ] {
            if value.is_some() {
                *target = normalize_text(value);
            }
        }

        if let Some(skills) = self.skills {
            edited.skills = normalize_skills(skills);
        }
        if let Some(custom_fields) = self.custom_fields {
            edited.custom_fields = normalize_custom_fields(custom_fields);
        }

        *candidate = edited;
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    ensure!(!name.is_empty(), error::MissingRequiredFieldSnafu { field: CandidateField::Name });
    Ok(name.to_string())
}

fn validate_email(email: &str) -> Result<String> {
    let email = email.trim();
    ensure!(!email.is_empty(), error::MissingRequiredFieldSnafu { field: CandidateField::Email });
    ensure!(address::is_valid_address(email), error::InvalidEmailSnafu { email });
    Ok(email.to_string())
}

fn normalize_text(value: Option<String>) -> Option<String> {
    value.map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

fn normalize_skills(skills: Vec<String>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(skills.len());
    for skill in skills {
        let skill = skill.trim();
        if !skill.is_empty() && !normalized.iter().any(|existing| existing == skill) {
            normalized.push(skill.to_string());
        }
    }
    normalized
}

fn normalize_custom_fields(custom_fields: IndexMap<String, String>) -> IndexMap<String, String> {
    custom_fields
        .into_iter()
        .filter_map(|(key, value)| {
            let key = key.trim();
            (!key.is_empty()).then(|| (key.to_string(), value))
        })
        .collect()
}
