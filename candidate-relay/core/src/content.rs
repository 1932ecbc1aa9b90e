//! Subject lines and HTML bodies of candidate emails.
//!
//! Everything here is a pure function of its inputs: the same candidate,
//! recipient class and matrix always give byte-identical output.

use std::borrow::Cow;

use askama::Template;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use utoipa::ToSchema;

use crate::{
    error::{self, Result},
    model::{Candidate, FieldKind, RecipientClass, VisibilityMatrix},
};

/// Generated email for one recipient class.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmailContent {
    pub recipient: RecipientClass,
    pub subject: String,
    pub html: String,
}

#[derive(Template)]
#[template(path = "candidate_email.html")]
struct CandidateEmail<'a> {
    name: &'a str,
    rows: Vec<Row<'a>>,
}

struct Row<'a> {
    label: Cow<'a, str>,
    value: Cow<'a, str>,
}

/// Generates subject and body of the email for `class`.
///
/// # Errors
///
/// Returns an error if the body template fails to render.
pub fn generate_email(
    candidate: &Candidate,
    class: RecipientClass,
    matrix: &VisibilityMatrix,
) -> Result<EmailContent> {
    Ok(EmailContent {
        recipient: class,
        subject: subject_line(candidate, class),
        html: generate_body(candidate, class, matrix)?,
    })
}

/// Subject line for `class`.
///
/// The subject is not filtered by the visibility matrix: an internal subject
/// lists the first three skills even when skills are hidden from internal.
#[must_use]
pub fn subject_line(candidate: &Candidate, class: RecipientClass) -> String {
    let name = &candidate.name;
    match class {
        RecipientClass::Client => format!(
            "Candidate Profile: {name} - {}",
            candidate.current_company.as_deref().unwrap_or_default()
        ),
        RecipientClass::Internal => format!(
            "Internal Review: {name} - {}",
            candidate.skills.iter().take(3).map(String::as_str).collect::<Vec<_>>().join(", ")
        ),
        RecipientClass::Superiors => format!(
            "Candidate Assessment: {name} - {}",
            candidate.location.as_deref().unwrap_or_default()
        ),
    }
}

/// Subject line for a free-form recipient label, falling back to a generic
/// subject when the label names no known class.
#[must_use]
pub fn subject_line_for_label(candidate: &Candidate, label: &str) -> String {
    label.parse::<RecipientClass>().map_or_else(
        |_| format!("Candidate Information: {}", candidate.name),
        |class| subject_line(candidate, class),
    )
}

/// HTML body listing every field visible to `class`.
///
/// Rows follow matrix order. Custom fields are spread into one row per key
/// after every other row. All user text is HTML-escaped by the template.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn generate_body(
    candidate: &Candidate,
    class: RecipientClass,
    matrix: &VisibilityMatrix,
) -> Result<String> {
    let mut rows = Vec::new();
    let mut custom_rows = Vec::new();

    for field in matrix.visible_fields(class) {
        match field.kind() {
            FieldKind::Text | FieldKind::List => rows.push(Row {
                label: Cow::Owned(field.label()),
                value: Cow::Owned(candidate.field_value(field).display()),
            }),
            FieldKind::Map => {
                custom_rows.extend(candidate.custom_fields.iter().map(|(key, value)| Row {
                    label: Cow::Borrowed(key.as_str()),
                    value: Cow::Borrowed(value.as_str()),
                }));
            }
        }
    }
    rows.append(&mut custom_rows);

    CandidateEmail { name: &candidate.name, rows }.render().context(error::RenderEmailSnafu)
}

/// Inserts a space before each inner uppercase letter and capitalizes the
/// first character: `expectedSalary` becomes `Expected Salary`.
#[must_use]
pub fn humanize(key: &str) -> String {
    let mut label = String::with_capacity(key.len() + 4);
    for (index, ch) in key.chars().enumerate() {
        if index == 0 {
            label.extend(ch.to_uppercase());
        } else {
            if ch.is_uppercase() {
                label.push(' ');
            }
            label.push(ch);
        }
    }
    label
}
