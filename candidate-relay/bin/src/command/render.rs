use std::{fs, path::Path};

use candidate_relay_core::{
    content::{self, EmailContent},
    model::{Candidate, RecipientClass, VisibilityMatrix},
};
use serde::de::DeserializeOwned;
use snafu::ResultExt;

use crate::error::{self, Result};

/// Renders the emails of `candidate_path` as a JSON array of
/// `{recipient, subject, html}`.
///
/// Without a visibility file every field is visible to every class.
#[allow(clippy::result_large_err)]
pub fn render(
    candidate_path: &Path,
    visibility_path: Option<&Path>,
    recipient: Option<RecipientClass>,
) -> Result<String> {
    let candidate: Candidate = read_json(candidate_path)?;
    let matrix = match visibility_path {
        Some(path) => read_json(path)?,
        None => VisibilityMatrix::for_candidate(&candidate),
    };

    let emails = render_emails(&candidate, &matrix, recipient)?;

    let mut output = serde_json::to_string_pretty(&emails).context(error::SerializeOutputSnafu)?;
    output.push('\n');
    Ok(output)
}

#[allow(clippy::result_large_err)]
fn render_emails(
    candidate: &Candidate,
    matrix: &VisibilityMatrix,
    recipient: Option<RecipientClass>,
) -> Result<Vec<EmailContent>> {
    recipient
        .map_or_else(|| RecipientClass::ALL.to_vec(), |class| vec![class])
        .into_iter()
        .map(|class| content::generate_email(candidate, class, matrix))
        .collect::<Result<_, _>>()
        .context(error::RenderEmailSnafu)
}

#[allow(clippy::result_large_err)]
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read_to_string(path).context(error::ReadFileSnafu { path })?;
    serde_json::from_str(&data).context(error::ParseJsonSnafu { path })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir()
            .join(format!("candidate-relay-render-{}-{name}", std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn renders_one_class_with_visibility_file() {
        let candidate = write_temp(
            "candidate.json",
            r#"{"name": "Jane Doe", "email": "jane@example.com", "skills": ["Go", "Rust", "SQL"]}"#,
        );
        let visibility = write_temp(
            "visibility.json",
            r#"{"name": {"client": true, "internal": true, "superiors": true}}"#,
        );

        let output = render(&candidate, Some(&visibility), Some(RecipientClass::Internal)).unwrap();
        let emails: Vec<EmailContent> = serde_json::from_str(&output).unwrap();
        assert_eq!(emails.len(), 1);
        assert_eq!(emails[0].subject, "Internal Review: Jane Doe - Go, Rust, SQL");
        assert!(emails[0].html.contains(">Name<"));
        assert!(!emails[0].html.contains(">Skills<"));

        let output = render(&candidate, None, None).unwrap();
        let emails: Vec<EmailContent> = serde_json::from_str(&output).unwrap();
        assert_eq!(emails.len(), 3);
        assert!(emails[2].html.contains(">Skills<"));
    }

    #[test]
    fn missing_candidate_file_is_reported() {
        let err = render(Path::new("/nonexistent/candidate.json"), None, None).unwrap_err();
        assert!(matches!(err, error::Error::ReadFile { .. }));
    }
}
