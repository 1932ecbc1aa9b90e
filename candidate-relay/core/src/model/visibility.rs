use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use snafu::OptionExt;
use utoipa::ToSchema;

use crate::{
    error,
    model::{Candidate, CandidateField, RecipientClass},
    Result,
};

/// Whether one field is shown to each recipient class.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize, ToSchema)]
pub struct VisibilityToggle {
    pub client: bool,
    pub internal: bool,
    pub superiors: bool,
}

impl Default for VisibilityToggle {
    fn default() -> Self { Self::all(true) }
}

impl VisibilityToggle {
    #[must_use]
    pub const fn all(visible: bool) -> Self {
        Self { client: visible, internal: visible, superiors: visible }
    }

    #[must_use]
    pub const fn get(&self, class: RecipientClass) -> bool {
        match class {
            RecipientClass::Client => self.client,
            RecipientClass::Internal => self.internal,
            RecipientClass::Superiors => self.superiors,
        }
    }

    pub fn set(&mut self, class: RecipientClass, visible: bool) {
        match class {
            RecipientClass::Client => self.client = visible,
            RecipientClass::Internal => self.internal = visible,
            RecipientClass::Superiors => self.superiors = visible,
        }
    }

    /// Flips the flag of `class` and returns its new value.
    pub fn flip(&mut self, class: RecipientClass) -> bool {
        let visible = !self.get(class);
        self.set(class, visible);
        visible
    }
}

/// Per-candidate mapping from field to [`VisibilityToggle`].
///
/// A field without an entry is visible to nobody.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct VisibilityMatrix(IndexMap<CandidateField, VisibilityToggle>);

impl VisibilityMatrix {
    /// Builds the default matrix for `candidate`: one all-visible entry per
    /// field the candidate carries.
    #[must_use]
    pub fn for_candidate(candidate: &Candidate) -> Self {
        Self(
            candidate
                .shareable_fields()
                .map(|field| (field, VisibilityToggle::default()))
                .collect(),
        )
    }

    #[must_use]
    pub fn get(&self, field: CandidateField) -> Option<&VisibilityToggle> { self.0.get(&field) }

    #[must_use]
    pub fn is_visible(&self, field: CandidateField, class: RecipientClass) -> bool {
        self.0.get(&field).is_some_and(|toggle| toggle.get(class))
    }

    /// Flips `field` for `class` and returns the new flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the matrix has no entry for `field`.
    pub fn toggle(&mut self, field: CandidateField, class: RecipientClass) -> Result<bool> {
        let toggle = self.0.get_mut(&field).context(error::FieldNotInMatrixSnafu { field })?;
        Ok(toggle.flip(class))
    }

    /// Sets the flag of `class` on every existing entry.
    pub fn set_all(&mut self, class: RecipientClass, visible: bool) {
        for toggle in self.0.values_mut() {
            toggle.set(class, visible);
        }
    }

    /// Adds an all-visible entry for each field `candidate` carries that the
    /// matrix lacks. Existing entries are kept as they are.
    ///
    /// Returns `true` if any entry was added.
    pub fn reconcile(&mut self, candidate: &Candidate) -> bool {
        let mut changed = false;
        for field in candidate.shareable_fields() {
            if !self.0.contains_key(&field) {
                let _ = self.0.insert(field, VisibilityToggle::default());
                changed = true;
            }
        }
        changed
    }

    /// Fields visible to `class`, in matrix order.
    pub fn visible_fields(
        &self,
        class: RecipientClass,
    ) -> impl Iterator<Item = CandidateField> + '_ {
        self.0.iter().filter(move |(_, toggle)| toggle.get(class)).map(|(field, _)| *field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CandidateField, &VisibilityToggle)> + '_ {
        self.0.iter().map(|(field, toggle)| (*field, toggle))
    }

    #[must_use]
    pub fn len(&self) -> usize { self.0.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl FromIterator<(CandidateField, VisibilityToggle)> for VisibilityMatrix {
    fn from_iter<I: IntoIterator<Item = (CandidateField, VisibilityToggle)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::{model::NewCandidate, Error};

    fn candidate(custom_fields: &[(&str, &str)]) -> Candidate {
        NewCandidate {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            custom_fields: custom_fields
                .iter()
                .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
                .collect(),
            ..NewCandidate::default()
        }
        .into_candidate("c-1".to_string(), Utc::now())
        .unwrap()
    }

    #[test]
    fn built_matrix_covers_record_keys_with_everything_visible() {
        let jane = candidate(&[]);
        let matrix = VisibilityMatrix::for_candidate(&jane);

        let record = serde_json::to_value(&jane).unwrap();
        let mut keys: Vec<_> = record
            .as_object()
            .unwrap()
            .keys()
            .filter(|key| !matches!(key.as_str(), "id" | "createdAt"))
            .cloned()
            .collect();
        let mut matrix_keys: Vec<_> =
            matrix.iter().map(|(field, _)| field.key().to_string()).collect();
        keys.sort();
        matrix_keys.sort();
        assert_eq!(keys, matrix_keys);

        assert!(matrix.iter().all(|(_, toggle)| *toggle == VisibilityToggle::all(true)));
        assert!(matrix.get(CandidateField::CustomFields).is_none());

        let matrix = VisibilityMatrix::for_candidate(&candidate(&[("Visa Status", "H1B")]));
        assert_eq!(matrix.len(), 11);
    }

    #[test]
    fn toggle_flips_only_one_flag_and_is_an_involution() {
        let mut matrix = VisibilityMatrix::for_candidate(&candidate(&[]));
        let original = matrix.clone();

        assert!(!matrix.toggle(CandidateField::Location, RecipientClass::Client).unwrap());
        let toggle = matrix.get(CandidateField::Location).unwrap();
        assert!(!toggle.client);
        assert!(toggle.internal);
        assert!(toggle.superiors);
        for (field, toggle) in matrix.iter() {
            if field != CandidateField::Location {
                assert_eq!(toggle, original.get(field).unwrap());
            }
        }

        assert!(matrix.toggle(CandidateField::Location, RecipientClass::Client).unwrap());
        assert_eq!(matrix, original);
    }

    #[test]
    fn toggle_of_absent_field_fails() {
        let mut matrix = VisibilityMatrix::for_candidate(&candidate(&[]));
        let err = matrix.toggle(CandidateField::CustomFields, RecipientClass::Internal).unwrap_err();
        assert!(matches!(err, Error::FieldNotInMatrix { field: CandidateField::CustomFields }));
    }

    #[test]
    fn set_all_touches_one_class() {
        let mut matrix = VisibilityMatrix::for_candidate(&candidate(&[("Visa Status", "H1B")]));
        let _ = matrix.toggle(CandidateField::Notes, RecipientClass::Client).unwrap();
        let original = matrix.clone();

        matrix.set_all(RecipientClass::Internal, false);
        assert_eq!(matrix.visible_fields(RecipientClass::Internal).count(), 0);
        assert_eq!(matrix.len(), original.len());
        for (field, toggle) in matrix.iter() {
            let before = original.get(field).unwrap();
            assert_eq!(toggle.client, before.client);
            assert_eq!(toggle.superiors, before.superiors);
        }

        matrix.set_all(RecipientClass::Internal, true);
        assert_eq!(matrix, original);
    }

    #[test]
    fn absent_entry_is_not_visible() {
        let matrix = VisibilityMatrix::default();
        assert!(!matrix.is_visible(CandidateField::Name, RecipientClass::Client));
    }

    #[test]
    fn reconcile_adds_missing_entries_only() {
        let mut jane = candidate(&[]);
        let mut matrix = VisibilityMatrix::for_candidate(&jane);
        let _ = matrix.toggle(CandidateField::Skills, RecipientClass::Superiors).unwrap();
        assert!(!matrix.reconcile(&jane));

        let _ = jane.custom_fields.insert("Visa Status".to_string(), "H1B".to_string());
        assert!(matrix.reconcile(&jane));
        assert_eq!(
            matrix.get(CandidateField::CustomFields),
            Some(&VisibilityToggle::all(true))
        );
        assert!(!matrix.is_visible(CandidateField::Skills, RecipientClass::Superiors));
    }

    #[test]
    fn matrix_serializes_as_field_keyed_object() {
        let mut matrix = VisibilityMatrix::for_candidate(&candidate(&[]));
        matrix.set_all(RecipientClass::Client, false);
        let value = serde_json::to_value(&matrix).unwrap();

        assert_eq!(
            value["phoneNumber"],
            serde_json::json!({ "client": false, "internal": true, "superiors": true })
        );
        let decoded: VisibilityMatrix = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, matrix);
    }
}
