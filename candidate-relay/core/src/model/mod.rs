mod candidate;
mod field;
mod recipient;
mod visibility;

pub use self::{
    candidate::{Candidate, CandidateUpdate, FieldValue, NewCandidate},
    field::{CandidateField, FieldKind},
    recipient::RecipientClass,
    visibility::{VisibilityMatrix, VisibilityToggle},
};
