use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use relay_axum::{envelope_response, ApiError, ErrorKind};
use snafu::Snafu;

use crate::model::CandidateField;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display(
        "Invalid recipient class `{value}`, expected `client`, `internal` or `superiors`"
    ))]
    InvalidRecipientClass { value: String },

    #[snafu(display("Unknown candidate field `{field}`"))]
    UnknownField { field: String },

    #[snafu(display("Field `{field}` is not part of the visibility matrix"))]
    FieldNotInMatrix { field: CandidateField },

    #[snafu(display("Field `{field}` is required"))]
    MissingRequiredField { field: CandidateField },

    #[snafu(display("Invalid email format: {email}"))]
    InvalidEmail { email: String },

    #[snafu(display("Invalid email format: {}", addresses.join(", ")))]
    InvalidAddresses { addresses: Vec<String> },

    #[snafu(display("At least one recipient address is required"))]
    MissingRecipient,

    #[snafu(display("Fail to render candidate email, error: {source}"))]
    RenderEmail { source: askama::Error },
}

impl IntoResponse for Error {
    // SAFETY: allow: high cognitive complexity caused by `tracing` macro
    #[allow(clippy::cognitive_complexity)]
    fn into_response(self) -> Response {
        let (status, kind) = match self {
            Self::InvalidRecipientClass { .. } | Self::UnknownField { .. } => {
                (StatusCode::BAD_REQUEST, ErrorKind::BadRequest)
            }
            Self::FieldNotInMatrix { .. }
            | Self::MissingRequiredField { .. }
            | Self::InvalidEmail { .. }
            | Self::InvalidAddresses { .. }
            | Self::MissingRecipient => (StatusCode::BAD_REQUEST, ErrorKind::Validation),
            Self::RenderEmail { .. } => (StatusCode::INTERNAL_SERVER_ERROR, ErrorKind::Internal),
        };
        let mut error = ApiError::new(kind, self.to_string());
        if let Self::InvalidAddresses { addresses } = &self {
            error = error.with_field("invalidAddresses", serde_json::json!(addresses));
        }

        envelope_response! {
            reason: self,
            status: status,
            error: error
        }
    }
}
