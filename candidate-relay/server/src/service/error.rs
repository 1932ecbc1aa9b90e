use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use relay_axum::{envelope_response, ApiError, ErrorKind};
use snafu::Snafu;

use crate::store;

pub type Result<T> = std::result::Result<T, Error>;

const ACCESS_DENIED_HINT: &str = "Access denied by the mail provider. Make sure the service \
                                  account has domain-wide delegation for the gmail.send scope \
                                  and that the sender is a user of the Google Workspace domain.";

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("{source}"))]
    Store { source: store::Error },

    #[snafu(display("{source}"))]
    Model { source: candidate_relay_core::Error },

    #[snafu(display("Data not found: candidate `{id}`"))]
    CandidateNotFound { id: String },

    #[snafu(display("Data not found: visibility settings of candidate `{id}`"))]
    VisibilityNotFound { id: String },

    #[snafu(display("Fail to encode {collection} record, error: {source}"))]
    EncodeRecord { collection: &'static str, source: serde_json::Error },

    #[snafu(display("Fail to decode {collection} record, error: {source}"))]
    DecodeRecord { collection: &'static str, source: serde_json::Error },

    #[snafu(display("Mail provider rejected the address list, error: {source}"))]
    RejectAddress { source: notification::Error },

    #[snafu(display("{source}"))]
    AccessDenied { source: notification::Error },

    #[snafu(display("Fail to send email, error: {source}"))]
    SendEmail { source: notification::Error },
}

impl From<store::Error> for Error {
    fn from(source: store::Error) -> Self { Self::Store { source } }
}

impl From<candidate_relay_core::Error> for Error {
    fn from(source: candidate_relay_core::Error) -> Self { Self::Model { source } }
}

impl From<notification::Error> for Error {
    fn from(source: notification::Error) -> Self {
        match source {
            notification::Error::InvalidAddress { .. } | notification::Error::NoRecipient => {
                Self::RejectAddress { source }
            }
            _ if source.is_access_denied() => Self::AccessDenied { source },
            _ => Self::SendEmail { source },
        }
    }
}

impl IntoResponse for Error {
    // SAFETY: allow: high cognitive complexity caused by `tracing` macro
    #[allow(clippy::cognitive_complexity)]
    fn into_response(self) -> Response {
        match self {
            Self::Model { source } => source.into_response(),
            Self::CandidateNotFound { .. } | Self::VisibilityNotFound { .. } => envelope_response! {
                reason: self,
                status: StatusCode::NOT_FOUND,
                error: ApiError::new(ErrorKind::NotFound, self.to_string())
            },
            Self::RejectAddress { .. } => envelope_response! {
                reason: self,
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new(ErrorKind::Validation, self.to_string())
            },
            Self::AccessDenied { .. } => envelope_response! {
                reason: self,
                status: StatusCode::FORBIDDEN,
                error: ApiError::new(ErrorKind::Forbidden, ACCESS_DENIED_HINT)
                    .with_field("detail", serde_json::Value::String(self.to_string()))
            },
            Self::SendEmail { .. } => envelope_response! {
                reason: self,
                status: StatusCode::BAD_GATEWAY,
                error: ApiError::new(ErrorKind::BadGateway, self.to_string())
            },
            Self::Store { .. } | Self::EncodeRecord { .. } | Self::DecodeRecord { .. } => {
                envelope_response! {
                    reason: self,
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    error: ApiError::new(ErrorKind::Internal, self.to_string())
                }
            }
        }
    }
}
