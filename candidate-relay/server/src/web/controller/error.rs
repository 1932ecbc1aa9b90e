use axum::response::{IntoResponse, Response};
use snafu::Snafu;

use crate::service::error::Error as ServiceError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("{source}"))]
    Service { source: ServiceError },

    #[snafu(display("{source}"))]
    Model { source: candidate_relay_core::Error },
}

impl From<ServiceError> for Error {
    fn from(source: ServiceError) -> Self { Self::Service { source } }
}

impl From<candidate_relay_core::Error> for Error {
    fn from(source: candidate_relay_core::Error) -> Self { Self::Model { source } }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::Service { source } => source.into_response(),
            Self::Model { source } => source.into_response(),
        }
    }
}
