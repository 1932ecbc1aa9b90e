use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Successful response body.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Envelope<T, M = ()> {
    #[serde(rename = "_status", with = "http_serde::status_code")]
    status_code: StatusCode,

    #[serde(rename = "_metadata", default, skip_serializing_if = "Option::is_none")]
    metadata: Option<M>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

impl<T, M> Envelope<T, M> {
    #[inline]
    #[must_use]
    pub const fn status(&self) -> StatusCode { self.status_code }

    #[inline]
    #[must_use]
    pub const fn data(&self) -> Option<&T> { self.data.as_ref() }

    #[inline]
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn into_data(self) -> Option<T> { self.data }

    #[inline]
    #[must_use]
    pub const fn metadata(&self) -> Option<&M> { self.metadata.as_ref() }
}

/// Failed response body.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EnvelopeError<M = ()> {
    #[serde(rename = "_status", with = "http_serde::status_code")]
    status_code: StatusCode,

    #[serde(rename = "_metadata", default, skip_serializing_if = "Option::is_none")]
    metadata: Option<M>,

    #[serde(default)]
    error: Option<ApiError>,
}

impl<M> EnvelopeError<M> {
    #[inline]
    #[must_use]
    pub const fn status(&self) -> StatusCode { self.status_code }

    #[inline]
    #[must_use]
    pub const fn error(&self) -> Option<&ApiError> { self.error.as_ref() }
}

/// Axum responder for [`Envelope`].
#[derive(Debug)]
pub struct EnvelopeJson<T, M = ()>(pub Envelope<T, M>);

impl<T, M> EnvelopeJson<T, M> {
    #[inline]
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self(Envelope { status_code: StatusCode::OK, metadata: None, data: Some(data) })
    }

    #[inline]
    #[must_use]
    pub const fn created(data: T) -> Self {
        Self(Envelope { status_code: StatusCode::CREATED, metadata: None, data: Some(data) })
    }

    #[inline]
    #[must_use]
    pub const fn status_code(mut self, status_code: StatusCode) -> Self {
        self.0.status_code = status_code;
        self
    }

    #[inline]
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn metadata(mut self, metadata: M) -> Self {
        self.0.metadata = Some(metadata);
        self
    }
}

impl<T, M> EnvelopeJson<T, M>
where
    T: Serialize,
    M: Serialize,
{
    /// Same as [`IntoResponse::into_response`], usable without importing the trait.
    #[inline]
    #[must_use]
    pub fn respond(self) -> Response { self.into_response() }
}

/// Axum responder for [`EnvelopeError`].
#[derive(Debug)]
pub struct EnvelopeJsonError<M = ()>(pub EnvelopeError<M>);

impl<M> EnvelopeJsonError<M> {
    #[inline]
    #[must_use]
    pub const fn err(error: ApiError) -> Self {
        Self(EnvelopeError {
            status_code: StatusCode::INTERNAL_SERVER_ERROR,
            metadata: None,
            error: Some(error),
        })
    }

    #[inline]
    #[must_use]
    pub const fn status_code(mut self, status_code: StatusCode) -> Self {
        self.0.status_code = status_code;
        self
    }
}

impl<M> EnvelopeJsonError<M>
where
    M: Serialize,
{
    /// Same as [`IntoResponse::into_response`], usable without importing the trait.
    #[inline]
    #[must_use]
    pub fn respond(self) -> Response { self.into_response() }
}

impl<T, M> IntoResponse for EnvelopeJson<T, M>
where
    T: Serialize,
    M: Serialize,
{
    fn into_response(self) -> Response { json_body(self.0.status_code, &self.0) }
}

impl<M> IntoResponse for EnvelopeJsonError<M>
where
    M: Serialize,
{
    fn into_response(self) -> Response { json_body(self.0.status_code, &self.0) }
}

fn json_body<B: Serialize>(status_code: StatusCode, body: &B) -> Response {
    let body = Body::from(serde_json::to_vec(body).expect("envelope is serializable"));

    Response::builder()
        .status(status_code)
        .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
        .body(body)
        .expect("Build `Axum` response successfully; qed")
}

/// Error payload carried by [`EnvelopeError`].
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ApiError {
    #[serde(rename = "type")]
    pub kind: ErrorKind,

    pub message: String,

    #[serde(flatten, skip_serializing_if = "IndexMap::is_empty")]
    pub additional_fields: IndexMap<String, serde_json::Value>,
}

impl ApiError {
    #[inline]
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into(), additional_fields: IndexMap::new() }
    }

    #[inline]
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        drop(self.additional_fields.insert(key.into(), value));
        self
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    Internal,
    Validation,
    NotFound,
    Unauthorized,
    Forbidden,
    BadRequest,
    Conflict,
    BadGateway,
}

/// Build an enveloped response.
///
/// The `reason:` form logs the reason first: `error!` for 5xx, `warn!` otherwise.
#[macro_export]
macro_rules! envelope_response {
    (status: $status:expr, data: $data:expr) => {
        $crate::response::EnvelopeJson::<_>::ok($data).status_code($status).respond()
    };

    (status: $status:expr, error: $error:expr) => {
        $crate::response::EnvelopeJsonError::<()>::err($error).status_code($status).respond()
    };

    (reason: $reason:expr, status: $status:expr, error: $error:expr) => {{
        let status = $status;
        if status.is_server_error() {
            $crate::__tracing::error!(
                status_code = status.as_u16(),
                "Internal Server Error: {:?}",
                $reason
            );
        } else {
            $crate::__tracing::warn!(status_code = status.as_u16(), "Response Error: {:?}", $reason);
        }

        $crate::envelope_response! { status: status, error: $error }
    }};
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::{json, Value};

    use super::*;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn data_envelope_carries_status_and_data() {
        let response = EnvelopeJson::<_>::created(json!({ "id": "c-1" })).respond();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_json(response).await;
        assert_eq!(body, json!({ "_status": 201, "data": { "id": "c-1" } }));
    }

    #[tokio::test]
    async fn error_envelope_flattens_additional_fields() {
        let error = ApiError::new(ErrorKind::Validation, "Invalid email address")
            .with_field("invalidAddresses", json!(["not-an-email"]));
        let response = envelope_response! { status: StatusCode::BAD_REQUEST, error: error };
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(
            body,
            json!({
                "_status": 400,
                "error": {
                    "type": "VALIDATION",
                    "message": "Invalid email address",
                    "invalidAddresses": ["not-an-email"],
                }
            })
        );
    }

    #[test]
    fn envelopes_deserialize_for_clients() {
        let envelope: Envelope<Vec<u8>> =
            serde_json::from_value(json!({ "_status": 200, "data": [1, 2] })).unwrap();
        assert_eq!(envelope.status(), StatusCode::OK);
        assert_eq!(envelope.into_data(), Some(vec![1, 2]));

        let envelope: EnvelopeError = serde_json::from_value(
            json!({ "_status": 404, "error": { "type": "NOT_FOUND", "message": "gone" } }),
        )
        .unwrap();
        assert_eq!(envelope.error().map(|error| error.kind), Some(ErrorKind::NotFound));
    }
}
