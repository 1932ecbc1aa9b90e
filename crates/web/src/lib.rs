//! Response envelope used by every Candidate Relay HTTP endpoint.
//!
//! Successful responses serialize as `{"_status": 200, "data": ...}` and
//! failures as `{"_status": 404, "error": {"type": "NOT_FOUND", "message": ...}}`.

pub mod response;

#[doc(hidden)]
pub use tracing as __tracing;

pub use self::response::{
    ApiError, Envelope, EnvelopeError, EnvelopeJson, EnvelopeJsonError, ErrorKind,
};
