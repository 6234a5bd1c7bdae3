//! JSON response writer.
//!
//! Every API response body is an [`Envelope`] encoded by
//! [`Envelope::to_pretty_bytes`]. [`encode_json`] does all the fallible work
//! up front, so by the time a [`JsonResponse`] exists its status, headers and
//! body are final and nothing can fail while it is written out.

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use greenlight_core::envelope::{EncodeError, Envelope};

/// A fully encoded JSON response.
#[derive(Debug)]
pub struct JsonResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl JsonResponse {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

/// Encode `envelope` and assemble a response.
///
/// Caller `headers` are kept as given (all values of every name), then
/// `Content-Type: application/json` is set, replacing any caller value.
/// `None` and an empty map behave the same.
pub fn encode_json(
    status: StatusCode,
    envelope: &Envelope,
    headers: Option<HeaderMap>,
) -> Result<JsonResponse, EncodeError> {
    let body = envelope.to_pretty_bytes()?;

    let mut merged = headers.unwrap_or_default();
    merged.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Ok(JsonResponse {
        status,
        headers: merged,
        body,
    })
}

/// Shorthand for a `200 OK` response without extra headers.
pub fn ok_json(envelope: &Envelope) -> Result<JsonResponse, EncodeError> {
    encode_json(StatusCode::OK, envelope, None)
}

impl IntoResponse for JsonResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.headers_mut() = self.headers;
        *response.status_mut() = self.status;
        response
    }
}
