//! Request extractors.

use axum::body::{Body, Bytes};
use axum::extract::{FromRequest, Request};
use greenlight_core::decode::{decode_slice, DecodeError, MAX_BODY_BYTES};
use http_body_util::LengthLimitError;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Strictly decoded JSON request body.
///
/// Unlike `axum::Json`, this rejects unknown keys and trailing content, caps
/// the body at [`MAX_BODY_BYTES`], and reports failures as a classified
/// [`DecodeError`] (rendered as 400). The `Content-Type` header is not
/// checked.
///
/// `T` must be a struct deriving `Deserialize`; anything else panics on the
/// first request.
#[derive(Debug)]
pub struct StrictJson<T>(pub T);

impl<T, S> FromRequest<S> for StrictJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let bytes = read_body(req.into_body(), MAX_BODY_BYTES).await?;
        let value = decode_slice(&bytes)?;
        Ok(StrictJson(value))
    }
}

/// Buffer at most `limit` bytes of `body`.
async fn read_body(body: Body, limit: usize) -> Result<Bytes, DecodeError> {
    axum::body::to_bytes(body, limit).await.map_err(|err| {
        if exceeded_limit(&err) {
            DecodeError::TooLarge { limit }
        } else {
            DecodeError::Unclassified {
                cause: err.to_string(),
            }
        }
    })
}

fn exceeded_limit(err: &axum::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(err) = source {
        if err.is::<LengthLimitError>() {
            return true;
        }
        source = err.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use greenlight_core::movie::MovieInput;

    use super::*;

    async fn extract(body: impl Into<Body>) -> Result<MovieInput, AppError> {
        let req = axum::http::Request::builder()
            .method("POST")
            .uri("/v1/movies")
            .body(body.into())
            .unwrap();
        StrictJson::<MovieInput>::from_request(req, &())
            .await
            .map(|StrictJson(input)| input)
    }

    #[tokio::test]
    async fn extracts_valid_body() {
        let input = extract(r#"{"title":"Casablanca","year":1942,"runtime":102,"genres":["drama"]}"#)
            .await
            .unwrap();
        assert_eq!(input.title, "Casablanca");
        assert_eq!(input.runtime, 102);
    }

    #[tokio::test]
    async fn oversized_body_is_too_large() {
        let body = format!(r#"{{"title":"{}"}}"#, "a".repeat(MAX_BODY_BYTES));
        let err = extract(body).await.unwrap_err();
        assert_matches!(
            err,
            AppError::Decode(DecodeError::TooLarge { limit: MAX_BODY_BYTES })
        );
    }

    #[tokio::test]
    async fn unknown_key_is_rejected_with_400() {
        let err = extract(r#"{"title":"x","foo":"bar"}"#).await.unwrap_err();
        assert_matches!(err, AppError::Decode(DecodeError::UnknownField { ref field }) if field == "foo");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn empty_body_is_rejected() {
        let err = extract(Body::empty()).await.unwrap_err();
        assert_matches!(err, AppError::Decode(DecodeError::EmptyBody));
    }
}
