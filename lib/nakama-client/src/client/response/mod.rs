//! Response handling.
//!
//! [`ApiResponse`] holds a successful (2xx) response. The caller picks the
//! decoding: [`json`](ApiResponse::json) into a target type, or
//! [`discard`](ApiResponse::discard) when the operation returns nothing useful.

use std::borrow::Cow;

use bytes::Bytes;
use headers::ContentType;
use http::StatusCode;
use serde::de::DeserializeOwned;
use tracing::trace;

use super::NakamaError;

const EMPTY_OBJECT: &[u8] = b"{}";

/// A successful response returned by the dispatcher.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    path: String,
    status: StatusCode,
    content_type: Option<ContentType>,
    body: Bytes,
}

impl ApiResponse {
    pub(crate) fn new(
        path: String,
        status: StatusCode,
        content_type: Option<ContentType>,
        body: Bytes,
    ) -> Self {
        Self {
            path,
            status,
            content_type,
            body,
        }
    }

    /// The request path this response answers.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The HTTP status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The response content type, if the server sent one.
    pub fn content_type(&self) -> Option<&ContentType> {
        self.content_type.as_ref()
    }

    /// The raw response body.
    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    /// The response body as text, replacing invalid UTF-8 sequences.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Decodes the JSON body into `T`.
    ///
    /// A blank body is read as the empty object `{}`, which is how Nakama
    /// answers operations without a payload.
    ///
    /// # Errors
    ///
    /// Returns [`NakamaError::Decode`] with the path of the failing field when
    /// the body does not match `T`.
    pub fn json<T>(&self) -> Result<T, NakamaError>
    where
        T: DeserializeOwned,
    {
        let data: &[u8] = if self.body.iter().all(u8::is_ascii_whitespace) {
            EMPTY_OBJECT
        } else {
            &self.body
        };

        let deserializer = &mut serde_json::Deserializer::from_slice(data);
        serde_path_to_error::deserialize(deserializer)
            .map_err(|error| NakamaError::decode(&self.path, error, &self.body))
    }

    /// Drops the body of a successful response.
    pub fn discard(self) {
        trace!(path = %self.path, status = %self.status, len = self.body.len(), "discarding response body");
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Rewards {
        rewards: i64,
    }

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Cursor {
        #[serde(default)]
        cursor: String,
    }

    fn response(body: &'static str) -> ApiResponse {
        ApiResponse::new(
            "/v2/rpc/rewards".to_string(),
            StatusCode::OK,
            Some(ContentType::json()),
            Bytes::from_static(body.as_bytes()),
        )
    }

    #[test]
    fn test_json_decoding() {
        let rewards: Rewards = response(r#"{"rewards":10}"#).json().expect("decoded");

        assert_eq!(rewards, Rewards { rewards: 10 });
    }

    #[test]
    fn test_blank_body_is_an_empty_object() {
        let cursor: Cursor = response("").json().expect("decoded");

        assert_eq!(cursor, Cursor::default());
    }

    #[test]
    fn test_decode_error_reports_path() {
        let error = response(r#"{"rewards":"ten"}"#)
            .json::<Rewards>()
            .expect_err("invalid type");

        let NakamaError::Decode { path, error, body } = error else {
            panic!("Expected a decode error, got {error:?}");
        };
        assert_eq!(path, "/v2/rpc/rewards");
        assert_eq!(error.path().to_string(), "rewards");
        assert_eq!(body, r#"{"rewards":"ten"}"#);
    }

    #[test]
    fn test_text() {
        let response = response("plain");

        assert_eq!(response.text(), "plain");
        assert_eq!(response.status(), StatusCode::OK);
        response.discard();
    }
}
