//! Webhook response types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The trusted response shape: `{ content, format?, status? }`.
///
/// Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentResponse {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Failure while reading a response body
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to read response body: {0}")]
pub struct BodyReadError(pub String);

impl BodyReadError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// An HTTP response whose body has not been consumed yet.
///
/// The body can be read exactly once; reading consumes the response.
#[async_trait]
pub trait ResponseSource: Send {
    /// Raw `content-type` header value, if present
    fn content_type(&self) -> Option<&str>;

    /// Read the whole body as UTF-8 text
    async fn text(self: Box<Self>) -> Result<String, BodyReadError>;
}

/// A response already held in memory.
///
/// Used for replaying captured responses and in tests.
#[derive(Debug, Clone, Default)]
pub struct BufferedResponse {
    content_type: Option<String>,
    body: Vec<u8>,
}

impl BufferedResponse {
    pub fn new(content_type: Option<&str>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            content_type: content_type.map(str::to_string),
            body: body.into(),
        }
    }

    pub fn json(body: impl Into<Vec<u8>>) -> Self {
        Self::new(Some("application/json"), body)
    }

    pub fn xml(body: impl Into<Vec<u8>>) -> Self {
        Self::new(Some("application/xml"), body)
    }

    pub fn plain(body: impl Into<Vec<u8>>) -> Self {
        Self::new(None, body)
    }

    pub fn boxed(self) -> Box<dyn ResponseSource> {
        Box::new(self)
    }
}

#[async_trait]
impl ResponseSource for BufferedResponse {
    fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    async fn text(self: Box<Self>) -> Result<String, BodyReadError> {
        String::from_utf8(self.body).map_err(|e| BodyReadError::new(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_response_optional_fields() {
        let parsed: ContentResponse =
            serde_json::from_str(r#"{"content":"hi","extra":1}"#).unwrap();
        assert_eq!(parsed.content, "hi");
        assert_eq!(parsed.format, None);
        assert_eq!(parsed.status, None);
    }

    #[test]
    fn test_content_response_rejects_non_string_format() {
        let parsed = serde_json::from_str::<ContentResponse>(r#"{"content":"hi","format":3}"#);
        assert!(parsed.is_err());
    }

    #[tokio::test]
    async fn test_buffered_response_invalid_utf8() {
        let response = BufferedResponse::plain(vec![0xff, 0xfe]).boxed();
        assert!(response.text().await.is_err());
    }
}
