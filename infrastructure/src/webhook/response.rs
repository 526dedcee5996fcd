//! `ResponseSource` over a live `reqwest::Response`

use async_trait::async_trait;
use forge_domain::{BodyReadError, ResponseSource};

/// Maximum response body size (5 MB)
pub const MAX_BODY_SIZE: usize = 5 * 1024 * 1024;

/// A webhook response whose body is read on demand.
pub struct HttpResponseSource {
    content_type: Option<String>,
    response: reqwest::Response,
}

impl HttpResponseSource {
    pub fn new(response: reqwest::Response) -> Self {
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Self {
            content_type,
            response,
        }
    }
}

#[async_trait]
impl ResponseSource for HttpResponseSource {
    fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    async fn text(self: Box<Self>) -> Result<String, BodyReadError> {
        if let Some(length) = self.response.content_length()
            && length > MAX_BODY_SIZE as u64
        {
            return Err(BodyReadError::new(format!(
                "response too large: {length} bytes (max: {MAX_BODY_SIZE} bytes)"
            )));
        }

        let body = self
            .response
            .bytes()
            .await
            .map_err(|e| BodyReadError::new(e.to_string()))?;
        if body.len() > MAX_BODY_SIZE {
            return Err(BodyReadError::new(format!(
                "response too large: {} bytes",
                body.len()
            )));
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}
