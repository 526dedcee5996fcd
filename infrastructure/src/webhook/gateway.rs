//! reqwest-backed [`GenerationGateway`]

use super::response::HttpResponseSource;
use crate::config::FileWebhookConfig;
use async_trait::async_trait;
use forge_application::ports::generation_gateway::{GatewayError, GenerationGateway};
use forge_domain::{GenerationRequest, ResponseSource};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Calls the content-generation webhook over HTTP.
pub struct WebhookGateway {
    client: reqwest::Client,
    url: String,
}

impl WebhookGateway {
    pub fn new(url: impl Into<String>, timeout: Duration, user_agent: &str) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| GatewayError::Other(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn from_config(config: &FileWebhookConfig) -> Result<Self, GatewayError> {
        Self::new(
            config.url.clone(),
            Duration::from_secs(config.timeout_secs),
            &config.user_agent,
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

fn map_send_error(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::Timeout
    } else if error.is_connect() || error.is_request() {
        GatewayError::Connection(error.to_string())
    } else {
        GatewayError::Other(error.to_string())
    }
}

#[async_trait]
impl GenerationGateway for WebhookGateway {
    async fn send(
        &self,
        request: &GenerationRequest,
    ) -> Result<Box<dyn ResponseSource>, GatewayError> {
        let start = Instant::now();
        debug!(url = %self.url, "POST generation request");

        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        info!(
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Webhook responded"
        );
        if !status.is_success() {
            return Err(GatewayError::HttpStatus(status.as_u16()));
        }

        Ok(Box::new(HttpResponseSource::new(response)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::XmlMarkupParser;
    use crate::test_http::{CannedResponse, TestServer};
    use forge_domain::{Prompt, ResponseNormalizer, UserId};
    use std::sync::Arc;

    fn request() -> GenerationRequest {
        GenerationRequest::new(
            &Prompt::new("a limerick").unwrap(),
            &UserId::new("user-9").unwrap(),
            chrono::Utc::now(),
        )
    }

    fn gateway(server: &TestServer) -> WebhookGateway {
        WebhookGateway::new(
            format!("{}/hook", server.base_url),
            Duration::from_secs(5),
            "content-forge-test",
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_posts_json_and_returns_unread_body() {
        let server = TestServer::start(vec![CannedResponse::new(
            200,
            Some("application/json; charset=utf-8"),
            r#"{"content":"There once was..."}"#,
        )])
        .await;

        let response = gateway(&server).send(&request()).await.unwrap();
        assert_eq!(
            response.content_type(),
            Some("application/json; charset=utf-8")
        );
        let content = ResponseNormalizer::new(Arc::new(XmlMarkupParser))
            .normalize(response)
            .await
            .unwrap();
        assert_eq!(content, "There once was...");

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].target, "/hook");
        assert_eq!(requests[0].header("user-agent"), Some("content-forge-test"));
        assert_eq!(requests[0].header("content-type"), Some("application/json"));
        let body: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
        assert_eq!(body["prompt"], "a limerick");
        assert_eq!(body["userId"], "user-9");
        assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let server =
            TestServer::start(vec![CannedResponse::new(500, Some("text/plain"), "boom")]).await;

        let err = gateway(&server).send(&request()).await.err().unwrap();
        assert!(matches!(err, GatewayError::HttpStatus(500)));
        assert_eq!(err.to_string(), "HTTP error! status: 500");
    }

    #[tokio::test]
    async fn test_connection_refused() {
        // Bind then drop to get a port nobody listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let gateway =
            WebhookGateway::new(format!("http://{addr}/hook"), Duration::from_secs(5), "t")
                .unwrap();
        let err = gateway.send(&request()).await.err().unwrap();
        assert!(matches!(err, GatewayError::Connection(_)));
    }
}
