//! Generation gateway port
//!
//! Defines how the application reaches the external content-generation
//! webhook. The gateway only transports; it never interprets the body.

use async_trait::async_trait;
use forge_domain::{GenerationRequest, ResponseSource};
use thiserror::Error;

/// Errors that can occur while calling the generation webhook
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request timed out")]
    Timeout,

    #[error("HTTP error! status: {0}")]
    HttpStatus(u16),

    #[error("Other error: {0}")]
    Other(String),
}

/// Gateway to the generation webhook
///
/// Implementations send the request and hand back the response with its body
/// still unread. Non-success statuses are reported as
/// [`GatewayError::HttpStatus`]. No retries happen here.
#[async_trait]
pub trait GenerationGateway: Send + Sync {
    async fn send(
        &self,
        request: &GenerationRequest,
    ) -> Result<Box<dyn ResponseSource>, GatewayError>;
}
