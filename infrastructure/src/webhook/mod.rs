//! **Webhook adapter**: the HTTP side of content generation.
//!
//! | Type | Role |
//! |------|------|
//! | [`WebhookGateway`] | POSTs a [`GenerationRequest`](forge_domain::GenerationRequest) and checks the status |
//! | [`HttpResponseSource`] | Wraps the `reqwest::Response` so the normalizer reads the body lazily |
//!
//! The shared `reqwest::Client` carries the whole-request timeout, so a slow
//! body read is bounded as well.

mod gateway;
mod response;

pub use gateway::WebhookGateway;
pub use response::{HttpResponseSource, MAX_BODY_SIZE};
