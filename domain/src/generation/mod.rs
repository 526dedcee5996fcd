//! Generation subdomain: talking to the content webhook.
//!
//! - [`request::GenerationRequest`]: the JSON body POSTed to the webhook
//! - [`response::ResponseSource`]: a response whose body has not been read yet
//! - [`normalizer::ResponseNormalizer`]: reduces any response to plain text

pub mod normalizer;
pub mod request;
pub mod response;
