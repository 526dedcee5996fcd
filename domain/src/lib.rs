//! Domain layer for content-forge
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Content
//!
//! A [`ContentRecord`] pairs the prompt a user submitted with the text the
//! generation webhook produced for it. Records are owned by an external store;
//! this crate only models their shape.
//!
//! ## Response normalization
//!
//! The webhook's output shape is not contractually fixed. The
//! [`ResponseNormalizer`] accepts JSON, XML or plain text and reduces any of
//! them to a single content string, degrading through looser fallbacks before
//! giving up with a [`ParseError`].

pub mod config;
pub mod content;
pub mod core;
pub mod generation;
pub mod util;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use content::{
    change::{ChangeKind, ContentChange},
    entities::{ContentId, ContentRecord, NewContent},
    value_objects::{Prompt, UserId},
};
pub use core::error::DomainError;
pub use generation::{
    normalizer::{
        BodyKind, MalformedCause, MarkupParser, ParseError, ResponseNormalizer, XmlFallback,
    },
    request::GenerationRequest,
    response::{BodyReadError, BufferedResponse, ContentResponse, ResponseSource},
};
