//! Response normalization: any webhook response → one content string.
//!
//! The webhook is an independently evolving automation workflow, so its
//! output shape is not fixed. The normalizer sniffs the content type and
//! walks an explicit decision tree for each format:
//!
//! | Content type | Procedure |
//! |--------------|-----------|
//! | `application/json` | strict `{content, format?, status?}` → object with string `content` → bare string → error |
//! | `text/xml`, `application/xml` | `<content>` text → `<response>` text → [`XmlFallback`] |
//! | anything else | body text, trimmed |
//!
//! Read and decode failures are reported uniformly as
//! [`ParseError::Malformed`]; the cause is attached as the error source and
//! logged, never shown in the message.

use super::response::{BodyReadError, ContentResponse, ResponseSource};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error as _;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Elements searched, in order, for the content of an XML response
const XML_CONTENT_TAGS: [&str; 2] = ["content", "response"];

/// Errors produced by [`ResponseNormalizer::normalize`]
#[derive(Error, Debug)]
pub enum ParseError {
    /// JSON decoded fine but matched none of the accepted shapes
    #[error("invalid JSON response format")]
    InvalidJsonFormat,

    /// The body could not be read or decoded
    #[error("failed to parse response")]
    Malformed(#[source] MalformedCause),

    /// XML without a usable element, with [`XmlFallback::Reject`] in effect
    #[error("no content element in XML response")]
    NoXmlContent,
}

/// Underlying cause of [`ParseError::Malformed`]
#[derive(Error, Debug)]
pub enum MalformedCause {
    #[error(transparent)]
    Body(#[from] BodyReadError),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// What to do with an XML document that has neither a `content` nor a
/// `response` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XmlFallback {
    /// Return the raw document text unchanged
    #[default]
    RawDocument,
    /// Fail with [`ParseError::NoXmlContent`]
    Reject,
}

/// Injected markup capability used for XML bodies.
pub trait MarkupParser: Send + Sync {
    /// Text content of the first element named `tag` in document order.
    ///
    /// Returns `None` when no such element exists. Implementations must not
    /// fail on malformed input; they should search whatever they could parse.
    fn element_text(&self, document: &str, tag: &str) -> Option<String>;
}

/// Body handling chosen from the `content-type` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Json,
    Xml,
    PlainText,
}

impl BodyKind {
    /// Classify a `content-type` header value (case-insensitive substring match)
    pub fn sniff(content_type: Option<&str>) -> Self {
        let content_type = content_type.unwrap_or_default().to_ascii_lowercase();
        if content_type.contains("application/json") {
            BodyKind::Json
        } else if content_type.contains("text/xml") || content_type.contains("application/xml") {
            BodyKind::Xml
        } else {
            BodyKind::PlainText
        }
    }
}

/// Outcome of matching a decoded JSON value against the accepted shapes
#[derive(Debug, PartialEq)]
enum JsonShape {
    Strict(ContentResponse),
    Loose(String),
    Bare(String),
    Unrecognized,
}

impl JsonShape {
    fn classify(value: Value) -> Self {
        if let Ok(strict) = ContentResponse::deserialize(&value) {
            return JsonShape::Strict(strict);
        }
        match value {
            Value::Object(mut map) => match map.remove("content") {
                Some(Value::String(content)) => JsonShape::Loose(content),
                _ => JsonShape::Unrecognized,
            },
            Value::String(content) => JsonShape::Bare(content),
            _ => JsonShape::Unrecognized,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            JsonShape::Strict(_) => "strict",
            JsonShape::Loose(_) => "loose",
            JsonShape::Bare(_) => "bare-string",
            JsonShape::Unrecognized => "unrecognized",
        }
    }

    fn into_content(self) -> Result<String, ParseError> {
        match self {
            JsonShape::Strict(response) => Ok(response.content),
            JsonShape::Loose(content) | JsonShape::Bare(content) => Ok(content),
            JsonShape::Unrecognized => Err(ParseError::InvalidJsonFormat),
        }
    }
}

/// Converts webhook responses of unknown shape into plain content text.
///
/// Stateless apart from its configuration; one instance can serve any number
/// of concurrent calls.
#[derive(Clone)]
pub struct ResponseNormalizer {
    markup: Arc<dyn MarkupParser>,
    xml_fallback: XmlFallback,
}

impl ResponseNormalizer {
    pub fn new(markup: Arc<dyn MarkupParser>) -> Self {
        Self {
            markup,
            xml_fallback: XmlFallback::default(),
        }
    }

    pub fn with_xml_fallback(mut self, fallback: XmlFallback) -> Self {
        self.xml_fallback = fallback;
        self
    }

    pub fn xml_fallback(&self) -> XmlFallback {
        self.xml_fallback
    }

    /// Read `response` and extract its content.
    pub async fn normalize(&self, response: Box<dyn ResponseSource>) -> Result<String, ParseError> {
        let kind = BodyKind::sniff(response.content_type());
        debug!(
            content_type = response.content_type().unwrap_or(""),
            ?kind,
            "Normalizing response"
        );

        let body = response.text().await.map_err(MalformedCause::from);
        let result = body
            .map_err(ParseError::Malformed)
            .and_then(|body| self.normalize_body(kind, body));

        if let Err(e) = &result {
            match e.source() {
                Some(cause) => warn!(error = %e, cause = %cause, "Response parsing error"),
                None => warn!(error = %e, "Response parsing error"),
            }
        }
        result
    }

    /// Extract content from an already-read body
    pub fn normalize_body(&self, kind: BodyKind, body: String) -> Result<String, ParseError> {
        match kind {
            BodyKind::Json => Self::extract_json(&body),
            BodyKind::Xml => self.extract_xml(body),
            BodyKind::PlainText => Ok(body.trim().to_string()),
        }
    }

    fn extract_json(body: &str) -> Result<String, ParseError> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| ParseError::Malformed(MalformedCause::from(e)))?;
        let shape = JsonShape::classify(value);
        debug!(shape = shape.label(), "Classified JSON response");
        shape.into_content()
    }

    fn extract_xml(&self, document: String) -> Result<String, ParseError> {
        for tag in XML_CONTENT_TAGS {
            if let Some(text) = self.markup.element_text(&document, tag)
                && !text.is_empty()
            {
                debug!(tag, "Found XML content element");
                return Ok(text);
            }
        }

        match self.xml_fallback {
            XmlFallback::RawDocument => {
                debug!("No XML content element, returning raw document");
                Ok(document)
            }
            XmlFallback::Reject => Err(ParseError::NoXmlContent),
        }
    }
}

impl std::fmt::Debug for ResponseNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseNormalizer")
            .field("xml_fallback", &self.xml_fallback)
            .finish_non_exhaustive()
    }
}
