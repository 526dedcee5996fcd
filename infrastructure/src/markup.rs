//! roxmltree-backed [`MarkupParser`] for XML webhook responses.
//!
//! Element names are matched case-sensitively on their local name, so
//! `<a:content>` counts as `content` but `<Content>` does not. A document
//! that fails to parse yields `None` for every tag, which leaves the
//! normalizer's XML fallback in charge.

use forge_domain::MarkupParser;
use roxmltree::{Document, ParsingOptions};
use tracing::debug;

/// Looks up elements in a strictly parsed XML document.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlMarkupParser;

impl MarkupParser for XmlMarkupParser {
    fn element_text(&self, document: &str, tag: &str) -> Option<String> {
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let tree = match Document::parse_with_options(document, options) {
            Ok(tree) => tree,
            Err(e) => {
                debug!(error = %e, "XML response did not parse");
                return None;
            }
        };

        let element = tree
            .descendants()
            .find(|node| node.is_element() && node.tag_name().name() == tag)?;

        // Text and CDATA of all descendants, in document order
        Some(
            element
                .descendants()
                .filter(|node| node.is_text())
                .filter_map(|node| node.text())
                .collect(),
        )
    }
}
