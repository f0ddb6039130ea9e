//! Located, parsed tag occurrences

use crate::error::Span;

/// Byte offsets of one comment marker within the searched text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagSpan {
    /// Offset of the `<!--`
    pub start: usize,
    /// Offset just past the `<!-- NAME ` prefix, where the property list begins
    pub prefix_end: usize,
    /// Offset just past the closing ` -->`
    pub end: usize,
}

impl TagSpan {
    pub fn new(start: usize, prefix_end: usize, end: usize) -> Self {
        Self {
            start,
            prefix_end,
            end,
        }
    }

    pub fn range(&self) -> Span {
        self.start..self.end
    }
}

/// A tag found by [`extract_tags`](super::extract_tags)
///
/// Never mutated after extraction. Properties keep their source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    name: String,
    properties: Vec<(String, String)>,
    content: Option<String>,
    start: TagSpan,
    end: Option<TagSpan>,
}

impl Tag {
    pub(crate) fn single(name: &str, properties: Vec<(String, String)>, start: TagSpan) -> Self {
        Self {
            name: name.to_string(),
            properties,
            content: None,
            start,
            end: None,
        }
    }

    pub(crate) fn with_body(
        name: &str,
        properties: Vec<(String, String)>,
        content: String,
        start: TagSpan,
        end: TagSpan,
    ) -> Self {
        debug_assert!(end.start >= start.end);
        Self {
            name: name.to_string(),
            properties,
            content: Some(content),
            start,
            end: Some(end),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_body(&self) -> bool {
        self.end.is_some()
    }

    /// Look up a property by its exact key
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    /// Text between the start and end markers, only for tags with a body
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn start_span(&self) -> TagSpan {
        self.start
    }

    pub fn end_span(&self) -> Option<TagSpan> {
        self.end
    }

    /// Offset just past the whole tag, including its end marker
    pub fn end_offset(&self) -> usize {
        self.end.map_or(self.start.end, |end| end.end)
    }

    /// Byte range covered by the tag, from `<!--` to the final `-->`
    pub fn outer_span(&self) -> Span {
        self.start.start..self.end_offset()
    }
}
