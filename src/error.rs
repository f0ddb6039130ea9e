//! Error types for tag extraction, template injection and value resolution

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Broad classification of an [`InjectError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The comment markup itself is broken (unterminated marker, missing end tag, missing quote)
    Malformed,
    /// The markup is well formed but refers to something invalid
    Semantic,
    /// Template expansion did not settle within the configured number of passes
    Limit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InjectError {
    #[error("{tag} tag not closed")]
    TagNotClosed { tag: String, span: Span },

    #[error("missing end tag for {tag}")]
    MissingEndTag { tag: String, span: Span },

    #[error("missing first single quote for property '{key}'")]
    MissingOpeningQuote { key: String, span: Span },

    #[error("missing second single quote for property '{key}'")]
    MissingClosingQuote { key: String, span: Span },

    #[error("duplicate property '{key}' in {tag} tag")]
    DuplicateProperty { tag: String, key: String, span: Span },

    #[error("missing {property} property for {tag} tag")]
    MissingProperty {
        tag: String,
        property: String,
        span: Span,
    },

    #[error("unknown template id {id}")]
    UnknownTemplate { id: String, span: Span },

    #[error("duplicate template value {key}")]
    DuplicateValue { key: String, span: Span },

    #[error("template recursion limit exceeded after {limit} injection passes")]
    RecursionLimit { limit: usize },

    /// An error found in text produced by an earlier injection pass.
    /// The inner span points into that intermediate text, not the source file.
    #[error("{source} (in text expanded by injection pass {pass})")]
    Expanded {
        pass: usize,
        source: Box<InjectError>,
    },
}

impl InjectError {
    pub fn missing_property(
        tag: impl Into<String>,
        property: impl Into<String>,
        span: Span,
    ) -> Self {
        Self::MissingProperty {
            tag: tag.into(),
            property: property.into(),
            span,
        }
    }

    /// Wrap an error raised while scanning the output of injection pass `pass`
    pub fn expanded(self, pass: usize) -> Self {
        match self {
            // Keep the innermost error and the earliest pass it surfaced in
            Self::Expanded { .. } | Self::RecursionLimit { .. } => self,
            other => Self::Expanded {
                pass,
                source: Box::new(other),
            },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TagNotClosed { .. }
            | Self::MissingEndTag { .. }
            | Self::MissingOpeningQuote { .. }
            | Self::MissingClosingQuote { .. } => ErrorKind::Malformed,
            Self::DuplicateProperty { .. }
            | Self::MissingProperty { .. }
            | Self::UnknownTemplate { .. }
            | Self::DuplicateValue { .. } => ErrorKind::Semantic,
            Self::RecursionLimit { .. } => ErrorKind::Limit,
            Self::Expanded { source, .. } => source.kind(),
        }
    }

    /// Get the source span if it refers to the text originally handed in
    pub fn span(&self) -> Option<&Span> {
        match self {
            Self::TagNotClosed { span, .. }
            | Self::MissingEndTag { span, .. }
            | Self::MissingOpeningQuote { span, .. }
            | Self::MissingClosingQuote { span, .. }
            | Self::DuplicateProperty { span, .. }
            | Self::MissingProperty { span, .. }
            | Self::UnknownTemplate { span, .. }
            | Self::DuplicateValue { span, .. } => Some(span),
            Self::RecursionLimit { .. } | Self::Expanded { .. } => None,
        }
    }

    /// Format the error with source context using ariadne
    ///
    /// Falls back to the plain message when there is no usable span.
    pub fn format(&self, source: &str, filename: &str) -> String {
        let span = match self.span() {
            Some(span) if span.end <= source.len() => span.clone(),
            _ => return format!("{}: {}", filename, self),
        };
        // ariadne counts characters, spans are byte offsets
        let span = char_offset(source, span.start)..char_offset(source, span.end);

        let message = self.to_string();
        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(&message)
            .with_label(
                Label::new((filename, span))
                    .with_message(&message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => format!("{}: {}", filename, message),
        }
    }
}

fn char_offset(source: &str, byte_offset: usize) -> usize {
    source
        .get(..byte_offset)
        .map(|prefix| prefix.chars().count())
        .unwrap_or(byte_offset)
}
