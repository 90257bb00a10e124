//! Notes accumulation and attachment.

use tracing::{debug, warn};

use crate::domain::markup::notes_envelope;
use crate::domain::{DomainError, MarkupFragment, Sanitizer};
use crate::infrastructure::traits::DocumentBuilder;

/// Result of finalizing a [`NotesBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotesOutcome {
    /// Fragment parsed and attached to the node
    Attached,
    /// Nothing was appended; the node is left untouched
    Empty,
    /// Markup did not parse; logged and not attached
    SkippedMalformed(String),
}

impl NotesOutcome {
    pub fn is_attached(&self) -> bool {
        matches!(self, NotesOutcome::Attached)
    }
}

/// Ordered list of sanitized segments, joined once on finalize.
///
/// One builder serves one node. `finalize` consumes it, so a builder cannot
/// be attached twice.
#[derive(Debug, Clone)]
pub struct NotesBuilder {
    sanitizer: Sanitizer,
    separator: String,
    segments: Vec<String>,
}

impl NotesBuilder {
    pub fn new(sanitizer: Sanitizer, separator: impl Into<String>) -> Self {
        Self {
            sanitizer,
            separator: separator.into(),
            segments: Vec::new(),
        }
    }

    /// Append a sanitized copy of `text` as a new segment.
    pub fn append(&mut self, text: &str) -> &mut Self {
        self.segments.push(self.sanitizer.sanitize(text));
        self
    }

    pub fn extend<'a, I>(&mut self, texts: I) -> &mut Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        for text in texts {
            self.append(text);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Joined body without the envelope; separator only between segments.
    pub fn body(&self) -> String {
        self.segments.join(&self.separator)
    }

    /// Enveloped markup as it is handed to the parser.
    pub fn markup(&self) -> String {
        notes_envelope(&self.body())
    }

    /// Parse the accumulated notes and attach them to `node`.
    ///
    /// Malformed markup is never fatal: it is logged with its content and
    /// the node keeps whatever notes it already had.
    pub fn finalize(self, doc: &mut dyn DocumentBuilder, node: &str) -> NotesOutcome {
        if self.is_empty() {
            return NotesOutcome::Empty;
        }
        let markup = self.markup();
        match MarkupFragment::parse(&markup) {
            Ok(fragment) => {
                debug!("attaching {} notes segment(s) to {}", self.segments.len(), node);
                doc.append_notes(node, fragment);
                NotesOutcome::Attached
            }
            Err(err) => {
                let reason = match err {
                    DomainError::MalformedMarkup { reason } => reason,
                    other => other.to_string(),
                };
                warn!("skipping malformed notes for {}: {}\n{}", node, reason, markup);
                NotesOutcome::SkippedMalformed(reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AmpersandMode;
    use crate::infrastructure::document::InMemoryDocument;

    fn builder() -> NotesBuilder {
        NotesBuilder::new(Sanitizer::new(AmpersandMode::Word), "\n")
    }

    #[test]
    fn given_segments_when_joining_then_separator_only_between() {
        let mut notes = builder();
        notes.append("first").append("second").append("third");
        assert_eq!(notes.body(), "first\nsecond\nthird");
    }

    #[test]
    fn given_single_segment_when_joining_then_no_separator() {
        let mut notes = builder();
        notes.append("only");
        assert_eq!(notes.body(), "only");
        assert_eq!(
            notes.markup(),
            "<notes><p xmlns=\"http://www.w3.org/1999/xhtml\">only</p></notes>"
        );
    }

    #[test]
    fn given_no_segments_when_finalizing_then_nothing_attached() {
        let mut doc = InMemoryDocument::new();
        let outcome = builder().finalize(&mut doc, "s1");
        assert_eq!(outcome, NotesOutcome::Empty);
        assert!(doc.node("s1").is_none());
    }

    #[test]
    fn given_arrow_text_when_finalizing_then_attached_as_words() {
        let mut doc = InMemoryDocument::new();
        let mut notes = builder();
        notes.append("A<->B");

        let outcome = notes.finalize(&mut doc, "s1");

        assert_eq!(outcome, NotesOutcome::Attached);
        let node = doc.node("s1").unwrap();
        assert_eq!(node.notes.len(), 1);
        assert_eq!(node.notes[0].text_content(), "A to B");
    }

    #[test]
    fn given_separator_with_markup_when_finalizing_then_skipped() {
        let mut doc = InMemoryDocument::new();
        let mut notes = NotesBuilder::new(Sanitizer::default(), "<br>");
        notes.append("one").append("two");

        let outcome = notes.finalize(&mut doc, "s1");

        assert!(matches!(outcome, NotesOutcome::SkippedMalformed(_)));
        assert!(doc.node("s1").is_none());
    }
}
