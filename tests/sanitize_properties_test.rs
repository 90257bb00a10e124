//! Property tests for the sanitizer and the notes envelope

use proptest::prelude::*;

use sbml_notes::application::{NotesBuilder, NotesOutcome};
use sbml_notes::domain::{AmpersandMode, MarkupFragment, Sanitizer};
use sbml_notes::infrastructure::InMemoryDocument;

/// Pieces curator text is known to contain that break XHTML.
const HOSTILE: &[&str] = &[
    "&", "&&", "<", ">", "<<", "]]>", "]]", "<->", "<>", "<b>", "</i>", "<br/>", "<!--",
    "<![CDATA[", "&amp;", "\u{0}", "\u{7}", "\u{7f}", "\u{85}", "\n", "\r\n", "\t", "\u{fffe}",
    "\u{ffff}",
];

fn fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(HOSTILE).prop_map(|piece| piece.to_string()),
        "[a-zA-Z0-9 .,;+/-]{1,8}",
        ".{1,4}",
    ]
}

fn curator_text() -> impl Strategy<Value = String> {
    prop::collection::vec(fragment(), 0..24).prop_map(|parts| parts.concat())
}

fn ampersand_mode() -> impl Strategy<Value = AmpersandMode> {
    prop_oneof![Just(AmpersandMode::Word), Just(AmpersandMode::Space)]
}

proptest! {
    #[test]
    fn given_any_text_when_sanitizing_then_no_markup_characters_remain(
        text in curator_text(),
        mode in ampersand_mode(),
    ) {
        let clean = Sanitizer::new(mode).sanitize(&text);

        prop_assert!(!clean.contains('<'));
        prop_assert!(!clean.contains('&'));
        prop_assert!(!clean.contains("]]>"));
        prop_assert!(!clean.chars().any(|c| c.is_control() || c == '\u{fffe}' || c == '\u{ffff}'), "sanitized text contains a control or noncharacter: {:?}", clean);
    }

    #[test]
    fn given_sanitized_text_when_sanitizing_again_then_unchanged(
        text in curator_text(),
        mode in ampersand_mode(),
    ) {
        let sanitizer = Sanitizer::new(mode);
        let once = sanitizer.sanitize(&text);

        prop_assert_eq!(sanitizer.sanitize(&once), once);
    }

    #[test]
    fn given_any_segments_when_enveloping_then_markup_parses(
        segments in prop::collection::vec(curator_text(), 1..4),
        mode in ampersand_mode(),
    ) {
        let mut notes = NotesBuilder::new(Sanitizer::new(mode), "\n");
        notes.extend(segments.iter().map(String::as_str));

        let markup = notes.markup();
        prop_assert!(MarkupFragment::parse(&markup).is_ok(), "{}", markup);

        let mut doc = InMemoryDocument::new();
        prop_assert_eq!(notes.finalize(&mut doc, "s"), NotesOutcome::Attached);
    }
}
