//! Tests for the notes builder and the sanitizer behind it

use rstest::rstest;

use sbml_notes::application::{NotesBuilder, NotesOutcome};
use sbml_notes::domain::{AmpersandMode, MarkupFragment, Sanitizer, XHTML_NAMESPACE};
use sbml_notes::infrastructure::InMemoryDocument;
use sbml_notes::util::testing;

fn builder() -> NotesBuilder {
    NotesBuilder::new(Sanitizer::default(), "\n")
}

#[test]
fn given_arrow_notation_when_finalizing_then_content_has_words_and_no_brackets() {
    testing::init_test_setup();
    let mut doc = InMemoryDocument::new();
    let mut notes = builder();
    notes.append("A<->B");

    assert_eq!(notes.finalize(&mut doc, "species_1"), NotesOutcome::Attached);

    let fragment = &doc.node("species_1").unwrap().notes[0];
    let text = fragment.text_content();
    assert!(text.contains("A to B"));
    assert!(!text.contains('<'));
    assert!(!text.contains('>'));
}

#[test]
fn given_notes_when_finalizing_then_envelope_declares_xhtml_namespace() {
    let mut doc = InMemoryDocument::new();
    let mut notes = builder();
    notes.append("Glucose is phosphorylated.");

    notes.finalize(&mut doc, "s");

    let fragment = &doc.node("s").unwrap().notes[0];
    assert_eq!(fragment.root().name, "notes");
    let paragraph = fragment.root().child("p").unwrap();
    assert_eq!(paragraph.attribute("xmlns"), Some(XHTML_NAMESPACE));
}

#[test]
fn given_three_segments_when_finalizing_then_two_separators() {
    let mut doc = InMemoryDocument::new();
    let mut notes = NotesBuilder::new(Sanitizer::default(), " | ");
    notes.extend(["a", "b", "c"]);

    notes.finalize(&mut doc, "s");

    assert_eq!(doc.node("s").unwrap().notes[0].text_content(), "a | b | c");
}

#[test]
fn given_markup_separator_when_finalizing_then_skipped_and_node_untouched() {
    testing::init_test_setup();
    let mut doc = InMemoryDocument::new();
    let mut notes = NotesBuilder::new(Sanitizer::default(), "<b>");
    notes.extend(["a", "b"]);

    let outcome = notes.finalize(&mut doc, "s");

    assert!(matches!(outcome, NotesOutcome::SkippedMalformed(_)));
    assert!(doc.node("s").is_none());
}

#[rstest]
#[case("plain text")]
#[case("a < b > c")]
#[case("Tom & Jerry && co")]
#[case("<<>><->&&&<")]
#[case("line\none\r\n\ttab\u{0}\u{7f}")]
#[case("<script>alert('x')</script>")]
#[case("<![CDATA[ raw ]]>")]
#[case("&amp; &lt; &#60;")]
#[case("]]>")]
#[case("<!-- comment -->")]
#[case("\u{fffe}\u{ffff}<a href=\"x\">link</a>")]
fn given_hostile_text_when_enveloping_then_always_well_formed(
    #[case] input: &str,
    #[values(AmpersandMode::Word, AmpersandMode::Space)] mode: AmpersandMode,
) {
    let mut notes = NotesBuilder::new(Sanitizer::new(mode), "\n");
    notes.append(input);

    assert!(MarkupFragment::parse(&notes.markup()).is_ok(), "{}", notes.markup());
}

#[rstest]
#[case("A <-> B & C <> D\n\nE")]
#[case("<i>x</i> && y")]
#[case("\u{1}\u{2}<<->>")]
fn given_text_when_sanitizing_twice_then_same_as_once(#[case] input: &str) {
    let sanitizer = Sanitizer::default();
    let once = sanitizer.sanitize(input);
    assert_eq!(sanitizer.sanitize(&once), once);
}
