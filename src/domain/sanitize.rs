//! Free-text cleanup so curator text can sit inside an XHTML paragraph.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static CONTROL_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{Cc}\x{FFFE}\x{FFFF}]+").expect("control regex"));
static AMPERSAND_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&+").expect("ampersand regex"));
static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</*[a-zA-Z][^>]*>").expect("tag regex"));
static NEWLINE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n+").expect("newline regex"));

/// How runs of `&` are neutralized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmpersandMode {
    /// `A & B` becomes `A  and  B`
    #[default]
    Word,
    /// `A & B` becomes `A    B`
    Space,
}

impl AmpersandMode {
    fn replacement(self) -> &'static str {
        match self {
            AmpersandMode::Word => " and ",
            AmpersandMode::Space => "  ",
        }
    }
}

/// Text sanitizer; stages run in a fixed order, each on the previous output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sanitizer {
    ampersand: AmpersandMode,
}

impl Sanitizer {
    pub fn new(ampersand: AmpersandMode) -> Self {
        Self { ampersand }
    }

    /// Clean `text` for use as XHTML text content.
    ///
    /// The result contains no control characters, no `&`, no `<` and no
    /// `]]>`. Arrow notations are turned into words before tag stripping,
    /// which would otherwise swallow them.
    pub fn sanitize(&self, text: &str) -> String {
        let text = CONTROL_RUN.replace_all(text, " ");
        let text = AMPERSAND_RUN.replace_all(&text, self.ampersand.replacement());
        let text = text.replace("<->", " to ").replace("<>", " interconverts to ");
        let text = TAG.replace_all(&text, " ");
        let text = text.replace('<', " ").replace("]]>", "]] >");
        NEWLINE_RUN.replace_all(&text, "  ").into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::arrow("A<->B", "A to B")]
    #[case::interconversion("A<>B", "A interconverts to B")]
    #[case::tags("<b>bold</b> text", " bold  text")]
    #[case::italic_closing("ATP</i>", "ATP ")]
    #[case::bare_lt("x < y", "x   y")]
    #[case::control("line\tbreak\r\n", "line break ")]
    #[case::ampersands("A && B", "A  and  B")]
    #[case::cdata_end("a ]]> b", "a ]] > b")]
    #[case::plain("Nothing to do.", "Nothing to do.")]
    fn given_text_when_sanitizing_then_matches(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(Sanitizer::default().sanitize(input), expected);
    }

    #[test]
    fn given_space_mode_when_sanitizing_ampersand_then_uses_spaces() {
        let sanitizer = Sanitizer::new(AmpersandMode::Space);
        assert_eq!(sanitizer.sanitize("R&D"), "R  D");
    }

    #[rstest]
    #[case("<<>>")]
    #[case("<<b>>")]
    #[case("a\n\n<->&&<br/>\u{7}]]>")]
    #[case("]]<>")]
    #[case("Na+/K+ <-> ATPase & co <i>in vivo</i>")]
    fn given_sanitized_text_when_sanitizing_again_then_unchanged(#[case] input: &str) {
        let sanitizer = Sanitizer::default();
        let once = sanitizer.sanitize(input);
        assert_eq!(sanitizer.sanitize(&once), once);
        assert!(!once.contains('<'));
        assert!(!once.contains('&'));
        assert!(!once.contains("]]>"));
    }
}
