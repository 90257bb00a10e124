//! Document-level provenance annotation.

use chrono::NaiveDateTime;

use crate::domain::error::DomainResult;
use crate::domain::markup::MarkupFragment;

/// Layout of the generation date inside the provenance sentence.
pub const PROVENANCE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Provenance block naming the knowledge base release and toolchain.
///
/// Inputs are system controlled, so they are substituted without the
/// free-text sanitizer.
pub fn provenance_fragment(
    db_version: u32,
    generated_on: NaiveDateTime,
    jsbml_version: &str,
) -> DomainResult<MarkupFragment> {
    MarkupFragment::parse(&provenance_markup(db_version, generated_on, jsbml_version))
}

pub fn provenance_markup(
    db_version: u32,
    generated_on: NaiveDateTime,
    jsbml_version: &str,
) -> String {
    format!(
        "<annotation><p xmlns=\"http://www.w3.org/1999/xhtml\">SBML generated from Reactome version {} on {} using JSBML version {}.</p></annotation>",
        db_version,
        generated_on.format(PROVENANCE_DATE_FORMAT),
        jsbml_version
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn given_versions_when_building_provenance_then_matches_template() {
        let generated_on = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 0)
            .unwrap();

        let markup = provenance_markup(88, generated_on, "1.6.1");

        assert_eq!(
            markup,
            "<annotation><p xmlns=\"http://www.w3.org/1999/xhtml\">SBML generated from Reactome version 88 on 2024-03-09 14:05 using JSBML version 1.6.1.</p></annotation>"
        );
        let fragment = provenance_fragment(88, generated_on, "1.6.1").unwrap();
        assert_eq!(fragment.root().name, "annotation");
    }
}
