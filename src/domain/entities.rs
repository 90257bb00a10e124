//! Domain entities: pathway records as read from the knowledge base

use std::fmt;

use serde::{Deserialize, Serialize};

/// Schema class of a physical entity.
///
/// The set is closed; tags that did not exist when this crate was written
/// are kept verbatim in `Unknown` so callers can report them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityKind {
    SimpleEntity,
    EntityWithAccessionedSequence,
    Complex,
    CandidateSet,
    DefinedSet,
    OpenSet,
    OtherEntity,
    GenomeEncodedEntity,
    Polymer,
    ChemicalDrug,
    ProteinDrug,
    RnaDrug,
    Unknown(String),
}

impl EntityKind {
    /// Schema class name as stored in the knowledge base.
    pub fn schema_class(&self) -> &str {
        match self {
            EntityKind::SimpleEntity => "SimpleEntity",
            EntityKind::EntityWithAccessionedSequence => "EntityWithAccessionedSequence",
            EntityKind::Complex => "Complex",
            EntityKind::CandidateSet => "CandidateSet",
            EntityKind::DefinedSet => "DefinedSet",
            EntityKind::OpenSet => "OpenSet",
            EntityKind::OtherEntity => "OtherEntity",
            EntityKind::GenomeEncodedEntity => "GenomeEncodedEntity",
            EntityKind::Polymer => "Polymer",
            EntityKind::ChemicalDrug => "ChemicalDrug",
            EntityKind::ProteinDrug => "ProteinDrug",
            EntityKind::RnaDrug => "RNADrug",
            EntityKind::Unknown(tag) => tag,
        }
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, EntityKind::Complex)
    }

    /// Kinds whose identity is their membership rather than a single reference.
    pub fn is_aggregate(&self) -> bool {
        matches!(
            self,
            EntityKind::Complex
                | EntityKind::CandidateSet
                | EntityKind::DefinedSet
                | EntityKind::OpenSet
                | EntityKind::Polymer
        )
    }
}

impl From<String> for EntityKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "SimpleEntity" => EntityKind::SimpleEntity,
            "EntityWithAccessionedSequence" => EntityKind::EntityWithAccessionedSequence,
            "Complex" => EntityKind::Complex,
            "CandidateSet" => EntityKind::CandidateSet,
            "DefinedSet" => EntityKind::DefinedSet,
            "OpenSet" => EntityKind::OpenSet,
            "OtherEntity" => EntityKind::OtherEntity,
            "GenomeEncodedEntity" => EntityKind::GenomeEncodedEntity,
            "Polymer" => EntityKind::Polymer,
            "ChemicalDrug" => EntityKind::ChemicalDrug,
            "ProteinDrug" => EntityKind::ProteinDrug,
            "RNADrug" => EntityKind::RnaDrug,
            _ => EntityKind::Unknown(tag),
        }
    }
}

impl From<&str> for EntityKind {
    fn from(tag: &str) -> Self {
        EntityKind::from(tag.to_string())
    }
}

impl From<EntityKind> for String {
    fn from(kind: EntityKind) -> Self {
        kind.schema_class().to_string()
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.schema_class())
    }
}

/// Canonical external reference of a molecule or sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntity {
    pub identifier: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// Free-text summary attached to an entity or event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Summation {
    #[serde(default)]
    pub text: Option<String>,
}

/// Literature reference; only references with a URL are annotated.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LiteratureReference {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Post-translational modification of a sequence entity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModifiedResidue {
    #[serde(default)]
    pub psi_mod_url: Option<String>,
}

/// Author affiliation; the last name in the list is the current one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Affiliation {
    #[serde(default)]
    pub names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Person {
    #[serde(default)]
    pub surname: Option<String>,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub affiliations: Vec<Affiliation>,
}

/// A curation step: who touched the record and when.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InstanceEdit {
    #[serde(default)]
    pub date_time: String,
    #[serde(default)]
    pub authors: Vec<Person>,
}

/// Physical entity record as it appears in a bundle; components refer to
/// other records by stable id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub st_id: String,
    #[serde(default)]
    pub display_name: String,
    pub schema_class: EntityKind,
    #[serde(default)]
    pub reference: Option<ReferenceEntity>,
    #[serde(default)]
    pub components: Option<Vec<String>>,
    #[serde(default)]
    pub summations: Vec<Summation>,
    #[serde(default)]
    pub literature: Vec<LiteratureReference>,
    #[serde(default)]
    pub inferred_to: Vec<String>,
    #[serde(default)]
    pub inferred_from: Vec<String>,
    #[serde(default)]
    pub modified_residues: Vec<ModifiedResidue>,
}

/// Entity taking part in an event, with per-participation details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub entity: String,
    #[serde(default = "default_stoichiometry")]
    pub stoichiometry: u32,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub urls: Vec<String>,
}

fn default_stoichiometry() -> u32 {
    1
}

/// Regulation of an event by an entity (SBML modifier).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Regulation {
    pub regulator: String,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// Pathway or reaction-like event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Event {
    pub st_id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub summations: Vec<Summation>,
    #[serde(default)]
    pub literature: Vec<LiteratureReference>,
    #[serde(default)]
    pub go_biological_process: Option<String>,
    #[serde(default)]
    pub go_terms: Vec<String>,
    #[serde(default)]
    pub ec_numbers: Vec<String>,
    #[serde(default)]
    pub diseases: Vec<String>,
    #[serde(default)]
    pub cross_references: Vec<String>,
    #[serde(default)]
    pub created: Option<InstanceEdit>,
    #[serde(default)]
    pub modified: Option<InstanceEdit>,
    #[serde(default)]
    pub authored: Vec<InstanceEdit>,
    #[serde(default)]
    pub revised: Vec<InstanceEdit>,
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub regulations: Vec<Regulation>,
}

impl Event {
    /// Summation texts that are present, in record order.
    pub fn summation_texts(&self) -> impl Iterator<Item = &str> {
        summation_texts(&self.summations)
    }

    /// URLs of literature references that carry one.
    pub fn literature_urls(&self) -> Vec<String> {
        literature_urls(&self.literature)
    }
}

pub(crate) fn summation_texts(summations: &[Summation]) -> impl Iterator<Item = &str> {
    summations.iter().filter_map(|s| s.text.as_deref())
}

pub(crate) fn literature_urls(literature: &[LiteratureReference]) -> Vec<String> {
    literature.iter().filter_map(|l| l.url.clone()).collect()
}

/// Everything needed to annotate one document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PathwayBundle {
    /// Knowledge base release the records were exported from
    #[serde(default)]
    pub db_version: u32,
    /// Top-level pathway, absent when the document is built from loose events
    #[serde(default)]
    pub pathway: Option<Event>,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub entities: Vec<EntityRecord>,
}
