//! Controlled-vocabulary terms (MIRIAM qualifiers with resource URIs).

use std::fmt;

use serde::Serialize;

/// Biology (`bqbiol`) and model (`bqmodel`) qualifiers used by the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Qualifier {
    BqbIs,
    BqbHasPart,
    BqbHasVersion,
    BqbIsDescribedBy,
    BqbIsHomologTo,
    BqbOccursIn,
    BqmHasInstance,
}

impl Qualifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Qualifier::BqbIs => "bqbiol:is",
            Qualifier::BqbHasPart => "bqbiol:hasPart",
            Qualifier::BqbHasVersion => "bqbiol:hasVersion",
            Qualifier::BqbIsDescribedBy => "bqbiol:isDescribedBy",
            Qualifier::BqbIsHomologTo => "bqbiol:isHomologTo",
            Qualifier::BqbOccursIn => "bqbiol:occursIn",
            Qualifier::BqmHasInstance => "bqmodel:hasInstance",
        }
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CvTerm {
    pub qualifier: Qualifier,
    pub resources: Vec<String>,
}

impl CvTerm {
    /// Term for `uris`, or `None` when there is nothing to reference.
    pub fn new(qualifier: Qualifier, uris: Vec<String>) -> Option<Self> {
        if uris.is_empty() {
            None
        } else {
            Some(Self {
                qualifier,
                resources: uris,
            })
        }
    }
}
