//! Domain layer: entities and conversion logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod counter;
pub mod describe;
pub mod entities;
pub mod error;
pub mod flatten;
pub mod graph;
pub mod history;
pub mod markup;
pub mod provenance;
pub mod qualifier;
pub mod sanitize;

pub use counter::OccurrenceCounter;
pub use describe::{describe_entity, Coverage, SbmlTarget, SpeciesDescription};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use flatten::flatten;
pub use graph::{resolve_identifier, EntityGraph, EntityIdx, PhysicalEntity};
pub use history::{parse_datetime, Creator, History};
pub use markup::{MarkupFragment, XHTML_NAMESPACE};
pub use qualifier::{CvTerm, Qualifier};
pub use sanitize::{AmpersandMode, Sanitizer};
