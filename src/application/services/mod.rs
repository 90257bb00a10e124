//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, DocumentBuilder)
//! but are themselves concrete structs, not traits.

mod annotation;
mod bundle;
mod notes;

pub use annotation::{
    node_id, AnnotationService, MODEL_NODE, SBO_BIOCHEMICAL_REACTION, SBO_MODIFIER, SBO_TERM_MAX,
};
pub use bundle::{BundleService, LoadedBundle};
pub use notes::{NotesService, EVENT_LIST_INTRO};
