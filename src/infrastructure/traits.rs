//! I/O boundary traits for testability
//!
//! These traits abstract the filesystem and the document being annotated,
//! allowing services to be tested with in-memory implementations.

use std::io;
use std::path::Path;

use crate::domain::{CvTerm, History, MarkupFragment};

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write string content to file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Target document receiving notes and annotations.
///
/// Nodes are addressed by their document id (model, species, reaction or
/// species reference id). Implementations create nodes on first use.
pub trait DocumentBuilder {
    /// Append a parsed notes block to the node.
    fn append_notes(&mut self, node: &str, notes: MarkupFragment);

    /// Attach a qualifier-tagged list of resource URIs.
    fn add_cv_term(&mut self, node: &str, term: CvTerm);

    /// Set creators and created/modified dates.
    fn set_history(&mut self, node: &str, history: History);

    /// Set the Systems Biology Ontology term.
    fn set_sbo_term(&mut self, node: &str, term: u32);

    /// Set the stoichiometry of a species reference.
    fn set_stoichiometry(&mut self, node: &str, stoichiometry: u32);
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
