//! Bundle loading service
//!
//! Reads a JSON pathway bundle and builds the entity graph for it.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{EntityGraph, PathwayBundle};
use crate::infrastructure::traits::FileSystem;

/// A bundle together with its resolved entity graph.
#[derive(Debug)]
pub struct LoadedBundle {
    pub bundle: PathwayBundle,
    pub graph: EntityGraph,
}

impl LoadedBundle {
    /// Build the graph for an in-memory bundle.
    pub fn from_bundle(bundle: PathwayBundle) -> ApplicationResult<Self> {
        let graph = EntityGraph::from_records(&bundle.entities)?;
        Ok(Self { bundle, graph })
    }
}

/// Service for reading pathway bundles.
pub struct BundleService {
    fs: Arc<dyn FileSystem>,
}

impl BundleService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Load and resolve the bundle at `path`.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<LoadedBundle> {
        if !self.fs.exists(path) {
            return Err(ApplicationError::Bundle {
                path: path.to_path_buf(),
                message: "file not found".to_string(),
            });
        }
        let content = self.fs.read_to_string(path).with_path_context("read bundle", path)?;
        let bundle: PathwayBundle =
            serde_json::from_str(&content).map_err(|e| ApplicationError::Bundle {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        debug!(
            "loaded bundle: {} event(s), {} entity record(s), release {}",
            bundle.events.len(),
            bundle.entities.len(),
            bundle.db_version
        );
        LoadedBundle::from_bundle(bundle)
    }
}
