//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{AnnotationService, BundleService};
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    bundle_service: BundleService,
    annotation_service: AnnotationService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);
        let bundle_service = BundleService::new(Arc::clone(&fs));
        let annotation_service = AnnotationService::new(Arc::clone(&settings));

        Self {
            settings,
            fs,
            bundle_service,
            annotation_service,
        }
    }

    pub fn bundle_service(&self) -> &BundleService {
        &self.bundle_service
    }

    pub fn annotation_service(&self) -> &AnnotationService {
        &self.annotation_service
    }
}
