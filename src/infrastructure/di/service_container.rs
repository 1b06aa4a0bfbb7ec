//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::RewriterService;
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::CitationRewriter;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);

        Self { settings, fs }
    }

    /// Build the rewriter service.
    ///
    /// # Errors
    /// Fails if the citation patterns do not compile.
    pub fn rewriter(&self) -> ApplicationResult<RewriterService> {
        let citations = CitationRewriter::new()?;
        Ok(RewriterService::new(Arc::clone(&self.fs), citations))
    }
}
