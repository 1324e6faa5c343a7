//! Collaborators that carry out the render, archive and publish steps.
//!
//! The step graph only declares what these do; implementations live with the
//! build-graph executor that runs the steps.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::{Result, TemplateContext};

/// Renders a directory of templates with a context map.
#[async_trait]
pub trait TemplateRenderer: Send + Sync {
    /// Render every file in `templates_dir` into `output_dir`. Keys whose
    /// value is `None` are undefined substitutions, not errors.
    async fn render(
        &self,
        templates_dir: &Path,
        output_dir: &Path,
        context: &TemplateContext,
    ) -> Result<()>;
}

/// Produces one archive from a list of files and directories.
#[async_trait]
pub trait Archiver: Send + Sync {
    async fn archive(&self, sources: &[PathBuf], archive: &Path) -> Result<()>;
}

/// Uploads an artifact to an artifact repository.
#[async_trait]
pub trait ArtifactPublisher: Send + Sync {
    async fn publish(&self, artifact: &Path, classifier: &str) -> Result<()>;
}
