//! CLI command implementations.

pub mod generate;
pub mod plan;

use std::path::Path;

use anyhow::{Context, Result};
use triggers_compiler::{PipelineCompiler, ProjectProperties};
use triggers_config::{Resolution, resolve_file};

/// Resolve a declaration file, compiling every trigger.
pub fn load(path: &Path, compiler: &PipelineCompiler) -> Result<Resolution> {
    resolve_file(path, compiler)
        .with_context(|| format!("Failed to resolve {}", path.display()))
}

pub fn validate(path: &Path, properties: ProjectProperties) -> Result<()> {
    let compiler = PipelineCompiler::new(properties);
    let resolution = load(path, &compiler)?;
    println!(
        "Configuration is valid: {} repositories, {} triggers",
        resolution.settings.repositories().count(),
        resolution.trigger_count()
    );
    Ok(())
}
