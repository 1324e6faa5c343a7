//! Generate command: materializes the bundled files of every trigger.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;
use triggers_compiler::materialize::materialize;
use triggers_compiler::{PipelineCompiler, ProjectProperties};
use triggers_core::{StepAction, TriggerPipeline};

pub async fn run(path: &Path, properties: ProjectProperties) -> Result<()> {
    let compiler = PipelineCompiler::new(properties);
    let resolution = super::load(path, &compiler)?;

    for pipeline in &resolution.pipelines {
        materialize_pipeline(&compiler, pipeline).await?;
    }
    println!(
        "Generated {} triggers under {}",
        resolution.trigger_count(),
        compiler.properties().build_root.display()
    );
    Ok(())
}

/// Run the materialize steps of one pipeline, in step order.
pub async fn materialize_pipeline(
    compiler: &PipelineCompiler,
    pipeline: &TriggerPipeline,
) -> Result<()> {
    let path = pipeline.path();
    for step in pipeline.steps() {
        if let StepAction::Materialize {
            resources,
            destination,
            executables,
        } = &step.action
        {
            materialize(
                compiler.resources().as_ref(),
                &path,
                resources,
                destination,
                executables,
            )
            .await
            .with_context(|| format!("Step {} failed", step.id))?;
        }
    }
    info!(trigger = %pipeline.trigger(), "Materialized trigger");
    Ok(())
}
