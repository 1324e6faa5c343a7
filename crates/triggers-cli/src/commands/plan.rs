//! Plan command.

use std::fmt::Write;
use std::path::Path;

use anyhow::{Context, Result};
use triggers_compiler::{PipelineCompiler, ProjectProperties};
use triggers_core::{StepAction, TriggerPipeline};

pub fn run(path: &Path, properties: ProjectProperties, json: bool) -> Result<()> {
    let compiler = PipelineCompiler::new(properties);
    let resolution = super::load(path, &compiler)?;

    if json {
        let out = serde_json::to_string_pretty(&resolution.pipelines)
            .context("Failed to serialize pipelines")?;
        println!("{}", out);
    } else {
        for pipeline in &resolution.pipelines {
            print!("{}", describe(pipeline));
        }
    }
    Ok(())
}

/// Human-readable listing of one pipeline.
pub fn describe(pipeline: &TriggerPipeline) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({}/{})",
        pipeline.trigger(),
        pipeline.repository(),
        pipeline.hostname()
    );
    for step in pipeline.steps() {
        let needs = if step.needs.is_empty() {
            "-".to_string()
        } else {
            step.needs.join(", ")
        };
        let _ = writeln!(out, "  {:<22} needs {}", step.kind.to_string(), needs);
        match &step.action {
            StepAction::Materialize {
                resources,
                destination,
                ..
            } => {
                let _ = writeln!(
                    out,
                    "    {} files -> {}",
                    resources.len(),
                    destination.display()
                );
            }
            StepAction::Render {
                templates_dir,
                output_dir,
                context,
            } => {
                let _ = writeln!(
                    out,
                    "    {} -> {}",
                    templates_dir.display(),
                    output_dir.display()
                );
                for (key, value) in context.iter() {
                    let _ = writeln!(out, "      {} = {}", key, value.unwrap_or("<none>"));
                }
            }
            StepAction::Archive { archive, .. } => {
                let _ = writeln!(out, "    -> {}", archive.display());
            }
            StepAction::Publish {
                artifact,
                classifier,
            } => {
                let _ = writeln!(out, "    {} as {}", artifact.display(), classifier);
            }
        }
    }
    out
}
