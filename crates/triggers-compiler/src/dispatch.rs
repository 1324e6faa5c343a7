//! Runs a single compiled step.
//!
//! Materialize steps are carried out here; the remaining steps are handed to
//! the collaborator responsible for them. Ordering steps is up to the caller.

use tracing::{error, info};
use triggers_core::collaborator::{ArtifactPublisher, Archiver, TemplateRenderer};
use triggers_core::{Result, Step, StepAction, TriggerPipeline};

use crate::ResourceSource;
use crate::materialize::materialize;

/// Everything a step may need to run.
pub struct Collaborators<'a> {
    pub resources: &'a dyn ResourceSource,
    pub renderer: &'a dyn TemplateRenderer,
    pub archiver: &'a dyn Archiver,
    pub publisher: &'a dyn ArtifactPublisher,
}

/// Run `step`, one of the steps of `pipeline`.
pub async fn run_step(
    pipeline: &TriggerPipeline,
    step: &Step,
    collaborators: &Collaborators<'_>,
) -> Result<()> {
    info!(trigger = %pipeline.trigger(), step = %step.id, kind = %step.kind, "Running step");

    let result = match &step.action {
        StepAction::Materialize {
            resources,
            destination,
            executables,
        } => {
            materialize(
                collaborators.resources,
                &pipeline.path(),
                resources,
                destination,
                executables,
            )
            .await
        }
        StepAction::Render {
            templates_dir,
            output_dir,
            context,
        } => {
            collaborators
                .renderer
                .render(templates_dir, output_dir, context)
                .await
        }
        StepAction::Archive { sources, archive } => {
            collaborators.archiver.archive(sources, archive).await
        }
        StepAction::Publish {
            artifact,
            classifier,
        } => collaborators.publisher.publish(artifact, classifier).await,
    };

    if let Err(e) = &result {
        error!(step = %step.id, error = %e, "Step failed");
    }
    result
}
