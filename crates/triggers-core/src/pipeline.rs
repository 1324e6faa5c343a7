//! Step graph definitions for a trigger build.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::model::ROOT;
use crate::{TemplateContext, TriggerName};

/// The fixed steps of a trigger pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "camelCase")]
pub enum StepKind {
    /// Copy the bundled build wrapper into the trigger directory.
    #[display("materializeFixed")]
    MaterializeFixed,
    /// Copy the bundled templates into the template staging directory.
    #[display("materializeTemplates")]
    MaterializeTemplates,
    #[display("render")]
    Render,
    #[display("archive")]
    Archive,
    #[display("publish")]
    Publish,
}

impl StepKind {
    /// Declaration order of the steps in every pipeline.
    pub const ORDER: [StepKind; 5] = [
        StepKind::MaterializeFixed,
        StepKind::MaterializeTemplates,
        StepKind::Render,
        StepKind::Archive,
        StepKind::Publish,
    ];

    /// Step identifier, unique across all triggers: `<kind>_<triggerName>`.
    pub fn step_id(self, trigger: &TriggerName) -> String {
        format!("{}_{}", self, trigger)
    }
}

/// What a step does when the executor runs it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StepAction {
    /// Copy bundled resources, preserving relative paths.
    #[serde(rename_all = "camelCase")]
    Materialize {
        resources: Vec<String>,
        destination: PathBuf,
        /// Resources to mark executable after copying.
        executables: Vec<String>,
    },
    /// Render every template in `templates_dir` into `output_dir`.
    #[serde(rename_all = "camelCase")]
    Render {
        templates_dir: PathBuf,
        output_dir: PathBuf,
        context: TemplateContext,
    },
    /// Pack the sources into one archive.
    Archive {
        sources: Vec<PathBuf>,
        archive: PathBuf,
    },
    /// Upload an artifact under a classifier.
    Publish { artifact: PathBuf, classifier: String },
}

/// A named step with its declared predecessors, inputs and outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: String,
    pub kind: StepKind,
    /// Identifiers of steps that must complete first.
    pub needs: Vec<String>,
    pub inputs: Vec<PathBuf>,
    pub outputs: Vec<PathBuf>,
    pub action: StepAction,
}

/// The compiled, immutable step graph of one trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerPipeline {
    trigger: TriggerName,
    repository: String,
    hostname: String,
    steps: Vec<Step>,
}

impl TriggerPipeline {
    pub fn new(
        trigger: TriggerName,
        repository: impl Into<String>,
        hostname: impl Into<String>,
        steps: Vec<Step>,
    ) -> Self {
        Self {
            trigger,
            repository: repository.into(),
            hostname: hostname.into(),
            steps,
        }
    }

    pub fn trigger(&self) -> &TriggerName {
        &self.trigger
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Entity path of the trigger, e.g. `triggers/arion/aiscalx10`.
    pub fn path(&self) -> String {
        format!("{}/{}/{}", ROOT, self.repository, self.hostname)
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn step(&self, kind: StepKind) -> Option<&Step> {
        self.steps.iter().find(|s| s.kind == kind)
    }

    /// Context map of the render step.
    pub fn render_context(&self) -> Option<&TemplateContext> {
        self.steps.iter().find_map(|s| match &s.action {
            StepAction::Render { context, .. } => Some(context),
            _ => None,
        })
    }

    /// Archive produced by the archive step.
    pub fn archive(&self) -> Option<&Path> {
        self.steps.iter().find_map(|s| match &s.action {
            StepAction::Archive { archive, .. } => Some(archive.as_path()),
            _ => None,
        })
    }

    /// Classifier the archive is published under.
    pub fn classifier(&self) -> Option<&str> {
        self.steps.iter().find_map(|s| match &s.action {
            StepAction::Publish { classifier, .. } => Some(classifier.as_str()),
            _ => None,
        })
    }

    /// True if every step only needs steps declared before it, which also
    /// rules out missing predecessors and cycles.
    pub fn is_ordered(&self) -> bool {
        let mut seen = HashSet::new();
        for step in &self.steps {
            if !step.needs.iter().all(|dep| seen.contains(dep.as_str())) {
                return false;
            }
            seen.insert(step.id.as_str());
        }
        true
    }
}
