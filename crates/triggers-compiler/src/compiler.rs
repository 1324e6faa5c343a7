//! Compiles a trigger into its step graph.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};
use triggers_core::{
    Error, Result, Step, StepAction, StepKind, TriggerPipeline, TriggerView,
};

use crate::context::template_context;
use crate::resources::{
    BundledResources, EXECUTABLE_RESOURCES, ResourceSource, TEMPLATE_RESOURCES,
    WRAPPER_RESOURCES,
};
use crate::TriggerLayout;

/// Properties of the surrounding build that triggers pass through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectProperties {
    /// Root of every generated directory and archive.
    pub build_root: PathBuf,
    pub client_name: Option<String>,
    /// Release version the triggers deploy.
    pub release: Option<String>,
    pub system_name: Option<String>,
    pub tool_version: Option<String>,
}

impl ProjectProperties {
    pub fn new(build_root: impl Into<PathBuf>) -> Self {
        Self {
            build_root: build_root.into(),
            client_name: None,
            release: None,
            system_name: None,
            tool_version: Some(env!("CARGO_PKG_VERSION").to_string()),
        }
    }

    pub fn with_client_name(mut self, name: impl Into<String>) -> Self {
        self.client_name = Some(name.into());
        self
    }

    pub fn with_release(mut self, release: impl Into<String>) -> Self {
        self.release = Some(release.into());
        self
    }

    pub fn with_system_name(mut self, name: impl Into<String>) -> Self {
        self.system_name = Some(name.into());
        self
    }

    pub fn with_tool_version(mut self, version: Option<String>) -> Self {
        self.tool_version = version;
        self
    }
}

/// Turns resolved triggers into step graphs.
pub struct PipelineCompiler {
    properties: ProjectProperties,
    resources: Arc<dyn ResourceSource>,
}

impl PipelineCompiler {
    /// A compiler using the resources embedded in this crate.
    pub fn new(properties: ProjectProperties) -> Self {
        Self::with_resources(properties, Arc::new(BundledResources))
    }

    pub fn with_resources(properties: ProjectProperties, resources: Arc<dyn ResourceSource>) -> Self {
        Self {
            properties,
            resources,
        }
    }

    pub fn properties(&self) -> &ProjectProperties {
        &self.properties
    }

    pub fn resources(&self) -> &Arc<dyn ResourceSource> {
        &self.resources
    }

    pub fn layout(&self, trigger: &TriggerView<'_>) -> TriggerLayout {
        TriggerLayout::new(&self.properties.build_root, trigger)
    }

    /// Compile the five-step pipeline of one trigger.
    ///
    /// Fails with `ResourceMissing` if a resource the materialize steps need
    /// is not available, so a broken bundle surfaces before anything runs.
    pub fn compile(&self, trigger: &TriggerView<'_>) -> Result<TriggerPipeline> {
        for resource in WRAPPER_RESOURCES.iter().chain(TEMPLATE_RESOURCES.iter()) {
            if !self.resources.contains(resource) {
                return Err(Error::ResourceMissing {
                    path: trigger.path().to_string(),
                    resource: resource.to_string(),
                });
            }
        }

        let name = trigger.name();
        let layout = self.layout(trigger);
        let id = |kind: StepKind| kind.step_id(name);

        let materialize_fixed = Step {
            id: id(StepKind::MaterializeFixed),
            kind: StepKind::MaterializeFixed,
            needs: vec![],
            inputs: vec![],
            outputs: resource_paths(&layout.trigger_dir, &WRAPPER_RESOURCES),
            action: StepAction::Materialize {
                resources: to_strings(&WRAPPER_RESOURCES),
                destination: layout.trigger_dir.clone(),
                executables: to_strings(&EXECUTABLE_RESOURCES),
            },
        };

        let materialize_templates = Step {
            id: id(StepKind::MaterializeTemplates),
            kind: StepKind::MaterializeTemplates,
            needs: vec![],
            inputs: vec![],
            outputs: resource_paths(&layout.templates_dir, &TEMPLATE_RESOURCES),
            action: StepAction::Materialize {
                resources: to_strings(&TEMPLATE_RESOURCES),
                destination: layout.templates_dir.clone(),
                executables: vec![],
            },
        };

        let render = Step {
            id: id(StepKind::Render),
            kind: StepKind::Render,
            needs: vec![materialize_templates.id.clone()],
            inputs: vec![layout.templates_dir.clone()],
            outputs: vec![layout.trigger_dir.clone()],
            action: StepAction::Render {
                templates_dir: layout.templates_dir.clone(),
                output_dir: layout.trigger_dir.clone(),
                context: template_context(trigger, &self.properties),
            },
        };

        // The archive takes the whole trigger directory, wrapper included.
        let archive = Step {
            id: id(StepKind::Archive),
            kind: StepKind::Archive,
            needs: vec![render.id.clone(), materialize_fixed.id.clone()],
            inputs: vec![layout.trigger_dir.clone()],
            outputs: vec![layout.archive.clone()],
            action: StepAction::Archive {
                sources: vec![layout.trigger_dir.clone()],
                archive: layout.archive.clone(),
            },
        };

        let publish = Step {
            id: id(StepKind::Publish),
            kind: StepKind::Publish,
            needs: vec![archive.id.clone()],
            inputs: vec![layout.archive.clone()],
            outputs: vec![],
            action: StepAction::Publish {
                artifact: layout.archive.clone(),
                classifier: name.to_string(),
            },
        };

        let steps = vec![
            materialize_fixed,
            materialize_templates,
            render,
            archive,
            publish,
        ];
        for step in &steps {
            debug!(step = %step.id, needs = ?step.needs, "Compiled step");
        }

        let pipeline = TriggerPipeline::new(
            name.clone(),
            trigger.repository_name(),
            trigger.hostname(),
            steps,
        );
        info!(
            trigger = %name,
            archive = %layout.archive.display(),
            "Compiled trigger pipeline"
        );
        Ok(pipeline)
    }
}

fn resource_paths(root: &Path, resources: &[&str]) -> Vec<PathBuf> {
    resources.iter().map(|r| root.join(r)).collect()
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
