//! Resolution of a declaration tree into the entity model.
//!
//! Each level is handled in two passes: setting nodes first, then child
//! entities. A node is a setting only when it carries a value and its name is
//! a key of that level; any other node declares an entity, so a bare `group`
//! is a host or repository named `group`. Every trigger is compiled as soon
//! as its block is resolved.

use std::path::Path;

use tracing::{debug, info};
use triggers_compiler::PipelineCompiler;
use triggers_core::model::ROOT;
use triggers_core::{
    Error, GlobalSettings, RepositoryEntry, SettingKey, Settings, TriggerPipeline, TriggerView,
    Value,
};

use crate::declaration::{Declaration, DeclarationNode, parse_declaration};
use crate::ConfigResult;

/// Repository-only keys.
const CONTEXT_URL: &str = "contextUrl";
const REPO_KEY: &str = "repoKey";

/// A fully resolved declaration: the entity model and one pipeline per trigger.
#[derive(Debug)]
pub struct Resolution {
    pub settings: GlobalSettings,
    /// In resolution order: repositories, then hosts, sorted by name.
    pub pipelines: Vec<TriggerPipeline>,
}

impl Resolution {
    /// Look up a pipeline by canonical trigger name.
    pub fn pipeline(&self, name: &str) -> Option<&TriggerPipeline> {
        self.pipelines.iter().find(|p| p.trigger().as_str() == name)
    }

    pub fn trigger_count(&self) -> usize {
        self.pipelines.len()
    }
}

/// Builds the entity model from a declaration, compiling triggers eagerly.
pub struct ConfigurationResolver<'c> {
    compiler: &'c PipelineCompiler,
}

impl<'c> ConfigurationResolver<'c> {
    pub fn new(compiler: &'c PipelineCompiler) -> Self {
        Self { compiler }
    }

    /// Resolve every `triggers` block of a declaration.
    ///
    /// Fails on the first error; no partial model is returned.
    pub fn resolve(&self, declaration: &Declaration) -> ConfigResult<Resolution> {
        let mut global = GlobalSettings::new();

        for block in &declaration.blocks {
            if block.has_values() {
                return Err(not_a_block(ROOT, block).into());
            }
        }
        let nodes: Vec<&DeclarationNode> = declaration
            .blocks
            .iter()
            .flat_map(|block| block.children())
            .collect();

        let (settings, repositories): (Vec<_>, Vec<_>) = nodes
            .into_iter()
            .partition(|node| node.has_values() && SettingKey::from_key(&node.name).is_some());

        for node in settings {
            apply_setting(&mut global.settings, ROOT, node)?;
        }

        // Triggers only read the global layer from here on.
        let defaults = global.settings.clone();
        let mut pipelines = Vec::new();

        for node in repositories {
            if node.has_values() {
                let err = match node.name.as_str() {
                    CONTEXT_URL | REPO_KEY => Error::invalid(
                        ROOT,
                        &node.name,
                        describe_values(node),
                        format!("{} is only valid inside a repository block", node.name),
                    ),
                    _ => not_a_block(ROOT, node),
                };
                return Err(err.into());
            }
            let repository = global.create_repository(&node.name)?;
            self.resolve_repository(&defaults, repository, node, &mut pipelines)?;
        }

        info!(
            repositories = global.repositories().count(),
            triggers = pipelines.len(),
            "Resolved trigger declarations"
        );
        Ok(Resolution {
            settings: global,
            pipelines,
        })
    }

    fn resolve_repository(
        &self,
        defaults: &Settings,
        repository: &mut RepositoryEntry,
        node: &DeclarationNode,
        pipelines: &mut Vec<TriggerPipeline>,
    ) -> ConfigResult<()> {
        let path = repository.path();
        let (settings, hosts): (Vec<_>, Vec<_>) = node
            .children()
            .iter()
            .partition(|child| child.has_values() && is_repository_setting(&child.name));

        for child in settings {
            let value = setting_value(&path, child)?;
            match child.name.as_str() {
                CONTEXT_URL => repository.context_url = string_value(&path, child, value)?,
                REPO_KEY => repository.repo_key = string_value(&path, child, value)?,
                _ => apply_setting(&mut repository.settings, &path, child)?,
            }
        }

        for host in hosts {
            if host.has_values() {
                return Err(not_a_block(&path, host).into());
            }

            let trigger = repository.create_trigger(&host.name)?;
            let trigger_path = trigger.path().to_string();
            for child in host.children() {
                if SettingKey::from_key(&child.name).is_none() {
                    return Err(Error::invalid(
                        &trigger_path,
                        &child.name,
                        describe_values(child),
                        "hosts only accept settings",
                    )
                    .into());
                }
                apply_setting(&mut trigger.settings, &trigger_path, child)?;
            }

            if let Some(trigger) = repository.trigger(&host.name) {
                let view = TriggerView::new(defaults, repository, trigger);
                pipelines.push(self.compiler.compile(&view)?);
            }
        }
        Ok(())
    }
}

/// Parse and resolve KDL text in one go.
pub fn resolve_triggers(kdl: &str, compiler: &PipelineCompiler) -> ConfigResult<Resolution> {
    let declaration = parse_declaration(kdl)?;
    ConfigurationResolver::new(compiler).resolve(&declaration)
}

/// Read, parse and resolve a declaration file.
pub fn resolve_file(path: &Path, compiler: &PipelineCompiler) -> ConfigResult<Resolution> {
    let kdl = std::fs::read_to_string(path)?;
    debug!(path = %path.display(), "Read trigger declaration");
    resolve_triggers(&kdl, compiler)
}

fn is_repository_setting(name: &str) -> bool {
    name == CONTEXT_URL || name == REPO_KEY || SettingKey::from_key(name).is_some()
}

fn apply_setting(settings: &mut Settings, path: &str, node: &DeclarationNode) -> ConfigResult<()> {
    let Some(key) = SettingKey::from_key(&node.name) else {
        return Err(Error::invalid(path, &node.name, describe_values(node), "unknown setting").into());
    };
    let value = setting_value(path, node)?;
    settings.assign(key, value, path)?;
    debug!(path = %path, key = %key.as_str(), value = %value, "Applied setting");
    Ok(())
}

/// The single argument of a setting node.
fn setting_value<'n>(path: &str, node: &'n DeclarationNode) -> ConfigResult<&'n Value> {
    match (node.arguments.as_slice(), node.properties.is_empty(), &node.children) {
        ([value], true, None) => Ok(value),
        _ => Err(Error::invalid(
            path,
            &node.name,
            describe_values(node),
            "settings take exactly one argument and no block",
        )
        .into()),
    }
}

fn string_value(path: &str, node: &DeclarationNode, value: &Value) -> ConfigResult<Option<String>> {
    match value {
        Value::String(s) => Ok(Some(s.clone())),
        Value::Null => Ok(None),
        other => Err(Error::invalid(
            path,
            &node.name,
            other.to_string(),
            format!("expected a string, got {}", other.type_name()),
        )
        .into()),
    }
}

/// Error for an entity node carrying a value instead of a block.
fn not_a_block(path: &str, node: &DeclarationNode) -> Error {
    let (value, type_name) = match node.first_value() {
        Some(value) => (value.to_string(), value.type_name()),
        None => (String::new(), "nothing"),
    };
    Error::invalid(
        path,
        &node.name,
        value,
        format!("must be configured with a block, got {}", type_name),
    )
}

fn describe_values(node: &DeclarationNode) -> String {
    let values: Vec<String> = node
        .arguments
        .iter()
        .map(|v| v.to_string())
        .chain(node.properties.iter().map(|(k, v)| format!("{}={}", k, v)))
        .collect();
    if values.is_empty() && node.children.is_some() {
        "{ ... }".to_string()
    } else {
        values.join(" ")
    }
}
