//! The three-level entity model: global settings, repositories, triggers.
//!
//! Ownership runs downwards only. Attribute delegation upwards goes through
//! [`TriggerView`], which borrows the whole chain for the duration of a lookup.

use std::collections::BTreeMap;

use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::settings::{DEFAULT_VERSION_HISTORY_SIZE, first_defined, parse_version_history_size};
use crate::{EntityKind, Error, Result, Settings};

/// Name of the root declaration block, also the root of entity paths.
pub const ROOT: &str = "triggers";

/// Canonical trigger name: repository name followed by the capitalized hostname.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)]
#[display("{_0}")]
pub struct TriggerName(String);

impl TriggerName {
    pub fn new(repository: &str, hostname: &str) -> Self {
        let mut chars = hostname.chars();
        let capitalized: String = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
        Self(format!("{}{}", repository, capitalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Settings shared by every repository, and the repositories themselves.
#[derive(Debug, Clone)]
pub struct GlobalSettings {
    /// Root layer of the attribute fallback chain.
    pub settings: Settings,
    repositories: BTreeMap<String, RepositoryEntry>,
}

impl GlobalSettings {
    pub fn new() -> Self {
        Self {
            settings: Settings::global_defaults(),
            repositories: BTreeMap::new(),
        }
    }

    /// Register a repository. Fails without touching the model if the name is taken.
    pub fn create_repository(&mut self, name: &str) -> Result<&mut RepositoryEntry> {
        check_name(ROOT, name)?;
        if self.repositories.contains_key(name) {
            return Err(Error::DuplicateEntity {
                parent: ROOT.to_string(),
                kind: EntityKind::Repository,
                name: name.to_string(),
            });
        }
        debug!(repository = %name, "Created repository");
        Ok(self
            .repositories
            .entry(name.to_string())
            .or_insert_with(|| RepositoryEntry::new(name)))
    }

    pub fn repository(&self, name: &str) -> Option<&RepositoryEntry> {
        self.repositories.get(name)
    }

    pub fn repository_mut(&mut self, name: &str) -> Option<&mut RepositoryEntry> {
        self.repositories.get_mut(name)
    }

    pub fn repositories(&self) -> impl Iterator<Item = &RepositoryEntry> {
        self.repositories.values()
    }

    /// Resolution view of one trigger.
    pub fn trigger(&self, repository: &str, hostname: &str) -> Option<TriggerView<'_>> {
        let repository = self.repositories.get(repository)?;
        let trigger = repository.trigger(hostname)?;
        Some(TriggerView::new(&self.settings, repository, trigger))
    }

    /// Resolution views of every trigger, ordered by repository then hostname.
    pub fn triggers(&self) -> impl Iterator<Item = TriggerView<'_>> {
        self.repositories.values().flat_map(move |repository| {
            repository
                .triggers()
                .map(move |trigger| TriggerView::new(&self.settings, repository, trigger))
        })
    }
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self::new()
    }
}

/// A named repository and the hosts it builds triggers for.
#[derive(Debug, Clone)]
pub struct RepositoryEntry {
    name: String,
    /// Artifact repository context URL.
    pub context_url: Option<String>,
    /// Artifact repository key.
    pub repo_key: Option<String>,
    /// Repository layer of the attribute fallback chain.
    pub settings: Settings,
    triggers: BTreeMap<String, TriggerEntry>,
}

impl RepositoryEntry {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            context_url: None,
            repo_key: None,
            settings: Settings::default(),
            triggers: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entity path used in error reports, e.g. `triggers/arion`.
    pub fn path(&self) -> String {
        format!("{}/{}", ROOT, self.name)
    }

    /// Register a host. Fails without touching the model if the host is taken.
    pub fn create_trigger(&mut self, hostname: &str) -> Result<&mut TriggerEntry> {
        check_name(&self.path(), hostname)?;
        if self.triggers.contains_key(hostname) {
            return Err(Error::DuplicateEntity {
                parent: self.name.clone(),
                kind: EntityKind::Host,
                name: hostname.to_string(),
            });
        }
        debug!(repository = %self.name, host = %hostname, "Created trigger");
        let repository = self.name.clone();
        Ok(self
            .triggers
            .entry(hostname.to_string())
            .or_insert_with(|| TriggerEntry::new(&repository, hostname)))
    }

    pub fn trigger(&self, hostname: &str) -> Option<&TriggerEntry> {
        self.triggers.get(hostname)
    }

    pub fn trigger_mut(&mut self, hostname: &str) -> Option<&mut TriggerEntry> {
        self.triggers.get_mut(hostname)
    }

    pub fn triggers(&self) -> impl Iterator<Item = &TriggerEntry> {
        self.triggers.values()
    }
}

/// One (repository, host) pair.
#[derive(Debug, Clone)]
pub struct TriggerEntry {
    hostname: String,
    name: TriggerName,
    path: String,
    /// Trigger layer of the attribute fallback chain.
    pub settings: Settings,
}

impl TriggerEntry {
    fn new(repository: &str, hostname: &str) -> Self {
        Self {
            hostname: hostname.to_string(),
            name: TriggerName::new(repository, hostname),
            path: format!("{}/{}/{}", ROOT, repository, hostname),
            settings: Settings::default(),
        }
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn name(&self) -> &TriggerName {
        &self.name
    }

    /// Entity path used in error reports, e.g. `triggers/arion/aiscalx10`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Override the version history size; `None` restores the inherited value.
    pub fn set_version_history_size(&mut self, size: Option<u32>) {
        self.settings.version_history_size = size;
    }

    pub fn set_version_history_size_text(&mut self, text: &str) -> Result<()> {
        let size = parse_version_history_size(&self.path, text)?;
        self.settings.version_history_size = Some(size);
        Ok(())
    }
}

/// Read-only view of a trigger with its owners, resolving delegated attributes.
#[derive(Debug, Clone, Copy)]
pub struct TriggerView<'a> {
    global: &'a Settings,
    repository: &'a RepositoryEntry,
    trigger: &'a TriggerEntry,
}

impl<'a> TriggerView<'a> {
    pub fn new(
        global: &'a Settings,
        repository: &'a RepositoryEntry,
        trigger: &'a TriggerEntry,
    ) -> Self {
        Self {
            global,
            repository,
            trigger,
        }
    }

    fn lookup<T: ?Sized>(&self, pick: impl Fn(&'a Settings) -> Option<&'a T>) -> Option<&'a T> {
        first_defined(
            &[&self.trigger.settings, &self.repository.settings, self.global],
            pick,
        )
    }

    pub fn name(&self) -> &'a TriggerName {
        &self.trigger.name
    }

    pub fn hostname(&self) -> &'a str {
        &self.trigger.hostname
    }

    pub fn repository_name(&self) -> &'a str {
        &self.repository.name
    }

    pub fn path(&self) -> &'a str {
        &self.trigger.path
    }

    pub fn context_url(&self) -> Option<&'a str> {
        self.repository.context_url.as_deref()
    }

    pub fn repo_key(&self) -> Option<&'a str> {
        self.repository.repo_key.as_deref()
    }

    pub fn base_directory(&self) -> Option<&'a str> {
        self.lookup(|s| s.base_directory.as_deref())
    }

    pub fn group_id(&self) -> Option<&'a str> {
        self.lookup(|s| s.group_id.as_deref())
    }

    pub fn release_artifact_id(&self) -> Option<&'a str> {
        self.lookup(|s| s.release_artifact_id.as_deref())
    }

    pub fn staging_artifact_id(&self) -> Option<&'a str> {
        self.lookup(|s| s.staging_artifact_id.as_deref())
    }

    pub fn staging_artifact_type(&self) -> Option<&'a str> {
        self.lookup(|s| s.staging_artifact_type.as_deref())
    }

    /// Explicit packaging anywhere up the chain, otherwise the hostname.
    pub fn staging_artifact_packaging(&self) -> &'a str {
        self.lookup(|s| s.staging_artifact_packaging.as_deref())
            .unwrap_or(&self.trigger.hostname)
    }

    pub fn staging_task(&self) -> Option<&'a str> {
        self.lookup(|s| s.staging_task.as_deref())
    }

    pub fn version_history_size(&self) -> u32 {
        self.lookup(|s| s.version_history_size.as_ref())
            .copied()
            .unwrap_or(DEFAULT_VERSION_HISTORY_SIZE)
    }
}

fn check_name(parent: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::invalid(
            parent,
            "name",
            format!("{:?}", name),
            "entity names must not be empty",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, SettingKey};

    #[test]
    fn test_canonical_name() {
        assert_eq!(TriggerName::new("arion", "aiscalx10").as_str(), "arionAiscalx10");
        assert_eq!(TriggerName::new("brambolt", "brambolt").as_str(), "bramboltBrambolt");
        assert_eq!(TriggerName::new("repo", "Host").as_str(), "repoHost");
        assert_eq!(TriggerName::new("repo", "10x").as_str(), "repo10x");
    }

    #[test]
    fn test_duplicate_repository_is_rejected() {
        let mut global = GlobalSettings::new();
        global.create_repository("arion").unwrap().context_url = Some("u".to_string());

        let err = global.create_repository("arion").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateEntity);
        assert!(err.to_string().contains("arion"));
        // The existing entry is untouched.
        assert_eq!(
            global.repository("arion").unwrap().context_url.as_deref(),
            Some("u")
        );
    }

    #[test]
    fn test_duplicate_host_is_rejected() {
        let mut global = GlobalSettings::new();
        let repository = global.create_repository("brambolt").unwrap();
        repository
            .create_trigger("brambolt")
            .unwrap()
            .set_version_history_size(Some(7));

        match repository.create_trigger("brambolt").unwrap_err() {
            Error::DuplicateEntity { parent, kind, name } => {
                assert_eq!(parent, "brambolt");
                assert_eq!(kind, EntityKind::Host);
                assert_eq!(name, "brambolt");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(repository.triggers().count(), 1);
        assert_eq!(
            repository.trigger("brambolt").unwrap().settings.version_history_size,
            Some(7)
        );
    }

    #[test]
    fn test_empty_names_are_rejected() {
        let mut global = GlobalSettings::new();
        let err = global.create_repository("").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
        let err = global
            .create_repository("arion")
            .unwrap()
            .create_trigger(" ")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
    }

    #[test]
    fn test_bare_trigger_inherits_everything() {
        let mut global = GlobalSettings::new();
        global.settings.group_id = Some("com.example".to_string());
        global.settings.staging_task = Some("stage".to_string());
        global.settings.base_directory = Some("/opt/deploy".to_string());
        let repository = global.create_repository("brambolt").unwrap();
        repository.context_url = Some("https://repo.example/mvn".to_string());
        repository.create_trigger("brambolt").unwrap();

        let view = global.trigger("brambolt", "brambolt").unwrap();
        assert_eq!(view.name().as_str(), "bramboltBrambolt");
        assert_eq!(view.group_id(), Some("com.example"));
        assert_eq!(view.staging_task(), Some("stage"));
        assert_eq!(view.base_directory(), Some("/opt/deploy"));
        assert_eq!(view.staging_artifact_type(), Some("zip"));
        assert_eq!(view.staging_artifact_packaging(), "brambolt");
        assert_eq!(view.version_history_size(), 2);
        assert_eq!(view.context_url(), Some("https://repo.example/mvn"));
        assert_eq!(view.repo_key(), None);
    }

    #[test]
    fn test_three_level_fallback() {
        let mut global = GlobalSettings::new();
        global.settings.version_history_size = Some(2);
        global.settings.staging_artifact_id = Some("global".to_string());
        let repository = global.create_repository("arion").unwrap();
        repository.settings.staging_artifact_id = Some("repository".to_string());
        repository.settings.version_history_size = Some(3);
        repository.create_trigger("aiscalx10").unwrap();

        assert_eq!(
            global.trigger("arion", "aiscalx10").unwrap().version_history_size(),
            3
        );

        let trigger = global
            .repository_mut("arion")
            .and_then(|r| r.trigger_mut("aiscalx10"))
            .unwrap();
        trigger.set_version_history_size_text("9").unwrap();
        trigger.settings.staging_artifact_id = Some("trigger".to_string());
        let view = global.trigger("arion", "aiscalx10").unwrap();
        assert_eq!(view.version_history_size(), 9);
        assert_eq!(view.staging_artifact_id(), Some("trigger"));

        let trigger = global
            .repository_mut("arion")
            .and_then(|r| r.trigger_mut("aiscalx10"))
            .unwrap();
        trigger.set_version_history_size(None);
        trigger.settings.clear(SettingKey::StagingArtifact);
        let view = global.trigger("arion", "aiscalx10").unwrap();
        assert_eq!(view.version_history_size(), 3);
        assert_eq!(view.staging_artifact_id(), Some("repository"));

        global.repository_mut("arion").unwrap().settings = Settings::default();
        let view = global.trigger("arion", "aiscalx10").unwrap();
        assert_eq!(view.version_history_size(), 2);
        assert_eq!(view.staging_artifact_id(), Some("global"));
    }

    #[test]
    fn test_packaging_override_beats_hostname() {
        let mut global = GlobalSettings::new();
        global.settings.staging_artifact_packaging = Some("tar".to_string());
        global
            .create_repository("arion")
            .unwrap()
            .create_trigger("tiscals11")
            .unwrap();
        let view = global.trigger("arion", "tiscals11").unwrap();
        assert_eq!(view.staging_artifact_packaging(), "tar");
    }

    #[test]
    fn test_invalid_text_override_leaves_value() {
        let mut global = GlobalSettings::new();
        let trigger = global
            .create_repository("brambolt")
            .unwrap()
            .create_trigger("brambolt")
            .unwrap();
        let err = trigger.set_version_history_size_text("abc").unwrap_err();
        assert!(err.to_string().contains("versionHistorySize"));
        assert!(err.to_string().contains("abc"));
        assert_eq!(trigger.settings.version_history_size, None);
    }

    #[test]
    fn test_triggers_iterate_in_order() {
        let mut global = GlobalSettings::new();
        let arion = global.create_repository("arion").unwrap();
        arion.create_trigger("tiscals11").unwrap();
        arion.create_trigger("aiscalx10").unwrap();
        global
            .create_repository("brambolt")
            .unwrap()
            .create_trigger("brambolt")
            .unwrap();

        let names: Vec<_> = global.triggers().map(|t| t.name().to_string()).collect();
        assert_eq!(
            names,
            vec!["arionAiscalx10", "arionTiscals11", "bramboltBrambolt"]
        );
    }
}
