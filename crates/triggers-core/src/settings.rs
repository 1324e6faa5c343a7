//! Layered settings shared by global settings, repositories and triggers.
//!
//! Every level of the entity model owns one [`Settings`] layer. A delegated
//! attribute is resolved by walking the layers from the most specific to the
//! least specific and taking the first defined value, see [`first_defined`].

use crate::{Error, Result, Value};

pub const DEFAULT_STAGING_ARTIFACT_TYPE: &str = "zip";
pub const DEFAULT_VERSION_HISTORY_SIZE: u32 = 2;

/// Declaration key of a delegated attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    Group,
    BaseDirectory,
    ReleaseArtifact,
    StagingArtifact,
    StagingArtifactType,
    StagingArtifactPackaging,
    StagingTask,
    VersionHistorySize,
}

impl SettingKey {
    pub const ALL: [SettingKey; 8] = [
        SettingKey::Group,
        SettingKey::BaseDirectory,
        SettingKey::ReleaseArtifact,
        SettingKey::StagingArtifact,
        SettingKey::StagingArtifactType,
        SettingKey::StagingArtifactPackaging,
        SettingKey::StagingTask,
        SettingKey::VersionHistorySize,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SettingKey::Group => "group",
            SettingKey::BaseDirectory => "baseDirectory",
            SettingKey::ReleaseArtifact => "releaseArtifact",
            SettingKey::StagingArtifact => "stagingArtifact",
            SettingKey::StagingArtifactType => "stagingArtifactType",
            SettingKey::StagingArtifactPackaging => "stagingArtifactPackaging",
            SettingKey::StagingTask => "stagingTask",
            SettingKey::VersionHistorySize => "versionHistorySize",
        }
    }

    /// Look up a key by its declaration name.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == key)
    }
}

/// One layer of delegated attributes. Absent values defer to the next layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub group_id: Option<String>,
    pub base_directory: Option<String>,
    pub release_artifact_id: Option<String>,
    pub staging_artifact_id: Option<String>,
    pub staging_artifact_type: Option<String>,
    pub staging_artifact_packaging: Option<String>,
    pub staging_task: Option<String>,
    pub version_history_size: Option<u32>,
}

impl Settings {
    /// The root layer: everything absent except the built-in defaults.
    pub fn global_defaults() -> Self {
        Self {
            staging_artifact_type: Some(DEFAULT_STAGING_ARTIFACT_TYPE.to_string()),
            version_history_size: Some(DEFAULT_VERSION_HISTORY_SIZE),
            ..Self::default()
        }
    }

    /// Assign a declared value, coercing it to the attribute's type.
    ///
    /// `Null` removes the value from this layer so the parent value shows
    /// through again.
    pub fn assign(&mut self, key: SettingKey, value: &Value, path: &str) -> Result<()> {
        let field = key.as_str();
        let Some(slot) = self.text_slot(key) else {
            self.version_history_size = match value {
                Value::Null => None,
                Value::Integer(i) => Some(u32::try_from(*i).map_err(|_| {
                    Error::invalid(path, field, i.to_string(), "must be a non-negative integer")
                })?),
                Value::String(text) => Some(parse_version_history_size(path, text)?),
                other => {
                    return Err(Error::invalid(
                        path,
                        field,
                        other.to_string(),
                        format!("expected an integer or decimal text, got {}", other.type_name()),
                    ));
                }
            };
            return Ok(());
        };
        *slot = match value {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => {
                return Err(Error::invalid(
                    path,
                    field,
                    other.to_string(),
                    format!("expected a string, got {}", other.type_name()),
                ));
            }
        };
        Ok(())
    }

    /// Remove a value from this layer.
    pub fn clear(&mut self, key: SettingKey) {
        match self.text_slot(key) {
            Some(slot) => *slot = None,
            None => self.version_history_size = None,
        }
    }

    /// The storage of a string-valued attribute; `None` for numeric ones.
    fn text_slot(&mut self, key: SettingKey) -> Option<&mut Option<String>> {
        match key {
            SettingKey::Group => Some(&mut self.group_id),
            SettingKey::BaseDirectory => Some(&mut self.base_directory),
            SettingKey::ReleaseArtifact => Some(&mut self.release_artifact_id),
            SettingKey::StagingArtifact => Some(&mut self.staging_artifact_id),
            SettingKey::StagingArtifactType => Some(&mut self.staging_artifact_type),
            SettingKey::StagingArtifactPackaging => Some(&mut self.staging_artifact_packaging),
            SettingKey::StagingTask => Some(&mut self.staging_task),
            SettingKey::VersionHistorySize => None,
        }
    }
}

/// Parse a version history size given as decimal text. Surrounding
/// whitespace is rejected.
pub fn parse_version_history_size(path: &str, text: &str) -> Result<u32> {
    text.parse::<u32>().map_err(|e| {
        Error::invalid(
            path,
            SettingKey::VersionHistorySize.as_str(),
            text,
            format!("not a non-negative integer ({})", e),
        )
    })
}

/// Resolve an attribute over layers ordered from most to least specific.
pub fn first_defined<'a, T: ?Sized + 'a>(
    layers: &[&'a Settings],
    pick: impl Fn(&'a Settings) -> Option<&'a T>,
) -> Option<&'a T> {
    layers.iter().copied().find_map(pick)
}
