//! Template context construction.
//!
//! The key set is fixed; every key is present in every context, with `None`
//! where nothing up the fallback chain defines a value.

use triggers_core::{TemplateContext, TriggerView};

use crate::ProjectProperties;

pub const BASE_DIRECTORY: &str = "baseDirectory";
pub const CLIENT_NAME: &str = "clientName";
pub const MAVEN_CONTEXT_URL: &str = "mavenContextUrl";
pub const MAVEN_REPO_KEY: &str = "mavenRepoKey";
pub const RELEASE: &str = "release";
pub const RELEASE_GROUP_ID: &str = "releaseGroupId";
pub const RELEASE_ARTIFACT_ID: &str = "releaseArtifactId";
pub const STAGING_GROUP_ID: &str = "stagingGroupId";
pub const STAGING_ARTIFACT_ID: &str = "stagingArtifactId";
pub const STAGING_ARTIFACT_TYPE: &str = "stagingArtifactType";
pub const STAGING_ARTIFACT_PACKAGING: &str = "stagingArtifactPackaging";
pub const STAGING_TASK_ARG: &str = "stagingTaskArg";
pub const SYSTEM_NAME: &str = "systemName";
pub const TOOL_VERSION: &str = "toolVersion";
pub const VERSION_HISTORY_SIZE: &str = "versionHistorySize";

/// Every key [`template_context`] produces.
pub const CONTEXT_KEYS: [&str; 15] = [
    BASE_DIRECTORY,
    CLIENT_NAME,
    MAVEN_CONTEXT_URL,
    MAVEN_REPO_KEY,
    RELEASE,
    RELEASE_GROUP_ID,
    RELEASE_ARTIFACT_ID,
    STAGING_GROUP_ID,
    STAGING_ARTIFACT_ID,
    STAGING_ARTIFACT_TYPE,
    STAGING_ARTIFACT_PACKAGING,
    STAGING_TASK_ARG,
    SYSTEM_NAME,
    TOOL_VERSION,
    VERSION_HISTORY_SIZE,
];

pub fn template_context(trigger: &TriggerView<'_>, properties: &ProjectProperties) -> TemplateContext {
    let mut ctx = TemplateContext::new();
    ctx.insert(BASE_DIRECTORY, trigger.base_directory());
    ctx.insert(CLIENT_NAME, properties.client_name.as_deref());
    ctx.insert(MAVEN_CONTEXT_URL, trigger.context_url());
    ctx.insert(MAVEN_REPO_KEY, trigger.repo_key());
    ctx.insert(RELEASE, properties.release.as_deref());
    ctx.insert(RELEASE_GROUP_ID, trigger.group_id());
    ctx.insert(RELEASE_ARTIFACT_ID, trigger.release_artifact_id());
    ctx.insert(STAGING_GROUP_ID, trigger.group_id());
    ctx.insert(STAGING_ARTIFACT_ID, trigger.staging_artifact_id());
    ctx.insert(STAGING_ARTIFACT_TYPE, trigger.staging_artifact_type());
    ctx.insert(
        STAGING_ARTIFACT_PACKAGING,
        Some(trigger.staging_artifact_packaging()),
    );
    ctx.insert(STAGING_TASK_ARG, trigger.staging_task());
    ctx.insert(SYSTEM_NAME, properties.system_name.as_deref());
    ctx.insert(TOOL_VERSION, properties.tool_version.as_deref());
    ctx.insert(
        VERSION_HISTORY_SIZE,
        Some(trigger.version_history_size().to_string()),
    );
    ctx
}

#[cfg(test)]
mod tests {
    use super::*;
    use triggers_core::GlobalSettings;

    fn model() -> GlobalSettings {
        let mut global = GlobalSettings::new();
        global.settings.group_id = Some("com.example".to_string());
        global.settings.release_artifact_id = Some("release".to_string());
        let repository = global.create_repository("brambolt").unwrap();
        repository.context_url = Some("https://repo.example/mvn".to_string());
        repository.create_trigger("brambolt").unwrap();
        global
    }

    #[test]
    fn test_every_key_is_present() {
        let global = model();
        let view = global.trigger("brambolt", "brambolt").unwrap();
        let ctx = template_context(&view, &ProjectProperties::new("build"));

        assert_eq!(ctx.len(), CONTEXT_KEYS.len());
        for key in CONTEXT_KEYS {
            assert!(ctx.contains_key(key), "missing {}", key);
        }
    }

    #[test]
    fn test_values_follow_fallback() {
        let global = model();
        let view = global.trigger("brambolt", "brambolt").unwrap();
        let properties = ProjectProperties::new("build")
            .with_client_name("acme")
            .with_release("1.4.0");
        let ctx = template_context(&view, &properties);

        assert_eq!(ctx.get(CLIENT_NAME), Some(Some("acme")));
        assert_eq!(ctx.get(RELEASE), Some(Some("1.4.0")));
        assert_eq!(ctx.get(MAVEN_CONTEXT_URL), Some(Some("https://repo.example/mvn")));
        assert_eq!(ctx.get(RELEASE_GROUP_ID), Some(Some("com.example")));
        assert_eq!(ctx.get(STAGING_GROUP_ID), Some(Some("com.example")));
        assert_eq!(ctx.get(RELEASE_ARTIFACT_ID), Some(Some("release")));
        assert_eq!(ctx.get(STAGING_ARTIFACT_TYPE), Some(Some("zip")));
        assert_eq!(ctx.get(STAGING_ARTIFACT_PACKAGING), Some(Some("brambolt")));
        assert_eq!(ctx.get(VERSION_HISTORY_SIZE), Some(Some("2")));
    }

    #[test]
    fn test_missing_values_are_explicit() {
        let global = model();
        let view = global.trigger("brambolt", "brambolt").unwrap();
        let ctx = template_context(&view, &ProjectProperties::new("build"));

        assert_eq!(ctx.get(CLIENT_NAME), Some(None));
        assert_eq!(ctx.get(SYSTEM_NAME), Some(None));
        assert_eq!(ctx.get(MAVEN_REPO_KEY), Some(None));
        assert_eq!(ctx.get(STAGING_TASK_ARG), Some(None));
        assert_eq!(ctx.get(BASE_DIRECTORY), Some(None));
    }
}
