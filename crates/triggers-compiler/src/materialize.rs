//! Copies bundled resources into a trigger's directories.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;
use triggers_core::{Error, Result};

use crate::ResourceSource;

/// Copy `resources` under `destination`, keeping their relative paths, then
/// mark `executables` executable. The first failure aborts the copy.
///
/// `path` is the entity path of the trigger being materialized, reported in
/// errors.
pub async fn materialize(
    source: &dyn ResourceSource,
    path: &str,
    resources: &[String],
    destination: &Path,
    executables: &[String],
) -> Result<()> {
    for resource in resources {
        copy_resource(source, path, resource, destination).await?;
    }
    for resource in executables {
        make_executable(path, resource, &destination.join(resource)).await?;
    }
    Ok(())
}

async fn copy_resource(
    source: &dyn ResourceSource,
    path: &str,
    resource: &str,
    destination: &Path,
) -> Result<PathBuf> {
    let data = source.load(resource).ok_or_else(|| Error::ResourceMissing {
        path: path.to_string(),
        resource: resource.to_string(),
    })?;
    let target = destination.join(resource);
    let copy_failed = |err| Error::CopyFailed {
        path: path.to_string(),
        resource: resource.to_string(),
        destination: target.clone(),
        source: err,
    };

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).await.map_err(copy_failed)?;
    }
    fs::write(&target, data.as_ref()).await.map_err(copy_failed)?;
    debug!(trigger = %path, resource = %resource, destination = %target.display(), "Copied resource");
    Ok(target)
}

#[cfg(unix)]
async fn make_executable(path: &str, resource: &str, file: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(file, std::fs::Permissions::from_mode(0o755))
        .await
        .map_err(|source| Error::CopyFailed {
            path: path.to_string(),
            resource: resource.to_string(),
            destination: file.to_path_buf(),
            source,
        })
}

#[cfg(not(unix))]
async fn make_executable(_path: &str, _resource: &str, _file: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BundledResources;
    use crate::resources::{TEMPLATE_RESOURCES, WRAPPER_RESOURCES};
    use std::borrow::Cow;
    use triggers_core::ErrorKind;

    const TRIGGER: &str = "triggers/arion/aiscalx10";

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_materialize_wrapper() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("triggers/arion/aiscalx10");

        materialize(
            &BundledResources,
            TRIGGER,
            &strings(&WRAPPER_RESOURCES),
            &dest,
            &strings(&["gradlew"]),
        )
        .await
        .unwrap();

        for resource in WRAPPER_RESOURCES {
            assert!(dest.join(resource).is_file(), "{} not copied", resource);
        }
        let jar = std::fs::read(dest.join("gradle/wrapper/gradle-wrapper.jar")).unwrap();
        assert_eq!(
            jar,
            BundledResources
                .load("gradle/wrapper/gradle-wrapper.jar")
                .unwrap()
                .as_ref()
        );

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(dest.join("gradlew"))
                .unwrap()
                .permissions()
                .mode();
            assert_eq!(mode & 0o111, 0o111);
        }
    }

    #[tokio::test]
    async fn test_materialize_overwrites_existing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("settings.gradle.vtl"), "stale").unwrap();

        materialize(
            &BundledResources,
            TRIGGER,
            &strings(&TEMPLATE_RESOURCES),
            dir.path(),
            &[],
        )
        .await
        .unwrap();

        let content = std::fs::read_to_string(dir.path().join("settings.gradle.vtl")).unwrap();
        assert_ne!(content, "stale");
    }

    struct EmptyBundle;

    impl ResourceSource for EmptyBundle {
        fn load(&self, _path: &str) -> Option<Cow<'static, [u8]>> {
            None
        }
    }

    #[tokio::test]
    async fn test_missing_resource() {
        let dir = tempfile::tempdir().unwrap();
        let err = materialize(&EmptyBundle, TRIGGER, &strings(&["gradlew"]), dir.path(), &[])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResourceMissing);
        assert!(err.to_string().contains("triggers/arion/aiscalx10"));
        assert!(!dir.path().join("gradlew").exists());
    }

    #[tokio::test]
    async fn test_unwritable_destination() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where a directory is needed.
        let blocker = dir.path().join("triggers");
        std::fs::write(&blocker, "not a directory").unwrap();

        let err = materialize(
            &BundledResources,
            TRIGGER,
            &strings(&["gradle/wrapper/gradle-wrapper.properties"]),
            &blocker,
            &[],
        )
        .await
        .unwrap_err();
        match err {
            Error::CopyFailed {
                path,
                resource,
                destination,
                ..
            } => {
                assert_eq!(path, TRIGGER);
                assert_eq!(resource, "gradle/wrapper/gradle-wrapper.properties");
                assert!(destination.starts_with(&blocker));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
