//! Filesystem layout of a trigger build.

use std::path::{Path, PathBuf};

use triggers_core::{TriggerName, TriggerView};

const TRIGGERS_DIR: &str = "triggers";
const TEMPLATES_DIR: &str = "vtl";
const DISTRIBUTIONS_DIR: &str = "distributions";

/// Directories and files one trigger reads and writes under the build root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerLayout {
    /// `<buildRoot>/triggers/<repository>/<hostname>`
    pub trigger_dir: PathBuf,
    /// `<buildRoot>/vtl/<repository>/<hostname>`
    pub templates_dir: PathBuf,
    /// `<buildRoot>/distributions/<triggerName>.zip`
    pub archive: PathBuf,
}

impl TriggerLayout {
    pub fn new(build_root: &Path, trigger: &TriggerView<'_>) -> Self {
        let relative = Path::new(trigger.repository_name()).join(trigger.hostname());
        Self {
            trigger_dir: build_root.join(TRIGGERS_DIR).join(&relative),
            templates_dir: build_root.join(TEMPLATES_DIR).join(&relative),
            archive: build_root
                .join(DISTRIBUTIONS_DIR)
                .join(archive_file_name(trigger.name())),
        }
    }
}

pub fn archive_file_name(trigger: &TriggerName) -> String {
    format!("{}.zip", trigger)
}

#[cfg(test)]
mod tests {
    use super::*;
    use triggers_core::GlobalSettings;

    #[test]
    fn test_layout_paths() {
        let mut global = GlobalSettings::new();
        global
            .create_repository("arion")
            .unwrap()
            .create_trigger("aiscalx10")
            .unwrap();
        let view = global.trigger("arion", "aiscalx10").unwrap();

        let layout = TriggerLayout::new(Path::new("/work/build"), &view);
        assert_eq!(
            layout.trigger_dir,
            PathBuf::from("/work/build/triggers/arion/aiscalx10")
        );
        assert_eq!(
            layout.templates_dir,
            PathBuf::from("/work/build/vtl/arion/aiscalx10")
        );
        assert_eq!(
            layout.archive,
            PathBuf::from("/work/build/distributions/arionAiscalx10.zip")
        );
    }
}
