//! Bundled build-wrapper and template resources.
//!
//! The files under `resources/` are embedded into the binary at compile time.
//! Their relative paths are part of the output contract: generated trigger
//! projects expect them exactly where they are listed here.

use std::borrow::Cow;

use rust_embed::RustEmbed;

/// Build wrapper copied into every trigger directory.
pub const WRAPPER_RESOURCES: [&str; 4] = [
    "gradlew",
    "gradlew.bat",
    "gradle/wrapper/gradle-wrapper.jar",
    "gradle/wrapper/gradle-wrapper.properties",
];

/// Wrapper resources that must be executable after copying.
pub const EXECUTABLE_RESOURCES: [&str; 1] = ["gradlew"];

/// Templates copied into every template staging directory.
pub const TEMPLATE_RESOURCES: [&str; 3] = [
    "build.gradle.vtl",
    "gradle.properties.vtl",
    "settings.gradle.vtl",
];

/// Where resource bytes come from.
pub trait ResourceSource: Send + Sync {
    /// Contents of the resource at `path`, or `None` if it is not bundled.
    fn load(&self, path: &str) -> Option<Cow<'static, [u8]>>;

    fn contains(&self, path: &str) -> bool {
        self.load(path).is_some()
    }
}

/// Resources embedded from the crate's `resources/` directory.
#[derive(RustEmbed)]
#[folder = "resources/"]
pub struct BundledResources;

impl ResourceSource for BundledResources {
    fn load(&self, path: &str) -> Option<Cow<'static, [u8]>> {
        <BundledResources as RustEmbed>::get(path).map(|file| file.data)
    }
}
