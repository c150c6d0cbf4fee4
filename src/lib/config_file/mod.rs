//! root file for the crate where the datastructures that holds the TOML
//! parsed data of the targets manifests lives.
pub mod module;
pub mod target;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use self::{module::ModuleAttribute, target::TargetAttribute};

/// ```rust
/// use cmakeforge::config_file::{self, ManifestFile, target::TargetAttribute};
/// use cmakeforge::domain::target::TargetKind;
/// use cmakeforge::utils::constants::CONFIG_FILE_MOCK;
///
/// let config: ManifestFile = config_file::manifest_from_str(CONFIG_FILE_MOCK)
///     .expect("A failure happened parsing the targets manifest");
///
/// assert_eq!(config.module.name, "engine");
///
/// // Declaration order is preserved
/// let names: Vec<&str> = config.targets.keys().map(String::as_str).collect();
/// assert_eq!(names, vec!["platform", "core", "app"]);
///
/// let core: &TargetAttribute = config.targets.get("core")
///     .expect("Target named 'core' not found on the manifest");
/// assert_eq!(core.kind, Some(TargetKind::StaticLib));
/// assert_eq!(core.dependencies, vec!["platform"]);
/// assert_eq!(core.flags, vec!["exceptions"]);
///
/// let app = config.targets.get("app").unwrap();
/// assert_eq!(app.kind.unwrap_or_default(), TargetKind::Executable);
/// assert_eq!(app.resources[0].destination, "assets");
/// ```
/// The [`ManifestFile`] is the type that holds the whole hierarchy
/// of a `targets.toml` manifest
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct ManifestFile {
    pub module: ModuleAttribute,
    #[serde(default)]
    pub targets: IndexMap<String, TargetAttribute>,
}

pub fn manifest_from_str(cfg: &str) -> Result<ManifestFile, toml::de::Error> {
    toml::from_str(cfg)
}
