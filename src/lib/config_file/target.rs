//! Type for holds the Targets declarations of a manifest

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::domain::target::TargetKind;

/// [`TargetAttribute`] - The type for holding the declaration of every
/// target of a module
/// * `kind` - Which type of byproduct will be generated (binary, library...)
/// * `sources` - Groups of source files, each one relative to its own root. Files
///   may be glob patterns
/// * `dependencies` - Other targets this one depends on, by short or qualified name
/// * `include_dirs` - Include directories only used to compile this target
/// * `public_include_dirs` - Include directories also used by the dependents
/// * `defines` - Private preprocessor definitions
/// * `libs` - Prebuilt libraries, or CMake variables like `${OPENGL_LIBRARY}`,
///   that the dependents must link against
/// * `frameworks` - Named system libraries looked up at generation time
/// * `dlls` - Binaries staged next to the outputs of every dependent
/// * `resources` - Folders copied next to the output after building
/// * `precompiled_header` - The optional precompiled header
/// * `flags` - Abstract capability flags, like `exceptions`
///
/// ### Tests
///
/// ```rust
/// use cmakeforge::config_file::target::TargetAttribute;
/// use cmakeforge::domain::target::TargetKind;
///
/// const CONFIG_FILE_MOCK: &str = r#"
///     #[targets.core]
///     kind = "static_lib"
///     sources = [ { root = "core", files = [ "*.cpp" ] } ]
///     dependencies = [ "platform" ]
///     defines = { CORE_STATIC = "1" }
///     precompiled_header = { source = "core/pch.cpp", include = "core/pch.h" }
/// "#;
///
/// let config: TargetAttribute = toml::from_str(CONFIG_FILE_MOCK)
///    .expect("A failure happened parsing the targets manifest");
///
/// assert_eq!(config.kind, Some(TargetKind::StaticLib));
/// assert_eq!(config.sources[0].files, vec!["*.cpp"]);
/// assert_eq!(config.dependencies, vec!["platform"]);
/// assert_eq!(config.defines.get("CORE_STATIC").map(String::as_str), Some("1"));
/// assert_eq!(config.precompiled_header.unwrap().include, "core/pch.h");
/// assert!(config.flags.is_empty());
/// ```
/// > Note: TOML table are toml commented (#) to allow us to parse
/// the inner attributes as the direct type that they belongs to.
///
/// For a test over a real example, please look at the
/// [`crate::config_file::ManifestFile`] doc-test
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct TargetAttribute {
    pub kind: Option<TargetKind>,
    #[serde(default)]
    pub sources: Vec<SourceGroupAttribute>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub include_dirs: Vec<String>,
    #[serde(default)]
    pub public_include_dirs: Vec<String>,
    #[serde(default)]
    pub defines: IndexMap<String, String>,
    #[serde(default)]
    pub libs: Vec<String>,
    #[serde(default)]
    pub frameworks: Vec<String>,
    #[serde(default)]
    pub dlls: Vec<String>,
    #[serde(default)]
    pub resources: Vec<ResourceAttribute>,
    pub precompiled_header: Option<PrecompiledHeaderAttribute>,
    #[serde(default)]
    pub flags: Vec<String>,
}

/// A group of source files. `root` is relative to the manifest directory,
/// and `files` are relative to `root`
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct SourceGroupAttribute {
    #[serde(default)]
    pub root: String,
    pub files: Vec<String>,
}

/// A folder copied from `source`, relative to the manifest directory, to
/// `destination`, relative to the build output directory
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct ResourceAttribute {
    pub source: String,
    pub destination: String,
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct PrecompiledHeaderAttribute {
    pub source: String,
    pub include: String,
}
