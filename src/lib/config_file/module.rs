//! Metadata about a module of the workspace
use serde::*;

/// [`ModuleAttribute`] - Metadata about one module of the workspace
/// * `name` - The module's name, which qualifies the names of its targets
///
/// ### Tests
///
/// ```rust
/// use cmakeforge::config_file::module::ModuleAttribute;
///
/// const CONFIG_FILE_MOCK: &str = r#"
///     #[module]
///     name = 'engine'
///"#;
///
/// let config: ModuleAttribute = toml::from_str(CONFIG_FILE_MOCK)
///    .expect("A failure happened parsing the targets manifest");
///
/// assert_eq!(config.name, "engine");
/// ```
///
/// > Note: TOML table are toml commented (#) to allow us to parse
/// the inner attributes as the direct type that they belongs to.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct ModuleAttribute {
    pub name: String,
}
