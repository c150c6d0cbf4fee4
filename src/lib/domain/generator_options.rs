//! The options that select and configure the CMake generator used for a build folder

use color_eyre::{eyre::bail, Result};
use serde::{Deserialize, Serialize};

use crate::utils::constants::{error_messages, DEFAULT_BUILD_TYPE};

/// [`GeneratorOptions`] - The generation configuration of a build folder
///
/// * `generator` - The CMake generator name, like `Unix Makefiles`. Must not be empty
/// * `platform` - Optional architecture qualifier, passed as `-A`
/// * `toolset` - Optional compiler suite qualifier, passed as `-T`
/// * `build_type` - The default configuration, like `Debug`
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct GeneratorOptions {
    pub generator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toolset: Option<String>,
    #[serde(default = "default_build_type")]
    pub build_type: String,
}

fn default_build_type() -> String {
    DEFAULT_BUILD_TYPE.to_string()
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            generator: String::new(),
            platform: None,
            toolset: None,
            build_type: default_build_type(),
        }
    }
}

impl GeneratorOptions {
    pub fn new(generator: impl Into<String>, build_type: impl Into<String>) -> Self {
        Self {
            generator: generator.into(),
            build_type: build_type.into(),
            ..Default::default()
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.generator.is_empty()
    }

    /// Fails fast when the options can't be used to generate or build anything
    pub fn ensure_valid(&self) -> Result<()> {
        if !self.is_valid() {
            bail!(error_messages::INVALID_GENERATOR_OPTIONS);
        }
        Ok(())
    }

    /// The configuration a build should use: the override if any, otherwise the default one
    pub fn effective_build_type<'a>(&'a self, build_type_override: Option<&'a str>) -> &'a str {
        match build_type_override {
            Some(build_type) if !build_type.is_empty() => build_type,
            _ => self.build_type.as_str(),
        }
    }

    /// Classifies the configured generator by its configuration model
    pub fn config_model(&self) -> Result<ConfigModel> {
        ConfigModel::of(&self.generator)
    }
}

/// Whether a generated project can build more than one configuration
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ConfigModel {
    /// The build type is fixed when the project is generated
    SingleConfig,
    /// The configuration is chosen at build time, and the outputs are nested
    /// under a directory named after it
    MultiConfig,
}

impl ConfigModel {
    pub fn of(generator: &str) -> Result<Self> {
        if generator.starts_with("Visual Studio")
            || generator == "Xcode"
            || generator == "Ninja Multi-Config"
        {
            Ok(ConfigModel::MultiConfig)
        } else if generator == "Unix Makefiles" || generator == "Ninja" {
            Ok(ConfigModel::SingleConfig)
        } else {
            bail!("{}: '{generator}'", error_messages::UNRECOGNIZED_GENERATOR)
        }
    }
}
