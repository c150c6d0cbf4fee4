//! The persisted selection of root targets of a build folder

use std::path::{Path, PathBuf};

use color_eyre::{
    eyre::{bail, Context},
    Result,
};
use serde::{Deserialize, Serialize};

use crate::domain::generator_options::GeneratorOptions;
use crate::domain::project_folder::ProjectFolder;
use crate::domain::target::Target;
use crate::utils::{
    self,
    constants::{dir_names, error_messages, FOLDER_FILENAME},
};

/// A build folder, as saved on `<workspace>/build/<name>/folder.toml`
///
/// ```rust
/// use cmakeforge::domain::build_folder::BuildFolder;
///
/// const FOLDER_MOCK: &str = r#"
///     name = 'debug'
///     root_targets = ['engine.app', 'engine.tests']
///     make_shared = ['engine.core']
///
///     [cmake]
///     generator = 'Unix Makefiles'
///     build_type = 'Debug'
/// "#;
///
/// let folder: BuildFolder = toml::from_str(FOLDER_MOCK)
///     .expect("A failure happened parsing the build folder file");
///
/// assert_eq!(folder.root_targets, vec!["engine.app", "engine.tests"]);
/// assert!(folder.is_made_shared("engine.core"));
/// assert!(!folder.bootstrap);
/// assert_eq!(folder.cmake.generator, "Unix Makefiles");
/// ```
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct BuildFolder {
    pub name: String,
    #[serde(default)]
    pub root_targets: Vec<String>,
    #[serde(default)]
    pub make_shared: Vec<String>,
    #[serde(default)]
    pub bootstrap: bool,
    pub cmake: GeneratorOptions,
    #[serde(skip)]
    pub path: PathBuf,
}

impl BuildFolder {
    pub fn new(name: impl Into<String>, cmake: GeneratorOptions) -> Self {
        Self {
            name: name.into(),
            root_targets: Vec::new(),
            make_shared: Vec::new(),
            bootstrap: false,
            cmake,
            path: PathBuf::new(),
        }
    }

    /// The directory of a build folder called `name` on the given workspace
    pub fn location(workspace_root: &Path, name: &str) -> PathBuf {
        workspace_root.join(dir_names::BUILD_FOLDERS).join(name)
    }

    /// Creates a new build folder on disk. Fails if there's already one with this name
    pub fn create(workspace_root: &Path, mut folder: BuildFolder) -> Result<Self> {
        folder.cmake.ensure_valid()?;
        let path = Self::location(workspace_root, &folder.name);
        if path.join(FOLDER_FILENAME).exists() {
            bail!("Build folder '{}' already exists", folder.name);
        }

        utils::fs::create_directory(&path)?;
        folder.path = path;
        folder.save()?;
        log::info!("Created build folder '{}' at {:?}", folder.name, folder.path);

        Ok(folder)
    }

    pub fn load(workspace_root: &Path, name: &str) -> Result<Self> {
        let path = Self::location(workspace_root, name);
        let mut folder: BuildFolder = utils::fs::load_and_deserialize(path.join(FOLDER_FILENAME))
            .with_context(|| format!("{}: '{name}'", error_messages::LOAD_BUILD_FOLDER))?;
        folder.path = path;
        Ok(folder)
    }

    pub fn save(&self) -> Result<()> {
        log::debug!("Saving build folder '{}'", self.name);
        utils::fs::serialize_object_to_file(&self.path.join(FOLDER_FILENAME), self)
            .with_context(|| format!("{}: '{}'", error_messages::SAVE_BUILD_FOLDER, self.name))
    }

    /// Adds a root target, identified by its fully qualified name. Adding it twice is a no-op
    pub fn add_root_target(&mut self, qualified_name: &str, make_shared: bool) {
        if !self.root_targets.iter().any(|t| t == qualified_name) {
            self.root_targets.push(qualified_name.to_string());
        }
        if make_shared && !self.is_made_shared(qualified_name) {
            self.make_shared.push(qualified_name.to_string());
        }
    }

    pub fn remove_root_target(&mut self, qualified_name: &str) -> Result<()> {
        match self.root_targets.iter().position(|t| t == qualified_name) {
            Some(index) => {
                self.root_targets.remove(index);
                Ok(())
            }
            None => bail!(
                "Folder '{}' does not have root target '{qualified_name}'",
                self.name
            ),
        }
    }

    pub fn is_made_shared(&self, qualified_name: &str) -> bool {
        self.make_shared.iter().any(|t| t == qualified_name)
    }

    /// The [`ProjectFolder`] that the generator writes for this build folder
    pub fn project_folder(&self, workspace_root: &Path, targets: Vec<Target>) -> Result<ProjectFolder> {
        let root = utils::fs::get_absolute_path(&self.path)?;
        let mut project = ProjectFolder::new(&root, workspace_root, self.name.clone(), targets)?;
        project.bootstrap = self.bootstrap;
        Ok(project)
    }
}
