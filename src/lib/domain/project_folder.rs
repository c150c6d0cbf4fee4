//! The folder where a CMake project is materialized

use std::path::{Path, PathBuf};

use color_eyre::{eyre::bail, Result};

use crate::domain::target::Target;
use crate::utils::{
    self,
    constants::{dir_names, HELPER_SCRIPT_FILENAME},
};

/// [`ProjectFolder`] - Everything the generator needs to write a `CMakeLists.txt`
///
/// * `root_path` - absolute, normalized and separator terminated path of the
///   folder that holds the generated project and its `build` subdirectory
/// * `solution_name` - the name given to the CMake `project(...)`
/// * `targets` - the targets to generate, in dependency order
/// * `bootstrap` - whether the paths are virtualized so the project can be relocated
/// * `source_prefix` - override of the prefix recognized as the framework sources
/// * `workspace_root` - the workspace the folder belongs to
/// * `helper_script` - the helper script included when not in bootstrap mode
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ProjectFolder {
    pub root_path: String,
    pub solution_name: String,
    pub targets: Vec<Target>,
    pub bootstrap: bool,
    pub source_prefix: Option<String>,
    pub workspace_root: PathBuf,
    pub helper_script: PathBuf,
}

impl ProjectFolder {
    pub fn new(
        root_path: &Path,
        workspace_root: &Path,
        solution_name: impl Into<String>,
        targets: Vec<Target>,
    ) -> Result<Self> {
        if !root_path.is_absolute() {
            bail!("The project folder must be an absolute path: {root_path:?}")
        }

        let root = utils::fs::normalize_path(root_path);
        Ok(Self {
            root_path: utils::fs::with_trailing_separator(&root),
            solution_name: solution_name.into(),
            targets,
            bootstrap: false,
            source_prefix: None,
            workspace_root: utils::fs::normalize_path(workspace_root),
            helper_script: root.join(HELPER_SCRIPT_FILENAME),
        })
    }

    /// The prefix that identifies the framework sources while virtualizing paths
    pub fn effective_source_prefix(&self) -> String {
        match &self.source_prefix {
            Some(prefix) => prefix.clone(),
            None => utils::fs::with_trailing_separator(
                &self.workspace_root.join(dir_names::WORKSPACE_SOURCES),
            ),
        }
    }

    /// Where the external generator materializes the native project
    pub fn build_dir(&self) -> PathBuf {
        Path::new(&self.root_path).join(dir_names::CMAKE_BUILD)
    }
}
