//! Rewrites the paths written into a generated project

use crate::domain::project_folder::ProjectFolder;
use crate::utils::{self, constants::cmake};

/// Every path written into a generated project goes through a [`PathFilter`].
///
/// Outside of bootstrap mode it only converts the separators to the portable
/// form. In bootstrap mode, the paths under the framework sources, or under the
/// project folder itself, are made relative to the `SRC_FOLDER` and
/// `BUILD_FOLDER` variables, so the project can be moved to another machine.
#[derive(Debug, Clone)]
pub struct PathFilter<'a> {
    bootstrap: bool,
    source_prefix: String,
    build_prefix: &'a str,
}

impl<'a> PathFilter<'a> {
    pub fn for_folder(folder: &'a ProjectFolder) -> Self {
        Self {
            bootstrap: folder.bootstrap,
            source_prefix: folder.effective_source_prefix(),
            build_prefix: &folder.root_path,
        }
    }

    pub fn filter(&self, path: &str) -> String {
        if self.bootstrap {
            if let Some(rest) = path.strip_prefix(self.source_prefix.as_str()) {
                return format!("${{{}}}{}", cmake::SRC_FOLDER_VAR, utils::fs::to_posix(rest));
            }
            if let Some(rest) = path.strip_prefix(self.build_prefix) {
                return format!("${{{}}}{}", cmake::BUILD_FOLDER_VAR, utils::fs::to_posix(rest));
            }
        }
        utils::fs::to_posix(path)
    }
}
