//! The catalog of the targets declared on a workspace, and the lookup
//! services that the rest of the program uses to reach them

pub mod instantiate;

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::{
    eyre::{eyre, Context},
    Result,
};
use walkdir::{DirEntry, WalkDir};

use crate::config_file::{self, target::TargetAttribute, ManifestFile};
use crate::utils::{
    self,
    constants::{error_messages, MANIFEST_FILENAME, MANIFEST_SEARCH_DEPTH},
};

pub use self::instantiate::instantiate;

/// An opaque reference to a target of a [`TargetCatalog`]
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub struct TargetHandle(pub usize);

/// Lookup services over the declared targets
pub trait TargetCatalog {
    /// Finds a target by its fully qualified name, or by its short name when
    /// that one isn't ambiguous
    fn resolve(&self, name: &str) -> Option<TargetHandle>;

    fn fully_qualified_name(&self, handle: TargetHandle) -> String;

    /// The name used to display a target: the short one when it's unique on the
    /// catalog, the fully qualified one otherwise
    fn short_name(&self, handle: TargetHandle) -> String;

    /// The direct dependencies of a target, in declaration order
    fn dependencies(&self, handle: TargetHandle) -> Result<Vec<TargetHandle>>;
}

/// One target declared on a manifest
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub module: String,
    pub name: String,
    /// The directory of the manifest, which the relative paths of the target refer to
    pub base_dir: PathBuf,
    pub attribute: TargetAttribute,
}

impl CatalogEntry {
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.module, self.name)
    }
}

/// A [`TargetCatalog`] made of the `targets.toml` manifests of a workspace
#[derive(Debug, Default, Clone)]
pub struct ManifestCatalog {
    entries: Vec<CatalogEntry>,
}

impl ManifestCatalog {
    /// Walks the workspace looking for manifests, and loads every target they declare
    pub fn discover(workspace_root: &Path) -> Result<Self> {
        log::debug!("Searching for targets manifests under {workspace_root:?}...");
        let mut manifests = Vec::new();

        for entry in WalkDir::new(workspace_root)
            .max_depth(MANIFEST_SEARCH_DEPTH)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_hidden(e))
            .filter_map(|e| e.ok())
        {
            if entry.file_type().is_file() && entry.file_name() == MANIFEST_FILENAME {
                let path = entry.path();
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("{}: {path:?}", error_messages::READ_MANIFEST))?;
                let manifest = config_file::manifest_from_str(&raw)
                    .with_context(|| format!("{}: {path:?}", error_messages::PARSE_MANIFEST))?;
                let base_dir = path.parent().unwrap_or(workspace_root);
                log::debug!("Found manifest for module '{}' at {path:?}", manifest.module.name);
                manifests.push((utils::fs::get_absolute_path(base_dir)?, manifest));
            }
        }

        if manifests.is_empty() {
            return Err(eyre!(
                "{}: {workspace_root:?}",
                error_messages::NO_MANIFESTS_FOUND
            ));
        }

        Self::from_manifests(manifests)
    }

    /// Builds the catalog from already parsed manifests, paired with their directories
    pub fn from_manifests<I>(manifests: I) -> Result<Self>
    where
        I: IntoIterator<Item = (PathBuf, ManifestFile)>,
    {
        let mut catalog = Self::default();
        for (base_dir, manifest) in manifests {
            for (name, attribute) in manifest.targets {
                let entry = CatalogEntry {
                    module: manifest.module.name.clone(),
                    name,
                    base_dir: base_dir.clone(),
                    attribute,
                };
                let qualified = entry.qualified_name();
                if catalog.find_qualified(&qualified).is_some() {
                    return Err(eyre!("{}: '{qualified}'", error_messages::DUPLICATED_TARGET));
                }
                catalog.entries.push(entry);
            }
        }
        Ok(catalog)
    }

    pub fn entry(&self, handle: TargetHandle) -> &CatalogEntry {
        &self.entries[handle.0]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The name the target takes on a generated project, which must be unique there
    pub fn unique_name(&self, handle: TargetHandle) -> String {
        let entry = self.entry(handle);
        if self.is_short_name_unique(&entry.name) {
            entry.name.clone()
        } else {
            format!("{}_{}", entry.module, entry.name)
        }
    }

    fn find_qualified(&self, qualified: &str) -> Option<TargetHandle> {
        self.entries
            .iter()
            .position(|e| e.qualified_name() == qualified)
            .map(TargetHandle)
    }

    fn is_short_name_unique(&self, name: &str) -> bool {
        self.entries.iter().filter(|e| e.name == name).count() == 1
    }

    fn resolve_dependency(&self, dependent: &CatalogEntry, name: &str) -> Option<TargetHandle> {
        // A module sibling wins over a target with the same name on another module
        self.find_qualified(&format!("{}.{name}", dependent.module))
            .or_else(|| self.resolve(name))
    }
}

impl TargetCatalog for ManifestCatalog {
    fn resolve(&self, name: &str) -> Option<TargetHandle> {
        if let Some(handle) = self.find_qualified(name) {
            return Some(handle);
        }

        let mut candidates = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.name == name);
        match (candidates.next(), candidates.next()) {
            (Some((index, _)), None) => Some(TargetHandle(index)),
            (Some(_), Some(_)) => {
                log::warn!("Target name '{name}' is ambiguous, use its fully qualified name");
                None
            }
            _ => None,
        }
    }

    fn fully_qualified_name(&self, handle: TargetHandle) -> String {
        self.entry(handle).qualified_name()
    }

    fn short_name(&self, handle: TargetHandle) -> String {
        let entry = self.entry(handle);
        if self.is_short_name_unique(&entry.name) {
            entry.name.clone()
        } else {
            entry.qualified_name()
        }
    }

    fn dependencies(&self, handle: TargetHandle) -> Result<Vec<TargetHandle>> {
        let entry = self.entry(handle);
        entry
            .attribute
            .dependencies
            .iter()
            .map(|dep| {
                self.resolve_dependency(entry, dep).ok_or_else(|| {
                    eyre!(
                        "{}: '{dep}' of target '{}'",
                        error_messages::UNKNOWN_DEPENDENCY,
                        entry.qualified_name()
                    )
                })
            })
            .collect()
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|s| s.starts_with('.'))
            .unwrap_or(false)
}
