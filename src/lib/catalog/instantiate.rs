//! Expands the root targets of a build folder into the ordered list of
//! [`Target`]s that the generator writes

use std::collections::HashSet;
use std::path::Path;

use color_eyre::{
    eyre::{eyre, Context},
    Result,
};

use crate::catalog::{ManifestCatalog, TargetCatalog, TargetHandle};
use crate::domain::build_folder::BuildFolder;
use crate::domain::target::{
    Define, LinkLib, PrecompiledHeader, ResourceCopyFolder, SourceGroup, Target, TargetKind,
};
use crate::utils::{self, constants::error_messages};

/// Instantiates every target reachable from the roots of `folder`.
///
/// Targets come out in dependency order, every one of them once: a target is
/// always preceded by the targets it depends on.
pub fn instantiate(catalog: &ManifestCatalog, folder: &BuildFolder) -> Result<Vec<Target>> {
    let mut instantiator = Instantiator {
        catalog,
        made_shared: HashSet::new(),
        done: HashSet::new(),
        in_progress: Vec::new(),
        targets: Vec::new(),
    };

    for name in &folder.make_shared {
        match catalog.resolve(name) {
            Some(handle) => {
                instantiator.made_shared.insert(handle);
            }
            None => log::warn!("Ignoring unknown target '{name}' marked as shared"),
        }
    }

    for name in &folder.root_targets {
        let handle = catalog
            .resolve(name)
            .ok_or_else(|| eyre!("{}: '{name}'", error_messages::TARGET_NOT_FOUND))?;
        instantiator.visit(handle)?;
    }

    log::debug!(
        "Instantiated {} targets for build folder '{}'",
        instantiator.targets.len(),
        folder.name
    );
    Ok(instantiator.targets)
}

struct Instantiator<'a> {
    catalog: &'a ManifestCatalog,
    made_shared: HashSet<TargetHandle>,
    done: HashSet<TargetHandle>,
    in_progress: Vec<TargetHandle>,
    targets: Vec<Target>,
}

/// What the dependencies of a target contribute to it, accumulated in
/// discovery order: the deepest dependencies first
#[derive(Default)]
struct Contributions {
    include_dirs: Vec<String>,
    link_libs: Vec<LinkLib>,
    frameworks: Vec<String>,
    copy_dlls: Vec<String>,
}

impl<'a> Instantiator<'a> {
    fn visit(&mut self, handle: TargetHandle) -> Result<()> {
        if self.done.contains(&handle) {
            return Ok(());
        }
        if self.in_progress.contains(&handle) {
            return Err(eyre!(
                "{}: '{}'",
                error_messages::DEPENDENCY_CYCLE,
                self.catalog.fully_qualified_name(handle)
            ));
        }

        self.in_progress.push(handle);
        for dependency in self.catalog.dependencies(handle)? {
            self.visit(dependency)?;
        }
        let target = self.make_target(handle)?;
        self.in_progress.pop();

        self.done.insert(handle);
        self.targets.push(target);
        Ok(())
    }

    fn kind_of(&self, handle: TargetHandle) -> TargetKind {
        let kind = self.catalog.entry(handle).attribute.kind.unwrap_or_default();
        if kind == TargetKind::StaticLib && self.made_shared.contains(&handle) {
            TargetKind::SharedLib
        } else {
            kind
        }
    }

    fn make_target(&self, handle: TargetHandle) -> Result<Target> {
        let entry = self.catalog.entry(handle);
        let attribute = &entry.attribute;
        let base_dir = entry.base_dir.as_path();

        let mut contributions = Contributions::default();
        let mut visited = HashSet::new();
        for dependency in self.catalog.dependencies(handle)? {
            self.collect(dependency, true, &mut visited, &mut contributions)?;
        }

        let mut target = Target::new(self.catalog.unique_name(handle), self.kind_of(handle));

        for group in &attribute.sources {
            let root = base_dir.join(&group.root);
            target.source_groups.push(SourceGroup {
                root: path_string(&root),
                files: expand_sources(&root, &group.files)?,
            });
        }

        target.include_dirs = contributions.include_dirs;
        target.include_dirs.extend(
            attribute
                .public_include_dirs
                .iter()
                .chain(&attribute.include_dirs)
                .map(|dir| path_string(&base_dir.join(dir))),
        );

        target.defines = attribute
            .defines
            .iter()
            .map(|(key, value)| Define::new(key.as_str(), value.as_str()))
            .collect();

        target.link_libs = contributions.link_libs;
        target
            .link_libs
            .extend(attribute.libs.iter().map(|lib| prebuilt_lib(base_dir, lib)));

        target.frameworks = contributions.frameworks;
        target.frameworks.extend(attribute.frameworks.iter().cloned());

        target.copy_dlls = contributions.copy_dlls;
        target
            .copy_dlls
            .extend(attribute.dlls.iter().map(|dll| path_string(&base_dir.join(dll))));

        target.resource_copy_folders = attribute
            .resources
            .iter()
            .map(|res| ResourceCopyFolder {
                source: path_string(&base_dir.join(&res.source)),
                destination: res.destination.clone(),
            })
            .collect();

        target.precompiled_header = attribute.precompiled_header.as_ref().map(|pch| {
            PrecompiledHeader {
                generator_source: path_string(&base_dir.join(&pch.source)),
                include: pch.include.clone(),
            }
        });

        target.abstract_flags = attribute.flags.clone();

        Ok(target)
    }

    /// Post order walk over the dependencies of a target. The link step of a
    /// dependency that is itself linked (a shared library) already consumed
    /// its own dependencies, so those aren't linked again
    fn collect(
        &self,
        handle: TargetHandle,
        link: bool,
        visited: &mut HashSet<TargetHandle>,
        out: &mut Contributions,
    ) -> Result<()> {
        if !visited.insert(handle) {
            return Ok(());
        }

        let kind = self.kind_of(handle);
        for dependency in self.catalog.dependencies(handle)? {
            self.collect(dependency, link && !kind.is_linked(), visited, out)?;
        }

        let entry = self.catalog.entry(handle);
        let attribute = &entry.attribute;
        let base_dir = entry.base_dir.as_path();

        out.include_dirs.extend(
            attribute
                .public_include_dirs
                .iter()
                .map(|dir| path_string(&base_dir.join(dir))),
        );
        out.copy_dlls.extend(
            attribute
                .dlls
                .iter()
                .map(|dll| path_string(&base_dir.join(dll))),
        );

        if link {
            out.link_libs
                .extend(attribute.libs.iter().map(|lib| prebuilt_lib(base_dir, lib)));
            out.frameworks.extend(attribute.frameworks.iter().cloned());

            let name = self.catalog.unique_name(handle);
            match kind {
                TargetKind::HeaderOnly => {}
                TargetKind::ObjectLib => out.link_libs.push(LinkLib::Objects(name)),
                TargetKind::StaticLib | TargetKind::SharedLib | TargetKind::Executable => {
                    out.link_libs.push(LinkLib::Library(name))
                }
            }
        }

        Ok(())
    }
}

fn path_string(path: &Path) -> String {
    utils::fs::normalize_path(path).to_string_lossy().into_owned()
}

/// Classifies a prebuilt library declaration: CMake expressions are kept verbatim,
/// paths are made absolute and bare names, like `pthread`, are left alone
fn prebuilt_lib(base_dir: &Path, lib: &str) -> LinkLib {
    if lib.starts_with("${") || lib.starts_with("$<") {
        LinkLib::Variable(lib.to_string())
    } else if lib.contains('/') || lib.contains('\\') {
        LinkLib::Library(path_string(&base_dir.join(lib)))
    } else {
        LinkLib::Library(lib.to_string())
    }
}

/// Resolves the declared source files of a group, relative to its root. Glob
/// patterns are expanded in alphabetical order, plain files are kept as declared
fn expand_sources(root: &Path, files: &[String]) -> Result<Vec<String>> {
    let mut expanded = Vec::new();
    for file in files {
        if !is_glob(file) {
            expanded.push(file.clone());
            continue;
        }

        let pattern = root.join(file);
        let pattern = pattern.to_string_lossy();
        let mut matches = glob::glob(&pattern)
            .with_context(|| format!("{}: '{pattern}'", error_messages::INVALID_SOURCE_GLOB))?
            .filter_map(|path| path.ok())
            .filter_map(|path| {
                path.strip_prefix(root)
                    .ok()
                    .map(|rel| rel.to_string_lossy().into_owned())
            })
            .collect::<Vec<_>>();
        matches.sort();
        expanded.extend(matches);
    }
    Ok(expanded)
}

fn is_glob(file: &str) -> bool {
    file.contains(['*', '?', '['])
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::catalog::tests::mock_catalog;
    use crate::config_file::manifest_from_str;
    use crate::domain::generator_options::GeneratorOptions;

    fn folder_with_roots(roots: &[&str]) -> BuildFolder {
        let mut folder = BuildFolder::new("debug", GeneratorOptions::new("Unix Makefiles", "Debug"));
        for root in roots {
            folder.add_root_target(root, false);
        }
        folder
    }

    fn find<'t>(targets: &'t [Target], name: &str) -> &'t Target {
        targets.iter().find(|t| t.name == name).unwrap()
    }

    #[test]
    fn test_dependencies_come_first_and_once() -> Result<()> {
        let catalog = mock_catalog();
        let targets = instantiate(&catalog, &folder_with_roots(&["app", "engine.core"]))?;

        let names: Vec<&str> = targets.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["platform", "engine_core", "app"]);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_contributions_are_accumulated_deepest_first() -> Result<()> {
        let catalog = mock_catalog();
        let targets = instantiate(&catalog, &folder_with_roots(&["app"]))?;
        let app = find(&targets, "app");

        assert_eq!(app.kind, TargetKind::Executable);
        assert_eq!(
            app.include_dirs,
            vec!["/ws/src/engine/platform", "/ws/src/engine/core"]
        );
        assert_eq!(app.link_libs, vec![LinkLib::Library("engine_core".to_string())]);
        assert_eq!(app.source_groups[0].root, "/ws/src/engine/app");
        assert_eq!(app.source_groups[0].files, vec!["main.cpp"]);
        assert_eq!(app.resource_copy_folders[0].source, "/ws/src/engine/assets");

        let core = find(&targets, "engine_core");
        assert_eq!(core.defines, vec![Define::new("CORE_STATIC", "1")]);
        assert!(core.has_exceptions_enabled());
        Ok(())
    }

    #[test]
    fn test_made_shared_and_object_libraries() -> Result<()> {
        let manifest = manifest_from_str(
            r#"
            [module]
            name = "m"
            [targets.objs]
            kind = "object_lib"
            libs = [ "${OPENGL_LIBRARY}", "pthread" ]
            frameworks = [ "Cocoa" ]
            [targets.base]
            kind = "static_lib"
            dependencies = [ "objs" ]
            dlls = [ "bin/base_dep.dll" ]
            [targets.exe]
            dependencies = [ "base" ]
        "#,
        )?;
        let catalog = ManifestCatalog::from_manifests(vec![(PathBuf::from("/ws/m"), manifest)])?;

        let targets = instantiate(&catalog, &folder_with_roots(&["exe"]))?;
        let exe = find(&targets, "exe");
        assert_eq!(
            exe.link_libs,
            vec![
                LinkLib::Variable("${OPENGL_LIBRARY}".to_string()),
                LinkLib::Library("pthread".to_string()),
                LinkLib::Objects("objs".to_string()),
                LinkLib::Library("base".to_string()),
            ]
        );
        assert_eq!(exe.frameworks, vec!["Cocoa"]);
        assert_eq!(exe.copy_dlls.len(), 1);

        // Once `base` is a shared library, it already links `objs` itself
        let mut folder = folder_with_roots(&["exe"]);
        folder.make_shared.push("m.base".to_string());
        let targets = instantiate(&catalog, &folder)?;
        assert_eq!(find(&targets, "base").kind, TargetKind::SharedLib);
        assert_eq!(
            find(&targets, "exe").link_libs,
            vec![LinkLib::Library("base".to_string())]
        );
        assert_eq!(
            find(&targets, "base").link_libs,
            vec![
                LinkLib::Variable("${OPENGL_LIBRARY}".to_string()),
                LinkLib::Library("pthread".to_string()),
                LinkLib::Objects("objs".to_string()),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_cycles_are_detected() -> Result<()> {
        let manifest = manifest_from_str(
            r#"
            [module]
            name = "m"
            [targets.a]
            dependencies = [ "b" ]
            [targets.b]
            kind = "static_lib"
            dependencies = [ "a" ]
        "#,
        )?;
        let catalog = ManifestCatalog::from_manifests(vec![(PathBuf::from("/ws/m"), manifest)])?;
        assert!(instantiate(&catalog, &folder_with_roots(&["a"])).is_err());
        Ok(())
    }

    #[test]
    fn test_unknown_root_is_an_error() {
        let catalog = mock_catalog();
        assert!(instantiate(&catalog, &folder_with_roots(&["nowhere"])).is_err());
    }

    #[test]
    fn test_glob_sources_are_expanded_in_order() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let root = temp.path();
        for file in ["b.cpp", "a.cpp", "notes.txt"] {
            utils::fs::create_file(root, file, b"")?;
        }

        let files = expand_sources(root, &["*.cpp".to_string(), "extra.h".to_string()])?;
        assert_eq!(files, vec!["a.cpp", "b.cpp", "extra.h"]);
        Ok(())
    }
}
