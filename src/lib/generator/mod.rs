//! Translates the targets of a [`ProjectFolder`] into a `CMakeLists.txt`
//!
//! The generation is a pure function of the folder: the same folder always
//! produces the same text, byte by byte, so regenerated projects can be diffed.

pub mod path_filter;

use std::fmt::Write;
use std::path::{Path, PathBuf};

use color_eyre::{
    eyre::{bail, Context},
    Result,
};

use crate::domain::project_folder::ProjectFolder;
use crate::domain::target::{LinkLib, Target, TargetKind};
use crate::utils::{
    self,
    constants::{cmake, error_messages, HELPER_SCRIPT_FILENAME},
    template::resources::HELPER_SCRIPT,
};

use self::path_filter::PathFilter;

/// Writes the `CMakeLists.txt`, and the helper script it includes, into the
/// root of the project folder. Returns the path of the written `CMakeLists.txt`
pub fn write_cmake_project(folder: &ProjectFolder) -> Result<PathBuf> {
    let contents = generate(folder)?;
    let root = Path::new(&folder.root_path);

    utils::fs::create_directory(root)?;
    utils::fs::create_file(root, HELPER_SCRIPT_FILENAME, HELPER_SCRIPT.as_bytes())?;
    utils::fs::create_file(root, cmake::CMAKE_LISTS, contents.as_bytes())
        .with_context(|| error_messages::FAILURE_WRITING_CMAKE_LISTS)?;

    let path = root.join(cmake::CMAKE_LISTS);
    log::info!(
        "Generated {} targets for '{}' into {path:?}",
        folder.targets.len(),
        folder.solution_name
    );
    Ok(path)
}

/// Generates the text of the `CMakeLists.txt` for the given folder
pub fn generate(folder: &ProjectFolder) -> Result<String> {
    let filter = PathFilter::for_folder(folder);
    let mut out = String::new();

    write_preamble(&mut out, folder)?;
    for target in &folder.targets {
        log::trace!("Generating the CMake directives of target '{}'", target.name);
        write_target(&mut out, target, &filter)?;
    }

    Ok(out)
}

fn write_preamble(out: &mut String, folder: &ProjectFolder) -> Result<()> {
    // 3.8 is the first version supporting generator expressions like `$<CONFIG>`
    // on source file properties
    writeln!(out, "cmake_minimum_required(VERSION {})", cmake::MINIMUM_VERSION)?;
    writeln!(
        out,
        "set(CMAKE_CONFIGURATION_TYPES \"{}\" CACHE INTERNAL \"Build configs\")",
        cmake::CONFIGURATION_TYPES
    )?;
    writeln!(out, "project({})", folder.solution_name)?;

    if folder.bootstrap {
        for var in [
            cmake::WORKSPACE_FOLDER_VAR,
            cmake::SRC_FOLDER_VAR,
            cmake::BUILD_FOLDER_VAR,
        ] {
            writeln!(out, "set({var} \"<<<{var}>>>\")")?;
        }
        writeln!(
            out,
            "include(\"${{CMAKE_CURRENT_LIST_DIR}}/{HELPER_SCRIPT_FILENAME}\")"
        )?;
    } else {
        let helper = utils::fs::to_posix(&folder.helper_script.to_string_lossy());
        writeln!(out, "include(\"{}\")", escape(&helper))?;
    }

    Ok(())
}

fn write_target(out: &mut String, target: &Target, filter: &PathFilter<'_>) -> Result<()> {
    let name = target.name.as_str();
    writeln!(out, "\n# {name}")?;

    // One variable per group of source files
    let source_vars = source_var_names(target);
    for (group, var) in target.source_groups.iter().zip(&source_vars) {
        writeln!(out, "SetSourceFolders({var} \"{}\"", escape(&filter.filter(&group.root)))?;
        for file in &group.files {
            writeln!(out, "    \"{}\"", escape(&filter.filter(file)))?;
        }
        writeln!(out, ")")?;
    }

    match target.kind {
        TargetKind::HeaderOnly => writeln!(out, "add_custom_target({name} SOURCES")?,
        TargetKind::StaticLib => writeln!(out, "add_library({name}")?,
        // OBJECT libraries hand every .obj file to the final link, where a
        // static library would let the linker drop the ones nothing references,
        // and with them their DLL exports
        TargetKind::ObjectLib => writeln!(out, "add_library({name} OBJECT")?,
        TargetKind::SharedLib => writeln!(out, "add_library({name} SHARED")?,
        TargetKind::Executable => writeln!(out, "add_executable({name}")?,
    }
    for var in &source_vars {
        writeln!(out, "    ${{{var}}}")?;
    }
    if target.kind.is_linked() {
        for lib in reversed(&target.link_libs).filter(|lib| lib.is_objects()) {
            writeln!(out, "    {lib}")?;
        }
    }
    writeln!(out, ")")?;
    if target.kind == TargetKind::Executable {
        writeln!(out, "set_property(TARGET {name} PROPERTY ENABLE_EXPORTS TRUE)")?;
    }

    if target.kind != TargetKind::HeaderOnly {
        write_compile_settings(out, target, filter)?;
    }

    if target.kind.is_linked() {
        write_link_settings(out, target, filter)?;
    }

    if let Some(pch) = &target.precompiled_header {
        for var in &source_vars {
            writeln!(out, "SetPrecompiledHeader({name} {var}")?;
            writeln!(out, "    \"{}\"", escape(&filter.filter(&pch.generator_source)))?;
            writeln!(out, "    \"{}\"", escape(&pch.include))?;
            writeln!(out, "    \"{name}.$<CONFIG>.pch\"")?;
            writeln!(out, ")")?;
        }
    }

    for folder in &target.resource_copy_folders {
        writeln!(out, "add_custom_command(TARGET {name} POST_BUILD")?;
        writeln!(out, "    COMMAND ${{CMAKE_COMMAND}} -E copy_directory")?;
        writeln!(out, "        \"{}\"", escape(&filter.filter(&folder.source)))?;
        writeln!(
            out,
            "        \"${{CMAKE_CURRENT_BINARY_DIR}}/{}\")",
            escape(&utils::fs::to_posix(&folder.destination))
        )?;
    }

    Ok(())
}

/// Exceptions, include directories and preprocessor definitions
fn write_compile_settings(out: &mut String, target: &Target, filter: &PathFilter<'_>) -> Result<()> {
    let name = target.name.as_str();
    writeln!(
        out,
        "EnableCppExceptions({name} {})",
        if target.has_exceptions_enabled() { "TRUE" } else { "FALSE" }
    )?;

    // Stored as discovered, the most dependent first. The compiler search
    // order needs the least dependent first
    writeln!(out, "target_include_directories({name} PRIVATE")?;
    for dir in reversed(&target.include_dirs) {
        writeln!(out, "    \"{}\"", escape(&filter.filter(dir)))?;
    }
    writeln!(out, ")")?;

    if !target.defines.is_empty() {
        writeln!(out, "target_compile_definitions({name} PRIVATE")?;
        for define in &target.defines {
            if !define.is_well_formed() {
                bail!(
                    "{}: '{}' = '{}' on target '{name}'",
                    error_messages::MALFORMED_DEFINE,
                    define.key,
                    define.value
                );
            }
            writeln!(out, "    \"{}={}\"", escape(&define.key), escape(&define.value))?;
        }
        writeln!(out, ")")?;
    }

    Ok(())
}

/// Frameworks, link libraries and the DLLs staged next to the output
fn write_link_settings(out: &mut String, target: &Target, filter: &PathFilter<'_>) -> Result<()> {
    let name = target.name.as_str();

    let mut framework_vars = Vec::new();
    for framework in &target.frameworks {
        let var = format!("{}_FRAMEWORK", framework.to_ascii_uppercase());
        if framework_vars.contains(&var) {
            continue;
        }
        writeln!(out, "find_library({var} {framework})")?;
        framework_vars.push(var);
    }

    // Stored as discovered, the deepest dependencies first. Linkers want the
    // dependents before their dependencies
    let has_libs = target.link_libs.iter().any(|lib| !lib.is_objects());
    if has_libs || !framework_vars.is_empty() {
        writeln!(out, "target_link_libraries({name} PRIVATE")?;
        for lib in reversed(&target.link_libs) {
            match lib {
                LinkLib::Objects(_) => {}
                LinkLib::Variable(expr) => writeln!(out, "    {expr}")?,
                LinkLib::Library(lib) => writeln!(out, "    \"{}\"", escape(&filter.filter(lib)))?,
            }
        }
        for var in &framework_vars {
            writeln!(out, "    ${{{var}}}")?;
        }
        writeln!(out, ")")?;
    }

    if !target.copy_dlls.is_empty() {
        writeln!(out, "AddDLLCopyStep({name}")?;
        for dll in reversed(&target.copy_dlls) {
            writeln!(out, "    \"{}\"", escape(&filter.filter(dll)))?;
        }
        writeln!(out, ")")?;
    }

    Ok(())
}

/// The entries accumulated by the dependency resolution, in the order the
/// generated project needs them
fn reversed<T>(stored: &[T]) -> impl Iterator<Item = &T> {
    stored.iter().rev()
}

fn source_var_names(target: &Target) -> Vec<String> {
    let base = format!("{}_SOURCES", target.name.to_ascii_uppercase());
    (0..target.source_groups.len())
        .map(|i| if i == 0 { base.clone() } else { format!("{base}_{i}") })
        .collect()
}

/// Escapes a value written between double quotes
fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
