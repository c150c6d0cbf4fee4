//! Constant value definitions to use across the whole program

/// The names of the `cmakeforge` specific directories, not their paths
pub mod dir_names {
    /// Where the build folders live, relative to the workspace root
    pub const BUILD_FOLDERS: &str = "build";
    /// Where the external generator materializes the native project, relative to a build folder
    pub const CMAKE_BUILD: &str = "build";
    /// The framework sources, relative to the workspace root
    pub const WORKSPACE_SOURCES: &str = "src";
}

pub mod cmake {
    pub const CMAKE_LISTS: &str = "CMakeLists.txt";
    pub const MINIMUM_VERSION: &str = "3.8";
    pub const CONFIGURATION_TYPES: &str = "Debug;RelWithAsserts;RelWithDebInfo";
    pub const WORKSPACE_FOLDER_VAR: &str = "WORKSPACE_FOLDER";
    pub const SRC_FOLDER_VAR: &str = "SRC_FOLDER";
    pub const BUILD_FOLDER_VAR: &str = "BUILD_FOLDER";
    pub const C_COMPILER_FORCED: &str = "-DCMAKE_C_COMPILER_FORCED=1";
    pub const CXX_COMPILER_FORCED: &str = "-DCMAKE_CXX_COMPILER_FORCED=1";
    pub const DEFAULT_EXECUTABLE: &str = "cmake";

    #[cfg(target_os = "windows")]
    pub const DEFAULT_GENERATOR: &str = "Visual Studio 17 2022";
    #[cfg(target_vendor = "apple")]
    pub const DEFAULT_GENERATOR: &str = "Xcode";
    #[cfg(not(any(target_os = "windows", target_vendor = "apple")))]
    pub const DEFAULT_GENERATOR: &str = "Unix Makefiles";
}

pub mod error_messages {
    pub const READ_MANIFEST: &str = "Could not read the targets manifest";
    pub const PARSE_MANIFEST: &str = "Could not parse the targets manifest";
    pub const NO_MANIFESTS_FOUND: &str = "No targets manifests found on the workspace";
    pub const DUPLICATED_TARGET: &str = "Target declared more than once";
    pub const TARGET_NOT_FOUND: &str = "Can't find target";
    pub const UNKNOWN_DEPENDENCY: &str = "Unknown dependency";
    pub const DEPENDENCY_CYCLE: &str = "Dependency cycle detected at target";
    pub const INVALID_SOURCE_GLOB: &str = "Invalid source file pattern";
    pub const LOAD_BUILD_FOLDER: &str = "Could not load the build folder";
    pub const SAVE_BUILD_FOLDER: &str = "Could not save the build folder";
    pub const INVALID_GENERATOR_OPTIONS: &str =
        "The generator options aren't valid, a CMake generator name is required";
    pub const UNRECOGNIZED_GENERATOR: &str = "Unrecognized CMake generator";
    pub const MALFORMED_DEFINE: &str = "Preprocessor definitions can't contain '='";
    pub const BUILD_TYPE_MISMATCH: &str =
        "A single configuration build folder can't build a configuration other than the one it was generated for";
    pub const NO_PRIMARY_OUTPUT: &str = "Targets of this kind don't produce a primary output file";
    pub const FAILURE_WRITING_CMAKE_LISTS: &str = "Failed to write the generated CMakeLists.txt";
    pub const FAILURE_GENERATING_PROJECT: &str = "Failed to generate the CMake project";
    pub const FAILURE_BUILDING_PROJECT: &str = "Failed to build the CMake project";
    pub const FAILURE_GATHERING_WORKSPACE_ABS_PATH: &str =
        "An unexpected error happened while resolving the absolute path to the workspace root";
}

pub const FOLDER_FILENAME: &str = "folder.toml";
pub const MANIFEST_FILENAME: &str = "targets.toml";
pub const HELPER_SCRIPT_FILENAME: &str = "Helper.cmake";
pub const DEFAULT_BUILD_TYPE: &str = "Debug";
pub const MANIFEST_SEARCH_DEPTH: usize = 4;

pub const CONFIG_FILE_MOCK: &str = r#"
[module]
name = "engine"

[targets.platform]
kind = "header_only"
sources = [ { root = "platform", files = [ "platform.h" ] } ]
public_include_dirs = [ "platform" ]

[targets.core]
kind = "static_lib"
sources = [ { root = "core", files = [ "core.cpp", "core.h" ] } ]
dependencies = [ "platform" ]
public_include_dirs = [ "core" ]
defines = { CORE_STATIC = "1" }
flags = [ "exceptions" ]

[targets.app]
kind = "executable"
sources = [ { root = "app", files = [ "main.cpp" ] } ]
dependencies = [ "core" ]
resources = [ { source = "assets", destination = "assets" } ]
"#;
