//! The higher abstractions of the program: the buildable units that end up
//! written into a generated project

use core::fmt;

use serde::{Deserialize, Serialize};

/// The name of the abstract flag that turns on the C++ exceptions for a [`Target`]
pub const EXCEPTIONS_FLAG: &str = "exceptions";

/// One buildable unit of a generated project.
///
/// Instances are produced by the instantiation pass over the target catalog
/// (see [`crate::catalog::instantiate`]) and are read only from then on.
///
/// The collections that are filled by the dependency resolution (`include_dirs`,
/// `link_libs` and `copy_dlls`) are stored in discovery order, which places the
/// deepest dependencies first. The generator reverses them before emission.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Target {
    pub name: String,
    pub kind: TargetKind,
    pub source_groups: Vec<SourceGroup>,
    pub include_dirs: Vec<String>,
    pub defines: Vec<Define>,
    pub link_libs: Vec<LinkLib>,
    pub frameworks: Vec<String>,
    pub copy_dlls: Vec<String>,
    pub resource_copy_folders: Vec<ResourceCopyFolder>,
    pub precompiled_header: Option<PrecompiledHeader>,
    pub abstract_flags: Vec<String>,
}

impl Target {
    pub fn new(name: impl Into<String>, kind: TargetKind) -> Self {
        Self {
            name: name.into(),
            kind,
            ..Default::default()
        }
    }

    /// Whether the abstract capability flags of this target turn on the C++ exceptions
    pub fn has_exceptions_enabled(&self) -> bool {
        self.abstract_flags.iter().any(|flag| flag == EXCEPTIONS_FLAG)
    }
}

/// The different types of final products
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Default, Copy, Clone, Hash)]
pub enum TargetKind {
    #[serde(
        alias = "HeaderOnly",
        alias = "header-only",
        alias = "header_only",
        alias = "headers"
    )]
    HeaderOnly,
    #[serde(
        alias = "StaticLib",
        alias = "static lib",
        alias = "static-lib",
        alias = "static_lib",
        alias = "staticlib"
    )]
    StaticLib,
    #[serde(
        alias = "ObjectLib",
        alias = "object-lib",
        alias = "object_lib",
        alias = "objects"
    )]
    ObjectLib,
    #[serde(
        alias = "SharedLib",
        alias = "shared-lib",
        alias = "shared_lib",
        alias = "dylib",
        alias = "dll"
    )]
    SharedLib,
    #[default]
    #[serde(alias = "Executable", alias = "executable", alias = "exe")]
    Executable,
}

impl TargetKind {
    /// Only shared libraries and executables go through a final link step
    pub fn is_linked(&self) -> bool {
        matches!(self, TargetKind::SharedLib | TargetKind::Executable)
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKind::HeaderOnly => write!(f, "header-only"),
            TargetKind::StaticLib => write!(f, "static library"),
            TargetKind::ObjectLib => write!(f, "object library"),
            TargetKind::SharedLib => write!(f, "shared library"),
            TargetKind::Executable => write!(f, "executable"),
        }
    }
}

/// A group of source files sharing a common root directory. Every group becomes
/// one named source variable in the generated project
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct SourceGroup {
    pub root: String,
    pub files: Vec<String>,
}

impl SourceGroup {
    pub fn new<I, S>(root: impl Into<String>, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            root: root.into(),
            files: files.into_iter().map(Into::into).collect(),
        }
    }
}

/// A private preprocessor definition. Neither the key nor the value may hold a `=`
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Define {
    pub key: String,
    pub value: String,
}

impl Define {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn is_well_formed(&self) -> bool {
        !self.key.contains('=') && !self.value.contains('=')
    }
}

/// One entry of the link libraries of a [`Target`]
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum LinkLib {
    /// The compiled objects of an object library, which are handed to the linker
    /// as sources of the dependent target
    Objects(String),
    /// An already formed generator expression or variable, like `${FOO_LIBRARY}`
    Variable(String),
    /// A target name or the path of a prebuilt library
    Library(String),
}

impl LinkLib {
    pub fn is_objects(&self) -> bool {
        matches!(self, LinkLib::Objects(_))
    }
}

impl fmt::Display for LinkLib {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkLib::Objects(target) => write!(f, "$<TARGET_OBJECTS:{target}>"),
            LinkLib::Variable(expr) => write!(f, "{expr}"),
            LinkLib::Library(lib) => write!(f, "{lib}"),
        }
    }
}

/// A folder copied next to the build output once the target is built
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct ResourceCopyFolder {
    pub source: String,
    pub destination: String,
}

/// The precompiled header of a target
///
/// * `generator_source` - the source file that produces the precompiled header
/// * `include` - the header name as it's included by the other sources
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct PrecompiledHeader {
    pub generator_source: String,
    pub include: String,
}
