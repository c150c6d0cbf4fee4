//! Resolves where the primary output of a target lands once it's built, without
//! building anything. The naming rules mirror the ones CMake applies itself

use std::path::{Path, PathBuf};

use color_eyre::{eyre::bail, Result};

use crate::domain::generator_options::{ConfigModel, GeneratorOptions};
use crate::domain::target::{Target, TargetKind};
use crate::utils::{
    self,
    constants::{dir_names, error_messages},
};

/// The desktop platform conventions for naming binaries
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum HostPlatform {
    Windows,
    Apple,
    Linux,
}

impl HostPlatform {
    /// The platform this program was built for. Cross compilation isn't
    /// considered: the outputs are assumed native
    pub const fn current() -> Self {
        if cfg!(target_os = "windows") {
            HostPlatform::Windows
        } else if cfg!(target_vendor = "apple") {
            HostPlatform::Apple
        } else {
            HostPlatform::Linux
        }
    }
}

/// The file name decorations of a kind of output
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Affixes {
    pub prefix: &'static str,
    pub extension: &'static str,
}

impl Affixes {
    const fn new(prefix: &'static str, extension: &'static str) -> Self {
        Self { prefix, extension }
    }

    pub fn file_name(&self, name: &str) -> String {
        format!("{}{name}{}", self.prefix, self.extension)
    }
}

/// The prefix and extension of the primary output of a target kind
pub fn affixes(kind: TargetKind, platform: HostPlatform) -> Result<Affixes> {
    use HostPlatform::*;

    Ok(match (kind, platform) {
        (TargetKind::Executable, Windows) => Affixes::new("", ".exe"),
        (TargetKind::Executable, Apple | Linux) => Affixes::new("", ""),
        (TargetKind::SharedLib, Windows) => Affixes::new("", ".dll"),
        (TargetKind::SharedLib, Apple) => Affixes::new("lib", ".dylib"),
        (TargetKind::SharedLib, Linux) => Affixes::new("lib", ".so"),
        (TargetKind::StaticLib, Windows) => Affixes::new("", ".lib"),
        (TargetKind::StaticLib, Apple | Linux) => Affixes::new("lib", ".a"),
        (TargetKind::HeaderOnly | TargetKind::ObjectLib, _) => {
            bail!("{}: {kind}", error_messages::NO_PRIMARY_OUTPUT)
        }
    })
}

/// Computes the path of the primary output of `target`, for the build folder
/// rooted at `folder_root`.
///
/// Multi configuration generators nest the outputs under a directory named
/// after the configuration. Single configuration ones can only build the
/// configuration they were generated for, so a different `build_type_override`
/// is rejected.
pub fn resolve_output_path(
    target: &Target,
    folder_root: &Path,
    options: &GeneratorOptions,
    build_type_override: Option<&str>,
    platform: HostPlatform,
) -> Result<PathBuf> {
    let config_model = options.config_model()?;
    let build_type = options.effective_build_type(build_type_override);

    if config_model == ConfigModel::SingleConfig && build_type != options.build_type {
        bail!(
            "{} ('{}' was requested, but '{}' is generated with '{}' as build type)",
            error_messages::BUILD_TYPE_MISMATCH,
            build_type,
            folder_root.display(),
            options.build_type
        );
    }

    let file_name = affixes(target.kind, platform)?.file_name(&target.name);

    let mut components = vec![folder_root, Path::new(dir_names::CMAKE_BUILD)];
    if config_model == ConfigModel::MultiConfig {
        components.push(Path::new(build_type));
    }
    components.push(Path::new(&file_name));

    Ok(utils::fs::join_and_normalize(components))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn makefiles() -> GeneratorOptions {
        GeneratorOptions::new("Unix Makefiles", "Debug")
    }

    #[test]
    fn test_posix_executable_is_a_bare_name() -> Result<()> {
        let target = Target::new("app", TargetKind::Executable);
        let path = resolve_output_path(
            &target,
            Path::new("/ws/build/debug/"),
            &makefiles(),
            None,
            HostPlatform::Linux,
        )?;
        assert_eq!(path, Path::new("/ws/build/debug/build/app"));
        Ok(())
    }

    #[test]
    fn test_posix_shared_library() -> Result<()> {
        let target = Target::new("plugin", TargetKind::SharedLib);
        let path = resolve_output_path(
            &target,
            Path::new("/ws/build/debug"),
            &makefiles(),
            Some("Debug"),
            HostPlatform::Linux,
        )?;
        assert_eq!(path, Path::new("/ws/build/debug/build/libplugin.so"));
        Ok(())
    }

    #[test]
    fn test_multi_config_nests_the_configuration() -> Result<()> {
        let target = Target::new("core", TargetKind::StaticLib);
        let xcode = GeneratorOptions::new("Xcode", "Debug");

        let default = resolve_output_path(
            &target,
            Path::new("/ws/build/mac"),
            &xcode,
            None,
            HostPlatform::Apple,
        )?;
        assert_eq!(default, Path::new("/ws/build/mac/build/Debug/libcore.a"));

        let other = resolve_output_path(
            &target,
            Path::new("/ws/build/mac"),
            &xcode,
            Some("RelWithDebInfo"),
            HostPlatform::Apple,
        )?;
        assert_eq!(other, Path::new("/ws/build/mac/build/RelWithDebInfo/libcore.a"));
        Ok(())
    }

    #[test]
    fn test_single_config_rejects_another_build_type() {
        let target = Target::new("app", TargetKind::Executable);
        assert!(resolve_output_path(
            &target,
            Path::new("/ws/build/debug"),
            &makefiles(),
            Some("RelWithAsserts"),
            HostPlatform::Linux,
        )
        .is_err());
    }

    #[test]
    fn test_unknown_generator_is_rejected() {
        let target = Target::new("app", TargetKind::Executable);
        let options = GeneratorOptions::new("Borland Makefiles", "Debug");
        assert!(resolve_output_path(
            &target,
            Path::new("/ws/build/debug"),
            &options,
            None,
            HostPlatform::Linux,
        )
        .is_err());
    }

    #[test]
    fn test_affix_tables() -> Result<()> {
        use HostPlatform::*;

        let cases = [
            (TargetKind::Executable, Windows, "app.exe"),
            (TargetKind::Executable, Apple, "app"),
            (TargetKind::SharedLib, Windows, "app.dll"),
            (TargetKind::SharedLib, Apple, "libapp.dylib"),
            (TargetKind::StaticLib, Windows, "app.lib"),
            (TargetKind::StaticLib, Linux, "libapp.a"),
        ];
        for (kind, platform, expected) in cases {
            assert_eq!(affixes(kind, platform)?.file_name("app"), expected);
        }

        assert!(affixes(TargetKind::HeaderOnly, Linux).is_err());
        assert!(affixes(TargetKind::ObjectLib, Windows).is_err());
        Ok(())
    }
}
