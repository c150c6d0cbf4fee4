//! Types and procedures that represents a command line argument,
//! or collections of command line arguments

use std::ffi::OsStr;
use std::ops::Deref;

/// Type for represent a command line argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub value: String,
}

impl From<&str> for Argument {
    fn from(value: &str) -> Self {
        Self {
            value: value.to_string(),
        }
    }
}

impl From<String> for Argument {
    fn from(value: String) -> Self {
        Self { value }
    }
}

impl From<&String> for Argument {
    fn from(value: &String) -> Self {
        Self::from(value.as_str())
    }
}

impl AsRef<OsStr> for Argument {
    fn as_ref(&self) -> &OsStr {
        OsStr::new(&self.value)
    }
}

impl core::fmt::Display for Argument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Strong type for represent a linear collection of [`Argument`]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Arguments(Vec<Argument>);

impl Arguments {
    /// Wraps an existing [`std::vec::Vec`] of [`Argument`]
    pub fn from_vec(vec: Vec<Argument>) -> Self {
        Self(vec)
    }

    /// Creates and stores a new [`Argument`] to the end of this collection
    pub fn create_and_push<T>(&mut self, val: T)
    where
        T: Into<Argument>,
    {
        self.0.push(val.into())
    }

    pub fn as_strs(&self) -> Vec<&str> {
        self.0.iter().map(|arg| arg.value.as_str()).collect()
    }
}

impl Deref for Arguments {
    type Target = [Argument];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> IntoIterator for &'a Arguments {
    type Item = &'a Argument;
    type IntoIter = std::slice::Iter<'a, Argument>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl core::fmt::Display for Arguments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined = self.as_strs().join(" ");
        write!(f, "{joined}")
    }
}

pub mod cmake_args {
    use crate::domain::generator_options::GeneratorOptions;
    use crate::utils::constants::cmake;

    use super::*;

    /// The arguments that generate the native project, run from the `build`
    /// subdirectory of the folder holding the `CMakeLists.txt`
    pub fn generate(options: &GeneratorOptions) -> Arguments {
        let mut args = Arguments::from_vec(vec![
            Argument::from(".."),
            Argument::from("-G"),
            Argument::from(&options.generator),
        ]);

        if let Some(platform) = options.platform.as_deref().filter(|p| !p.is_empty()) {
            args.create_and_push("-A");
            args.create_and_push(platform);
        }
        if let Some(toolset) = options.toolset.as_deref().filter(|t| !t.is_empty()) {
            args.create_and_push("-T");
            args.create_and_push(toolset);
        }

        args.create_and_push(format!("-DCMAKE_BUILD_TYPE={}", options.build_type));
        // The compilers are never probed, the generator trusts the toolchain
        args.create_and_push(cmake::C_COMPILER_FORCED);
        args.create_and_push(cmake::CXX_COMPILER_FORCED);
        args
    }

    /// The arguments that build the given configuration of a generated project
    pub fn build(build_type: &str) -> Arguments {
        Arguments::from_vec(vec![
            Argument::from("--build"),
            Argument::from("."),
            Argument::from("--config"),
            Argument::from(build_type),
        ])
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_generate_arguments() {
            let options = GeneratorOptions::new("Unix Makefiles", "Debug");
            assert_eq!(
                generate(&options).as_strs(),
                vec![
                    "..",
                    "-G",
                    "Unix Makefiles",
                    "-DCMAKE_BUILD_TYPE=Debug",
                    "-DCMAKE_C_COMPILER_FORCED=1",
                    "-DCMAKE_CXX_COMPILER_FORCED=1"
                ]
            );
        }

        #[test]
        fn test_generate_arguments_with_platform_and_toolset() {
            let mut options = GeneratorOptions::new("Visual Studio 17 2022", "RelWithAsserts");
            options.platform = Some("x64".to_string());
            options.toolset = Some("ClangCL".to_string());
            assert_eq!(
                generate(&options).to_string(),
                ".. -G Visual Studio 17 2022 -A x64 -T ClangCL -DCMAKE_BUILD_TYPE=RelWithAsserts \
                 -DCMAKE_C_COMPILER_FORCED=1 -DCMAKE_CXX_COMPILER_FORCED=1"
            );
        }

        #[test]
        fn test_build_arguments() {
            assert_eq!(
                build("RelWithDebInfo").as_strs(),
                vec!["--build", ".", "--config", "RelWithDebInfo"]
            );
        }
    }
}
