//! The command line interface of `cmakeforge`

use clap::{Parser, Subcommand};

use crate::utils::constants::{cmake, DEFAULT_BUILD_TYPE};

/// [`CliArgs`] is the command line arguments parser
///
/// #Test
/// ```rust
/// use clap::Parser;
/// use cmakeforge::cli::input::{CliArgs, Command, TargetCommand};
///
/// let parser = CliArgs::parse_from(["", "-vv", "generate", "--folder", "debug"]);
/// assert_eq!(2, parser.verbose);
/// assert_eq!(parser.command, Command::Generate { folder: "debug".to_string() });
///
/// let parser = CliArgs::parse_from(["", "target", "add", "engine.core", "--shared", "--folder", "debug"]);
/// assert_eq!(
///     parser.command,
///     Command::Target {
///         action: TargetCommand::Add {
///             name: "engine.core".to_string(),
///             shared: true,
///             folder: "debug".to_string(),
///         }
///     }
/// );
/// ```
#[derive(Parser, Debug)]
#[command(name = "cmakeforge")]
#[command(author = "Zero Day Code")]
#[command(version = "0.3.0")]
#[command(
    about = "cmakeforge generates CMake projects for the targets declared on a workspace",
    long_about = "cmakeforge turns the declarative targets of a workspace into a \
    CMakeLists.txt, and drives CMake to generate and build it"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, action = clap::ArgAction::Count, help = "cmakeforge maximum allowed verbosity level is: '-vv'")]
    pub verbose: u8,

    #[arg(short, long, help = "The workspace root. Defaults to the current directory")]
    pub root: Option<String>,

    #[arg(long, default_value = cmake::DEFAULT_EXECUTABLE, help = "The CMake executable to run")]
    pub cmake: String,
}

/// [`Command`] - The core enum commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Manages the build folders of the workspace
    Folder {
        #[command(subcommand)]
        action: FolderCommand,
    },
    /// Manages the root targets of a build folder
    Target {
        #[command(subcommand)]
        action: TargetCommand,
    },
    /// Writes the CMake project of a build folder, and generates its native build system
    Generate {
        #[arg(long)]
        folder: String,
    },
    /// Builds a previously generated build folder
    Build {
        #[arg(long)]
        folder: String,
        #[arg(long, help = "The configuration to build, instead of the folder's default one")]
        config: Option<String>,
        #[arg(long, help = "Collect the output of the build and print it once finished")]
        capture: bool,
    },
    /// Prints where the primary output of a target lands once built
    OutputPath {
        target: String,
        #[arg(long)]
        folder: String,
        #[arg(long)]
        config: Option<String>,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum FolderCommand {
    /// Creates a new, empty, build folder
    Create {
        name: String,
        #[arg(long, default_value = cmake::DEFAULT_GENERATOR)]
        generator: String,
        #[arg(long)]
        platform: Option<String>,
        #[arg(long)]
        toolset: Option<String>,
        #[arg(long, default_value = DEFAULT_BUILD_TYPE)]
        build_type: String,
        #[arg(long, help = "Virtualize the paths, so the generated project can be relocated")]
        bootstrap: bool,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum TargetCommand {
    /// Lists the root targets of a build folder
    List {
        #[arg(long)]
        folder: String,
    },
    /// Adds a root target to a build folder
    Add {
        name: String,
        #[arg(long, help = "Build the target as a shared library, if it's a static one")]
        shared: bool,
        #[arg(long)]
        folder: String,
    },
    /// Removes a root target from a build folder
    Remove {
        name: String,
        #[arg(long)]
        folder: String,
    },
    /// Prints the dependency graph of the root targets of a build folder
    Graph {
        #[arg(long)]
        folder: String,
    },
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_folder_create_defaults() {
        let parser = CliArgs::parse_from(["", "folder", "create", "debug"]);
        assert_eq!(parser.cmake, "cmake");
        assert_eq!(parser.root, None);
        assert_eq!(
            parser.command,
            Command::Folder {
                action: FolderCommand::Create {
                    name: "debug".to_string(),
                    generator: cmake::DEFAULT_GENERATOR.to_string(),
                    platform: None,
                    toolset: None,
                    build_type: "Debug".to_string(),
                    bootstrap: false,
                }
            }
        );
    }

    #[test]
    fn test_folder_create_with_every_option() {
        let parser = CliArgs::parse_from([
            "",
            "--root",
            "/ws",
            "folder",
            "create",
            "vs",
            "--generator",
            "Visual Studio 17 2022",
            "--platform",
            "x64",
            "--toolset",
            "ClangCL",
            "--build-type",
            "RelWithAsserts",
            "--bootstrap",
        ]);
        assert_eq!(parser.root.as_deref(), Some("/ws"));
        let Command::Folder {
            action:
                FolderCommand::Create {
                    platform,
                    toolset,
                    build_type,
                    bootstrap,
                    ..
                },
        } = parser.command
        else {
            panic!("Expected a folder creation command");
        };
        assert_eq!(platform.as_deref(), Some("x64"));
        assert_eq!(toolset.as_deref(), Some("ClangCL"));
        assert_eq!(build_type, "RelWithAsserts");
        assert!(bootstrap);
    }

    #[test]
    fn test_build_and_output_path() {
        let parser = CliArgs::parse_from(["", "build", "--folder", "debug", "--capture"]);
        assert_eq!(
            parser.command,
            Command::Build {
                folder: "debug".to_string(),
                config: None,
                capture: true,
            }
        );

        let parser = CliArgs::parse_from([
            "",
            "output-path",
            "engine.app",
            "--folder",
            "vs",
            "--config",
            "RelWithDebInfo",
        ]);
        assert_eq!(
            parser.command,
            Command::OutputPath {
                target: "engine.app".to_string(),
                folder: "vs".to_string(),
                config: Some("RelWithDebInfo".to_string()),
            }
        );
    }

    #[test]
    fn test_folder_is_required() {
        assert!(CliArgs::try_parse_from(["", "target", "list"]).is_err());
        assert!(CliArgs::try_parse_from(["", "generate"]).is_err());
    }
}
