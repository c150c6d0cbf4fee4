//! Runs the external CMake tool over a generated project: once to materialize
//! the native build system, and then to build it
//!
//! Both operations block until the child process exits. A tool that can't be
//! spawned, or that fails, is reported through the returned exit code and never
//! aborts the caller.

use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use color_eyre::Result;

use crate::cli::output::arguments::{cmake_args, Arguments};
use crate::domain::generator_options::GeneratorOptions;
use crate::utils::constants::dir_names;

/// The exit code reported when the child process couldn't run, or didn't exit normally
pub const FAILED_TO_RUN: i32 = -1;

/// Optional receiver of the human readable failure messages
pub type ErrorSink<'a> = Option<&'a mut dyn FnMut(&str)>;

/// The outcome of running the external tool
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub output: String,
}

impl CommandOutput {
    fn failed() -> Self {
        Self {
            exit_code: FAILED_TO_RUN,
            output: String::new(),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

fn report(error_sink: &mut ErrorSink<'_>, message: &str) {
    log::debug!("{}", message.trim_end());
    if let Some(sink) = error_sink.as_deref_mut() {
        sink(message);
    }
}

fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(FAILED_TO_RUN)
}

/// Generates the native build system of the `CMakeLists.txt` held by
/// `cmake_lists_folder`, into its `build` subdirectory.
///
/// Fails only when the `options` aren't valid. Any other failure, including a
/// non zero exit of CMake, is reported through `error_sink` and the exit code.
/// The standard output of CMake is captured and returned.
pub fn generate_cmake_project(
    cmake: &Path,
    cmake_lists_folder: &Path,
    options: &GeneratorOptions,
    mut error_sink: ErrorSink<'_>,
) -> Result<CommandOutput> {
    options.ensure_valid()?;

    let build_folder = cmake_lists_folder.join(dir_names::CMAKE_BUILD);
    // Already existing is fine
    if let Err(e) = std::fs::create_dir_all(&build_folder) {
        report(
            &mut error_sink,
            &format!("Can't create folder '{}': {e}\n", build_folder.display()),
        );
        return Ok(CommandOutput::failed());
    }

    let args = cmake_args::generate(options);
    log::debug!("Executing command => {} {args} (in {build_folder:?})", cmake.display());

    let result = run_capturing_stdout(cmake, &args, &build_folder);
    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            log::error!("Could not run {}: {e}", cmake.display());
            CommandOutput::failed()
        }
    };

    if !outcome.success() {
        report(
            &mut error_sink,
            &format!(
                "Error generating build system using CMake for folder '{}'\n",
                build_folder.display()
            ),
        );
    }

    Ok(outcome)
}

/// Builds a generated project in the given configuration, or in the default one
/// of the `options` when there's no override.
///
/// With `capture_output`, the standard output and error of the build are
/// collected, merged in arrival order, and returned instead of shown. Otherwise
/// the build inherits the standard streams of this process, so its progress is
/// visible live.
pub fn build_cmake_project(
    cmake: &Path,
    cmake_lists_folder: &Path,
    options: &GeneratorOptions,
    build_type_override: Option<&str>,
    capture_output: bool,
) -> Result<CommandOutput> {
    options.ensure_valid()?;

    let build_folder = cmake_lists_folder.join(dir_names::CMAKE_BUILD);
    let build_type = options.effective_build_type(build_type_override);
    let args = cmake_args::build(build_type);
    log::debug!("Executing command => {} {args} (in {build_folder:?})", cmake.display());

    let mut command = Command::new(cmake);
    command.args(&args).current_dir(&build_folder);

    let outcome = if capture_output {
        run_capturing_merged(command)
    } else {
        command.status().map(|status| CommandOutput {
            exit_code: exit_code(status),
            output: String::new(),
        })
    };

    Ok(outcome.unwrap_or_else(|e| {
        log::error!("Could not run {}: {e}", cmake.display());
        CommandOutput::failed()
    }))
}

/// Spawns the command with its standard output piped, and collects it line by
/// line as it arrives. The standard error goes to the one of this process
fn run_capturing_stdout(
    program: &Path,
    args: &Arguments,
    working_dir: &Path,
) -> std::io::Result<CommandOutput> {
    let mut child = Command::new(program)
        .args(args)
        .current_dir(working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .spawn()?;

    let mut output = String::new();
    if let Some(stdout) = child.stdout.take() {
        for line in BufReader::new(stdout).split(b'\n') {
            let line = String::from_utf8_lossy(&line?).into_owned();
            let line = line.strip_suffix('\r').unwrap_or(&line);
            log::trace!("{line}");
            output.push_str(line);
            output.push('\n');
        }
    }

    let status = child.wait()?;
    Ok(CommandOutput {
        exit_code: exit_code(status),
        output,
    })
}

/// Spawns the command with both its standard output and error writing into the
/// same pipe, so diagnostics stay next to the lines they belong to
fn run_capturing_merged(mut command: Command) -> std::io::Result<CommandOutput> {
    let (mut reader, writer) = std::io::pipe()?;
    command
        .stdin(Stdio::null())
        .stdout(writer.try_clone()?)
        .stderr(writer);

    let mut child = command.spawn()?;
    // The command holds the write ends until dropped, and the read below only
    // ends once every write end is closed
    drop(command);

    let mut raw = Vec::new();
    reader.read_to_end(&mut raw)?;
    let status = child.wait()?;

    Ok(CommandOutput {
        exit_code: exit_code(status),
        output: normalize_newlines(&String::from_utf8_lossy(&raw)),
    })
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_options_fail_fast() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let options = GeneratorOptions::default();

        assert!(generate_cmake_project(Path::new("cmake"), temp.path(), &options, None).is_err());
        assert!(!temp.path().join(dir_names::CMAKE_BUILD).exists());
        assert!(
            build_cmake_project(Path::new("cmake"), temp.path(), &options, None, true).is_err()
        );
        Ok(())
    }

    #[test]
    fn test_missing_tool_is_a_clean_failure() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let options = GeneratorOptions::new("Unix Makefiles", "Debug");
        let missing = temp.path().join("no-such-cmake");

        let mut messages = Vec::new();
        let mut sink = |msg: &str| messages.push(msg.to_string());
        let outcome = generate_cmake_project(&missing, temp.path(), &options, Some(&mut sink))?;

        assert_eq!(outcome.exit_code, FAILED_TO_RUN);
        assert!(temp.path().join(dir_names::CMAKE_BUILD).is_dir());
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("Error generating build system"));

        let outcome = build_cmake_project(&missing, temp.path(), &options, None, true)?;
        assert!(!outcome.success());
        Ok(())
    }

    #[test]
    fn test_unusable_build_folder_spawns_nothing() -> Result<()> {
        let temp = tempfile::tempdir()?;
        // A file where the build folder should be created
        crate::utils::fs::create_file(temp.path(), dir_names::CMAKE_BUILD, b"")?;
        let options = GeneratorOptions::new("Unix Makefiles", "Debug");

        let mut messages = Vec::new();
        let mut sink = |msg: &str| messages.push(msg.to_string());
        let outcome =
            generate_cmake_project(Path::new("cmake"), temp.path(), &options, Some(&mut sink))?;

        assert_eq!(outcome, CommandOutput::failed());
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("Can't create folder"));
        Ok(())
    }

    #[cfg(unix)]
    mod fake_cmake {
        use std::os::unix::fs::PermissionsExt;
        use std::path::PathBuf;

        use super::*;

        /// Writes a script standing in for CMake. It prints its working directory
        /// and arguments, and exits with the given code
        fn fake_cmake(dir: &Path, exit_code: i32) -> Result<PathBuf> {
            let path = dir.join("fake-cmake.sh");
            let script = format!(
                "#!/bin/sh\necho \"cwd=$(basename \"$PWD\")\"\necho \"oops\" >&2\necho \"args=$*\"\nexit {exit_code}\n"
            );
            std::fs::write(&path, script)?;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;
            Ok(path)
        }

        #[test]
        fn test_generate_captures_stdout() -> Result<()> {
            let temp = tempfile::tempdir()?;
            let cmake = fake_cmake(temp.path(), 0)?;
            let mut options = GeneratorOptions::new("Ninja", "Debug");
            options.toolset = Some("host=x64".to_string());

            let mut messages: Vec<String> = Vec::new();
            let mut sink = |msg: &str| messages.push(msg.to_string());
            let outcome = generate_cmake_project(&cmake, temp.path(), &options, Some(&mut sink))?;

            assert!(outcome.success());
            assert_eq!(
                outcome.output,
                "cwd=build\nargs=.. -G Ninja -T host=x64 -DCMAKE_BUILD_TYPE=Debug \
                 -DCMAKE_C_COMPILER_FORCED=1 -DCMAKE_CXX_COMPILER_FORCED=1\n"
            );
            assert!(messages.is_empty());
            Ok(())
        }

        #[test]
        fn test_generate_failure_still_returns_the_output() -> Result<()> {
            let temp = tempfile::tempdir()?;
            let cmake = fake_cmake(temp.path(), 3)?;
            let options = GeneratorOptions::new("Unix Makefiles", "Debug");

            let mut messages: Vec<String> = Vec::new();
            let mut sink = |msg: &str| messages.push(msg.to_string());
            let outcome = generate_cmake_project(&cmake, temp.path(), &options, Some(&mut sink))?;

            assert_eq!(outcome.exit_code, 3);
            assert!(outcome.output.starts_with("cwd=build\n"));
            assert_eq!(messages.len(), 1);
            Ok(())
        }

        #[test]
        fn test_build_with_captured_output() -> Result<()> {
            let temp = tempfile::tempdir()?;
            let cmake = fake_cmake(temp.path(), 0)?;
            std::fs::create_dir(temp.path().join(dir_names::CMAKE_BUILD))?;
            let options = GeneratorOptions::new("Xcode", "Debug");

            let outcome =
                build_cmake_project(&cmake, temp.path(), &options, Some("RelWithDebInfo"), true)?;
            assert!(outcome.success());
            assert_eq!(
                outcome.output,
                "cwd=build\noops\nargs=--build . --config RelWithDebInfo\n"
            );

            let outcome = build_cmake_project(&cmake, temp.path(), &options, None, true)?;
            assert!(outcome.output.contains("args=--build . --config Debug\n"));
            Ok(())
        }

        #[test]
        fn test_captured_build_keeps_diagnostics_in_place() -> Result<()> {
            let temp = tempfile::tempdir()?;
            let cmake = temp.path().join("noisy-cmake.sh");
            std::fs::write(
                &cmake,
                "#!/bin/sh\necho \"compiling a.cpp\"\necho \"a.cpp:1: error\" >&2\necho \"compiling b.cpp\"\nexit 1\n",
            )?;
            std::fs::set_permissions(&cmake, std::fs::Permissions::from_mode(0o755))?;
            std::fs::create_dir(temp.path().join(dir_names::CMAKE_BUILD))?;
            let options = GeneratorOptions::new("Unix Makefiles", "Debug");

            let outcome = build_cmake_project(&cmake, temp.path(), &options, None, true)?;
            assert_eq!(outcome.exit_code, 1);
            assert_eq!(
                outcome.output,
                "compiling a.cpp\na.cpp:1: error\ncompiling b.cpp\n"
            );
            Ok(())
        }

        #[test]
        fn test_build_with_inherited_output() -> Result<()> {
            let temp = tempfile::tempdir()?;
            let cmake = fake_cmake(temp.path(), 2)?;
            std::fs::create_dir(temp.path().join(dir_names::CMAKE_BUILD))?;
            let options = GeneratorOptions::new("Unix Makefiles", "Debug");

            let outcome = build_cmake_project(&cmake, temp.path(), &options, None, false)?;
            assert_eq!(outcome.exit_code, 2);
            assert!(outcome.output.is_empty());
            Ok(())
        }
    }
}
