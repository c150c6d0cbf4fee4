pub mod artifact;
pub mod catalog;
pub mod cli;
pub mod config_file;
pub mod domain;
pub mod generator;
pub mod utils;

/// The entry point for the execution of the program.
///
/// This module existence is motivated to let us run
/// integration tests for the whole operations of the program
/// without having to do fancy work about checking the
/// data sent to stdout/stderr
pub mod worker {
    use std::io::{self, Write};
    use std::path::{Path, PathBuf};

    use color_eyre::{
        eyre::{bail, eyre, Context},
        Result,
    };

    use crate::{
        artifact::{self, HostPlatform},
        catalog::{self, ManifestCatalog, TargetCatalog},
        cli::{
            input::{CliArgs, Command, FolderCommand, TargetCommand},
            output::executors,
        },
        domain::{
            build_folder::BuildFolder,
            dependency_tree::{DependencyTree, TreeIndent},
            generator_options::GeneratorOptions,
        },
        generator,
        utils::{self, constants::error_messages},
    };

    /// The main work of the project. Runs the tasks
    /// inputted in the CLI, printing their reports on the standard output
    pub fn run_cmakeforge(cli_args: &CliArgs, base_path: &Path) -> Result<()> {
        let stdout = io::stdout();
        run_cmakeforge_with_output(cli_args, base_path, &mut stdout.lock())
    }

    /// Same as [`run_cmakeforge`], writing the reports into `out`
    pub fn run_cmakeforge_with_output<W: Write>(
        cli_args: &CliArgs,
        base_path: &Path,
        out: &mut W,
    ) -> Result<()> {
        let workspace = determine_absolute_path_of_the_workspace(cli_args, base_path)?;
        log::debug!("Working on the workspace: {workspace:?}");

        match &cli_args.command {
            Command::Folder {
                action:
                    FolderCommand::Create {
                        name,
                        generator,
                        platform,
                        toolset,
                        build_type,
                        bootstrap,
                    },
            } => {
                let mut options = GeneratorOptions::new(generator, build_type);
                options.platform = platform.clone();
                options.toolset = toolset.clone();

                let mut folder = BuildFolder::new(name, options);
                folder.bootstrap = *bootstrap;
                BuildFolder::create(&workspace, folder)?;
                Ok(())
            }
            Command::Target { action } => run_target_command(action, &workspace, out),
            Command::Generate { folder } => generate(cli_args, &workspace, folder),
            Command::Build {
                folder,
                config,
                capture,
            } => build(cli_args, &workspace, folder, config.as_deref(), *capture, out),
            Command::OutputPath {
                target,
                folder,
                config,
            } => {
                let path = output_path(&workspace, folder, target, config.as_deref())?;
                writeln!(out, "{}", path.display())?;
                Ok(())
            }
        }
    }

    fn run_target_command<W: Write>(
        action: &TargetCommand,
        workspace: &Path,
        out: &mut W,
    ) -> Result<()> {
        let catalog = ManifestCatalog::discover(workspace)?;

        match action {
            TargetCommand::List { folder } => {
                let folder = BuildFolder::load(workspace, folder)?;
                writeln!(out, "List of root targets in build folder '{}':", folder.name)?;
                for name in &folder.root_targets {
                    match catalog.resolve(name) {
                        Some(handle) => writeln!(out, "    {}", catalog.short_name(handle))?,
                        None => writeln!(out, "    {name} (not found)")?,
                    }
                }
            }
            TargetCommand::Add {
                name,
                shared,
                folder,
            } => {
                let mut folder = BuildFolder::load(workspace, folder)?;
                let handle = catalog
                    .resolve(name)
                    .ok_or_else(|| eyre!("{}: '{name}'", error_messages::TARGET_NOT_FOUND))?;
                let qualified = catalog.fully_qualified_name(handle);

                folder.add_root_target(&qualified, *shared);
                folder.save()?;
                log::info!("Added root target '{qualified}' to folder '{}'", folder.name);
            }
            TargetCommand::Remove { name, folder } => {
                let mut folder = BuildFolder::load(workspace, folder)?;
                // Roots that don't resolve anymore can still be removed by their stored name
                let qualified = catalog
                    .resolve(name)
                    .map(|handle| catalog.fully_qualified_name(handle))
                    .unwrap_or_else(|| name.clone());

                folder.remove_root_target(&qualified)?;
                folder.save()?;
                log::info!("Removed root target '{qualified}' from folder '{}'", folder.name);
            }
            TargetCommand::Graph { folder } => {
                let folder = BuildFolder::load(workspace, folder)?;
                let tree = DependencyTree::build(&folder.root_targets, &catalog)?;

                writeln!(out, "Dependency graph for folder '{}':", folder.name)?;
                tree.render_roots(out, &TreeIndent::uniform("    "))?;
            }
        }

        Ok(())
    }

    /// Writes the CMake project of a build folder, and runs CMake over it
    fn generate(cli_args: &CliArgs, workspace: &Path, folder_name: &str) -> Result<()> {
        let folder = BuildFolder::load(workspace, folder_name)?;
        let catalog = ManifestCatalog::discover(workspace)?;

        let targets = catalog::instantiate(&catalog, &folder)?;
        let project = folder.project_folder(workspace, targets)?;
        generator::write_cmake_project(&project)?;

        let mut report_error = |message: &str| log::error!("{}", message.trim_end());
        let outcome = executors::generate_cmake_project(
            Path::new(&cli_args.cmake),
            Path::new(&project.root_path),
            &folder.cmake,
            Some(&mut report_error),
        )
        .with_context(|| error_messages::FAILURE_GENERATING_PROJECT)?;

        if !outcome.success() {
            bail!(
                "{} for folder '{folder_name}' (exit code: {})",
                error_messages::FAILURE_GENERATING_PROJECT,
                outcome.exit_code
            );
        }

        log::info!("Generated the native build system of folder '{folder_name}'");
        Ok(())
    }

    fn build<W: Write>(
        cli_args: &CliArgs,
        workspace: &Path,
        folder_name: &str,
        build_type_override: Option<&str>,
        capture_output: bool,
        out: &mut W,
    ) -> Result<()> {
        let folder = BuildFolder::load(workspace, folder_name)?;

        let outcome = executors::build_cmake_project(
            Path::new(&cli_args.cmake),
            &folder.path,
            &folder.cmake,
            build_type_override,
            capture_output,
        )
        .with_context(|| error_messages::FAILURE_BUILDING_PROJECT)?;

        if capture_output {
            out.write_all(outcome.output.as_bytes())?;
        }
        if !outcome.success() {
            bail!(
                "{} for folder '{folder_name}' (exit code: {})",
                error_messages::FAILURE_BUILDING_PROJECT,
                outcome.exit_code
            );
        }

        Ok(())
    }

    /// Resolves the output of a target exactly as the folder generates it, so a
    /// static library made shared by the folder resolves to a shared library
    fn output_path(
        workspace: &Path,
        folder_name: &str,
        target_name: &str,
        build_type_override: Option<&str>,
    ) -> Result<PathBuf> {
        let folder = BuildFolder::load(workspace, folder_name)?;
        let catalog = ManifestCatalog::discover(workspace)?;

        let handle = catalog
            .resolve(target_name)
            .ok_or_else(|| eyre!("{}: '{target_name}'", error_messages::TARGET_NOT_FOUND))?;
        let generated_name = catalog.unique_name(handle);

        let targets = catalog::instantiate(&catalog, &folder)?;
        let target = targets
            .iter()
            .find(|t| t.name == generated_name)
            .ok_or_else(|| {
                eyre!(
                    "Target '{}' isn't generated by folder '{folder_name}'",
                    catalog.fully_qualified_name(handle)
                )
            })?;

        let folder_root = utils::fs::get_absolute_path(&folder.path)?;
        artifact::resolve_output_path(
            target,
            &folder_root,
            &folder.cmake,
            build_type_override,
            HostPlatform::current(),
        )
    }

    /// Resolves the full path of the location of the workspace root on the fs. If the `--root`
    /// [`CliArgs`] arg is present, it will be used as the workspace root path, relative to
    /// `base_path` unless absolute, otherwise `base_path` itself is the workspace root
    fn determine_absolute_path_of_the_workspace(
        cli_args: &CliArgs,
        base_path: &Path,
    ) -> Result<PathBuf> {
        let workspace = match cli_args.root.as_deref() {
            Some(root) => base_path.join(root),
            None => base_path.to_path_buf(),
        };

        utils::fs::get_absolute_path(&workspace)
            .with_context(|| error_messages::FAILURE_GATHERING_WORKSPACE_ABS_PATH)
    }

}
