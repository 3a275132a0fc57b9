//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::services::ScanOptions;
use crate::application::IoResultExt;
use crate::cli::args::{Cli, Commands, ConfigCommands, RenderArgs};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::RenderOptions;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::ServiceContainer;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        None => _render(&cli.render),
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show { dir } => _config_show(dir.as_deref()),
            ConfigCommands::Init { global, force } => _config_init(*global, *force),
            ConfigCommands::Path => _config_path(),
        },
        Some(Commands::Completion { shell }) => _completion(*shell),
    }
}

#[instrument(level = "debug")]
fn _render(args: &RenderArgs) -> CliResult<()> {
    let settings = Settings::load(Some(&render_root(args)))?;
    let tree = render_directory(args, &settings)?;
    output::info(&tree);
    Ok(())
}

fn render_root(args: &RenderArgs) -> PathBuf {
    args.dir.clone().unwrap_or_else(|| PathBuf::from("."))
}

/// Scan the requested directory and render it.
///
/// `settings` are the loaded config layers (see [`crate::config`]); the
/// command-line flags in `args` are applied on top.
pub fn render_directory(args: &RenderArgs, settings: &Settings) -> CliResult<String> {
    let dir = render_root(args);
    let settings = settings.merge_with(&args.to_overrides());
    debug!("effective settings: {:?}", settings);

    let container = ServiceContainer::new(settings);
    let options = ScanOptions::from_settings(&container.settings)?;
    let tree = container.scanner.scan(&dir, &options)?;

    let render_options = RenderOptions::new()
        .sort_labels(container.settings.sort)
        .branches_first(container.settings.dirs_first);
    Ok(tree.render_with(render_options))
}

#[instrument(level = "debug")]
fn _config_show(dir: Option<&Path>) -> CliResult<()> {
    let dir = dir.unwrap_or(Path::new("."));
    let settings = Settings::load(Some(dir))?;
    output::info(&settings.to_toml()?);
    Ok(())
}

#[instrument(level = "debug")]
fn _config_init(global: bool, force: bool) -> CliResult<()> {
    let path = if global {
        global_config_path().ok_or_else(|| {
            CliError::Usage("cannot determine global config directory".to_string())
        })?
    } else {
        local_config_path(Path::new("."))
    };
    init_config(&RealFileSystem, &path, force)?;
    output::success(&format!("Created {}", path.display()));
    Ok(())
}

/// Write the config template to `path`, refusing to overwrite unless `force`.
pub fn init_config(fs: &dyn FileSystem, path: &Path, force: bool) -> CliResult<()> {
    if fs.exists(path) && !force {
        return Err(CliError::Usage(format!(
            "config file already exists: {} (use --force to overwrite)",
            path.display()
        )));
    }
    fs.ensure_parent(path)
        .with_path_context("create config directory", path)?;
    fs.write(path, &Settings::template())
        .with_path_context("write config", path)?;
    Ok(())
}

fn _config_path() -> CliResult<()> {
    match global_config_path() {
        Some(path) => output::action("global", &path.display()),
        None => output::action("global", "(unavailable)"),
    }
    output::action("local", &local_config_path(Path::new(".")).display());
    Ok(())
}

fn _completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
