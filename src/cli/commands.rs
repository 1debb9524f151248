//! Command dispatch: each subcommand loads settings and services, then prints.

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::ToggleOp;
use crate::application::{release_views, ApplicationError, TreeView};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::Selection;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see `checktree --help`".to_string(),
        ));
    };

    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let dir = resolve_dir(cli.dir.as_deref())?;
    let settings = Settings::load(Some(&dir))?;
    let container = ServiceContainer::new(settings);

    match command {
        Commands::Show {
            file,
            set,
            ids,
            counts,
        } => cmd_show(&container, file, set, *ids, *counts),
        Commands::Leaves { file, set } => cmd_leaves(&container, file, set),
        Commands::State { file, id, set } => cmd_state(&container, file, id, set),
        Commands::Validate { file } => cmd_validate(&container, file),
        Commands::Config { command } => cmd_config(&container, command, &dir),
        Commands::Completion { .. } => Ok(()),
    }
}

fn resolve_dir(dir: Option<&Path>) -> CliResult<PathBuf> {
    match dir {
        Some(d) => Ok(d.to_path_buf()),
        None => std::env::current_dir()
            .map_err(|e| CliError::Infra(InfraError::io("resolve current directory", e))),
    }
}

fn load_and_apply(
    container: &ServiceContainer,
    file: &Path,
    set: &[ToggleOp],
) -> CliResult<Selection> {
    let mut selection = container.selection.load(file)?;
    container.selection.apply(&mut selection, set)?;
    debug!("selection holds {} checked ids", selection.len());
    Ok(selection)
}

#[instrument(skip(container))]
fn cmd_show(
    container: &ServiceContainer,
    file: &Path,
    set: &[ToggleOp],
    ids: bool,
    counts: bool,
) -> CliResult<()> {
    let selection = load_and_apply(container, file, set)?;

    let mut display = container.settings.display.clone();
    display.show_ids |= ids;
    display.show_counts |= counts;

    let views = selection.to_tree_views(&display);
    for tree in &views {
        print!("{}", tree);
    }
    release_views(views);
    Ok(())
}

#[instrument(skip(container))]
fn cmd_leaves(container: &ServiceContainer, file: &Path, set: &[ToggleOp]) -> CliResult<()> {
    let selection = load_and_apply(container, file, set)?;
    for id in selection.checked_leaf_ids() {
        output::info(id);
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_state(
    container: &ServiceContainer,
    file: &Path,
    id: &str,
    set: &[ToggleOp],
) -> CliResult<()> {
    let selection = load_and_apply(container, file, set)?;
    let state = selection
        .tristate(id)
        .map_err(ApplicationError::from)?;
    output::info(&state);
    Ok(())
}

#[instrument(skip(container))]
fn cmd_validate(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let selection = container.selection.load(file)?;
    let summary = container.selection.summary(selection.tree());

    output::success(&format!("valid: {}", file.display()));
    output::detail(&format!("nodes:  {}", summary.nodes));
    output::detail(&format!("roots:  {}", summary.roots));
    output::detail(&format!("leaves: {}", summary.leaves));
    output::detail(&format!("depth:  {}", summary.depth));
    if !selection.is_empty() {
        output::detail(&format!(
            "initially checked leaves: {}",
            selection.checked_leaf_ids().len()
        ));
    }
    Ok(())
}

fn cmd_config(
    container: &ServiceContainer,
    command: &ConfigCommands,
    dir: &Path,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
        }
        ConfigCommands::Template => {
            output::info(&Settings::template());
        }
        ConfigCommands::Path => {
            output::header("Config files (lowest to highest precedence)");
            match global_config_path() {
                Some(path) => output::action("global", &describe(container, &path)),
                None => output::action("global", "unavailable"),
            }
            output::action("local", &describe(container, &local_config_path(dir)));
        }
    }
    Ok(())
}

fn describe(container: &ServiceContainer, path: &Path) -> String {
    if container.fs.exists(path) {
        path.display().to_string()
    } else {
        format!("{} (not present)", path.display())
    }
}
