//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::application::IoResultExt;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Execute the parsed command line.
pub fn execute(cli: &Cli) -> CliResult<()> {
    let project_dir = resolve_project_dir(cli.project_dir.as_deref())?;
    debug!("execute: project_dir={}", project_dir.display());

    match &cli.command {
        None => cmd_run(&project_dir, &[]),
        Some(Commands::Run { roots }) => cmd_run(&project_dir, roots),
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show => cmd_config_show(&project_dir),
            ConfigCommands::Init { global } => cmd_config_init(&project_dir, *global),
            ConfigCommands::Path => cmd_config_path(&project_dir),
        },
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "lineref", &mut io::stdout());
            Ok(())
        }
    }
}

fn resolve_project_dir(project_dir: Option<&Path>) -> CliResult<PathBuf> {
    match project_dir {
        Some(dir) if dir.is_dir() => Ok(dir.to_path_buf()),
        Some(dir) => Err(CliError::InvalidArgs(format!(
            "project directory does not exist: {}",
            dir.display()
        ))),
        None => Ok(std::env::current_dir()
            .with_path_context("resolve current directory", Path::new("."))?),
    }
}

#[instrument(skip(roots))]
fn cmd_run(project_dir: &Path, roots: &[PathBuf]) -> CliResult<()> {
    let settings = Settings::load(Some(project_dir))?.with_roots(roots.to_vec());
    let roots = settings.resolve_roots(project_dir);
    debug!("cmd_run: roots={:?}", roots);

    let container = ServiceContainer::new(settings);
    let rewriter = container.rewriter()?;

    rewriter.traverse_all(&roots, |path| {
        if let Some(name) = path.file_name() {
            output::info(&name.to_string_lossy());
        }
    })?;
    Ok(())
}

fn cmd_config_show(project_dir: &Path) -> CliResult<()> {
    let settings = Settings::load(Some(project_dir))?;
    output::info(&settings.to_toml()?);
    Ok(())
}

fn cmd_config_init(project_dir: &Path, global: bool) -> CliResult<()> {
    let path = if global {
        global_config_path().ok_or_else(|| {
            CliError::Usage("cannot determine global config directory".to_string())
        })?
    } else {
        local_config_path(project_dir)
    };

    let fs = RealFileSystem;
    if fs.exists(&path) {
        return Err(CliError::Usage(format!(
            "config already exists: {}",
            path.display()
        )));
    }

    fs.ensure_parent(&path)
        .with_path_context("create config directory", &path)?;
    fs.write(&path, &Settings::template())
        .with_path_context("write config", &path)?;

    output::success(&format!("Created {}", path.display()));
    Ok(())
}

fn cmd_config_path(project_dir: &Path) -> CliResult<()> {
    let marker = |path: &Path| if path.exists() { "" } else { " (not found)" };

    output::header("Config files (lowest to highest precedence):");
    match global_config_path() {
        Some(global) => output::detail(&format!(
            "global: {}{}",
            global.display(),
            marker(&global)
        )),
        None => output::detail("global: unavailable"),
    }
    let local = local_config_path(project_dir);
    output::detail(&format!("local:  {}{}", local.display(), marker(&local)));
    output::detail("env:    LINEREF_ROOTS");
    Ok(())
}
