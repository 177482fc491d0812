//! Command dispatch: load settings and records, run one query, print the result.

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::load_index;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{Record, RecordId, TreeDisplay, TreeIndex};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        Cli::command()
            .print_help()
            .map_err(|e| CliError::Output(e.to_string()))?;
        return Ok(());
    };

    let config_dir = resolve_config_dir(cli.config_dir.as_deref())?;

    match command {
        Commands::All { file } => _all(&config_dir, file),
        Commands::Item { file, id, position } => _item(&config_dir, file, id, *position),
        Commands::Children { file, id } => _children(&config_dir, file, id),
        Commands::Parents { file, id } => _parents(&config_dir, file, id),
        Commands::Tree { file } => _tree(&config_dir, file),
        Commands::Info { file } => _info(&config_dir, file),
        Commands::Config { command } => match command {
            ConfigCommands::Show => _config_show(&config_dir),
            ConfigCommands::Path => _config_path(&config_dir),
        },
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}

fn resolve_config_dir(dir: Option<&Path>) -> CliResult<PathBuf> {
    match dir {
        Some(dir) => Ok(dir.to_path_buf()),
        None => std::env::current_dir().map_err(|e| {
            CliError::InvalidArgs(format!("cannot determine current directory: {}", e))
        }),
    }
}

fn open_index(config_dir: &Path, file: &Path) -> CliResult<TreeIndex> {
    let settings = Settings::load(Some(config_dir))?;
    debug!(?settings, "effective settings");
    Ok(load_index(file, settings.index_options())?)
}

fn print_record(record: &Record) -> CliResult<()> {
    let line = serde_json::to_string(record).map_err(|e| CliError::Output(e.to_string()))?;
    output::info(&line);
    Ok(())
}

fn print_records<'a>(records: impl IntoIterator<Item = &'a Record>) -> CliResult<()> {
    records.into_iter().try_for_each(print_record)
}

#[instrument]
fn _all(config_dir: &Path, file: &Path) -> CliResult<()> {
    let index = open_index(config_dir, file)?;
    print_records(index.get_all())
}

#[instrument]
fn _item(config_dir: &Path, file: &Path, id: &RecordId, position: bool) -> CliResult<()> {
    let index = open_index(config_dir, file)?;
    if !position {
        return print_record(index.get_item(id)?);
    }

    let position = match id {
        RecordId::Int(n) => usize::try_from(*n).ok(),
        RecordId::Str(_) => None,
    }
    .ok_or_else(|| CliError::InvalidArgs(format!("not a position: {}", id)))?;

    let record = index.get_item_at(position).ok_or_else(|| {
        CliError::InvalidArgs(format!(
            "position {} out of range 1..={}",
            position,
            index.len()
        ))
    })?;
    print_record(record)
}

#[instrument]
fn _children(config_dir: &Path, file: &Path, id: &RecordId) -> CliResult<()> {
    let index = open_index(config_dir, file)?;
    print_records(index.get_children(id))
}

#[instrument]
fn _parents(config_dir: &Path, file: &Path, id: &RecordId) -> CliResult<()> {
    let index = open_index(config_dir, file)?;
    print_records(index.get_all_parents(id))
}

#[instrument]
fn _tree(config_dir: &Path, file: &Path) -> CliResult<()> {
    let index = open_index(config_dir, file)?;
    output::info(&index.to_tree_string());
    Ok(())
}

#[instrument]
fn _info(config_dir: &Path, file: &Path) -> CliResult<()> {
    let index = open_index(config_dir, file)?;

    output::header(&file.display());
    output::field("root", index.root());
    output::field("records", &index.len());
    output::field("depth", &index.depth());

    let leaves = index.leaves();
    output::field("leaves", &leaves.len());
    for leaf in leaves {
        output::detail(leaf);
    }

    let orphans = index.orphans();
    output::field("orphans", &orphans.len());
    for orphan in orphans {
        output::detail(orphan);
    }
    Ok(())
}

#[instrument]
fn _config_show(config_dir: &Path) -> CliResult<()> {
    let settings = Settings::load(Some(config_dir))?;
    let text = toml::to_string_pretty(&settings).map_err(|e| CliError::Output(e.to_string()))?;
    output::info(text.trim_end());
    Ok(())
}

#[instrument]
fn _config_path(config_dir: &Path) -> CliResult<()> {
    match global_config_path() {
        Some(path) => output::field("global", &path.display()),
        None => output::field("global", "(no config directory on this platform)"),
    }
    output::field("local", &local_config_path(config_dir).display());
    Ok(())
}
