//! Command dispatch

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use chrono::Local;
use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::CliResult;
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::describe::structure_statement;
use crate::domain::{flatten, resolve_identifier, DomainError, Sanitizer};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

/// Run the parsed command line.
pub fn execute(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        Cli::command()
            .print_help()
            .map_err(|e| InfraError::io("print help", e))?;
        return Ok(());
    };

    match command {
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        Commands::Config { command } => config_command(command, cli.config.as_deref()),
        Commands::Sanitize { text } => {
            let settings = Settings::load(cli.config.as_deref())?;
            sanitize(&settings.sanitizer(), text.as_deref())
        }
        Commands::Annotate { bundle, output } => {
            let container = ServiceContainer::new(Settings::load(cli.config.as_deref())?);
            annotate(&container, bundle, output.as_deref())
        }
        Commands::Structure { bundle, st_id, tree } => {
            let container = ServiceContainer::new(Settings::load(cli.config.as_deref())?);
            structure(&container, bundle, st_id, *tree)
        }
    }
}

#[instrument(skip(container))]
fn annotate(container: &ServiceContainer, bundle: &Path, output: Option<&Path>) -> CliResult<()> {
    let loaded = container.bundle_service().load(bundle)?;
    let doc = container
        .annotation_service()
        .annotate_bundle(&loaded, Local::now().naive_local())?;

    let report = serde_json::to_string_pretty(&doc).map_err(|e| ApplicationError::OperationFailed {
        context: "serialize document".to_string(),
        source: Box::new(e),
    })?;

    match output {
        Some(path) => {
            container
                .fs
                .write(path, &report)
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::success(&format!("annotated {} node(s)", doc.len()));
            output::detail(&path.display());
        }
        None => output::info(&report),
    }
    Ok(())
}

#[instrument(skip(container))]
fn structure(
    container: &ServiceContainer,
    bundle: &Path,
    st_id: &str,
    tree: bool,
) -> CliResult<()> {
    let loaded = container.bundle_service().load(bundle)?;
    let graph = &loaded.graph;
    let idx = graph
        .lookup(st_id)
        .ok_or_else(|| ApplicationError::from(DomainError::UnknownEntity(st_id.to_string())))?;

    if tree {
        output::info(&graph.to_tree(idx));
        return Ok(());
    }

    let Some(entity) = graph.get(idx) else {
        return Err(ApplicationError::from(DomainError::UnknownEntity(st_id.to_string())).into());
    };
    output::header(entity);
    if !entity.kind.is_complex() {
        match resolve_identifier(entity) {
            Some(identifier) => output::action("identifier", identifier),
            None => output::warning(&format!("{} has no canonical identifier", entity.kind)),
        }
        return Ok(());
    }

    let structure = flatten(graph, idx).and_then(|counter| counter.render());
    debug!("structure of {}: {:?}", st_id, structure);
    let statement = structure_statement(structure.as_deref(), container.settings.sbml_target());
    match structure {
        Some(_) => output::info(&statement),
        None => output::warning(&statement),
    }
    Ok(())
}

fn sanitize(sanitizer: &Sanitizer, text: Option<&str>) -> CliResult<()> {
    let input = match text {
        Some(text) => text.to_string(),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| InfraError::io("read stdin", e))?;
            buffer
        }
    };
    output::info(&sanitizer.sanitize(&input));
    Ok(())
}

fn config_command(command: &ConfigCommands, config_file: Option<&Path>) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(config_file)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            let global = global_config_path()
                .map(|p: PathBuf| p.display().to_string())
                .unwrap_or_else(|| "(unavailable)".to_string());
            output::action("global", &global);
            if let Some(path) = config_file {
                output::action("file", &path.display());
            }
        }
    }
    Ok(())
}
