//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Notes and annotations for SBML documents converted from Reactome pathway records
#[derive(Parser, Debug)]
#[command(name = "sbml-notes")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Explicit config file, applied over the global one
    #[arg(long, global = true, env = "SBML_NOTES_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Annotate a pathway bundle and print the document as JSON
    Annotate {
        /// JSON pathway bundle
        #[arg(value_hint = ValueHint::FilePath)]
        bundle: PathBuf,
        /// Write the report here instead of stdout
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Show the flattened structure of a complex
    Structure {
        /// JSON pathway bundle
        #[arg(value_hint = ValueHint::FilePath)]
        bundle: PathBuf,
        /// Stable id of the entity
        st_id: String,
        /// Print the composition tree instead
        #[arg(long)]
        tree: bool,
    },

    /// Sanitize free text for notes (reads stdin without an argument)
    Sanitize {
        /// Text to sanitize
        text: Option<String>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Print config template
    Template,

    /// Show config paths
    Path,
}
