use crate::commands::{import_export, misc, AppContext, CommandEnum};
use sengi::config::Config;
use sengi::db::EngineDb;
use sengi::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Manage, import and export search engine definitions")]
pub struct Cli {
    /// Optional custom database file path
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Optional custom configuration file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Disable color output
    #[arg(long)]
    pub nc: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import engine descriptor XML files into the registry
    Import {
        /// Descriptor files, processed in the given order
        #[arg(num_args = 0..)]
        files: Vec<PathBuf>,

        /// Fetch a descriptor from a URL (the descriptor itself, or a
        /// page advertising one) instead of local files
        #[arg(long, value_name = "URL")]
        from_url: Option<String>,
    },

    /// Export one engine to a descriptor XML file
    Export {
        /// Engine name; omit to pick interactively
        name: Option<String>,

        /// Destination file or directory (defaults to the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export every registered engine into a zip archive
    ExportAll {
        /// Destination file or directory (defaults to the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Archive filename template, strftime tokens allowed
        /// (overrides the configured default)
        #[arg(long)]
        filename: Option<String>,
    },

    /// Export only user-imported engines into a zip archive
    ExportCustom {
        /// Destination file or directory (defaults to the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Archive filename template, strftime tokens allowed
        /// (overrides the configured default)
        #[arg(long)]
        filename: Option<String>,
    },

    /// List registered engines
    List,

    /// Show one engine in full
    Show {
        /// Engine name
        name: String,
    },

    /// Remove engine(s) from the registry
    Remove {
        /// Engine names
        #[arg(num_args = 1..)]
        names: Vec<String>,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Open a search with the named engine in the default browser
    Open {
        /// Engine name
        name: String,

        /// Search terms
        #[arg(num_args = 0..)]
        query: Vec<String>,
    },
}

pub fn handle_args(args: Cli, db: &EngineDb, config: &Config) -> Result<()> {
    let ctx = AppContext { db, config };

    let command = match args.command {
        Some(Commands::Import { files, from_url }) => {
            CommandEnum::Import(import_export::ImportCommand { files, from_url })
        }
        Some(Commands::Export { name, output }) => {
            CommandEnum::Export(import_export::ExportCommand { name, output })
        }
        Some(Commands::ExportAll { output, filename }) => {
            CommandEnum::ExportAll(import_export::ExportAllCommand { output, filename })
        }
        Some(Commands::ExportCustom { output, filename }) => {
            CommandEnum::ExportCustom(import_export::ExportCustomCommand { output, filename })
        }
        Some(Commands::Show { name }) => CommandEnum::Show(misc::ShowCommand {
            name,
            no_color: args.nc,
        }),
        Some(Commands::Remove { names, force }) => {
            CommandEnum::Remove(misc::RemoveCommand { names, force })
        }
        Some(Commands::Open { name, query }) => {
            CommandEnum::Open(misc::OpenCommand { name, query })
        }
        Some(Commands::List) | None => CommandEnum::List(misc::ListCommand { no_color: args.nc }),
    };

    command.execute(&ctx)
}
