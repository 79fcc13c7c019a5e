use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use vector_sync::handlers::{self, SyncOptions};
use vector_sync::logger;
use vector_sync::settings::Settings;
use vector_sync::VerbosityLevel;

#[derive(Parser)]
#[command(name = "vector-sync")]
#[command(about = "Synchronize two directory trees using version vectors", long_about = None)]
#[command(version)]
struct Cli {
    /// Print more detail about each step
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print nothing but errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start tracking a directory tree under the given id
    Init {
        /// Name of this tree, unique among the trees it syncs with
        id: String,

        /// Root of the tree
        #[arg(short, long, default_value = ".")]
        path: PathBuf,
    },

    /// Synchronize this tree with another one
    Sync {
        /// Root of the other tree
        other: PathBuf,

        /// Root of this tree
        #[arg(short, long, default_value = ".")]
        path: PathBuf,

        /// Apply file changes without asking
        #[arg(short, long)]
        yes: bool,

        /// Show what would happen without changing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the tree's version vector and local changes
    Status {
        /// Root of the tree
        #[arg(short, long, default_value = ".")]
        path: PathBuf,
    },

    /// Configure vector-sync settings
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Ask before files are added, deleted or overwritten
        #[arg(long)]
        confirm_changes: Option<bool>,

        /// Keep a log file in the config directory
        #[arg(long)]
        file_logging: Option<bool>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let verbosity = VerbosityLevel::from_flags(cli.verbose, cli.quiet);

    let settings = Settings::load()?;
    logger::init_logger(&settings)?;
    if settings.file_logging {
        let args: Vec<String> = std::env::args().skip(1).collect();
        if let Err(e) = logger::log_to_file(&args.join(" ")) {
            log::warn!("Failed to write log file: {e:#}");
        }
    }

    match cli.command {
        Commands::Init { id, path } => {
            handlers::handle_init(&id, &path, verbosity)?;
        }
        Commands::Sync {
            other,
            path,
            yes,
            dry_run,
        } => {
            let options = SyncOptions { yes, dry_run };
            handlers::handle_sync(&path, &other, options, &settings, verbosity)?;
        }
        Commands::Status { path } => {
            handlers::handle_status(&path, verbosity)?;
        }
        Commands::Config {
            show,
            confirm_changes,
            file_logging,
        } => {
            handlers::handle_config(show, confirm_changes, file_logging)?;
        }
    }

    Ok(())
}
