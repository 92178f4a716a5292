//! studip-sync CLI
//!
//! Command-line interface for studip-sync - mirrors Stud.IP course
//! documents into a local directory.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use tracing::debug;

use studip_core::{AuthMethod, Config, ConfigOverrides};

mod chooser;
mod commands;
mod logging;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "studip-sync")]
#[command(about = "studip-sync - Mirror Stud.IP course documents")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Directory holding the archive and the this-semester links
    #[arg(short = 'd', long = "data-path", global = true)]
    data_path: Option<PathBuf>,

    /// How to obtain the session cookie (cookie, manual)
    #[arg(long, global = true)]
    auth_method: Option<AuthMethod>,

    /// Browser to read the session cookie from
    #[arg(long, global = true)]
    browser: Option<String>,

    /// Commit every change to git
    #[arg(long, global = true)]
    use_git: bool,

    /// Prefix for generated commit messages
    #[arg(long, global = true)]
    git_commit_message_prefix: Option<String>,

    /// Path to the config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Download new documents of the current semester
    Sync,
    /// Choose the current semester and rebuild the this-semester links
    SelectSemester {
        /// Exact semester title (prompts if omitted)
        semester: Option<String>,
    },
    /// Print the Stud.IP session cookie
    GetCookie,
    /// Show the local mirror state
    Status,
    /// Show configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            data_dir: self.data_path.clone(),
            auth_method: self.auth_method,
            browser: self.browser.clone(),
            use_git: self.use_git.then_some(true),
            git_commit_message_prefix: self.git_commit_message_prefix.clone(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command.as_ref() else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config = Config::load_with(cli.config.as_deref(), &cli.overrides())
        .context("Failed to load configuration")?;
    logging::init(&config, cli.verbose);
    debug!("Using data directory {:?}", config.data_dir);

    match command {
        Commands::Sync => commands::sync::sync(&config, &output),
        Commands::SelectSemester { semester } => {
            commands::select::select(&config, semester.clone(), &output)
        }
        Commands::GetCookie => commands::cookie::show(&config, &output),
        Commands::Status => commands::status::show(&config, &output),
        Commands::Config { command } => match command {
            Some(ConfigCommands::Show) | None => {
                let path = cli.config.clone().unwrap_or_else(Config::config_file_path);
                commands::config::show(&config, &path, &output)
            }
        },
    }
}
