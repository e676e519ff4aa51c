//! webwhisk CLI - publish static websites as OpenWhisk web actions.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;
mod request;

use commands::RunOptions;
use config::{ProjectConfig, CONFIG_FILE};
use request::SiteRequest;

#[derive(Parser)]
#[command(name = "webwhisk")]
#[command(about = "Publish static websites as OpenWhisk web actions")]
#[command(version)]
pub struct Cli {
    /// Runs the interactive wizard when omitted
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to webwhisk.toml config file
    #[arg(short, long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Print debug logs
    #[arg(short, long, global = true, visible_alias = "debug")]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a website
    Upload {
        /// The name of your website
        #[arg(short = 'w', long)]
        website_name: Option<String>,

        /// The path to your website's root directory
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// The entry HTML page of your website (default is index.html)
        #[arg(short, long)]
        entry: Option<String>,

        /// Open the website in the browser once uploaded
        #[arg(long)]
        open: bool,

        /// Go through the whole pipeline without contacting OpenWhisk
        #[arg(long)]
        dry_run: bool,
    },

    /// Remove a website
    Delete {
        /// The name of your website
        #[arg(short = 'w', long)]
        website_name: Option<String>,
    },

    /// Create a starter website
    Init {
        /// Directory to create the site in
        #[arg(default_value = "site")]
        dir: PathBuf,

        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut options = RunOptions::default();

    let (request, project) = match cli.command {
        Some(Commands::Init { dir, yes }) => {
            return commands::init::run(&dir, &cli.config, yes).await;
        }
        Some(Commands::Upload {
            website_name,
            path,
            entry,
            open,
            dry_run,
        }) => {
            options.open = open;
            options.dry_run = dry_run;
            let project = ProjectConfig::load(&cli.config)?;
            let request = SiteRequest::upload(website_name, path, entry, &project)?;
            (request, project)
        }
        Some(Commands::Delete { website_name }) => {
            let project = ProjectConfig::load(&cli.config)?;
            let request = SiteRequest::delete(website_name, &project)?;
            (request, project)
        }
        None => match commands::wizard::run().await? {
            Some(request) => (request, ProjectConfig::load(&cli.config)?),
            None => {
                tracing::info!("Goodbye.");
                return Ok(());
            }
        },
    };

    commands::execute(request, &project, options).await
}
