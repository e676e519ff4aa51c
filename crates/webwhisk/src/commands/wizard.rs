//! Interactive wizard used when no subcommand is given.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use dialoguer::{Confirm, Input, Select};
use webwhisk_deploy::DEFAULT_ENTRY;
use webwhisk_site::MARKER_ATTRIBUTE;

use crate::config::ProjectConfig;
use crate::request::SiteRequest;

/// Ask the user what to do. `None` means they backed out.
pub async fn run() -> Result<Option<SiteRequest>> {
    tokio::task::spawn_blocking(prompt)
        .await
        .context("Wizard stopped unexpectedly")?
}

fn prompt() -> Result<Option<SiteRequest>> {
    tracing::info!("Welcome to webwhisk");

    let items = ["Upload a website", "Remove a website"];
    let selection = Select::new()
        .with_prompt("Select what you'd like to do")
        .items(&items)
        .default(0)
        .interact()?;

    if selection == 1 {
        let site: String = Input::new()
            .with_prompt("Enter the name of your website")
            .interact_text()?;
        return SiteRequest::delete(Some(site), &ProjectConfig::default()).map(Some);
    }

    println!(
        "Put all your .html, .css and .js files in the same folder. When an HTML page \
         references one of them, add {MARKER_ATTRIBUTE}=\"true\" to the tag, e.g. \
         <link rel=\"stylesheet\" {MARKER_ATTRIBUTE}=\"true\" href=\"style.css\">."
    );

    let ready = Confirm::new()
        .with_prompt("Are you ready to continue?")
        .default(false)
        .interact()?;
    if !ready {
        return Ok(None);
    }

    let site: String = Input::new()
        .with_prompt("The name of your website")
        .interact_text()?;
    let cwd = env::current_dir().context("Failed to read current directory")?;
    let path: String = Input::new()
        .with_prompt("The path to your website folder")
        .default(cwd.display().to_string())
        .interact_text()?;
    let entry: String = Input::new()
        .with_prompt("The entry HTML page of your website")
        .default(DEFAULT_ENTRY.to_string())
        .interact_text()?;

    SiteRequest::upload(
        Some(site),
        Some(PathBuf::from(path)),
        Some(entry),
        &ProjectConfig::default(),
    )
    .map(Some)
}
