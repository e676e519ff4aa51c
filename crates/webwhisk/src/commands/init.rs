//! Scaffold a starter website.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Run the init command.
pub async fn run(dir: &Path, config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing webwhisk site in {}...", dir.display());

    let created = scaffold(dir, config_path, yes)?;
    if created.is_empty() {
        return Ok(());
    }

    tracing::info!("Initialization complete!");
    tracing::info!(
        "Run 'webwhisk upload --path {}' to publish it.",
        dir.display()
    );

    Ok(())
}

/// Write the starter files, returning the paths that were written.
fn scaffold(dir: &Path, config_path: &Path, yes: bool) -> Result<Vec<PathBuf>> {
    // Check if the site directory already exists
    if dir.exists() {
        if !yes {
            tracing::warn!("{} already exists. Use --yes to overwrite.", dir.display());
            return Ok(Vec::new());
        }
    } else {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let mut created = Vec::new();

    for (name, content) in [
        ("index.html", DEFAULT_INDEX),
        ("style.css", DEFAULT_STYLE),
        ("script.js", DEFAULT_SCRIPT),
    ] {
        let path = dir.join(name);
        if !path.exists() || yes {
            fs::write(&path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Created {}", path.display());
            created.push(path);
        }
    }

    if !config_path.exists() || yes {
        fs::write(config_path, project_config(dir))
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        tracing::info!("Created {}", config_path.display());
        created.push(config_path.to_path_buf());
    }

    Ok(created)
}

fn project_config(dir: &Path) -> String {
    let name = dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "my-site".to_string());

    format!(
        r#"# webwhisk configuration

[site]
# Website name, used as the OpenWhisk package name
name = "{name}"

# Folder holding the .html, .css and .js files
path = "{path}"

# Entry HTML page
entry = "index.html"

[platform]
# Runtime kind of the generated actions
kind = "nodejs:default"
"#,
        path = dir.display().to_string().replace('\\', "/"),
    )
}

const DEFAULT_INDEX: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>My Website</title>
  <link rel="stylesheet" owww="true" href="style.css">
</head>
<body>
  <h1>Hello from OpenWhisk</h1>
  <p>This page, its stylesheet and its script are each served by a web action.</p>
  <button id="greet">Say hello</button>
  <script owww="true" src="script.js"></script>
</body>
</html>
"#;

const DEFAULT_STYLE: &str = r#"body {
  font-family: system-ui, sans-serif;
  max-width: 40rem;
  margin: 4rem auto;
  padding: 0 1rem;
}

h1 {
  color: #1f6feb;
}
"#;

const DEFAULT_SCRIPT: &str = r#"document.getElementById('greet').addEventListener('click', () => {
  alert('Hello!');
});
"#;
