//! Settings file management: `--init-config` and `--show-config`

use anyhow::{Context, Result};
use console::style;
use count_core::Settings;
use std::path::{Path, PathBuf};

/// Initialize a new settings file with default values
pub fn init(config_path: Option<PathBuf>, quiet: bool) -> Result<()> {
    let path = config_path.context("Could not determine configuration directory")?;

    if path.exists() {
        if !quiet {
            eprintln!(
                "{} Configuration file already exists at: {}",
                style("Warning:").yellow().for_stderr(),
                path.display()
            );
            eprintln!("Use a text editor to modify it, or delete it to re-initialize.");
        }
        return Ok(());
    }

    let saved_path = Settings::default()
        .save_to_path(Some(path))
        .context("Failed to save configuration file")?;

    if !quiet {
        eprintln!(
            "{} Created configuration file at: {}",
            style("Success:").green().for_stderr(),
            saved_path.display()
        );
        eprintln!();
        eprintln!("Command-line flags override these defaults, for example:");
        eprintln!();
        eprintln!("  [io]");
        eprintln!("  input_block = \"64K\"      # Read size when -i is not given");
        eprintln!();
        eprintln!("  [display]");
        eprintln!("  current = true           # Always show current rates");
        eprintln!("  final_status = \"success\" # Final line after a clean run");
    }

    Ok(())
}

/// Print the effective settings as TOML on stdout
///
/// The location of the file goes to stderr, so the output can be redirected
/// into a new settings file.
pub fn show(config_path: Option<PathBuf>) -> Result<()> {
    let settings = Settings::load_from_path(config_path.clone());
    println!("{}", render(config_path.as_deref(), &settings)?);
    Ok(())
}

fn render(config_path: Option<&Path>, settings: &Settings) -> Result<String> {
    match config_path {
        Some(path) if path.exists() => {
            eprintln!("{} {}", style("Config file:").dim().for_stderr(), path.display());
        }
        Some(path) => {
            eprintln!(
                "{} {} {}",
                style("Config file:").dim().for_stderr(),
                path.display(),
                style("(not found, using defaults)").yellow().for_stderr()
            );
        }
        None => {
            eprintln!(
                "{}",
                style("Could not determine config path, using defaults")
                    .yellow()
                    .for_stderr()
            );
        }
    }

    settings
        .to_toml()
        .context("Failed to serialize settings")
}
