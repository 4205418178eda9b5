//! count - Something in between cat and wc -l
//!
//! # Usage
//!
//! ```bash
//! # Count lines flowing through a pipe
//! zcat access.log.gz | count | grep -c 404
//!
//! # Count 1 MiB blocks, showing a percentage of 700 blocks
//! dd if=/dev/sda | count -b1M -m700 | gzip > disk.img.gz
//!
//! # NUL-terminated records, with current rates and a final line
//! find / -print0 | count -z -c -f | xargs -0 ls -ld > /dev/null
//! ```

use anyhow::Result;
use clap::Parser;
use console::style;
use count_core::{Settings, SettingsError, EXIT_CONFIG, EXIT_SUCCESS};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod stdio;

use commands::filter::FilterArgs;

type SettingsResult<T> = std::result::Result<T, SettingsError>;

/// Copy stdin to stdout while counting lines, records or blocks
#[derive(Parser)]
#[command(name = "count")]
#[command(author, version, about, long_about = None)]
#[command(
    after_help = "Show progress by using it in a pipe like .. | count | .. or .. | count -b1M | .."
)]
struct Cli {
    #[command(flatten)]
    filter: FilterArgs,

    /// Enable debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Settings file to use instead of the default location
    #[arg(long, env = "COUNT_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write a settings file with default values and exit
    #[arg(long, conflicts_with = "show_config")]
    init_config: bool,

    /// Print the effective settings and exit
    #[arg(long)]
    show_config: bool,
}

fn main() {
    // Set up panic handler for nicer error messages
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("{} {}", style("Error:").red().bold().for_stderr(), panic_info);
    }));

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Usage errors are configuration errors; --help and --version are not
            let code = if e.use_stderr() {
                EXIT_CONFIG
            } else {
                EXIT_SUCCESS
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let config_path = cli.config.clone().or_else(Settings::config_path);
    // Read settings before logging starts, so a quiet setting silences logs too
    let loaded = Settings::read_from_path(config_path.clone());
    init_logging(cli.verbose, logging_quiet(cli.filter.quiet, &loaded));

    let settings = match loaded {
        Ok(settings) => settings.unwrap_or_default(),
        Err(e) => {
            tracing::warn!("{}, using defaults", e);
            Settings::default()
        }
    };

    if let Err(e) = run(cli, config_path, settings) {
        eprintln!("{} {}", style("Error:").red().bold().for_stderr(), e);

        // Show cause chain in verbose mode
        if std::env::var("RUST_BACKTRACE").is_ok() {
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  {} {}", style("Caused by:").yellow().for_stderr(), cause);
                source = cause.source();
            }
        }

        std::process::exit(exit_code(&e));
    }
}

/// Whether logging is silenced by `-q` or by `quiet` in the settings file
fn logging_quiet(cli_quiet: bool, loaded: &SettingsResult<Option<Settings>>) -> bool {
    cli_quiet || matches!(loaded, Ok(Some(s)) if s.display.quiet)
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else if quiet {
        EnvFilter::new("off")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // stdout carries the copied data, so logs share stderr with the status line
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Exit code for an error that reached `main`
fn exit_code(e: &anyhow::Error) -> i32 {
    e.downcast_ref::<count_core::Error>()
        .map_or(EXIT_CONFIG, count_core::Error::exit_code)
}

fn run(cli: Cli, config_path: Option<PathBuf>, settings: Settings) -> Result<()> {
    if cli.init_config {
        return commands::config::init(config_path, cli.filter.quiet);
    }
    if cli.show_config {
        return commands::config::show(config_path);
    }

    commands::filter::execute(&cli.filter, &settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use count_core::EXIT_IO;
    use std::io;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_exit_code_from_core_error() {
        let err = anyhow::Error::new(count_core::Error::Write(io::Error::from(
            io::ErrorKind::BrokenPipe,
        )));
        assert_eq!(exit_code(&err), EXIT_IO);

        let err = anyhow::Error::new(count_core::Error::InvalidSize("x".to_string()));
        assert_eq!(exit_code(&err), EXIT_CONFIG);
    }

    #[test]
    fn test_exit_code_survives_context() {
        let err = anyhow::Error::new(count_core::Error::Read(io::Error::other("boom")))
            .context("while copying");
        assert_eq!(exit_code(&err), EXIT_IO);
    }

    #[test]
    fn test_exit_code_for_other_errors() {
        let err = anyhow::anyhow!("could not determine configuration directory");
        assert_eq!(exit_code(&err), EXIT_CONFIG);
    }

    #[test]
    fn test_logging_quiet_from_flag_or_settings() {
        let mut quiet = Settings::default();
        quiet.display.quiet = true;

        assert!(logging_quiet(true, &Ok(None)));
        assert!(logging_quiet(false, &Ok(Some(quiet))));
        assert!(!logging_quiet(false, &Ok(Some(Settings::default()))));
        assert!(!logging_quiet(false, &Ok(None)));
        assert!(!logging_quiet(false, &Err(SettingsError::NoConfigDir)));
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from(["count", "-b1M", "-m", "700", "-c", "-f"]).unwrap();
        assert_eq!(cli.filter.block_size.as_deref(), Some("1M"));
        assert_eq!(cli.filter.max.as_deref(), Some("700"));
        assert!(cli.filter.current);
        assert_eq!(cli.filter.final_status.as_deref(), Some("success"));
    }

    #[test]
    fn test_parse_final_with_value() {
        let cli = Cli::try_parse_from(["count", "--final", "always"]).unwrap();
        assert_eq!(cli.filter.final_status.as_deref(), Some("always"));

        let cli = Cli::try_parse_from(["count"]).unwrap();
        assert!(cli.filter.final_status.is_none());
    }

    #[test]
    fn test_null_conflicts_with_block_size() {
        assert!(Cli::try_parse_from(["count", "-z", "-b", "512"]).is_err());
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["count", "-v", "-q"]).is_err());
    }

    #[test]
    fn test_rejects_positional_arguments() {
        assert!(Cli::try_parse_from(["count", "file.txt"]).is_err());
    }
}
