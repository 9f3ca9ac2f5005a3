mod cli;
mod config;
mod output;

use clap::Parser;
use cli::{Cli, Command};
use config::{Config, ConfigError};
use tracing_subscriber::EnvFilter;
use yorkshire::DetectError;

/// Errors that end a run before any manifest is checked
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Detect(#[from] DetectError),
}

impl CliError {
    /// | Code | Meaning                                  |
    /// |------|------------------------------------------|
    /// | 0    | No disallowed package source found       |
    /// | 1    | At least one manifest failed detection   |
    /// | 2    | A manifest could not be checked          |
    /// | 3    | Configuration error                      |
    fn exit_code(&self) -> i32 {
        match self {
            Self::Detect(_) => 2,
            Self::Config(_) => 3,
        }
    }
}

/// Tally of a detection run
#[derive(Debug, Default)]
struct Summary {
    checked: usize,
    failed: usize,
    errors: usize,
}

impl Summary {
    fn exit_code(&self) -> i32 {
        if self.errors > 0 {
            2
        } else if self.failed > 0 {
            1
        } else {
            0
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let code = match cli.command {
        Some(Command::Detect {
            path,
            index_urls,
            json,
        }) => match run_detect(&path, &index_urls, json) {
            Ok(summary) => summary.exit_code(),
            Err(e) => {
                eprintln!("Error: {}", e);
                e.exit_code()
            }
        },
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            2
        }
    };

    std::process::exit(code);
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Debug mode is on");
}

fn run_detect(path: &str, index_urls: &[String], json: bool) -> Result<Summary, CliError> {
    let config = Config::load()?;
    let allow = config.allow_list(index_urls);
    tracing::debug!(
        "Allowed index URLs: {:?}",
        allow.iter().collect::<Vec<_>>()
    );

    let mut summary = Summary::default();
    for result in yorkshire::detect(path, &allow)? {
        match result {
            Ok(detection) => {
                summary.checked += 1;
                if !detection.verdict() {
                    summary.failed += 1;
                }
                output::print_detection(&detection, json);
            }
            Err(e) => {
                summary.errors += 1;
                output::print_error(&e, json);
            }
        }
    }

    tracing::debug!(
        "Checked {} manifest(s): {} failed, {} error(s)",
        summary.checked,
        summary.failed,
        summary.errors
    );
    Ok(summary)
}
