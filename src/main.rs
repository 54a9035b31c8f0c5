//! gha-callback - replay execution events as GitHub Actions output
//!
//! Reads a JSON-lines event stream from a file or stdin and drives the
//! GitHub Actions callback with it. Workflow commands go to stdout;
//! diagnostics go to stderr.

mod cli;

use std::fs::File;
use std::io::{self, BufRead, BufReader};

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use github_actions_callback::callback::{CallbackEvent, ConfigLoader, GithubActionsCallback};
use github_actions_callback::error::Error;
use github_actions_callback::traits::ExecutionCallback;
use tracing::{debug, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    let cli = Cli::parse();

    init_logging(cli.log_json);

    if let Err(err) = run(&cli) {
        eprintln!("Error: {err:#}");
        let code = err.downcast_ref::<Error>().map_or(1, Error::exit_code);
        std::process::exit(code);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut loader = ConfigLoader::new().with_overrides(cli.overrides());
    if let Some(path) = &cli.config {
        loader = loader.with_file(path);
    }
    let config = if cli.strict_config {
        loader.try_load()?
    } else {
        loader.load()
    };

    let input = open_events(cli)?;
    let mut callback = GithubActionsCallback::new(config);
    replay(&mut callback, input);

    Ok(())
}

/// Initialize logging on stderr, keeping stdout for workflow commands
fn init_logging(json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(io::stderr))
            .init();
    }
}

fn open_events(cli: &Cli) -> Result<Box<dyn BufRead>> {
    match cli.events_path() {
        Some(path) => {
            let file = File::open(path)
                .map_err(Error::from)
                .with_context(|| format!("Failed to open event stream: {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(io::stdin().lock())),
    }
}

/// Feeds every event of `input` to `callback`, then ends the run if the
/// stream did not.
fn replay(callback: &mut impl ExecutionCallback, input: impl BufRead) {
    let mut ended = false;
    let mut count = 0usize;

    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                warn!("Stopped reading events at line {}: {}", line_no, err);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<CallbackEvent>(&line) {
            Ok(event) => {
                ended |= event.is_run_end();
                callback.handle_event(&event);
                count += 1;
            }
            Err(source) => {
                let err = Error::EventParse {
                    line: line_no,
                    source,
                };
                warn!("Skipping event: {}", err);
            }
        }
    }

    if !ended {
        debug!("Event stream ended without stats, finishing run");
        callback.on_run_end();
    }
    debug!(events = count, "Replay finished");
}
