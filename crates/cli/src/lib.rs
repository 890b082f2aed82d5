#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` is the frontend of the `diffdir` binary: it parses arguments,
//! selects the output face, loads the layered configuration, wires the
//! comparison engine to a sink, and maps every outcome to an exit code.
//!
//! # Behaviour
//!
//! - Without an explicit mode flag the detail face is used when stdin and
//!   stdout are both terminals, the compact face otherwise.
//! - `--compact` and `--status` are mutually exclusive.
//! - Exit codes: `0` success, `1` differences in `--status` mode and fatal
//!   startup failures, `2` usage errors. Differences reported through the
//!   compact or detail face leave the exit code at `0`.

mod command;
mod config;

use std::ffi::OsString;
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;
use std::sync::Arc;

use filters::IgnoreFilter;
use report::{CompactReport, DetailOptions, DetailReport, ReportSink};
use tracing::Level;
use walk::PathRoot;

use engine::{Context, Settings};

use command::{clap_command, parse_args};
use config::ConfigTree;

/// Prefix of every diagnostic this frontend prints.
const ERROR_PREFIX: &str = "diffdir: error:";

/// How differences reach the user.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum OutputMode {
    /// Per-entry details for interactive terminals.
    Detail,
    /// One line per differing entry.
    Compact,
    /// No output; the exit code carries the verdict.
    Status,
}

/// Parses `arguments` and runs the comparison.
///
/// Help, version and diagnostics go to the provided writers; report output
/// goes to the process stdout so worker threads can own their writer.
pub fn run_with<I, S>(arguments: I, stdout: &mut dyn Write, stderr: &mut dyn Write) -> ExitCode
where
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
{
    let args = match parse_args(arguments) {
        Ok(args) => args,
        Err(error) => {
            let _ = write!(stderr, "{error}");
            return ExitCode::from(2);
        }
    };

    if args.help {
        let _ = write!(stdout, "{}", clap_command().render_help());
        return ExitCode::SUCCESS;
    }
    if args.version {
        let _ = writeln!(stdout, "diffdir {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    init_tracing(args.debug);

    let (Some(dir_left), Some(dir_right)) = (&args.dir_left, &args.dir_right) else {
        return usage_error(stderr, "missing mandatory arguments");
    };
    if args.buffer == 0 {
        return usage_error(stderr, "invalid buffer size");
    }
    let interactive = io::stdin().is_terminal() && io::stdout().is_terminal();
    let mode = match select_mode(args.compact, args.status, interactive) {
        Ok(mode) => mode,
        Err(message) => return usage_error(stderr, message),
    };

    let roots = match (PathRoot::open(dir_left), PathRoot::open(dir_right)) {
        (Ok(left), Ok(right)) => [left, right],
        _ => {
            let _ = writeln!(stderr, "{ERROR_PREFIX} invalid paths, need 2 directories");
            return ExitCode::FAILURE;
        }
    };

    let ignore = if args.ignore.is_empty() {
        None
    } else {
        match IgnoreFilter::new(&args.ignore) {
            Ok(filter) => Some(filter),
            Err(error) => {
                let _ = writeln!(stderr, "{ERROR_PREFIX} {error}");
                return ExitCode::FAILURE;
            }
        }
    };

    let ctx = Arc::new(Context {
        settings: Settings {
            debug: args.debug,
            check_metadata: args.metadata,
            content_buffer_size: args.buffer,
        },
        roots,
        ignore,
    });

    let sink = build_sink(mode, args.metadata);
    if let Err(error) = engine::run_diff(&ctx, args.thread, sink) {
        let _ = writeln!(stderr, "{ERROR_PREFIX} {error}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

/// Resolves the output mode from the flags and terminal state.
fn select_mode(
    compact: bool,
    status: bool,
    interactive: bool,
) -> Result<OutputMode, &'static str> {
    if compact && status {
        return Err("invalid output mode, conflicting options requested");
    }
    if compact {
        Ok(OutputMode::Compact)
    } else if status {
        Ok(OutputMode::Status)
    } else if interactive {
        Ok(OutputMode::Detail)
    } else {
        Ok(OutputMode::Compact)
    }
}

fn build_sink(mode: OutputMode, check_metadata: bool) -> Option<Box<dyn ReportSink + Send>> {
    match mode {
        OutputMode::Status => None,
        OutputMode::Compact => Some(Box::new(CompactReport::new(io::stdout(), check_metadata))),
        OutputMode::Detail => {
            let config = ConfigTree::load();
            let options = DetailOptions {
                owner_names: config.bool_value("detail.owner-names", true),
                human_sizes: config.bool_value("detail.human-sizes", true),
            };
            Some(Box::new(DetailReport::new(
                io::stdout(),
                check_metadata,
                options,
            )))
        }
    }
}

fn usage_error(stderr: &mut dyn Write, message: &str) -> ExitCode {
    let _ = writeln!(stderr, "{ERROR_PREFIX} {message}");
    ExitCode::from(2)
}

fn init_tracing(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::WARN };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}
