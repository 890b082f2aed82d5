//! Command definition and argument parsing.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, Command};

/// Default per-side content-comparison buffer size, in bytes.
const DEFAULT_BUFFER_SIZE: &str = "65536";

pub(crate) fn clap_command() -> Command {
    Command::new("diffdir")
        .about("Difference of 2 directories")
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(
            Arg::new("help")
                .short('h')
                .long("help")
                .help("help message")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("version")
                .short('v')
                .long("version")
                .help("print version")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("compact")
                .short('c')
                .long("compact")
                .help("compact output, a single line giving the differences for one path")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("status")
                .short('s')
                .long("status")
                .help("give no output, return 1 on first identified difference, 0 if no difference found")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("ignore")
                .short('i')
                .long("ignore")
                .value_name("PATTERN")
                .help("ignore paths matching the given pattern(s)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("metadata")
                .short('m')
                .long("metadata")
                .help("check and report metadata differences (ownership, permissions)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("thread")
                .short('t')
                .long("thread")
                .help("use multiple threads to speed-up the comparison")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("buffer")
                .short('B')
                .long("buffer")
                .value_name("SIZE")
                .help("size of the buffers used for content comparison")
                .value_parser(value_parser!(usize))
                .default_value(DEFAULT_BUFFER_SIZE),
        )
        .arg(
            Arg::new("debug")
                .short('d')
                .long("debug")
                .help("print debug information during the diff")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dirL")
                .help("left directory")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("dirR")
                .help("right directory")
                .value_parser(value_parser!(PathBuf)),
        )
}

/// Parsed and type-checked arguments, before semantic validation.
#[derive(Debug)]
pub(crate) struct ParsedArgs {
    pub(crate) help: bool,
    pub(crate) version: bool,
    pub(crate) compact: bool,
    pub(crate) status: bool,
    pub(crate) ignore: Vec<String>,
    pub(crate) metadata: bool,
    pub(crate) thread: bool,
    pub(crate) buffer: usize,
    pub(crate) debug: bool,
    pub(crate) dir_left: Option<PathBuf>,
    pub(crate) dir_right: Option<PathBuf>,
}

pub(crate) fn parse_args<I, S>(arguments: I) -> Result<ParsedArgs, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
{
    let matches = clap_command().try_get_matches_from(arguments)?;
    Ok(ParsedArgs {
        help: matches.get_flag("help"),
        version: matches.get_flag("version"),
        compact: matches.get_flag("compact"),
        status: matches.get_flag("status"),
        ignore: matches
            .get_many::<String>("ignore")
            .map(|values| values.cloned().collect())
            .unwrap_or_default(),
        metadata: matches.get_flag("metadata"),
        thread: matches.get_flag("thread"),
        buffer: *matches.get_one::<usize>("buffer").expect("defaulted"),
        debug: matches.get_flag("debug"),
        dir_left: matches.get_one::<PathBuf>("dirL").cloned(),
        dir_right: matches.get_one::<PathBuf>("dirR").cloned(),
    })
}
