//! Argument parsing for `fletcher4sum`.

use std::ffi::OsString;

use clap::{Arg, ArgAction, Command, builder::OsStringValueParser, value_parser};

/// Name used when the argument vector is empty.
pub(crate) const PROGRAM_NAME: &str = "fletcher4sum";

/// Parsed command-line state.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ParsedArgs {
    /// Number of `-v` occurrences.
    pub verbose: u8,
    /// `-q`/`--quiet`.
    pub quiet: bool,
    /// `--debug FLAG[LEVEL]` values in command-line order.
    pub debug: Vec<String>,
    /// `--byteswap`: read words in the opposite byte order.
    pub byteswap: bool,
    /// `--impl NAME`.
    pub implementation: Option<String>,
    /// `--no-simd`.
    pub no_simd: bool,
    /// `--list`.
    pub list: bool,
    /// `--bench`.
    pub bench: bool,
    /// `--bench-size BYTES`.
    pub bench_size: Option<usize>,
    /// Files to checksum; `-` is standard input.
    pub files: Vec<OsString>,
}

impl ParsedArgs {
    /// Whether standard input should be checksummed.
    ///
    /// With no operands the tool reads standard input unless it was only
    /// asked to list or benchmark backends.
    #[must_use]
    pub fn reads_stdin_by_default(&self) -> bool {
        self.files.is_empty() && !self.list && !self.bench
    }
}

/// Builds the `clap` command used for parsing.
pub(crate) fn clap_command() -> Command {
    Command::new(PROGRAM_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .about("Print Fletcher-4 checksums of files")
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase diagnostic output; repeat for more detail.")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .help("Only report errors.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .value_name("FLAG")
                .help("Set one diagnostic category, e.g. select2 or simd.")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("byteswap")
                .long("byteswap")
                .help("Checksum data written on a host of the opposite endianness.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("impl")
                .long("impl")
                .value_name("NAME")
                .help("Backend to use: fastest, cycle, or a name from --list.")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("no-simd")
                .long("no-simd")
                .help("Never run vector kernels.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list")
                .long("list")
                .help("List the backends compiled into this binary.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("bench")
                .long("bench")
                .help("Measure the throughput of every available backend.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("bench-size")
                .long("bench-size")
                .value_name("BYTES")
                .help("Buffer length used by --bench.")
                .requires("bench")
                .value_parser(value_parser!(usize))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("files")
                .value_name("FILE")
                .action(ArgAction::Append)
                .num_args(0..)
                .value_parser(OsStringValueParser::new()),
        )
}

/// Parses command-line arguments into a [`ParsedArgs`] structure.
pub(crate) fn parse_args<I, S>(arguments: I) -> Result<ParsedArgs, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut args: Vec<OsString> = arguments.into_iter().map(Into::into).collect();
    if args.is_empty() {
        args.push(OsString::from(PROGRAM_NAME));
    }

    let mut matches = clap_command().try_get_matches_from(args)?;

    Ok(ParsedArgs {
        verbose: matches.get_count("verbose"),
        quiet: matches.get_flag("quiet"),
        debug: matches
            .remove_many::<String>("debug")
            .map(Iterator::collect)
            .unwrap_or_default(),
        byteswap: matches.get_flag("byteswap"),
        implementation: matches.remove_one::<String>("impl"),
        no_simd: matches.get_flag("no-simd"),
        list: matches.get_flag("list"),
        bench: matches.get_flag("bench"),
        bench_size: matches.remove_one::<usize>("bench-size"),
        files: matches
            .remove_many::<OsString>("files")
            .map(Iterator::collect)
            .unwrap_or_default(),
    })
}
