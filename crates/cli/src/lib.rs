#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` implements the `fletcher4sum` command-line front-end. It prints one
//! `a:b:c:d  NAME` line per input, with the four checksum words in lower-case
//! hexadecimal, and can list or benchmark the checksum backends compiled into
//! the binary.
//!
//! # Design
//!
//! [`run`] accepts an iterator of arguments together with handles for
//! standard output and error and returns the process exit status;
//! [`run_with_input`] additionally takes the reader used for `-`. A
//! [`clap`](https://docs.rs/clap/) command definition parses the arguments,
//! after which the verbosity flags are turned into a
//! [`logging::VerbosityConfig`], `--no-simd` and `--impl` fix the process-wide
//! vector policy and backend selector, and the requested actions run in the
//! order listing, benchmark, checksums.
//!
//! # Invariants
//!
//! - `run` never panics; I/O failures surface as non-zero exit codes.
//! - An input that fails is reported on standard error and the remaining
//!   inputs are still checksummed.
//! - Nothing is written to standard output for an input that failed.
//!
//! # Errors
//!
//! Exit status `0` means every input was checksummed, `1` means at least one
//! input could not be read or was not a whole number of 32-bit words, and
//! `2` reports an invalid command line.
//!
//! # Examples
//!
//! ```
//! let mut stdin: &[u8] = &[1, 0, 0, 0];
//! let mut stdout = Vec::new();
//! let mut stderr = Vec::new();
//! let status = cli::run_with_input(["fletcher4sum", "-"], &mut stdin, &mut stdout, &mut stderr);
//!
//! assert_eq!(status, 0);
//! # if cfg!(target_endian = "little") {
//! assert_eq!(stdout, b"1:1:1:1  -\n");
//! # }
//! assert!(stderr.is_empty());
//! ```
//!
//! # See also
//!
//! - `src/bin/fletcher4sum.rs` for the binary that wires [`run`] into `main`.

mod args;
mod commands;
mod error;

use std::ffi::OsString;
use std::io::{self, Read, Write};

use clap::error::ErrorKind;
use fletcher::{ByteOrder, Selector, set_selector};
use logging::VerbosityConfig;
use platform::simd::{VectorPolicy, set_vector_policy};

pub use args::ParsedArgs;
pub use error::{CliError, EXIT_FAILURE, EXIT_SUCCESS, EXIT_USAGE};

const MAX_EXIT_CODE: i32 = u8::MAX as i32;

/// Parser entry points for tests.
pub mod test_utils {
    pub use crate::args::ParsedArgs;

    /// Parses `arguments` without executing anything.
    ///
    /// # Errors
    ///
    /// Returns the `clap` error for invalid command lines, including the
    /// help and version requests.
    pub fn parse_args<I, S>(arguments: I) -> Result<ParsedArgs, clap::Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<std::ffi::OsString>,
    {
        crate::args::parse_args(arguments)
    }
}

/// Runs the tool with the process standard input.
pub fn run<I, S, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    Out: Write,
    Err: Write,
{
    let stdin = io::stdin();
    let mut stdin = stdin.lock();
    run_with_input(arguments, &mut stdin, stdout, stderr)
}

/// Runs the tool, reading `-` operands from `stdin`.
pub fn run_with_input<I, S, In, Out, Err>(
    arguments: I,
    stdin: &mut In,
    stdout: &mut Out,
    stderr: &mut Err,
) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    In: Read,
    Out: Write,
    Err: Write,
{
    let parsed = match args::parse_args(arguments) {
        Ok(parsed) => parsed,
        Err(error) => return report_parse_error(&error, stdout, stderr),
    };

    match configure(&parsed) {
        Ok(()) => execute(&parsed, stdin, stdout, stderr),
        Err(error) => report(&error, stderr),
    }
}

fn report_parse_error<Out: Write, Err: Write>(
    error: &clap::Error,
    stdout: &mut Out,
    stderr: &mut Err,
) -> i32 {
    let rendered = error.render().to_string();
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            if stdout.write_all(rendered.as_bytes()).is_err() {
                return EXIT_FAILURE;
            }
            EXIT_SUCCESS
        }
        _ => {
            let _ = stderr.write_all(rendered.as_bytes());
            EXIT_USAGE
        }
    }
}

fn report<Err: Write>(error: &CliError, stderr: &mut Err) -> i32 {
    let _ = writeln!(stderr, "{}: {error}", args::PROGRAM_NAME);
    error.exit_code()
}

fn verbosity(parsed: &ParsedArgs) -> Result<VerbosityConfig, CliError> {
    if parsed.quiet {
        return Ok(VerbosityConfig::quiet());
    }
    let mut config = VerbosityConfig::from_verbose_level(parsed.verbose);
    for spec in &parsed.debug {
        config.apply_flag(spec)?;
    }
    Ok(config)
}

/// Installs logging and fixes the process-wide backend state.
fn configure(parsed: &ParsedArgs) -> Result<(), CliError> {
    let config = verbosity(parsed)?;
    // A subscriber may already be installed when embedded; keep it.
    let _ = logging::init_tracing(&config);

    if parsed.no_simd {
        set_vector_policy(VectorPolicy::Disabled)?;
    }

    if let Some(name) = &parsed.implementation {
        let selector = name
            .parse::<Selector>()
            .and_then(|selector| set_selector(selector).map(|()| selector))
            .map_err(|source| CliError::Implementation {
                name: name.clone(),
                source,
            })?;
        tracing::info!(target: "fletcher4sum", %selector, "implementation override");
    }
    Ok(())
}

fn execute<In, Out, Err>(
    parsed: &ParsedArgs,
    stdin: &mut In,
    stdout: &mut Out,
    stderr: &mut Err,
) -> i32
where
    In: Read,
    Out: Write,
    Err: Write,
{
    if parsed.list {
        if let Err(error) = commands::list_backends(stdout) {
            return report(&error, stderr);
        }
    }
    if parsed.bench {
        if let Err(error) = commands::bench(stdout, parsed.bench_size) {
            return report(&error, stderr);
        }
    }

    let order = if parsed.byteswap {
        ByteOrder::Byteswap
    } else {
        ByteOrder::Native
    };
    let stdin_operand = [OsString::from("-")];
    let operands = if parsed.reads_stdin_by_default() {
        &stdin_operand[..]
    } else {
        &parsed.files[..]
    };

    let mut status = EXIT_SUCCESS;
    for operand in operands {
        match commands::checksum_operand(operand, stdin, order) {
            Ok(checksum) => {
                if let Err(error) = commands::write_checksum_line(stdout, &checksum, operand) {
                    return report(&CliError::Output(error), stderr);
                }
            }
            Err(error) => status = status.max(report(&error, stderr)),
        }
    }

    if stdout.flush().is_err() {
        return EXIT_FAILURE;
    }
    status
}

/// Converts a numeric exit code into an [`std::process::ExitCode`].
#[must_use]
pub fn exit_code_from(status: i32) -> std::process::ExitCode {
    let clamped = status.clamp(0, MAX_EXIT_CODE);
    std::process::ExitCode::from(clamped as u8)
}
