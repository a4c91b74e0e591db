//! Actions run after the command line is parsed.

use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, Read, Write};

use fletcher::bench::{BenchReport, DEFAULT_BENCH_ROUNDS, DEFAULT_BENCH_SIZE, benchmark};
use fletcher::{Backend, ByteOrder, Checksum, Fletcher4, Selector, selector};

use crate::error::CliError;

const STDIN_OPERAND: &str = "-";

/// Backend operations would use now, or `None` when the selector rotates.
fn marked_backend() -> Option<Backend> {
    match selector() {
        Selector::Cycle => None,
        fixed_or_fastest => Some(fixed_or_fastest.backend()),
    }
}

/// Writes one line per compiled backend, marking the selected one.
pub(crate) fn list_backends<W: Write>(out: &mut W) -> Result<(), CliError> {
    let selected = marked_backend();
    for &backend in Backend::REGISTRY {
        let marker = if Some(backend) == selected { '*' } else { ' ' };
        let status = if backend.is_available() {
            "available"
        } else {
            "unavailable"
        };
        writeln!(out, "{marker} {:<14}{status}", backend.name()).map_err(CliError::Output)?;
    }
    Ok(())
}

fn mb_per_sec(bytes_per_sec: f64) -> f64 {
    bytes_per_sec / 1_000_000.0
}

pub(crate) fn write_bench_report<W: Write>(
    out: &mut W,
    report: &BenchReport,
) -> Result<(), CliError> {
    let fastest = report.fastest().map(|row| row.backend);
    writeln!(out, "{} bytes x {} rounds", report.buffer_len, report.rounds)
        .map_err(CliError::Output)?;
    writeln!(out, "  {:<14}{:>14}{:>15}", "backend", "native MB/s", "byteswap MB/s")
        .map_err(CliError::Output)?;
    for row in &report.rows {
        let marker = if Some(row.backend) == fastest { '*' } else { ' ' };
        writeln!(
            out,
            "{marker} {:<14}{:>14.1}{:>15.1}",
            row.name(),
            mb_per_sec(row.native_bytes_per_sec),
            mb_per_sec(row.byteswap_bytes_per_sec),
        )
        .map_err(CliError::Output)?;
    }
    Ok(())
}

/// Runs the backend benchmark and prints the table.
pub(crate) fn bench<W: Write>(out: &mut W, size: Option<usize>) -> Result<(), CliError> {
    let report = benchmark(size.unwrap_or(DEFAULT_BENCH_SIZE), DEFAULT_BENCH_ROUNDS);
    write_bench_report(out, &report)
}

/// Checksums everything `reader` yields.
pub(crate) fn checksum_reader<R: Read>(
    reader: &mut R,
    order: ByteOrder,
    path: &str,
) -> Result<Checksum, CliError> {
    let mut hasher = Fletcher4::new(order);
    let bytes = hasher.update_reader(reader).map_err(|source| CliError::Read {
        path: path.to_owned(),
        source,
    })?;
    tracing::debug!(
        target: "fletcher4sum",
        path,
        bytes,
        backend = hasher.backend().name(),
        "checksummed input"
    );
    hasher.finalize().map_err(|source| CliError::Checksum {
        path: path.to_owned(),
        source,
    })
}

/// Checksums one operand; `-` reads `stdin`.
pub(crate) fn checksum_operand<In: Read>(
    operand: &OsStr,
    stdin: &mut In,
    order: ByteOrder,
) -> Result<Checksum, CliError> {
    let path = operand.to_string_lossy();
    if operand == OsStr::new(STDIN_OPERAND) {
        return checksum_reader(stdin, order, &path);
    }
    let mut file = File::open(operand).map_err(|source| CliError::Read {
        path: path.to_string(),
        source,
    })?;
    checksum_reader(&mut file, order, &path)
}

/// Writes a `a:b:c:d  NAME` line.
pub(crate) fn write_checksum_line<W: Write>(
    out: &mut W,
    checksum: &Checksum,
    name: &OsStr,
) -> io::Result<()> {
    writeln!(out, "{checksum}  {}", name.to_string_lossy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fletcher::bench::BenchRow;
    use std::io::Cursor;
    use test_support::{temp_file_with, words_to_ne_bytes};

    fn sample_bytes() -> Vec<u8> {
        words_to_ne_bytes(&[1, 2, 3, 4])
    }

    #[test]
    fn reader_checksum_matches_one_shot() {
        let mut input = Cursor::new(sample_bytes());
        let checksum = checksum_reader(&mut input, ByteOrder::Native, "-").expect("aligned");
        assert_eq!(checksum, Checksum::new(10, 20, 35, 56));
    }

    #[test]
    fn unaligned_input_names_the_operand() {
        let mut input = Cursor::new(vec![0u8; 5]);
        let error = checksum_reader(&mut input, ByteOrder::Native, "odd.bin").unwrap_err();
        assert!(matches!(error, CliError::Checksum { ref path, .. } if path == "odd.bin"));
    }

    #[test]
    fn file_operands_are_opened() {
        let file = temp_file_with(&sample_bytes()).expect("temp file");
        let mut stdin = io::empty();
        let checksum =
            checksum_operand(file.path().as_os_str(), &mut stdin, ByteOrder::Native).expect("read");
        assert_eq!(checksum.words(), [10, 20, 35, 56]);
    }

    #[test]
    fn dash_reads_stdin() {
        let mut stdin = Cursor::new(sample_bytes());
        let checksum = checksum_operand(OsStr::new("-"), &mut stdin, ByteOrder::Native)
            .expect("read");
        assert_eq!(checksum.words(), [10, 20, 35, 56]);
    }

    #[test]
    fn missing_files_are_read_errors() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("absent");
        let mut stdin = io::empty();
        let error =
            checksum_operand(missing.as_os_str(), &mut stdin, ByteOrder::Native).unwrap_err();
        assert!(matches!(error, CliError::Read { .. }));
    }

    #[test]
    fn checksum_lines_use_two_spaces() {
        let mut out = Vec::new();
        write_checksum_line(&mut out, &Checksum::new(10, 20, 35, 56), OsStr::new("data"))
            .expect("write");
        assert_eq!(out, b"a:14:23:38  data\n");
    }

    #[test]
    fn listing_covers_the_registry() {
        let mut out = Vec::new();
        list_backends(&mut out).expect("write");
        let text = String::from_utf8(out).expect("utf-8");

        assert_eq!(text.lines().count(), Backend::REGISTRY.len());
        assert!(text.lines().any(|line| line.contains("scalar") && line.ends_with("available")));
        assert!(text.lines().filter(|line| line.starts_with('*')).count() <= 1);
    }

    #[test]
    fn bench_table_marks_fastest_row() {
        let report = BenchReport {
            buffer_len: 64,
            rounds: 1,
            rows: vec![
                BenchRow {
                    backend: Backend::Scalar,
                    native_bytes_per_sec: 1.0e6,
                    byteswap_bytes_per_sec: 1.0e6,
                },
                BenchRow {
                    backend: Backend::Superscalar4,
                    native_bytes_per_sec: 4.0e6,
                    byteswap_bytes_per_sec: 3.0e6,
                },
            ],
        };
        let mut out = Vec::new();
        write_bench_report(&mut out, &report).expect("write");
        let text = String::from_utf8(out).expect("utf-8");
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "64 bytes x 1 rounds");
        assert!(lines[2].starts_with("  scalar"));
        assert!(lines[3].starts_with("* superscalar4"));
        assert!(lines[3].contains("4.0"));
    }
}
