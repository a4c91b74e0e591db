//! Throughput measurement of the available backends.

use std::hint::black_box;
use std::time::{Duration, Instant};

use crate::error::ChecksumError;
use crate::oneshot::FLETCHER_MIN_SIMD_SIZE;
use crate::{Backend, ByteOrder, fletcher_4_with};

/// Buffer length used when the caller does not pick one.
pub const DEFAULT_BENCH_SIZE: usize = 128 * 1024;

/// Rounds per backend and byte order used when the caller does not pick a
/// count.
pub const DEFAULT_BENCH_ROUNDS: u32 = 64;

/// Measured throughput of one backend.
#[derive(Clone, Debug, PartialEq)]
pub struct BenchRow {
    /// Backend measured.
    pub backend: Backend,
    /// Bytes per second checksummed in native order.
    pub native_bytes_per_sec: f64,
    /// Bytes per second checksummed with byte swapping.
    pub byteswap_bytes_per_sec: f64,
}

impl BenchRow {
    /// Diagnostic name of the measured backend.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.backend.name()
    }
}

/// Result of [`benchmark`]: one row per available backend, in registry order.
#[derive(Clone, Debug, PartialEq)]
pub struct BenchReport {
    /// Bytes checksummed per round.
    pub buffer_len: usize,
    /// Rounds per backend and byte order.
    pub rounds: u32,
    /// Per-backend measurements.
    pub rows: Vec<BenchRow>,
}

impl BenchReport {
    /// Row with the highest native throughput.
    #[must_use]
    pub fn fastest(&self) -> Option<&BenchRow> {
        self.rows
            .iter()
            .max_by(|a, b| a.native_bytes_per_sec.total_cmp(&b.native_bytes_per_sec))
    }
}

fn bench_buffer(size: usize) -> Vec<u8> {
    let len = (size - size % FLETCHER_MIN_SIMD_SIZE).max(FLETCHER_MIN_SIMD_SIZE);
    let mut state = 0x9e37_79b9_7f4a_7c15u64;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 56) as u8
        })
        .collect()
}

fn throughput(bytes: usize, rounds: u32, elapsed: Duration) -> f64 {
    let total = bytes as f64 * f64::from(rounds);
    total / elapsed.as_secs_f64().max(f64::MIN_POSITIVE)
}

fn time_rounds(
    backend: Backend,
    buf: &[u8],
    order: ByteOrder,
    rounds: u32,
) -> Result<Duration, ChecksumError> {
    let start = Instant::now();
    for _ in 0..rounds {
        black_box(fletcher_4_with(backend, black_box(buf), order)?);
    }
    Ok(start.elapsed())
}

fn measure(backend: Backend, buf: &[u8], rounds: u32) -> Result<BenchRow, ChecksumError> {
    let native = time_rounds(backend, buf, ByteOrder::Native, rounds)?;
    let byteswap = time_rounds(backend, buf, ByteOrder::Byteswap, rounds)?;
    Ok(BenchRow {
        backend,
        native_bytes_per_sec: throughput(buf.len(), rounds, native),
        byteswap_bytes_per_sec: throughput(buf.len(), rounds, byteswap),
    })
}

/// Measures every available backend over a `size`-byte buffer, `rounds`
/// times per byte order.
///
/// `size` is rounded down to a multiple of 64 bytes (at least 64) and
/// `rounds` is raised to at least one.
#[must_use]
pub fn benchmark(size: usize, rounds: u32) -> BenchReport {
    let buf = bench_buffer(size);
    let rounds = rounds.max(1);

    let rows = Backend::available()
        .filter_map(|backend| match measure(backend, &buf, rounds) {
            Ok(row) => {
                tracing::debug!(
                    target: "fletcher::bench",
                    backend = row.name(),
                    native = row.native_bytes_per_sec,
                    byteswap = row.byteswap_bytes_per_sec,
                    "measured backend"
                );
                Some(row)
            }
            Err(error) => {
                tracing::warn!(
                    target: "fletcher::bench",
                    backend = backend.name(),
                    %error,
                    "skipping backend"
                );
                None
            }
        })
        .collect();

    BenchReport {
        buffer_len: buf.len(),
        rounds,
        rows,
    }
}
