use std::fmt;
use std::num::Wrapping;

use crate::ByteOrder;
use crate::error::ChecksumError;
use crate::fletcher4::Lanes;
use crate::fletcher4::finalize;
use crate::fletcher4::superscalar::accumulate;

/// Largest step, in bytes, that [`Checksum::combine`] accepts.
///
/// The cubic combination coefficient overflows 64 bits for steps close to
/// 16 MiB, so incremental checksums of larger buffers are split into steps
/// of this size.
pub const FLETCHER_4_INC_MAX_SIZE: u64 = 8 << 20;

/// Four-word Fletcher-4 checksum `(A, B, C, D)`.
///
/// `A` is the sum of the input words, `B` the sum of the running `A` values,
/// `C` the sum of the running `B` values and `D` the sum of the running `C`
/// values. All words wrap modulo 2⁶⁴.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Checksum {
    words: [u64; 4],
}

impl Checksum {
    /// Checksum of the empty input.
    pub const ZERO: Self = Self { words: [0; 4] };

    /// Creates a checksum from its four words.
    #[must_use]
    pub const fn new(a: u64, b: u64, c: u64, d: u64) -> Self {
        Self {
            words: [a, b, c, d],
        }
    }

    /// Returns the words in `(A, B, C, D)` order.
    #[must_use]
    pub const fn words(&self) -> [u64; 4] {
        self.words
    }

    /// First-order sum.
    #[must_use]
    pub const fn a(&self) -> u64 {
        self.words[0]
    }

    /// Second-order sum.
    #[must_use]
    pub const fn b(&self) -> u64 {
        self.words[1]
    }

    /// Third-order sum.
    #[must_use]
    pub const fn c(&self) -> u64 {
        self.words[2]
    }

    /// Fourth-order sum.
    #[must_use]
    pub const fn d(&self) -> u64 {
        self.words[3]
    }

    /// Merges the checksum of the `size` bytes that follow the data covered by
    /// `self`.
    ///
    /// `next` must have been computed from a zero state over exactly those
    /// bytes. The result equals the checksum of the concatenated input.
    ///
    /// # Errors
    ///
    /// - [`ChecksumError::IncrementalStepTooLarge`] when `size` exceeds
    ///   [`FLETCHER_4_INC_MAX_SIZE`].
    /// - [`ChecksumError::UnalignedLength`] when `size` is not a multiple of 4.
    ///
    /// # Examples
    ///
    /// ```
    /// use fletcher::{Checksum, fletcher_4_native};
    ///
    /// let head = [1u8; 64];
    /// let tail = [7u8; 128];
    ///
    /// let mut running = fletcher_4_native(&head).unwrap();
    /// running.combine(tail.len() as u64, &fletcher_4_native(&tail).unwrap()).unwrap();
    ///
    /// let whole = [&head[..], &tail[..]].concat();
    /// assert_eq!(running, fletcher_4_native(&whole).unwrap());
    /// ```
    pub fn combine(&mut self, size: u64, next: &Self) -> Result<(), ChecksumError> {
        if size > FLETCHER_4_INC_MAX_SIZE {
            return Err(ChecksumError::IncrementalStepTooLarge {
                size,
                max: FLETCHER_4_INC_MAX_SIZE,
            });
        }
        if !size.is_multiple_of(4) {
            return Err(ChecksumError::UnalignedLength {
                len: usize::try_from(size).unwrap_or(usize::MAX),
            });
        }

        // Exact below the step limit; c2 * (c1 + 2) is always divisible by 3.
        let c1 = size / 4;
        let c2 = c1 * (c1 + 1) / 2;
        let c3 = c2 * (c1 + 2) / 3;
        let (c1, c2, c3) = (Wrapping(c1), Wrapping(c2), Wrapping(c3));

        let [a, b, c, d] = self.words.map(Wrapping);
        let [na, nb, nc, nd] = next.words.map(Wrapping);

        self.words = [
            (a + na).0,
            (b + nb + c1 * a).0,
            (c + nc + c1 * b + c2 * a).0,
            (d + nd + c1 * c + c2 * b + c3 * a).0,
        ];
        Ok(())
    }

    /// Continues the serial Fletcher-4 recurrence from this checksum over
    /// `buf`, whose length must be a multiple of 4.
    pub(crate) fn fold(&mut self, buf: &[u8], order: ByteOrder) {
        debug_assert!(buf.len().is_multiple_of(4));
        if buf.is_empty() {
            return;
        }

        let [a, b, c, d] = self.words;
        let mut lanes = Lanes::<1>::from_levels([[a], [b], [c], [d]]);
        match order {
            ByteOrder::Native => accumulate::<1, false>(&mut lanes, buf),
            ByteOrder::Byteswap => accumulate::<1, true>(&mut lanes, buf),
        }
        *self = finalize::one_lane(&lanes);
    }
}

impl From<[u64; 4]> for Checksum {
    fn from(words: [u64; 4]) -> Self {
        Self { words }
    }
}

impl From<Checksum> for [u64; 4] {
    fn from(checksum: Checksum) -> Self {
        checksum.words
    }
}

impl fmt::Display for Checksum {
    /// Formats the checksum as `a:b:c:d` in lower-case hexadecimal.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.words;
        write!(f, "{a:x}:{b:x}:{c:x}:{d:x}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_support::{lcg_words, reference_fletcher4, words_to_ne_bytes};

    #[test]
    fn display_is_colon_separated_hex() {
        let checksum = Checksum::new(10, 20, 0x35, 0xdead_beef);
        assert_eq!(checksum.to_string(), "a:14:35:deadbeef");
    }

    #[test]
    fn fold_continues_serial_recurrence() {
        let words = lcg_words(37, 0x5eed);
        let (head, tail) = words.split_at(20);

        let mut checksum = Checksum::from(reference_fletcher4(head));
        checksum.fold(&words_to_ne_bytes(tail), ByteOrder::Native);

        assert_eq!(checksum.words(), reference_fletcher4(&words));
    }

    #[test]
    fn combine_matches_concatenation() {
        let first = lcg_words(129, 1);
        let second = lcg_words(77, 2);
        let joined: Vec<u32> = first.iter().chain(&second).copied().collect();

        let mut running = Checksum::from(reference_fletcher4(&first));
        let next = Checksum::from(reference_fletcher4(&second));
        running
            .combine((second.len() * 4) as u64, &next)
            .expect("step is within limits");

        assert_eq!(running.words(), reference_fletcher4(&joined));
    }

    #[test]
    fn combine_with_empty_step_is_identity() {
        let mut running = Checksum::new(1, 2, 3, 4);
        running.combine(0, &Checksum::ZERO).expect("empty step");
        assert_eq!(running, Checksum::new(1, 2, 3, 4));
    }

    #[test]
    fn combine_rejects_oversized_steps() {
        let mut running = Checksum::ZERO;
        let err = running
            .combine(FLETCHER_4_INC_MAX_SIZE + 4, &Checksum::ZERO)
            .expect_err("step too large");
        assert!(matches!(err, ChecksumError::IncrementalStepTooLarge { .. }));
    }

    #[test]
    fn combine_rejects_partial_words() {
        let mut running = Checksum::ZERO;
        let err = running
            .combine(6, &Checksum::ZERO)
            .expect_err("partial word");
        assert_eq!(err, ChecksumError::UnalignedLength { len: 6 });
    }

    #[test]
    fn combine_is_exact_at_step_limit() {
        // All-ones words make the coefficients themselves visible in the result.
        let words = FLETCHER_4_INC_MAX_SIZE / 4;
        let next = Checksum::new(
            words,
            words * (words + 1) / 2,
            words * (words + 1) / 2 * (words + 2) / 3,
            0,
        );
        let mut running = Checksum::new(1, 0, 0, 0);
        running
            .combine(FLETCHER_4_INC_MAX_SIZE, &next)
            .expect("limit is inclusive");

        assert_eq!(running.a(), 1 + words);
        assert_eq!(running.b(), next.b() + words);
        assert_eq!(running.c(), next.c() + words * (words + 1) / 2);
    }
}
