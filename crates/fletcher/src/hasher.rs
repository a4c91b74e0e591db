use std::io::{self, IoSlice, Read};

use crate::error::ChecksumError;
use crate::oneshot::FLETCHER_MIN_SIMD_SIZE;
use crate::select::backend_for_operation;
use crate::{Backend, ByteOrder, Checksum, Fletcher4Context};

/// Streaming Fletcher-4 hasher accepting input in chunks of any length.
///
/// Whole 64-byte blocks go through the backend context as soon as they are
/// complete; a partial block is carried over to the next update and folded
/// serially at [`finalize`](Self::finalize). The result equals
/// [`fletcher_4`](crate::fletcher_4) over the concatenated input.
///
/// # Examples
///
/// ```
/// use fletcher::{ByteOrder, Fletcher4, fletcher_4_native};
///
/// let data = vec![0x5au8; 1000];
/// let mut hasher = Fletcher4::new(ByteOrder::Native);
/// hasher.update(&data[..3]);
/// hasher.update(&data[3..]);
/// assert_eq!(hasher.finalize().unwrap(), fletcher_4_native(&data).unwrap());
/// ```
#[derive(Clone, Debug)]
pub struct Fletcher4 {
    ctx: Fletcher4Context,
    order: ByteOrder,
    pending: [u8; FLETCHER_MIN_SIMD_SIZE],
    pending_len: usize,
    len: u64,
}

impl Fletcher4 {
    /// Default buffer length used by [`update_reader`](Self::update_reader).
    pub const DEFAULT_READER_BUFFER_LEN: usize = 128 * 1024;

    /// Creates a hasher on the backend chosen by the process selector.
    #[must_use]
    pub fn new(order: ByteOrder) -> Self {
        Self::with_backend(backend_for_operation(), order)
    }

    /// Creates a hasher on an explicit backend.
    #[must_use]
    pub fn with_backend(backend: Backend, order: ByteOrder) -> Self {
        Self {
            ctx: backend.init(),
            order,
            pending: [0; FLETCHER_MIN_SIMD_SIZE],
            pending_len: 0,
            len: 0,
        }
    }

    /// Backend computing the block-aligned part of the input.
    #[must_use]
    pub const fn backend(&self) -> Backend {
        self.ctx.backend()
    }

    /// Byte order the input is read in.
    #[must_use]
    pub const fn byte_order(&self) -> ByteOrder {
        self.order
    }

    /// Number of bytes fed so far.
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.len
    }

    /// Returns `true` if no bytes have been fed yet.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Feeds `data` into the checksum.
    pub fn update(&mut self, mut data: &[u8]) {
        self.len = self
            .len
            .saturating_add(u64::try_from(data.len()).unwrap_or(u64::MAX));

        if self.pending_len > 0 {
            let take = (FLETCHER_MIN_SIMD_SIZE - self.pending_len).min(data.len());
            self.pending[self.pending_len..self.pending_len + take].copy_from_slice(&data[..take]);
            self.pending_len += take;
            data = &data[take..];

            if self.pending_len < FLETCHER_MIN_SIMD_SIZE {
                return;
            }
            self.ctx.compute(&self.pending, self.order);
            self.pending_len = 0;
        }

        let split = data.len() - data.len() % FLETCHER_MIN_SIMD_SIZE;
        let (blocks, rest) = data.split_at(split);
        if !blocks.is_empty() {
            self.ctx.compute(blocks, self.order);
        }
        self.pending[..rest.len()].copy_from_slice(rest);
        self.pending_len = rest.len();
    }

    /// Feeds every buffer of a vectored write in order.
    #[doc(alias = "writev")]
    pub fn update_vectored(&mut self, buffers: &[IoSlice<'_>]) {
        for buffer in buffers {
            self.update(buffer);
        }
    }

    /// Feeds everything `reader` yields until end of file, using `buffer` as
    /// scratch space. Returns the number of bytes read.
    ///
    /// # Errors
    ///
    /// Propagates read errors other than [`io::ErrorKind::Interrupted`] and
    /// rejects an empty `buffer` with [`io::ErrorKind::InvalidInput`].
    pub fn update_reader_with_buffer<R: Read>(
        &mut self,
        reader: &mut R,
        buffer: &mut [u8],
    ) -> io::Result<u64> {
        if buffer.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "fletcher4 reader buffer must not be empty",
            ));
        }

        let mut total = 0u64;
        loop {
            match reader.read(buffer) {
                Ok(0) => break,
                Ok(n) => {
                    self.update(&buffer[..n]);
                    total = total.saturating_add(u64::try_from(n).unwrap_or(u64::MAX));
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }
        Ok(total)
    }

    /// Convenience wrapper that allocates a heap buffer.
    ///
    /// # Errors
    ///
    /// Propagates read errors other than [`io::ErrorKind::Interrupted`].
    pub fn update_reader<R: Read>(&mut self, reader: &mut R) -> io::Result<u64> {
        let mut buffer = vec![0u8; Self::DEFAULT_READER_BUFFER_LEN];
        self.update_reader_with_buffer(reader, &mut buffer)
    }

    /// Consumes the hasher and returns the checksum.
    ///
    /// # Errors
    ///
    /// Returns [`ChecksumError::UnalignedLength`] when the total input is not
    /// made of whole 32-bit words.
    pub fn finalize(self) -> Result<Checksum, ChecksumError> {
        if !self.len.is_multiple_of(4) {
            return Err(ChecksumError::UnalignedLength {
                len: usize::try_from(self.len).unwrap_or(usize::MAX),
            });
        }

        let mut checksum = self.ctx.finalize();
        checksum.fold(&self.pending[..self.pending_len], self.order);
        Ok(checksum)
    }
}

impl Default for Fletcher4 {
    fn default() -> Self {
        Self::new(ByteOrder::Native)
    }
}

impl io::Write for Fletcher4 {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn write_vectored(&mut self, bufs: &[IoSlice<'_>]) -> io::Result<usize> {
        self.update_vectored(bufs);
        Ok(bufs.iter().map(|buf| buf.len()).sum())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
