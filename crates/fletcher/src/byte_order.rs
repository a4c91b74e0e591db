/// Word order used when folding input into the checksum.
///
/// Data written on a machine of the opposite endianness is checksummed with
/// [`ByteOrder::Byteswap`], which byte-reverses every 32-bit word before it is
/// accumulated. The resulting checksum is identical to the one the writing
/// machine computed with [`ByteOrder::Native`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum ByteOrder {
    /// Words are read in host byte order.
    #[default]
    Native,
    /// Every word is byte-reversed before accumulation.
    Byteswap,
}

impl ByteOrder {
    /// Returns `true` for [`ByteOrder::Byteswap`].
    #[must_use]
    pub const fn is_byteswap(self) -> bool {
        matches!(self, Self::Byteswap)
    }

    /// Selects the order that reproduces the checksum of data stored by a
    /// machine with the given endianness.
    ///
    /// ```
    /// use fletcher::ByteOrder;
    ///
    /// let host_is_le = cfg!(target_endian = "little");
    /// assert_eq!(ByteOrder::for_stored(host_is_le), ByteOrder::Native);
    /// assert_eq!(ByteOrder::for_stored(!host_is_le), ByteOrder::Byteswap);
    /// ```
    #[must_use]
    pub const fn for_stored(stored_little_endian: bool) -> Self {
        if stored_little_endian == cfg!(target_endian = "little") {
            Self::Native
        } else {
            Self::Byteswap
        }
    }

    /// Name used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Byteswap => "byteswap",
        }
    }
}
