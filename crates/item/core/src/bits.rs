//! Growable byte buffer with unaligned bit-field access.
//!
//! Records are packed little-endian: bit 0 of byte 0 is the first bit of the
//! record and multi-bit fields store their least significant bit first.
//!
//! Reads are tolerant (bits past the end read as zero). Writes come in two
//! flavours: `set_*` grows the buffer and advances a caller-owned cursor, and
//! `update_*` overwrites in place and fails when the field does not fit.

/// Errors raised by in-place bit writes.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BitError {
    /// The field would extend past the end of the buffer.
    #[error("bit range {offset}+{width} exceeds buffer length of {len_bits} bits")]
    OutOfRange {
        offset: usize,
        width: u32,
        len_bits: usize,
    },
}

impl crate::error::EngineError for BitError {
    fn severity(&self) -> crate::error::ErrorSeverity {
        crate::error::ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        "BITS_OUT_OF_RANGE"
    }
}

/// Reads up to 64 bits starting at `offset` from a raw byte slice.
///
/// Bits beyond the end of `bytes` read as zero.
pub fn read_le_bits(bytes: &[u8], offset: usize, width: u32) -> u64 {
    let width = width.min(64);
    let mut value = 0u64;
    let mut read = 0u32;
    while read < width {
        let bit = offset + read as usize;
        let Some(&byte) = bytes.get(bit / 8) else {
            break;
        };
        let shift = (bit % 8) as u32;
        let take = (8 - shift).min(width - read);
        let chunk = (u64::from(byte) >> shift) & ((1u64 << take) - 1);
        value |= chunk << read;
        read += take;
    }
    value
}

/// Owned, growable bit buffer backing a single item record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BitBuffer {
    bytes: Vec<u8>,
}

impl BitBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps existing bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the buffer and returns its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Length of the buffer in bits (always a multiple of eight).
    pub fn len_bits(&self) -> usize {
        self.bytes.len() * 8
    }

    /// Length of the buffer in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Reads up to 32 bits. Bits past the end read as zero.
    pub fn read_bits(&self, offset: usize, width: u32) -> u32 {
        debug_assert!(width <= 32, "read_bits width {width} > 32");
        read_le_bits(&self.bytes, offset, width.min(32)) as u32
    }

    /// Reads up to 64 bits. Bits past the end read as zero.
    pub fn read_bits64(&self, offset: usize, width: u32) -> u64 {
        read_le_bits(&self.bytes, offset, width)
    }

    /// Writes `width` bits at `*cursor`, growing the buffer if needed, and
    /// advances the cursor past the field.
    pub fn set_bits(&mut self, cursor: &mut usize, width: u32, value: u32) {
        debug_assert!(width <= 32, "set_bits width {width} > 32");
        self.set_bits64(cursor, width.min(32), u64::from(value));
    }

    /// 64-bit variant of [`BitBuffer::set_bits`].
    pub fn set_bits64(&mut self, cursor: &mut usize, width: u32, value: u64) {
        let end = *cursor + width as usize;
        if end > self.len_bits() {
            self.resize_bits(end);
        }
        self.write_unchecked(*cursor, width, value);
        *cursor = end;
    }

    /// Overwrites `width` bits at `offset` without growing the buffer.
    pub fn update_bits(&mut self, offset: usize, width: u32, value: u32) -> Result<(), BitError> {
        debug_assert!(width <= 32, "update_bits width {width} > 32");
        self.update_bits64(offset, width.min(32), u64::from(value))
    }

    /// 64-bit variant of [`BitBuffer::update_bits`].
    pub fn update_bits64(&mut self, offset: usize, width: u32, value: u64) -> Result<(), BitError> {
        if offset + width as usize > self.len_bits() {
            return Err(BitError::OutOfRange {
                offset,
                width,
                len_bits: self.len_bits(),
            });
        }
        self.write_unchecked(offset, width, value);
        Ok(())
    }

    /// Grows or truncates the buffer to hold `bits` bits, rounded up to the byte.
    ///
    /// New bytes are zeroed.
    pub fn resize_bits(&mut self, bits: usize) {
        self.bytes.resize(bits.div_ceil(8), 0);
    }

    /// Copies `len` bits from `src[src_offset..]` into `self[dst_offset..]`,
    /// growing `self` when the destination range runs past its end.
    pub fn copy_bits_from(&mut self, src: &BitBuffer, src_offset: usize, dst_offset: usize, len: usize) {
        let end = dst_offset + len;
        if end > self.len_bits() {
            self.resize_bits(end);
        }
        let mut done = 0usize;
        while done < len {
            let take = (len - done).min(64) as u32;
            let value = src.read_bits64(src_offset + done, take);
            self.write_unchecked(dst_offset + done, take, value);
            done += take as usize;
        }
    }

    /// Zeroes every bit from `bit` to the end of the buffer.
    pub fn clear_bits_from(&mut self, bit: usize) {
        let len = self.len_bits();
        if bit >= len {
            return;
        }
        let first_full = bit.div_ceil(8);
        if bit % 8 != 0 {
            let keep = (1u8 << (bit % 8)) - 1;
            self.bytes[bit / 8] &= keep;
        }
        for byte in self.bytes.iter_mut().skip(first_full) {
            *byte = 0;
        }
    }

    /// Reads a zero-terminated string of `char_width`-bit characters.
    ///
    /// Returns `None` when no terminator follows within `max_len` characters.
    pub fn read_text(&self, offset: usize, char_width: u32, max_len: usize) -> Option<String> {
        let mut text = String::new();
        for i in 0..=max_len {
            let c = self.read_bits(offset + i * char_width as usize, char_width);
            if c == 0 {
                return Some(text);
            }
            text.push(char::from_u32(c)?);
        }
        None
    }

    /// Writes `text` followed by a zero character, growing the buffer.
    ///
    /// Characters are truncated to `char_width` bits; callers validate first.
    pub fn write_text(&mut self, cursor: &mut usize, text: &str, char_width: u32) {
        for c in text.chars() {
            self.set_bits(cursor, char_width, c as u32);
        }
        self.set_bits(cursor, char_width, 0);
    }

    fn write_unchecked(&mut self, offset: usize, width: u32, value: u64) {
        let mut written = 0u32;
        while written < width {
            let bit = offset + written as usize;
            let shift = (bit % 8) as u32;
            let take = (8 - shift).min(width - written);
            let mask = (((1u16 << take) - 1) as u8) << shift;
            let chunk = (((value >> written) as u8) << shift) & mask;
            let byte = &mut self.bytes[bit / 8];
            *byte = (*byte & !mask) | chunk;
            written += take;
        }
    }
}

/// Bits occupied by a terminated string of `len` characters.
pub const fn text_bits(len: usize, char_width: u32) -> usize {
    (len + 1) * char_width as usize
}

impl From<Vec<u8>> for BitBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_bytes(bytes)
    }
}
