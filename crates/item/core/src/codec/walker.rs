//! Strict forward reader over a byte source.
use super::CodecError;
use crate::bits::read_le_bits;

/// Reads consecutive fields of one record starting at a byte offset.
///
/// Unlike [`crate::bits::BitBuffer`] reads, running past the end of the
/// source is an error.
pub(crate) struct Walker<'a> {
    source: &'a [u8],
    base: usize,
    pos: usize,
}

impl<'a> Walker<'a> {
    pub(crate) fn new(source: &'a [u8], byte_offset: usize) -> Self {
        Self {
            source,
            base: byte_offset * 8,
            pos: 0,
        }
    }

    /// Bit position relative to the start of the record.
    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    pub(crate) fn available(&self) -> usize {
        (self.source.len() * 8).saturating_sub(self.base)
    }

    pub(crate) fn ensure(&self, bits: usize) -> Result<(), CodecError> {
        if self.pos + bits > self.available() {
            return Err(CodecError::Truncated {
                offset: self.pos,
                needed: bits,
                available: self.available().saturating_sub(self.pos),
            });
        }
        Ok(())
    }

    pub(crate) fn read(&mut self, width: u32) -> Result<u32, CodecError> {
        Ok(self.read64(width.min(32))? as u32)
    }

    pub(crate) fn read64(&mut self, width: u32) -> Result<u64, CodecError> {
        self.ensure(width as usize)?;
        let value = read_le_bits(self.source, self.base + self.pos, width);
        self.pos += width as usize;
        Ok(value)
    }

    /// Reads without advancing.
    pub(crate) fn peek_at(&self, pos: usize, width: u32) -> u64 {
        read_le_bits(self.source, self.base + pos, width)
    }

    pub(crate) fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Reads a zero-terminated string of `char_width`-bit characters.
    pub(crate) fn read_text(&mut self, char_width: u32, max_len: usize) -> Result<String, CodecError> {
        let mut text = String::new();
        loop {
            let c = self.read(char_width)?;
            if c == 0 {
                return Ok(text);
            }
            if text.chars().count() == max_len {
                return Err(CodecError::InvalidText);
            }
            text.push(char::from_u32(c).ok_or(CodecError::InvalidText)?);
        }
    }

    /// Copies the bytes covering `bits` bits from the record start.
    pub(crate) fn record_bytes(&self, bits: usize) -> Vec<u8> {
        let start = self.base / 8;
        let end = (start + bits.div_ceil(8)).min(self.source.len());
        self.source[start..end].to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_fields_relative_to_record_start() {
        let source = [0xAA, 0x4A, 0x4D, 0x05];
        let mut walker = Walker::new(&source, 1);
        assert_eq!(walker.read(16).unwrap(), 0x4D4A);
        assert_eq!(walker.read(3).unwrap(), 0b101);
        assert_eq!(walker.pos(), 19);
    }

    #[test]
    fn running_off_the_end_is_truncation() {
        let source = [0xFF];
        let mut walker = Walker::new(&source, 0);
        assert!(walker.read(6).is_ok());
        assert!(matches!(
            walker.read(4),
            Err(CodecError::Truncated { offset: 6, needed: 4, available: 2 })
        ));
    }

    #[test]
    fn text_stops_at_terminator() {
        // "Hi" in 7-bit characters followed by a zero character.
        let mut bits = crate::bits::BitBuffer::new();
        let mut cursor = 0;
        bits.set_bits(&mut cursor, 7, 'H' as u32);
        bits.set_bits(&mut cursor, 7, 'i' as u32);
        bits.set_bits(&mut cursor, 7, 0);
        let mut walker = Walker::new(bits.as_bytes(), 0);
        assert_eq!(walker.read_text(7, 15).unwrap(), "Hi");
        assert_eq!(walker.pos(), 21);
    }
}
