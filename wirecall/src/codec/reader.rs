//
// Copyright 2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Primitive wire reader.
//!
//! [`WireReader`] walks a single received message. It is the mirror of
//! [`WireWriter`](crate::codec::WireWriter): little-endian integers and
//! floats, varint-prefixed strings. Running off the end of the buffer is a
//! [`CodecError::TruncatedInput`].

use crate::codec::CodecError;

/// A cursor over one received wire message.
///
/// # Examples
///
/// ```rust
/// use wirecall::codec::WireReader;
///
/// let mut r = WireReader::new(&[0x2A, 0x00, 0x00, 0x00]);
/// assert_eq!(r.read_i32().unwrap(), 42);
/// assert!(r.is_empty());
/// ```
#[derive(Debug)]
pub struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    /// Creates a reader positioned at the start of `buf`.
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Returns `true` if every byte has been consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pos == self.buf.len()
    }

    /// Consumes exactly `n` bytes, or fails with [`CodecError::TruncatedInput`].
    pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        if self.remaining() < n {
            return Err(CodecError::TruncatedInput {
                needed: n,
                remaining: self.remaining(),
            });
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Reads a single byte.
    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.read_exact(1)?[0])
    }

    /// Reads a signed byte.
    pub fn read_i8(&mut self) -> Result<i8, CodecError> {
        Ok(self.read_u8()? as i8)
    }

    /// Reads a bool byte; anything other than 0 or 1 is a schema violation.
    pub fn read_bool(&mut self) -> Result<bool, CodecError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(CodecError::schema(format!(
                "invalid bool byte 0x{:02X}",
                other
            ))),
        }
    }

    /// Reads a little-endian u16.
    pub fn read_u16(&mut self) -> Result<u16, CodecError> {
        let bytes = self.read_exact(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Reads a little-endian i16.
    pub fn read_i16(&mut self) -> Result<i16, CodecError> {
        Ok(self.read_u16()? as i16)
    }

    /// Reads a little-endian u32.
    pub fn read_u32(&mut self) -> Result<u32, CodecError> {
        let bytes = self.read_exact(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Reads a little-endian i32.
    pub fn read_i32(&mut self) -> Result<i32, CodecError> {
        Ok(self.read_u32()? as i32)
    }

    /// Reads a little-endian u64.
    pub fn read_u64(&mut self) -> Result<u64, CodecError> {
        let bytes = self.read_exact(8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(bytes);
        Ok(u64::from_le_bytes(raw))
    }

    /// Reads a little-endian i64.
    pub fn read_i64(&mut self) -> Result<i64, CodecError> {
        Ok(self.read_u64()? as i64)
    }

    /// Reads a little-endian IEEE-754 f32.
    pub fn read_f32(&mut self) -> Result<f32, CodecError> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    /// Reads a little-endian IEEE-754 f64.
    pub fn read_f64(&mut self) -> Result<f64, CodecError> {
        Ok(f64::from_bits(self.read_u64()?))
    }

    /// Reads a 7-bit-per-byte varint length.
    ///
    /// Accepts at most five bytes; a fifth byte carrying more than the four
    /// bits that fit in a u32 is a schema violation.
    pub fn read_var_len(&mut self) -> Result<u32, CodecError> {
        let mut value: u32 = 0;
        let mut shift = 0u32;
        loop {
            let byte = self.read_u8()?;
            if shift == 28 && byte & 0xF0 != 0 {
                return Err(CodecError::schema("varint length overflows 32 bits"));
            }
            value |= u32::from(byte & 0x7F) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
            shift += 7;
        }
    }

    /// Reads a varint-prefixed UTF-8 string.
    pub fn read_str(&mut self) -> Result<String, CodecError> {
        let len = self.read_var_len()? as usize;
        let bytes = self.read_exact(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|_| CodecError::schema("string payload is not valid UTF-8"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::WireWriter;

    #[test]
    fn test_read_integers() {
        let mut w = WireWriter::new();
        w.write_u16(0x1234);
        w.write_i32(-7);
        w.write_u64(u64::MAX);
        let bytes = w.into_bytes();

        let mut r = WireReader::new(&bytes);
        assert_eq!(r.read_u16().unwrap(), 0x1234);
        assert_eq!(r.read_i32().unwrap(), -7);
        assert_eq!(r.read_u64().unwrap(), u64::MAX);
        assert!(r.is_empty());
    }

    #[test]
    fn test_truncated_input_reports_sizes() {
        let mut r = WireReader::new(&[0x01, 0x02]);
        let err = r.read_u32().unwrap_err();
        match err {
            CodecError::TruncatedInput { needed, remaining } => {
                assert_eq!(needed, 4);
                assert_eq!(remaining, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_bool_rejects_garbage() {
        let mut r = WireReader::new(&[2]);
        assert!(matches!(
            r.read_bool(),
            Err(CodecError::SchemaViolation { .. })
        ));
    }

    #[test]
    fn test_var_len_round_trip() {
        for value in [0u32, 1, 127, 128, 300, 16_383, 16_384, u32::MAX] {
            let mut w = WireWriter::new();
            w.write_var_len(value);
            let bytes = w.into_bytes();
            let mut r = WireReader::new(&bytes);
            assert_eq!(r.read_var_len().unwrap(), value, "value {value}");
            assert!(r.is_empty());
        }
    }

    #[test]
    fn test_var_len_overflow_rejected() {
        // Five continuation-heavy bytes encoding 2^35 - 1.
        let mut r = WireReader::new(&[0xFF, 0xFF, 0xFF, 0xFF, 0x7F]);
        assert!(matches!(
            r.read_var_len(),
            Err(CodecError::SchemaViolation { .. })
        ));
    }

    #[test]
    fn test_read_str() {
        let mut w = WireWriter::new();
        w.write_str("héllo");
        let bytes = w.into_bytes();
        let mut r = WireReader::new(&bytes);
        assert_eq!(r.read_str().unwrap(), "héllo");
    }

    #[test]
    fn test_read_str_invalid_utf8() {
        // length 2, then an invalid UTF-8 sequence
        let mut r = WireReader::new(&[0x02, 0xC3, 0x28]);
        assert!(matches!(
            r.read_str(),
            Err(CodecError::SchemaViolation { .. })
        ));
    }

    #[test]
    fn test_read_str_truncated_payload() {
        let mut r = WireReader::new(&[0x05, b'a', b'b']);
        assert!(matches!(
            r.read_str(),
            Err(CodecError::TruncatedInput { .. })
        ));
    }
}
