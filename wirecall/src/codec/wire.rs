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

//! Typed wire encoding.
//!
//! [`WireEncode`] and [`WireDecode`] tie Rust values to the schema-driven
//! wire format. The format is not self-describing: the decoder must already
//! know the expected type of every field, which keeps the encoding compact.
//! Both peers must therefore agree on field declaration order — the derive
//! macro fixes that order at compile time.
//!
//! # Nullability
//!
//! The nullable dimension of the wire format is carried by `Option<T>`: an
//! option encodes as a one-byte presence tag (0 absent, 1 present) followed
//! by the payload when present. `Option<T>` *is* the nullable encoding —
//! encoding an option under an already-nullable slot never writes a second
//! tag, because the option overrides [`WireEncode::encode_present`] and
//! [`WireDecode::decode_present`] to claim the slot's tag as its own.
//!
//! # Sequences
//!
//! `Vec<T>` encodes as a little-endian u16 length followed by the elements.
//! A sequence longer than 65,535 elements cannot be represented and fails
//! with [`CodecError::SequenceTooLong`]. Element nullability is expressed in
//! the element type (`Vec<Option<T>>`).

use crate::codec::{CodecError, WireReader, WireWriter};

/// Maximum number of elements in a wire sequence.
pub const MAX_SEQUENCE_LEN: usize = u16::MAX as usize;

/// A value that can be written to the wire against its static schema.
pub trait WireEncode {
    /// Writes the value.
    fn encode(&self, w: &mut WireWriter) -> Result<(), CodecError>;

    /// Writes the value under a nullable slot: a presence tag of 1, then the
    /// payload. `Option` overrides this so that option-typed values are
    /// never double-tagged.
    fn encode_present(&self, w: &mut WireWriter) -> Result<(), CodecError> {
        w.write_u8(1);
        self.encode(w)
    }
}

/// A value that can be read from the wire against its static schema.
pub trait WireDecode: Sized {
    /// Reads the value.
    fn decode(r: &mut WireReader<'_>) -> Result<Self, CodecError>;

    /// Reads from a nullable slot: a presence tag, then the payload when the
    /// tag is 1. Returns `None` for an absent value. `Option` overrides
    /// this to consume exactly one tag (its own), mapping an absent payload
    /// to `Some(None)` so the slot itself still reads as filled.
    fn decode_present(r: &mut WireReader<'_>) -> Result<Option<Self>, CodecError> {
        match r.read_u8()? {
            0 => Ok(None),
            1 => Self::decode(r).map(Some),
            tag => Err(CodecError::InvalidPresenceTag { tag }),
        }
    }
}

macro_rules! impl_wire_primitive {
    ($ty:ty, $write:ident, $read:ident) => {
        impl WireEncode for $ty {
            fn encode(&self, w: &mut WireWriter) -> Result<(), CodecError> {
                w.$write(*self);
                Ok(())
            }
        }

        impl WireDecode for $ty {
            fn decode(r: &mut WireReader<'_>) -> Result<Self, CodecError> {
                r.$read()
            }
        }
    };
}

impl_wire_primitive!(bool, write_bool, read_bool);
impl_wire_primitive!(u8, write_u8, read_u8);
impl_wire_primitive!(i8, write_i8, read_i8);
impl_wire_primitive!(u16, write_u16, read_u16);
impl_wire_primitive!(i16, write_i16, read_i16);
impl_wire_primitive!(u32, write_u32, read_u32);
impl_wire_primitive!(i32, write_i32, read_i32);
impl_wire_primitive!(u64, write_u64, read_u64);
impl_wire_primitive!(i64, write_i64, read_i64);
impl_wire_primitive!(f32, write_f32, read_f32);
impl_wire_primitive!(f64, write_f64, read_f64);

impl WireEncode for char {
    /// A char is one UTF-16 code unit. Characters outside the Basic
    /// Multilingual Plane would need a surrogate pair and cannot be
    /// represented in this slot.
    fn encode(&self, w: &mut WireWriter) -> Result<(), CodecError> {
        let code = u32::from(*self);
        if code > 0xFFFF {
            return Err(CodecError::schema(format!(
                "char {:?} is outside the Basic Multilingual Plane",
                self
            )));
        }
        w.write_u16(code as u16);
        Ok(())
    }
}

impl WireDecode for char {
    fn decode(r: &mut WireReader<'_>) -> Result<Self, CodecError> {
        let unit = r.read_u16()?;
        if (0xD800..=0xDFFF).contains(&unit) {
            return Err(CodecError::schema(format!(
                "decoded surrogate code unit 0x{:04X}",
                unit
            )));
        }
        char::from_u32(u32::from(unit))
            .ok_or_else(|| CodecError::schema(format!("invalid char code unit 0x{:04X}", unit)))
    }
}

impl WireEncode for String {
    fn encode(&self, w: &mut WireWriter) -> Result<(), CodecError> {
        w.write_str(self);
        Ok(())
    }
}

impl WireEncode for str {
    fn encode(&self, w: &mut WireWriter) -> Result<(), CodecError> {
        w.write_str(self);
        Ok(())
    }
}

impl WireDecode for String {
    fn decode(r: &mut WireReader<'_>) -> Result<Self, CodecError> {
        r.read_str()
    }
}

impl<T: WireEncode> WireEncode for Option<T> {
    fn encode(&self, w: &mut WireWriter) -> Result<(), CodecError> {
        match self {
            None => {
                w.write_u8(0);
                Ok(())
            }
            Some(value) => {
                w.write_u8(1);
                value.encode(w)
            }
        }
    }

    /// An option already carries its presence tag; no second tag is written.
    fn encode_present(&self, w: &mut WireWriter) -> Result<(), CodecError> {
        self.encode(w)
    }
}

impl<T: WireDecode> WireDecode for Option<T> {
    fn decode(r: &mut WireReader<'_>) -> Result<Self, CodecError> {
        match r.read_u8()? {
            0 => Ok(None),
            1 => T::decode(r).map(Some),
            tag => Err(CodecError::InvalidPresenceTag { tag }),
        }
    }

    /// An option consumes exactly one tag. An absent payload reads as
    /// `Some(None)`: the slot is filled, the value is null.
    fn decode_present(r: &mut WireReader<'_>) -> Result<Option<Self>, CodecError> {
        Self::decode(r).map(Some)
    }
}

impl<T: WireEncode> WireEncode for Vec<T> {
    fn encode(&self, w: &mut WireWriter) -> Result<(), CodecError> {
        encode_slice(self, w)
    }
}

impl<T: WireEncode> WireEncode for [T] {
    fn encode(&self, w: &mut WireWriter) -> Result<(), CodecError> {
        encode_slice(self, w)
    }
}

impl<T: WireDecode> WireDecode for Vec<T> {
    fn decode(r: &mut WireReader<'_>) -> Result<Self, CodecError> {
        let len = r.read_u16()? as usize;
        let mut out = Vec::with_capacity(len.min(1024));
        for _ in 0..len {
            out.push(T::decode(r)?);
        }
        Ok(out)
    }
}

fn encode_slice<T: WireEncode>(items: &[T], w: &mut WireWriter) -> Result<(), CodecError> {
    if items.len() > MAX_SEQUENCE_LEN {
        return Err(CodecError::SequenceTooLong { len: items.len() });
    }
    w.write_u16(items.len() as u16);
    for item in items {
        item.encode(w)?;
    }
    Ok(())
}

impl<T: WireEncode + ?Sized> WireEncode for &T {
    fn encode(&self, w: &mut WireWriter) -> Result<(), CodecError> {
        (**self).encode(w)
    }

    fn encode_present(&self, w: &mut WireWriter) -> Result<(), CodecError> {
        (**self).encode_present(w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode<T: WireEncode + ?Sized>(value: &T) -> Vec<u8> {
        let mut w = WireWriter::new();
        value.encode(&mut w).unwrap();
        w.into_bytes()
    }

    fn decode<T: WireDecode>(bytes: &[u8]) -> T {
        let mut r = WireReader::new(bytes);
        let value = T::decode(&mut r).unwrap();
        assert!(r.is_empty(), "decoder left {} byte(s)", r.remaining());
        value
    }

    #[test]
    fn test_primitive_round_trip() {
        assert_eq!(decode::<i32>(&encode(&-123i32)), -123);
        assert_eq!(decode::<u64>(&encode(&u64::MAX)), u64::MAX);
        assert_eq!(decode::<f64>(&encode(&2.5f64)), 2.5);
        assert!(decode::<bool>(&encode(&true)));
    }

    #[test]
    fn test_char_is_one_utf16_unit() {
        assert_eq!(encode(&'A'), vec![0x41, 0x00]);
        assert_eq!(decode::<char>(&[0x41, 0x00]), 'A');
        // U+20AC EURO SIGN, still a single unit
        assert_eq!(encode(&'€'), vec![0xAC, 0x20]);
    }

    #[test]
    fn test_char_outside_bmp_rejected() {
        let mut w = WireWriter::new();
        assert!(matches!(
            '🦀'.encode(&mut w),
            Err(CodecError::SchemaViolation { .. })
        ));
    }

    #[test]
    fn test_char_surrogate_unit_rejected() {
        let mut r = WireReader::new(&[0x00, 0xD8]);
        assert!(matches!(
            char::decode(&mut r),
            Err(CodecError::SchemaViolation { .. })
        ));
    }

    #[test]
    fn test_string_round_trip() {
        let value = "forty two".to_string();
        assert_eq!(decode::<String>(&encode(&value)), value);
    }

    #[test]
    fn test_option_round_trip() {
        assert_eq!(encode(&None::<i32>), vec![0x00]);
        assert_eq!(encode(&Some(7i32)), vec![0x01, 0x07, 0x00, 0x00, 0x00]);
        assert_eq!(decode::<Option<i32>>(&[0x00]), None);
        assert_eq!(
            decode::<Option<i32>>(&[0x01, 0x07, 0x00, 0x00, 0x00]),
            Some(7)
        );
    }

    #[test]
    fn test_option_is_never_double_tagged() {
        // Encoding an option under a nullable slot writes one tag, not two.
        let mut w = WireWriter::new();
        Some(1u8).encode_present(&mut w).unwrap();
        assert_eq!(w.as_slice(), &[0x01, 0x01]);

        let mut w = WireWriter::new();
        None::<u8>.encode_present(&mut w).unwrap();
        assert_eq!(w.as_slice(), &[0x00]);

        // And the decoder consumes exactly that one tag.
        let mut r = WireReader::new(&[0x00]);
        assert_eq!(Option::<u8>::decode_present(&mut r).unwrap(), Some(None));
        assert!(r.is_empty());
    }

    #[test]
    fn test_plain_value_under_nullable_slot() {
        let mut w = WireWriter::new();
        42u8.encode_present(&mut w).unwrap();
        assert_eq!(w.as_slice(), &[0x01, 0x2A]);

        let mut r = WireReader::new(&[0x01, 0x2A]);
        assert_eq!(u8::decode_present(&mut r).unwrap(), Some(42));

        let mut r = WireReader::new(&[0x00]);
        assert_eq!(u8::decode_present(&mut r).unwrap(), None);
    }

    #[test]
    fn test_invalid_presence_tag() {
        let mut r = WireReader::new(&[0x02, 0x00]);
        assert!(matches!(
            Option::<u8>::decode(&mut r),
            Err(CodecError::InvalidPresenceTag { tag: 2 })
        ));
    }

    #[test]
    fn test_sequence_round_trip_preserves_order() {
        let values = vec![3i16, -1, 0, 700];
        let bytes = encode(&values);
        assert_eq!(&bytes[..2], &[0x04, 0x00]);
        assert_eq!(decode::<Vec<i16>>(&bytes), values);
    }

    #[test]
    fn test_sequence_of_nullable_elements() {
        let values = vec![Some(1u8), None, Some(3)];
        let bytes = encode(&values);
        assert_eq!(bytes, vec![0x03, 0x00, 0x01, 0x01, 0x00, 0x01, 0x03]);
        assert_eq!(decode::<Vec<Option<u8>>>(&bytes), values);
    }

    #[test]
    fn test_sequence_too_long() {
        let values = vec![0u8; MAX_SEQUENCE_LEN + 1];
        let mut w = WireWriter::new();
        assert!(matches!(
            values.encode(&mut w),
            Err(CodecError::SequenceTooLong { len }) if len == MAX_SEQUENCE_LEN + 1
        ));
    }

    #[test]
    fn test_sequence_truncated_elements() {
        // Claims 3 elements, carries 1.
        let mut r = WireReader::new(&[0x03, 0x00, 0x2A]);
        assert!(matches!(
            Vec::<u32>::decode(&mut r),
            Err(CodecError::TruncatedInput { .. })
        ));
    }

    #[test]
    fn test_empty_sequence() {
        let bytes = encode(&Vec::<u8>::new());
        assert_eq!(bytes, vec![0x00, 0x00]);
        assert!(decode::<Vec<u8>>(&bytes).is_empty());
    }
}
