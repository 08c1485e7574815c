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

//! Codec error types.

use std::fmt;

/// Errors raised while encoding or decoding wire values.
///
/// The codec is schema-driven rather than self-describing, so most failures
/// mean the bytes on the wire and the schema the reader expects have come
/// apart. Every error is surfaced synchronously from the operation that
/// triggered it.
///
/// # Examples
///
/// ```rust
/// use wirecall::codec::{CodecError, WireReader};
///
/// let mut reader = WireReader::new(&[0x01]);
/// let err = reader.read_u32().unwrap_err();
/// assert!(matches!(err, CodecError::TruncatedInput { .. }));
/// ```
#[derive(Debug)]
pub enum CodecError {
    /// The schema demands something the value (or the bytes) cannot satisfy:
    /// an absent value for a non-nullable slot, a character outside the
    /// encodable range, a malformed length prefix, invalid UTF-8.
    SchemaViolation {
        /// Description of the violated schema rule.
        reason: String,
    },

    /// The input ended in the middle of a value.
    TruncatedInput {
        /// Bytes the decoder needed to make progress.
        needed: usize,
        /// Bytes that were actually left.
        remaining: usize,
    },

    /// A sequence length exceeds the 16-bit wire limit of 65,535 elements.
    SequenceTooLong {
        /// The offending length.
        len: usize,
    },

    /// A decoded enum discriminant does not name any declared variant.
    InvalidEnumValue {
        /// The enum type being decoded.
        type_name: &'static str,
        /// The raw discriminant read from the wire.
        value: i64,
    },

    /// A nullable presence tag was neither 0 (absent) nor 1 (present).
    InvalidPresenceTag {
        /// The raw tag byte.
        tag: u8,
    },
}

impl CodecError {
    /// Creates a [`CodecError::SchemaViolation`] with the given reason.
    pub fn schema(reason: impl Into<String>) -> Self {
        Self::SchemaViolation {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SchemaViolation { reason } => write!(f, "schema violation: {}", reason),
            Self::TruncatedInput { needed, remaining } => write!(
                f,
                "truncated input: needed {} more byte(s), {} remaining",
                needed, remaining
            ),
            Self::SequenceTooLong { len } => {
                write!(f, "sequence of {} elements exceeds the 65535 limit", len)
            }
            Self::InvalidEnumValue { type_name, value } => {
                write!(f, "value {} is not a variant of {}", value, type_name)
            }
            Self::InvalidPresenceTag { tag } => {
                write!(f, "invalid presence tag 0x{:02X} (expected 0 or 1)", tag)
            }
        }
    }
}

impl std::error::Error for CodecError {}
