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

//! Endpoint error types.

use crate::codec::CodecError;
use crate::registry::ReturnShape;
use std::fmt;

/// A fault surfaced by a handler body.
///
/// The endpoint does not translate these into error futures — a handler
/// that wants to report an error to its caller must return a fallible
/// future. A `HandlerFault` instead propagates to whoever invoked
/// [`receive_data`](crate::endpoint::Endpoint::receive_data).
pub type HandlerFault = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by endpoint operations.
///
/// Every fault is reported synchronously from the operation that triggered
/// it; the endpoint performs no retries and never tears the connection down
/// by itself. A fault from `receive_data` leaves the pending-call table as
/// it was before the message arrived.
#[derive(Debug)]
pub enum EndpointError {
    /// The codec rejected an argument or payload.
    Codec(CodecError),

    /// An inbound frame violated the protocol: an unknown interface
    /// ordinal or method index, a response for a call-id that is not
    /// pending, a reserved call-id on the wire.
    Protocol {
        /// Description of the violation.
        reason: String,
    },

    /// A call frame targeted an ordinal with no registered handler.
    UnknownHandler {
        /// The unhandled interface ordinal.
        ordinal: u8,
    },

    /// `register_handler` found the ordinal already bound.
    HandlerAlreadyBound {
        /// The contested interface ordinal.
        ordinal: u8,
    },

    /// The call-id allocator landed on an id that is still outstanding.
    CallIdExhausted {
        /// The id that could not be issued.
        call_id: u8,
    },

    /// A call was finished with a future variant that does not match the
    /// method's declared return shape.
    ShapeMismatch {
        /// The shape the method declares.
        expected: ReturnShape,
        /// The shape the finisher asked for.
        requested: ReturnShape,
    },

    /// A handler body surfaced a fault.
    Handler(HandlerFault),
}

impl EndpointError {
    /// Creates a [`EndpointError::Protocol`] with the given reason.
    pub fn protocol(reason: impl Into<String>) -> Self {
        Self::Protocol {
            reason: reason.into(),
        }
    }

    /// Protocol violation for an unknown method index.
    #[must_use]
    pub fn unknown_method(ordinal: u8, index: u8) -> Self {
        Self::Protocol {
            reason: format!("interface {} has no method with index {}", ordinal, index),
        }
    }
}

impl fmt::Display for EndpointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Codec(err) => write!(f, "codec error: {}", err),
            Self::Protocol { reason } => write!(f, "protocol violation: {}", reason),
            Self::UnknownHandler { ordinal } => {
                write!(f, "no handler registered for interface ordinal {}", ordinal)
            }
            Self::HandlerAlreadyBound { ordinal } => {
                write!(f, "interface ordinal {} is already bound", ordinal)
            }
            Self::CallIdExhausted { call_id } => write!(
                f,
                "call-id space exhausted: id {} is still outstanding",
                call_id
            ),
            Self::ShapeMismatch {
                expected,
                requested,
            } => write!(
                f,
                "return shape mismatch: method declares {:?}, finisher requested {:?}",
                expected, requested
            ),
            Self::Handler(err) => write!(f, "handler fault: {}", err),
        }
    }
}

impl std::error::Error for EndpointError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Codec(err) => Some(err),
            Self::Handler(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<CodecError> for EndpointError {
    fn from(err: CodecError) -> Self {
        Self::Codec(err)
    }
}
