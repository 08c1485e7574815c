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

//! Transport layer error types.

use crate::endpoint::EndpointError;
use std::io;
use thiserror::Error;

/// Errors from the framed transport adapter.
///
/// Transport errors sit below the endpoint: they describe the byte stream,
/// not the protocol. The one exception is [`TransportError::Endpoint`],
/// which a link pump uses to surface an endpoint fault raised while
/// dispatching an inbound frame.
#[derive(Debug, Error)]
pub enum TransportError {
    /// A frame exceeds what the 3-byte length prefix can describe.
    #[error("frame of {len} bytes exceeds the 3-byte length prefix")]
    FrameTooLarge {
        /// The oversized payload length.
        len: usize,
    },

    /// The stream ended in the middle of a frame.
    #[error("connection lost: {reason}")]
    ConnectionLost {
        /// Description of where the stream broke.
        reason: String,
        /// The underlying I/O error, if available.
        #[source]
        source: Option<io::Error>,
    },

    /// Failed to read from the stream.
    #[error("read failed: {source}")]
    ReadFailed {
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Failed to write to the stream.
    #[error("write failed: {source}")]
    WriteFailed {
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The link was torn down before the operation finished.
    #[error("transport is closed")]
    Closed,

    /// The endpoint rejected an inbound frame.
    #[error("endpoint rejected an inbound frame: {source}")]
    Endpoint {
        /// The endpoint fault.
        #[source]
        source: EndpointError,
    },
}
