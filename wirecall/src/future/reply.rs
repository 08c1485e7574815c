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

//! Type-erased reply plumbing between futures and the endpoint.
//!
//! Each future variant knows its own response payload layout. On the
//! handler side the endpoint holds the returned future as a
//! [`ReplyEncode`] and asks it to serialize whatever value it holds right
//! now; on the caller side the endpoint holds the pending future as a
//! [`PendingReply`] and asks it to decode the payload and then complete.
//!
//! Decoding and completing are separate steps so that a malformed payload
//! leaves both the future and the endpoint's pending table untouched, and
//! so the endpoint can drop its table entry *before* callbacks fire.

use crate::codec::{CodecError, WireReader, WireWriter};

/// A handler-returned future that can serialize its current value as a
/// response payload.
///
/// Serialization reflects the value at hand: a future the handler never
/// completed serializes as an absent result, exactly like a completed
/// future holding a null.
pub trait ReplyEncode: Send {
    /// Appends this future's response payload to `w`.
    fn encode_reply(&self, w: &mut WireWriter) -> Result<(), CodecError>;
}

/// A caller-side pending future the endpoint can complete from a response
/// payload.
pub(crate) trait PendingReply: Send + Sync {
    /// Decodes the response payload into a staged value without completing.
    /// On error the future is left exactly as it was.
    fn decode_payload(&self, r: &mut WireReader<'_>) -> Result<(), CodecError>;

    /// Commits the staged value: marks the future complete and fires its
    /// callbacks synchronously. Idempotent.
    fn complete(&self);
}
