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

//! Length-prefixed message framing.
//!
//! Each endpoint message travels as one frame: a 3-byte big-endian length
//! prefix, then the payload. The top bit of the first prefix byte is the
//! close-connection flag; a frame with it set carries no payload and tells
//! the peer the stream is done. The endpoint itself never sees these
//! prefix bytes.
//!
//! ```text
//! +-------------------+--------------------+
//! | length (3 bytes)  | payload (N bytes)  |
//! +-------------------+--------------------+
//!   bit 23: close flag
//! ```

use crate::transport::TransportError;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Largest payload the 3-byte prefix can describe (the top bit is the
/// close flag).
pub const MAX_FRAME_LEN: usize = 0x7F_FFFF;

/// Close-connection flag in the first prefix byte.
const CLOSE_FLAG: u8 = 0x80;

/// Size of the length prefix in bytes.
pub const FRAME_PREFIX_LEN: usize = 3;

/// Writes one framed message and flushes.
///
/// # Errors
///
/// [`TransportError::FrameTooLarge`] when the payload exceeds
/// [`MAX_FRAME_LEN`]; [`TransportError::WriteFailed`] on I/O failure.
pub async fn write_frame<W>(writer: &mut W, payload: &[u8]) -> Result<(), TransportError>
where
    W: AsyncWrite + Unpin,
{
    let len = payload.len();
    if len > MAX_FRAME_LEN {
        return Err(TransportError::FrameTooLarge { len });
    }
    let prefix = [(len >> 16) as u8, (len >> 8) as u8, len as u8];
    writer
        .write_all(&prefix)
        .await
        .map_err(|source| TransportError::WriteFailed { source })?;
    writer
        .write_all(payload)
        .await
        .map_err(|source| TransportError::WriteFailed { source })?;
    writer
        .flush()
        .await
        .map_err(|source| TransportError::WriteFailed { source })?;
    Ok(())
}

/// Writes a close frame and flushes.
///
/// # Errors
///
/// [`TransportError::WriteFailed`] on I/O failure.
pub async fn write_close<W>(writer: &mut W) -> Result<(), TransportError>
where
    W: AsyncWrite + Unpin,
{
    writer
        .write_all(&[CLOSE_FLAG, 0, 0])
        .await
        .map_err(|source| TransportError::WriteFailed { source })?;
    writer
        .flush()
        .await
        .map_err(|source| TransportError::WriteFailed { source })?;
    Ok(())
}

/// Reads one framed message.
///
/// Returns `Ok(None)` when the peer sent a close frame or the stream ended
/// cleanly at a frame boundary.
///
/// # Errors
///
/// [`TransportError::ConnectionLost`] when the stream ends inside a frame;
/// [`TransportError::ReadFailed`] on I/O failure.
pub async fn read_frame<R>(reader: &mut R) -> Result<Option<Vec<u8>>, TransportError>
where
    R: AsyncRead + Unpin,
{
    let mut prefix = [0u8; FRAME_PREFIX_LEN];
    let mut filled = 0;
    while filled < FRAME_PREFIX_LEN {
        let n = reader
            .read(&mut prefix[filled..])
            .await
            .map_err(|source| TransportError::ReadFailed { source })?;
        if n == 0 {
            if filled == 0 {
                return Ok(None);
            }
            return Err(TransportError::ConnectionLost {
                reason: "stream ended inside a frame prefix".to_string(),
                source: None,
            });
        }
        filled += n;
    }

    if prefix[0] & CLOSE_FLAG != 0 {
        return Ok(None);
    }

    let len =
        (usize::from(prefix[0]) << 16) | (usize::from(prefix[1]) << 8) | usize::from(prefix[2]);
    let mut payload = vec![0u8; len];
    reader
        .read_exact(&mut payload)
        .await
        .map_err(|source| TransportError::ConnectionLost {
            reason: "stream ended inside a frame payload".to_string(),
            source: Some(source),
        })?;
    Ok(Some(payload))
}
