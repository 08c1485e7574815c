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

//! In-memory transport for tests and benchmarks.
//!
//! A [`MemoryTransport`] pair behaves like a connected socket without the
//! network stack: bytes written to one half become readable on the other,
//! with a bounded buffer in between so backpressure is observable.

use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, DuplexStream, ReadBuf};

/// One half of an in-memory byte stream pair.
///
/// # Examples
///
/// ```rust
/// use tokio::io::{AsyncReadExt, AsyncWriteExt};
/// use wirecall::transport::MemoryTransport;
///
/// # async fn example() -> std::io::Result<()> {
/// let (mut left, mut right) = MemoryTransport::pair(1024);
/// left.write_all(b"ping").await?;
///
/// let mut buffer = [0u8; 4];
/// right.read_exact(&mut buffer).await?;
/// assert_eq!(&buffer, b"ping");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MemoryTransport {
    io: DuplexStream,
}

impl MemoryTransport {
    /// Creates a connected pair with `buffer` bytes of capacity in each
    /// direction.
    #[must_use]
    pub fn pair(buffer: usize) -> (Self, Self) {
        let (left, right) = tokio::io::duplex(buffer);
        (Self { io: left }, Self { io: right })
    }
}

impl AsyncRead for MemoryTransport {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        Pin::new(&mut self.io).poll_read(cx, buf)
    }
}

impl AsyncWrite for MemoryTransport {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<std::io::Result<usize>> {
        Pin::new(&mut self.io).poll_write(cx, buf)
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Pin::new(&mut self.io).poll_flush(cx)
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Pin::new(&mut self.io).poll_shutdown(cx)
    }
}
