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

//! The pump between an endpoint and a framed byte stream.
//!
//! [`EndpointLink::spawn`] wires an [`Endpoint`] to any
//! `AsyncRead + AsyncWrite` stream: outbound frames from the endpoint's
//! data-out sink are length-framed onto the write half, inbound frames are
//! read off the read half and fed to
//! [`receive_data`](Endpoint::receive_data). The endpoint stays a
//! synchronous machine; only the pump is async.

use crate::endpoint::{Endpoint, SessionContext};
use crate::transport::framing::{read_frame, write_close, write_frame};
use crate::transport::TransportError;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// A running endpoint↔stream pump.
///
/// The writer task drains outbound frames and emits a close frame once the
/// endpoint (and with it the data-out sink) is dropped. The reader task
/// feeds inbound frames to the endpoint until the peer closes or a fault
/// surfaces.
#[derive(Debug)]
pub struct EndpointLink {
    reader: JoinHandle<Result<(), TransportError>>,
    writer: JoinHandle<Result<(), TransportError>>,
}

impl EndpointLink {
    /// Installs the endpoint's data-out sink and spawns the pump tasks.
    ///
    /// The returned link owns the stream. All inbound calls are dispatched
    /// with the given `session` as their context.
    pub fn spawn<S>(endpoint: Endpoint, stream: S, session: SessionContext) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (read_half, write_half) = tokio::io::split(stream);
        let (frame_tx, frame_rx) = mpsc::unbounded_channel::<Vec<u8>>();
        endpoint.set_data_out(move |bytes| {
            // The pump owning the receiver is gone; nothing to deliver to.
            let _ = frame_tx.send(bytes.to_vec());
        });

        let writer = tokio::spawn(async move {
            let mut write_half = write_half;
            let mut frame_rx = frame_rx;
            while let Some(frame) = frame_rx.recv().await {
                write_frame(&mut write_half, &frame).await?;
            }
            debug!("outbound side drained, sending close frame");
            write_close(&mut write_half).await.ok();
            Ok(())
        });

        let reader = tokio::spawn(async move {
            let mut read_half = read_half;
            while let Some(frame) = read_frame(&mut read_half).await? {
                endpoint
                    .receive_data(&frame, &session)
                    .map_err(|source| TransportError::Endpoint { source })?;
            }
            debug!("peer closed the stream");
            Ok(())
        });

        Self { reader, writer }
    }

    /// Waits for the peer to close the stream (or a fault), then tears the
    /// outbound side down.
    ///
    /// # Errors
    ///
    /// The first fault from the inbound side, or
    /// [`TransportError::Closed`] when a pump task was cancelled.
    pub async fn join(self) -> Result<(), TransportError> {
        let result = match self.reader.await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Closed),
        };
        self.writer.abort();
        let _ = self.writer.await;
        result
    }

    /// Tears both pump tasks down immediately.
    pub fn abort(&self) {
        self.reader.abort();
        self.writer.abort();
    }
}
