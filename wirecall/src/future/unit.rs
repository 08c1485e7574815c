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

//! The unit-success future.

use crate::codec::{CodecError, WireReader, WireWriter};
use crate::future::reply::{PendingReply, ReplyEncode};
use crate::future::FutureError;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

struct CallState {
    complete: bool,
    on_complete: Option<Box<dyn FnOnce() + Send>>,
}

/// A deferred unit result: it either has completed or it has not.
///
/// Completion fires the installed callback synchronously, and installing a
/// callback after completion fires it immediately. The callback slot is
/// single-assignment in the sense that installing a second callback before
/// completion silently replaces the first.
///
/// # Examples
///
/// ```rust
/// use wirecall::future::CallFuture;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let future = CallFuture::pending();
/// let fired = Arc::new(AtomicUsize::new(0));
/// let counter = fired.clone();
/// future.on_complete(move || {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// assert!(!future.is_complete());
/// future.complete().unwrap();
/// assert!(future.is_complete());
/// assert_eq!(fired.load(Ordering::SeqCst), 1);
/// ```
#[derive(Clone)]
pub struct CallFuture {
    inner: Arc<Mutex<CallState>>,
}

impl CallFuture {
    /// Creates an incomplete future.
    #[must_use]
    pub fn pending() -> Self {
        Self {
            inner: Arc::new(Mutex::new(CallState {
                complete: false,
                on_complete: None,
            })),
        }
    }

    /// Creates a future that is already complete.
    #[must_use]
    pub fn ready() -> Self {
        Self {
            inner: Arc::new(Mutex::new(CallState {
                complete: true,
                on_complete: None,
            })),
        }
    }

    /// Returns `true` once the future has completed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.inner.lock().complete
    }

    /// Installs the completion callback.
    ///
    /// Fires immediately when the future is already complete; otherwise the
    /// callback replaces any previously installed one and fires when the
    /// future completes.
    pub fn on_complete<F>(&self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        {
            let mut state = self.inner.lock();
            if !state.complete {
                state.on_complete = Some(Box::new(callback));
                return;
            }
        }
        callback();
    }

    /// Completes the future, firing the installed callback.
    ///
    /// # Errors
    ///
    /// [`FutureError::AlreadyComplete`] when completed before.
    pub fn complete(&self) -> Result<(), FutureError> {
        let callback = {
            let mut state = self.inner.lock();
            if state.complete {
                return Err(FutureError::AlreadyComplete);
            }
            state.complete = true;
            state.on_complete.take()
        };
        if let Some(callback) = callback {
            callback();
        }
        Ok(())
    }
}

impl fmt::Debug for CallFuture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallFuture")
            .field("complete", &self.is_complete())
            .finish()
    }
}

impl ReplyEncode for CallFuture {
    /// A unit reply has an empty payload.
    fn encode_reply(&self, _w: &mut WireWriter) -> Result<(), CodecError> {
        Ok(())
    }
}

impl PendingReply for CallFuture {
    fn decode_payload(&self, _r: &mut WireReader<'_>) -> Result<(), CodecError> {
        Ok(())
    }

    fn complete(&self) {
        let _ = CallFuture::complete(self);
    }
}
