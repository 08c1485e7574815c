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

//! The typed-success future.

use crate::codec::{CodecError, WireDecode, WireEncode, WireReader, WireWriter};
use crate::future::reply::{PendingReply, ReplyEncode};
use crate::future::FutureError;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

struct TypedState<T> {
    complete: bool,
    result: Option<T>,
    staged: Option<Option<T>>,
    on_complete: Option<Box<dyn FnOnce(Option<&T>) + Send>>,
}

/// A deferred result of type `T`.
///
/// The retained result is an `Option<T>` because the wire carries it under
/// a nullable frame: a peer may legitimately complete the call with an
/// absent value. The callback therefore receives `Option<&T>`.
///
/// # Examples
///
/// ```rust
/// use wirecall::future::TypedCallFuture;
///
/// let future: TypedCallFuture<i32> = TypedCallFuture::pending();
/// future.on_complete(|value| assert_eq!(value, Some(&42)));
/// future.complete_with(42).unwrap();
/// assert_eq!(future.result().unwrap(), Some(42));
/// ```
pub struct TypedCallFuture<T> {
    inner: Arc<Mutex<TypedState<T>>>,
}

impl<T> TypedCallFuture<T> {
    /// Creates an incomplete future.
    #[must_use]
    pub fn pending() -> Self {
        Self::from_state(false, None)
    }

    /// Creates a future already completed with `value`.
    #[must_use]
    pub fn ready(value: T) -> Self {
        Self::from_state(true, Some(value))
    }

    fn from_state(complete: bool, result: Option<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(TypedState {
                complete,
                result,
                staged: None,
                on_complete: None,
            })),
        }
    }

    /// Returns `true` once the future has completed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.inner.lock().complete
    }

    /// The retained result.
    ///
    /// # Errors
    ///
    /// [`FutureError::NotReady`] before completion.
    pub fn result(&self) -> Result<Option<T>, FutureError>
    where
        T: Clone,
    {
        let state = self.inner.lock();
        if !state.complete {
            return Err(FutureError::NotReady);
        }
        Ok(state.result.clone())
    }

    /// Installs the completion callback.
    ///
    /// Fires immediately when the future is already complete; otherwise the
    /// callback replaces any previously installed one and fires when the
    /// future completes.
    pub fn on_complete<F>(&self, callback: F)
    where
        F: FnOnce(Option<&T>) + Send + 'static,
    {
        let value = {
            let mut state = self.inner.lock();
            if !state.complete {
                state.on_complete = Some(Box::new(callback));
                return;
            }
            state.result.take()
        };
        callback(value.as_ref());
        if let Some(value) = value {
            self.inner.lock().result = Some(value);
        }
    }

    /// Completes the future with `value`, firing the installed callback.
    ///
    /// # Errors
    ///
    /// [`FutureError::AlreadyComplete`] when completed before.
    pub fn complete_with(&self, value: T) -> Result<(), FutureError> {
        self.commit(Some(value), true)
    }

    /// Marks complete and fires the callback. `external` distinguishes the
    /// public completion path (which reports double completion) from the
    /// endpoint's commit of a staged payload (which is idempotent).
    fn commit(&self, result: Option<T>, external: bool) -> Result<(), FutureError> {
        let callback = {
            let mut state = self.inner.lock();
            if state.complete {
                return if external {
                    Err(FutureError::AlreadyComplete)
                } else {
                    Ok(())
                };
            }
            state.complete = true;
            state.result = result;
            state.on_complete.take()
        };
        if let Some(callback) = callback {
            let value = self.inner.lock().result.take();
            callback(value.as_ref());
            if let Some(value) = value {
                self.inner.lock().result = Some(value);
            }
        }
        Ok(())
    }
}

impl<T> Clone for TypedCallFuture<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> fmt::Debug for TypedCallFuture<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedCallFuture")
            .field("complete", &self.is_complete())
            .finish()
    }
}

impl<T> ReplyEncode for TypedCallFuture<T>
where
    T: WireEncode + Send + 'static,
{
    /// The result under a nullable frame; an incomplete or null result
    /// serializes as absent.
    fn encode_reply(&self, w: &mut WireWriter) -> Result<(), CodecError> {
        let state = self.inner.lock();
        match &state.result {
            Some(value) => value.encode_present(w),
            None => {
                w.write_u8(0);
                Ok(())
            }
        }
    }
}

impl<T> PendingReply for TypedCallFuture<T>
where
    T: WireDecode + Send + 'static,
{
    fn decode_payload(&self, r: &mut WireReader<'_>) -> Result<(), CodecError> {
        let decoded = T::decode_present(r)?;
        self.inner.lock().staged = Some(decoded);
        Ok(())
    }

    fn complete(&self) {
        let staged = self.inner.lock().staged.take().flatten();
        let _ = self.commit(staged, false);
    }
}
