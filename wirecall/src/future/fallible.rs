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

//! The error-bearing futures.
//!
//! Both variants carry an optional error string alongside completion. On
//! the wire the error travels first as an `Option<String>`; for the typed
//! variant the result follows under a nullable frame only when no error is
//! present. Three callback slots are exposed: `on_result` always fires at
//! completion, `on_success` only without an error, `on_error` only with
//! one.

use crate::codec::{CodecError, WireDecode, WireEncode, WireReader, WireWriter};
use crate::future::reply::{PendingReply, ReplyEncode};
use crate::future::FutureError;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

struct FallibleState {
    complete: bool,
    error: Option<String>,
    staged: Option<Option<String>>,
    on_result: Option<Box<dyn FnOnce(Result<(), &str>) + Send>>,
    on_success: Option<Box<dyn FnOnce() + Send>>,
    on_error: Option<Box<dyn FnOnce(&str) + Send>>,
}

/// A deferred unit result with an error channel.
///
/// # Examples
///
/// ```rust
/// use wirecall::future::FallibleCallFuture;
///
/// let future = FallibleCallFuture::pending();
/// future.on_error(|message| assert_eq!(message, "nope"));
/// future.complete_err("nope").unwrap();
/// assert!(future.is_error());
/// ```
#[derive(Clone)]
pub struct FallibleCallFuture {
    inner: Arc<Mutex<FallibleState>>,
}

impl FallibleCallFuture {
    /// Creates an incomplete future.
    #[must_use]
    pub fn pending() -> Self {
        Self::from_state(false, None)
    }

    /// Creates a future already completed successfully.
    #[must_use]
    pub fn ok() -> Self {
        Self::from_state(true, None)
    }

    /// Creates a future already completed with an error.
    #[must_use]
    pub fn err(message: impl Into<String>) -> Self {
        Self::from_state(true, Some(message.into()))
    }

    fn from_state(complete: bool, error: Option<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(FallibleState {
                complete,
                error,
                staged: None,
                on_result: None,
                on_success: None,
                on_error: None,
            })),
        }
    }

    /// Returns `true` once the future has completed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.inner.lock().complete
    }

    /// Returns `true` when the future completed with an error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        let state = self.inner.lock();
        state.complete && state.error.is_some()
    }

    /// The retained error, if any.
    ///
    /// # Errors
    ///
    /// [`FutureError::NotReady`] before completion.
    pub fn error(&self) -> Result<Option<String>, FutureError> {
        let state = self.inner.lock();
        if !state.complete {
            return Err(FutureError::NotReady);
        }
        Ok(state.error.clone())
    }

    /// Installs the always-fires completion callback.
    pub fn on_result<F>(&self, callback: F)
    where
        F: FnOnce(Result<(), &str>) + Send + 'static,
    {
        let error = {
            let mut state = self.inner.lock();
            if !state.complete {
                state.on_result = Some(Box::new(callback));
                return;
            }
            state.error.take()
        };
        match &error {
            None => callback(Ok(())),
            Some(message) => callback(Err(message)),
        }
        if let Some(message) = error {
            self.inner.lock().error = Some(message);
        }
    }

    /// Installs the success-only callback.
    pub fn on_success<F>(&self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        {
            let mut state = self.inner.lock();
            if !state.complete {
                state.on_success = Some(Box::new(callback));
                return;
            }
            if state.error.is_some() {
                return;
            }
        }
        callback();
    }

    /// Installs the error-only callback.
    pub fn on_error<F>(&self, callback: F)
    where
        F: FnOnce(&str) + Send + 'static,
    {
        let error = {
            let mut state = self.inner.lock();
            if !state.complete {
                state.on_error = Some(Box::new(callback));
                return;
            }
            match state.error.take() {
                Some(message) => message,
                None => return,
            }
        };
        callback(&error);
        self.inner.lock().error = Some(error);
    }

    /// Completes the future successfully.
    ///
    /// # Errors
    ///
    /// [`FutureError::AlreadyComplete`] when completed before.
    pub fn complete_ok(&self) -> Result<(), FutureError> {
        self.commit(None, true)
    }

    /// Completes the future with an error.
    ///
    /// # Errors
    ///
    /// [`FutureError::AlreadyComplete`] when completed before.
    pub fn complete_err(&self, message: impl Into<String>) -> Result<(), FutureError> {
        self.commit(Some(message.into()), true)
    }

    fn commit(&self, error: Option<String>, external: bool) -> Result<(), FutureError> {
        let (on_result, on_success, on_error, error) = {
            let mut state = self.inner.lock();
            if state.complete {
                return if external {
                    Err(FutureError::AlreadyComplete)
                } else {
                    Ok(())
                };
            }
            state.complete = true;
            state.error = error;
            (
                state.on_result.take(),
                state.on_success.take(),
                state.on_error.take(),
                state.error.take(),
            )
        };
        match &error {
            None => {
                if let Some(callback) = on_result {
                    callback(Ok(()));
                }
                if let Some(callback) = on_success {
                    callback();
                }
            }
            Some(message) => {
                if let Some(callback) = on_result {
                    callback(Err(message));
                }
                if let Some(callback) = on_error {
                    callback(message);
                }
            }
        }
        if let Some(message) = error {
            self.inner.lock().error = Some(message);
        }
        Ok(())
    }
}

impl fmt::Debug for FallibleCallFuture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("FallibleCallFuture")
            .field("complete", &state.complete)
            .field("error", &state.error)
            .finish()
    }
}

impl ReplyEncode for FallibleCallFuture {
    /// The optional error string; absent means success.
    fn encode_reply(&self, w: &mut WireWriter) -> Result<(), CodecError> {
        self.inner.lock().error.encode(w)
    }
}

impl PendingReply for FallibleCallFuture {
    fn decode_payload(&self, r: &mut WireReader<'_>) -> Result<(), CodecError> {
        let error = Option::<String>::decode(r)?;
        self.inner.lock().staged = Some(error);
        Ok(())
    }

    fn complete(&self) {
        let staged = self.inner.lock().staged.take().flatten();
        let _ = self.commit(staged, false);
    }
}

struct TypedFallibleState<T> {
    complete: bool,
    result: Option<T>,
    error: Option<String>,
    staged: Option<(Option<String>, Option<T>)>,
    on_result: Option<Box<dyn FnOnce(Result<Option<&T>, &str>) + Send>>,
    on_success: Option<Box<dyn FnOnce(Option<&T>) + Send>>,
    on_error: Option<Box<dyn FnOnce(&str) + Send>>,
}

/// A deferred result of type `T` with an error channel.
///
/// # Examples
///
/// ```rust
/// use wirecall::future::TypedFallibleCallFuture;
///
/// let future: TypedFallibleCallFuture<i32> = TypedFallibleCallFuture::pending();
/// future.on_success(|value| assert_eq!(value, Some(&5)));
/// future.complete_ok(5).unwrap();
/// assert_eq!(future.result().unwrap(), Some(5));
/// assert!(!future.is_error());
/// ```
pub struct TypedFallibleCallFuture<T> {
    inner: Arc<Mutex<TypedFallibleState<T>>>,
}

impl<T> TypedFallibleCallFuture<T> {
    /// Creates an incomplete future.
    #[must_use]
    pub fn pending() -> Self {
        Self::from_state(false, None, None)
    }

    /// Creates a future already completed with `value`.
    #[must_use]
    pub fn ok(value: T) -> Self {
        Self::from_state(true, Some(value), None)
    }

    /// Creates a future already completed with an error.
    #[must_use]
    pub fn err(message: impl Into<String>) -> Self {
        Self::from_state(true, None, Some(message.into()))
    }

    fn from_state(complete: bool, result: Option<T>, error: Option<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(TypedFallibleState {
                complete,
                result,
                error,
                staged: None,
                on_result: None,
                on_success: None,
                on_error: None,
            })),
        }
    }

    /// Returns `true` once the future has completed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.inner.lock().complete
    }

    /// Returns `true` when the future completed with an error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        let state = self.inner.lock();
        state.complete && state.error.is_some()
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

    /// The retained error, if any.
    ///
    /// # Errors
    ///
    /// [`FutureError::NotReady`] before completion.
    pub fn error(&self) -> Result<Option<String>, FutureError> {
        let state = self.inner.lock();
        if !state.complete {
            return Err(FutureError::NotReady);
        }
        Ok(state.error.clone())
    }

    /// Installs the always-fires completion callback.
    pub fn on_result<F>(&self, callback: F)
    where
        F: FnOnce(Result<Option<&T>, &str>) + Send + 'static,
    {
        let (result, error) = {
            let mut state = self.inner.lock();
            if !state.complete {
                state.on_result = Some(Box::new(callback));
                return;
            }
            (state.result.take(), state.error.take())
        };
        match &error {
            None => callback(Ok(result.as_ref())),
            Some(message) => callback(Err(message)),
        }
        self.restore(result, error);
    }

    /// Installs the success-only callback.
    pub fn on_success<F>(&self, callback: F)
    where
        F: FnOnce(Option<&T>) + Send + 'static,
    {
        let result = {
            let mut state = self.inner.lock();
            if !state.complete {
                state.on_success = Some(Box::new(callback));
                return;
            }
            if state.error.is_some() {
                return;
            }
            state.result.take()
        };
        callback(result.as_ref());
        self.restore(result, None);
    }

    /// Installs the error-only callback.
    pub fn on_error<F>(&self, callback: F)
    where
        F: FnOnce(&str) + Send + 'static,
    {
        let error = {
            let mut state = self.inner.lock();
            if !state.complete {
                state.on_error = Some(Box::new(callback));
                return;
            }
            match state.error.take() {
                Some(message) => message,
                None => return,
            }
        };
        callback(&error);
        self.restore(None, Some(error));
    }

    /// Completes the future with `value`.
    ///
    /// # Errors
    ///
    /// [`FutureError::AlreadyComplete`] when completed before.
    pub fn complete_ok(&self, value: T) -> Result<(), FutureError> {
        self.commit(Some(value), None, true)
    }

    /// Completes the future with an error.
    ///
    /// # Errors
    ///
    /// [`FutureError::AlreadyComplete`] when completed before.
    pub fn complete_err(&self, message: impl Into<String>) -> Result<(), FutureError> {
        self.commit(None, Some(message.into()), true)
    }

    /// Puts values taken for a callback invocation back into the state.
    fn restore(&self, result: Option<T>, error: Option<String>) {
        let mut state = self.inner.lock();
        if let Some(value) = result {
            state.result = Some(value);
        }
        if let Some(message) = error {
            state.error = Some(message);
        }
    }

    fn commit(
        &self,
        result: Option<T>,
        error: Option<String>,
        external: bool,
    ) -> Result<(), FutureError> {
        let (on_result, on_success, on_error, result, error) = {
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
            state.error = error;
            (
                state.on_result.take(),
                state.on_success.take(),
                state.on_error.take(),
                state.result.take(),
                state.error.take(),
            )
        };
        match &error {
            None => {
                if let Some(callback) = on_result {
                    callback(Ok(result.as_ref()));
                }
                if let Some(callback) = on_success {
                    callback(result.as_ref());
                }
            }
            Some(message) => {
                if let Some(callback) = on_result {
                    callback(Err(message));
                }
                if let Some(callback) = on_error {
                    callback(message);
                }
            }
        }
        self.restore(result, error);
        Ok(())
    }
}

impl<T> Clone for TypedFallibleCallFuture<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> fmt::Debug for TypedFallibleCallFuture<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("TypedFallibleCallFuture")
            .field("complete", &state.complete)
            .field("error", &state.error)
            .finish()
    }
}

impl<T> ReplyEncode for TypedFallibleCallFuture<T>
where
    T: WireEncode + Send + 'static,
{
    /// The optional error string; when absent, the result follows under a
    /// nullable frame.
    fn encode_reply(&self, w: &mut WireWriter) -> Result<(), CodecError> {
        let state = self.inner.lock();
        state.error.encode(w)?;
        if state.error.is_none() {
            match &state.result {
                Some(value) => value.encode_present(w)?,
                None => w.write_u8(0),
            }
        }
        Ok(())
    }
}

impl<T> PendingReply for TypedFallibleCallFuture<T>
where
    T: WireDecode + Send + 'static,
{
    fn decode_payload(&self, r: &mut WireReader<'_>) -> Result<(), CodecError> {
        let error = Option::<String>::decode(r)?;
        let result = if error.is_none() {
            T::decode_present(r)?
        } else {
            None
        };
        self.inner.lock().staged = Some((error, result));
        Ok(())
    }

    fn complete(&self) {
        let staged = self.inner.lock().staged.take();
        let (error, result) = staged.unwrap_or((None, None));
        let _ = self.commit(result, error, false);
    }
}
