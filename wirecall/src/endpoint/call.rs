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

//! Outbound call assembly.
//!
//! [`ActiveCall`] accumulates one call frame: header byte, method index,
//! call-id (when the method returns), then arguments in declaration order.
//! Nothing reaches the wire until a finisher runs, so the frames of calls
//! issued in order appear in order, each in exactly one data-out
//! invocation. Dropping an unfinished call releases its reserved call-id.

use crate::codec::{WireEncode, WireWriter};
use crate::endpoint::endpoint::PendingSlot;
use crate::endpoint::{Endpoint, EndpointError};
use crate::future::{
    CallFuture, FallibleCallFuture, PendingReply, TypedCallFuture, TypedFallibleCallFuture,
};
use crate::registry::ReturnShape;
use std::mem;
use std::sync::Arc;

/// An outbound call being assembled.
///
/// Produced by [`Endpoint::begin_call`]; consumed by the `finish_*` method
/// matching the called method's return shape.
#[derive(Debug)]
pub struct ActiveCall<'a> {
    endpoint: &'a Endpoint,
    writer: WireWriter,
    ordinal: u8,
    method_index: u8,
    shape: ReturnShape,
    call_id: Option<u8>,
    next_param: usize,
    sent: bool,
}

impl<'a> ActiveCall<'a> {
    pub(crate) fn new(
        endpoint: &'a Endpoint,
        writer: WireWriter,
        ordinal: u8,
        method_index: u8,
        shape: ReturnShape,
        call_id: Option<u8>,
    ) -> Self {
        Self {
            endpoint,
            writer,
            ordinal,
            method_index,
            shape,
            call_id,
            next_param: 0,
            sent: false,
        }
    }

    /// The call-id reserved for this call, when the method returns.
    #[must_use]
    pub fn call_id(&self) -> Option<u8> {
        self.call_id
    }

    /// Serializes the next argument in declaration order.
    ///
    /// The parameter's descriptor decides the framing: a nullable parameter
    /// is written under a presence tag. Option-typed values carry their own
    /// tag either way and are never double-tagged.
    ///
    /// # Errors
    ///
    /// [`EndpointError::Codec`] when more arguments are pushed than the
    /// method declares, or when the value cannot be encoded.
    pub fn push_arg<T: WireEncode + ?Sized>(&mut self, value: &T) -> Result<(), EndpointError> {
        let nullable = {
            let registry = self.endpoint.registry();
            let method = registry
                .method(self.ordinal, self.method_index)
                .ok_or_else(|| EndpointError::unknown_method(self.ordinal, self.method_index))?;
            match method.params().get(self.next_param) {
                Some(param) => param.nullable(),
                None => {
                    return Err(EndpointError::Codec(crate::codec::CodecError::schema(
                        format!(
                            "method {} takes {} argument(s)",
                            method.name(),
                            method.params().len()
                        ),
                    )));
                }
            }
        };
        if nullable {
            value.encode_present(&mut self.writer)?;
        } else {
            value.encode(&mut self.writer)?;
        }
        self.next_param += 1;
        Ok(())
    }

    /// Finishes a fire-and-forget call, emitting the frame.
    ///
    /// # Errors
    ///
    /// [`EndpointError::ShapeMismatch`] unless the method's return shape is
    /// [`ReturnShape::None`].
    pub fn finish(self) -> Result<(), EndpointError> {
        self.check_shape(ReturnShape::None)?;
        self.emit(None)
    }

    /// Finishes a call returning a unit future, emitting the frame.
    ///
    /// # Errors
    ///
    /// [`EndpointError::ShapeMismatch`] unless the method declares
    /// [`ReturnShape::Unit`].
    pub fn finish_unit(self) -> Result<CallFuture, EndpointError> {
        self.check_shape(ReturnShape::Unit)?;
        let future = CallFuture::pending();
        self.emit(Some(Arc::new(future.clone())))?;
        Ok(future)
    }

    /// Finishes a call returning a typed future, emitting the frame.
    ///
    /// # Errors
    ///
    /// [`EndpointError::ShapeMismatch`] unless the method declares
    /// [`ReturnShape::Typed`].
    pub fn finish_typed<T>(self) -> Result<TypedCallFuture<T>, EndpointError>
    where
        T: crate::codec::WireDecode + Send + 'static,
    {
        self.check_shape(ReturnShape::Typed)?;
        let future = TypedCallFuture::pending();
        self.emit(Some(Arc::new(future.clone())))?;
        Ok(future)
    }

    /// Finishes a call returning a fallible unit future, emitting the frame.
    ///
    /// # Errors
    ///
    /// [`EndpointError::ShapeMismatch`] unless the method declares
    /// [`ReturnShape::FallibleUnit`].
    pub fn finish_fallible(self) -> Result<FallibleCallFuture, EndpointError> {
        self.check_shape(ReturnShape::FallibleUnit)?;
        let future = FallibleCallFuture::pending();
        self.emit(Some(Arc::new(future.clone())))?;
        Ok(future)
    }

    /// Finishes a call returning a fallible typed future, emitting the
    /// frame.
    ///
    /// # Errors
    ///
    /// [`EndpointError::ShapeMismatch`] unless the method declares
    /// [`ReturnShape::FallibleTyped`].
    pub fn finish_fallible_typed<T>(self) -> Result<TypedFallibleCallFuture<T>, EndpointError>
    where
        T: crate::codec::WireDecode + Send + 'static,
    {
        self.check_shape(ReturnShape::FallibleTyped)?;
        let future = TypedFallibleCallFuture::pending();
        self.emit(Some(Arc::new(future.clone())))?;
        Ok(future)
    }

    fn check_shape(&self, requested: ReturnShape) -> Result<(), EndpointError> {
        if self.shape == requested {
            Ok(())
        } else {
            Err(EndpointError::ShapeMismatch {
                expected: self.shape,
                requested,
            })
        }
    }

    fn emit(mut self, pending: Option<Arc<dyn PendingReply>>) -> Result<(), EndpointError> {
        {
            let registry = self.endpoint.registry();
            let method = registry
                .method(self.ordinal, self.method_index)
                .ok_or_else(|| EndpointError::unknown_method(self.ordinal, self.method_index))?;
            if self.next_param != method.params().len() {
                return Err(EndpointError::Codec(crate::codec::CodecError::schema(
                    format!(
                        "method {} takes {} argument(s), {} pushed",
                        method.name(),
                        method.params().len(),
                        self.next_param
                    ),
                )));
            }
        }

        let bytes = mem::take(&mut self.writer).into_bytes();
        if let (Some(call_id), Some(pending)) = (self.call_id, pending) {
            self.endpoint
                .fill_reservation(call_id, PendingSlot::Waiting(pending));
        }
        self.sent = true;
        match self.endpoint.emit_frame(&bytes) {
            Ok(()) => Ok(()),
            Err(err) => {
                if let Some(call_id) = self.call_id {
                    self.endpoint.abort_pending(call_id);
                }
                Err(err)
            }
        }
    }
}

impl Drop for ActiveCall<'_> {
    fn drop(&mut self) {
        if !self.sent {
            if let Some(call_id) = self.call_id {
                self.endpoint.release_reservation(call_id);
            }
        }
    }
}
