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

//! The bidirectional RPC endpoint.
//!
//! An [`Endpoint`] is one peer of a message stream: it encodes outbound
//! calls, correlates inbound responses with pending futures by 7-bit
//! call-id, and dispatches inbound calls to registered handlers. It is a
//! cheap cloneable handle; every clone drives the same tables, so response
//! callbacks and handlers may issue further calls re-entrantly.
//!
//! The endpoint is transport-agnostic and never blocks: outbound frames
//! leave through the installed data-out sink, inbound frames arrive one at
//! a time through [`Endpoint::receive_data`]. Framing the byte stream into
//! whole messages is the transport's job (see [`crate::transport`]).
//!
//! # Frame layout
//!
//! The first byte of every message is the header byte:
//!
//! - bit 7 clear — a call frame; bits 6..0 carry the interface ordinal.
//!   Then the method index, the call-id when the method returns, and the
//!   argument payload.
//! - bit 7 set — a response frame; bits 6..0 carry the call-id, followed by
//!   the return payload.
//!
//! # Threading
//!
//! The endpoint assumes single-threaded cooperative use: all of
//! `begin_call`/`push_arg`/`finish_*`/`receive_data` for one endpoint are
//! invoked from one thread at a time. Internal locks only guard table
//! mutation and are never held across handlers, hooks, future callbacks or
//! the data-out sink. The sink itself must not synchronously re-enter the
//! endpoint it serves.

use crate::codec::{WireReader, WireWriter};
use crate::endpoint::call::ActiveCall;
use crate::endpoint::handler::{Handler, HandlerCallContext, InboundCall, SessionContext};
use crate::endpoint::proxy::ProxyStub;
use crate::endpoint::EndpointError;
use crate::future::PendingReply;
use crate::registry::Registry;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Header-byte flag marking a response frame.
const RESPONSE_FLAG: u8 = 0x80;
/// Mask extracting the ordinal or call-id from the header byte.
const HEADER_MASK: u8 = 0x7F;

type DataOutFn = Box<dyn FnMut(&[u8]) + Send>;
type HookFn = Box<dyn FnMut(&HandlerCallContext) + Send>;

/// A pending-table entry: reserved while the call frame is still being
/// assembled, waiting once it is on the wire.
pub(crate) enum PendingSlot {
    Reserved,
    Waiting(Arc<dyn PendingReply>),
}

struct EndpointState {
    /// Last issued call-id; the allocator increments before checking.
    call_counter: u8,
    pending: HashMap<u8, PendingSlot>,
    handlers: HashMap<u8, Arc<dyn Handler>>,
}

struct EndpointInner {
    registry: Arc<Registry>,
    state: Mutex<EndpointState>,
    data_out: Mutex<Option<DataOutFn>>,
    before_call: Mutex<Option<HookFn>>,
    after_call: Mutex<Option<HookFn>>,
}

/// One peer of a bidirectional RPC message stream.
///
/// # Examples
///
/// Driving an endpoint by hand, without a transport:
///
/// ```rust
/// use std::sync::{Arc, Mutex};
/// use wirecall::endpoint::Endpoint;
/// use wirecall::registry::{
///     InterfaceDescriptor, MethodDescriptor, ParamDescriptor, Registry, ReturnShape,
/// };
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let registry = || {
///     Registry::builder()
///         .register(InterfaceDescriptor::new(
///             1,
///             "Echo",
///             vec![MethodDescriptor::new(
///                 "say",
///                 vec![ParamDescriptor::new("text", false)],
///                 ReturnShape::None,
///             )],
///         ))
///         .unwrap()
///         .build()
/// };
///
/// let caller = Endpoint::new(registry());
/// let frames = Arc::new(Mutex::new(Vec::new()));
/// let sink = frames.clone();
/// caller.set_data_out(move |bytes| sink.lock().unwrap().push(bytes.to_vec()));
///
/// let mut call = caller.begin_call(1, 0)?;
/// call.push_arg("hello")?;
/// call.finish()?;
///
/// assert_eq!(frames.lock().unwrap().len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct Endpoint {
    inner: Arc<EndpointInner>,
}

impl Endpoint {
    /// Creates an endpoint dispatching against `registry`.
    ///
    /// Pass an `Arc<Registry>` to share one catalogue between several
    /// endpoints.
    pub fn new(registry: impl Into<Arc<Registry>>) -> Self {
        Self {
            inner: Arc::new(EndpointInner {
                registry: registry.into(),
                state: Mutex::new(EndpointState {
                    call_counter: 0,
                    pending: HashMap::new(),
                    handlers: HashMap::new(),
                }),
                data_out: Mutex::new(None),
                before_call: Mutex::new(None),
                after_call: Mutex::new(None),
            }),
        }
    }

    /// The interface catalogue this endpoint dispatches against.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    /// Installs the outbound byte sink.
    ///
    /// The sink is invoked exactly once per emitted message with the whole
    /// frame; it must finish reading synchronously or copy the bytes, and
    /// it must not synchronously call back into this endpoint.
    pub fn set_data_out<F>(&self, sink: F)
    where
        F: FnMut(&[u8]) + Send + 'static,
    {
        *self.inner.data_out.lock() = Some(Box::new(sink));
    }

    /// Installs the hook fired before every handler invocation.
    pub fn set_before_call_hook<F>(&self, hook: F)
    where
        F: FnMut(&HandlerCallContext) + Send + 'static,
    {
        *self.inner.before_call.lock() = Some(Box::new(hook));
    }

    /// Installs the hook fired after every handler invocation.
    pub fn set_after_call_hook<F>(&self, hook: F)
    where
        F: FnMut(&HandlerCallContext) + Send + 'static,
    {
        *self.inner.after_call.lock() = Some(Box::new(hook));
    }

    /// Binds a proxy stub to this endpoint.
    #[must_use]
    pub fn proxy<P: ProxyStub>(&self) -> P {
        P::bind(self.clone())
    }

    /// Binds `handler` to every interface ordinal it serves.
    ///
    /// Registration is all-or-nothing: when any ordinal is unknown to the
    /// registry or already bound, nothing is bound.
    ///
    /// # Errors
    ///
    /// [`EndpointError::HandlerAlreadyBound`] when an ordinal is taken;
    /// [`EndpointError::Protocol`] when an ordinal is not in the registry.
    pub fn register_handler(&self, handler: Arc<dyn Handler>) -> Result<(), EndpointError> {
        let ordinals = handler.ordinals();
        let mut state = self.inner.state.lock();
        for &ordinal in &ordinals {
            if self.inner.registry.interface_by_ordinal(ordinal).is_none() {
                return Err(EndpointError::protocol(format!(
                    "interface ordinal {} is not in the registry",
                    ordinal
                )));
            }
            if state.handlers.contains_key(&ordinal) {
                return Err(EndpointError::HandlerAlreadyBound { ordinal });
            }
        }
        for &ordinal in &ordinals {
            state.handlers.insert(ordinal, handler.clone());
            debug!(ordinal, "handler registered");
        }
        Ok(())
    }

    /// Unbinds `handler` from every ordinal it is currently bound to.
    ///
    /// Ordinals bound to a different handler are left alone.
    pub fn remove_handler(&self, handler: &Arc<dyn Handler>) {
        let mut state = self.inner.state.lock();
        for ordinal in handler.ordinals() {
            if let Some(bound) = state.handlers.get(&ordinal) {
                // Compare allocations, not vtables: the same handler may
                // have been unsized at a different coercion site.
                if std::ptr::eq(
                    Arc::as_ptr(bound).cast::<()>(),
                    Arc::as_ptr(handler).cast::<()>(),
                ) {
                    state.handlers.remove(&ordinal);
                    debug!(ordinal, "handler removed");
                }
            }
        }
    }

    /// Starts assembling a call frame for `method_index` on the interface
    /// with `ordinal`.
    ///
    /// Writes the header byte and method index immediately; when the method
    /// returns, also allocates the call-id and reserves its slot in the
    /// pending table. The frame reaches the wire when the matching
    /// `finish_*` runs; dropping the [`ActiveCall`] instead releases the
    /// reservation.
    ///
    /// # Errors
    ///
    /// [`EndpointError::Protocol`] when the method is not in the registry;
    /// [`EndpointError::CallIdExhausted`] when the allocator lands on an
    /// outstanding id.
    pub fn begin_call(
        &self,
        ordinal: u8,
        method_index: u8,
    ) -> Result<ActiveCall<'_>, EndpointError> {
        let shape = self
            .inner
            .registry
            .method(ordinal, method_index)
            .ok_or_else(|| EndpointError::unknown_method(ordinal, method_index))?
            .return_shape();

        let mut writer = WireWriter::with_capacity(16);
        writer.write_u8(ordinal);
        writer.write_u8(method_index);
        let call_id = if shape.expects_reply() {
            let id = self.allocate_call_id()?;
            writer.write_u8(id);
            Some(id)
        } else {
            None
        };
        trace!(ordinal, method_index, ?call_id, "assembling call frame");
        Ok(ActiveCall::new(
            self,
            writer,
            ordinal,
            method_index,
            shape,
            call_id,
        ))
    }

    /// Consumes exactly one framed message.
    ///
    /// A call frame is dispatched to its handler (emitting a response frame
    /// when the handler returns a future); a response frame completes the
    /// pending future it is addressed to, firing its callbacks on this
    /// thread before returning.
    ///
    /// # Errors
    ///
    /// See [`EndpointError`]. A fault leaves the pending table exactly as
    /// it was before the message arrived.
    pub fn receive_data(
        &self,
        frame: &[u8],
        session: &SessionContext,
    ) -> Result<(), EndpointError> {
        let mut reader = WireReader::new(frame);
        let header = reader.read_u8()?;
        if header & RESPONSE_FLAG == 0 {
            self.dispatch_call(header, &mut reader, session)
        } else {
            self.dispatch_response(header & HEADER_MASK, &mut reader)
        }
    }

    /// Number of calls awaiting a response.
    #[must_use]
    pub fn pending_calls(&self) -> usize {
        self.inner.state.lock().pending.len()
    }

    fn dispatch_call(
        &self,
        ordinal: u8,
        reader: &mut WireReader<'_>,
        session: &SessionContext,
    ) -> Result<(), EndpointError> {
        if ordinal == 0 {
            return Err(EndpointError::protocol("interface ordinal 0 is reserved"));
        }
        let method_index = reader.read_u8()?;

        let handler = {
            let state = self.inner.state.lock();
            match state.handlers.get(&ordinal) {
                Some(handler) => handler.clone(),
                None => {
                    warn!(ordinal, "call frame for unhandled interface");
                    return Err(EndpointError::UnknownHandler { ordinal });
                }
            }
        };
        let method = self
            .inner
            .registry
            .method(ordinal, method_index)
            .ok_or_else(|| EndpointError::unknown_method(ordinal, method_index))?;

        let call_id = if method.return_shape().expects_reply() {
            let id = reader.read_u8()?;
            if id == 0 {
                return Err(EndpointError::protocol(
                    "call frame carries reserved call-id 0",
                ));
            }
            Some(id)
        } else {
            None
        };
        trace!(
            ordinal,
            method_index,
            ?call_id,
            method = method.name(),
            "dispatching call frame"
        );

        let mut context = HandlerCallContext {
            ordinal,
            method_index,
            method_name: method.name(),
            call_id,
            replied: false,
        };
        self.fire_hook(&self.inner.before_call, &context);

        let outcome = {
            let mut inbound = InboundCall::new(ordinal, method, call_id, session, reader);
            handler.dispatch(&mut inbound)?
        };

        if let Some(reply) = outcome {
            let Some(call_id) = call_id else {
                return Err(EndpointError::protocol(format!(
                    "method {} returned a reply but declares no return shape",
                    method.name()
                )));
            };
            let mut writer = WireWriter::with_capacity(16);
            writer.write_u8(RESPONSE_FLAG | call_id);
            reply.encode_reply(&mut writer)?;
            self.emit_frame(writer.as_slice())?;
            context.replied = true;
        }
        self.fire_hook(&self.inner.after_call, &context);
        Ok(())
    }

    fn dispatch_response(
        &self,
        call_id: u8,
        reader: &mut WireReader<'_>,
    ) -> Result<(), EndpointError> {
        if call_id == 0 {
            return Err(EndpointError::protocol(
                "response frame carries reserved call-id 0",
            ));
        }
        let future = {
            let state = self.inner.state.lock();
            match state.pending.get(&call_id) {
                Some(PendingSlot::Waiting(future)) => future.clone(),
                Some(PendingSlot::Reserved) => {
                    return Err(EndpointError::protocol(format!(
                        "response for call-id {} before its call was sent",
                        call_id
                    )));
                }
                None => {
                    warn!(call_id, "response for unknown call-id");
                    return Err(EndpointError::protocol(format!(
                        "response for unknown call-id {}",
                        call_id
                    )));
                }
            }
        };

        // Stage the payload first: a decode fault must leave the pending
        // table and the future untouched.
        future.decode_payload(reader)?;
        self.inner.state.lock().pending.remove(&call_id);
        trace!(call_id, "completing pending call");
        // The entry is gone before callbacks fire, so a callback may issue
        // further calls.
        future.complete();
        Ok(())
    }

    fn allocate_call_id(&self) -> Result<u8, EndpointError> {
        let mut state = self.inner.state.lock();
        let mut candidate = state.call_counter.wrapping_add(1);
        if candidate >= 128 {
            candidate = 1;
        }
        if state.pending.contains_key(&candidate) {
            return Err(EndpointError::CallIdExhausted { call_id: candidate });
        }
        state.call_counter = candidate;
        state.pending.insert(candidate, PendingSlot::Reserved);
        Ok(candidate)
    }

    pub(crate) fn fill_reservation(&self, call_id: u8, slot: PendingSlot) {
        self.inner.state.lock().pending.insert(call_id, slot);
    }

    pub(crate) fn release_reservation(&self, call_id: u8) {
        let mut state = self.inner.state.lock();
        if matches!(state.pending.get(&call_id), Some(PendingSlot::Reserved)) {
            state.pending.remove(&call_id);
        }
    }

    pub(crate) fn abort_pending(&self, call_id: u8) {
        self.inner.state.lock().pending.remove(&call_id);
    }

    pub(crate) fn emit_frame(&self, bytes: &[u8]) -> Result<(), EndpointError> {
        let sink = self.inner.data_out.lock().take();
        match sink {
            Some(mut sink) => {
                trace!(len = bytes.len(), "emitting frame");
                sink(bytes);
                let mut slot = self.inner.data_out.lock();
                if slot.is_none() {
                    *slot = Some(sink);
                }
                Ok(())
            }
            None => Err(EndpointError::protocol("no data-out sink installed")),
        }
    }

    fn fire_hook(&self, slot: &Mutex<Option<HookFn>>, context: &HandlerCallContext) {
        let hook = slot.lock().take();
        if let Some(mut hook) = hook {
            hook(context);
            let mut guard = slot.lock();
            if guard.is_none() {
                *guard = Some(hook);
            }
        }
    }
}

impl Clone for Endpoint {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("Endpoint")
            .field("interfaces", &self.inner.registry.len())
            .field("handlers", &state.handlers.len())
            .field("pending_calls", &state.pending.len())
            .finish()
    }
}
