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

//! Handler-side dispatch types.
//!
//! A [`Handler`] is the callee end of one or more interfaces. The
//! `#[interface]` macro generates a binding type implementing this trait
//! from a plain service trait, but the trait is small enough to implement
//! by hand when a service needs the raw [`InboundCall`] — for example to
//! inspect the [`SessionContext`] of the calling peer.

use crate::codec::WireReader;
use crate::endpoint::EndpointError;
use crate::future::ReplyEncode;
use crate::registry::MethodDescriptor;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// The callee side of one or more interfaces.
///
/// `dispatch` decodes the call's arguments from the reader in declaration
/// order, invokes the implementation, and hands back the returned future
/// boxed for reply serialization — or `None` for fire-and-forget methods.
pub trait Handler: Send + Sync {
    /// The interface ordinals this handler serves.
    fn ordinals(&self) -> Vec<u8>;

    /// Dispatches one decoded call frame.
    ///
    /// # Errors
    ///
    /// Argument decode failures bubble up as
    /// [`EndpointError::Codec`]; faults from the handler body as
    /// [`EndpointError::Handler`].
    fn dispatch(
        &self,
        call: &mut InboundCall<'_, '_>,
    ) -> Result<Option<Box<dyn ReplyEncode>>, EndpointError>;
}

/// One inbound call frame, positioned at the start of its argument payload.
pub struct InboundCall<'a, 'r> {
    ordinal: u8,
    method: &'a MethodDescriptor,
    call_id: Option<u8>,
    session: &'a SessionContext,
    args: &'a mut WireReader<'r>,
}

impl<'a, 'r> InboundCall<'a, 'r> {
    pub(crate) fn new(
        ordinal: u8,
        method: &'a MethodDescriptor,
        call_id: Option<u8>,
        session: &'a SessionContext,
        args: &'a mut WireReader<'r>,
    ) -> Self {
        Self {
            ordinal,
            method,
            call_id,
            session,
            args,
        }
    }

    /// The called interface ordinal.
    #[must_use]
    pub fn ordinal(&self) -> u8 {
        self.ordinal
    }

    /// The called method's wire index.
    #[must_use]
    pub fn method_index(&self) -> u8 {
        self.method.index()
    }

    /// The called method's descriptor.
    #[must_use]
    pub fn method(&self) -> &MethodDescriptor {
        self.method
    }

    /// The call-id awaiting the reply, when the method returns one.
    #[must_use]
    pub fn call_id(&self) -> Option<u8> {
        self.call_id
    }

    /// The session of the calling peer.
    #[must_use]
    pub fn session(&self) -> &SessionContext {
        self.session
    }

    /// The argument payload reader, positioned at the next argument.
    pub fn args(&mut self) -> &mut WireReader<'r> {
        self.args
    }
}

impl fmt::Debug for InboundCall<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InboundCall")
            .field("ordinal", &self.ordinal)
            .field("method", &self.method.name())
            .field("call_id", &self.call_id)
            .finish()
    }
}

/// Opaque per-peer context threaded through dispatch.
///
/// The hosting application decides what a "session" is — a connection
/// record, an authentication principal, nothing at all. The endpoint only
/// carries the context from [`receive_data`] to the handler, which may
/// downcast it back to the concrete type it stored.
///
/// [`receive_data`]: crate::endpoint::Endpoint::receive_data
///
/// # Examples
///
/// ```rust
/// use wirecall::endpoint::SessionContext;
///
/// struct Peer {
///     name: &'static str,
/// }
///
/// let session = SessionContext::new(Peer { name: "alice" });
/// assert_eq!(session.get::<Peer>().unwrap().name, "alice");
/// assert!(session.get::<u32>().is_none());
/// ```
#[derive(Clone, Default)]
pub struct SessionContext {
    payload: Option<Arc<dyn Any + Send + Sync>>,
}

impl SessionContext {
    /// Wraps an arbitrary payload.
    #[must_use]
    pub fn new(payload: impl Any + Send + Sync) -> Self {
        Self {
            payload: Some(Arc::new(payload)),
        }
    }

    /// A context carrying nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self { payload: None }
    }

    /// Downcasts the payload back to its concrete type.
    #[must_use]
    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.payload.as_deref()?.downcast_ref()
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("present", &self.payload.is_some())
            .finish()
    }
}

/// Snapshot handed to the before/after call observer hooks.
#[derive(Debug, Clone)]
pub struct HandlerCallContext {
    /// The called interface ordinal.
    pub ordinal: u8,
    /// The called method's wire index.
    pub method_index: u8,
    /// The called method's declared name.
    pub method_name: &'static str,
    /// The call-id awaiting a reply, when the method returns one.
    pub call_id: Option<u8>,
    /// Whether a response frame was emitted. Always `false` in the
    /// before-call hook.
    pub replied: bool,
}
