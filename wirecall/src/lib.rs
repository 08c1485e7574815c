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

#![doc = include_str!("../../README.md")]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

//! # Wirecall — interface-oriented bidirectional RPC
//!
//! Wirecall lets both peers of one message stream call each other through
//! declared service interfaces. An interface is a trait with a stable
//! 7-bit ordinal; one peer registers a handler implementing it, the other
//! binds a proxy stub and calls. A call becomes a single byte-framed
//! message; replies are correlated back to the caller's future by a 7-bit
//! call-id.
//!
//! ## Architecture
//!
//! - **[`codec`]**: the compact, schema-driven wire format for arguments,
//!   results and user value types.
//! - **[`registry`]**: the interface catalogue — ordinals, method indices,
//!   parameter schemas.
//! - **[`future`]**: deferred results with synchronous-fire callbacks, in
//!   four variants matching the declared return shapes.
//! - **[`endpoint`]**: the message codec/dispatcher — outbound call
//!   assembly, call-id allocation, the pending-future table, inbound
//!   dispatch.
//! - **[`transport`]**: length framing and the pump connecting an endpoint
//!   to an async byte stream.
//!
//! The `#[interface]` attribute (from `wirecall-macros`, re-exported here
//! behind the default-on `derive` feature) turns a trait declaration into
//! the client stub, the handler binding and the interface descriptor;
//! `#[derive(Wire)]` gives user value types their field-ordered codec.
//!
//! ## Contracts worth knowing
//!
//! - The endpoint is single-threaded cooperative: drive one endpoint from
//!   one thread at a time. Nothing suspends and nothing blocks.
//! - Response callbacks fire synchronously on the thread feeding
//!   [`Endpoint::receive_data`], after the pending entry is removed — so a
//!   callback may immediately issue further calls.
//! - Every fault surfaces at the operation that triggered it; the endpoint
//!   never retries and never disconnects on its own.
//!
//! ## Safety
//!
//! Wirecall is written in 100% safe Rust with `#![deny(unsafe_code)]`.

pub mod codec;
pub mod endpoint;
pub mod future;
pub mod registry;
pub mod transport;

// Re-export the procedural macros when the derive feature is enabled.
#[cfg(feature = "derive")]
pub use wirecall_macros::{interface, Wire};

pub use codec::{CodecError, WireDecode, WireEncode, WireReader, WireWriter};
pub use endpoint::{
    ActiveCall, Endpoint, EndpointError, Handler, HandlerCallContext, HandlerFault, InboundCall,
    ProxyStub, SessionContext,
};
pub use future::{
    CallFuture, FallibleCallFuture, FutureError, ReplyEncode, TypedCallFuture,
    TypedFallibleCallFuture,
};
pub use registry::{
    InterfaceDescriptor, MethodDescriptor, ParamDescriptor, Registry, RegistryError, ReturnShape,
};
pub use transport::{EndpointLink, MemoryTransport, TransportError};
