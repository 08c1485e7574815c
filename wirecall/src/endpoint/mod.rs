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

//! The RPC endpoint: call encoding, call-id correlation and handler
//! dispatch.
//!
//! - [`Endpoint`] — one peer of a bidirectional message stream.
//! - [`ActiveCall`] — an outbound call frame under assembly.
//! - [`Handler`] / [`InboundCall`] — the callee side of dispatch.
//! - [`ProxyStub`] — the generated caller side of an interface.
//! - [`SessionContext`] — opaque per-peer context threaded through
//!   dispatch.
//! - [`HandlerCallContext`] — snapshot handed to the observer hooks.

#[allow(clippy::module_inception)]
mod endpoint;

mod call;
mod error;
mod handler;
mod proxy;

pub use call::ActiveCall;
pub use endpoint::Endpoint;
pub use error::{EndpointError, HandlerFault};
pub use handler::{Handler, HandlerCallContext, InboundCall, SessionContext};
pub use proxy::ProxyStub;
