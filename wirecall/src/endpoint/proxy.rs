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

//! Proxy stub binding.
//!
//! A proxy stub is the caller-shaped face of an interface: one generated
//! method per declared method, each marshalling its arguments into a call
//! frame on the endpoint it is bound to. Stubs are plain values holding an
//! endpoint handle, so binding is cheap and a stub can be freely cloned or
//! re-created instead of cached.

use crate::endpoint::Endpoint;
use crate::registry::InterfaceDescriptor;

/// An interface-shaped caller that can be bound to an endpoint.
///
/// Implemented by the `{Trait}Client` types the `#[interface]` macro
/// generates; obtain an instance with [`Endpoint::proxy`].
pub trait ProxyStub: Sized {
    /// The interface descriptor this stub speaks, for registry
    /// construction.
    fn descriptor() -> InterfaceDescriptor;

    /// Binds a stub to an endpoint.
    fn bind(endpoint: Endpoint) -> Self;
}
