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

//! Framed transport adapters.
//!
//! The endpoint consumes and produces whole message buffers; this module
//! supplies the canonical length framing around them and the pump that
//! drives an endpoint from an async byte stream. Any ordered, reliable
//! stream works — a `tokio` TCP stream is the usual choice, a
//! [`MemoryTransport`] pair serves tests.
//!
//! - [`framing`] — the 3-byte big-endian length prefix with its
//!   close-connection flag.
//! - [`MemoryTransport`] — an in-memory connected pair.
//! - [`EndpointLink`] — the endpoint↔stream pump.

pub mod framing;

mod error;
mod link;
mod memory;

pub use error::TransportError;
pub use link::EndpointLink;
pub use memory::MemoryTransport;
