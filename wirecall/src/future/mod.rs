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

//! Deferred call results.
//!
//! A call that expects a reply hands the caller one of four future
//! variants, matching the method's declared return shape:
//!
//! | variant | result | error channel |
//! |---|---|---|
//! | [`CallFuture`] | unit | no |
//! | [`TypedCallFuture<T>`] | `T` | no |
//! | [`FallibleCallFuture`] | unit | yes |
//! | [`TypedFallibleCallFuture<T>`] | `T` | yes |
//!
//! These are deliberately not `std::future::Future`s: the endpoint is a
//! single-threaded cooperative machine with no scheduler, so completion is
//! delivered through synchronous callbacks on the thread that feeds
//! [`receive_data`](crate::endpoint::Endpoint::receive_data). All variants
//! share three invariants: completion happens at most once, retained values
//! never change after completion, and a callback installed after completion
//! fires immediately with the retained values.
//!
//! Handlers use the same types from the other side: return a pre-resolved
//! future (`ready`/`ok`/`err`) or a `pending` one. Only the value held at
//! response-serialization time travels back to the caller.

mod error;
mod fallible;
mod reply;
mod typed;
mod unit;

pub use error::FutureError;
pub use fallible::{FallibleCallFuture, TypedFallibleCallFuture};
pub use reply::ReplyEncode;
pub use typed::TypedCallFuture;
pub use unit::CallFuture;

pub(crate) use reply::PendingReply;
