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

//! The binary wire codec.
//!
//! Values are serialized against a static schema shared by both peers; the
//! stream carries no type information of its own. The layer splits into:
//!
//! - [`WireWriter`] / [`WireReader`]: primitive little-endian byte access
//!   with varint string framing.
//! - [`WireEncode`] / [`WireDecode`]: the typed layer, implemented for
//!   primitives, `String`, `char`, `Option`, `Vec` and the scalar value
//!   types, and derivable for user types with `#[derive(Wire)]` (field
//!   declaration order is the wire order).
//! - [`Decimal`], [`Timestamp`], [`TickDuration`]: scalars whose wire
//!   layout is fixed here rather than borrowed from any platform.
//!
//! A user type may bypass the derive entirely by hand-implementing the trait
//! pair; the only obligation is that writing then reading round-trips to an
//! equal value.

mod error;
mod reader;
mod types;
mod wire;
mod writer;

pub use error::CodecError;
pub use reader::WireReader;
pub use types::{Decimal, TickDuration, Timestamp};
pub use wire::{MAX_SEQUENCE_LEN, WireDecode, WireEncode};
pub use writer::WireWriter;
