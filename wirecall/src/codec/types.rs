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

//! Scalar value types with fixed wire layouts.
//!
//! These cover the wire format's non-Rust-native scalars: the 128-bit
//! decimal, the timestamp, and the 100 ns tick duration. [`Timestamp`]
//! deliberately breaks with the originating platform's internal binary date
//! encoding: it is frozen as **nanoseconds since the Unix epoch, UTC**, and
//! peers on other stacks must convert at the boundary.

use crate::codec::{CodecError, WireDecode, WireEncode, WireReader, WireWriter};
use std::time::Duration;

/// An opaque 128-bit decimal, stored as four little-endian 32-bit limbs with
/// sign and scale in the high limb.
///
/// The framework does not interpret the limbs; it only moves them across the
/// wire intact. Applications that need decimal arithmetic convert at the
/// edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Decimal {
    limbs: [u32; 4],
}

impl Decimal {
    /// Builds a decimal from raw limbs, low limb first.
    #[must_use]
    pub const fn from_limbs(limbs: [u32; 4]) -> Self {
        Self { limbs }
    }

    /// The raw limbs, low limb first.
    #[must_use]
    pub const fn limbs(&self) -> [u32; 4] {
        self.limbs
    }
}

impl WireEncode for Decimal {
    fn encode(&self, w: &mut WireWriter) -> Result<(), CodecError> {
        for limb in self.limbs {
            w.write_u32(limb);
        }
        Ok(())
    }
}

impl WireDecode for Decimal {
    fn decode(r: &mut WireReader<'_>) -> Result<Self, CodecError> {
        let mut limbs = [0u32; 4];
        for limb in &mut limbs {
            *limb = r.read_u32()?;
        }
        Ok(Self { limbs })
    }
}

/// A point in time: nanoseconds since the Unix epoch, UTC.
///
/// Encoded as a signed little-endian 64-bit integer. This convention is
/// frozen; it intentionally differs from the platform-internal date binary
/// the wire format descends from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(i64);

impl Timestamp {
    /// The Unix epoch itself.
    pub const UNIX_EPOCH: Timestamp = Timestamp(0);

    /// Builds a timestamp from nanoseconds since the Unix epoch.
    #[must_use]
    pub const fn from_unix_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    /// Nanoseconds since the Unix epoch.
    #[must_use]
    pub const fn as_unix_nanos(&self) -> i64 {
        self.0
    }
}

impl WireEncode for Timestamp {
    fn encode(&self, w: &mut WireWriter) -> Result<(), CodecError> {
        w.write_i64(self.0);
        Ok(())
    }
}

impl WireDecode for Timestamp {
    fn decode(r: &mut WireReader<'_>) -> Result<Self, CodecError> {
        Ok(Self(r.read_i64()?))
    }
}

/// A signed span of time in 100-nanosecond ticks.
///
/// Encoded as a signed little-endian 64-bit tick count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TickDuration(i64);

/// Ticks per second (one tick is 100 ns).
const TICKS_PER_SECOND: i64 = 10_000_000;

impl TickDuration {
    /// Builds a duration from a raw tick count.
    #[must_use]
    pub const fn from_ticks(ticks: i64) -> Self {
        Self(ticks)
    }

    /// The raw tick count.
    #[must_use]
    pub const fn ticks(&self) -> i64 {
        self.0
    }

    /// Converts a non-negative [`std::time::Duration`], saturating at
    /// `i64::MAX` ticks.
    #[must_use]
    pub fn from_std(duration: Duration) -> Self {
        let ticks = duration.as_nanos() / 100;
        Self(i64::try_from(ticks).unwrap_or(i64::MAX))
    }

    /// Converts to a [`std::time::Duration`]; `None` when negative.
    #[must_use]
    pub fn to_std(&self) -> Option<Duration> {
        let ticks = u64::try_from(self.0).ok()?;
        let secs = ticks / TICKS_PER_SECOND as u64;
        let nanos = (ticks % TICKS_PER_SECOND as u64) * 100;
        Some(Duration::new(secs, nanos as u32))
    }
}

impl WireEncode for TickDuration {
    fn encode(&self, w: &mut WireWriter) -> Result<(), CodecError> {
        w.write_i64(self.0);
        Ok(())
    }
}

impl WireDecode for TickDuration {
    fn decode(r: &mut WireReader<'_>) -> Result<Self, CodecError> {
        Ok(Self(r.read_i64()?))
    }
}
