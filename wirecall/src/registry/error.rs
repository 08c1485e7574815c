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

//! Registry error types.

use std::fmt;

/// Configuration errors detected while building a [`Registry`].
///
/// All of these are fatal at construction time: a registry that builds
/// successfully is internally consistent for the lifetime of the process.
///
/// [`Registry`]: crate::registry::Registry
#[derive(Debug)]
pub enum RegistryError {
    /// Two interfaces claim the same ordinal.
    DuplicateOrdinal {
        /// The contested ordinal.
        ordinal: u8,
        /// The interface registered first.
        first: &'static str,
        /// The interface that tried to reuse the ordinal.
        second: &'static str,
    },

    /// An interface ordinal is outside the 1..=127 wire range.
    OrdinalOutOfRange {
        /// The offending ordinal.
        ordinal: u8,
        /// The interface carrying it.
        interface: &'static str,
    },

    /// An interface declares more methods than an 8-bit index can address.
    TooManyMethods {
        /// The interface carrying them.
        interface: &'static str,
        /// Number of declared methods.
        count: usize,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateOrdinal {
                ordinal,
                first,
                second,
            } => write!(
                f,
                "duplicate ordinal {}: already used by {}, requested by {}",
                ordinal, first, second
            ),
            Self::OrdinalOutOfRange { ordinal, interface } => write!(
                f,
                "ordinal {} of {} is outside the 1..=127 range",
                ordinal, interface
            ),
            Self::TooManyMethods { interface, count } => write!(
                f,
                "{} declares {} methods, more than a u8 index can address",
                interface, count
            ),
        }
    }
}

impl std::error::Error for RegistryError {}
