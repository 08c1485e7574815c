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

//! The interface catalogue an endpoint dispatches against.
//!
//! A [`Registry`] is an explicit value owned by (or shared between)
//! endpoints — deliberately not a process-wide table. Ordinal conflicts are
//! configuration errors and fail at build time, so a successfully built
//! registry can be trusted for the lifetime of the process.

use crate::registry::{InterfaceDescriptor, MethodDescriptor, RegistryError};
use std::collections::HashMap;

/// An immutable catalogue of interfaces keyed by 7-bit ordinal.
///
/// # Examples
///
/// ```rust
/// use wirecall::registry::{
///     InterfaceDescriptor, MethodDescriptor, ParamDescriptor, Registry, ReturnShape,
/// };
///
/// # fn main() -> Result<(), wirecall::registry::RegistryError> {
/// let registry = Registry::builder()
///     .register(InterfaceDescriptor::new(
///         1,
///         "Echo",
///         vec![MethodDescriptor::new(
///             "say",
///             vec![ParamDescriptor::new("text", false)],
///             ReturnShape::Typed,
///         )],
///     ))?
///     .build();
///
/// assert_eq!(registry.interface_by_ordinal(1).unwrap().name(), "Echo");
/// assert!(registry.interface_by_ordinal(2).is_none());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct Registry {
    interfaces: HashMap<u8, InterfaceDescriptor>,
}

impl Registry {
    /// Starts building a registry.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder {
            interfaces: HashMap::new(),
        }
    }

    /// Looks up an interface by ordinal.
    #[must_use]
    pub fn interface_by_ordinal(&self, ordinal: u8) -> Option<&InterfaceDescriptor> {
        self.interfaces.get(&ordinal)
    }

    /// Looks up a method by interface ordinal and wire index.
    #[must_use]
    pub fn method(&self, ordinal: u8, index: u8) -> Option<&MethodDescriptor> {
        self.interfaces.get(&ordinal)?.method(index)
    }

    /// Number of registered interfaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.interfaces.len()
    }

    /// Returns `true` if no interfaces are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }
}

/// Accumulates interface registrations, validating as it goes.
#[derive(Debug)]
pub struct RegistryBuilder {
    interfaces: HashMap<u8, InterfaceDescriptor>,
}

impl RegistryBuilder {
    /// Registers an interface descriptor.
    ///
    /// # Errors
    ///
    /// [`RegistryError::OrdinalOutOfRange`] when the ordinal is not in
    /// 1..=127, [`RegistryError::TooManyMethods`] when more than 256 methods
    /// are declared, and [`RegistryError::DuplicateOrdinal`] when the
    /// ordinal is already taken.
    pub fn register(mut self, interface: InterfaceDescriptor) -> Result<Self, RegistryError> {
        let ordinal = interface.ordinal();
        if ordinal == 0 || ordinal > 127 {
            return Err(RegistryError::OrdinalOutOfRange {
                ordinal,
                interface: interface.name(),
            });
        }
        if interface.methods().len() > 256 {
            return Err(RegistryError::TooManyMethods {
                interface: interface.name(),
                count: interface.methods().len(),
            });
        }
        if let Some(existing) = self.interfaces.get(&ordinal) {
            return Err(RegistryError::DuplicateOrdinal {
                ordinal,
                first: existing.name(),
                second: interface.name(),
            });
        }
        self.interfaces.insert(ordinal, interface);
        Ok(self)
    }

    /// Finishes the registry.
    #[must_use]
    pub fn build(self) -> Registry {
        Registry {
            interfaces: self.interfaces,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{ParamDescriptor, ReturnShape};

    fn clock() -> InterfaceDescriptor {
        InterfaceDescriptor::new(
            9,
            "Clock",
            vec![
                MethodDescriptor::new("now", vec![], ReturnShape::Typed),
                MethodDescriptor::new(
                    "adjust",
                    vec![ParamDescriptor::new("delta", false)],
                    ReturnShape::None,
                ),
            ],
        )
    }

    #[test]
    fn test_lookup_by_ordinal_and_index() {
        let registry = Registry::builder().register(clock()).unwrap().build();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.method(9, 1).unwrap().name(), "adjust");
        assert!(registry.method(9, 2).is_none());
        assert!(registry.method(4, 0).is_none());
    }

    #[test]
    fn test_duplicate_ordinal_is_fatal() {
        let other = InterfaceDescriptor::new(9, "Chat", vec![]);
        let err = Registry::builder()
            .register(clock())
            .unwrap()
            .register(other)
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::DuplicateOrdinal {
                ordinal: 9,
                first: "Clock",
                second: "Chat",
            }
        ));
    }

    #[test]
    fn test_ordinal_zero_rejected() {
        let iface = InterfaceDescriptor::new(0, "Zero", vec![]);
        assert!(matches!(
            Registry::builder().register(iface),
            Err(RegistryError::OrdinalOutOfRange { ordinal: 0, .. })
        ));
    }

    #[test]
    fn test_ordinal_above_127_rejected() {
        let iface = InterfaceDescriptor::new(128, "High", vec![]);
        assert!(matches!(
            Registry::builder().register(iface),
            Err(RegistryError::OrdinalOutOfRange { ordinal: 128, .. })
        ));
    }

    #[test]
    fn test_empty_registry() {
        let registry = Registry::builder().build();
        assert!(registry.is_empty());
        assert!(registry.interface_by_ordinal(1).is_none());
    }
}
