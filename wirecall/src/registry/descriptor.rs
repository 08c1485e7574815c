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

//! Interface, method and parameter descriptors.
//!
//! Descriptors are the static schema both peers agree on. Method indices
//! are assigned by declaration position when the interface descriptor is
//! assembled, so two processes built from the same interface declaration
//! agree on every index without negotiation.

/// The shape of a method's return value, which fixes both whether a call
/// occupies a call-id and the layout of the response payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReturnShape {
    /// Fire-and-forget: no call-id, no response frame.
    None,
    /// A unit future: response frame with an empty payload.
    Unit,
    /// A typed future: response carries the result under a nullable frame.
    Typed,
    /// A unit future with an error channel: response carries an optional
    /// error string.
    FallibleUnit,
    /// A typed future with an error channel: response carries an optional
    /// error string, then the result under a nullable frame when no error.
    FallibleTyped,
}

impl ReturnShape {
    /// Whether a call with this shape occupies a call-id and expects a
    /// response frame.
    #[must_use]
    pub const fn expects_reply(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// A single declared parameter.
#[derive(Debug, Clone)]
pub struct ParamDescriptor {
    name: &'static str,
    nullable: bool,
}

impl ParamDescriptor {
    /// Declares a parameter. Option-typed parameters are implicitly
    /// nullable on the wire regardless of `nullable`.
    #[must_use]
    pub const fn new(name: &'static str, nullable: bool) -> Self {
        Self { name, nullable }
    }

    /// The declared parameter name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the parameter is framed with a presence tag.
    #[must_use]
    pub const fn nullable(&self) -> bool {
        self.nullable
    }
}

/// A single declared method.
#[derive(Debug, Clone)]
pub struct MethodDescriptor {
    name: &'static str,
    index: u8,
    params: Vec<ParamDescriptor>,
    return_shape: ReturnShape,
}

impl MethodDescriptor {
    /// Declares a method. The wire index is assigned later, by position,
    /// when the method list is handed to [`InterfaceDescriptor::new`].
    #[must_use]
    pub fn new(
        name: &'static str,
        params: Vec<ParamDescriptor>,
        return_shape: ReturnShape,
    ) -> Self {
        Self {
            name,
            index: 0,
            params,
            return_shape,
        }
    }

    /// The declared method name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The method's wire index within its interface.
    #[must_use]
    pub const fn index(&self) -> u8 {
        self.index
    }

    /// The declared parameters, in declaration (and wire) order.
    #[must_use]
    pub fn params(&self) -> &[ParamDescriptor] {
        &self.params
    }

    /// The method's return shape.
    #[must_use]
    pub const fn return_shape(&self) -> ReturnShape {
        self.return_shape
    }
}

/// A named interface with a stable 7-bit ordinal and its ordered methods.
#[derive(Debug, Clone)]
pub struct InterfaceDescriptor {
    name: &'static str,
    ordinal: u8,
    methods: Vec<MethodDescriptor>,
}

impl InterfaceDescriptor {
    /// Assembles an interface descriptor, assigning each method its wire
    /// index from its position in `methods`.
    ///
    /// Ordinal range and method-count limits are validated when the
    /// descriptor is registered, not here.
    #[must_use]
    pub fn new(ordinal: u8, name: &'static str, mut methods: Vec<MethodDescriptor>) -> Self {
        for (position, method) in methods.iter_mut().enumerate() {
            method.index = position as u8;
        }
        Self {
            name,
            ordinal,
            methods,
        }
    }

    /// The interface name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The interface's 7-bit ordinal.
    #[must_use]
    pub const fn ordinal(&self) -> u8 {
        self.ordinal
    }

    /// All methods, in index order.
    #[must_use]
    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    /// Looks up a method by wire index.
    #[must_use]
    pub fn method(&self, index: u8) -> Option<&MethodDescriptor> {
        self.methods.get(usize::from(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_indices_follow_declaration_order() {
        let iface = InterfaceDescriptor::new(
            3,
            "Clock",
            vec![
                MethodDescriptor::new("now", vec![], ReturnShape::Typed),
                MethodDescriptor::new("reset", vec![], ReturnShape::None),
                MethodDescriptor::new("sync", vec![], ReturnShape::FallibleUnit),
            ],
        );
        assert_eq!(iface.method(0).unwrap().name(), "now");
        assert_eq!(iface.method(1).unwrap().name(), "reset");
        assert_eq!(iface.method(2).unwrap().name(), "sync");
        assert_eq!(iface.method(2).unwrap().index(), 2);
        assert!(iface.method(3).is_none());
    }

    #[test]
    fn test_return_shape_expects_reply() {
        assert!(!ReturnShape::None.expects_reply());
        assert!(ReturnShape::Unit.expects_reply());
        assert!(ReturnShape::Typed.expects_reply());
        assert!(ReturnShape::FallibleUnit.expects_reply());
        assert!(ReturnShape::FallibleTyped.expects_reply());
    }
}
