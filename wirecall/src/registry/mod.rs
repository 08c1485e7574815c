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

//! Interface registry: the shared catalogue of ordinals, methods and
//! parameter schemas.
//!
//! Both peers of a connection must build their registries from the same
//! interface declarations in the same order; the method index and the
//! parameter layout are positional and there is no wire-level negotiation.
//! The `#[interface]` macro produces one [`InterfaceDescriptor`] per trait,
//! which keeps declaration and catalogue trivially in sync.

#[allow(clippy::module_inception)]
mod registry;

mod descriptor;
mod error;

pub use descriptor::{InterfaceDescriptor, MethodDescriptor, ParamDescriptor, ReturnShape};
pub use error::RegistryError;
pub use registry::{Registry, RegistryBuilder};
