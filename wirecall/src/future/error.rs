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

//! Future error types.

use std::fmt;

/// Errors from reading or driving a call future.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FutureError {
    /// The result or error was read before the future completed.
    NotReady,
    /// The future was asked to complete a second time.
    AlreadyComplete,
}

impl fmt::Display for FutureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotReady => write!(f, "future has not completed yet"),
            Self::AlreadyComplete => write!(f, "future is already complete"),
        }
    }
}

impl std::error::Error for FutureError {}
