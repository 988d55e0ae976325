// Copyright 2025 RustFS Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use snafu::Snafu;

/// Malformed Kubernetes quantity strings.
///
/// Quantities are validated strictly on every path (nodes and pods alike):
/// anything that is not `<integer><suffix>` for the expected suffix is rejected
/// rather than coerced to zero. The bare quantity `"0"` is the only accepted
/// form without a suffix, since that is how the API server serializes zero.
#[derive(Debug, Snafu, PartialEq, Eq)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("quantity '{}' is missing the '{}' suffix", raw, suffix))]
    MissingSuffix { raw: String, suffix: &'static str },

    #[snafu(display("quantity '{}' has no integer value before '{}'", raw, suffix))]
    InvalidInteger { raw: String, suffix: &'static str },

    #[snafu(display("'{}' is not a decimal number of cores", raw))]
    InvalidCores { raw: String },

    #[snafu(display("quantity '{}' is too large", raw))]
    Overflow { raw: String },
}

impl Error {
    /// The offending raw quantity.
    pub fn raw(&self) -> &str {
        match self {
            Error::MissingSuffix { raw, .. }
            | Error::InvalidInteger { raw, .. }
            | Error::InvalidCores { raw }
            | Error::Overflow { raw } => raw,
        }
    }
}
