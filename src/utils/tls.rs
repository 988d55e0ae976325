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

//! TLS material for the connection to the Kubernetes API server.

use rustls::pki_types::CertificateDer;
use snafu::{ResultExt, Snafu};
use std::io::{self, Cursor};

#[derive(Snafu, Debug)]
pub enum Error {
    #[snafu(display("parse certificate error: {}", source))]
    InvalidCertificate { source: io::Error },

    #[snafu(display("no certificate in CA bundle"))]
    NonCertificate,
}

/// Installs the ring crypto provider as the process-wide rustls default.
///
/// Returns `false` if another provider was installed first.
pub fn install_crypto_provider() -> bool {
    rustls::crypto::ring::default_provider()
        .install_default()
        .is_ok()
}

/// Parses a PEM CA bundle into DER certificates, in bundle order.
pub fn load_ca_bundle(pem: &[u8]) -> Result<Vec<Vec<u8>>, Error> {
    let certs = rustls_pemfile::certs(&mut Cursor::new(pem))
        .collect::<Result<Vec<CertificateDer<'static>>, _>>()
        .context(InvalidCertificateSnafu)?;

    if certs.is_empty() {
        return NonCertificateSnafu.fail();
    }

    Ok(certs.into_iter().map(|c| c.as_ref().to_vec()).collect())
}
