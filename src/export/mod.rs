//! Certificate export
//!
//! Serializes one certificate into DER, PEM, or PKCS#12 bytes and writes
//! exactly one artifact with the encoding-specific extension. Existing
//! files are overwritten silently.

use crate::certificate::Certificate;
use crate::error::ExportError;
use clap::ValueEnum;
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::PathBuf;

/// Target encoding for an exported certificate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ExportKind {
    /// Distinguished Encoding Rules - ASN.1
    #[default]
    Der,
    /// Privacy Enhanced Mail - RFC 7468
    Pem,
    /// Personal Information Exchange - RFC 7292
    Pfx,
}

impl ExportKind {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportKind::Der => "der",
            ExportKind::Pem => "pem",
            ExportKind::Pfx => "pfx",
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportKind::Der => write!(f, "DER"),
            ExportKind::Pem => write!(f, "PEM"),
            ExportKind::Pfx => write!(f, "PFX"),
        }
    }
}

/// Write one export artifact and return its path.
///
/// The base name defaults to the certificate's serial number; the
/// extension always follows the encoding. `private_key` is only used for
/// PFX, which packages the key material alongside the certificate when
/// the source carried it.
pub fn export_certificate(
    cert: &Certificate,
    kind: ExportKind,
    base_name: Option<&str>,
    private_key: Option<&[u8]>,
) -> Result<PathBuf, ExportError> {
    let base = base_name.unwrap_or(&cert.serial);
    let path = PathBuf::from(format!("{}.{}", base, kind.extension()));

    let bytes = match kind {
        ExportKind::Der => cert.der().to_vec(),
        ExportKind::Pem => encode_pem(cert),
        ExportKind::Pfx => encode_pfx(cert, private_key)?,
    };

    std::fs::write(&path, bytes).map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })?;

    tracing::debug!(path = %path.display(), kind = %kind, "exported certificate");

    Ok(path)
}

/// DER bytes wrapped as a PEM CERTIFICATE block
fn encode_pem(cert: &Certificate) -> Vec<u8> {
    let block = ::pem::Pem::new("CERTIFICATE", cert.der().to_vec());
    ::pem::encode(&block).into_bytes()
}

/// Certificate (and key material when present) packaged as PKCS#12
fn encode_pfx(cert: &Certificate, private_key: Option<&[u8]>) -> Result<Vec<u8>, ExportError> {
    let p12_cert =
        p12_keystore::Certificate::from_der(cert.der()).map_err(|e| ExportError::Pkcs12 {
            message: format!("failed to re-encode certificate: {}", e),
        })?;

    let mut keystore = p12_keystore::KeyStore::new();

    match private_key {
        Some(key) => {
            let local_key_id = Sha256::digest(cert.der()).to_vec();
            let chain =
                p12_keystore::PrivateKeyChain::new(key.to_vec(), &local_key_id, vec![p12_cert]);
            keystore.add_entry(
                &cert.serial,
                p12_keystore::KeyStoreEntry::PrivateKeyChain(chain),
            );
        }
        None => {
            keystore.add_entry(
                &cert.serial,
                p12_keystore::KeyStoreEntry::Certificate(p12_cert),
            );
        }
    }

    keystore
        .writer("")
        .write()
        .map_err(|e| ExportError::Pkcs12 {
            message: e.to_string(),
        })
}
