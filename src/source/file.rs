//! Certificate file loading and container detection
//!
//! Auto-detects PEM, DER, and PKCS#12 containers and extracts the leaf
//! certificate plus any bundled chain and key material.

use super::{Acquired, ContainerType};
use crate::certificate::Certificate;
use crate::error::AcquisitionError;
use std::path::Path;
use x509_parser::prelude::*;

const PEM_KEY_TAGS: [&str; 3] = ["PRIVATE KEY", "RSA PRIVATE KEY", "EC PRIVATE KEY"];

/// Detect the container type of raw certificate bytes
pub fn detect_container(data: &[u8]) -> Option<ContainerType> {
    if let Ok(text) = std::str::from_utf8(data) {
        if text.contains("-----BEGIN ") {
            return Some(ContainerType::Pem);
        }
    }

    if data.len() > 4 && data[0] == 0x30 && is_likely_pkcs12(data) {
        return Some(ContainerType::Pkcs12);
    }

    if X509Certificate::from_der(data).is_ok() {
        return Some(ContainerType::Der);
    }

    // Unrecognized ASN.1 SEQUENCE openers still get a DER parse attempt
    if !data.is_empty() && data[0] == 0x30 {
        return Some(ContainerType::Der);
    }

    None
}

/// Heuristic to distinguish PKCS#12 from a plain DER certificate.
fn is_likely_pkcs12(data: &[u8]) -> bool {
    // pkcs7-data OID: 06 09 2a 86 48 86 f7 0d 01 07 01
    let pkcs7_data_oid: [u8; 11] = [
        0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x07, 0x01,
    ];
    let search_len = data.len().min(50);
    data[..search_len]
        .windows(pkcs7_data_oid.len())
        .any(|w| w == pkcs7_data_oid)
}

/// Load the certificate from a single file.
///
/// The first certificate in the container becomes the leaf; any further
/// certificates ride along as chain material.
pub fn load_file(path: &Path) -> Result<Acquired, AcquisitionError> {
    let data = std::fs::read(path).map_err(|e| AcquisitionError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let container = detect_container(&data).ok_or_else(|| AcquisitionError::NotACertificate {
        path: path.display().to_string(),
        message: "could not detect PEM, DER, or PKCS#12".to_string(),
    })?;

    let (ders, private_key) = match container {
        ContainerType::Pem => read_pem(&data, path)?,
        ContainerType::Der => (vec![data], None),
        ContainerType::Pkcs12 => read_pkcs12(&data, path)?,
    };

    let mut ders = ders.into_iter();
    let leaf_der = ders.next().ok_or_else(|| AcquisitionError::NotACertificate {
        path: path.display().to_string(),
        message: "container holds no certificate".to_string(),
    })?;

    let mut certificate =
        Certificate::from_der(leaf_der).map_err(|e| AcquisitionError::NotACertificate {
            path: path.display().to_string(),
            message: e.message,
        })?;
    certificate.has_private_key = private_key.is_some();

    tracing::debug!(path = %path.display(), container = %container, "loaded certificate");

    Ok(Acquired {
        label: path.display().to_string(),
        certificate,
        container: Some(container),
        intermediates: ders.collect(),
        private_key,
    })
}

type ContainerContents = Result<(Vec<Vec<u8>>, Option<Vec<u8>>), AcquisitionError>;

/// Read CERTIFICATE blocks and any private key block from PEM data
fn read_pem(data: &[u8], path: &Path) -> ContainerContents {
    let pems = ::pem::parse_many(data).map_err(|e| AcquisitionError::NotACertificate {
        path: path.display().to_string(),
        message: format!("invalid PEM: {}", e),
    })?;

    let mut certs = Vec::new();
    let mut key = None;
    for block in pems {
        if block.tag() == "CERTIFICATE" {
            certs.push(block.into_contents());
        } else if key.is_none() && PEM_KEY_TAGS.contains(&block.tag()) {
            key = Some(block.into_contents());
        }
    }

    if certs.is_empty() {
        return Err(AcquisitionError::NotACertificate {
            path: path.display().to_string(),
            message: "no CERTIFICATE blocks found".to_string(),
        });
    }

    Ok((certs, key))
}

/// Read certificates and key material from a PKCS#12 container.
///
/// Only unprotected (empty password) containers are supported; anything
/// else is reported as unreadable.
fn read_pkcs12(data: &[u8], path: &Path) -> ContainerContents {
    let keystore = p12_keystore::KeyStore::from_pkcs12(data, "").map_err(|e| {
        AcquisitionError::NotACertificate {
            path: path.display().to_string(),
            message: format!("unreadable PKCS#12: {}", e),
        }
    })?;

    let mut certs = Vec::new();
    let mut key = None;

    for (_alias, entry) in keystore.entries() {
        match entry {
            p12_keystore::KeyStoreEntry::PrivateKeyChain(chain) => {
                if key.is_none() {
                    key = Some(chain.key().to_vec());
                }
                for cert in chain.chain() {
                    certs.push(cert.as_der().to_vec());
                }
            }
            p12_keystore::KeyStoreEntry::Certificate(cert) => {
                certs.push(cert.as_der().to_vec());
            }
            _ => {}
        }
    }

    if certs.is_empty() {
        return Err(AcquisitionError::NotACertificate {
            path: path.display().to_string(),
            message: "no certificates found in PKCS#12".to_string(),
        });
    }

    Ok((certs, key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_pem_container() {
        let pem_data =
            b"-----BEGIN CERTIFICATE-----\nMIIBkTCB+wIJAL...\n-----END CERTIFICATE-----\n";
        assert_eq!(detect_container(pem_data), Some(ContainerType::Pem));
    }

    #[test]
    fn detect_rejects_garbage() {
        assert_eq!(detect_container(b"this is not a certificate"), None);
        assert_eq!(detect_container(b""), None);
    }

    #[test]
    fn truncated_der_fails_to_load() {
        let dir = std::env::temp_dir();
        let path = dir.join("cert-inspect-truncated-test.der");
        // ASN.1 SEQUENCE opener followed by nothing useful
        std::fs::write(&path, [0x30, 0x82, 0x01]).unwrap();
        let result = load_file(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(
            result,
            Err(AcquisitionError::NotACertificate { .. })
        ));
    }
}
