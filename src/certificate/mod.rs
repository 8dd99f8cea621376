//! Certificate parsing and field extraction
//!
//! Wraps a DER-encoded X.509 certificate together with the fields the
//! report and chain walk need. Parsing happens exactly once per logical
//! input; the DER bytes travel with the value so the chain walker and
//! exporter never re-read the source.

mod extensions;

use crate::error::CertificateError;
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use x509_parser::prelude::*;
use x509_parser::public_key::PublicKey;

pub use extensions::CertExtension;

/// Public key algorithm of a certificate.
///
/// Key sizes are only reported for the four algorithms the report knows;
/// everything else renders as `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PublicKeyAlgorithm {
    Rsa,
    Dsa,
    Ecdh,
    Ecdsa,
    Other(String),
}

impl PublicKeyAlgorithm {
    /// Human label used for the report's FriendlyName line
    pub fn label(&self) -> &str {
        match self {
            PublicKeyAlgorithm::Rsa => "RSA",
            PublicKeyAlgorithm::Dsa => "DSA",
            PublicKeyAlgorithm::Ecdh => "ECDH",
            PublicKeyAlgorithm::Ecdsa => "ECDSA",
            PublicKeyAlgorithm::Other(name) => name,
        }
    }

    /// Whether a key size is reportable for this algorithm
    pub fn reports_key_size(&self) -> bool {
        !matches!(self, PublicKeyAlgorithm::Other(_))
    }
}

/// A parsed certificate and its DER encoding
#[derive(Debug, Clone, Serialize)]
pub struct Certificate {
    #[serde(skip)]
    der: Vec<u8>,
    #[serde(skip)]
    serial_raw: Vec<u8>,

    pub subject: String,
    pub issuer: String,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
    /// Serial number as an uppercase hex string
    pub serial: String,
    /// SHA-256 digest of the DER bytes, uppercase hex
    pub thumbprint: String,
    pub public_key_algorithm: PublicKeyAlgorithm,
    /// Key size in bits; `None` when the algorithm does not report one
    pub key_size: Option<u32>,
    pub signature_algorithm: String,
    /// Whether the source container carried key material for this cert
    pub has_private_key: bool,
    /// X.509 version, 1-indexed
    pub version: u32,
    pub is_self_signed: bool,
    pub is_ca: bool,
    pub extensions: Vec<CertExtension>,

    /// CRL distribution point URLs, for revocation checks
    pub crl_urls: Vec<String>,
    /// AIA caIssuers URLs, for online chain completion
    pub ca_issuer_urls: Vec<String>,
}

impl Certificate {
    /// Parse a DER-encoded certificate and extract all report fields
    pub fn from_der(der: Vec<u8>) -> Result<Self, CertificateError> {
        let (_, cert) = X509Certificate::from_der(&der)
            .map_err(|e| CertificateError::new(format!("{:?}", e)))?;

        let subject = cert.subject().to_string();
        let issuer = cert.issuer().to_string();
        let not_before = asn1_time_to_datetime(cert.validity().not_before)?;
        let not_after = asn1_time_to_datetime(cert.validity().not_after)?;

        let serial_raw = cert.raw_serial().to_vec();
        let serial = hex::encode_upper(&serial_raw);
        let thumbprint = hex::encode_upper(Sha256::digest(&der));

        let (public_key_algorithm, key_size) = extract_public_key_info(&cert);
        let signature_algorithm =
            signature_algorithm_name(&cert.signature_algorithm.algorithm.to_string());

        let is_self_signed = cert.subject() == cert.issuer();
        let is_ca = cert
            .basic_constraints()
            .map(|bc| bc.map(|ext| ext.value.ca).unwrap_or(false))
            .unwrap_or(false);

        let extensions = extensions::extract_all(&cert);
        let crl_urls = extensions::crl_distribution_urls(&cert);
        let ca_issuer_urls = extensions::ca_issuer_urls(&cert);

        let version = cert.version().0 + 1; // X.509 version is 0-indexed

        Ok(Certificate {
            der,
            serial_raw,
            subject,
            issuer,
            not_before,
            not_after,
            serial,
            thumbprint,
            public_key_algorithm,
            key_size,
            signature_algorithm,
            has_private_key: false,
            version,
            is_self_signed,
            is_ca,
            extensions,
            crl_urls,
            ca_issuer_urls,
        })
    }

    /// The certificate's DER encoding
    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// Raw big-endian serial number bytes
    pub fn serial_raw(&self) -> &[u8] {
        &self.serial_raw
    }

    /// Re-borrow the DER as an `X509Certificate` for signature checks
    pub fn parse(&self) -> Result<X509Certificate<'_>, CertificateError> {
        X509Certificate::from_der(&self.der)
            .map(|(_, cert)| cert)
            .map_err(|e| CertificateError::new(format!("{:?}", e)))
    }
}

fn extract_public_key_info(cert: &X509Certificate) -> (PublicKeyAlgorithm, Option<u32>) {
    let spki = cert.public_key();
    let alg_oid = spki.algorithm.algorithm.to_string();

    let algorithm = match alg_oid.as_str() {
        "1.2.840.113549.1.1.1" | "1.2.840.113549.1.1.10" => PublicKeyAlgorithm::Rsa,
        "1.2.840.10040.4.1" => PublicKeyAlgorithm::Dsa,
        "1.2.840.10045.2.1" => PublicKeyAlgorithm::Ecdsa,
        "1.3.132.1.12" => PublicKeyAlgorithm::Ecdh,
        "1.3.101.110" => PublicKeyAlgorithm::Other("X25519".to_string()),
        "1.3.101.112" => PublicKeyAlgorithm::Other("Ed25519".to_string()),
        "1.3.101.113" => PublicKeyAlgorithm::Other("Ed448".to_string()),
        other => PublicKeyAlgorithm::Other(other.to_string()),
    };

    let key_size = match &algorithm {
        PublicKeyAlgorithm::Rsa => match spki.parsed() {
            Ok(PublicKey::RSA(rsa)) => Some(integer_bits(rsa.modulus)),
            _ => None,
        },
        PublicKeyAlgorithm::Dsa => match spki.parsed() {
            Ok(PublicKey::DSA(y)) => Some(integer_bits(y)),
            _ => None,
        },
        PublicKeyAlgorithm::Ecdsa | PublicKeyAlgorithm::Ecdh => {
            curve_size(spki).or_else(|| match spki.parsed() {
                Ok(PublicKey::EC(ec)) => Some(ec.key_size() as u32),
                _ => None,
            })
        }
        PublicKeyAlgorithm::Other(_) => None,
    };

    (algorithm, key_size)
}

/// Bit length of a DER INTEGER, ignoring the leading sign byte
fn integer_bits(bytes: &[u8]) -> u32 {
    let significant = bytes.iter().skip_while(|&&b| b == 0).count();
    (significant * 8) as u32
}

/// Key size from the named-curve parameter OID
fn curve_size(spki: &SubjectPublicKeyInfo) -> Option<u32> {
    let params = spki.algorithm.parameters.as_ref()?;
    let oid = params.as_oid().ok()?;
    match oid.to_string().as_str() {
        "1.2.840.10045.3.1.7" => Some(256), // P-256
        "1.3.132.0.10" => Some(256),        // secp256k1
        "1.3.132.0.34" => Some(384),        // P-384
        "1.3.132.0.35" => Some(521),        // P-521
        _ => None,
    }
}

/// Convert a signature algorithm OID to a human-readable name
fn signature_algorithm_name(oid: &str) -> String {
    match oid {
        "1.2.840.113549.1.1.5" => "SHA1withRSA".to_string(),
        "1.2.840.113549.1.1.11" => "SHA256withRSA".to_string(),
        "1.2.840.113549.1.1.12" => "SHA384withRSA".to_string(),
        "1.2.840.113549.1.1.13" => "SHA512withRSA".to_string(),
        "1.2.840.113549.1.1.10" => "RSA-PSS".to_string(),
        "1.2.840.10045.4.3.2" => "ECDSA-SHA256".to_string(),
        "1.2.840.10045.4.3.3" => "ECDSA-SHA384".to_string(),
        "1.2.840.10045.4.3.4" => "ECDSA-SHA512".to_string(),
        "1.2.840.10040.4.3" => "SHA1withDSA".to_string(),
        "1.3.101.112" => "Ed25519".to_string(),
        "1.3.101.113" => "Ed448".to_string(),
        _ => oid.to_string(),
    }
}

fn asn1_time_to_datetime(time: ASN1Time) -> Result<DateTime<Utc>, CertificateError> {
    let timestamp = time.timestamp();
    Utc.timestamp_opt(timestamp, 0)
        .single()
        .ok_or_else(|| CertificateError::new("invalid timestamp"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_size_ignores_integer_sign_byte() {
        // 2048-bit modulus serialized with a leading zero
        let mut modulus = vec![0u8];
        modulus.extend(std::iter::repeat(0xAB).take(256));
        assert_eq!(integer_bits(&modulus), 2048);
    }

    #[test]
    fn unknown_algorithm_reports_no_key_size() {
        let alg = PublicKeyAlgorithm::Other("Ed25519".to_string());
        assert!(!alg.reports_key_size());
        assert_eq!(alg.label(), "Ed25519");
    }

    #[test]
    fn signature_oid_mapping() {
        assert_eq!(
            signature_algorithm_name("1.2.840.113549.1.1.11"),
            "SHA256withRSA"
        );
        // Unknown OIDs pass through as dotted strings
        assert_eq!(signature_algorithm_name("1.2.3.4"), "1.2.3.4");
    }
}
