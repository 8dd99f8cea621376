//! Trust chain construction and per-element validation
//!
//! Orders the presented certificates leaf-first by issuer/subject
//! matching, optionally completes missing issuers via AIA when the
//! policy allows network access, and computes per-element status flags
//! under the validating policies.

mod revocation;

use crate::certificate::Certificate;
use crate::config::InspectConfig;
use crate::error::ChainError;
use chrono::Utc;
use revocation::{RevocationChecker, RevocationOutcome};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Upper bound on chain length; self-looping or absurd chains stop here
pub const MAX_CHAIN_DEPTH: usize = 10;

const AIA_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Chain validation mode, fixed for the whole run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationPolicy {
    /// Build the chain for structural purposes only
    NoCheck,
    /// Revocation-check the entire chain over the network
    OnlineFull,
    /// Revocation-check the entire chain from cached data only
    OfflineFull,
}

impl ValidationPolicy {
    /// Whether per-element statuses are computed at all
    pub fn validates(&self) -> bool {
        !matches!(self, ValidationPolicy::NoCheck)
    }

    /// Whether the policy may touch the network
    pub fn online(&self) -> bool {
        matches!(self, ValidationPolicy::OnlineFull)
    }
}

/// Per-element validation status flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChainStatus {
    UntrustedRoot,
    PartialChain,
    Expired,
    NotYetValid,
    Revoked,
    RevocationStatusUnknown,
    InvalidSignature,
}

impl fmt::Display for ChainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ChainStatus::UntrustedRoot => "UntrustedRoot",
            ChainStatus::PartialChain => "PartialChain",
            ChainStatus::Expired => "Expired",
            ChainStatus::NotYetValid => "NotYetValid",
            ChainStatus::Revoked => "Revoked",
            ChainStatus::RevocationStatusUnknown => "RevocationStatusUnknown",
            ChainStatus::InvalidSignature => "InvalidSignature",
        };
        write!(f, "{}", text)
    }
}

/// One position in the built chain: a certificate plus its status flags.
///
/// The status list stays empty under the `NoCheck` policy.
#[derive(Debug, Serialize)]
pub struct ChainElement {
    pub certificate: Certificate,
    pub status: Vec<ChainStatus>,
}

impl ChainElement {
    /// An element is valid when nothing worse than an undetermined
    /// revocation status was recorded.
    pub fn is_valid(&self) -> bool {
        self.status
            .iter()
            .all(|s| *s == ChainStatus::RevocationStatusUnknown)
    }
}

/// Build the ordered trust chain for a leaf certificate.
///
/// `intermediates` are the certificates presented alongside the leaf
/// (TLS chain or file bundle). The walk always runs to completion, even
/// when the caller will only display the first element.
pub async fn build_chain(
    leaf: Certificate,
    intermediates: &[Vec<u8>],
    config: &InspectConfig,
) -> Result<Vec<ChainElement>, ChainError> {
    let mut pool: Vec<Certificate> = intermediates
        .iter()
        .filter_map(|der| Certificate::from_der(der.clone()).ok())
        .collect();

    let mut certs = vec![leaf];
    while certs.len() < MAX_CHAIN_DEPTH {
        let next = {
            let Some(current) = certs.last() else { break };
            if current.is_self_signed {
                break;
            }
            if let Some(pos) = pool.iter().position(|c| c.subject == current.issuer) {
                Some(pool.swap_remove(pos))
            } else if config.policy.online() {
                fetch_issuer(current).await
            } else {
                None
            }
        };
        match next {
            Some(issuer) => certs.push(issuer),
            None => break,
        }
    }

    tracing::debug!(length = certs.len(), "chain ordered");

    if !config.policy.validates() {
        return Ok(certs
            .into_iter()
            .map(|certificate| ChainElement {
                certificate,
                status: Vec::new(),
            })
            .collect());
    }

    evaluate_chain(certs, config).await
}

/// Compute status flags for every element of an ordered chain
async fn evaluate_chain(
    certs: Vec<Certificate>,
    config: &InspectConfig,
) -> Result<Vec<ChainElement>, ChainError> {
    let checker = RevocationChecker::new(
        config.cache_dir.clone(),
        config.revocation_timeout,
        config.policy.online(),
    );

    let count = certs.len();
    let mut elements = Vec::with_capacity(count);
    let now = Utc::now();

    for (i, certificate) in certs.iter().enumerate() {
        let mut status = Vec::new();

        if now > certificate.not_after {
            status.push(ChainStatus::Expired);
        } else if now < certificate.not_before {
            status.push(ChainStatus::NotYetValid);
        }

        let issuer = if i + 1 < count {
            Some(&certs[i + 1])
        } else if certificate.is_self_signed {
            Some(certificate)
        } else {
            None
        };
        if let Some(parent) = issuer {
            if !signature_valid(certificate, parent)? {
                status.push(ChainStatus::InvalidSignature);
            }
        }

        if i + 1 == count {
            if certificate.is_self_signed {
                if !is_known_root(certificate) {
                    status.push(ChainStatus::UntrustedRoot);
                }
            } else {
                status.push(ChainStatus::PartialChain);
            }
        }

        match checker.check(certificate).await {
            RevocationOutcome::Good => {}
            RevocationOutcome::Revoked => status.push(ChainStatus::Revoked),
            RevocationOutcome::Unknown(reason) => {
                tracing::debug!(subject = %certificate.subject, "revocation undetermined: {}", reason);
                status.push(ChainStatus::RevocationStatusUnknown);
            }
        }

        elements.push(ChainElement {
            certificate: certificate.clone(),
            status,
        });
    }

    Ok(elements)
}

/// Verify that `cert` carries a signature made by `parent`'s key
fn signature_valid(cert: &Certificate, parent: &Certificate) -> Result<bool, ChainError> {
    let child_x509 = cert.parse()?;
    let parent_x509 = parent.parse()?;
    Ok(child_x509
        .verify_signature(Some(parent_x509.public_key()))
        .is_ok())
}

/// Fetch a missing issuer certificate via the AIA caIssuers URL
async fn fetch_issuer(cert: &Certificate) -> Option<Certificate> {
    if cert.ca_issuer_urls.is_empty() {
        return None;
    }

    let client = reqwest::Client::builder()
        .timeout(AIA_FETCH_TIMEOUT)
        .build()
        .ok()?;

    for issuer_url in &cert.ca_issuer_urls {
        let response = match client.get(issuer_url).send().await {
            Ok(resp) if resp.status().is_success() => resp,
            Ok(resp) => {
                tracing::debug!(url = %issuer_url, status = %resp.status(), "issuer fetch rejected");
                continue;
            }
            Err(e) => {
                tracing::debug!(url = %issuer_url, "issuer fetch failed: {}", e);
                continue;
            }
        };

        let Ok(bytes) = response.bytes().await else {
            continue;
        };

        // Issuer endpoints serve either raw DER or a PEM wrapper
        let der: Vec<u8> = if bytes.starts_with(b"-----BEGIN") {
            match ::pem::parse(&bytes) {
                Ok(block) => block.into_contents(),
                Err(_) => continue,
            }
        } else {
            bytes.to_vec()
        };

        if let Ok(issuer) = Certificate::from_der(der) {
            tracing::debug!(url = %issuer_url, subject = %issuer.subject, "fetched issuer");
            return Some(issuer);
        }
    }

    None
}

/// Root CAs accepted as trust anchors, matched by subject substring
const KNOWN_ROOT_AUTHORITIES: [&str; 15] = [
    "DigiCert",
    "Let's Encrypt",
    "ISRG",
    "GlobalSign",
    "Comodo",
    "Sectigo",
    "GeoTrust",
    "Thawte",
    "VeriSign",
    "Entrust",
    "GoDaddy",
    "Amazon",
    "Microsoft",
    "Google Trust",
    "Baltimore",
];

fn is_known_root(cert: &Certificate) -> bool {
    KNOWN_ROOT_AUTHORITIES
        .iter()
        .any(|root| cert.subject.contains(root))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_modes() {
        assert!(!ValidationPolicy::NoCheck.validates());
        assert!(ValidationPolicy::OnlineFull.validates());
        assert!(ValidationPolicy::OfflineFull.validates());
        assert!(ValidationPolicy::OnlineFull.online());
        assert!(!ValidationPolicy::OfflineFull.online());
    }

    #[test]
    fn undetermined_revocation_does_not_invalidate() {
        let status = vec![ChainStatus::RevocationStatusUnknown];
        assert!(status
            .iter()
            .all(|s| *s == ChainStatus::RevocationStatusUnknown));
    }
}
