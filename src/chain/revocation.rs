//! CRL-based revocation checking with a local cache
//!
//! Online validation downloads the CRL named by a certificate's
//! distribution points and caches the bytes; offline validation consults
//! only the cache. Actual CRL parsing is delegated to `x509-parser`.

use crate::certificate::Certificate;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::time::Duration;
use x509_parser::revocation_list::CertificateRevocationList;
use x509_parser::prelude::FromDer;

/// Outcome of a revocation check for one certificate
pub(crate) enum RevocationOutcome {
    Good,
    Revoked,
    /// Status could not be determined; carries the reason for logging
    Unknown(String),
}

pub(crate) struct RevocationChecker {
    cache_dir: PathBuf,
    timeout: Duration,
    online: bool,
}

impl RevocationChecker {
    pub fn new(cache_dir: PathBuf, timeout: Duration, online: bool) -> Self {
        Self {
            cache_dir,
            timeout,
            online,
        }
    }

    /// Check one certificate against its CRL distribution points.
    ///
    /// Never fails the walk: anything short of a parsed CRL answer
    /// becomes `Unknown`.
    pub async fn check(&self, cert: &Certificate) -> RevocationOutcome {
        if cert.crl_urls.is_empty() {
            return RevocationOutcome::Unknown(
                "certificate lists no CRL distribution points".to_string(),
            );
        }

        let mut last_reason = String::new();
        for url in &cert.crl_urls {
            match self.crl_bytes(url).await {
                Ok(bytes) => match serial_in_crl(&bytes, cert.serial_raw()) {
                    Ok(true) => return RevocationOutcome::Revoked,
                    Ok(false) => return RevocationOutcome::Good,
                    Err(reason) => last_reason = reason,
                },
                Err(reason) => last_reason = reason,
            }
        }

        RevocationOutcome::Unknown(last_reason)
    }

    /// Obtain CRL bytes for a distribution point URL.
    ///
    /// Online mode fetches and refreshes the cache, falling back to a
    /// cached copy when the fetch fails; offline mode reads the cache
    /// only.
    async fn crl_bytes(&self, url: &str) -> Result<Vec<u8>, String> {
        if self.online {
            match self.fetch(url).await {
                Ok(bytes) => {
                    self.cache_store(url, &bytes);
                    return Ok(bytes);
                }
                Err(reason) => {
                    tracing::debug!(url = %url, "CRL fetch failed, trying cache: {}", reason);
                }
            }
        }
        self.cache_load(url)
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, String> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| e.to_string())?;

        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| format!("CRL download failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("CRL download HTTP {}", response.status()));
        }

        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| format!("failed to read CRL body: {}", e))
    }

    fn cache_path(&self, url: &str) -> PathBuf {
        let digest = hex::encode(Sha256::digest(url.as_bytes()));
        self.cache_dir.join(format!("{}.crl", digest))
    }

    fn cache_store(&self, url: &str, bytes: &[u8]) {
        if let Err(e) = std::fs::create_dir_all(&self.cache_dir)
            .and_then(|_| std::fs::write(self.cache_path(url), bytes))
        {
            tracing::debug!(url = %url, "could not cache CRL: {}", e);
        }
    }

    fn cache_load(&self, url: &str) -> Result<Vec<u8>, String> {
        std::fs::read(self.cache_path(url))
            .map_err(|_| format!("no cached revocation data for {}", url))
    }
}

/// Whether the given serial appears in a DER-encoded CRL
fn serial_in_crl(crl_bytes: &[u8], serial: &[u8]) -> Result<bool, String> {
    let (_, crl) = CertificateRevocationList::from_der(crl_bytes)
        .map_err(|e| format!("failed to parse CRL: {:?}", e))?;

    let wanted = trim_leading_zeros(serial);
    for revoked in crl.iter_revoked_certificates() {
        if trim_leading_zeros(revoked.raw_serial()) == wanted {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Trim leading zero bytes for serial number comparison
fn trim_leading_zeros(bytes: &[u8]) -> &[u8] {
    let pos = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[pos..]
}
