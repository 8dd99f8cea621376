//! Live TLS certificate interception
//!
//! Opens an HTTPS connection to the resolved host and captures the
//! server's presented chain during the handshake instead of validating
//! it. The accept-all behavior is confined to [`CapturingVerifier`],
//! which exists for exactly one request.

use super::Acquired;
use crate::certificate::Certificate;
use crate::error::AcquisitionError;
use rustls::pki_types::ServerName;
use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

const MAX_HEADER_BYTES: usize = 16 * 1024;

/// Resolve an input string to an absolute URL.
///
/// Bare domains are retried with an `https://` prefix; any absolute URI
/// with a host is accepted as-is, even for non-TLS schemes (the
/// handshake will then simply fail to produce a certificate).
pub fn resolve_url(resource: &str) -> Result<Url, AcquisitionError> {
    if let Ok(url) = Url::parse(resource) {
        if url.host_str().is_some() {
            return Ok(url);
        }
    }
    match Url::parse(&format!("https://{}", resource)) {
        Ok(url) if url.host_str().is_some() => Ok(url),
        _ => Err(AcquisitionError::UnresolvableAddress {
            resource: resource.to_string(),
        }),
    }
}

/// Fetch the certificate presented by the endpoint behind `url`.
///
/// Performs a TLS handshake with an accept-all capturing verifier, sends
/// a HEAD request, and reads only the response headers. Connection-level
/// failures are `HandshakeFailed`; a completed call that captured no
/// certificate is `NoCertificateObtained`.
pub fn fetch_domain_certificate(
    url: &Url,
    timeout: Duration,
) -> Result<Acquired, AcquisitionError> {
    let endpoint = url.to_string();
    let host = url
        .host_str()
        .ok_or_else(|| AcquisitionError::UnresolvableAddress {
            resource: endpoint.clone(),
        })?
        .trim_start_matches('[')
        .trim_end_matches(']')
        .to_string();
    let port = url.port_or_known_default().unwrap_or(443);

    let verifier = Arc::new(CapturingVerifier::default());
    let config = rustls::ClientConfig::builder()
        .dangerous()
        .with_custom_certificate_verifier(verifier.clone())
        .with_no_client_auth();

    let server_name: ServerName<'static> = host.clone().try_into().map_err(|_| {
        AcquisitionError::HandshakeFailed {
            endpoint: endpoint.clone(),
            message: format!("invalid server name '{}'", host),
        }
    })?;

    let mut conn = rustls::ClientConnection::new(Arc::new(config), server_name).map_err(|e| {
        AcquisitionError::HandshakeFailed {
            endpoint: endpoint.clone(),
            message: e.to_string(),
        }
    })?;

    let socket_addr = (host.as_str(), port)
        .to_socket_addrs()
        .map_err(|e| AcquisitionError::HandshakeFailed {
            endpoint: endpoint.clone(),
            message: format!("failed to resolve {}:{}: {}", host, port, e),
        })?
        .next()
        .ok_or_else(|| AcquisitionError::HandshakeFailed {
            endpoint: endpoint.clone(),
            message: format!("no addresses found for {}:{}", host, port),
        })?;

    let mut sock = TcpStream::connect_timeout(&socket_addr, timeout).map_err(|e| {
        AcquisitionError::HandshakeFailed {
            endpoint: endpoint.clone(),
            message: format!("failed to connect to {}: {}", socket_addr, e),
        }
    })?;
    sock.set_read_timeout(Some(timeout))
        .and_then(|_| sock.set_write_timeout(Some(timeout)))
        .map_err(|e| AcquisitionError::HandshakeFailed {
            endpoint: endpoint.clone(),
            message: e.to_string(),
        })?;

    // The handshake runs as a side effect of the first write/read. From
    // here on the capture slot decides the outcome; I/O failures after
    // capture still leave a usable certificate.
    let mut tls = rustls::Stream::new(&mut conn, &mut sock);
    let request = format!(
        "HEAD {} HTTP/1.1\r\nHost: {}\r\nUser-Agent: cert-inspect\r\nConnection: close\r\n\r\n",
        url.path(),
        host,
    );
    let io_result = tls
        .write_all(request.as_bytes())
        .and_then(|_| tls.flush())
        .and_then(|_| read_response_headers(&mut tls));
    if let Err(e) = &io_result {
        tracing::debug!(endpoint = %endpoint, "request did not complete: {}", e);
    }

    let chain = verifier
        .take()
        .ok_or(AcquisitionError::NoCertificateObtained {
            endpoint: endpoint.clone(),
        })?;

    let mut ders = chain.into_iter();
    let leaf_der = ders.next().ok_or(AcquisitionError::NoCertificateObtained {
        endpoint: endpoint.clone(),
    })?;
    let certificate =
        Certificate::from_der(leaf_der).map_err(|e| AcquisitionError::NotACertificate {
            path: endpoint.clone(),
            message: e.message,
        })?;

    tracing::debug!(endpoint = %endpoint, "captured server certificate");

    Ok(Acquired {
        label: endpoint,
        certificate,
        container: None,
        intermediates: ders.collect(),
        private_key: None,
    })
}

/// Read until the end of the HTTP response headers; the body is never fetched
fn read_response_headers<R: Read>(stream: &mut R) -> std::io::Result<()> {
    let mut seen = Vec::new();
    let mut buf = [0u8; 1024];
    loop {
        let n = stream.read(&mut buf)?;
        if n == 0 {
            return Ok(());
        }
        seen.extend_from_slice(&buf[..n]);
        if seen.windows(4).any(|w| w == b"\r\n\r\n") || seen.len() >= MAX_HEADER_BYTES {
            return Ok(());
        }
    }
}

/// Accept-all certificate verifier that records the presented chain.
///
/// This intentionally bypasses trust enforcement: the goal is
/// inspection, not a secure connection. The bypass is scoped to the one
/// connection this verifier instance is installed on.
#[derive(Debug, Default)]
struct CapturingVerifier {
    captured: Mutex<Option<Vec<Vec<u8>>>>,
}

impl CapturingVerifier {
    fn take(&self) -> Option<Vec<Vec<u8>>> {
        self.captured.lock().ok().and_then(|mut slot| slot.take())
    }
}

impl rustls::client::danger::ServerCertVerifier for CapturingVerifier {
    fn verify_server_cert(
        &self,
        end_entity: &rustls::pki_types::CertificateDer<'_>,
        intermediates: &[rustls::pki_types::CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: rustls::pki_types::UnixTime,
    ) -> std::result::Result<rustls::client::danger::ServerCertVerified, rustls::Error> {
        let mut chain = vec![end_entity.as_ref().to_vec()];
        chain.extend(intermediates.iter().map(|c| c.as_ref().to_vec()));
        if let Ok(mut slot) = self.captured.lock() {
            *slot = Some(chain);
        }
        Ok(rustls::client::danger::ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> std::result::Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> std::result::Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<rustls::SignatureScheme> {
        vec![
            rustls::SignatureScheme::RSA_PKCS1_SHA256,
            rustls::SignatureScheme::RSA_PKCS1_SHA384,
            rustls::SignatureScheme::RSA_PKCS1_SHA512,
            rustls::SignatureScheme::ECDSA_NISTP256_SHA256,
            rustls::SignatureScheme::ECDSA_NISTP384_SHA384,
            rustls::SignatureScheme::ECDSA_NISTP521_SHA512,
            rustls::SignatureScheme::RSA_PSS_SHA256,
            rustls::SignatureScheme::RSA_PSS_SHA384,
            rustls::SignatureScheme::RSA_PSS_SHA512,
            rustls::SignatureScheme::ED25519,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_domain_gets_https_prefix() {
        let url = resolve_url("example.com").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("example.com"));
    }

    #[test]
    fn absolute_uri_is_accepted_as_is() {
        let url = resolve_url("ftp://x").unwrap();
        assert_eq!(url.scheme(), "ftp");
        assert_eq!(url.host_str(), Some("x"));
    }

    #[test]
    fn unparseable_input_is_rejected() {
        assert!(matches!(
            resolve_url("exa mple.com"),
            Err(AcquisitionError::UnresolvableAddress { .. })
        ));
    }

    #[test]
    fn scheme_like_input_without_host_is_reinterpreted() {
        // "localhost:8443" parses as scheme "localhost" with no host
        let url = resolve_url("localhost:8443").unwrap();
        assert_eq!(url.host_str(), Some("localhost"));
        assert_eq!(url.port(), Some(8443));
    }
}
