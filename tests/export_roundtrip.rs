//! Export round-trips: DER, PEM, and PFX artifacts

mod common;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use cert_inspect::certificate::Certificate;
use cert_inspect::export::{export_certificate, ExportKind};
use cert_inspect::source::{load_file, ContainerType};

fn base_in(dir: &std::path::Path, name: &str) -> String {
    dir.join(name).to_string_lossy().to_string()
}

#[test]
fn der_export_round_trips_thumbprint() {
    let chain = common::issued_chain();
    let cert = Certificate::from_der(chain.leaf_der.clone()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let base = base_in(dir.path(), "exported");
    let path = export_certificate(&cert, ExportKind::Der, Some(&base), None).unwrap();
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("der"));

    let written = std::fs::read(&path).unwrap();
    let reparsed = Certificate::from_der(written).unwrap();
    assert_eq!(reparsed.thumbprint, cert.thumbprint);
}

#[test]
fn pem_export_decodes_back_to_der() {
    let chain = common::issued_chain();
    let cert = Certificate::from_der(chain.leaf_der.clone()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let base = base_in(dir.path(), "exported");
    let path = export_certificate(&cert, ExportKind::Pem, Some(&base), None).unwrap();
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("pem"));

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("-----BEGIN CERTIFICATE-----"));
    assert!(text.trim_end().ends_with("-----END CERTIFICATE-----"));

    let body: String = text
        .lines()
        .filter(|l| !l.starts_with("-----"))
        .collect();
    let decoded = STANDARD.decode(body).unwrap();
    assert_eq!(decoded, chain.leaf_der);
}

#[test]
fn pfx_export_reads_back_with_key_material() {
    let chain = common::issued_chain();
    let mut cert = Certificate::from_der(chain.leaf_der.clone()).unwrap();
    cert.has_private_key = true;

    let dir = tempfile::tempdir().unwrap();
    let base = base_in(dir.path(), "exported");
    let path = export_certificate(
        &cert,
        ExportKind::Pfx,
        Some(&base),
        Some(&chain.leaf_key_der),
    )
    .unwrap();
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("pfx"));

    let acquired = load_file(&path).unwrap();
    assert_eq!(acquired.container, Some(ContainerType::Pkcs12));
    assert!(acquired.certificate.has_private_key);
    assert_eq!(acquired.certificate.thumbprint, cert.thumbprint);
}

#[test]
fn pfx_export_works_without_a_key() {
    let chain = common::issued_chain();
    let cert = Certificate::from_der(chain.ca_der.clone()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let base = base_in(dir.path(), "ca-only");
    let path = export_certificate(&cert, ExportKind::Pfx, Some(&base), None).unwrap();

    let acquired = load_file(&path).unwrap();
    assert_eq!(acquired.container, Some(ContainerType::Pkcs12));
    assert!(!acquired.certificate.has_private_key);
}

#[test]
fn default_base_name_is_the_serial_number() {
    let (der, _) = common::self_signed("serial.example.com");
    let cert = Certificate::from_der(der).unwrap();

    let dir = tempfile::tempdir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();
    let path = export_certificate(&cert, ExportKind::Der, None, None).unwrap();

    assert_eq!(
        path.file_name().and_then(|n| n.to_str()),
        Some(format!("{}.der", cert.serial).as_str())
    );
    assert!(dir.path().join(&path).exists());
}

#[test]
fn export_overwrites_existing_artifacts() {
    let chain = common::issued_chain();
    let cert = Certificate::from_der(chain.leaf_der.clone()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let base = base_in(dir.path(), "overwrite");
    std::fs::write(format!("{}.der", base), b"old contents").unwrap();

    let path = export_certificate(&cert, ExportKind::Der, Some(&base), None).unwrap();
    let written = std::fs::read(&path).unwrap();
    assert_eq!(written, chain.leaf_der);
}
