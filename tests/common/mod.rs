//! Shared fixtures: throwaway certificates minted with rcgen

#![allow(dead_code)]

use rcgen::{BasicConstraints, CertificateParams, DnType, IsCa, KeyPair};

pub const LEAF_CN: &str = "test.example.com";
pub const CA_CN: &str = "cert-inspect test CA";

/// A leaf certificate issued by a self-signed CA
pub struct TestChain {
    pub leaf_der: Vec<u8>,
    pub leaf_pem: String,
    pub leaf_key_pem: String,
    pub leaf_key_der: Vec<u8>,
    pub ca_der: Vec<u8>,
    pub ca_pem: String,
}

pub fn issued_chain() -> TestChain {
    let ca_key = KeyPair::generate().unwrap();
    let mut ca_params = CertificateParams::new(Vec::new()).unwrap();
    ca_params
        .distinguished_name
        .push(DnType::CommonName, CA_CN);
    ca_params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    let ca_cert = ca_params.self_signed(&ca_key).unwrap();

    let leaf_key = KeyPair::generate().unwrap();
    let mut leaf_params = CertificateParams::new(vec![LEAF_CN.to_string()]).unwrap();
    leaf_params
        .distinguished_name
        .push(DnType::CommonName, LEAF_CN);
    let leaf_cert = leaf_params.signed_by(&leaf_key, &ca_cert, &ca_key).unwrap();

    TestChain {
        leaf_der: leaf_cert.der().as_ref().to_vec(),
        leaf_pem: leaf_cert.pem(),
        leaf_key_pem: leaf_key.serialize_pem(),
        leaf_key_der: leaf_key.serialize_der(),
        ca_der: ca_cert.der().as_ref().to_vec(),
        ca_pem: ca_cert.pem(),
    }
}

/// A standalone self-signed certificate
pub fn self_signed(cn: &str) -> (Vec<u8>, String) {
    let key = KeyPair::generate().unwrap();
    let mut params = CertificateParams::new(vec![cn.to_string()]).unwrap();
    params.distinguished_name.push(DnType::CommonName, cn);
    let cert = params.self_signed(&key).unwrap();
    (cert.der().as_ref().to_vec(), cert.pem())
}

/// A self-signed certificate whose validity window is long past
pub fn expired_self_signed(cn: &str) -> Vec<u8> {
    let key = KeyPair::generate().unwrap();
    let mut params = CertificateParams::new(vec![cn.to_string()]).unwrap();
    params.distinguished_name.push(DnType::CommonName, cn);
    params.not_before = rcgen::date_time_ymd(2020, 1, 1);
    params.not_after = rcgen::date_time_ymd(2021, 1, 1);
    params.self_signed(&key).unwrap().der().as_ref().to_vec()
}

/// A self-signed certificate using an algorithm the report does not
/// size (Ed25519)
pub fn ed25519_self_signed(cn: &str) -> Vec<u8> {
    let key = KeyPair::generate_for(&rcgen::PKCS_ED25519).unwrap();
    let mut params = CertificateParams::new(vec![cn.to_string()]).unwrap();
    params.distinguished_name.push(DnType::CommonName, cn);
    params.self_signed(&key).unwrap().der().as_ref().to_vec()
}
