//! Certificate extension labeling and textual rendering
//!
//! Extensions are surfaced with a human-readable label and a non-binary
//! rendering of their value; anything the parser does not recognize falls
//! back to the dotted OID and a hex dump.

use serde::Serialize;
use x509_parser::extensions::{
    AuthorityInfoAccess, CRLDistributionPoints, DistributionPointName, GeneralName,
    ParsedExtension,
};
use x509_parser::prelude::*;

/// One certificate extension, ready for display
#[derive(Debug, Clone, Serialize)]
pub struct CertExtension {
    pub oid: String,
    pub label: String,
    pub value: String,
    pub critical: bool,
}

/// Extract every extension in certificate order
pub(crate) fn extract_all(cert: &X509Certificate) -> Vec<CertExtension> {
    cert.extensions()
        .iter()
        .map(|ext| {
            let oid = ext.oid.to_string();
            CertExtension {
                label: friendly_label(&oid),
                value: render_value(ext),
                critical: ext.critical,
                oid,
            }
        })
        .collect()
}

fn friendly_label(oid: &str) -> String {
    match oid {
        "2.5.29.14" => "Subject Key Identifier",
        "2.5.29.15" => "Key Usage",
        "2.5.29.17" => "Subject Alternative Name",
        "2.5.29.19" => "Basic Constraints",
        "2.5.29.31" => "CRL Distribution Points",
        "2.5.29.32" => "Certificate Policies",
        "2.5.29.35" => "Authority Key Identifier",
        "2.5.29.37" => "Extended Key Usage",
        "1.3.6.1.5.5.7.1.1" => "Authority Information Access",
        "1.3.6.1.4.1.11129.2.4.2" => "CT Precertificate SCTs",
        "1.3.6.1.5.5.7.1.24" => "TLS Feature",
        other => return other.to_string(),
    }
    .to_string()
}

fn render_value(ext: &X509Extension) -> String {
    match ext.parsed_extension() {
        ParsedExtension::BasicConstraints(bc) => {
            let mut text = format!("CA={}", if bc.ca { "TRUE" } else { "FALSE" });
            if let Some(len) = bc.path_len_constraint {
                text.push_str(&format!(", pathlen={}", len));
            }
            text
        }
        ParsedExtension::KeyUsage(ku) => key_usage_names(ku).join(", "),
        ParsedExtension::ExtendedKeyUsage(eku) => {
            let mut purposes = Vec::new();
            if eku.server_auth {
                purposes.push("Server Authentication".to_string());
            }
            if eku.client_auth {
                purposes.push("Client Authentication".to_string());
            }
            if eku.code_signing {
                purposes.push("Code Signing".to_string());
            }
            if eku.email_protection {
                purposes.push("Email Protection".to_string());
            }
            if eku.time_stamping {
                purposes.push("Time Stamping".to_string());
            }
            if eku.ocsp_signing {
                purposes.push("OCSP Signing".to_string());
            }
            for other in &eku.other {
                purposes.push(other.to_string());
            }
            purposes.join(", ")
        }
        ParsedExtension::SubjectAlternativeName(san) => san
            .general_names
            .iter()
            .map(render_general_name)
            .collect::<Vec<_>>()
            .join(", "),
        ParsedExtension::SubjectKeyIdentifier(ski) => hex::encode_upper(ski.0),
        ParsedExtension::AuthorityKeyIdentifier(aki) => aki
            .key_identifier
            .as_ref()
            .map(|id| hex::encode_upper(id.0))
            .unwrap_or_else(|| hex::encode_upper(ext.value)),
        ParsedExtension::CRLDistributionPoints(cdp) => distribution_point_urls(cdp).join(", "),
        ParsedExtension::AuthorityInfoAccess(aia) => aia
            .accessdescs
            .iter()
            .map(|desc| {
                let method = match desc.access_method.to_string().as_str() {
                    "1.3.6.1.5.5.7.48.1" => "OCSP".to_string(),
                    "1.3.6.1.5.5.7.48.2" => "CA Issuers".to_string(),
                    other => other.to_string(),
                };
                format!("{}={}", method, render_general_name(&desc.access_location))
            })
            .collect::<Vec<_>>()
            .join(", "),
        _ => hex::encode_upper(ext.value),
    }
}

fn key_usage_names(ku: &x509_parser::extensions::KeyUsage) -> Vec<String> {
    let mut usages = Vec::new();
    if ku.digital_signature() {
        usages.push("Digital Signature".to_string());
    }
    if ku.non_repudiation() {
        usages.push("Non-Repudiation".to_string());
    }
    if ku.key_encipherment() {
        usages.push("Key Encipherment".to_string());
    }
    if ku.data_encipherment() {
        usages.push("Data Encipherment".to_string());
    }
    if ku.key_agreement() {
        usages.push("Key Agreement".to_string());
    }
    if ku.key_cert_sign() {
        usages.push("Certificate Sign".to_string());
    }
    if ku.crl_sign() {
        usages.push("CRL Sign".to_string());
    }
    usages
}

fn render_general_name(name: &GeneralName) -> String {
    match name {
        GeneralName::DNSName(dns) => dns.to_string(),
        GeneralName::RFC822Name(email) => email.to_string(),
        GeneralName::URI(uri) => uri.to_string(),
        GeneralName::IPAddress(ip) => {
            if ip.len() == 4 {
                format!("{}.{}.{}.{}", ip[0], ip[1], ip[2], ip[3])
            } else if ip.len() == 16 {
                ip.chunks(2)
                    .map(|c| format!("{:02x}{:02x}", c[0], c[1]))
                    .collect::<Vec<_>>()
                    .join(":")
            } else {
                hex::encode_upper(*ip)
            }
        }
        other => format!("{:?}", other),
    }
}

fn distribution_point_urls(cdp: &CRLDistributionPoints) -> Vec<String> {
    let mut urls = Vec::new();
    for dp in cdp.iter() {
        if let Some(DistributionPointName::FullName(names)) = &dp.distribution_point {
            for name in names {
                if let GeneralName::URI(uri) = name {
                    urls.push(uri.to_string());
                }
            }
        }
    }
    urls
}

/// CRL distribution point URLs from the certificate
pub(crate) fn crl_distribution_urls(cert: &X509Certificate) -> Vec<String> {
    for ext in cert.extensions() {
        if ext.oid == x509_parser::oid_registry::OID_X509_EXT_CRL_DISTRIBUTION_POINTS {
            if let Ok((_, cdp)) = CRLDistributionPoints::from_der(ext.value) {
                return distribution_point_urls(&cdp);
            }
        }
    }
    Vec::new()
}

/// AIA caIssuers URLs, used to locate missing intermediates
pub(crate) fn ca_issuer_urls(cert: &X509Certificate) -> Vec<String> {
    let mut urls = Vec::new();
    for ext in cert.extensions() {
        if ext.oid == x509_parser::oid_registry::OID_PKIX_AUTHORITY_INFO_ACCESS {
            if let Ok((_, aia)) = AuthorityInfoAccess::from_der(ext.value) {
                for desc in aia.accessdescs.iter() {
                    // OID 1.3.6.1.5.5.7.48.2 = caIssuers
                    if desc.access_method.to_string() == "1.3.6.1.5.5.7.48.2" {
                        if let GeneralName::URI(uri) = &desc.access_location {
                            urls.push(uri.to_string());
                        }
                    }
                }
            }
        }
    }
    urls
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_cover_common_oids() {
        assert_eq!(friendly_label("2.5.29.19"), "Basic Constraints");
        assert_eq!(friendly_label("2.5.29.17"), "Subject Alternative Name");
        // Unmapped OIDs fall back to the dotted form
        assert_eq!(friendly_label("1.2.3.4.5"), "1.2.3.4.5");
    }
}
