//! Report rendering
//!
//! Turns chain elements into the fixed-order key/value line blocks the
//! tool prints. Field order is part of the tool's contract and must not
//! change.

use crate::chain::ChainElement;
use chrono::SecondsFormat;

/// What the report should include for each element
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    /// Render every chain element instead of just the leaf
    pub include_chain: bool,
    /// Append the certificate extension dump to each block
    pub include_extensions: bool,
    /// Append validation results (IsValid and Status lines)
    pub validate: bool,
}

/// Fixed certificate data format label (the chain carries X.509 only)
const CERTIFICATE_FORMAT: &str = "X509";

/// Render the selected chain elements as report lines.
///
/// Blocks for successive elements are separated by one blank line; a
/// single-leaf report has no separator.
pub fn format_chain(chain: &[ChainElement], options: &ReportOptions) -> Vec<String> {
    let selected: &[ChainElement] = if options.include_chain {
        chain
    } else {
        &chain[..chain.len().min(1)]
    };

    let mut lines = Vec::new();
    for (i, element) in selected.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        format_element(element, options, &mut lines);
    }
    lines
}

/// Render one chain element as a block of key/value lines
fn format_element(element: &ChainElement, options: &ReportOptions, lines: &mut Vec<String>) {
    let cert = &element.certificate;

    let key_size = match (&cert.public_key_algorithm, cert.key_size) {
        (alg, Some(bits)) if alg.reports_key_size() => bits.to_string(),
        _ => "Unknown".to_string(),
    };

    lines.push(format!("Subject: {}", cert.subject));
    lines.push(format!("Issuer: {}", cert.issuer));
    lines.push(format!("FriendlyName: {}", cert.public_key_algorithm.label()));
    lines.push(format!(
        "NotBefore: {}",
        cert.not_before.to_rfc3339_opts(SecondsFormat::Secs, true)
    ));
    lines.push(format!(
        "NotAfter: {}",
        cert.not_after.to_rfc3339_opts(SecondsFormat::Secs, true)
    ));
    lines.push(format!("Format: {}", CERTIFICATE_FORMAT));
    lines.push(format!("SignatureAlgorithm: {}", cert.signature_algorithm));
    lines.push(format!("SerialNumber: {}", cert.serial));
    lines.push(format!("Thumbprint: {}", cert.thumbprint));
    lines.push(format!(
        "HasPrivateKey: {}",
        if cert.has_private_key { "Yes" } else { "No" }
    ));
    lines.push(format!("Version: {}", cert.version));
    lines.push(format!("KeySize: {}", key_size));

    if options.validate {
        lines.push(format!(
            "IsValid: {}",
            if element.is_valid() { "Yes" } else { "No" }
        ));
        if options.include_chain {
            for status in &element.status {
                lines.push(format!("Status: {}", status));
            }
        }
    }

    if options.include_extensions {
        for ext in &cert.extensions {
            lines.push(format!("{}: {}", ext.label, ext.value));
        }
    }
}

/// Number of always-present fields in one report block
pub const FIXED_FIELD_COUNT: usize = 12;
