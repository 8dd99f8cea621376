//! Run configuration
//!
//! One immutable [`InspectConfig`] is built from the parsed command line
//! and passed by reference into every component. No global option state.

use crate::chain::ValidationPolicy;
use crate::export::ExportKind;
use std::path::PathBuf;
use std::time::Duration;

/// Default timeout for the domain-mode handshake
pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(120);

/// Default timeout for a single revocation fetch under online validation
pub const REVOCATION_TIMEOUT: Duration = Duration::from_secs(60);

/// Requested certificate export
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub kind: ExportKind,
    /// Destination base name; defaults to the certificate serial number
    pub base_name: Option<String>,
}

/// Immutable configuration for one inspector run
#[derive(Debug, Clone)]
pub struct InspectConfig {
    /// Input file, folder, url, or domain
    pub resource: String,
    /// Folder search pattern (`*` and `?` wildcards only)
    pub pattern: String,
    /// Recurse into subdirectories when the input is a folder
    pub recurse: bool,
    /// Show every chain element instead of just the leaf
    pub include_chain: bool,
    /// Append the certificate extension dump to each block
    pub include_extensions: bool,
    /// Chain validation mode, fixed for the whole run
    pub policy: ValidationPolicy,
    /// Suppress per-file certificate error messages in folder mode
    pub mute_cert_errors: bool,
    /// Export the certificate alongside the report
    pub export: Option<ExportRequest>,
    /// Emit the chain as JSON instead of the text report
    pub json: bool,
    /// Directory holding cached revocation data
    pub cache_dir: PathBuf,
    pub handshake_timeout: Duration,
    pub revocation_timeout: Duration,
}

impl InspectConfig {
    /// Build a configuration with stock timeouts and cache location
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            pattern: "*".to_string(),
            recurse: false,
            include_chain: false,
            include_extensions: false,
            policy: ValidationPolicy::NoCheck,
            mute_cert_errors: false,
            export: None,
            json: false,
            cache_dir: default_cache_dir(),
            handshake_timeout: HANDSHAKE_TIMEOUT,
            revocation_timeout: REVOCATION_TIMEOUT,
        }
    }
}

/// Per-user cache directory, falling back to the system temp dir
pub fn default_cache_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "cert-inspect")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join("cert-inspect"))
}
