//! Unified error types for cert-inspect

use thiserror::Error;

/// Top-level error type for a cert-inspect run
#[derive(Error, Debug)]
pub enum InspectError {
    #[error("{0}")]
    Acquisition(#[from] AcquisitionError),

    #[error("chain walk failed: {0}")]
    Chain(#[from] ChainError),

    #[error("export failed: {0}")]
    Export(#[from] ExportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures while turning an input descriptor into a certificate.
///
/// Recoverable per-file in folder mode; fatal for single-file and
/// domain inputs.
#[derive(Error, Debug)]
pub enum AcquisitionError {
    #[error("no certificate recognized in {path}: {message}")]
    NotACertificate { path: String, message: String },

    #[error("folder does not exist: {path}")]
    FolderNotFound { path: String },

    #[error("cannot find '{path}'")]
    InputNotFound { path: String },

    #[error("unrecognized domain or uri {resource}")]
    UnresolvableAddress { resource: String },

    #[error("handshake with {endpoint} failed: {message}")]
    HandshakeFailed { endpoint: String, message: String },

    #[error("unable to acquire certificate for {endpoint}")]
    NoCertificateObtained { endpoint: String },

    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },
}

/// Certificate parse failure, independent of where the bytes came from
#[derive(Error, Debug)]
#[error("failed to parse certificate: {message}")]
pub struct CertificateError {
    pub message: String,
}

impl CertificateError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failures while building or evaluating the trust chain.
///
/// Missing revocation data is not an error; it downgrades the affected
/// element's status instead.
#[derive(Error, Debug)]
pub enum ChainError {
    #[error("failed to parse chain certificate: {message}")]
    Parse { message: String },
}

impl From<CertificateError> for ChainError {
    fn from(err: CertificateError) -> Self {
        ChainError::Parse {
            message: err.message,
        }
    }
}

/// Failures while writing an export artifact
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("PKCS#12 packaging failed: {message}")]
    Pkcs12 { message: String },
}

pub type Result<T> = std::result::Result<T, InspectError>;
