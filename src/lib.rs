//! cert-inspect library
//!
//! A command-line X.509 certificate inspector providing:
//! - Certificate acquisition from files, folders, and live TLS handshakes
//! - Trust chain construction with selectable revocation policies
//! - Fixed-order human-readable reports
//! - DER, PEM, and PKCS#12 export
//!
//! # Usage
//!
//! ```rust,ignore
//! use cert_inspect::{config::InspectConfig, driver};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let config = InspectConfig::new("example.com");
//!     driver::run_domain(&config).await.unwrap();
//! }
//! ```

pub mod certificate;
pub mod chain;
pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod export;
pub mod report;
pub mod source;

// Re-export commonly used types
pub use cli::Cli;
pub use config::InspectConfig;
pub use error::{InspectError, Result};
