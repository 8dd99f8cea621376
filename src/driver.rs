//! Pipeline driver
//!
//! Sequences acquire → (export) → chain walk → format → emit for each
//! discovered certificate. One invocation handles exactly one logical
//! input; folder inputs run the pipeline once per matched file. Nothing
//! is shared across iterations.

use crate::chain;
use crate::config::InspectConfig;
use crate::error::{AcquisitionError, Result};
use crate::export;
use crate::report::{self, ReportOptions};
use crate::source::{self, Acquired};
use console::style;
use std::path::Path;

/// Run file mode: a single certificate file or a folder of them
pub async fn run_file(config: &InspectConfig) -> Result<()> {
    let path = Path::new(&config.resource);

    if path.is_dir() {
        let files = source::enumerate_files(path, &config.pattern, config.recurse)?;
        for file in files {
            match source::load_file(&file) {
                Ok(acquired) => inspect_one(acquired, config).await?,
                Err(e) => {
                    // One bad file never aborts the traversal
                    if !config.mute_cert_errors {
                        eprintln!(
                            "{} unable to find certificate for {}",
                            style("E:").red().bold(),
                            file.display()
                        );
                    }
                    tracing::debug!(path = %file.display(), "skipped: {}", e);
                }
            }
        }
        return Ok(());
    }

    if !path.is_file() {
        return Err(AcquisitionError::InputNotFound {
            path: config.resource.clone(),
        }
        .into());
    }

    let acquired = source::load_file(path)?;
    inspect_one(acquired, config).await
}

/// Run domain mode: resolve the resource and intercept the handshake
pub async fn run_domain(config: &InspectConfig) -> Result<()> {
    let url = source::resolve_url(&config.resource)?;
    let acquired = source::fetch_domain_certificate(&url, config.handshake_timeout)?;
    inspect_one(acquired, config).await
}

/// Inspect one acquired certificate: export, walk, format, print
async fn inspect_one(acquired: Acquired, config: &InspectConfig) -> Result<()> {
    let Acquired {
        label,
        certificate,
        container,
        intermediates,
        private_key,
    } = acquired;

    if let Some(request) = &config.export {
        let result = export::export_certificate(
            &certificate,
            request.kind,
            request.base_name.as_deref(),
            private_key.as_deref(),
        );
        // Export and report are independent outputs; a failed write
        // never suppresses the report.
        match result {
            Ok(path) => tracing::info!(path = %path.display(), "certificate exported"),
            Err(e) => eprintln!("{} {}", style("E:").red().bold(), e),
        }
    }

    let chain = chain::build_chain(certificate, &intermediates, config).await?;

    if config.json {
        println!("{}", serde_json::to_string_pretty(&chain)?);
        return Ok(());
    }

    if let Some(container) = container {
        println!("File: {}", label);
        println!("Type: {}", container);
    }

    let options = ReportOptions {
        include_chain: config.include_chain,
        include_extensions: config.include_extensions,
        validate: config.policy.validates(),
    };
    for line in report::format_chain(&chain, &options) {
        println!("{}", line);
    }

    Ok(())
}
