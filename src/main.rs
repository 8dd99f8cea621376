//! cert-inspect - X.509 certificate inspector
//!
//! Reports on certificates found in files, folders, or presented by live
//! TLS endpoints, with optional chain validation and multi-format export.

use cert_inspect::cli::{Cli, Commands};
use cert_inspect::error::Result;
use cert_inspect::driver;
use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Install the ring crypto provider for rustls
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    if let Err(e) = run().await {
        eprintln!("{} {}", style("E:").red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        console::set_colors_enabled(false);
    }

    let config = cli.command.to_config();
    match cli.command {
        Commands::File(_) => driver::run_file(&config).await,
        Commands::Domain(_) => driver::run_domain(&config).await,
    }
}
