//! CLI argument definitions using clap

use crate::chain::ValidationPolicy;
use crate::config::{ExportRequest, InspectConfig};
use crate::export::ExportKind;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cert-inspect")]
#[command(version)]
#[command(about = "X.509 certificate inspector for files, folders, and live domains", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Certificate info for a file or folder
    File(FileArgs),

    /// Certificate info for a url or domain
    Domain(DomainArgs),
}

#[derive(Args)]
pub struct FileArgs {
    /// Input file or folder
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Folder search pattern; `*` matches zero or more characters,
    /// `?` matches zero or one
    #[arg(short = 's', long, value_name = "PATTERN")]
    pub pattern: Option<String>,

    /// Recurse folders when the input is a folder
    #[arg(short, long)]
    pub recurse: bool,

    /// Suppress certificate error messages
    #[arg(short = 'q', long)]
    pub quiet_errors: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Args)]
pub struct DomainArgs {
    /// Url or domain to inspect
    #[arg(value_name = "RESOURCE")]
    pub resource: String,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Args)]
pub struct CommonArgs {
    /// Also show the certificate chain
    #[arg(short = 'c', long)]
    pub chain: bool,

    /// Also show certificate extensions
    #[arg(short = 'e', long)]
    pub extensions: bool,

    /// Validate the certificate chain (online revocation checking)
    #[arg(short = 'v', long, conflicts_with = "validate_offline")]
    pub validate: bool,

    /// Validate the certificate chain offline only (cached revocation data)
    #[arg(long = "validate-offline")]
    pub validate_offline: bool,

    /// Export the certificate, optionally naming the output file
    /// (defaults to the certificate serial number)
    #[arg(short = 'x', long, value_name = "FILE", num_args = 0..=1)]
    pub export: Option<Option<String>>,

    /// Export encoding
    #[arg(long = "export-type", value_enum, default_value_t = ExportKind::Der, value_name = "TYPE")]
    pub export_type: ExportKind,

    /// Emit the chain as JSON instead of the text report
    #[arg(long)]
    pub json: bool,
}

impl CommonArgs {
    fn policy(&self) -> ValidationPolicy {
        if self.validate_offline {
            ValidationPolicy::OfflineFull
        } else if self.validate {
            ValidationPolicy::OnlineFull
        } else {
            ValidationPolicy::NoCheck
        }
    }

    fn export_request(&self) -> Option<ExportRequest> {
        self.export.as_ref().map(|name| ExportRequest {
            kind: self.export_type,
            base_name: name.clone(),
        })
    }

    fn apply(&self, config: &mut InspectConfig) {
        config.include_chain = self.chain;
        config.include_extensions = self.extensions;
        config.policy = self.policy();
        config.export = self.export_request();
        config.json = self.json;
    }
}

impl Commands {
    /// Build the immutable run configuration for this invocation
    pub fn to_config(&self) -> InspectConfig {
        match self {
            Commands::File(args) => {
                let mut config = InspectConfig::new(args.path.clone());
                if let Some(pattern) = &args.pattern {
                    if !pattern.trim().is_empty() {
                        config.pattern = pattern.clone();
                    }
                }
                config.recurse = args.recurse;
                config.mute_cert_errors = args.quiet_errors;
                args.common.apply(&mut config);
                config
            }
            Commands::Domain(args) => {
                let mut config = InspectConfig::new(args.resource.clone());
                args.common.apply(&mut config);
                config
            }
        }
    }
}
