//! blade - a project CLI configured with Pkl
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
//!
//! Blade projects describe themselves in a Pkl module; the CLI evaluates
//! that module through the external `pkl` binary and installs the binary on
//! demand when the host does not have it yet.

pub mod cmd;
pub mod ensure;
pub mod paths;

// Re-exports from the core crate for convenience
pub use blade_core::provision::Provisioner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Name of the external evaluator binary blade depends on.
pub const PKL_BINARY: &str = "pkl";

#[derive(Debug, Parser)]
#[command(name = "blade")]
#[command(author, version = env!("BLADE_VERSION"), about = "blade - a project CLI configured with Pkl")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Assume yes for interactive prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Evaluate a project configuration and print its summary
    Test {
        /// Pkl module to evaluate
        #[arg(default_value = "test.pkl")]
        file: PathBuf,
    },
    /// Print the version and host platform
    Version,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}
