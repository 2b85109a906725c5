//! apf - package FPGA cores for the Analogue Pocket
//!
//! Reads an `analogue.toml` core description plus the raw `.rbf` bitstreams
//! produced by the FPGA toolchain and writes the directory layout (or zip
//! archive) the Pocket loader expects.
//!
//! # Output Layout
//!
//! ```text
//! <output>/
//! ├── Platforms/<id>.json
//! └── Cores/<author>.<name>/
//!     ├── core.json, video.json, audio.json, input.json,
//!     ├── interact.json, data.json, variants.json, [info.txt]
//!     └── core_<n>.rbf_r
//! ```
#![allow(clippy::missing_errors_doc)]

pub mod cmd;
pub mod load;
pub mod ui;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use load::CoreSpec;

/// Command-line interface.
#[derive(Debug, Parser)]
#[command(name = "apf")]
#[command(author, version = env!("APF_VERSION"), about = "apf - package FPGA cores for the Analogue Pocket")]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate a core description
    Check {
        /// Path to `analogue.toml`
        config: PathBuf,
    },
    /// Build a package from a core description and bitstreams
    Build {
        /// Path to `analogue.toml`
        config: PathBuf,
        /// Bitstream to include, as NAME=PATH (or PATH, named after the file stem).
        /// Order determines the core id.
        #[arg(long = "core", value_name = "NAME=PATH")]
        cores: Vec<CoreSpec>,
        /// Directory to write the package (or archive) into
        #[arg(short, long, env = "APF_OUTPUT_DIR", default_value = ".")]
        output: PathBuf,
        /// Write a single zip archive instead of a directory tree
        #[arg(long, env = "APF_ZIP")]
        zip: bool,
    },
    /// List the files a build would produce, without writing anything
    Info {
        /// Path to `analogue.toml`
        config: PathBuf,
        /// Bitstream to include, as NAME=PATH (or PATH)
        #[arg(long = "core", value_name = "NAME=PATH")]
        cores: Vec<CoreSpec>,
    },
}
