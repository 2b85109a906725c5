//! Build command

use std::path::Path;

use anyhow::{Context, Result};
use apf_core::Package;
use crossterm::style::Stylize;
use tracing::warn;

use crate::load::{CoreSpec, load_cores, load_metadata};

/// Build a package into `output`, as a directory tree or a zip archive.
pub fn build(config: &Path, cores: &[CoreSpec], output: &Path, zip: bool) -> Result<()> {
    let meta = load_metadata(config)?;
    if meta.release_date_defaulted() {
        warn!(
            release_date = meta.release_date(),
            "metadata.core.release_date not set, using today's date; the package is not reproducible"
        );
    }

    let images = load_cores(cores)?;
    let package = Package::new(&meta, &images);

    if zip {
        let path = package
            .write_zip_file(output)
            .with_context(|| format!("Failed to write package archive into {}", output.display()))?;
        println!("{} {}", "Built".green().bold(), path.display());
    } else {
        package
            .write_files(output)
            .with_context(|| format!("Failed to write package into {}", output.display()))?;
        println!(
            "{} {}",
            "Built".green().bold(),
            output.join(package.metadata().core_directory()).display()
        );
    }

    Ok(())
}
