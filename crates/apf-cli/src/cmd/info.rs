//! Info command

use std::path::Path;

use anyhow::{Context, Result};
use apf_core::Package;
use crossterm::style::Stylize;

use crate::load::{CoreSpec, load_cores, load_metadata};
use crate::ui::format_size;

/// Print the files a build would produce, in write order.
pub fn info(config: &Path, cores: &[CoreSpec]) -> Result<()> {
    let meta = load_metadata(config)?;
    let images = load_cores(cores)?;
    let files = Package::new(&meta, &images)
        .files()
        .context("Failed to render package")?;

    println!();
    println!(
        "  {} {}",
        format!("{}.{}", meta.author(), meta.name()).white().bold(),
        meta.version().dark_grey()
    );
    println!("  {}", meta.zip_filename().dark_grey());
    println!();

    let width = files.iter().map(|f| f.path.len()).max().unwrap_or(0);
    let mut total = 0u64;
    for file in &files {
        let size = file.data.len() as u64;
        total += size;
        println!("  {:<width$}  {:>10}", file.path, format_size(size));
    }
    println!();
    println!("  {} files, {}", files.len(), format_size(total));

    Ok(())
}
