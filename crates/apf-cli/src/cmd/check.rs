//! Check command

use std::path::Path;

use anyhow::Result;
use crossterm::style::Stylize;

use crate::load::load_metadata;

/// Validate a core description and summarize it.
pub fn check(config: &Path) -> Result<()> {
    let meta = load_metadata(config)?;

    println!("{} {}", "✓".green(), "Core description is valid".bold());

    let lw = 12;
    println!("  {:<lw$}{}.{}", "core", meta.author(), meta.name());
    println!("  {:<lw$}{}", "version", meta.version());
    if meta.release_date_defaulted() {
        println!(
            "  {:<lw$}{} {}",
            "released",
            meta.release_date(),
            "(today, release_date not set)".dark_grey()
        );
    } else {
        println!("  {:<lw$}{}", "released", meta.release_date());
    }

    let ids: Vec<&str> = meta.platforms().iter().map(|p| p.id.as_str()).collect();
    if !ids.is_empty() {
        println!("  {:<lw$}{}", "platforms", ids.join(", "));
    }
    for mode in meta.video_modes() {
        println!(
            "  {:<lw$}{}x{} rotation {}",
            "video", mode.width, mode.height, mode.rotation
        );
    }

    Ok(())
}
