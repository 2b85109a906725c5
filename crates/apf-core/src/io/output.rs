//! Materialization of a rendered package.
//!
//! Both writers take the same ordered [`PackageFile`] list. Archives are
//! written uncompressed with a fixed 1980-01-01 timestamp on every member, so
//! identical inputs produce identical archive bytes.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::package::{PackageError, PackageFile};

/// Write every file under `root`, creating parent directories and
/// overwriting existing files.
///
/// # Errors
///
/// Returns [`PackageError::Io`] on the first file that cannot be written.
/// Files written before the failure are left in place.
pub fn write_tree(files: &[PackageFile], root: &Path) -> Result<(), PackageError> {
    for file in files {
        let dest = root.join(&file.path);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&dest, &file.data)?;
        debug!(path = %dest.display(), "wrote");
    }
    info!(root = %root.display(), files = files.len(), "package tree written");
    Ok(())
}

/// Write every file as a member of the archive `root/filename`, replacing
/// any existing archive. Returns the archive path.
///
/// # Errors
///
/// Returns [`PackageError::Io`] or [`PackageError::Zip`] if the archive
/// cannot be created or written.
pub fn write_archive(
    files: &[PackageFile],
    root: &Path,
    filename: &str,
) -> Result<PathBuf, PackageError> {
    fs::create_dir_all(root)?;
    let path = root.join(filename);

    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .last_modified_time(DateTime::default())
        .unix_permissions(0o644);

    let mut archive = ZipWriter::new(File::create(&path)?);
    for file in files {
        archive.start_file(file.path.as_str(), options)?;
        archive.write_all(&file.data)?;
        debug!(member = %file.path, "archived");
    }
    archive.finish()?;

    info!(archive = %path.display(), files = files.len(), "package archive written");
    Ok(path)
}
