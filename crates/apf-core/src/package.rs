//! Assembly of the distributable package.
//!
//! [`Package::files`] produces the complete, ordered list of files. Both
//! [`Package::write_files`] and [`Package::write_zip_file`] write that same
//! list, so a loose tree and an archive always hold identical bytes.
//!
//! Layout:
//!
//! ```text
//! Platforms/{id}.json             one per platform
//! Cores/{author}.{name}/
//! ├── core.json
//! ├── info.txt                    only with a non-empty description_long
//! ├── video.json
//! ├── audio.json
//! ├── input.json
//! ├── interact.json
//! ├── data.json
//! ├── variants.json
//! └── core_{id}.rbf_r             one per bitstream, bit-reversed
//! ```

use std::path::{Path, PathBuf};

use apf_schema::ValidationError;
use thiserror::Error;
use tracing::debug;

use crate::bitstream;
use crate::io::output;
use crate::json::to_ascii_pretty;
use crate::manifest;
use crate::metadata::Metadata;

/// Errors that can occur while building or writing a package.
#[derive(Error, Debug)]
pub enum PackageError {
    /// The configuration document violates the schema.
    #[error("Invalid configuration {0}")]
    Validation(#[from] ValidationError),

    /// A manifest could not be converted to or from JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An I/O error occurred while writing the package.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The archive could not be written.
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// A named raw bitstream, as produced by the FPGA toolchain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreImage {
    /// Name listed in `core.json` (truncated to 15 characters there).
    pub name: String,
    /// Raw `.rbf` contents, most significant bit first.
    pub bytes: Vec<u8>,
}

impl CoreImage {
    /// Pair a name with its raw bitstream.
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// One file of the package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageFile {
    /// Path relative to the package root, `/`-separated.
    pub path: String,
    /// File contents.
    pub data: Vec<u8>,
}

impl PackageFile {
    fn new(path: String, data: Vec<u8>) -> Self {
        debug!(path = %path, bytes = data.len(), "emit");
        Self { path, data }
    }
}

/// The ordered file set of a package.
pub type PackageTree = Vec<PackageFile>;

/// A validated core description together with its bitstreams.
#[derive(Debug)]
pub struct Package<'a> {
    metadata: &'a Metadata,
    cores: &'a [CoreImage],
}

impl<'a> Package<'a> {
    /// Combine metadata with bitstreams. Order of `cores` fixes their ids.
    pub fn new(metadata: &'a Metadata, cores: &'a [CoreImage]) -> Self {
        Self { metadata, cores }
    }

    /// The metadata this package is built from.
    pub fn metadata(&self) -> &Metadata {
        self.metadata
    }

    /// Render every file of the package, in loader order.
    ///
    /// # Errors
    ///
    /// Returns [`PackageError::Json`] if a manifest fails to serialize.
    pub fn files(&self) -> Result<PackageTree, PackageError> {
        let meta = self.metadata;
        let mut files = Vec::with_capacity(meta.platforms().len() + 9 + self.cores.len());

        for (id, json) in manifest::platform_jsons(meta) {
            files.push(PackageFile::new(
                format!("Platforms/{id}.json"),
                to_ascii_pretty(&json)?,
            ));
        }

        let dir = meta.core_directory();
        let names: Vec<&str> = self.cores.iter().map(|c| c.name.as_str()).collect();
        files.push(PackageFile::new(
            format!("{dir}/core.json"),
            to_ascii_pretty(&manifest::core_json(meta, &names))?,
        ));

        let info = manifest::info_txt(meta);
        if !info.is_empty() {
            files.push(PackageFile::new(
                format!("{dir}/info.txt"),
                info.as_bytes().to_vec(),
            ));
        }

        let manifests = [
            ("video.json", to_ascii_pretty(&manifest::video_json(meta))?),
            ("audio.json", to_ascii_pretty(&manifest::audio_json())?),
            ("input.json", to_ascii_pretty(&manifest::input_json())?),
            ("interact.json", to_ascii_pretty(&manifest::interact_json())?),
            ("data.json", to_ascii_pretty(&manifest::data_json())?),
            ("variants.json", to_ascii_pretty(&manifest::variants_json())?),
        ];
        for (name, data) in manifests {
            files.push(PackageFile::new(format!("{dir}/{name}"), data));
        }

        for (id, core) in self.cores.iter().enumerate() {
            files.push(PackageFile::new(
                format!("{dir}/{}", manifest::bitstream_filename(id)),
                bitstream::encode(&core.bytes),
            ));
        }

        Ok(files)
    }

    /// Write the package as a loose directory tree under `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails or any file cannot be written.
    pub fn write_files(&self, root: &Path) -> Result<(), PackageError> {
        output::write_tree(&self.files()?, root)
    }

    /// Write the package as a single archive named
    /// [`Metadata::zip_filename`] under `root`, returning its path.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails or the archive cannot be written.
    pub fn write_zip_file(&self, root: &Path) -> Result<PathBuf, PackageError> {
        output::write_archive(&self.files()?, root, &self.metadata.zip_filename())
    }
}
