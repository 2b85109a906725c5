//! Core library for building Analogue Pocket core packages.
//!
//! Pipeline:
//!
//! ```text
//! document --validate--> Metadata --+--> manifests --+
//!                                   |                +--> Package::files --> tree | zip
//! raw .rbf bitstreams --encode------+----------------+
//! ```
//!
//! ```no_run
//! use apf_core::{CoreImage, Metadata, Package};
//! # fn demo(document: serde_json::Value, rbf: Vec<u8>) -> Result<(), apf_core::PackageError> {
//! let metadata = Metadata::from_document(&document)?;
//! let cores = [CoreImage::new("main", rbf)];
//! Package::new(&metadata, &cores).write_files(std::path::Path::new("dist"))?;
//! # Ok(())
//! # }
//! ```

pub mod bitstream;
pub mod io;
pub mod json;
pub mod manifest;
pub mod metadata;
pub mod package;

pub use metadata::Metadata;
pub use package::{CoreImage, Package, PackageError, PackageFile, PackageTree};
