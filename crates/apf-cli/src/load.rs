//! Loading of core descriptions and bitstreams from disk.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};
use apf_core::{CoreImage, Metadata, PackageError};
use serde_json::Value;

/// A bitstream given on the command line as `NAME=PATH` or `PATH`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreSpec {
    /// Name listed in `core.json`.
    pub name: String,
    /// Location of the raw `.rbf` file.
    pub path: PathBuf,
}

impl FromStr for CoreSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((name, path)) = s.split_once('=') {
            if name.is_empty() || path.is_empty() {
                return Err(format!("expected NAME=PATH, got '{s}'"));
            }
            return Ok(Self {
                name: name.to_string(),
                path: PathBuf::from(path),
            });
        }

        let path = PathBuf::from(s);
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .filter(|stem| !stem.is_empty())
            .ok_or_else(|| format!("cannot derive a core name from '{s}'"))?;
        Ok(Self { name, path })
    }
}

/// Convert a parsed TOML value into the JSON document model.
///
/// Date and time literals become their RFC 3339 text.
pub fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(key, value)| (key, toml_to_json(value)))
                .collect(),
        ),
    }
}

/// Read `analogue.toml` into the document model without validating it.
pub fn load_document(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let table: toml::Table = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(toml_to_json(toml::Value::Table(table)))
}

/// Read and validate `analogue.toml`.
pub fn load_metadata(path: &Path) -> Result<Metadata> {
    let document = load_document(path)?;
    Metadata::from_document(&document).map_err(|err| match err {
        PackageError::Validation(err) => anyhow!(
            "Error in `{}` at `{}`: {}",
            path.display(),
            err.path,
            err.message
        ),
        other => anyhow::Error::new(other)
            .context(format!("Failed to load {}", path.display())),
    })
}

/// Read every bitstream, keeping command-line order.
pub fn load_cores(specs: &[CoreSpec]) -> Result<Vec<CoreImage>> {
    let mut seen = HashSet::new();
    let mut cores = Vec::with_capacity(specs.len());
    for spec in specs {
        if !seen.insert(spec.name.as_str()) {
            bail!("Core '{}' given more than once", spec.name);
        }
        let bytes = std::fs::read(&spec.path)
            .with_context(|| format!("Failed to read bitstream {}", spec.path.display()))?;
        tracing::debug!(name = %spec.name, bytes = bytes.len(), "loaded bitstream");
        cores.push(CoreImage::new(spec.name.clone(), bytes));
    }
    Ok(cores)
}
