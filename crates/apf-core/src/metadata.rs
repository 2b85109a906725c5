//! Typed view over a validated `analogue.toml` document.
//!
//! [`Metadata::from_document`] validates the document once and populates a
//! plain immutable structure. All defaulting happens there:
//!
//! | Field | Default when absent |
//! |---|---|
//! | `metadata.core.release_date` | today (local time), `YYYY-MM-DD` |
//! | `core.sleep_supported` | `false` |
//! | `video.mode[].pixel_width` / `pixel_height` | `1` / `1` |
//! | `video.mode[].rotation` | `0` |
//! | `video.mode[].mirror_horizontal` / `mirror_vertical` | `false` |
//!
//! Optional strings (`category`, `description`, `description_long`, `url`)
//! stay `None`.
//!
//! The release date default reads the wall clock, so two builds of the same
//! document on different days differ. Use [`Metadata::release_date_defaulted`]
//! to detect this.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::package::PackageError;

/// Format of release dates, both in the document and in manifests.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A platform the core targets.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Platform {
    /// Identifier; also names `Platforms/{id}.json`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Manufacturer of the original hardware.
    pub manufacturer: String,
    /// Release year of the original hardware.
    pub year: i64,
    /// Optional category.
    pub category: Option<String>,
}

/// Options from the top-level `[core]` table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoreOptions {
    /// Whether the core supports sleep/resume.
    pub sleep_supported: bool,
}

/// A supported video mode, defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoMode {
    /// Active width in pixels.
    pub width: u32,
    /// Active height in pixels.
    pub height: u32,
    /// Pixel aspect numerator.
    pub pixel_width: u64,
    /// Pixel aspect denominator.
    pub pixel_height: u64,
    /// Rotation in degrees.
    pub rotation: u32,
    /// Mirror left/right.
    pub mirror_horizontal: bool,
    /// Mirror top/bottom.
    pub mirror_vertical: bool,
    /// Opaque scaler configuration, carried unchanged.
    pub configuration: Option<Map<String, Value>>,
}

#[derive(Deserialize)]
struct Document {
    metadata: MetadataSection,
    #[serde(default)]
    core: OptionsSection,
    video: VideoSection,
}

#[derive(Deserialize)]
struct MetadataSection {
    platform: Vec<Platform>,
    core: CoreSection,
}

#[derive(Deserialize)]
struct CoreSection {
    author: String,
    name: String,
    version: String,
    description: Option<String>,
    description_long: Option<String>,
    url: Option<String>,
    release_date: Option<String>,
}

#[derive(Deserialize, Default)]
struct OptionsSection {
    sleep_supported: Option<bool>,
}

#[derive(Deserialize)]
struct VideoSection {
    mode: Vec<VideoModeSection>,
}

#[derive(Deserialize)]
struct VideoModeSection {
    width: u32,
    height: u32,
    pixel_width: Option<u64>,
    pixel_height: Option<u64>,
    rotation: Option<u32>,
    mirror_horizontal: Option<bool>,
    mirror_vertical: Option<bool>,
    configuration: Option<Map<String, Value>>,
}

impl From<VideoModeSection> for VideoMode {
    fn from(mode: VideoModeSection) -> Self {
        Self {
            width: mode.width,
            height: mode.height,
            pixel_width: mode.pixel_width.unwrap_or(1),
            pixel_height: mode.pixel_height.unwrap_or(1),
            rotation: mode.rotation.unwrap_or(0),
            mirror_horizontal: mode.mirror_horizontal.unwrap_or(false),
            mirror_vertical: mode.mirror_vertical.unwrap_or(false),
            configuration: mode.configuration,
        }
    }
}

/// Everything the manifests are derived from.
#[derive(Debug, Clone)]
pub struct Metadata {
    platforms: Vec<Platform>,
    author: String,
    name: String,
    version: String,
    description: Option<String>,
    description_long: Option<String>,
    url: Option<String>,
    release_date: String,
    release_date_defaulted: bool,
    options: CoreOptions,
    video_modes: Vec<VideoMode>,
}

impl Metadata {
    /// Validate `document` and build the model from it.
    ///
    /// # Errors
    ///
    /// Returns [`PackageError::Validation`] if the document violates the
    /// schema. A validated document always converts, so
    /// [`PackageError::Json`] indicates a schema/model mismatch.
    pub fn from_document(document: &Value) -> Result<Self, PackageError> {
        apf_schema::validate(document)?;
        let doc: Document = serde_json::from_value(document.clone())?;

        let core = doc.metadata.core;
        let release_date_defaulted = core.release_date.is_none();
        let release_date = core
            .release_date
            .unwrap_or_else(|| chrono::Local::now().format(DATE_FORMAT).to_string());

        Ok(Self {
            platforms: doc.metadata.platform,
            author: core.author,
            name: core.name,
            version: core.version,
            description: core.description,
            description_long: core.description_long,
            url: core.url,
            release_date,
            release_date_defaulted,
            options: CoreOptions {
                sleep_supported: doc.core.sleep_supported.unwrap_or(false),
            },
            video_modes: doc.video.mode.into_iter().map(VideoMode::from).collect(),
        })
    }

    /// Core author.
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Core name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Core version string.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// One-line description, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Long description, if any. Becomes `info.txt`.
    pub fn description_long(&self) -> Option<&str> {
        self.description_long.as_deref()
    }

    /// Project homepage, if any.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Release date as `YYYY-MM-DD`.
    pub fn release_date(&self) -> &str {
        &self.release_date
    }

    /// Whether [`release_date`](Self::release_date) came from the wall clock.
    pub fn release_date_defaulted(&self) -> bool {
        self.release_date_defaulted
    }

    /// Declared platforms, in document order.
    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    /// Options from the top-level `[core]` table.
    pub fn options(&self) -> CoreOptions {
        self.options
    }

    /// Supported video modes, in document order.
    pub fn video_modes(&self) -> &[VideoMode] {
        &self.video_modes
    }

    /// Directory holding the core's files: `Cores/{author}.{name}`.
    pub fn core_directory(&self) -> String {
        format!("Cores/{}.{}", self.author, self.name)
    }

    /// Archive name: `{author}.{name}_{version}_{release_date}.zip`.
    pub fn zip_filename(&self) -> String {
        format!(
            "{}.{}_{}_{}.zip",
            self.author, self.name, self.version, self.release_date
        )
    }
}
